use foundation::time::Time;

/// Frame metadata handed to the render loop once per display refresh.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Seconds since the previous frame (0 for the first one).
    pub dt_s: f64,
    /// Time at the start of the frame, relative to the first frame.
    pub time: Time,
}

/// Turns host refresh timestamps into [`Frame`]s.
///
/// Large gaps (a backgrounded tab) are capped so nothing downstream sees a
/// multi-second step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start_ms: Option<f64>,
    last_ms: f64,
    next_index: u64,
    max_dt_s: f64,
}

impl FrameClock {
    pub fn new(max_dt_s: f64) -> Self {
        Self {
            start_ms: None,
            last_ms: 0.0,
            next_index: 0,
            max_dt_s,
        }
    }

    pub fn tick(&mut self, now_ms: f64) -> Frame {
        let start = *self.start_ms.get_or_insert(now_ms);
        let dt_s = if self.next_index == 0 {
            0.0
        } else {
            ((now_ms - self.last_ms) / 1000.0).clamp(0.0, self.max_dt_s)
        };
        self.last_ms = now_ms;

        let frame = Frame {
            index: self.next_index,
            dt_s,
            time: Time::from_millis(now_ms - start),
        };
        self.next_index += 1;
        frame
    }

    pub fn frames_elapsed(&self) -> u64 {
        self.next_index
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::FrameClock;
    use foundation::time::Time;

    #[test]
    fn first_frame_has_zero_dt() {
        let mut clock = FrameClock::default();
        let f0 = clock.tick(1_000.0);
        assert_eq!(f0.index, 0);
        assert_eq!(f0.dt_s, 0.0);
        assert_eq!(f0.time, Time(0.0));
    }

    #[test]
    fn tick_advances_index_and_time() {
        let mut clock = FrameClock::default();
        clock.tick(0.0);
        let f1 = clock.tick(16.0);
        assert_eq!(f1.index, 1);
        assert_eq!(f1.dt_s, 0.016);
        assert_eq!(f1.time, Time(0.016));
        assert_eq!(clock.frames_elapsed(), 2);
    }

    #[test]
    fn long_gaps_are_capped() {
        let mut clock = FrameClock::new(0.1);
        clock.tick(0.0);
        let f = clock.tick(5_000.0);
        assert_eq!(f.dt_s, 0.1);
        assert_eq!(f.time, Time(5.0));
    }
}
