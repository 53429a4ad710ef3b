/// Host input, already reduced to what the map view reacts to.
///
/// Pointer coordinates are client pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    /// Positive `delta_y` scrolls away from the user.
    Wheel { delta_y: f64 },
    Resize { width: f64, height: f64 },
}

/// Events received since the last frame, in arrival order.
///
/// Listeners push, the render loop drains once at the start of each frame, so
/// a frame always observes every event that arrived before it.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::{InputEvent, InputQueue};

    #[test]
    fn preserves_arrival_order() {
        let mut queue = InputQueue::new();
        queue.push(InputEvent::PointerDown { x: 1.0, y: 2.0 });
        queue.push(InputEvent::PointerMove { x: 3.0, y: 4.0 });
        queue.push(InputEvent::PointerUp);
        assert_eq!(
            queue.events(),
            &[
                InputEvent::PointerDown { x: 1.0, y: 2.0 },
                InputEvent::PointerMove { x: 3.0, y: 4.0 },
                InputEvent::PointerUp,
            ]
        );
    }

    #[test]
    fn drain_clears_events() {
        let mut queue = InputQueue::new();
        queue.push(InputEvent::Wheel { delta_y: 120.0 });
        let drained = queue.drain();
        assert_eq!(drained.len(), 1);
        assert!(queue.is_empty());
    }
}
