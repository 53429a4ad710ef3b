use foundation::math::Euler;
use runtime::InputEvent;

use crate::config::ViewConfig;

/// Mutable view state the controller drives: group rotation and camera dolly.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneGroupState {
    pub rotation: Euler,
    /// Multiplier on the camera's eye offset from its target.
    pub zoom: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        last_px: [f64; 2],
    },
}

/// Drag rotates the group, wheel dollies the camera.
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: SceneGroupState,
    drag: DragState,
    sensitivity: f64,
    pitch_limit: f64,
    wheel_out_factor: f64,
    wheel_in_factor: f64,
    zoom_limits: Option<[f64; 2]>,
}

impl InteractionController {
    pub fn new(cfg: &ViewConfig) -> Self {
        let [x, y, z] = cfg.initial_rotation;
        Self {
            state: SceneGroupState {
                rotation: Euler::new(x, y, z),
                zoom: 1.0,
            },
            drag: DragState::Idle,
            sensitivity: cfg.drag_sensitivity,
            pitch_limit: pitch_limit(cfg.pitch_limit),
            wheel_out_factor: cfg.wheel_out_factor,
            wheel_in_factor: cfg.wheel_in_factor,
            zoom_limits: cfg.zoom_limits.and_then(zoom_limits),
        }
    }

    pub fn state(&self) -> SceneGroupState {
        self.state
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn on_pointer_down(&mut self, x: f64, y: f64) {
        self.drag = DragState::Dragging { last_px: [x, y] };
    }

    /// Returns true when the rotation changed.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) -> bool {
        let DragState::Dragging { last_px } = self.drag else {
            return false;
        };
        let dx = x - last_px[0];
        let dy = y - last_px[1];
        self.drag = DragState::Dragging { last_px: [x, y] };

        let r = &mut self.state.rotation;
        r.y += dx * self.sensitivity;
        r.x = (r.x + dy * self.sensitivity).clamp(-self.pitch_limit, self.pitch_limit);
        dx != 0.0 || dy != 0.0
    }

    pub fn on_pointer_up(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Positive `delta_y` moves the camera away, anything else moves it closer.
    pub fn on_wheel(&mut self, delta_y: f64) -> bool {
        let factor = if delta_y > 0.0 {
            self.wheel_out_factor
        } else {
            self.wheel_in_factor
        };
        let mut zoom = self.state.zoom * factor;
        if let Some([min, max]) = self.zoom_limits {
            zoom = zoom.clamp(min, max);
        }
        let changed = zoom != self.state.zoom;
        self.state.zoom = zoom;
        changed
    }

    /// Routes a queued input event. Returns true when the view state changed.
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::PointerDown { x, y } => {
                self.on_pointer_down(x, y);
                false
            }
            InputEvent::PointerMove { x, y } => self.on_pointer_move(x, y),
            InputEvent::PointerUp => {
                self.on_pointer_up();
                false
            }
            InputEvent::Wheel { delta_y } => self.on_wheel(delta_y),
            InputEvent::Resize { .. } => false,
        }
    }
}

fn pitch_limit(limit: f64) -> f64 {
    if limit.is_nan() {
        tracing::warn!("pitch_limit is NaN, using pi/2");
        return std::f64::consts::FRAC_PI_2;
    }
    limit.abs()
}

/// Usable `[min, max]` dolly clamp. Inverted, non-positive or NaN bounds
/// leave the dolly unbounded.
fn zoom_limits([min, max]: [f64; 2]) -> Option<[f64; 2]> {
    if min > 0.0 && min <= max {
        Some([min, max])
    } else {
        tracing::warn!(min, max, "ignoring invalid zoom_limits");
        None
    }
}
