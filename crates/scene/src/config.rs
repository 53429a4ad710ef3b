use serde::{Deserialize, Serialize};

/// Camera placement and lens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub fov_y_deg: f64,
    pub near: f64,
    pub far: f64,
    pub eye: [f64; 3],
    pub target: [f64; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 45.0,
            near: 0.1,
            far: 4000.0,
            eye: [-300.0, 0.0, 700.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

/// Initial framing and interaction tuning for the map view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    /// Euler angles (x, y, z) in radians applied to the composed group.
    pub initial_rotation: [f64; 3],
    /// Radians of rotation per pixel of drag.
    pub drag_sensitivity: f64,
    /// Rotation about x is clamped to ±`pitch_limit`.
    pub pitch_limit: f64,
    /// Camera distance multiplier for a wheel step away from the user.
    pub wheel_out_factor: f64,
    /// Camera distance multiplier for a wheel step toward the user.
    pub wheel_in_factor: f64,
    /// Optional `[min, max]` clamp on the accumulated dolly factor. `None`
    /// leaves the dolly unbounded.
    pub zoom_limits: Option<[f64; 2]>,
    pub camera: CameraConfig,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            initial_rotation: [-0.8, -0.4, -0.5],
            drag_sensitivity: 0.005,
            pitch_limit: std::f64::consts::FRAC_PI_2,
            wheel_out_factor: 1.05,
            wheel_in_factor: 0.95,
            zoom_limits: None,
            camera: CameraConfig::default(),
        }
    }
}
