use foundation::math::{
    Mat4, Vec3, mat4_look_at_rh, mat4_mul, mat4_perspective_rh_z0,
};

use crate::config::CameraConfig;
use crate::picking::Ray;

const UP: Vec3 = Vec3 {
    x: 0.0,
    y: 1.0,
    z: 0.0,
};

/// Perspective camera that dollies along the line from its target to the
/// configured eye.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    base_eye: Vec3,
    target: Vec3,
    zoom: f64,
    fov_y_rad: f64,
    near: f64,
    far: f64,
    aspect: f64,
}

impl Camera {
    pub fn from_config(cfg: &CameraConfig) -> Self {
        let [ex, ey, ez] = cfg.eye;
        let [tx, ty, tz] = cfg.target;
        Self {
            base_eye: Vec3::new(ex, ey, ez),
            target: Vec3::new(tx, ty, tz),
            zoom: 1.0,
            fov_y_rad: cfg.fov_y_deg.to_radians(),
            near: cfg.near,
            far: cfg.far,
            aspect: 1.0,
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.target + (self.base_eye - self.target) * self.zoom
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Multiplier on the eye offset; 1.0 is the configured position.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    /// Zero-sized viewports keep the previous aspect.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        if !(width > 0.0 && height > 0.0) {
            return;
        }
        self.aspect = width / height;
    }

    pub fn view(&self) -> Mat4 {
        mat4_look_at_rh(self.eye(), self.target, UP)
    }

    pub fn projection(&self) -> Mat4 {
        mat4_perspective_rh_z0(self.fov_y_rad, self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        mat4_mul(self.projection(), self.view())
    }

    /// Ray from the eye through normalized device coordinates (-1..1, y up).
    pub fn ray_through_ndc(&self, ndc_x: f64, ndc_y: f64) -> Ray {
        let eye = self.eye();
        let f = (self.target - eye).normalize();
        let s = f.cross(UP).normalize();
        let u = s.cross(f);
        let half_h = (0.5 * self.fov_y_rad).tan();
        let half_w = half_h * self.aspect;
        let dir = f + s * (ndc_x * half_w) + u * (ndc_y * half_h);
        Ray::new(eye, dir)
    }

    /// Converts a pixel position inside a `width` x `height` viewport to NDC.
    pub fn ndc_from_pixels(x: f64, y: f64, width: f64, height: f64) -> (f64, f64) {
        if width <= 0.0 || height <= 0.0 {
            return (0.0, 0.0);
        }
        ((x / width) * 2.0 - 1.0, 1.0 - (y / height) * 2.0)
    }
}
