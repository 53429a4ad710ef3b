//! Column-major 4x4 matrices in the layout WGSL expects (`m[col][row]`).

use super::{Mat3, Vec3};

pub type Mat4 = [[f32; 4]; 4];

pub const MAT4_IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// c = a * b
pub fn mat4_mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut c = [[0.0f32; 4]; 4];
    for col in 0..4 {
        for row in 0..4 {
            c[col][row] = a[0][row] * b[col][0]
                + a[1][row] * b[col][1]
                + a[2][row] * b[col][2]
                + a[3][row] * b[col][3];
        }
    }
    c
}

/// Right-handed perspective with depth range [0, 1].
pub fn mat4_perspective_rh_z0(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> Mat4 {
    let f = 1.0 / (0.5 * fov_y_rad).tan();
    let m00 = (f / aspect) as f32;
    let m11 = f as f32;
    let m22 = (far / (near - far)) as f32;
    let m23 = ((near * far) / (near - far)) as f32;

    [
        [m00, 0.0, 0.0, 0.0],
        [0.0, m11, 0.0, 0.0],
        [0.0, 0.0, m22, -1.0],
        [0.0, 0.0, m23, 0.0],
    ]
}

pub fn mat4_look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let f = (target - eye).normalize();
    let s = f.cross(up).normalize();
    let u = s.cross(f);

    let ex = -s.dot(eye);
    let ey = -u.dot(eye);
    let ez = f.dot(eye);

    [
        [s.x as f32, u.x as f32, (-f.x) as f32, 0.0],
        [s.y as f32, u.y as f32, (-f.y) as f32, 0.0],
        [s.z as f32, u.z as f32, (-f.z) as f32, 0.0],
        [ex as f32, ey as f32, ez as f32, 1.0],
    ]
}

/// Affine matrix `x -> r * x + t` from a row-major rotation.
pub fn mat4_from_rotation_translation(r: Mat3, t: Vec3) -> Mat4 {
    [
        [r[0][0] as f32, r[1][0] as f32, r[2][0] as f32, 0.0],
        [r[0][1] as f32, r[1][1] as f32, r[2][1] as f32, 0.0],
        [r[0][2] as f32, r[1][2] as f32, r[2][2] as f32, 0.0],
        [t.x as f32, t.y as f32, t.z as f32, 1.0],
    ]
}

pub fn mat4_transform_point(m: Mat4, p: Vec3) -> [f32; 4] {
    let v = [p.x as f32, p.y as f32, p.z as f32, 1.0];
    let mut out = [0.0f32; 4];
    for (row, slot) in out.iter_mut().enumerate() {
        *slot = m[0][row] * v[0] + m[1][row] * v[1] + m[2][row] * v[2] + m[3][row] * v[3];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Euler;

    fn assert_close(a: f32, b: f32, eps: f32) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn identity_is_neutral() {
        let m = mat4_from_rotation_translation(Euler::default().to_mat3(), Vec3::ZERO);
        assert_eq!(m, MAT4_IDENTITY);
        assert_eq!(mat4_mul(MAT4_IDENTITY, m), m);
    }

    #[test]
    fn look_at_puts_target_on_negative_z() {
        let view = mat4_look_at_rh(
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::ZERO,
            Vec3::new(0.0, 1.0, 0.0),
        );
        let p = mat4_transform_point(view, Vec3::ZERO);
        assert_close(p[0], 0.0, 1e-6);
        assert_close(p[1], 0.0, 1e-6);
        assert_close(p[2], -10.0, 1e-6);
    }

    #[test]
    fn rotation_translation_matches_euler() {
        let r = Euler::new(0.3, -0.2, 1.1);
        let t = Vec3::new(1.0, 2.0, 3.0);
        let m = mat4_from_rotation_translation(r.to_mat3(), t);
        let v = Vec3::new(-4.0, 0.5, 2.0);
        let expected = r.rotate(v) + t;
        let got = mat4_transform_point(m, v);
        assert_close(got[0], expected.x as f32, 1e-5);
        assert_close(got[1], expected.y as f32, 1e-5);
        assert_close(got[2], expected.z as f32, 1e-5);
        assert_close(got[3], 1.0, 0.0);
    }

    #[test]
    fn perspective_maps_near_plane_to_zero_depth() {
        let proj = mat4_perspective_rh_z0(std::f64::consts::FRAC_PI_4, 1.5, 0.1, 4000.0);
        let p = mat4_transform_point(proj, Vec3::new(0.0, 0.0, -0.1));
        assert_close(p[2] / p[3], 0.0, 1e-5);
    }
}
