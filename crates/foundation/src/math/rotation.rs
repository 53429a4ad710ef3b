use super::Vec3;

/// Row-major 3x3 matrix.
pub type Mat3 = [[f64; 3]; 3];

/// Euler angles in radians, applied in XYZ order (x outermost):
/// `R = Rx(x) * Ry(y) * Rz(z)`.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Euler {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Euler {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_mat3(self) -> Mat3 {
        let (b, a) = self.x.sin_cos();
        let (d, c) = self.y.sin_cos();
        let (f, e) = self.z.sin_cos();
        let ae = a * e;
        let af = a * f;
        let be = b * e;
        let bf = b * f;

        [
            [c * e, -c * f, d],
            [af + be * d, ae - bf * d, -b * c],
            [bf - ae * d, be + af * d, a * c],
        ]
    }

    pub fn rotate(self, v: Vec3) -> Vec3 {
        mat3_mul_vec(self.to_mat3(), v)
    }

    /// Inverse rotation (the transpose, since the matrix is orthonormal).
    pub fn unrotate(self, v: Vec3) -> Vec3 {
        mat3_mul_vec(mat3_transpose(self.to_mat3()), v)
    }
}

pub fn mat3_mul_vec(m: Mat3, v: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
        m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
        m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
    )
}

pub fn mat3_transpose(m: Mat3) -> Mat3 {
    [
        [m[0][0], m[1][0], m[2][0]],
        [m[0][1], m[1][1], m[2][1]],
        [m[0][2], m[1][2], m[2][2]],
    ]
}
