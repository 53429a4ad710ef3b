use foundation::math::{
    Euler, Mat4, Vec3, mat3_mul_vec, mat4_from_rotation_translation,
};

/// Group transform: translate by `position`, then rotate about the origin.
///
/// Translating first keeps the rotation pivot at whatever point `position`
/// moved to the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Euler,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 0.0),
            rotation: Euler::default(),
        }
    }

    pub fn translate(position: Vec3) -> Self {
        Self {
            position,
            rotation: Euler::default(),
        }
    }

    pub fn apply(&self, local: Vec3) -> Vec3 {
        self.rotation.rotate(local + self.position)
    }

    pub fn inverse_apply(&self, world: Vec3) -> Vec3 {
        self.rotation.unrotate(world) - self.position
    }

    pub fn matrix(&self) -> Mat4 {
        let r = self.rotation.to_mat3();
        mat4_from_rotation_translation(r, mat3_mul_vec(r, self.position))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::Transform;
    use foundation::math::{Euler, Vec3, mat4_transform_point};

    #[test]
    fn identity_is_origin() {
        let transform = Transform::identity();
        assert_eq!(transform.position, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(transform.apply(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn matrix_agrees_with_apply() {
        let t = Transform {
            position: Vec3::new(-2.0, 1.0, -14.0),
            rotation: Euler::new(-0.8, -0.4, -0.5),
        };
        let v = Vec3::new(10.0, -3.0, 28.0);
        let expected = t.apply(v);
        let got = mat4_transform_point(t.matrix(), v);
        assert!((got[0] as f64 - expected.x).abs() < 1e-4);
        assert!((got[1] as f64 - expected.y).abs() < 1e-4);
        assert!((got[2] as f64 - expected.z).abs() < 1e-4);
    }

    #[test]
    fn inverse_apply_round_trips() {
        let t = Transform {
            position: Vec3::new(5.0, 0.0, -1.0),
            rotation: Euler::new(0.2, 0.7, -1.3),
        };
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert!((t.inverse_apply(t.apply(v)) - v).length() < 1e-12);
    }
}
