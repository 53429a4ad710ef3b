use crate::math::{Vec2, Vec3};

/// Axis-aligned bounding boxes
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3 {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    /// Inverted box that any included point replaces.
    pub fn empty() -> Self {
        Aabb2 {
            min: [f64::INFINITY; 2],
            max: [f64::NEG_INFINITY; 2],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min[0] > self.max[0] || self.min[1] > self.max[1]
    }

    pub fn include(&mut self, p: Vec2) {
        self.min[0] = self.min[0].min(p.x);
        self.min[1] = self.min[1].min(p.y);
        self.max[0] = self.max[0].max(p.x);
        self.max[1] = self.max[1].max(p.y);
    }

    pub fn span(&self) -> Vec2 {
        Vec2::new(self.max[0] - self.min[0], self.max[1] - self.min[1])
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.min[0] + (self.max[0] - self.min[0]) / 2.0,
            self.min[1] + (self.max[1] - self.min[1]) / 2.0,
        )
    }
}

impl Aabb3 {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Aabb3 { min, max }
    }

    pub fn empty() -> Self {
        Aabb3 {
            min: [f64::INFINITY; 3],
            max: [f64::NEG_INFINITY; 3],
        }
    }

    pub fn is_empty(&self) -> bool {
        (0..3).any(|i| self.min[i] > self.max[i])
    }

    pub fn include(&mut self, p: Vec3) {
        let p = [p.x, p.y, p.z];
        for i in 0..3 {
            self.min[i] = self.min[i].min(p[i]);
            self.max[i] = self.max[i].max(p[i]);
        }
    }

    pub fn union(&mut self, other: &Aabb3) {
        if other.is_empty() {
            return;
        }
        self.include(Vec3::new(other.min[0], other.min[1], other.min[2]));
        self.include(Vec3::new(other.max[0], other.max[1], other.max[2]));
    }

    pub fn center(&self) -> Vec3 {
        Vec3::new(
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
            (self.min[2] + self.max[2]) / 2.0,
        )
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min[0]
            && p.x <= self.max[0]
            && p.y >= self.min[1]
            && p.y <= self.max[1]
            && p.z >= self.min[2]
            && p.z <= self.max[2]
    }
}

#[cfg(test)]
mod tests {
    use super::{Aabb2, Aabb3};
    use crate::math::{Vec2, Vec3};

    #[test]
    fn empty_box_takes_first_point() {
        let mut b = Aabb2::empty();
        assert!(b.is_empty());
        b.include(Vec2::new(2.0, -1.0));
        assert!(!b.is_empty());
        assert_eq!(b.span(), Vec2::new(0.0, 0.0));
        b.include(Vec2::new(4.0, 3.0));
        assert_eq!(b.center(), Vec2::new(3.0, 1.0));
    }

    #[test]
    fn union_and_contains() {
        let mut a = Aabb3::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        a.union(&Aabb3::new([-1.0, 0.5, 0.0], [0.0, 2.0, 4.0]));
        assert_eq!(a, Aabb3::new([-1.0, 0.0, 0.0], [1.0, 2.0, 4.0]));
        assert_eq!(a.center(), Vec3::new(0.0, 1.0, 2.0));
        assert!(a.contains(Vec3::new(-0.5, 1.5, 3.9)));
        assert!(!a.contains(Vec3::new(2.0, 0.0, 0.0)));

        let before = a;
        a.union(&Aabb3::empty());
        assert_eq!(a, before);
    }
}
