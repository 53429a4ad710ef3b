use foundation::bounds::Aabb3;
use foundation::math::{Vec2, Vec3};

/// Flat outline in map units: one exterior ring plus holes.
///
/// Rings carry no closing duplicate. Builders orient the exterior
/// counter-clockwise and holes clockwise.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outline {
    pub exterior: Vec<Vec2>,
    pub holes: Vec<Vec<Vec2>>,
}

impl Outline {
    pub fn new(exterior: Vec<Vec2>, holes: Vec<Vec<Vec2>>) -> Self {
        Self { exterior, holes }
    }

    pub fn rings(&self) -> impl Iterator<Item = &[Vec2]> {
        std::iter::once(self.exterior.as_slice()).chain(self.holes.iter().map(Vec::as_slice))
    }

    /// Even-odd containment; points inside a hole are outside the outline.
    pub fn contains(&self, p: Vec2) -> bool {
        self.rings()
            .filter(|ring| ring_contains(ring, p))
            .count()
            % 2
            == 1
    }

    /// Filled area (exterior minus holes).
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| signed_area(h).abs()).sum();
        signed_area(&self.exterior).abs() - holes
    }

    /// Area centroid of the exterior ring.
    pub fn centroid(&self) -> Vec2 {
        let ring = &self.exterior;
        if ring.is_empty() {
            return Vec2::default();
        }

        let mut a2 = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;
        for (i, p) in ring.iter().enumerate() {
            let q = ring[(i + 1) % ring.len()];
            let cross = p.perp_dot(q);
            a2 += cross;
            cx += (p.x + q.x) * cross;
            cy += (p.y + q.y) * cross;
        }

        if a2.abs() < f64::EPSILON {
            let n = ring.len() as f64;
            let sum = ring.iter().fold(Vec2::default(), |acc, p| acc + *p);
            return sum * (1.0 / n);
        }
        Vec2::new(cx / (3.0 * a2), cy / (3.0 * a2))
    }
}

/// Shoelace area; positive for counter-clockwise rings.
pub fn signed_area(ring: &[Vec2]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for (i, p) in ring.iter().enumerate() {
        sum += p.perp_dot(ring[(i + 1) % ring.len()]);
    }
    sum * 0.5
}

fn ring_contains(ring: &[Vec2], p: Vec2) -> bool {
    let mut inside = false;
    let mut j = ring.len().wrapping_sub(1);
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[j];
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Indexed triangle list with per-vertex normals.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(normal);
        index
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn bounds(&self) -> Aabb3 {
        let mut b = Aabb3::empty();
        for p in &self.positions {
            b.include(*p);
        }
        b
    }
}

/// Ties a solid back to the statistic it encodes.
#[derive(Debug, Clone, PartialEq)]
pub struct SolidLabel {
    /// Normalized prefecture name (designation suffix stripped).
    pub name: String,
    pub value: f64,
}

impl SolidLabel {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// One outline swept from z = 0 up to z = `depth`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtrudedSolid {
    pub outline: Outline,
    pub depth: f64,
    /// sRGB, each channel in [0, 1].
    pub color: [f32; 3],
    pub mesh: Mesh,
    /// Line segments along cap rims and wall creases.
    pub edges: Vec<[Vec3; 2]>,
    pub label: SolidLabel,
}

impl ExtrudedSolid {
    pub fn bounds(&self) -> Aabb3 {
        self.mesh.bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::{Outline, signed_area};
    use foundation::math::Vec2;

    fn square(min: f64, max: f64) -> Vec<Vec2> {
        vec![
            Vec2::new(min, min),
            Vec2::new(max, min),
            Vec2::new(max, max),
            Vec2::new(min, max),
        ]
    }

    #[test]
    fn signed_area_follows_winding() {
        let ccw = square(0.0, 2.0);
        let mut cw = ccw.clone();
        cw.reverse();
        assert_eq!(signed_area(&ccw), 4.0);
        assert_eq!(signed_area(&cw), -4.0);
        assert_eq!(signed_area(&ccw[..2]), 0.0);
    }

    #[test]
    fn holes_are_excluded_from_containment_and_area() {
        let mut hole = square(1.0, 3.0);
        hole.reverse();
        let outline = Outline::new(square(0.0, 4.0), vec![hole]);

        assert!(outline.contains(Vec2::new(0.5, 0.5)));
        assert!(!outline.contains(Vec2::new(2.0, 2.0)));
        assert!(!outline.contains(Vec2::new(5.0, 2.0)));
        assert_eq!(outline.area(), 12.0);
    }

    #[test]
    fn centroid_of_square() {
        let outline = Outline::new(square(-1.0, 3.0), Vec::new());
        assert_eq!(outline.centroid(), Vec2::new(1.0, 1.0));
    }
}
