//! Hit testing against the extruded top faces.

use foundation::math::Vec3;

use crate::group::{FeatureNode, SceneGroup};

/// World-space ray. `dir` is expected to be unit length.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize(),
        }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.dir * t
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit<'a> {
    pub node: &'a FeatureNode,
    /// Distance along the ray in world units.
    pub distance: f64,
    /// Hit point in group-local coordinates.
    pub local_point: Vec3,
}

/// Closest top face hit by `ray`. Equal distances resolve to the earlier node.
pub fn pick_ray<'a>(group: &'a SceneGroup, ray: &Ray) -> Option<PickHit<'a>> {
    let origin = group.transform.inverse_apply(ray.origin);
    let dir = group.transform.rotation.unrotate(ray.dir);
    if dir.z.abs() < 1e-12 {
        return None;
    }

    let mut best: Option<PickHit<'a>> = None;
    for node in group.nodes() {
        for solid in &node.solids {
            let t = (solid.depth - origin.z) / dir.z;
            if !t.is_finite() || t < 0.0 {
                continue;
            }
            let p = origin + dir * t;
            if !solid.outline.contains(p.truncate()) {
                continue;
            }
            if best.is_none_or(|b| t < b.distance) {
                best = Some(PickHit {
                    node,
                    distance: t,
                    local_point: p,
                });
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::{PickHit, Ray, pick_ray};
    use crate::components::{ExtrudedSolid, Mesh, Outline, SolidLabel, Transform};
    use crate::group::{FeatureNode, SceneGroup};
    use foundation::math::{Euler, Vec2, Vec3};

    fn square(x0: f64, y0: f64, size: f64) -> Vec<Vec2> {
        vec![
            Vec2::new(x0, y0),
            Vec2::new(x0 + size, y0),
            Vec2::new(x0 + size, y0 + size),
            Vec2::new(x0, y0 + size),
        ]
    }

    fn node(name: &str, ring: Vec<Vec2>, depth: f64) -> FeatureNode {
        let label = SolidLabel::new(name, depth);
        let mut node = FeatureNode::new(label.clone(), name);
        node.solids.push(ExtrudedSolid {
            outline: Outline::new(ring, Vec::new()),
            depth,
            color: [1.0, 1.0, 1.0],
            mesh: Mesh::default(),
            edges: Vec::new(),
            label,
        });
        node
    }

    fn two_squares() -> SceneGroup {
        let mut group = SceneGroup::new();
        group.push(node("香川", square(0.0, 0.0, 10.0), 4.0));
        group.push(node("徳島", square(20.0, 0.0, 10.0), 28.0));
        group
    }

    fn straight_down(group: &SceneGroup, x: f64, y: f64) -> Option<PickHit<'_>> {
        pick_ray(group, &Ray::new(Vec3::new(x, y, 100.0), Vec3::new(0.0, 0.0, -1.0)))
    }

    #[test]
    fn hit_outlives_the_ray() {
        let group = two_squares();
        let hit = {
            let ray = Ray::new(Vec3::new(25.0, 5.0, 100.0), Vec3::new(0.0, 0.0, -1.0));
            pick_ray(&group, &ray)
        };
        assert_eq!(hit.map(|h| h.node.label.name.as_str()), Some("徳島"));
        assert!(straight_down(&group, 15.0, 5.0).is_none());
    }

    #[test]
    fn holes_are_not_pickable() {
        let mut group = SceneGroup::new();
        let mut ring = node("岡山", square(0.0, 0.0, 30.0), 10.0);
        ring.solids[0].outline = Outline::new(square(0.0, 0.0, 30.0), vec![square(10.0, 10.0, 10.0)]);
        group.push(ring);
        assert!(straight_down(&group, 15.0, 15.0).is_none());
        assert_eq!(
            straight_down(&group, 5.0, 5.0).map(|h| h.node.label.name.as_str()),
            Some("岡山")
        );
    }

    #[test]
    fn vertical_ray_hits_top_face() {
        let group = two_squares();
        let ray = Ray::new(Vec3::new(5.0, 5.0, 100.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = pick_ray(&group, &ray).expect("hit");
        assert_eq!(hit.node.label.name, "香川");
        assert!((hit.distance - 96.0).abs() < 1e-9);
        assert!((hit.local_point.z - 4.0).abs() < 1e-9);
    }

    #[test]
    fn ray_respects_group_transform() {
        let mut group = two_squares();
        group.transform = Transform {
            position: Vec3::new(-15.0, -5.0, 0.0),
            rotation: Euler::default(),
        };
        // Local (25, 5) sits at world (10, 0).
        let ray = Ray::new(Vec3::new(10.0, 0.0, 50.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = pick_ray(&group, &ray).expect("hit");
        assert_eq!(hit.node.label.name, "徳島");
    }

    #[test]
    fn ray_pointing_away_misses() {
        let group = two_squares();
        let ray = Ray::new(Vec3::new(5.0, 5.0, 100.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(pick_ray(&group, &ray).is_none());
    }
}
