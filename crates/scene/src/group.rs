use foundation::bounds::Aabb3;

use crate::components::{ExtrudedSolid, SolidLabel, Transform};

/// All solids built for one feature. They share color and depth.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureNode {
    pub label: SolidLabel,
    /// Human-facing name, e.g. "東京都" for the key "東京".
    pub display_name: String,
    pub solids: Vec<ExtrudedSolid>,
}

impl FeatureNode {
    pub fn new(label: SolidLabel, display_name: impl Into<String>) -> Self {
        Self {
            label,
            display_name: display_name.into(),
            solids: Vec::new(),
        }
    }

    pub fn bounds(&self) -> Aabb3 {
        let mut b = Aabb3::empty();
        for solid in &self.solids {
            b.union(&solid.bounds());
        }
        b
    }
}

/// The single transformable group holding every prefecture solid.
///
/// Node order is draw order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneGroup {
    nodes: Vec<FeatureNode>,
    pub transform: Transform,
}

impl SceneGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: FeatureNode) {
        self.nodes.push(node);
    }

    pub fn nodes(&self) -> &[FeatureNode] {
        &self.nodes
    }

    pub fn solids(&self) -> impl Iterator<Item = &ExtrudedSolid> {
        self.nodes.iter().flat_map(|n| n.solids.iter())
    }

    pub fn solid_count(&self) -> usize {
        self.nodes.iter().map(|n| n.solids.len()).sum()
    }

    /// Bounds of all solids before the group transform.
    pub fn local_bounds(&self) -> Aabb3 {
        let mut b = Aabb3::empty();
        for node in &self.nodes {
            b.union(&node.bounds());
        }
        b
    }

    /// Bounds of all transformed vertices.
    pub fn world_bounds(&self) -> Aabb3 {
        let mut b = Aabb3::empty();
        for solid in self.solids() {
            for p in &solid.mesh.positions {
                b.include(self.transform.apply(*p));
            }
        }
        b
    }
}

#[cfg(test)]
mod tests {
    use super::{FeatureNode, SceneGroup};
    use crate::components::{ExtrudedSolid, Mesh, Outline, SolidLabel};
    use foundation::math::Vec3;

    fn slab(min: Vec3, max: Vec3, name: &str) -> ExtrudedSolid {
        let mut mesh = Mesh::default();
        let up = Vec3::new(0.0, 0.0, 1.0);
        let a = mesh.push_vertex(min, up);
        let b = mesh.push_vertex(Vec3::new(max.x, min.y, min.z), up);
        let c = mesh.push_vertex(max, up);
        mesh.push_triangle(a, b, c);
        ExtrudedSolid {
            outline: Outline::default(),
            depth: max.z - min.z,
            color: [1.0, 0.0, 0.0],
            mesh,
            edges: Vec::new(),
            label: SolidLabel::new(name, 1.0),
        }
    }

    #[test]
    fn empty_group_has_empty_bounds() {
        let group = SceneGroup::new();
        assert!(group.local_bounds().is_empty());
        assert_eq!(group.solid_count(), 0);
    }

    #[test]
    fn bounds_cover_every_solid() {
        let mut group = SceneGroup::new();
        let mut node = FeatureNode::new(SolidLabel::new("沖縄", 1.0), "沖縄県");
        node.solids
            .push(slab(Vec3::new(-5.0, -5.0, 0.0), Vec3::new(-1.0, -1.0, 4.0), "沖縄"));
        node.solids
            .push(slab(Vec3::new(2.0, 1.0, 0.0), Vec3::new(6.0, 3.0, 4.0), "沖縄"));
        group.push(node);

        let b = group.local_bounds();
        assert_eq!(b.min, [-5.0, -5.0, 0.0]);
        assert_eq!(b.max, [6.0, 3.0, 4.0]);
        assert_eq!(group.solid_count(), 2);
        assert_eq!(group.solids().count(), 2);
    }
}
