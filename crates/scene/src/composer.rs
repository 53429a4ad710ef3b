use foundation::math::{Euler, Vec3};

use crate::components::Transform;
use crate::group::{FeatureNode, SceneGroup};

/// Collects feature nodes into one group centered on its own bounding box and
/// turned to the initial viewing angle.
pub fn compose(nodes: Vec<FeatureNode>, initial_rotation: Euler) -> SceneGroup {
    let mut group = SceneGroup::new();
    for node in nodes {
        group.push(node);
    }

    let bounds = group.local_bounds();
    let center = if bounds.is_empty() {
        Vec3::ZERO
    } else {
        bounds.center()
    };

    group.transform = Transform {
        position: -center,
        rotation: initial_rotation,
    };

    tracing::debug!(
        nodes = group.nodes().len(),
        solids = group.solid_count(),
        center_x = center.x,
        center_y = center.y,
        center_z = center.z,
        "composed scene group"
    );
    group
}
