//! Per-feature label anchors on the extruded top faces.

use foundation::math::Vec3;
use scene::SceneGroup;

use crate::layer::{Layer, LayerId};

#[derive(Debug, Clone, PartialEq)]
pub struct LabelsConfig {
    pub max_labels: usize,
    pub max_text_len: usize,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            max_labels: 64,
            max_text_len: 64,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelAnchor {
    /// Stat table key of the feature.
    pub key: String,
    /// "display name: value".
    pub text: String,
    /// Top-face centroid of the feature's largest solid, group-local. Apply
    /// the current group transform for a world position.
    pub local_position: Vec3,
    /// Statistic value; anchors are sorted by it, highest first.
    pub priority: f32,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct LabelsLayerSnapshot {
    pub labels: Vec<LabelAnchor>,
}

impl LabelsLayerSnapshot {
    pub fn find(&self, key: &str) -> Option<&LabelAnchor> {
        self.labels.iter().find(|l| l.key == key)
    }
}

/// One label per feature node, ordered by value.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelsLayer {
    id: LayerId,
    pub config: LabelsConfig,
}

impl LabelsLayer {
    pub fn new(id: u64, config: LabelsConfig) -> Self {
        Self {
            id: LayerId(id),
            config,
        }
    }

    pub fn extract(&self, group: &SceneGroup) -> LabelsLayerSnapshot {
        let mut out = Vec::new();

        for node in group.nodes() {
            let Some(largest) = node
                .solids
                .iter()
                .max_by(|a, b| a.outline.area().total_cmp(&b.outline.area()))
            else {
                continue;
            };
            let text = label_text(&node.display_name, node.label.value);
            if text.chars().count() > self.config.max_text_len {
                continue;
            }

            let local_position = largest.outline.centroid().extend(largest.depth);
            out.push(LabelAnchor {
                key: node.label.name.clone(),
                text,
                local_position,
                priority: node.label.value as f32,
            });
        }

        out.sort_by(|a, b| b.priority.total_cmp(&a.priority));
        out.truncate(self.config.max_labels);
        tracing::debug!(layer = self.kind(), id = self.id().0, labels = out.len(), "extracted labels");

        LabelsLayerSnapshot { labels: out }
    }
}

impl Layer for LabelsLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn kind(&self) -> &'static str {
        "labels"
    }
}

/// "東京都: 738946"; whole numbers print without a fraction.
pub fn label_text(display_name: &str, value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{display_name}: {value:.0}")
    } else {
        format!("{display_name}: {value}")
    }
}
