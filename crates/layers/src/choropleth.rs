use formats::{FeatureCollection, GeometryIssue, StatTable, normalize_prefecture_name};
use foundation::math::{Euler, LambertConformalConic};
use scene::components::SolidLabel;
use scene::{FeatureNode, SceneGroup, ViewConfig, compose};

use crate::config::ChoroplethConfig;
use crate::layer::{Layer, LayerId};
use crate::normalize::{BoundsNormalizer, MapFit, NormalizeError};
use crate::symbology::{Encoded, ValueEncoder};
use crate::vector::FeatureExtruder;

/// Per-feature outcome, in collection order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSummary {
    pub feature: usize,
    /// Name as read from the properties, if any.
    pub raw_name: Option<String>,
    /// Stat table key, or the normalized raw name when unmatched.
    pub key: String,
    pub display_name: String,
    pub value: f64,
    pub matched: bool,
    pub encoded: Encoded,
    pub solids: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub features: usize,
    pub solids: usize,
    /// Keys of features with no statistic (built with value 0).
    pub unmatched: Vec<String>,
    /// Features or polygons that produced nothing.
    pub skipped: Vec<GeometryIssue>,
    pub summaries: Vec<FeatureSummary>,
}

#[derive(Debug, Clone)]
pub struct ChoroplethBuild {
    pub group: SceneGroup,
    pub fit: MapFit,
    pub encoder: ValueEncoder,
    pub report: BuildReport,
}

/// Prefecture polygons extruded and colored by a statistic.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethLayer {
    id: LayerId,
    pub config: ChoroplethConfig,
}

impl ChoroplethLayer {
    pub fn new(id: u64, config: ChoroplethConfig) -> Self {
        Self {
            id: LayerId(id),
            config,
        }
    }

    pub fn normalizer(&self) -> BoundsNormalizer {
        let projection = LambertConformalConic::new(self.config.projection.into());
        BoundsNormalizer::new(projection, self.config.target_span)
    }

    /// Fits, extrudes and composes the whole collection.
    ///
    /// Only an unusable fit is fatal; bad features are skipped and reported.
    pub fn build(
        &self,
        collection: &FeatureCollection,
        stats: &StatTable,
        view: &ViewConfig,
    ) -> Result<ChoroplethBuild, NormalizeError> {
        let normalizer = self.normalizer();
        let fit = normalizer.fit(collection)?;
        let encoder = ValueEncoder::new(stats.max_value(), &self.config);
        let extruder = FeatureExtruder::new(&normalizer, &fit);

        let mut report = BuildReport {
            skipped: collection.issues.clone(),
            ..BuildReport::default()
        };
        let mut nodes = Vec::with_capacity(collection.len());

        for feature in &collection.features {
            let raw_name = feature.name(&self.config.name_fields);
            let (key, display_name, value, matched) =
                match raw_name.and_then(|n| stats.lookup(n)) {
                    Some((key, record)) => (key.to_string(), record.name.clone(), record.value, true),
                    None => {
                        let raw = raw_name.unwrap_or_default();
                        (normalize_prefecture_name(raw).to_string(), raw.to_string(), 0.0, false)
                    }
                };

            let label = SolidLabel::new(key.clone(), value);
            let encoded = encoder.encode(value);
            let (solids, issues) = extruder.build_feature_meshes(feature, &label, &encoded);

            if !matched {
                tracing::debug!(feature = feature.index, key = %key, "no statistic for feature");
                report.unmatched.push(key.clone());
            }
            report.skipped.extend(issues);
            report.summaries.push(FeatureSummary {
                feature: feature.index,
                raw_name: raw_name.map(str::to_string),
                key,
                display_name: display_name.clone(),
                value,
                matched,
                encoded,
                solids: solids.len(),
            });

            if solids.is_empty() {
                continue;
            }
            report.features += 1;
            report.solids += solids.len();
            let mut node = FeatureNode::new(label, display_name);
            node.solids = solids;
            nodes.push(node);
        }

        let [x, y, z] = view.initial_rotation;
        let group = compose(nodes, Euler::new(x, y, z));

        tracing::info!(
            layer = self.kind(),
            id = self.id().0,
            features = report.features,
            solids = report.solids,
            unmatched = report.unmatched.len(),
            skipped = report.skipped.len(),
            "built choropleth"
        );

        Ok(ChoroplethBuild {
            group,
            fit,
            encoder,
            report,
        })
    }
}

impl Layer for ChoroplethLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn kind(&self) -> &'static str {
        "choropleth"
    }
}
