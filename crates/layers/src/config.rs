use formats::NameFields;
use foundation::math::LccParams;
use serde::{Deserialize, Serialize};

/// Lambert Conformal Conic reference parameters, in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectionConfig {
    pub standard_parallel_1: f64,
    pub standard_parallel_2: f64,
    pub origin_lat: f64,
    pub central_meridian: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        let p = LccParams::JAPAN;
        Self {
            standard_parallel_1: p.standard_parallel_1,
            standard_parallel_2: p.standard_parallel_2,
            origin_lat: p.origin_lat,
            central_meridian: p.central_meridian,
        }
    }
}

impl From<ProjectionConfig> for LccParams {
    fn from(cfg: ProjectionConfig) -> Self {
        LccParams {
            standard_parallel_1: cfg.standard_parallel_1,
            standard_parallel_2: cfg.standard_parallel_2,
            origin_lat: cfg.origin_lat,
            central_meridian: cfg.central_meridian,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChoroplethConfig {
    /// Length of the larger map dimension after fitting, in scene units.
    pub target_span: f64,
    /// Depth of a zero-value prefecture.
    pub base_height: f64,
    /// Extra depth of the maximum-value prefecture.
    pub height_range: f64,
    pub saturation: f64,
    pub lightness: f64,
    /// 0xRRGGBB.
    pub edge_color: u32,
    pub name_fields: NameFields,
    pub projection: ProjectionConfig,
}

impl Default for ChoroplethConfig {
    fn default() -> Self {
        Self {
            target_span: 800.0,
            base_height: 4.0,
            height_range: 24.0,
            saturation: 0.9,
            lightness: 0.5,
            edge_color: 0x222222,
            name_fields: NameFields::default(),
            projection: ProjectionConfig::default(),
        }
    }
}

impl ChoroplethConfig {
    pub fn edge_rgb(&self) -> [f32; 3] {
        hex_to_rgb(self.edge_color)
    }
}

/// 0xRRGGBB to sRGB channels in [0, 1].
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::{ChoroplethConfig, hex_to_rgb};
    use foundation::math::LccParams;

    #[test]
    fn defaults_match_japan_view() {
        let cfg = ChoroplethConfig::default();
        assert_eq!(cfg.target_span, 800.0);
        assert_eq!(cfg.base_height + cfg.height_range, 28.0);
        assert_eq!(LccParams::from(cfg.projection), LccParams::JAPAN);
        assert_eq!(
            cfg.name_fields.fields(),
            &["pref", "name", "nam_ja", "ken"].map(String::from)
        );
    }

    #[test]
    fn json_overrides_single_fields() {
        let cfg: ChoroplethConfig = serde_json::from_str(
            r#"{ "height_range": 48, "name_fields": ["nam_ja"], "projection": { "central_meridian": 138 } }"#,
        )
        .expect("parse config");
        assert_eq!(cfg.height_range, 48.0);
        assert_eq!(cfg.base_height, 4.0);
        assert_eq!(cfg.name_fields.fields(), &["nam_ja".to_string()]);
        assert_eq!(cfg.projection.central_meridian, 138.0);
        assert_eq!(cfg.projection.origin_lat, 36.0);

        assert!(serde_json::from_str::<ChoroplethConfig>(r#"{ "span": 1 }"#).is_err());
    }

    #[test]
    fn edge_color_splits_channels() {
        assert_eq!(hex_to_rgb(0xff8000), [1.0, 128.0 / 255.0, 0.0]);
        let [r, g, b] = ChoroplethConfig::default().edge_rgb();
        assert_eq!(r, 34.0 / 255.0);
        assert_eq!((r, g), (g, b));
    }
}
