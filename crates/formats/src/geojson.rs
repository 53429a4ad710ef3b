//! Minimal GeoJSON reader for prefecture boundaries.
//!
//! Only `Polygon` and `MultiPolygon` geometries are kept; both are normalized
//! to a list of polygons. Features with other or broken geometry are reported
//! as [`GeometryIssue`]s instead of failing the whole collection.

use foundation::math::GeoPosition;
use serde_json::{Map, Value};

use crate::names::NameFields;

pub type Ring = Vec<GeoPosition>;

/// `rings[0]` is the exterior, the rest are holes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub rings: Vec<Ring>,
}

impl Polygon {
    pub fn new(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    pub fn exterior(&self) -> Option<&Ring> {
        self.rings.first()
    }

    pub fn holes(&self) -> &[Ring] {
        self.rings.get(1..).unwrap_or(&[])
    }

    pub fn positions(&self) -> impl Iterator<Item = GeoPosition> + '_ {
        self.rings.iter().flatten().copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
}

impl Geometry {
    pub fn polygons(&self) -> &[Polygon] {
        match self {
            Geometry::Polygon(p) => std::slice::from_ref(p),
            Geometry::MultiPolygon(ps) => ps,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Position in the source `features` array.
    pub index: usize,
    pub properties: Map<String, Value>,
    pub geometry: Geometry,
}

impl Feature {
    pub fn name<'a>(&'a self, fields: &NameFields) -> Option<&'a str> {
        fields.resolve(&self.properties)
    }
}

/// Why a feature or polygon produced no solid.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SkipReason {
    #[error("feature has no geometry")]
    MissingGeometry,
    #[error("unsupported geometry type {0}")]
    UnsupportedType(String),
    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),
    #[error("polygon has no rings")]
    EmptyPolygon,
    #[error("ring {ring} has fewer than 3 distinct points")]
    DegenerateRing { ring: usize },
    #[error("triangulation failed: {0}")]
    Triangulation(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeometryIssue {
    pub feature: usize,
    /// `None` when the whole feature was dropped.
    pub polygon: Option<usize>,
    pub reason: SkipReason,
}

impl std::fmt::Display for GeometryIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.polygon {
            Some(p) => write!(f, "feature {} polygon {}: {}", self.feature, p, self.reason),
            None => write!(f, "feature {}: {}", self.feature, self.reason),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GeoJsonError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected GeoJSON FeatureCollection")]
    NotAFeatureCollection,
    #[error("invalid feature at index {index}: {reason}")]
    InvalidFeature { index: usize, reason: String },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
    /// Features dropped while reading.
    pub issues: Vec<GeometryIssue>,
}

impl FeatureCollection {
    pub fn from_geojson_str(payload: &str) -> Result<Self, GeoJsonError> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_geojson_value(&value)
    }

    pub fn from_geojson_value(value: &Value) -> Result<Self, GeoJsonError> {
        let obj = value.as_object().ok_or(GeoJsonError::NotAFeatureCollection)?;
        if obj.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
            return Err(GeoJsonError::NotAFeatureCollection);
        }
        let features_val = obj
            .get("features")
            .and_then(Value::as_array)
            .ok_or(GeoJsonError::NotAFeatureCollection)?;

        let mut out = Self::default();
        for (index, feat_val) in features_val.iter().enumerate() {
            let feat_obj = feat_val
                .as_object()
                .ok_or_else(|| GeoJsonError::InvalidFeature {
                    index,
                    reason: "feature must be an object".to_string(),
                })?;
            match feat_obj.get("type").and_then(Value::as_str) {
                Some("Feature") => {}
                Some(other) => {
                    return Err(GeoJsonError::InvalidFeature {
                        index,
                        reason: format!("unexpected feature type: {other}"),
                    });
                }
                None => {
                    return Err(GeoJsonError::InvalidFeature {
                        index,
                        reason: "feature missing type".to_string(),
                    });
                }
            }

            let properties = feat_obj
                .get("properties")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();

            match parse_geometry(feat_obj.get("geometry")) {
                Ok(geometry) => out.features.push(Feature {
                    index,
                    properties,
                    geometry,
                }),
                Err(reason) => {
                    tracing::warn!(feature = index, %reason, "skipping feature");
                    out.issues.push(GeometryIssue {
                        feature: index,
                        polygon: None,
                        reason,
                    });
                }
            }
        }

        Ok(out)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

fn parse_geometry(value: Option<&Value>) -> Result<Geometry, SkipReason> {
    let obj = match value {
        None | Some(Value::Null) => return Err(SkipReason::MissingGeometry),
        Some(v) => v.as_object().ok_or_else(|| {
            SkipReason::InvalidCoordinates("geometry must be an object".to_string())
        })?,
    };
    let ty = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| SkipReason::InvalidCoordinates("geometry missing type".to_string()))?;
    let coords = || {
        obj.get("coordinates").ok_or_else(|| {
            SkipReason::InvalidCoordinates("geometry missing coordinates".to_string())
        })
    };

    match ty {
        "Polygon" => Ok(Geometry::Polygon(parse_polygon(coords()?)?)),
        "MultiPolygon" => {
            let polys = coords()?.as_array().ok_or_else(|| {
                SkipReason::InvalidCoordinates(
                    "MultiPolygon coordinates must be an array of polygons".to_string(),
                )
            })?;
            let polys: Vec<Polygon> = polys.iter().map(parse_polygon).collect::<Result<_, _>>()?;
            Ok(Geometry::MultiPolygon(polys))
        }
        other => Err(SkipReason::UnsupportedType(other.to_string())),
    }
}

fn parse_polygon(coords: &Value) -> Result<Polygon, SkipReason> {
    let rings = coords.as_array().ok_or_else(|| {
        SkipReason::InvalidCoordinates("Polygon coordinates must be an array of rings".to_string())
    })?;
    let rings: Vec<Ring> = rings.iter().map(parse_ring).collect::<Result<_, _>>()?;
    Ok(Polygon::new(rings))
}

fn parse_ring(coords: &Value) -> Result<Ring, SkipReason> {
    let arr = coords
        .as_array()
        .ok_or_else(|| SkipReason::InvalidCoordinates("ring must be an array".to_string()))?;
    arr.iter().map(parse_position).collect()
}

/// `[lon, lat]`; any altitude is ignored.
fn parse_position(coords: &Value) -> Result<GeoPosition, SkipReason> {
    let arr = coords.as_array().ok_or_else(|| {
        SkipReason::InvalidCoordinates("position must be an array".to_string())
    })?;
    let (Some(lon), Some(lat)) = (
        arr.first().and_then(Value::as_f64),
        arr.get(1).and_then(Value::as_f64),
    ) else {
        return Err(SkipReason::InvalidCoordinates(
            "position must have numeric [lon, lat]".to_string(),
        ));
    };
    Ok(GeoPosition::new(lon, lat))
}

#[cfg(test)]
mod tests {
    use super::{FeatureCollection, GeoJsonError, Geometry, SkipReason};
    use crate::names::NameFields;
    use foundation::math::GeoPosition;
    use pretty_assertions::assert_eq;

    const MIXED: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "nam_ja": "東京都" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[139.0, 35.5], [140.0, 35.5], [140.0, 36.0], [139.0, 35.5]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "pref": "沖縄県" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[127.6, 26.1], [127.9, 26.1], [127.9, 26.6, 12.0]]],
                        [[[124.1, 24.3], [124.3, 24.3], [124.3, 24.5]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": { "name": "marker" },
                "geometry": { "type": "Point", "coordinates": [135.0, 35.0] }
            },
            {
                "type": "Feature",
                "properties": { "name": "nothing" },
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn keeps_polygons_and_reports_the_rest() {
        let fc = FeatureCollection::from_geojson_str(MIXED).expect("parse");
        assert_eq!(fc.len(), 2);

        let fields = NameFields::default();
        assert_eq!(fc.features[0].name(&fields), Some("東京都"));
        assert_eq!(fc.features[1].name(&fields), Some("沖縄県"));
        assert_eq!(fc.features[1].index, 1);

        assert!(matches!(fc.features[0].geometry, Geometry::Polygon(_)));
        assert_eq!(fc.features[1].geometry.polygons().len(), 2);
        assert_eq!(
            fc.features[1].geometry.polygons()[0].rings[0][2],
            GeoPosition::new(127.9, 26.6)
        );

        let reasons: Vec<_> = fc.issues.iter().map(|i| (i.feature, i.reason.clone())).collect();
        assert_eq!(
            reasons,
            vec![
                (2, SkipReason::UnsupportedType("Point".to_string())),
                (3, SkipReason::MissingGeometry),
            ]
        );
    }

    #[test]
    fn bad_coordinates_skip_only_that_feature() {
        let payload = r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": {},
                  "geometry": { "type": "Polygon", "coordinates": [[["a", 1.0]]] } },
                { "type": "Feature", "properties": {},
                  "geometry": { "type": "Polygon", "coordinates": [] } }
            ]
        }"#;
        let fc = FeatureCollection::from_geojson_str(payload).expect("parse");
        assert_eq!(fc.len(), 1);
        assert_eq!(fc.features[0].geometry.polygons()[0].rings.len(), 0);
        assert_eq!(fc.issues.len(), 1);
        assert!(matches!(fc.issues[0].reason, SkipReason::InvalidCoordinates(_)));
    }

    #[test]
    fn rejects_non_collections() {
        let err = FeatureCollection::from_geojson_str(r#"{ "type": "Feature" }"#);
        assert!(matches!(err, Err(GeoJsonError::NotAFeatureCollection)));

        let err = FeatureCollection::from_geojson_str("not json");
        assert!(matches!(err, Err(GeoJsonError::Json(_))));

        let err = FeatureCollection::from_geojson_str(
            r#"{ "type": "FeatureCollection", "features": [42] }"#,
        );
        assert!(matches!(err, Err(GeoJsonError::InvalidFeature { index: 0, .. })));
    }

    #[test]
    fn holes_follow_the_exterior() {
        let payload = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature", "properties": { "ken": "滋賀県" },
                "geometry": { "type": "Polygon", "coordinates": [
                    [[135.8, 34.8], [136.5, 34.8], [136.5, 35.7], [135.8, 35.7], [135.8, 34.8]],
                    [[136.0, 35.1], [136.1, 35.3], [136.2, 35.1], [136.0, 35.1]]
                ]}
            }]
        }"#;
        let fc = FeatureCollection::from_geojson_str(payload).expect("parse");
        let poly = &fc.features[0].geometry.polygons()[0];
        assert_eq!(poly.exterior().map(Vec::len), Some(5));
        assert_eq!(poly.holes().len(), 1);
        assert_eq!(poly.positions().count(), 9);
    }
}
