use formats::{FeatureCollection, SkipReason, StatTable};
use layers::{ChoroplethConfig, ChoroplethLayer, LabelsConfig, LabelsLayer, NormalizeError};
use pretty_assertions::assert_eq;
use scene::ViewConfig;

fn assert_close(a: f64, b: f64, eps: f64) {
    let diff = (a - b).abs();
    assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
}

fn collection(features: &str) -> FeatureCollection {
    let payload = format!(r#"{{ "type": "FeatureCollection", "features": [{features}] }}"#);
    FeatureCollection::from_geojson_str(&payload).expect("parse fixture")
}

fn square(name: &str, lon: f64, lat: f64, size: f64) -> String {
    format!(
        r#"{{ "type": "Feature", "properties": {{ "pref": "{name}" }},
             "geometry": {{ "type": "Polygon", "coordinates": [[
                [{lon}, {lat}], [{e}, {lat}], [{e}, {n}], [{lon}, {n}], [{lon}, {lat}]
             ]] }} }}"#,
        e = lon + size,
        n = lat + size,
    )
}

fn layer() -> ChoroplethLayer {
    ChoroplethLayer::new(1, ChoroplethConfig::default())
}

#[test]
fn tokyo_at_global_max_is_tall_and_red() {
    let fc = collection(&square("東京都", 139.5, 35.5, 0.5));
    let build = layer()
        .build(&fc, &StatTable::japan_defaults(), &ViewConfig::default())
        .expect("build");

    let summary = &build.report.summaries[0];
    assert_eq!(summary.key, "東京");
    assert_eq!(summary.display_name, "東京都");
    assert_eq!(summary.value, 738946.0);
    assert!(summary.matched);
    assert_eq!(summary.encoded.intensity, 1.0);
    assert_eq!(summary.encoded.depth, 28.0);
    assert_eq!(summary.encoded.hue_deg, 0.0);

    let node = &build.group.nodes()[0];
    assert_eq!(node.solids.len(), 1);
    assert_eq!(node.solids[0].depth, 28.0);
    assert_eq!(node.solids[0].label.name, "東京");
    assert_eq!(node.solids[0].label.value, 738946.0);
}

#[test]
fn multipolygon_yields_matching_solids() {
    let fc = collection(
        r#"{ "type": "Feature", "properties": { "name": "沖縄県" },
             "geometry": { "type": "MultiPolygon", "coordinates": [
                [[[127.6, 26.1], [128.0, 26.1], [128.0, 26.8], [127.6, 26.1]]],
                [[[124.0, 24.2], [124.4, 24.2], [124.4, 24.6], [124.0, 24.6]]]
             ] } }"#,
    );
    let build = layer()
        .build(&fc, &StatTable::japan_defaults(), &ViewConfig::default())
        .expect("build");

    assert_eq!(build.report.features, 1);
    assert_eq!(build.report.solids, 2);
    let solids = &build.group.nodes()[0].solids;
    assert_eq!(solids.len(), 2);
    assert_eq!(solids[0].color, solids[1].color);
    assert_eq!(solids[0].depth, solids[1].depth);
    assert!(solids[0].bounds().max[0] > solids[1].bounds().max[0]);
}

#[test]
fn unknown_feature_is_a_thin_blue_slab() {
    let fc = collection(&format!(
        "{},{}",
        square("Atlantis", 130.0, 33.0, 1.0),
        square("大阪府", 135.3, 34.4, 0.6)
    ));
    let build = layer()
        .build(&fc, &StatTable::japan_defaults(), &ViewConfig::default())
        .expect("build");

    assert_eq!(build.report.unmatched, vec!["Atlantis".to_string()]);
    let atlantis = &build.report.summaries[0];
    assert!(!atlantis.matched);
    assert_eq!(atlantis.encoded.depth, 4.0);
    assert_eq!(atlantis.encoded.hue_deg, 240.0);
    assert_eq!(build.group.nodes()[0].solids[0].depth, 4.0);
}

#[test]
fn map_fills_target_span_and_centers_on_origin() {
    let fc = collection(&format!(
        "{},{},{}",
        square("北海道", 140.0, 42.0, 3.0),
        square("福岡県", 130.2, 33.2, 0.8),
        square("沖縄県", 127.6, 26.1, 0.5)
    ));
    let build = layer()
        .build(&fc, &StatTable::japan_defaults(), &ViewConfig::default())
        .expect("build");

    let local = build.group.local_bounds();
    let span_x = local.max[0] - local.min[0];
    let span_y = local.max[1] - local.min[1];
    assert_close(span_x.max(span_y), 800.0, 1e-6);
    assert_close(local.min[2], 0.0, 1e-12);

    let center_world = build.group.transform.apply(local.center());
    assert!(center_world.length() < 1e-9, "{center_world:?}");
}

#[test]
fn degenerate_input_is_fatal() {
    let fc = collection(
        r#"{ "type": "Feature", "properties": {},
             "geometry": { "type": "Polygon", "coordinates": [[[135.0, 35.0], [135.0, 35.0], [135.0, 35.0]]] } }"#,
    );
    let err = layer()
        .build(&fc, &StatTable::japan_defaults(), &ViewConfig::default())
        .expect_err("zero span");
    assert!(matches!(err, NormalizeError::DegenerateBounds { .. }));

    let empty = collection("");
    let err = layer()
        .build(&empty, &StatTable::japan_defaults(), &ViewConfig::default())
        .expect_err("no points");
    assert_eq!(err, NormalizeError::Empty);
}

#[test]
fn broken_polygons_are_skipped_and_counted() {
    let fc = collection(&format!(
        r#"{},
        {{ "type": "Feature", "properties": {{ "pref": "佐賀県" }},
           "geometry": {{ "type": "MultiPolygon", "coordinates": [
              [],
              [[[130.0, 33.0], [130.1, 33.1], [130.1, 33.1], [130.0, 33.0]]],
              [[[129.9, 33.0], [130.4, 33.0], [130.4, 33.5], [129.9, 33.0]]]
           ] }} }},
        {{ "type": "Feature", "properties": {{ "pref": "x" }},
           "geometry": {{ "type": "LineString", "coordinates": [[130.0, 33.0], [131.0, 34.0]] }} }}"#,
        square("長崎県", 129.6, 32.6, 0.6)
    ));
    let build = layer()
        .build(&fc, &StatTable::japan_defaults(), &ViewConfig::default())
        .expect("build");

    assert_eq!(build.report.features, 2);
    assert_eq!(build.report.solids, 2);
    let reasons: Vec<_> = build
        .report
        .skipped
        .iter()
        .map(|i| (i.feature, i.polygon, i.reason.clone()))
        .collect();
    assert_eq!(
        reasons,
        vec![
            (2, None, SkipReason::UnsupportedType("LineString".to_string())),
            (1, Some(0), SkipReason::EmptyPolygon),
            (1, Some(1), SkipReason::DegenerateRing { ring: 0 }),
        ]
    );
}

#[test]
fn labels_follow_built_group() {
    let fc = collection(&format!(
        "{},{}",
        square("東京都", 139.5, 35.5, 0.5),
        square("香川県", 133.6, 34.1, 0.4)
    ));
    let build = layer()
        .build(&fc, &StatTable::japan_defaults(), &ViewConfig::default())
        .expect("build");
    let labels = LabelsLayer::new(2, LabelsConfig::default()).extract(&build.group);

    assert_eq!(labels.labels.len(), 2);
    assert_eq!(labels.labels[0].text, "東京都: 738946");
    assert_eq!(labels.labels[1].text, "香川県: 20338");
    assert_eq!(labels.labels[0].local_position.z, 28.0);
}
