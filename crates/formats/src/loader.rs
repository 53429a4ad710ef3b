use std::fs;
use std::path::Path;

use crate::geojson::{FeatureCollection, GeoJsonError};
use crate::stats::{StatTable, StatsError};

/// Where the viewer and CLI look for boundaries when no path is given.
pub const DEFAULT_DATASET_PATH: &str = "assets/prefectures.geojson";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(
        "prefectures.geojson が見つかりません。{location} に配置してください。 ({reason})"
    )]
    DataMissing { location: String, reason: String },
    #[error("failed to parse {location}: {source}")]
    Boundaries {
        location: String,
        #[source]
        source: GeoJsonError,
    },
    #[error("failed to read statistics {location}: {source}")]
    StatsIo {
        location: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse statistics {location}: {source}")]
    Stats {
        location: String,
        #[source]
        source: StatsError,
    },
}

impl LoadError {
    pub fn data_missing(location: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        LoadError::DataMissing {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}

/// Parses an already fetched boundary payload; `location` is only used in
/// error messages.
pub fn parse_feature_collection(
    location: &str,
    payload: &str,
) -> Result<FeatureCollection, LoadError> {
    let collection =
        FeatureCollection::from_geojson_str(payload).map_err(|source| LoadError::Boundaries {
            location: location.to_string(),
            source,
        })?;
    tracing::info!(
        location,
        features = collection.len(),
        skipped = collection.issues.len(),
        "loaded boundaries"
    );
    Ok(collection)
}

pub fn load_feature_collection(path: impl AsRef<Path>) -> Result<FeatureCollection, LoadError> {
    let path = path.as_ref();
    let location = path.display().to_string();
    let payload =
        fs::read_to_string(path).map_err(|e| LoadError::data_missing(location.clone(), e))?;
    parse_feature_collection(&location, &payload)
}

pub fn load_stat_table(path: impl AsRef<Path>) -> Result<StatTable, LoadError> {
    let path = path.as_ref();
    let location = path.display().to_string();
    let payload = fs::read_to_string(path).map_err(|source| LoadError::StatsIo {
        location: location.clone(),
        source,
    })?;
    StatTable::from_json_str(&payload).map_err(|source| LoadError::Stats { location, source })
}

#[cfg(test)]
mod tests {
    use super::{LoadError, load_feature_collection, load_stat_table, parse_feature_collection};

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("formats-loader-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[test]
    fn missing_file_is_data_missing_with_location() {
        let path = scratch_dir("missing").join("prefectures.geojson");
        let err = load_feature_collection(&path).expect_err("missing file");
        match &err {
            LoadError::DataMissing { location, .. } => {
                assert_eq!(location, &path.display().to_string());
            }
            other => panic!("unexpected error: {other}"),
        }
        let message = err.to_string();
        assert!(message.starts_with("prefectures.geojson が見つかりません。"));
        assert!(message.contains("に配置してください。"));
    }

    #[test]
    fn loads_collection_from_disk() {
        let path = scratch_dir("ok").join("prefectures.geojson");
        std::fs::write(
            &path,
            r#"{ "type": "FeatureCollection", "features": [
                { "type": "Feature", "properties": { "pref": "香川県" },
                  "geometry": { "type": "Polygon",
                    "coordinates": [[[133.5, 34.0], [134.4, 34.0], [134.4, 34.5], [133.5, 34.0]]] } }
            ] }"#,
        )
        .expect("write fixture");
        let fc = load_feature_collection(&path).expect("load");
        assert_eq!(fc.len(), 1);
    }

    #[test]
    fn parse_errors_name_the_location() {
        let err = parse_feature_collection("memory://bad", "[]").expect_err("not a collection");
        assert!(matches!(err, LoadError::Boundaries { .. }));
        assert!(err.to_string().contains("memory://bad"));
    }

    #[test]
    fn stats_errors_are_not_data_missing() {
        let dir = scratch_dir("stats");
        let err = load_stat_table(dir.join("absent.json")).expect_err("missing stats");
        assert!(matches!(err, LoadError::StatsIo { .. }));

        let path = dir.join("stats.json");
        std::fs::write(&path, r#"{ "高知": { "name": "高知県", "value": 6543 } }"#)
            .expect("write stats");
        let table = load_stat_table(&path).expect("stats");
        assert_eq!(table.value_for("高知県"), 6543.0);
    }
}
