use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::names::{display_name, normalize_prefecture_name, stat_key};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRecord {
    /// Display name, e.g. "東京都".
    pub name: String,
    pub value: f64,
}

impl StatRecord {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("invalid statistics table: {0}")]
    Json(#[from] serde_json::Error),
    #[error("statistic for {key} is not finite")]
    NonFinite { key: String },
}

/// Statistics keyed by normalized prefecture name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatTable {
    records: BTreeMap<String, StatRecord>,
}

/// Built-in figures for all 47 prefectures.
const JAPAN_DEFAULTS: [(&str, f64); 47] = [
    ("北海道", 24981.0),
    ("青森", 9876.0),
    ("岩手", 8543.0),
    ("宮城", 24156.0),
    ("秋田", 7432.0),
    ("山形", 9654.0),
    ("福島", 34213.0),
    ("茨城", 103315.0),
    ("栃木", 64766.0),
    ("群馬", 72369.0),
    ("埼玉", 262382.0),
    ("千葉", 209137.0),
    ("東京", 738946.0),
    ("神奈川", 292450.0),
    ("新潟", 30874.0),
    ("富山", 28739.0),
    ("石川", 31019.0),
    ("福井", 19462.0),
    ("山梨", 27894.0),
    ("長野", 51937.0),
    ("岐阜", 73997.0),
    ("静岡", 118848.0),
    ("愛知", 331733.0),
    ("三重", 66946.0),
    ("滋賀", 45748.0),
    ("京都", 86975.0),
    ("大阪", 333564.0),
    ("兵庫", 148190.0),
    ("奈良", 26344.0),
    ("和歌山", 14523.0),
    ("鳥取", 8765.0),
    ("島根", 10987.0),
    ("岡山", 43737.0),
    ("広島", 75021.0),
    ("山口", 13876.0),
    ("徳島", 11234.0),
    ("香川", 20338.0),
    ("愛媛", 19827.0),
    ("高知", 6543.0),
    ("福岡", 115859.0),
    ("佐賀", 14321.0),
    ("長崎", 13456.0),
    ("熊本", 28456.0),
    ("大分", 18456.0),
    ("宮崎", 10456.0),
    ("鹿児島", 18987.0),
    ("沖縄", 25223.0),
];

impl StatTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn japan_defaults() -> Self {
        let mut table = Self::new();
        for (key, value) in JAPAN_DEFAULTS {
            table.insert(key, StatRecord::new(display_name(key), value));
        }
        table
    }

    /// Parses `{ "<key>": { "name": "...", "value": n }, ... }`.
    ///
    /// Full official names are shortened on the way in, so "東京都" and
    /// "東京" land on the same record; short keys are kept as given.
    pub fn from_json_str(payload: &str) -> Result<Self, StatsError> {
        let raw: BTreeMap<String, StatRecord> = serde_json::from_str(payload)?;
        let mut table = Self::new();
        for (key, record) in raw {
            if !record.value.is_finite() {
                return Err(StatsError::NonFinite { key });
            }
            table.insert(stat_key(&key), record);
        }
        Ok(table)
    }

    /// Stores `record` under `key` as given; keys are expected in short form.
    pub fn insert(&mut self, key: &str, record: StatRecord) {
        self.records.insert(key.trim().to_string(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&StatRecord> {
        self.records.get(key)
    }

    /// Finds the record for a raw feature name: official short key first,
    /// then the suffix-stripped form, then the name as given.
    pub fn lookup(&self, raw_name: &str) -> Option<(&str, &StatRecord)> {
        [
            stat_key(raw_name),
            normalize_prefecture_name(raw_name),
            raw_name.trim(),
        ]
            .into_iter()
            .find_map(|key| self.records.get_key_value(key))
            .map(|(k, r)| (k.as_str(), r))
    }

    /// Value for a raw feature name; 0 when absent.
    pub fn value_for(&self, raw_name: &str) -> f64 {
        self.lookup(raw_name).map_or(0.0, |(_, r)| r.value)
    }

    /// Largest value in the table, or 1 when no value is positive.
    pub fn max_value(&self) -> f64 {
        let max = self
            .records
            .values()
            .map(|r| r.value)
            .fold(f64::NEG_INFINITY, f64::max);
        if max > 0.0 { max } else { 1.0 }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatRecord)> {
        self.records.iter().map(|(k, r)| (k.as_str(), r))
    }
}
