use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Administrative designation characters dropped before stat lookup.
///
/// 道 is deliberately absent: 北海道 keeps its full name as its key.
pub const DESIGNATION_SUFFIXES: [char; 3] = ['都', '府', '県'];

/// Ordered property names tried when reading a feature's name. The first
/// present, non-empty string wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameFields(Vec<String>);

impl NameFields {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(fields.into_iter().map(Into::into).collect())
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }

    pub fn resolve<'a>(&self, properties: &'a Map<String, Value>) -> Option<&'a str> {
        self.0.iter().find_map(|field| {
            properties
                .get(field)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
        })
    }
}

impl Default for NameFields {
    fn default() -> Self {
        Self::new(["pref", "name", "nam_ja", "ken"])
    }
}

/// Strips one trailing designation character: "東京都" -> "東京",
/// "京都府" -> "京都", "北海道" unchanged.
pub fn normalize_prefecture_name(raw: &str) -> &str {
    let name = raw.trim();
    match name.char_indices().next_back() {
        Some((i, c)) if i > 0 && DESIGNATION_SUFFIXES.contains(&c) => &name[..i],
        _ => name,
    }
}

/// Stat table key for a name given either in full or already short.
///
/// The suffix is only dropped when the name is the official form of the
/// shorter key, so the short key "京都" is kept rather than cut to "京".
pub fn stat_key(name: &str) -> &str {
    let name = name.trim();
    let short = normalize_prefecture_name(name);
    if short != name && display_name(short) == name {
        short
    } else {
        name
    }
}

/// Official name for a normalized key.
pub fn display_name(key: &str) -> String {
    match key {
        "北海道" => key.to_string(),
        "東京" => format!("{key}都"),
        "京都" | "大阪" => format!("{key}府"),
        _ => format!("{key}県"),
    }
}
