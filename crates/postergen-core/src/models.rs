use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::skip_serializing_none;

/// Logos are free-form records; the client only guarantees the fetched
/// collection is a list.
pub type Logo = Value;

/// A poster layout definition with configurable fields and styling options.
///
/// The backend stores `required_fields` and `customization_data` as
/// JSON-encoded strings inside the record; deserialization decodes them in
/// place, so a `Template` always carries structured values.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: Option<u64>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub price: Option<i64>,
    pub thumbnail_url: Option<String>,
    pub is_active: Option<bool>,
    /// Field descriptors the template expects at generation time.
    #[serde(default, deserialize_with = "embedded_json_array")]
    pub required_fields: Vec<Value>,
    /// Default styling values applied at generation time.
    #[serde(default, deserialize_with = "embedded_json_object")]
    pub customization_data: Map<String, Value>,
    /// Whatever else the backend attaches to the record (layout linkage,
    /// timestamps) passes through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a poster-generation request. Field names are fixed by the
/// backend contract; the client injects no defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub business_name: String,
    pub data: Map<String, Value>,
    pub customization_data: Map<String, Value>,
}

/// Absolute link to a generated artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPoster {
    pub pdf_url: String,
}

// Non-empty strings decode as embedded JSON; anything else (absent, null,
// already-structured) collapses to the empty value.
fn embedded_json_array<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(raw)) if !raw.is_empty() => {
            serde_json::from_str(&raw).map_err(de::Error::custom)
        }
        _ => Ok(Vec::new()),
    }
}

fn embedded_json_object<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(raw)) if !raw.is_empty() => {
            serde_json::from_str(&raw).map_err(de::Error::custom)
        }
        _ => Ok(Map::new()),
    }
}
