// crates/globex-core/src/raw.rs

//! Raw country records as they come from the REST sources.
//!
//! NOTE: These types mirror external API payloads. Every field is optional so a
//! record with gaps still deserializes; defaults are applied by the normalizer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declared shape of a source's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaFamily {
    /// Flat v2 shape: `name`, `alpha2Code`, `languages: [{name}]`, ...
    V2,
    /// Nested v3 shape: `name.common`, `cca2`, `languages: {code: name}`, ...
    V3,
    /// Decide per record by looking at the payload.
    Auto,
}

impl SchemaFamily {
    /// Picks the concrete family for one record.
    pub fn detect(value: &Value) -> SchemaFamily {
        let nested_name = value.get("name").is_some_and(Value::is_object);
        if nested_name || value.get("cca3").is_some() {
            SchemaFamily::V3
        } else {
            SchemaFamily::V2
        }
    }
}

/// How many records a request is expected to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Full-list endpoints; the body must be a JSON array.
    Collection,
    /// Single-country endpoints; an array or one object.
    Single,
}

/// `capital` is a string in v2 and an array in v3; accept both anywhere.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn first(&self) -> Option<&str> {
        match self {
            OneOrMany::One(s) => Some(s.as_str()),
            OneOrMany::Many(v) => v.first().map(String::as_str),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FlagsRaw {
    pub png: Option<String>,
    pub svg: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LanguageV2 {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CurrencyRaw {
    pub name: Option<String>,
    pub symbol: Option<String>,
}

/// Family A: the flat v2 layout (also used by the bundled dataset).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawV2 {
    pub name: Option<String>,
    pub alpha2_code: Option<String>,
    pub alpha3_code: Option<String>,
    pub capital: Option<OneOrMany>,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub population: Option<f64>,
    pub area: Option<f64>,
    /// Single flag URL; `flagUrl` is what canonical-shaped data calls it.
    #[serde(alias = "flagUrl")]
    pub flag: Option<String>,
    pub flags: Option<FlagsRaw>,
    pub languages: Option<Vec<LanguageV2>>,
    pub currencies: Option<Vec<CurrencyRaw>>,
    pub borders: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NameV3 {
    pub common: Option<String>,
    pub official: Option<String>,
}

/// Family B: the nested v3 layout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawV3 {
    pub name: Option<NameV3>,
    pub cca2: Option<String>,
    pub cca3: Option<String>,
    pub capital: Option<OneOrMany>,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub population: Option<f64>,
    pub area: Option<f64>,
    pub flags: Option<FlagsRaw>,
    /// `{ "eng": "English", "fra": "French" }`, in document order.
    pub languages: Option<Map<String, Value>>,
    /// `{ "EUR": { "name": "Euro", "symbol": "€" } }`, in document order.
    pub currencies: Option<Map<String, Value>>,
    pub borders: Option<Vec<String>>,
}

/// One record tagged with the schema it was read as.
#[derive(Debug, Clone)]
pub enum RawCountry {
    V2(RawV2),
    V3(RawV3),
}

impl RawCountry {
    /// Deserializes one JSON value as the given family (`Auto` detects).
    pub fn from_value(value: Value, family: SchemaFamily) -> serde_json::Result<Self> {
        let family = match family {
            SchemaFamily::Auto => SchemaFamily::detect(&value),
            concrete => concrete,
        };
        match family {
            SchemaFamily::V3 => serde_json::from_value(value).map(RawCountry::V3),
            _ => serde_json::from_value(value).map(RawCountry::V2),
        }
    }
}

/// Splits a response body into raw records according to the expected arity.
///
/// Elements that cannot be read as the family's shape are skipped; the
/// returned error string is only produced when the payload as a whole has the
/// wrong shape.
pub fn parse_payload(
    value: Value,
    family: SchemaFamily,
    arity: Arity,
) -> std::result::Result<Vec<RawCountry>, String> {
    let items = match (value, arity) {
        (Value::Array(items), _) => items,
        (obj @ Value::Object(_), Arity::Single) => vec![obj],
        (other, Arity::Collection) => {
            return Err(format!("expected a JSON array, got {}", json_kind(&other)))
        }
        (other, Arity::Single) => {
            return Err(format!(
                "expected a JSON object or array, got {}",
                json_kind(&other)
            ))
        }
    };

    let mut out = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        match RawCountry::from_value(item, family) {
            Ok(raw) => out.push(raw),
            Err(e) => tracing::debug!(index = idx, error = %e, "skipping unreadable record"),
        }
    }
    Ok(out)
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
