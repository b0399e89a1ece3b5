//! Source configuration
//!
//! The user-supplied configuration is a flat JSON object holding the API
//! credential plus optional filters for the individual streams. It is parsed
//! once into [`SourceConfig`], legacy key names are folded into their current
//! names, and the result is shared read-only by every stream.

use crate::error::{Error, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Map, Value};
use std::fmt;
use std::path::Path;

// ============================================================================
// Source Config
// ============================================================================

/// Typed connector configuration
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SourceConfig {
    /// API key sent as `Authorization: OAuth <api_key>`
    #[serde(default)]
    pub api_key: Option<String>,

    /// State id filter (regions)
    #[serde(default, deserialize_with = "string_or_number")]
    pub state: Option<String>,

    /// Legacy name for `state`
    #[serde(default, deserialize_with = "string_or_number")]
    pub state_id: Option<String>,

    /// Two-letter state abbreviation filter (regions)
    #[serde(default, deserialize_with = "string_or_number")]
    pub state_abbr: Option<String>,

    #[serde(default, deserialize_with = "string_or_number")]
    pub county: Option<String>,

    #[serde(default, deserialize_with = "string_or_number")]
    pub county_name: Option<String>,

    #[serde(default, deserialize_with = "string_or_number")]
    pub municipality: Option<String>,

    #[serde(default, deserialize_with = "string_or_number")]
    pub municipality_name: Option<String>,

    #[serde(default, deserialize_with = "string_or_number")]
    pub municipality_type: Option<String>,

    #[serde(default, deserialize_with = "string_or_number")]
    pub region_name: Option<String>,

    /// Region filter (offices)
    #[serde(default, deserialize_with = "string_or_number")]
    pub region_id: Option<String>,

    /// Office id, filled from `office_id` during normalization
    #[serde(default, deserialize_with = "string_or_number")]
    pub office: Option<String>,

    /// Office filter (officials)
    #[serde(default, deserialize_with = "string_or_number")]
    pub office_id: Option<String>,

    /// Office type filter (officials)
    #[serde(default, deserialize_with = "string_or_number")]
    pub office_type: Option<String>,
}

impl SourceConfig {
    /// Create a config holding only an API key
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Parse and normalize a config from a JSON value
    pub fn from_value(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::config("Config must be a JSON object"));
        }
        let config: Self = serde_json::from_value(value.clone())
            .map_err(|e| Error::config(format!("Invalid config: {e}")))?;
        Ok(config.normalize())
    }

    /// Fold legacy key names into their current names
    ///
    /// `state_id` overrides `state` and `office_id` overrides `office`. The
    /// legacy fields are kept as they are.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if let Some(state_id) = &self.state_id {
            self.state = Some(state_id.clone());
        }
        if let Some(office_id) = &self.office_id {
            self.office = Some(office_id.clone());
        }
        self
    }

    /// The API key, or a missing-field error
    pub fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| Error::missing_field("api_key"))
    }

    /// Look up a filter value by its config key
    pub fn get(&self, key: &str) -> Option<&str> {
        let value = match key {
            "api_key" => &self.api_key,
            "state" => &self.state,
            "state_id" => &self.state_id,
            "state_abbr" => &self.state_abbr,
            "county" => &self.county,
            "county_name" => &self.county_name,
            "municipality" => &self.municipality,
            "municipality_name" => &self.municipality_name,
            "municipality_type" => &self.municipality_type,
            "region_name" => &self.region_name,
            "region_id" => &self.region_id,
            "office" => &self.office,
            "office_id" => &self.office_id,
            "office_type" => &self.office_type,
            _ => return None,
        };
        value.as_deref()
    }
}

impl fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("SourceConfig");
        out.field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"));
        for field in CONFIG_FIELDS.iter().filter(|f| !f.secret) {
            if let Some(value) = self.get(field.name) {
                out.field(field.name, &value);
            }
        }
        out.finish()
    }
}

/// Accept strings and numbers for filter values
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}

// ============================================================================
// Config Spec
// ============================================================================

/// Configuration field definition
#[derive(Debug, Clone, Copy)]
pub struct ConfigField {
    pub name: &'static str,
    pub title: &'static str,
    pub required: bool,
    pub secret: bool,
    pub description: &'static str,
}

const fn filter(name: &'static str, title: &'static str, description: &'static str) -> ConfigField {
    ConfigField {
        name,
        title,
        required: false,
        secret: false,
        description,
    }
}

/// Every key the connector understands, in display order
pub const CONFIG_FIELDS: &[ConfigField] = &[
    ConfigField {
        name: "api_key",
        title: "API Key",
        required: true,
        secret: true,
        description: "US Vote Foundation API key, sent as an OAuth authorization header",
    },
    filter("state", "State", "Restrict regions to a state id"),
    filter("state_id", "State ID", "Deprecated alias for state"),
    filter("state_abbr", "State Abbreviation", "Restrict regions to a state abbreviation"),
    filter("county", "County", "Restrict regions to a county id"),
    filter("county_name", "County Name", "Restrict regions to a county name"),
    filter("municipality", "Municipality", "Restrict regions to a municipality id"),
    filter("municipality_name", "Municipality Name", "Restrict regions to a municipality name"),
    filter("municipality_type", "Municipality Type", "Restrict regions to a municipality type"),
    filter("region_name", "Region Name", "Restrict regions to a region name"),
    filter("region_id", "Region ID", "Restrict offices to a region"),
    filter("office_id", "Office ID", "Restrict officials to an office"),
    filter("office_type", "Office Type", "Restrict officials to an office type"),
];

/// JSON Schema describing the configuration object
pub fn connection_specification() -> Value {
    let mut properties = Map::new();
    for (order, field) in CONFIG_FIELDS.iter().enumerate() {
        let mut property = json!({
            "type": "string",
            "title": field.title,
            "description": field.description,
            "order": order,
        });
        if field.secret {
            property["airbyte_secret"] = Value::Bool(true);
        }
        properties.insert(field.name.to_string(), property);
    }

    let required: Vec<&str> = CONFIG_FIELDS
        .iter()
        .filter(|f| f.required)
        .map(|f| f.name)
        .collect();

    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "US Vote Foundation Source Spec",
        "type": "object",
        "required": required,
        "additionalProperties": true,
        "properties": properties,
    })
}

/// Parse a config JSON document and validate it
///
/// The document is returned as given so that connector operations see
/// exactly what the user supplied; a config that [`SourceConfig::from_value`]
/// rejects fails here.
pub fn parse_config_json(json: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?;
    SourceConfig::from_value(&value)?;
    Ok(value)
}

/// Read a config file, see [`parse_config_json`]
pub fn read_config_file<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read config file {}: {e}",
            path.display()
        ))
    })?;
    parse_config_json(&content)
}
