//! Catalog types
//!
//! The discovered catalog lists every stream the source offers; the
//! configured catalog is the subset selected for a read.

use crate::error::Result;
use crate::stream::EntityKind;
use crate::types::SyncMode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// ============================================================================
// Catalog Types
// ============================================================================

/// Discovered catalog (available streams)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Available streams
    pub streams: Vec<CatalogStream>,
}

impl Catalog {
    /// Catalog of every entity, in catalog order
    pub fn all() -> Self {
        Self {
            streams: EntityKind::ALL
                .into_iter()
                .map(CatalogStream::for_kind)
                .collect(),
        }
    }

    /// Stream names in catalog order
    pub fn stream_names(&self) -> Vec<&str> {
        self.streams.iter().map(|s| s.name.as_str()).collect()
    }

    /// Look up a stream by name
    pub fn get(&self, name: &str) -> Option<&CatalogStream> {
        self.streams.iter().find(|s| s.name == name)
    }
}

/// Stream in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStream {
    /// Stream name
    pub name: String,

    /// JSON schema for the stream
    #[serde(default)]
    pub json_schema: Value,

    /// Supported sync modes
    #[serde(default)]
    pub supported_sync_modes: Vec<SyncMode>,

    /// Source-defined primary key
    #[serde(default)]
    pub source_defined_primary_key: Option<Vec<Vec<String>>>,
}

impl CatalogStream {
    /// Catalog entry for one entity
    ///
    /// Records are passed through as the API returns them, so the schema is
    /// left open.
    pub fn for_kind(kind: EntityKind) -> Self {
        let definition = kind.definition();
        Self {
            name: definition.name.to_string(),
            json_schema: json!({
                "$schema": "http://json-schema.org/draft-07/schema#",
                "type": "object",
                "additionalProperties": true,
                "properties": {
                    (definition.primary_key): {"type": "integer"}
                }
            }),
            supported_sync_modes: vec![SyncMode::FullRefresh],
            source_defined_primary_key: Some(vec![vec![definition.primary_key.to_string()]]),
        }
    }
}

/// Configured catalog (selected streams for sync)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfiguredCatalog {
    /// Selected streams
    pub streams: Vec<ConfiguredStream>,
}

impl ConfiguredCatalog {
    /// Select every stream of `catalog`
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            streams: catalog
                .streams
                .iter()
                .cloned()
                .map(ConfiguredStream::new)
                .collect(),
        }
    }

    /// Select the named streams, in the order given
    ///
    /// Names are matched case-insensitively; an unknown name is an error.
    pub fn select<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let streams = names
            .iter()
            .map(|name| EntityKind::from_name(name.as_ref()))
            .map(|kind| kind.map(|k| ConfiguredStream::new(CatalogStream::for_kind(k))))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { streams })
    }

    /// Names of the selected streams
    pub fn stream_names(&self) -> Vec<&str> {
        self.streams.iter().map(|s| s.stream.name.as_str()).collect()
    }
}

/// Configured stream for sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfiguredStream {
    /// Stream reference
    pub stream: CatalogStream,

    /// Selected sync mode
    #[serde(default)]
    pub sync_mode: SyncMode,

    /// Primary key to use
    #[serde(default)]
    pub primary_key: Option<Vec<Vec<String>>>,
}

impl ConfiguredStream {
    /// Select a catalog stream with its default settings
    pub fn new(stream: CatalogStream) -> Self {
        let primary_key = stream.source_defined_primary_key.clone();
        Self {
            stream,
            sync_mode: SyncMode::FullRefresh,
            primary_key,
        }
    }
}
