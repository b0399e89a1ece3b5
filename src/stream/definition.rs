//! Static stream definitions
//!
//! The four entities share one fetch loop and differ only in the data below.

use crate::error::{Error, Result};
use std::fmt;

/// Description of one API entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamDefinition {
    /// Stream name shown in the catalog
    pub name: &'static str,
    /// Root path relative to the API base URL
    pub path: &'static str,
    /// Config keys forwarded as query parameters on the first request
    pub allowed_params: &'static [&'static str],
    /// Identifying field of each record
    pub primary_key: &'static str,
}

pub static STATES: StreamDefinition = StreamDefinition {
    name: "states",
    path: "states",
    allowed_params: &[],
    primary_key: "id",
};

pub static REGIONS: StreamDefinition = StreamDefinition {
    name: "regions",
    path: "regions",
    allowed_params: &[
        "state",
        "state_abbr",
        "county",
        "county_name",
        "municipality",
        "municipality_name",
        "municipality_type",
        "region_name",
    ],
    primary_key: "id",
};

pub static OFFICES: StreamDefinition = StreamDefinition {
    name: "offices",
    path: "offices",
    allowed_params: &["region_id"],
    primary_key: "id",
};

pub static OFFICIALS: StreamDefinition = StreamDefinition {
    name: "officials",
    path: "officials",
    allowed_params: &["office_id", "office_type"],
    primary_key: "id",
};

/// The entities exposed by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    States,
    Regions,
    Offices,
    Officials,
}

impl EntityKind {
    /// All entities in catalog order
    pub const ALL: [EntityKind; 4] = [
        EntityKind::States,
        EntityKind::Regions,
        EntityKind::Offices,
        EntityKind::Officials,
    ];

    /// The static definition for this entity
    pub fn definition(self) -> &'static StreamDefinition {
        match self {
            EntityKind::States => &STATES,
            EntityKind::Regions => &REGIONS,
            EntityKind::Offices => &OFFICES,
            EntityKind::Officials => &OFFICIALS,
        }
    }

    /// Stream name
    pub fn name(self) -> &'static str {
        self.definition().name
    }

    /// Parse a stream name (case-insensitive)
    pub fn from_name(name: &str) -> Result<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::stream_not_found(name))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
