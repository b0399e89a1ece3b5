//! Entity streams
//!
//! States, regions, offices and officials are read by the same
//! [`EntityStream`], parameterized by a static [`StreamDefinition`].

mod definition;
mod entity;

pub use definition::{EntityKind, StreamDefinition, OFFICES, OFFICIALS, REGIONS, STATES};
pub use entity::{EntityStream, RecordStream};

#[cfg(test)]
mod tests;
