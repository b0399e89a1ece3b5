//! Response decoder module
//!
//! # Overview
//!
//! Pages wrap their records in a container array (`objects`). A decoder
//! unwraps that container into a flat list of records, treating a missing
//! container as an empty page.

mod decoders;
mod types;

pub use decoders::{ContainerDecoder, RECORDS_FIELD};
pub use types::RecordDecoder;
