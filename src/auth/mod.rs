//! Authentication module
//!
//! The API authenticates every request with a static key carried in the
//! `Authorization` header using the `OAuth` scheme.

mod types;

pub use types::{AuthConfig, AUTHORIZATION_HEADER, OAUTH_PREFIX};

#[cfg(test)]
mod tests;
