//! Pagination module
//!
//! The API paginates with an absolute "next" link in `meta.next`. Each
//! response either carries the link to the following page or `null` on the
//! last page.
//!
//! # Overview
//!
//! [`NextPathPaginator`] turns that link into a path relative to the API
//! base URL, and [`PaginationState`] tracks whether another request is due.

mod next_path;
mod types;

pub use next_path::NextPathPaginator;
pub use types::{NextPage, PaginationState};
