//! Pagination types
//!
//! Defines the outcome of inspecting one page and the per-stream state
//! machine driven by it.

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available at this path (relative to the base URL)
    Continue {
        /// Path of the next page, query string included
        path: String,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Create a continuation to the given path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self::Continue { path: path.into() }
    }

    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Pagination state of one stream
///
/// Starts in `Fetching` with no token, so the first request is always made.
/// Once `Done` it stays `Done`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationState {
    /// A request is due; `Some` carries the path from the previous page
    Fetching(Option<String>),
    /// The last page has been seen
    Done,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new()
    }
}

impl PaginationState {
    /// Initial state: fetch the entity root path
    pub fn new() -> Self {
        Self::Fetching(None)
    }

    /// Token for the next request, if any
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Fetching(token) => token.as_deref(),
            Self::Done => None,
        }
    }

    /// Is pagination complete?
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Move to the state implied by the page just fetched
    pub fn advance(&mut self, next: NextPage) {
        if self.is_done() {
            return;
        }
        *self = match next {
            NextPage::Continue { path } => Self::Fetching(Some(path)),
            NextPage::Done => Self::Done,
        };
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        *self = Self::Done;
    }
}
