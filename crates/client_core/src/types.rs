use shared::{domain::PageResult, protocol::SearchRequest};

use crate::error::SearchError;

/// The tuple of search term, page number, and page size that fully
/// determines a requested result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    pub page_number: u32,
    pub page_size: u32,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>, page_number: u32, page_size: u32) -> Self {
        Self {
            term: term.into(),
            page_number: page_number.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn to_request(&self) -> SearchRequest {
        SearchRequest {
            name: self.term.clone(),
            page: self.page_number,
            limit: self.page_size,
        }
    }
}

/// Derived request-lifecycle state exposed to the rendering layer. Always one
/// of these values; never absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No fetch has been issued yet.
    Idle,
    /// A request is in flight and no result exists for any query yet.
    Loading,
    /// A request is in flight while the previous result is still shown.
    Refetching,
    Success,
    /// Success with zero items.
    Empty,
    /// The current request failed and there is nothing to show.
    Error,
    /// A refetch failed; the prior result remains visible.
    RefetchError,
}

/// Options for a triggered fetch.
///
/// With `cancel_previous` an in-flight request is superseded: its eventual
/// resolution is discarded. Without it, a trigger while a request is in
/// flight is deduplicated and no new request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub cancel_previous: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            cancel_previous: true,
        }
    }
}

/// Point-in-time view of the controller for the rendering layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSnapshot {
    pub status: Status,
    pub query: SearchQuery,
    pub data: Option<PageResult>,
    pub error: Option<SearchError>,
    /// True while the retained result belongs to a query other than the
    /// current one (the stale-while-refetch window).
    pub is_previous_data: bool,
}

#[derive(Debug, Clone)]
pub enum ControllerEvent {
    FetchStarted {
        query: SearchQuery,
    },
    PageLoaded {
        query: SearchQuery,
        result: PageResult,
    },
    FetchFailed {
        query: SearchQuery,
        error: SearchError,
    },
}
