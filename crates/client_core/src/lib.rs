use std::sync::Arc;

use async_trait::async_trait;
use shared::{domain::PageResult, protocol::SearchRequest};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

pub mod error;
pub mod transport;
pub mod types;

pub use error::SearchError;
pub use transport::HttpCatalogClient;
pub use types::{ControllerEvent, ControllerSnapshot, FetchOptions, SearchQuery, Status};

/// Grid size of the storefront; one fetched page fills it exactly.
pub const DEFAULT_PAGE_SIZE: u32 = 9;

/// The catalog search endpoint as the controller sees it: an opaque
/// asynchronous paginated-search function.
#[async_trait]
pub trait CatalogSearch: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<PageResult, SearchError>;
}

/// Inert stand-in used when no catalog backend has been wired up.
pub struct MissingCatalog;

#[async_trait]
impl CatalogSearch for MissingCatalog {
    async fn search(&self, request: &SearchRequest) -> Result<PageResult, SearchError> {
        Err(SearchError::Network(format!(
            "catalog backend unavailable for query '{}'",
            request.name
        )))
    }
}

/// Surface the rendering layer binds to: read the snapshot, mutate the query,
/// subscribe to change events. No other surface is required.
#[async_trait]
pub trait BrowseHandle: Send + Sync {
    async fn set_search_term(&self, term: &str);
    async fn set_page_number(&self, page: u32) -> bool;
    async fn next_page(&self) -> bool;
    async fn previous_page(&self) -> bool;
    async fn commit_search(&self) -> bool;
    async fn select_category(&self, category: &str) -> bool;
    async fn trigger_fetch(&self, options: FetchOptions) -> bool;
    async fn snapshot(&self) -> ControllerSnapshot;
    fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent>;
}

/// Owns the current query parameters, issues fetches against the catalog
/// endpoint, tracks request lifecycle, and exposes a derived status plus the
/// latest usable page to the rendering layer.
///
/// Correctness under racing responses hinges on request identity, not arrival
/// order: every issued fetch carries a generation token, and a resolution is
/// applied only while its token is still the most recently issued one.
pub struct QueryController {
    catalog: Arc<dyn CatalogSearch>,
    inner: Mutex<ControllerInner>,
    events: broadcast::Sender<ControllerEvent>,
}

struct ControllerInner {
    query: SearchQuery,
    /// Token of the most recently issued fetch.
    generation: u64,
    /// Token of the fetch whose resolution is still awaited, if any.
    in_flight: Option<u64>,
    data: Option<PageResult>,
    /// Query that produced `data`; diverges from `query` inside the
    /// stale-while-refetch window.
    data_query: Option<SearchQuery>,
    error: Option<SearchError>,
}

impl ControllerInner {
    fn status(&self) -> Status {
        if self.in_flight.is_some() {
            return if self.data.is_none() {
                Status::Loading
            } else {
                Status::Refetching
            };
        }
        if self.error.is_some() {
            return if self.data.is_none() {
                Status::Error
            } else {
                Status::RefetchError
            };
        }
        match &self.data {
            None => Status::Idle,
            Some(page) if page.items.is_empty() => Status::Empty,
            Some(_) => Status::Success,
        }
    }

    fn is_previous_data(&self) -> bool {
        self.data.is_some() && self.data_query.as_ref() != Some(&self.query)
    }

    fn can_advance(&self) -> bool {
        match &self.data {
            Some(page) => page.has_more && !self.is_previous_data(),
            None => false,
        }
    }

    fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            status: self.status(),
            query: self.query.clone(),
            data: self.data.clone(),
            error: self.error.clone(),
            is_previous_data: self.is_previous_data(),
        }
    }
}

impl QueryController {
    pub fn new(catalog: Arc<dyn CatalogSearch>) -> Arc<Self> {
        Self::with_page_size(catalog, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(catalog: Arc<dyn CatalogSearch>, page_size: u32) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            catalog,
            inner: Mutex::new(ControllerInner {
                query: SearchQuery::new("", 1, page_size),
                generation: 0,
                in_flight: None,
                data: None,
                data_query: None,
                error: None,
            }),
            events,
        })
    }

    /// Updates the search term and resets the page to 1. Deliberately does
    /// not fetch: one keystroke is one state update, one explicit commit is
    /// one fetch.
    pub async fn set_search_term(&self, term: &str) {
        let mut inner = self.inner.lock().await;
        inner.query.term = term.to_string();
        inner.query.page_number = 1;
    }

    /// Moves to `page` (clamped to 1) and fetches it. Page changes are always
    /// live, unlike free-text edits. Returns false when the move was rejected:
    /// same page, advancing past the end of results, or advancing while a
    /// prior page change is still resolving.
    pub async fn set_page_number(self: &Arc<Self>, page: u32) -> bool {
        let accepted = {
            let mut inner = self.inner.lock().await;
            let page = page.max(1);
            if page == inner.query.page_number {
                false
            } else if page > inner.query.page_number && !inner.can_advance() {
                debug!(
                    requested = page,
                    current = inner.query.page_number,
                    "rejecting page advance"
                );
                false
            } else {
                inner.query.page_number = page;
                true
            }
        };
        if accepted {
            self.trigger_fetch(FetchOptions::default()).await;
        }
        accepted
    }

    pub async fn next_page(self: &Arc<Self>) -> bool {
        let target = {
            let inner = self.inner.lock().await;
            inner.query.page_number.saturating_add(1)
        };
        self.set_page_number(target).await
    }

    pub async fn previous_page(self: &Arc<Self>) -> bool {
        let target = {
            let inner = self.inner.lock().await;
            inner.query.page_number.saturating_sub(1)
        };
        self.set_page_number(target).await
    }

    /// Whether next-page navigation is currently allowed.
    pub async fn can_advance(&self) -> bool {
        self.inner.lock().await.can_advance()
    }

    /// Whether previous-page navigation is currently allowed.
    pub async fn can_go_back(&self) -> bool {
        self.inner.lock().await.query.page_number > 1
    }

    /// Explicit submit action for the free-text term (Enter key or search
    /// control).
    pub async fn commit_search(self: &Arc<Self>) -> bool {
        self.trigger_fetch(FetchOptions::default()).await
    }

    /// Category shortcut: set the term and fetch immediately, bypassing the
    /// manual commit required for free-text edits.
    pub async fn select_category(self: &Arc<Self>, category: &str) -> bool {
        self.set_search_term(category).await;
        info!(category, "category shortcut selected");
        self.trigger_fetch(FetchOptions::default()).await
    }

    /// Issues a fetch for the current query. With `cancel_previous`, an
    /// in-flight request is superseded and its eventual resolution discarded;
    /// without it, a trigger while a request is in flight is deduplicated.
    /// Returns whether a new request was issued.
    pub async fn trigger_fetch(self: &Arc<Self>, options: FetchOptions) -> bool {
        let (query, token) = {
            let mut inner = self.inner.lock().await;
            if let Some(pending) = inner.in_flight {
                if !options.cancel_previous {
                    debug!(pending, "fetch already in flight, deduplicating");
                    return false;
                }
                debug!(superseded = pending, "superseding in-flight fetch");
            }
            inner.generation += 1;
            let token = inner.generation;
            inner.in_flight = Some(token);
            (inner.query.clone(), token)
        };

        debug!(
            term = %query.term,
            page = query.page_number,
            token,
            "issuing catalog fetch"
        );
        let _ = self.events.send(ControllerEvent::FetchStarted {
            query: query.clone(),
        });

        let controller = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = controller.catalog.search(&query.to_request()).await;
            controller.apply_outcome(token, query, outcome).await;
        });
        true
    }

    async fn apply_outcome(
        &self,
        token: u64,
        query: SearchQuery,
        outcome: Result<PageResult, SearchError>,
    ) {
        let event = {
            let mut inner = self.inner.lock().await;
            if token != inner.generation {
                debug!(
                    token,
                    current = inner.generation,
                    "dropping superseded catalog response"
                );
                return;
            }
            inner.in_flight = None;
            match outcome {
                Ok(result) => {
                    info!(
                        term = %query.term,
                        page = query.page_number,
                        items = result.items.len(),
                        has_more = result.has_more,
                        "catalog page loaded"
                    );
                    inner.error = None;
                    inner.data = Some(result.clone());
                    inner.data_query = Some(query.clone());
                    ControllerEvent::PageLoaded { query, result }
                }
                Err(error) => {
                    warn!(
                        term = %query.term,
                        page = query.page_number,
                        %error,
                        "catalog fetch failed"
                    );
                    inner.error = Some(error.clone());
                    ControllerEvent::FetchFailed { query, error }
                }
            }
        };
        let _ = self.events.send(event);
    }

    pub async fn status(&self) -> Status {
        self.inner.lock().await.status()
    }

    pub async fn snapshot(&self) -> ControllerSnapshot {
        self.inner.lock().await.snapshot()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }
}

#[async_trait]
impl BrowseHandle for Arc<QueryController> {
    async fn set_search_term(&self, term: &str) {
        QueryController::set_search_term(self, term).await;
    }

    async fn set_page_number(&self, page: u32) -> bool {
        QueryController::set_page_number(self, page).await
    }

    async fn next_page(&self) -> bool {
        QueryController::next_page(self).await
    }

    async fn previous_page(&self) -> bool {
        QueryController::previous_page(self).await
    }

    async fn commit_search(&self) -> bool {
        QueryController::commit_search(self).await
    }

    async fn select_category(&self, category: &str) -> bool {
        QueryController::select_category(self, category).await
    }

    async fn trigger_fetch(&self, options: FetchOptions) -> bool {
        QueryController::trigger_fetch(self, options).await
    }

    async fn snapshot(&self) -> ControllerSnapshot {
        QueryController::snapshot(self).await
    }

    fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        QueryController::subscribe_events(self)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
