use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::PageResult,
    error::ApiError,
    protocol::{SearchRequest, SearchResponse},
};
use tracing::debug;
use url::Url;

use crate::{error::SearchError, CatalogSearch};

/// Reqwest-backed client for the catalog search endpoint.
#[derive(Debug)]
pub struct HttpCatalogClient {
    http: Client,
    base_url: String,
}

impl HttpCatalogClient {
    pub fn new(base_url: &str) -> Result<Self, SearchError> {
        let parsed = Url::parse(base_url)
            .map_err(|err| SearchError::Network(format!("invalid catalog url '{base_url}': {err}")))?;
        Ok(Self {
            http: Client::new(),
            base_url: parsed.to_string().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CatalogSearch for HttpCatalogClient {
    async fn search(&self, request: &SearchRequest) -> Result<PageResult, SearchError> {
        let response = self
            .http
            .get(format!("{}/products", self.base_url))
            .query(request)
            .send()
            .await
            .map_err(|err| SearchError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ApiError>().await {
                Ok(envelope) => envelope.to_string(),
                Err(_) => format!("catalog returned status {status}"),
            };
            return Err(SearchError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|err| SearchError::Network(format!("invalid catalog response: {err}")))?;
        debug!(
            items = body.products_data.len(),
            has_more = body.has_more,
            "catalog response decoded"
        );
        Ok(body.into_page_result())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
