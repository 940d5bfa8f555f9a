use serde::{Deserialize, Serialize};

use crate::domain::{PageResult, Product};

/// Query-parameter shape accepted by the catalog search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub name: String,
    pub page: u32,
    pub limit: u32,
}

/// Response envelope returned by the catalog search endpoint. Field names
/// follow the service's camelCase wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub products_data: Vec<Product>,
    pub has_more: bool,
}

impl SearchResponse {
    pub fn into_page_result(self) -> PageResult {
        PageResult {
            items: self.products_data,
            has_more: self.has_more,
        }
    }
}
