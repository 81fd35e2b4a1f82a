use std::sync::Arc;

use tracing::{info, warn};

use crate::error::ApiError;
use crate::models::{CustomResponse, Product};
use crate::traits::RemoteApi;

/// Product search across platforms
#[derive(Clone)]
pub struct SearchRepository {
    remote: Arc<dyn RemoteApi>,
}

impl SearchRepository {
    pub fn new(remote: Arc<dyn RemoteApi>) -> Self {
        Self { remote }
    }

    /// Searches the backend for `query`.
    ///
    /// Transport failures (unreachable host, HTTP error status) are returned as
    /// errors so the caller can tell them apart. Anything else that goes wrong is
    /// folded into a `success: false` envelope.
    pub async fn search(&self, query: &str) -> Result<CustomResponse<Vec<Product>>, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(CustomResponse::failure("Enter a product name to search"));
        }

        info!("Searching for: {}", query);
        match self.remote.search(query).await {
            Ok(response) => {
                if let Some(products) = &response.data {
                    info!("Search for {} returned {} products", query, products.len());
                }
                Ok(response)
            }
            Err(e @ (ApiError::NoInternet(_) | ApiError::Server { .. })) => Err(e),
            Err(e) => {
                warn!(error = %e, "Search failed");
                Ok(CustomResponse::failure(format!("Search failed: {e}")))
            }
        }
    }
}
