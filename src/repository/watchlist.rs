use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::info;

use crate::auth::BearerToken;
use crate::error::ApiError;
use crate::models::{Ack, CustomResponse, Product};
use crate::traits::{RemoteApi, TokenProvider};
use crate::watch_duration::WatchDuration;

/// Watchlist CRUD for the signed-in user
#[derive(Clone)]
pub struct WatchlistRepository {
    remote: Arc<dyn RemoteApi>,
    tokens: Arc<dyn TokenProvider>,
}

impl WatchlistRepository {
    pub fn new(remote: Arc<dyn RemoteApi>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self { remote, tokens }
    }

    async fn bearer(&self) -> Result<BearerToken, ApiError> {
        BearerToken::fetch(self.tokens.as_ref()).await
    }

    pub async fn get(&self) -> Result<CustomResponse<Vec<Product>>, ApiError> {
        let bearer = self.bearer().await?;
        self.remote.get_watchlist(bearer.as_str()).await
    }

    /// Adds `product`, watched for `duration` starting at `now`.
    pub async fn add(
        &self,
        product: &Product,
        duration: WatchDuration,
        now: DateTime<Utc>,
    ) -> Result<CustomResponse<Product>, ApiError> {
        let end = duration.end_time(now);
        let mut product = product.clone();
        product.watch_end_date = Some(end.to_rfc3339_opts(SecondsFormat::Secs, true));

        info!(
            "Watching {} for {} (until {})",
            product.name,
            duration.label(),
            end
        );
        let bearer = self.bearer().await?;
        self.remote.add_to_watchlist(bearer.as_str(), &product).await
    }

    pub async fn remove(&self, product_name: &str) -> Result<Ack, ApiError> {
        let bearer = self.bearer().await?;
        self.remote
            .remove_from_watchlist(bearer.as_str(), product_name)
            .await
    }

    pub async fn clear(&self) -> Result<Ack, ApiError> {
        let bearer = self.bearer().await?;
        self.remote.clear_watchlist(bearer.as_str()).await
    }
}
