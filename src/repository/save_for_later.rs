use std::sync::Arc;

use crate::auth::BearerToken;
use crate::error::ApiError;
use crate::models::{Ack, CustomResponse, SaveForLaterEntry};
use crate::traits::{RemoteApi, TokenProvider};

/// Save-for-later CRUD for the signed-in user
#[derive(Clone)]
pub struct SaveForLaterRepository {
    remote: Arc<dyn RemoteApi>,
    tokens: Arc<dyn TokenProvider>,
}

impl SaveForLaterRepository {
    pub fn new(remote: Arc<dyn RemoteApi>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self { remote, tokens }
    }

    /// Fetches saved items, recovering structured fields from legacy descriptions.
    pub async fn get(&self) -> Result<CustomResponse<Vec<SaveForLaterEntry>>, ApiError> {
        let bearer = BearerToken::fetch(self.tokens.as_ref()).await?;
        let mut response = self.remote.get_save_for_later(bearer.as_str()).await?;
        response.data = response
            .data
            .map(|entries| entries.into_iter().map(SaveForLaterEntry::normalized).collect());
        Ok(response)
    }

    pub async fn add(&self, entry: &SaveForLaterEntry) -> Result<Ack, ApiError> {
        let bearer = BearerToken::fetch(self.tokens.as_ref()).await?;
        self.remote.add_save_for_later(bearer.as_str(), entry).await
    }

    pub async fn remove(&self, product_name: &str) -> Result<Ack, ApiError> {
        let bearer = BearerToken::fetch(self.tokens.as_ref()).await?;
        self.remote
            .remove_save_for_later(bearer.as_str(), product_name)
            .await
    }
}
