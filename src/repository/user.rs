use std::sync::Arc;

use tracing::warn;

use crate::auth::BearerToken;
use crate::error::ApiError;
use crate::models::CustomResponse;
use crate::traits::{RemoteApi, TokenProvider};

/// Account management
#[derive(Clone)]
pub struct UserRepository {
    remote: Arc<dyn RemoteApi>,
    tokens: Arc<dyn TokenProvider>,
}

impl UserRepository {
    pub fn new(remote: Arc<dyn RemoteApi>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self { remote, tokens }
    }

    /// Permanently deletes the signed-in user's account.
    pub async fn delete_user(&self) -> Result<CustomResponse<String>, ApiError> {
        let bearer = BearerToken::fetch(self.tokens.as_ref()).await?;
        warn!("Deleting user account");
        self.remote.delete_user(bearer.as_str()).await
    }
}
