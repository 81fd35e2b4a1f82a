use std::sync::Arc;

use tracing::info;

use crate::error::ApiError;
use crate::models::Ack;
use crate::traits::RemoteApi;

/// Verifies identity-provider tokens with the backend
#[derive(Clone)]
pub struct AuthRepository {
    remote: Arc<dyn RemoteApi>,
}

impl AuthRepository {
    pub fn new(remote: Arc<dyn RemoteApi>) -> Self {
        Self { remote }
    }

    pub async fn verify(&self, id_token: &str) -> Result<Ack, ApiError> {
        info!("Verifying sign-in token with backend");
        self.remote.verify_token(id_token).await
    }
}
