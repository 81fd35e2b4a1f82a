//! Seams between the repositories and their external collaborators

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::{Ack, CustomResponse, Product, SaveForLaterEntry};

/// Backend REST surface, one method per endpoint.
///
/// Authenticated methods take the full `Authorization` header value
/// (`"Bearer <idToken>"`).
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// `GET /api/auth?token=`
    async fn verify_token(&self, token: &str) -> Result<Ack, ApiError>;

    /// `GET /micro/v1/search?q=`
    async fn search(&self, query: &str) -> Result<CustomResponse<Vec<Product>>, ApiError>;

    /// `GET /watchlist`
    async fn get_watchlist(&self, bearer: &str)
    -> Result<CustomResponse<Vec<Product>>, ApiError>;

    /// `POST /watchlist`
    async fn add_to_watchlist(
        &self,
        bearer: &str,
        product: &Product,
    ) -> Result<CustomResponse<Product>, ApiError>;

    /// `DELETE /watchlist/{productName}`
    async fn remove_from_watchlist(&self, bearer: &str, product_name: &str)
    -> Result<Ack, ApiError>;

    /// `DELETE /watchlist/clear`
    async fn clear_watchlist(&self, bearer: &str) -> Result<Ack, ApiError>;

    /// `GET /saveforLater`
    async fn get_save_for_later(
        &self,
        bearer: &str,
    ) -> Result<CustomResponse<Vec<SaveForLaterEntry>>, ApiError>;

    /// `POST /saveforLater`
    async fn add_save_for_later(
        &self,
        bearer: &str,
        entry: &SaveForLaterEntry,
    ) -> Result<Ack, ApiError>;

    /// `DELETE /saveforLater/{productName}`
    async fn remove_save_for_later(&self, bearer: &str, product_name: &str)
    -> Result<Ack, ApiError>;

    /// `DELETE /users/delete`
    async fn delete_user(&self, bearer: &str) -> Result<CustomResponse<String>, ApiError>;
}

/// Source of the current identity-provider credential.
///
/// Implementations must return a fresh id token on every call; repositories never
/// cache the result.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn id_token(&self) -> Result<String, ApiError>;
}

/// A generative text model that completes a single prompt
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ApiError>;
}
