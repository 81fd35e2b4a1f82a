//! # Backend REST Client
//!
//! [`HttpRemote`] implements [`RemoteApi`] over `reqwest`. Every call is a single
//! request-response exchange: no retries, no backoff, and the transport's default
//! timeout.
//!
//! ## Failure Mapping
//!
//! - Connection/DNS failure: [`ApiError::NoInternet`]
//! - Non-2xx status: [`ApiError::Server`]
//! - Body that is not a valid envelope: [`ApiError::Decode`]
//!
//! A 2xx response with `success: false` is *not* an error at this layer; the
//! envelope is returned as-is.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::models::{Ack, CustomResponse, Product, SaveForLaterEntry};
use crate::traits::RemoteApi;

/// HTTP implementation of the backend API
#[derive(Clone)]
pub struct HttpRemote {
    client: Client,
    base_url: String,
}

impl HttpRemote {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("deal-tracker/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<CustomResponse<T>, ApiError> {
        debug!(endpoint, "Sending backend request");

        let response = request.send().await.map_err(|e| {
            let err = ApiError::from(e);
            warn!(endpoint, error = %err, "Backend request failed");
            err
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint, status = status.as_u16(), "Backend returned error status");
            return Err(ApiError::Server {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let envelope: CustomResponse<T> = serde_json::from_str(&body)?;
        debug!(endpoint, success = envelope.success, "Backend response decoded");
        Ok(envelope)
    }
}

#[async_trait]
impl RemoteApi for HttpRemote {
    async fn verify_token(&self, token: &str) -> Result<Ack, ApiError> {
        let url = self.url(&format!("/api/auth?token={}", urlencoding::encode(token)));
        self.send(self.client.get(url), "verify_token").await
    }

    async fn search(&self, query: &str) -> Result<CustomResponse<Vec<Product>>, ApiError> {
        let url = self.url(&format!("/micro/v1/search?q={}", urlencoding::encode(query)));
        self.send(self.client.get(url), "search").await
    }

    async fn get_watchlist(
        &self,
        bearer: &str,
    ) -> Result<CustomResponse<Vec<Product>>, ApiError> {
        let request = self
            .client
            .get(self.url("/watchlist"))
            .header(reqwest::header::AUTHORIZATION, bearer);
        self.send(request, "get_watchlist").await
    }

    async fn add_to_watchlist(
        &self,
        bearer: &str,
        product: &Product,
    ) -> Result<CustomResponse<Product>, ApiError> {
        let request = self
            .client
            .post(self.url("/watchlist"))
            .header(reqwest::header::AUTHORIZATION, bearer)
            .json(product);
        self.send(request, "add_to_watchlist").await
    }

    async fn remove_from_watchlist(
        &self,
        bearer: &str,
        product_name: &str,
    ) -> Result<Ack, ApiError> {
        let url = self.url(&format!("/watchlist/{}", urlencoding::encode(product_name)));
        let request = self
            .client
            .delete(url)
            .header(reqwest::header::AUTHORIZATION, bearer);
        self.send(request, "remove_from_watchlist").await
    }

    async fn clear_watchlist(&self, bearer: &str) -> Result<Ack, ApiError> {
        let request = self
            .client
            .delete(self.url("/watchlist/clear"))
            .header(reqwest::header::AUTHORIZATION, bearer);
        self.send(request, "clear_watchlist").await
    }

    async fn get_save_for_later(
        &self,
        bearer: &str,
    ) -> Result<CustomResponse<Vec<SaveForLaterEntry>>, ApiError> {
        let request = self
            .client
            .get(self.url("/saveforLater"))
            .header(reqwest::header::AUTHORIZATION, bearer);
        self.send(request, "get_save_for_later").await
    }

    async fn add_save_for_later(
        &self,
        bearer: &str,
        entry: &SaveForLaterEntry,
    ) -> Result<Ack, ApiError> {
        let request = self
            .client
            .post(self.url("/saveforLater"))
            .header(reqwest::header::AUTHORIZATION, bearer)
            .json(entry);
        self.send(request, "add_save_for_later").await
    }

    async fn remove_save_for_later(
        &self,
        bearer: &str,
        product_name: &str,
    ) -> Result<Ack, ApiError> {
        let url = self.url(&format!("/saveforLater/{}", urlencoding::encode(product_name)));
        let request = self
            .client
            .delete(url)
            .header(reqwest::header::AUTHORIZATION, bearer);
        self.send(request, "remove_save_for_later").await
    }

    async fn delete_user(&self, bearer: &str) -> Result<CustomResponse<String>, ApiError> {
        let request = self
            .client
            .delete(self.url("/users/delete"))
            .header(reqwest::header::AUTHORIZATION, bearer);
        self.send(request, "delete_user").await
    }
}
