//! In-memory fakes for the external collaborators

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::{Ack, CustomResponse, Product, SaveForLaterEntry};
use crate::traits::{RemoteApi, TokenProvider};

pub fn product(name: &str, platform: &str, price: f64, last_known_price: f64) -> Product {
    Product {
        name: name.to_string(),
        platform_name: platform.to_string(),
        price,
        last_known_price,
        deep_link: format!("https://{}.example/{}", platform.to_lowercase(), name.replace(' ', "-")),
        image_url: format!("https://img.example/{}.png", name.replace(' ', "-")),
        discount: None,
        watch_end_date: None,
    }
}

/// Backend double that keeps watchlist and saved items in memory
#[derive(Default)]
pub struct FakeRemote {
    pub search_results: Mutex<Vec<Product>>,
    pub watchlist: Mutex<Vec<Product>>,
    pub saved: Mutex<Vec<SaveForLaterEntry>>,
    /// Returned by the next call instead of touching state
    pub fail_next: Mutex<Option<ApiError>>,
    /// Returned as a `success: false` envelope by the next call
    pub reject_next: Mutex<Option<String>>,
    pub bearers: Mutex<Vec<String>>,
    pub calls: Mutex<Vec<String>>,
    pub deleted_users: Mutex<u32>,
}

impl FakeRemote {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail_next(&self, err: ApiError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    pub fn reject_next(&self, message: &str) {
        *self.reject_next.lock().unwrap() = Some(message.to_string());
    }

    fn enter<T>(&self, call: &str, bearer: Option<&str>) -> Option<Result<CustomResponse<T>, ApiError>> {
        self.calls.lock().unwrap().push(call.to_string());
        if let Some(bearer) = bearer {
            self.bearers.lock().unwrap().push(bearer.to_string());
        }
        if let Some(err) = self.fail_next.lock().unwrap().take() {
            return Some(Err(err));
        }
        self.reject_next
            .lock()
            .unwrap()
            .take()
            .map(|message| Ok(CustomResponse::failure(message)))
    }

    fn ack() -> Ack {
        CustomResponse {
            success: true,
            message: None,
            data: None,
        }
    }
}

#[async_trait]
impl RemoteApi for FakeRemote {
    async fn verify_token(&self, token: &str) -> Result<Ack, ApiError> {
        if let Some(early) = self.enter("verify_token", None) {
            return early;
        }
        if token == "valid" {
            Ok(Self::ack())
        } else {
            Ok(CustomResponse::failure("Invalid token"))
        }
    }

    async fn search(&self, query: &str) -> Result<CustomResponse<Vec<Product>>, ApiError> {
        if let Some(early) = self.enter(&format!("search:{query}"), None) {
            return early;
        }
        let needle = query.to_lowercase();
        let hits = self
            .search_results
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Ok(CustomResponse::ok(hits))
    }

    async fn get_watchlist(&self, bearer: &str) -> Result<CustomResponse<Vec<Product>>, ApiError> {
        if let Some(early) = self.enter("get_watchlist", Some(bearer)) {
            return early;
        }
        Ok(CustomResponse::ok(self.watchlist.lock().unwrap().clone()))
    }

    async fn add_to_watchlist(
        &self,
        bearer: &str,
        product: &Product,
    ) -> Result<CustomResponse<Product>, ApiError> {
        if let Some(early) = self.enter("add_to_watchlist", Some(bearer)) {
            return early;
        }
        self.watchlist.lock().unwrap().push(product.clone());
        Ok(CustomResponse::ok(product.clone()))
    }

    async fn remove_from_watchlist(&self, bearer: &str, product_name: &str) -> Result<Ack, ApiError> {
        if let Some(early) = self.enter(&format!("remove_from_watchlist:{product_name}"), Some(bearer)) {
            return early;
        }
        self.watchlist.lock().unwrap().retain(|p| p.name != product_name);
        Ok(Self::ack())
    }

    async fn clear_watchlist(&self, bearer: &str) -> Result<Ack, ApiError> {
        if let Some(early) = self.enter("clear_watchlist", Some(bearer)) {
            return early;
        }
        self.watchlist.lock().unwrap().clear();
        Ok(Self::ack())
    }

    async fn get_save_for_later(
        &self,
        bearer: &str,
    ) -> Result<CustomResponse<Vec<SaveForLaterEntry>>, ApiError> {
        if let Some(early) = self.enter("get_save_for_later", Some(bearer)) {
            return early;
        }
        Ok(CustomResponse::ok(self.saved.lock().unwrap().clone()))
    }

    async fn add_save_for_later(&self, bearer: &str, entry: &SaveForLaterEntry) -> Result<Ack, ApiError> {
        if let Some(early) = self.enter("add_save_for_later", Some(bearer)) {
            return early;
        }
        self.saved.lock().unwrap().push(entry.clone());
        Ok(Self::ack())
    }

    async fn remove_save_for_later(&self, bearer: &str, product_name: &str) -> Result<Ack, ApiError> {
        if let Some(early) = self.enter(&format!("remove_save_for_later:{product_name}"), Some(bearer)) {
            return early;
        }
        self.saved.lock().unwrap().retain(|e| e.product_name != product_name);
        Ok(Self::ack())
    }

    async fn delete_user(&self, bearer: &str) -> Result<CustomResponse<String>, ApiError> {
        if let Some(early) = self.enter("delete_user", Some(bearer)) {
            return early;
        }
        *self.deleted_users.lock().unwrap() += 1;
        Ok(CustomResponse::ok("User deleted".to_string()))
    }
}

/// Token provider that hands out a numbered token per call
#[derive(Default)]
pub struct CountingTokens {
    pub issued: Mutex<u32>,
}

#[async_trait]
impl TokenProvider for CountingTokens {
    async fn id_token(&self) -> Result<String, ApiError> {
        let mut issued = self.issued.lock().unwrap();
        *issued += 1;
        Ok(format!("token-{}", *issued))
    }
}
