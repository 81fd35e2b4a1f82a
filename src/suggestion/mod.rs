//! # Generative Product Suggestions
//!
//! Turns a free-text query into product listings by asking a [`TextModel`] for a
//! JSON document and parsing whatever it sends back.
//!
//! ## Parsing
//!
//! Models tend to wrap JSON in prose or code fences, so only the text between the
//! first `{` and the last `}` is parsed. The object must look like:
//!
//! ```json
//! { "products": [ { "name": "...", "platform": "...", "price": 21999,
//!                   "deepLink": "...", "imageUrl": "...", "discount": "8% off" } ] }
//! ```
//!
//! `price` may be a number or a string such as `"₹21,999"`.
//!
//! ## Failure Semantics
//!
//! [`SuggestionAdapter::try_suggest`] reports why nothing came back
//! ([`SuggestionError`]). [`SuggestionAdapter::suggest`] never fails and returns an
//! empty list instead.

pub mod gemini;

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::SuggestionError;
use crate::models::{Product, parse_price};
use crate::traits::TextModel;

pub use gemini::GeminiModel;

/// Product entry as emitted by the model
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedProduct {
    pub name: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub price: serde_json::Value,
    #[serde(default)]
    pub deep_link: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub discount: Option<String>,
}

impl SuggestedProduct {
    pub fn numeric_price(&self) -> Option<f64> {
        match &self.price {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => parse_price(s),
            _ => None,
        }
    }

    pub fn into_product(self) -> Product {
        let price = self.numeric_price().unwrap_or_default();
        Product {
            name: self.name,
            platform_name: self.platform,
            price,
            last_known_price: 0.0,
            deep_link: self.deep_link,
            image_url: self.image_url,
            discount: self.discount.filter(|d| !d.trim().is_empty()),
            watch_end_date: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SuggestionDocument {
    products: Vec<SuggestedProduct>,
}

/// Instruction sent to the model for `query`.
pub fn build_prompt(query: &str) -> String {
    format!(
        "You are a shopping assistant for Indian e-commerce platforms. \
         Find current listings for the product \"{query}\" on platforms such as \
         Amazon, Flipkart, Croma, Reliance Digital and Myntra. \
         Respond with exactly one JSON object and nothing else, using this schema: \
         {{\"products\": [{{\"name\": string, \"platform\": string, \"price\": number, \
         \"deepLink\": string, \"imageUrl\": string, \"discount\": string}}]}}. \
         Prices are in INR without currency symbols. \
         If nothing matches, respond with {{\"products\": []}}."
    )
}

/// Slice between the first `{` and the last `}`, if they are ordered.
pub fn extract_json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Parses raw model output into suggested products.
pub fn parse_suggestions(text: &str) -> Result<Vec<SuggestedProduct>, SuggestionError> {
    if text.trim().is_empty() {
        return Err(SuggestionError::EmptyResponse);
    }
    let block = extract_json_block(text).ok_or(SuggestionError::NoJsonObject)?;
    let document: SuggestionDocument = serde_json::from_str(block)
        .map_err(|e| SuggestionError::Malformed(e.to_string()))?;
    Ok(document.products)
}

/// Parses raw model output, returning an empty list on any failure.
pub fn parse_products(text: &str) -> Vec<Product> {
    parse_suggestions(text)
        .map(|items| items.into_iter().map(SuggestedProduct::into_product).collect())
        .unwrap_or_default()
}

/// Sorts by ascending price. Entries without a readable price go last.
pub fn sort_by_price(items: &mut [SuggestedProduct]) {
    items.sort_by(|a, b| match (a.numeric_price(), b.numeric_price()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Generative-suggestion adapter.
///
/// Each call sends one uncached request to the model.
#[derive(Clone)]
pub struct SuggestionAdapter {
    model: Option<Arc<dyn TextModel>>,
}

impl SuggestionAdapter {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model: Some(model) }
    }

    /// Adapter with no model configured; every call reports [`SuggestionError::Disabled`].
    pub fn disabled() -> Self {
        Self { model: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.model.is_some()
    }

    async fn fetch(&self, query: &str) -> Result<Vec<SuggestedProduct>, SuggestionError> {
        let model = self.model.as_ref().ok_or(SuggestionError::Disabled)?;

        info!("Requesting product suggestions for: {}", query);
        let text = model.complete(&build_prompt(query)).await?;
        debug!(chars = text.len(), "Model response received");

        let items = parse_suggestions(&text)?;
        info!("Model suggested {} products for: {}", items.len(), query);
        Ok(items)
    }

    pub async fn try_suggest(&self, query: &str) -> Result<Vec<Product>, SuggestionError> {
        let items = self.fetch(query).await?;
        Ok(items.into_iter().map(SuggestedProduct::into_product).collect())
    }

    /// Same listings as [`try_suggest`](Self::try_suggest), cheapest first.
    pub async fn try_compare_prices(&self, query: &str) -> Result<Vec<Product>, SuggestionError> {
        let mut items = self.fetch(query).await?;
        sort_by_price(&mut items);
        Ok(items.into_iter().map(SuggestedProduct::into_product).collect())
    }

    pub async fn suggest(&self, query: &str) -> Vec<Product> {
        self.try_suggest(query).await.unwrap_or_else(|e| {
            warn!(error = %e, "Suggestion failed, returning no products");
            Vec::new()
        })
    }

    pub async fn compare_prices(&self, query: &str) -> Vec<Product> {
        self.try_compare_prices(query).await.unwrap_or_else(|e| {
            warn!(error = %e, "Price comparison failed, returning no products");
            Vec::new()
        })
    }
}
