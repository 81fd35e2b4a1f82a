//! Data models for products, watchlist and save-for-later entries, and the
//! backend response envelope

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product listing as returned by the search and watchlist endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: String,
    #[serde(default)]
    pub platform_name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub last_known_price: f64,
    #[serde(default)]
    pub deep_link: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<String>,
    /// ISO-8601 instant after which a watched product is considered expired
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch_end_date: Option<String>,
}

impl Product {
    /// Percentage drop from the last known price, truncated toward zero.
    ///
    /// Returns 0 when no last known price is available.
    pub fn discount_percentage(&self) -> i64 {
        if self.last_known_price > 0.0 {
            ((self.last_known_price - self.price) * 100.0 / self.last_known_price) as i64
        } else {
            0
        }
    }
}

/// A product on the user's watchlist
#[derive(Debug, Clone, PartialEq)]
pub struct WatchListEntry {
    pub product_name: String,
    pub deep_link: String,
    pub image_url: String,
    pub watch_end: Option<DateTime<Utc>>,
}

impl WatchListEntry {
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_name: product.name.clone(),
            deep_link: product.deep_link.clone(),
            image_url: product.image_url.clone(),
            watch_end: product.watch_end_date.as_deref().and_then(parse_watch_end),
        }
    }
}

/// Parses a watch-end date. Accepts RFC 3339, a naive date-time, or a bare date
/// (interpreted as midnight UTC). Anything else yields `None`.
pub fn parse_watch_end(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// An item the user saved for later.
///
/// Older backend records only carry `description`, with platform, price and link
/// written into it as `Platform: ...`, `Price: ...`, `Link: ...` lines.
/// [`SaveForLaterEntry::normalized`] recovers those fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveForLaterEntry {
    pub product_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_link: Option<String>,
}

impl SaveForLaterEntry {
    /// Builds a structured entry from a product, keeping the legacy description
    /// populated for clients that still read it.
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_name: product.name.clone(),
            image_url: Some(product.image_url.clone()).filter(|url| !url.is_empty()),
            description: format!(
                "Platform: {}\nPrice: {}\nLink: {}",
                product.platform_name, product.price, product.deep_link
            ),
            platform: Some(product.platform_name.clone()),
            price: Some(product.price),
            deep_link: Some(product.deep_link.clone()),
        }
    }

    /// Fills missing structured fields from the legacy description.
    pub fn normalized(mut self) -> Self {
        for line in self.description.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.trim().to_ascii_lowercase().as_str() {
                "platform" if self.platform.is_none() => self.platform = Some(value.to_string()),
                "price" if self.price.is_none() => self.price = parse_price(value),
                "link" | "deep link" | "deeplink" if self.deep_link.is_none() => {
                    self.deep_link = Some(value.to_string());
                }
                _ => {}
            }
        }
        self
    }
}

/// Extracts a numeric price from text such as `"₹21,999"` or `"21999.50"`.
pub fn parse_price(raw: &str) -> Option<f64> {
    let digits: String = raw
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .filter(|c| *c != ',')
        .collect();
    digits.parse().ok()
}

/// Uniform response wrapper returned by every backend endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

/// Envelope for endpoints whose payload is ignored (acknowledgements)
pub type Ack = CustomResponse<serde_json::Value>;

impl<T> CustomResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}
