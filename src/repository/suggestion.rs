use crate::error::SuggestionError;
use crate::models::Product;
use crate::suggestion::SuggestionAdapter;

/// Product listings synthesized by the generative model
#[derive(Clone)]
pub struct SuggestionRepository {
    adapter: SuggestionAdapter,
}

impl SuggestionRepository {
    pub fn new(adapter: SuggestionAdapter) -> Self {
        Self { adapter }
    }

    pub fn is_enabled(&self) -> bool {
        self.adapter.is_enabled()
    }

    pub async fn suggest(&self, query: &str) -> Result<Vec<Product>, SuggestionError> {
        self.adapter.try_suggest(query.trim()).await
    }

    pub async fn compare_prices(&self, query: &str) -> Result<Vec<Product>, SuggestionError> {
        self.adapter.try_compare_prices(query.trim()).await
    }
}
