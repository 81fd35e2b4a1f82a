use anyhow::{Result, bail};
use tracing::{error, info, warn};

use deal_tracker::DealTracker;
use deal_tracker::config::Config;
use deal_tracker::models::Product;
use deal_tracker::ui_state::UiState;

fn log_products(label: &str, products: &[Product]) {
    for product in products {
        info!(
            "{label}: {} on {} - {} ({}% off)",
            product.name,
            product.platform_name,
            product.price,
            product.discount_percentage()
        );
    }
}

fn log_state(label: &str, state: &UiState<Vec<Product>>) {
    match state {
        UiState::Success(products) => log_products(label, products),
        UiState::NoData => info!("{label}: no results"),
        UiState::NoInternet => error!("{label}: no internet connection"),
        UiState::ServerError => error!("{label}: server error"),
        UiState::Error(message) => error!("{label}: {message}"),
        UiState::Idle | UiState::Loading => warn!("{label}: did not complete"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    deal_tracker::telemetry::init();

    let query = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if query.trim().is_empty() {
        bail!("usage: deal-tracker <product query>");
    }

    let config = Config::from_env();
    let tracker = DealTracker::new(&config)?;

    info!("Starting deal tracker search for: {}", query);

    tracker.search.search(&query).await;
    log_state("Search", &tracker.search.results_state());

    if tracker.search.suggestions_enabled() {
        tracker.search.compare_prices(&query).await;
        let comparison = tracker.search.comparison().borrow().clone();
        log_state("Price comparison", &comparison);
    }

    Ok(())
}
