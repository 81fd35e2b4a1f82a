//! Client library for a shopping-deal tracker: product search across e-commerce
//! platforms, a watchlist with expiry, save-for-later, and product suggestions
//! from a generative text model.

pub mod auth;
pub mod config;
pub mod deal_tracker;
pub mod error;
pub mod models;
pub mod navigation;
pub mod remote;
pub mod repository;
pub mod settings;
pub mod suggestion;
pub mod telemetry;
pub mod traits;
pub mod ui_state;
pub mod viewmodel;
pub mod watch_duration;

#[cfg(test)]
mod testing;

pub use deal_tracker::DealTracker;
