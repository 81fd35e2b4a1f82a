//! Repositories, one per resource area.
//!
//! Each wraps the matching [`RemoteApi`](crate::traits::RemoteApi) calls, attaches a
//! freshly fetched bearer token where the endpoint needs one, and hands the
//! envelope back unchanged. None of them retry.

mod auth;
mod save_for_later;
mod search;
mod suggestion;
mod user;
mod watchlist;

pub use auth::AuthRepository;
pub use save_for_later::SaveForLaterRepository;
pub use search::SearchRepository;
pub use suggestion::SuggestionRepository;
pub use user::UserRepository;
pub use watchlist::WatchlistRepository;
