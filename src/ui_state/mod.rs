//! # Screen State
//!
//! [`UiState`] is the single state type every screen renders. View-models move it
//! from `Loading` to exactly one terminal variant per operation, using
//! [`classify`] for read results and [`classify_ack`] for writes.
//!
//! [`StateHolder`] publishes the state to observers and fences completions by
//! request generation: when two loads overlap, only the one started last may
//! write its result. A load that is dropped before it finishes (its task was
//! aborted) puts the state back to `Idle` instead of leaving a spinner behind.

use std::sync::Mutex;

use tokio::sync::watch;
use tracing::debug;

use crate::error::{ApiError, SuggestionError};
use crate::models::{CustomResponse, Product};

const FALLBACK_ERROR: &str = "Something went wrong";

/// State of one screen-level operation
#[derive(Debug, Clone, PartialEq)]
pub enum UiState<T> {
    Idle,
    Loading,
    Success(T),
    NoData,
    NoInternet,
    ServerError,
    Error(String),
}

impl<T> UiState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Idle | Self::Loading)
    }

    /// Short lowercase label, used as a structured logging field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success(_) => "success",
            Self::NoData => "no_data",
            Self::NoInternet => "no_internet",
            Self::ServerError => "server_error",
            Self::Error(_) => "error",
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> UiState<U> {
        match self {
            Self::Idle => UiState::Idle,
            Self::Loading => UiState::Loading,
            Self::Success(data) => UiState::Success(f(data)),
            Self::NoData => UiState::NoData,
            Self::NoInternet => UiState::NoInternet,
            Self::ServerError => UiState::ServerError,
            Self::Error(message) => UiState::Error(message),
        }
    }

    /// Maps the state onto what the screen should draw.
    pub fn view(&self) -> View<'_, T> {
        match self {
            Self::Idle => View::Blank,
            Self::Loading => View::Spinner,
            Self::Success(data) => View::Content(data),
            Self::NoData => View::EmptyMessage("No results found"),
            Self::NoInternet => View::ErrorDialog {
                title: "No internet connection",
                message: "Check your connection and try again.".to_string(),
                retryable: true,
            },
            Self::ServerError => View::ErrorDialog {
                title: "Server error",
                message: "The server could not handle the request. Try again later.".to_string(),
                retryable: true,
            },
            Self::Error(message) => View::ErrorDialog {
                title: "Error",
                message: message.clone(),
                retryable: true,
            },
        }
    }

    /// Renders through `screen`; a retry from the error dialog calls `retry`.
    pub fn render<S: Screen<T>>(&self, screen: &mut S, retry: impl FnOnce()) {
        match self.view() {
            View::Blank => {}
            View::Spinner => screen.spinner(),
            View::Content(data) => screen.content(data),
            View::EmptyMessage(message) => screen.empty(message),
            View::ErrorDialog {
                title,
                message,
                retryable,
            } => {
                if screen.error_dialog(title, &message) && retryable {
                    retry();
                }
            }
        }
    }
}

/// What a screen draws for a given [`UiState`]
#[derive(Debug, Clone, PartialEq)]
pub enum View<'a, T> {
    Blank,
    Spinner,
    Content(&'a T),
    EmptyMessage(&'static str),
    ErrorDialog {
        title: &'static str,
        message: String,
        retryable: bool,
    },
}

/// Render callbacks for one screen
pub trait Screen<T> {
    fn spinner(&mut self);

    fn content(&mut self, data: &T);

    fn empty(&mut self, message: &str);

    /// Shows an error dialog. Returns `true` when the user asked to retry.
    fn error_dialog(&mut self, title: &str, message: &str) -> bool;
}

/// Emptiness check used to tell `Success` from `NoData`
pub trait Payload {
    fn is_empty_payload(&self) -> bool;
}

impl<T> Payload for Vec<T> {
    fn is_empty_payload(&self) -> bool {
        self.is_empty()
    }
}

impl Payload for String {
    fn is_empty_payload(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Payload for Product {
    fn is_empty_payload(&self) -> bool {
        false
    }
}

fn classify_error<T>(err: &ApiError) -> UiState<T> {
    match err {
        ApiError::NoInternet(_) => UiState::NoInternet,
        ApiError::Server { .. } => UiState::ServerError,
        other => {
            let message = other.to_string();
            if message.trim().is_empty() {
                UiState::Error(FALLBACK_ERROR.to_string())
            } else {
                UiState::Error(message)
            }
        }
    }
}

fn envelope_message(message: Option<String>) -> String {
    message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_ERROR.to_string())
}

/// Terminal state for a completed read.
pub fn classify<T: Payload>(result: Result<CustomResponse<T>, ApiError>) -> UiState<T> {
    match result {
        Ok(envelope) if envelope.success => match envelope.data {
            Some(data) if !data.is_empty_payload() => UiState::Success(data),
            _ => UiState::NoData,
        },
        Ok(envelope) => UiState::Error(envelope_message(envelope.message)),
        Err(err) => classify_error(&err),
    }
}

/// Terminal state for a completed write whose payload is irrelevant.
pub fn classify_ack<D>(result: Result<CustomResponse<D>, ApiError>) -> UiState<()> {
    match result {
        Ok(envelope) if envelope.success => UiState::Success(()),
        Ok(envelope) => UiState::Error(envelope_message(envelope.message)),
        Err(err) => classify_error(&err),
    }
}

/// Terminal state for a generative-suggestion call.
///
/// An empty product list is `NoData`; output the model produced but that could
/// not be parsed is reported as an error rather than an empty result.
pub fn classify_suggestions(result: Result<Vec<Product>, SuggestionError>) -> UiState<Vec<Product>> {
    match result {
        Ok(products) if products.is_empty() => UiState::NoData,
        Ok(products) => UiState::Success(products),
        Err(SuggestionError::Transport(err)) => classify_error(&err),
        Err(err) => UiState::Error(err.to_string()),
    }
}

/// Proof that a load was started; required to publish its result.
///
/// Dropping an unfinished ticket abandons the load.
#[must_use = "a dropped ticket abandons its load"]
pub struct Ticket<'a, T> {
    holder: &'a StateHolder<T>,
    generation: u64,
    settled: bool,
}

impl<T> Drop for Ticket<'_, T> {
    fn drop(&mut self) {
        if !self.settled {
            self.holder.abandon(self.generation);
        }
    }
}

/// Observable state container owned by one view-model
pub struct StateHolder<T> {
    tx: watch::Sender<UiState<T>>,
    generation: Mutex<u64>,
}

impl<T> Default for StateHolder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> StateHolder<T> {
    pub fn new() -> Self {
        Self {
            tx: watch::Sender::new(UiState::Idle),
            generation: Mutex::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState<T>> {
        self.tx.subscribe()
    }

    /// Moves to `Loading` and supersedes any load still in flight.
    pub fn begin(&self) -> Ticket<'_, T> {
        let mut generation = self.generation.lock().unwrap_or_else(|e| e.into_inner());
        *generation += 1;
        self.tx.send_replace(UiState::Loading);
        Ticket {
            holder: self,
            generation: *generation,
            settled: false,
        }
    }

    /// Publishes `state` unless a newer load has started since `ticket` was issued.
    /// Returns whether the state was applied.
    pub fn finish(&self, mut ticket: Ticket<'_, T>, state: UiState<T>) -> bool {
        ticket.settled = true;
        let generation = self.generation.lock().unwrap_or_else(|e| e.into_inner());
        if *generation != ticket.generation {
            debug!(
                ticket = ticket.generation,
                current = *generation,
                "Dropping stale completion"
            );
            return false;
        }
        self.tx.send_replace(state);
        true
    }

    /// Returns to `Idle` if the load behind `ticket` is still the latest one.
    fn abandon(&self, ticket: u64) {
        let generation = self.generation.lock().unwrap_or_else(|e| e.into_inner());
        if *generation == ticket && self.tx.borrow().is_loading() {
            debug!(ticket, "Load abandoned before completion");
            self.tx.send_replace(UiState::Idle);
        }
    }

    /// Replaces the state outright, bypassing fencing.
    pub fn set(&self, state: UiState<T>) {
        self.tx.send_replace(state);
    }

    pub fn reset(&self) {
        self.set(UiState::Idle);
    }
}

impl<T: Clone> StateHolder<T> {
    pub fn get(&self) -> UiState<T> {
        self.tx.borrow().clone()
    }
}
