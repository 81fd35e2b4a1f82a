//! # View-Models
//!
//! One per screen. Each owns its [`StateHolder`](crate::ui_state::StateHolder)s
//! exclusively and drives them from repository calls. Operations are plain async
//! methods; a screen runs them inside its [`ScreenScope`] so that leaving the
//! screen cancels whatever is still in flight.
//!
//! Overlapping loads on the same holder are fenced: the most recently started
//! load wins, and older completions are discarded.

mod login;
mod profile;
mod save_for_later;
mod search;
mod watchlist;

use std::future::Future;

use tokio::runtime::Handle;
use tokio::task::{AbortHandle, JoinHandle};

pub use login::LoginViewModel;
pub use profile::ProfileViewModel;
pub use save_for_later::SaveForLaterViewModel;
pub use search::SearchViewModel;
pub use watchlist::WatchlistViewModel;

/// Tasks tied to a screen's visible lifetime.
///
/// Dropping the scope aborts every task it spawned.
#[derive(Debug)]
pub struct ScreenScope {
    tasks: Vec<AbortHandle>,
    runtime: Option<Handle>,
}

impl Default for ScreenScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenScope {
    /// Binds the scope to the runtime it is created in, if any.
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            runtime: Handle::try_current().ok(),
        }
    }

    pub fn with_runtime(runtime: Handle) -> Self {
        Self {
            tasks: Vec::new(),
            runtime: Some(runtime),
        }
    }

    /// Runtime tasks will be spawned on: the captured one, else the caller's.
    fn runtime(&self) -> Option<Handle> {
        self.runtime.clone().or_else(|| Handle::try_current().ok())
    }

    pub fn has_runtime(&self) -> bool {
        self.runtime().is_some()
    }

    /// Spawns `task` bound to this scope.
    ///
    /// # Panics
    ///
    /// Panics if the scope captured no runtime and the caller is not inside one;
    /// check [`has_runtime`](Self::has_runtime) first when that can happen.
    pub fn spawn<F>(&mut self, task: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.tasks.retain(|t| !t.is_finished());
        let handle = match self.runtime() {
            Some(runtime) => runtime.spawn(task),
            None => tokio::spawn(task),
        };
        self.tasks.push(handle.abort_handle());
        handle
    }

    pub fn active(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_finished()).count()
    }

    /// Cancels every task still running.
    pub fn leave(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for ScreenScope {
    fn drop(&mut self) {
        self.leave();
    }
}
