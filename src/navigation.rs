//! Screen routes and navigation debouncing

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Search,
    Watchlist,
    SaveForLater,
    Profile,
}

/// Suppresses repeated navigation between the same pair of screens within a
/// cool-down window.
#[derive(Debug)]
pub struct NavigationDebouncer {
    cooldown: Duration,
    last: HashMap<(Route, Route), Instant>,
}

impl NavigationDebouncer {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last: HashMap::new(),
        }
    }

    /// Records and allows the transition unless the same one happened less than
    /// `cooldown` before `now`.
    pub fn allow(&mut self, from: Route, to: Route, now: Instant) -> bool {
        if let Some(previous) = self.last.get(&(from, to))
            && now.saturating_duration_since(*previous) < self.cooldown
        {
            return false;
        }
        self.last.insert((from, to), now);
        true
    }
}

/// Owns the back stack and the debounce policy
#[derive(Debug)]
pub struct Navigator {
    stack: Vec<Route>,
    debouncer: NavigationDebouncer,
}

impl Navigator {
    pub fn new(start: Route, cooldown: Duration) -> Self {
        Self {
            stack: vec![start],
            debouncer: NavigationDebouncer::new(cooldown),
        }
    }

    pub fn current(&self) -> Route {
        self.stack.last().copied().unwrap_or(Route::Login)
    }

    /// Pushes `to` unless it is already showing or the move is debounced.
    pub fn navigate(&mut self, to: Route, now: Instant) -> bool {
        let from = self.current();
        if from == to || !self.debouncer.allow(from, to, now) {
            debug!(?from, ?to, "Navigation suppressed");
            return false;
        }
        self.stack.push(to);
        true
    }

    /// Pops the current screen. The root screen is never popped.
    pub fn back(&mut self) -> Option<Route> {
        if self.stack.len() > 1 {
            self.stack.pop();
            Some(self.current())
        } else {
            None
        }
    }

    /// Replaces the whole stack with `root` (sign-in, sign-out).
    pub fn reset(&mut self, root: Route) {
        self.stack.clear();
        self.stack.push(root);
    }
}
