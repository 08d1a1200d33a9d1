use std::future::Future;
use tracing::debug;

use crate::auth::AuthGate;
use crate::routing::Route;

/// Placeholder rendered while the session is still resolving
pub const LOADING_PLACEHOLDER: &str = "Loading...";

/// Result of passing a protected view through the guard
#[derive(Debug)]
pub enum Guarded<V> {
    /// Session not resolved yet; only the placeholder renders
    Loading,
    /// No session; navigate here instead, the view was never mounted
    Redirect(Route),
    Render(V),
}

impl<V> Guarded<V> {
    pub fn rendered(self) -> Option<V> {
        match self {
            Guarded::Render(view) => Some(view),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> Guarded<U> {
        match self {
            Guarded::Loading => Guarded::Loading,
            Guarded::Redirect(route) => Guarded::Redirect(route),
            Guarded::Render(view) => Guarded::Render(f(view)),
        }
    }
}

enum Decision {
    Loading,
    Redirect,
    Mount,
}

fn decide(gate: &AuthGate) -> Decision {
    let state = gate.state();
    if state.loading {
        debug!("Route guard: session resolving");
        Decision::Loading
    } else if state.session.is_none() {
        debug!("Route guard: no session, redirecting to {}", Route::Login.path());
        Decision::Redirect
    } else {
        Decision::Mount
    }
}

/// Mount `view` only when a session is present. Evaluated fresh on every call.
pub fn guard<V>(gate: &AuthGate, mount: impl FnOnce() -> V) -> Guarded<V> {
    match decide(gate) {
        Decision::Loading => Guarded::Loading,
        Decision::Redirect => Guarded::Redirect(Route::Login),
        Decision::Mount => Guarded::Render(mount()),
    }
}

/// Async form of [`guard`] for views whose mount performs fetches
pub async fn guard_async<V, F, Fut>(gate: &AuthGate, mount: F) -> Guarded<V>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = V>,
{
    match decide(gate) {
        Decision::Loading => Guarded::Loading,
        Decision::Redirect => Guarded::Redirect(Route::Login),
        Decision::Mount => Guarded::Render(mount().await),
    }
}
