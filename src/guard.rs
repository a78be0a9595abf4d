//! Route guard for the protected region of the app.

use log::debug;

use crate::navigation::{Navigator, Route};
use crate::session::{SessionHandle, SessionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// The session is not known yet; show a neutral loading indicator and mount nothing.
    Loading,
    /// Render the requested view.
    Render,
    /// Send the user to the login view. The requested path is not remembered.
    RedirectToLogin,
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    session: SessionHandle,
    navigator: Navigator,
}

impl RouteGuard {
    pub fn new(session: SessionHandle, navigator: Navigator) -> Self {
        Self { session, navigator }
    }

    pub fn evaluate(state: &SessionState) -> GuardDecision {
        if state.is_loading {
            GuardDecision::Loading
        } else if state.is_authenticated() {
            GuardDecision::Render
        } else {
            GuardDecision::RedirectToLogin
        }
    }

    /// Attempts to show `route` with the session as it is right now.
    ///
    /// While loading nothing is navigated, so no protected view gets mounted.
    pub fn enter(&self, route: Route) -> GuardDecision {
        let decision = if route.is_public() {
            GuardDecision::Render
        } else {
            Self::evaluate(&self.session.snapshot())
        };

        match decision {
            GuardDecision::Render => self.navigator.navigate(route),
            GuardDecision::RedirectToLogin => {
                debug!("Blocked {} without a session", route);
                self.navigator.navigate(Route::Login);
            }
            GuardDecision::Loading => {}
        }
        decision
    }

    /// Like `enter`, but first waits for startup rehydration to finish.
    pub async fn resolve(&self, route: Route) -> GuardDecision {
        let mut session = self.session.clone();
        session.loaded().await;
        self.enter(route)
    }
}
