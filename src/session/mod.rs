//! The session store: single source of truth for who is signed in.
//!
//! `SessionStore` is created once at the application root and owns the state.
//! Everything else reads it through a `SessionHandle`. State changes go through
//! the pure `reduce` function so every transition is an explicit
//! `SessionAction`.

mod reducer;

use std::sync::{Arc, Weak};

use log::{debug, error, info, warn};
use tokio::sync::watch;

pub use reducer::{reduce, SessionAction, SessionState};

use crate::api::{ApiClient, UnauthorizedHandler};
use crate::error::AppError;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, User};
use crate::navigation::{Navigator, Route};
use crate::storage::{SessionStorage, StoredSession};

/// Shared state cell. Only the store and the 401 teardown write to it.
#[derive(Debug)]
struct SessionCell {
    state: watch::Sender<SessionState>,
}

impl SessionCell {
    fn dispatch(&self, action: SessionAction) {
        let name = action.name();
        self.state.send_modify(|state| *state = reduce(state, action));
        debug!(
            "Session {} -> authenticated={} loading={}",
            name,
            self.state.borrow().is_authenticated(),
            self.state.borrow().is_loading
        );
    }
}

/// Read-only view of the session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    state: watch::Receiver<SessionState>,
}

impl SessionHandle {
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    /// Waits for the next change. Returns `false` once the store is gone.
    pub async fn changed(&mut self) -> bool {
        self.state.changed().await.is_ok()
    }

    /// Waits until startup rehydration has finished and returns the state.
    pub async fn loaded(&mut self) -> SessionState {
        let loaded = match self.state.wait_for(|state| !state.is_loading).await {
            Ok(state) => Some(state.clone()),
            Err(_) => None,
        };
        loaded.unwrap_or_else(|| self.snapshot())
    }
}

/// Resets the session and sends the user to the login view after a 401.
struct SessionTeardown {
    cell: Weak<SessionCell>,
    navigator: Navigator,
}

impl UnauthorizedHandler for SessionTeardown {
    fn on_unauthorized(&self) {
        if let Some(cell) = self.cell.upgrade() {
            cell.dispatch(SessionAction::Logout);
        }
        self.navigator.navigate(Route::Login);
    }
}

#[derive(Clone)]
pub struct SessionStore {
    cell: Arc<SessionCell>,
    client: Arc<ApiClient>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    /// Creates the store in the `Loading` state and registers the global 401
    /// teardown on `client`.
    pub fn new(
        client: Arc<ApiClient>,
        storage: Arc<dyn SessionStorage>,
        navigator: Navigator,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::initial());
        let cell = Arc::new(SessionCell { state });
        client.set_unauthorized_handler(Arc::new(SessionTeardown {
            cell: Arc::downgrade(&cell),
            navigator,
        }));
        Self {
            cell,
            client,
            storage,
        }
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            state: self.cell.state.subscribe(),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.cell.state.borrow().clone()
    }

    /// Rehydrates the session from durable storage.
    ///
    /// A complete stored session signs the user back in and re-arms the client's
    /// token; anything else clears storage and ends unauthenticated.
    pub fn initialize(&self) -> SessionState {
        self.cell.dispatch(SessionAction::SetLoading(true));

        match self.storage.load_session() {
            Ok(StoredSession::Complete { token, user }) => {
                info!("Restored session for {}", user.email);
                self.client.set_auth_token(&token);
                self.cell.dispatch(SessionAction::LoginSuccess { user, token });
            }
            Ok(StoredSession::Corrupt(reason)) => {
                error!("Error parsing stored user data: {}", reason);
                self.discard_stored_session();
                self.cell.dispatch(SessionAction::LoginFailure);
            }
            Ok(StoredSession::Missing) => {
                debug!("No stored session");
                self.discard_stored_session();
                self.cell.dispatch(SessionAction::LoginFailure);
            }
            Err(e) => {
                error!("Failed to read stored session: {}", e);
                self.discard_stored_session();
                self.cell.dispatch(SessionAction::LoginFailure);
            }
        }

        self.cell.dispatch(SessionAction::SetLoading(false));
        self.snapshot()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        self.cell.dispatch(SessionAction::LoginStart);
        let credentials = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = self.client.login(&credentials).await;
        self.complete_sign_in(result)
    }

    /// Registration signs the user in with the returned token.
    pub async fn register(&self, profile: RegisterRequest) -> Result<User, AppError> {
        self.cell.dispatch(SessionAction::LoginStart);
        let result = self.client.register(&profile).await;
        self.complete_sign_in(result)
    }

    /// Client-side teardown only; the API is not called.
    pub fn logout(&self) {
        self.discard_stored_session();
        self.cell.dispatch(SessionAction::Logout);
        info!("Signed out");
    }

    /// Replaces the signed-in user after a profile edit, in memory and in
    /// durable storage. Does nothing when nobody is signed in.
    pub fn update_user(&self, user: User) {
        let token = match self.snapshot().token {
            Some(token) => token,
            None => {
                debug!("Ignoring user update without a session");
                return;
            }
        };
        if let Err(e) = self.storage.save_session(&token, &user) {
            error!("Failed to persist updated user: {}", e);
        }
        self.cell.dispatch(SessionAction::UpdateUser(user));
    }

    fn complete_sign_in(&self, result: Result<AuthResponse, AppError>) -> Result<User, AppError> {
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!("Sign-in failed: {}", e);
                self.discard_stored_session();
                self.cell.dispatch(SessionAction::LoginFailure);
                return Err(e);
            }
        };

        if let Err(e) = self.storage.save_session(&response.token, &response.user) {
            error!("Failed to persist session: {}", e);
            self.discard_stored_session();
            self.cell.dispatch(SessionAction::LoginFailure);
            return Err(e);
        }

        self.client.set_auth_token(&response.token);
        info!("Signed in as {}", response.user.email);
        self.cell.dispatch(SessionAction::LoginSuccess {
            user: response.user.clone(),
            token: response.token,
        });
        Ok(response.user)
    }

    fn discard_stored_session(&self) {
        self.client.clear_auth_token();
        if let Err(e) = self.storage.clear_session() {
            error!("Failed to clear stored session: {}", e);
        }
    }
}
