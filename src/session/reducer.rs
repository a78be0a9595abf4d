use crate::models::User;

/// Who is signed in, as seen by every consumer of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<User>,
    pub token: Option<String>,
    /// True until the stored session has been read on startup.
    pub is_loading: bool,
    /// True while a login or register request is outstanding.
    pub is_submitting: bool,
}

impl SessionState {
    /// The state before rehydration has run.
    pub fn initial() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }

    /// Authenticated exactly when both a user and a token are held.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    LoginStart,
    LoginSuccess { user: User, token: String },
    LoginFailure,
    Logout,
    SetLoading(bool),
    UpdateUser(User),
}

impl SessionAction {
    pub fn name(&self) -> &'static str {
        match self {
            SessionAction::LoginStart => "LOGIN_START",
            SessionAction::LoginSuccess { .. } => "LOGIN_SUCCESS",
            SessionAction::LoginFailure => "LOGIN_FAILURE",
            SessionAction::Logout => "LOGOUT",
            SessionAction::SetLoading(_) => "SET_LOADING",
            SessionAction::UpdateUser(_) => "UPDATE_USER",
        }
    }
}

pub fn reduce(state: &SessionState, action: SessionAction) -> SessionState {
    match action {
        SessionAction::LoginStart => SessionState {
            is_submitting: true,
            ..state.clone()
        },
        SessionAction::LoginSuccess { user, token } => SessionState {
            user: Some(user),
            token: Some(token),
            is_loading: false,
            is_submitting: false,
        },
        SessionAction::LoginFailure | SessionAction::Logout => SessionState {
            user: None,
            token: None,
            is_loading: false,
            is_submitting: false,
        },
        SessionAction::SetLoading(is_loading) => SessionState {
            is_loading,
            ..state.clone()
        },
        // Only a signed-in session has a user to replace.
        SessionAction::UpdateUser(user) if state.is_authenticated() => SessionState {
            user: Some(user),
            ..state.clone()
        },
        SessionAction::UpdateUser(_) => state.clone(),
    }
}
