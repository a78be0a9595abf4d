//!
//! # Client Error Handling
//!
//! This module defines `AppError`, the single error type returned by every fallible
//! operation in the crate: HTTP calls, durable session storage, configuration and
//! local board reordering.
//!
//! Errors coming back from the Wisecamp API are classified by status code so that
//! callers can tell a permission problem (403) apart from a generic failure, and so
//! that a 401 can trigger the global session teardown. `AppError::user_message`
//! turns an error into the text shown in a toast notification.

use std::fmt;

/// Fallback text when neither the server nor the transport produced a usable message.
pub const GENERIC_MESSAGE: &str = "An unexpected error occurred";

/// Represents all possible errors that can occur within the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// The API rejected the credentials or the bearer token (HTTP 401).
    Unauthorized(String),
    /// The caller is authenticated but lacks the required role (HTTP 403).
    Forbidden(String),
    /// The requested resource does not exist (HTTP 404).
    NotFound(String),
    /// Any other client-side rejection (HTTP 4xx).
    BadRequest(String),
    /// The API failed to process the request (HTTP 5xx).
    ServerError(String),
    /// The request never produced a response (connection refused, timeout, ...).
    Network(String),
    /// The response body did not match the expected schema.
    Decode(String),
    /// Reading or writing durable session storage failed.
    Storage(String),
    /// A card move referenced a card or column that is not on the loaded board.
    InvalidMove(String),
    /// An environment variable held an unusable value.
    Config(String),
}

impl AppError {
    /// Classifies a non-success HTTP status together with the server's message.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => AppError::Unauthorized(message),
            403 => AppError::Forbidden(message),
            404 => AppError::NotFound(message),
            400..=499 => AppError::BadRequest(message),
            _ => AppError::ServerError(message),
        }
    }

    /// The HTTP status this error corresponds to, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Unauthorized(_) => Some(401),
            AppError::Forbidden(_) => Some(403),
            AppError::NotFound(_) => Some(404),
            AppError::BadRequest(_) => Some(400),
            AppError::ServerError(_) => Some(500),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Unauthorized(_))
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, AppError::Forbidden(_))
    }

    /// The bare message carried by the variant.
    pub fn message(&self) -> &str {
        match self {
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::ServerError(msg)
            | AppError::Network(msg)
            | AppError::Decode(msg)
            | AppError::Storage(msg)
            | AppError::InvalidMove(msg)
            | AppError::Config(msg) => msg,
        }
    }

    /// Text for the notification shown after `action` failed with this error.
    ///
    /// Permission failures name the role that may perform the action. Everything
    /// else shows the server's message when it sent one.
    pub fn user_message(&self, action: Action) -> String {
        match self {
            AppError::Forbidden(_) => {
                format!("Only the {} can {}.", action.required_role(), action.describe())
            }
            other => other.display_message(),
        }
    }

    /// Text for a failure with no specific action, such as a rejected login.
    ///
    /// Uses the server's or transport's message; internal failures fall back to
    /// a generic sentence.
    pub fn display_message(&self) -> String {
        match self {
            AppError::Decode(_) | AppError::Storage(_) | AppError::Config(_) => {
                GENERIC_MESSAGE.to_string()
            }
            other if other.message().trim().is_empty() => GENERIC_MESSAGE.to_string(),
            other => other.message().to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::ServerError(msg) => write!(f, "Server Error: {}", msg),
            AppError::Network(msg) => write!(f, "Network Error: {}", msg),
            AppError::Decode(msg) => write!(f, "Decode Error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage Error: {}", msg),
            AppError::InvalidMove(msg) => write!(f, "Invalid Move: {}", msg),
            AppError::Config(msg) => write!(f, "Config Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts transport-level `reqwest` failures.
///
/// Body decoding failures become `AppError::Decode`; failures that still carry a
/// status are classified by it; the rest are network errors.
impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> AppError {
        if error.is_decode() {
            AppError::Decode(error.to_string())
        } else if let Some(status) = error.status() {
            AppError::from_status(status.as_u16(), error.to_string())
        } else {
            AppError::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> AppError {
        AppError::Decode(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> AppError {
        AppError::Storage(error.to_string())
    }
}

/// A user-initiated mutation, used to phrase failure notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateProject,
    UpdateProject,
    DeleteProject,
    AddProjectMember,
    RemoveProjectMember,
    CreateBoard,
    UpdateBoard,
    DeleteBoard,
    AddBoardMember,
    RemoveBoardMember,
    CreateColumn,
    UpdateColumn,
    DeleteColumn,
    CreateCard,
    UpdateCard,
    DeleteCard,
    UpdateProfile,
}

impl Action {
    /// The role the API requires for this action.
    pub fn required_role(&self) -> &'static str {
        match self {
            Action::CreateProject | Action::UpdateProfile => "account holder",
            Action::UpdateProject
            | Action::DeleteProject
            | Action::AddProjectMember
            | Action::RemoveProjectMember
            | Action::CreateBoard => "project owner",
            Action::UpdateBoard
            | Action::DeleteBoard
            | Action::AddBoardMember
            | Action::RemoveBoardMember => "board owner",
            Action::CreateColumn
            | Action::UpdateColumn
            | Action::DeleteColumn
            | Action::CreateCard
            | Action::UpdateCard
            | Action::DeleteCard => "board owner or a board member",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Action::CreateProject => "create projects",
            Action::UpdateProject => "edit this project",
            Action::DeleteProject => "delete this project",
            Action::AddProjectMember => "add members to this project",
            Action::RemoveProjectMember => "remove members from this project",
            Action::CreateBoard => "create boards in this project",
            Action::UpdateBoard => "edit this board",
            Action::DeleteBoard => "delete this board",
            Action::AddBoardMember => "add members to this board",
            Action::RemoveBoardMember => "remove members from this board",
            Action::CreateColumn => "add columns to this board",
            Action::UpdateColumn => "edit columns on this board",
            Action::DeleteColumn => "delete columns from this board",
            Action::CreateCard => "add cards to this board",
            Action::UpdateCard => "edit cards on this board",
            Action::DeleteCard => "delete cards from this board",
            Action::UpdateProfile => "update this profile",
        }
    }
}
