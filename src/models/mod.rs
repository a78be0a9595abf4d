//! Typed request and response schemas for the Wisecamp API.
//!
//! Every payload crossing the HTTP boundary is parsed into one of these structs
//! immediately; nothing above `api` handles raw JSON.

pub mod board;
pub mod project;
pub mod user;

use serde::{Deserialize, Deserializer, Serialize};

pub use board::{
    Board, BoardInput, BoardMemberRequest, BoardPatch, BoardSummary, Card, CardInput, CardPatch,
    Column, ColumnInput, MoveCardRequest,
};
pub use project::{AddMemberRequest, ProjectBoard, ProjectDetail, ProjectInput, ProjectMember, ProjectSummary};
pub use user::{AuthResponse, LoginRequest, ProfilePatch, RegisterRequest, User};

/// Server ids are JPA `Long`s.
pub type Id = i64;

/// Error body returned by the API for non-success statuses.
///
/// Spring's error controller sends `message`; other handlers send `error`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub suggestion: Option<String>,
}

impl ApiErrorBody {
    pub fn text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|text| !text.trim().is_empty())
    }
}

/// Treats an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
