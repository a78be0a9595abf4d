use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{null_as_default, Id};

/// Row of `GET /projects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: Id,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub owner_id: Id,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owner_name: String,
    #[serde(default)]
    pub member_count: u32,
    #[serde(default)]
    pub board_count: u32,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// Response of `GET /projects/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    pub id: Id,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub owner_id: Id,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owner_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub members: Vec<ProjectMember>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub boards: Vec<ProjectBoard>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl ProjectDetail {
    pub fn is_owner(&self, user_id: Id) -> bool {
        self.owner_id == user_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMember {
    pub id: Id,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub joined_at: Option<NaiveDateTime>,
}

impl ProjectMember {
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || [&self.name, &self.email, &self.username]
                .iter()
                .any(|field| field.to_lowercase().contains(&query))
    }
}

impl From<ProjectMember> for super::User {
    fn from(member: ProjectMember) -> Self {
        super::User {
            id: member.id,
            name: member.name,
            email: member.email,
            username: member.username,
            role: member.role,
            avatar_url: member.avatar_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBoard {
    pub id: Id,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_public: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// Body of `POST /projects` and `PUT /projects/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInput {
    pub name: String,
    pub description: String,
}

/// Body of `POST /projects/:id/members`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddMemberRequest {
    pub email: String,
}
