use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{null_as_default, Id};

/// A board with its columns and cards, as returned by `GET /boards/:id`.
///
/// Column order and card order within a column are display order; the
/// `position` fields are informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: Id,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_public: bool,
    #[serde(default)]
    pub owner_id: Option<Id>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Board {
    pub fn column(&self, column_id: Id) -> Option<&Column> {
        self.columns.iter().find(|column| column.id == column_id)
    }

    /// Every column holding `card_id`, as `(column index, card index)` pairs.
    ///
    /// A well-formed board yields at most one entry.
    pub fn card_slots(&self, card_id: Id) -> Vec<(usize, usize)> {
        self.columns
            .iter()
            .enumerate()
            .flat_map(|(column_index, column)| {
                column
                    .cards
                    .iter()
                    .enumerate()
                    .filter(move |(_, card)| card.id == card_id)
                    .map(move |(card_index, _)| (column_index, card_index))
            })
            .collect()
    }

    /// The column id and index a card currently occupies.
    pub fn locate_card(&self, card_id: Id) -> Option<(Id, usize)> {
        self.card_slots(card_id)
            .first()
            .map(|&(column_index, card_index)| (self.columns[column_index].id, card_index))
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|column| column.cards.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub position: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cards: Vec<Card>,
}

impl Column {
    pub fn card_ids(&self) -> Vec<Id> {
        self.cards.iter().map(|card| card.id).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Id,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub column_id: Option<Id>,
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

/// Row of `GET /boards`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    pub id: Id,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_public: bool,
    #[serde(default)]
    pub member_count: u32,
    #[serde(default)]
    pub card_count: u32,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// Body of `POST /boards`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardInput {
    pub name: String,
    pub description: String,
    pub is_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Id>,
}

/// Body of `PUT /boards/:id`; used by the board settings form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl BoardPatch {
    /// Pre-fills the settings form from the loaded board.
    pub fn from_board(board: &Board) -> Self {
        Self {
            name: Some(board.name.clone()),
            description: Some(board.description.clone()),
            is_public: Some(board.is_public),
        }
    }
}

/// Body of `POST /boards/:id/columns` and `PUT /boards/:id/columns/:columnId`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
}

/// Body of `POST /cards`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInput {
    pub title: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub column_id: Id,
}

impl CardInput {
    /// A card created from the quick-add form: title mirrored into `name`.
    pub fn titled(column_id: Id, title: &str) -> Self {
        Self {
            title: title.to_string(),
            name: title.to_string(),
            description: String::new(),
            due_date: None,
            column_id,
        }
    }
}

/// Body of `PUT /cards/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl CardPatch {
    /// The edit-card form: title mirrored into `name`.
    pub fn edit(title: &str, description: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            name: Some(title.to_string()),
            description: Some(description.to_string()),
            due_date: None,
        }
    }
}

/// Body of `PATCH /cards/:id/move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCardRequest {
    pub column_id: Id,
    pub position: i64,
}

/// Body of `POST /boards/:id/members`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardMemberRequest {
    pub user_id: Id,
}
