use std::sync::Arc;

use log::info;
use tokio::sync::watch;

use super::{mutate, refresh, required, PageCell, PageState};
use crate::api::ApiClient;
use crate::error::{Action, AppError};
use crate::models::{Board, BoardInput, BoardPatch, BoardSummary, Id};
use crate::notify::Notifier;

/// The boards list.
pub struct BoardsPage {
    client: Arc<ApiClient>,
    notifier: Notifier,
    cell: PageCell<Vec<BoardSummary>>,
}

impl BoardsPage {
    pub fn new(client: Arc<ApiClient>, notifier: Notifier) -> Self {
        Self {
            client,
            notifier,
            cell: PageCell::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PageState<Vec<BoardSummary>>> {
        self.cell.subscribe()
    }

    pub fn snapshot(&self) -> PageState<Vec<BoardSummary>> {
        self.cell.snapshot()
    }

    /// Fetches the board list.
    pub async fn load(&self) -> Result<(), AppError> {
        self.cell.load("boards", self.client.get_boards()).await
    }

    /// Boards whose name contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<BoardSummary> {
        let query = query.trim().to_lowercase();
        self.cell
            .data()
            .unwrap_or_default()
            .into_iter()
            .filter(|board| board.name.to_lowercase().contains(&query))
            .collect()
    }

    /// Creates a board, under a project when `input.project_id` is set.
    pub async fn create(&self, input: &BoardInput) -> Result<Board, AppError> {
        let input = BoardInput {
            name: required(&input.name, "Board name")?,
            ..input.clone()
        };
        let board = mutate(
            &self.notifier,
            Action::CreateBoard,
            self.client.create_board(&input),
        )
        .await?;
        info!("Created board {} ({})", board.name, board.id);
        refresh(self.load()).await;
        Ok(board)
    }

    /// Saves a board edit and reloads the list.
    pub async fn update(&self, id: Id, patch: &BoardPatch) -> Result<(), AppError> {
        if let Some(name) = &patch.name {
            required(name, "Board name")?;
        }
        mutate(
            &self.notifier,
            Action::UpdateBoard,
            self.client.update_board(id, patch),
        )
        .await?;
        refresh(self.load()).await;
        Ok(())
    }

    /// Deletes a board and reloads the list. Non-owners get a role message.
    pub async fn delete(&self, id: Id) -> Result<(), AppError> {
        mutate(&self.notifier, Action::DeleteBoard, self.client.delete_board(id)).await?;
        info!("Deleted board {}", id);
        refresh(self.load()).await;
        Ok(())
    }
}
