use std::sync::{Arc, Weak};

use log::{debug, info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::drop::DropGesture;
use super::reorder::{apply_move, MoveOutcome};
use crate::api::ApiClient;
use crate::error::{Action, AppError};
use crate::models::{Board, BoardPatch, CardInput, CardPatch, ColumnInput, Id, MoveCardRequest};
use crate::notify::Notifier;
use crate::pages::{refresh, required};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardViewState {
    /// Replaced by a new allocation on every change.
    pub board: Option<Arc<Board>>,
    pub loading: bool,
    pub error: Option<String>,
}

struct Inner {
    board_id: Id,
    client: Arc<ApiClient>,
    notifier: Notifier,
    state: watch::Sender<BoardViewState>,
}

impl Inner {
    fn publish(&self, board: Board) {
        self.state.send_modify(|state| {
            state.board = Some(Arc::new(board));
            state.loading = false;
            state.error = None;
        });
    }
}

/// State of the board detail page.
///
/// Dropping the last clone unmounts the view: reconciliation tasks still in
/// flight discard their results.
#[derive(Clone)]
pub struct BoardView {
    inner: Arc<Inner>,
}

impl BoardView {
    pub fn new(board_id: Id, client: Arc<ApiClient>, notifier: Notifier) -> Self {
        let (state, _) = watch::channel(BoardViewState {
            loading: true,
            ..BoardViewState::default()
        });
        Self {
            inner: Arc::new(Inner {
                board_id,
                client,
                notifier,
                state,
            }),
        }
    }

    pub fn board_id(&self) -> Id {
        self.inner.board_id
    }

    pub fn subscribe(&self) -> watch::Receiver<BoardViewState> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> BoardViewState {
        self.inner.state.borrow().clone()
    }

    pub fn board(&self) -> Option<Arc<Board>> {
        self.inner.state.borrow().board.clone()
    }

    /// Fetches the board and replaces the state wholesale.
    pub async fn load(&self) -> Result<(), AppError> {
        self.inner.state.send_modify(|state| state.loading = true);

        match self.inner.client.get_board(self.inner.board_id).await {
            Ok(board) => {
                self.inner.publish(board);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load board {}: {}", self.inner.board_id, e);
                self.inner.state.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(e.display_message());
                });
                Err(e)
            }
        }
    }

    /// Moves a card locally right away and confirms with the server in the
    /// background.
    ///
    /// Returns the reconciliation task, or `None` when the card is already at
    /// the requested slot. Invalid moves leave the state untouched and send
    /// nothing.
    pub fn move_card(
        &self,
        card_id: Id,
        to_column: Id,
        to_position: usize,
    ) -> Result<Option<JoinHandle<()>>, AppError> {
        let mut result = Ok(None);
        self.inner.state.send_if_modified(|state| {
            let board = match state.board.as_ref() {
                Some(board) => board,
                None => {
                    result = Err(AppError::InvalidMove("board is not loaded".into()));
                    return false;
                }
            };
            match apply_move(board, card_id, to_column, to_position) {
                Ok(MoveOutcome::Moved { board, position }) => {
                    state.board = Some(Arc::new(board));
                    result = Ok(Some(position));
                    true
                }
                Ok(MoveOutcome::Unchanged) => false,
                Err(e) => {
                    result = Err(e);
                    false
                }
            }
        });

        let position = match result? {
            Some(position) => position,
            None => {
                debug!("Card {} dropped on its own slot", card_id);
                return Ok(None);
            }
        };

        let request = MoveCardRequest {
            column_id: to_column,
            position: position as i64,
        };
        debug!(
            "Moved card {} to column {} at {} locally",
            card_id, to_column, position
        );
        Ok(Some(tokio::spawn(reconcile_move(
            Arc::downgrade(&self.inner),
            self.inner.client.clone(),
            self.inner.board_id,
            card_id,
            request,
        ))))
    }

    /// Completes a drag gesture. Gestures that hit nothing are ignored.
    pub fn drop_card(&self, gesture: &DropGesture) -> Result<Option<JoinHandle<()>>, AppError> {
        let target = match self.board().and_then(|board| gesture.resolve(&board)) {
            Some(target) => target,
            None => return Ok(None),
        };
        self.move_card(gesture.card_id(), target.column_id, target.position)
    }

    /// Appends a column and reloads the board.
    pub async fn add_column(&self, name: &str) -> Result<(), AppError> {
        let name = required(name, "Column name")?;
        let input = ColumnInput {
            name: Some(name),
            position: None,
        };
        let result = self
            .inner
            .client
            .create_column(self.inner.board_id, &input)
            .await;
        self.finish(Action::CreateColumn, result).await
    }

    /// Renames a column and reloads the board.
    pub async fn rename_column(&self, column_id: Id, name: &str) -> Result<(), AppError> {
        let name = required(name, "Column name")?;
        let input = ColumnInput {
            name: Some(name),
            position: None,
        };
        let result = self
            .inner
            .client
            .update_column(self.inner.board_id, column_id, &input)
            .await;
        self.finish(Action::UpdateColumn, result).await
    }

    /// Deletes a column and reloads the board.
    pub async fn delete_column(&self, column_id: Id) -> Result<(), AppError> {
        let result = self
            .inner
            .client
            .delete_column(self.inner.board_id, column_id)
            .await;
        self.finish(Action::DeleteColumn, result).await
    }

    /// Adds a card at the end of `column_id`. The title doubles as its name.
    pub async fn add_card(&self, column_id: Id, title: &str) -> Result<(), AppError> {
        let title = required(title, "Card title")?;
        let result = self
            .inner
            .client
            .create_card(&CardInput::titled(column_id, &title))
            .await
            .map(|_| ());
        self.finish(Action::CreateCard, result).await
    }

    /// Saves a card edit and reloads the board.
    pub async fn update_card(
        &self,
        card_id: Id,
        title: &str,
        description: &str,
    ) -> Result<(), AppError> {
        let title = required(title, "Card title")?;
        let result = self
            .inner
            .client
            .update_card(card_id, &CardPatch::edit(&title, description))
            .await
            .map(|_| ());
        self.finish(Action::UpdateCard, result).await
    }

    /// Deletes a card and reloads the board.
    pub async fn delete_card(&self, card_id: Id) -> Result<(), AppError> {
        let result = self.inner.client.delete_card(card_id).await;
        self.finish(Action::DeleteCard, result).await
    }

    /// Saves the board settings form.
    pub async fn update_settings(&self, patch: &BoardPatch) -> Result<(), AppError> {
        let result = self
            .inner
            .client
            .update_board(self.inner.board_id, patch)
            .await
            .map(|_| ());
        self.finish(Action::UpdateBoard, result).await
    }

    /// Success reloads the board; failure leaves it untouched and shows a toast.
    async fn finish(&self, action: Action, result: Result<(), AppError>) -> Result<(), AppError> {
        match result {
            Ok(()) => {
                refresh(self.load()).await;
                Ok(())
            }
            Err(e) => {
                self.inner.notifier.failure(action, &e);
                Err(e)
            }
        }
    }
}

async fn reconcile_move(
    view: Weak<Inner>,
    client: Arc<ApiClient>,
    board_id: Id,
    card_id: Id,
    request: MoveCardRequest,
) {
    let error = match client.move_card(card_id, &request).await {
        Ok(()) => {
            debug!("Server confirmed move of card {}", card_id);
            return;
        }
        Err(e) => e,
    };

    if view.strong_count() == 0 {
        debug!("Board {} view is gone; ignoring failed move", board_id);
        return;
    }
    // The session is being torn down; there is nothing left to reload into.
    if error.is_unauthorized() {
        return;
    }

    warn!(
        "Failed to move card {}, reloading board {}: {}",
        card_id, board_id, error
    );
    match client.get_board(board_id).await {
        Ok(board) => match view.upgrade() {
            Some(inner) => {
                inner.publish(board);
                info!("Board {} reloaded after failed move", board_id);
            }
            None => debug!("Board {} view is gone; discarding reload", board_id),
        },
        Err(e) => warn!("Failed to reload board {}: {}", board_id, e),
    }
}
