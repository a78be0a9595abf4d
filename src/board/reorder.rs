//! Pure card reordering.
//!
//! A move removes the card from wherever it is and inserts it into the target
//! column at the requested index. The input board is never modified; a moved
//! board is a fresh value.

use crate::error::AppError;
use crate::models::{Board, Id};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The card changed place. `position` is the index actually used after clamping.
    Moved { board: Board, position: usize },
    /// The card is already at the requested slot.
    Unchanged,
}

pub fn apply_move(
    board: &Board,
    card_id: Id,
    to_column: Id,
    to_position: usize,
) -> Result<MoveOutcome, AppError> {
    let slots = board.card_slots(card_id);
    let (from_column_index, from_index) = match slots.as_slice() {
        [slot] => *slot,
        [] => {
            return Err(AppError::InvalidMove(format!(
                "card {} is not on board {}",
                card_id, board.id
            )))
        }
        _ => {
            return Err(AppError::InvalidMove(format!(
                "card {} appears in {} columns",
                card_id,
                slots.len()
            )))
        }
    };

    let to_column_index = board
        .columns
        .iter()
        .position(|column| column.id == to_column)
        .ok_or_else(|| {
            AppError::InvalidMove(format!("column {} is not on board {}", to_column, board.id))
        })?;

    let same_column = from_column_index == to_column_index;
    let destination_len = board.columns[to_column_index].cards.len() - usize::from(same_column);
    let position = to_position.min(destination_len);

    if same_column && position == from_index {
        return Ok(MoveOutcome::Unchanged);
    }

    let mut moved = board.clone();
    let mut card = moved.columns[from_column_index].cards.remove(from_index);
    card.column_id = Some(to_column);
    moved.columns[to_column_index].cards.insert(position, card);

    for index in [from_column_index, to_column_index] {
        for (position, card) in moved.columns[index].cards.iter_mut().enumerate() {
            card.position = position as i64;
        }
    }

    Ok(MoveOutcome::Moved {
        board: moved,
        position,
    })
}
