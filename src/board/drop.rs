//! Turns the hits fired during one drag gesture into a drop target.
//!
//! A gesture may report both the card under the pointer and the column body
//! behind it. The card hit is more precise and wins.

use crate::models::{Board, Id};

/// Pointer over a card while dragging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardHover {
    pub column_id: Id,
    /// Index of the hovered card within its column.
    pub index: usize,
    pub card_id: Id,
    pub pointer_y: f64,
    pub card_top: f64,
    pub card_height: f64,
}

impl CardHover {
    /// Above the vertical midpoint inserts before the card, otherwise after.
    pub fn insert_index(&self) -> usize {
        if self.pointer_y < self.card_top + self.card_height / 2.0 {
            self.index
        } else {
            self.index + 1
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropHit {
    Card(CardHover),
    Column(Id),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTarget {
    pub column_id: Id,
    /// Index in the destination column once the card has been taken out.
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropGesture {
    card_id: Id,
    card_hit: Option<CardHover>,
    column_hit: Option<Id>,
}

impl DropGesture {
    pub fn new(card_id: Id) -> Self {
        Self {
            card_id,
            card_hit: None,
            column_hit: None,
        }
    }

    pub fn card_id(&self) -> Id {
        self.card_id
    }

    /// Records a hit; later hits of the same kind replace earlier ones.
    pub fn record(&mut self, hit: DropHit) {
        match hit {
            DropHit::Card(hover) => self.card_hit = Some(hover),
            DropHit::Column(column_id) => self.column_hit = Some(column_id),
        }
    }

    /// The target for this gesture, or `None` when nothing was hit or the
    /// hit column is not on `board`.
    pub fn resolve(&self, board: &Board) -> Option<DropTarget> {
        if let Some(hover) = self.card_hit {
            return Some(self.resolve_card_hit(board, &hover));
        }

        let column_id = self.column_hit?;
        let column = board.column(column_id)?;
        Some(DropTarget {
            column_id,
            position: column.cards.len(),
        })
    }

    fn resolve_card_hit(&self, board: &Board, hover: &CardHover) -> DropTarget {
        let origin = board.locate_card(self.card_id);

        if hover.card_id == self.card_id {
            let (column_id, position) = origin.unwrap_or((hover.column_id, hover.index));
            return DropTarget {
                column_id,
                position,
            };
        }

        let mut position = hover.insert_index();
        // Indices after the dragged card shift down once it is removed.
        if let Some((column_id, index)) = origin {
            if column_id == hover.column_id && index < position {
                position -= 1;
            }
        }
        DropTarget {
            column_id: hover.column_id,
            position,
        }
    }
}
