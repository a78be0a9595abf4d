//! Board detail page: drag-and-drop reordering with optimistic updates.
//!
//! `reorder` is the pure move, `drop` turns gesture hits into a target, and
//! `view` owns the board state and reconciles moves with the server.

pub mod drop;
pub mod reorder;
mod view;

pub use drop::{CardHover, DropGesture, DropHit, DropTarget};
pub use reorder::{apply_move, MoveOutcome};
pub use view::{BoardView, BoardViewState};
