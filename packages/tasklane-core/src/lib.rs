//! Board state and reordering engine for a single-board kanban.
//!
//! Lists and tasks live in [`board::Board`]; position math is in
//! [`reorder`]; [`drag`] turns pointer-library callbacks into moves; slots
//! are persisted through [`storage::SlotStore`].

pub mod board;
pub mod config;
pub mod drag;
pub mod reorder;
pub mod storage;
pub mod types;

pub use board::{Board, BoardChange};
pub use drag::{DragEvent, DragSession, DropTarget};
pub use types::{DraggedEntity, EntityKind, List, Task, TaskPatch};
