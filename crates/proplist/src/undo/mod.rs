#![forbid(unsafe_code)]

//! Undo/redo support.
//!
//! - [`UndoableCmd`]: a reversible operation.
//! - [`UiCommand`]: the command object a menu or toolbar binds to.
//! - [`HistoryManager`]: bounded undo/redo stacks.
//! - [`SlotEditCmd`] / [`SlotInsertCmd`]: list edits as commands.
//! - [`SharedHistory`]: records a list's edits as they happen.
//!
//! ```ignore
//! use proplist::undo::SharedHistory;
//!
//! let history = SharedHistory::default();
//! let _tracking = history.track(&list);
//! list.set(0, 7)?;
//! history.undo();
//! ```

pub mod command;
pub mod history;
pub mod list_edit;
pub mod shared;

pub use command::{
    Action, CommandError, CommandMetadata, CommandResult, Commandable, UiCommand, UndoableCmd,
};
pub use history::{HistoryConfig, HistoryManager};
pub use list_edit::{SlotEditCmd, SlotInsertCmd};
pub use shared::SharedHistory;
