#![forbid(unsafe_code)]

//! Undoable commands and the UI command object.
//!
//! [`UndoableCmd`] is the reversible-operation trait stored by
//! [`HistoryManager`](super::HistoryManager). [`UiCommand`] is the object a
//! menu or toolbar binds to: it carries an optional redo action (what
//! "execute" runs), an optional undo action, and a description.
//!
//! # Invariants
//!
//! - `execute()` followed by `undo()` restores prior state.
//! - `undo()` followed by `redo()` restores the executed state.

use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

use crate::error::ListError;
use crate::reactive::{Subscribers, Subscription};

/// Result of command execution or undo.
pub type CommandResult = Result<(), CommandError>;

/// Errors that can occur while running a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The command has no action for the requested direction.
    Unimplemented(&'static str),
    /// No command is registered under this name.
    UnknownCommand(String),
    /// Command cannot run in the current state.
    InvalidState(String),
    /// The list operation behind the command failed.
    List(ListError),
    /// Generic error with message.
    Other(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unimplemented(what) => write!(f, "command has no {} action", what),
            Self::UnknownCommand(name) => write!(f, "unknown command '{}'", name),
            Self::InvalidState(msg) => write!(f, "invalid state: {}", msg),
            Self::List(err) => write!(f, "list operation failed: {}", err),
            Self::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::List(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ListError> for CommandError {
    fn from(err: ListError) -> Self {
        Self::List(err)
    }
}

/// Description and provenance attached to every command.
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    /// Human-readable description for UI (e.g., "Edit [2]").
    pub description: String,
    /// Label of whatever raised the command, if known.
    pub source: Option<String>,
    /// When the command was created.
    pub timestamp: Instant,
}

impl CommandMetadata {
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            source: None,
            timestamp: Instant::now(),
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// A reversible command.
///
/// Commands here act on `Rc`-shared lists, so the trait carries no
/// `Send`/`Sync` bound.
pub trait UndoableCmd {
    /// Apply the command's effect.
    ///
    /// # Errors
    ///
    /// Returns error if the command cannot be executed.
    fn execute(&mut self) -> CommandResult;

    /// Revert the command's effect.
    ///
    /// # Errors
    ///
    /// Returns error if the command cannot be undone.
    fn undo(&mut self) -> CommandResult;

    /// Re-apply after an undo. Defaults to [`execute`](Self::execute).
    ///
    /// # Errors
    ///
    /// Returns error if the command cannot be redone.
    fn redo(&mut self) -> CommandResult {
        self.execute()
    }

    fn metadata(&self) -> &CommandMetadata;

    /// Human-readable description for UI display.
    fn description(&self) -> &str {
        &self.metadata().description
    }
}

/// Boxed redo/undo action.
pub type Action = Box<dyn FnMut() -> CommandResult>;

/// Command object bound to a menu entry or toolbar button.
///
/// `execute` runs the redo action; `undo` runs the undo action. A command
/// without a redo action cannot execute.
pub struct UiCommand {
    metadata: CommandMetadata,
    redo: Option<Action>,
    undo: Option<Action>,
    can_execute_changed: Subscribers<bool>,
}

impl fmt::Debug for UiCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiCommand")
            .field("metadata", &self.metadata)
            .field("has_redo", &self.redo.is_some())
            .field("has_undo", &self.undo.is_some())
            .finish()
    }
}

impl UiCommand {
    #[must_use]
    pub fn new(info: impl Into<String>) -> Self {
        Self {
            metadata: CommandMetadata::new(info),
            redo: None,
            undo: None,
            can_execute_changed: Subscribers::default(),
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.metadata = self.metadata.with_source(source);
        self
    }

    /// Set the action `execute`/`redo` runs.
    #[must_use]
    pub fn with_redo(mut self, action: impl FnMut() -> CommandResult + 'static) -> Self {
        self.redo = Some(Box::new(action));
        self
    }

    /// Set the action `undo` runs.
    #[must_use]
    pub fn with_undo(mut self, action: impl FnMut() -> CommandResult + 'static) -> Self {
        self.undo = Some(Box::new(action));
        self
    }

    /// Replace the redo action, notifying `can_execute` subscribers if
    /// availability flipped.
    pub fn set_redo(&mut self, action: Option<Action>) {
        let before = self.can_execute();
        self.redo = action;
        let after = self.can_execute();
        if before != after {
            for cb in &self.can_execute_changed.live() {
                cb(&after);
            }
        }
    }

    pub fn set_undo(&mut self, action: Option<Action>) {
        self.undo = action;
    }

    #[must_use]
    pub fn info(&self) -> &str {
        &self.metadata.description
    }

    #[must_use]
    pub fn can_execute(&self) -> bool {
        self.redo.is_some()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo.is_some()
    }

    /// Subscribe to changes of [`can_execute`](Self::can_execute).
    pub fn subscribe_can_execute_changed(
        &mut self,
        callback: impl Fn(&bool) + 'static,
    ) -> Subscription {
        self.can_execute_changed.subscribe(callback)
    }
}

impl UndoableCmd for UiCommand {
    fn execute(&mut self) -> CommandResult {
        let action = self
            .redo
            .as_mut()
            .ok_or(CommandError::Unimplemented("execute"))?;
        action()
    }

    fn undo(&mut self) -> CommandResult {
        let action = self
            .undo
            .as_mut()
            .ok_or(CommandError::Unimplemented("undo"))?;
        action()
    }

    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }
}

/// Something that exposes a table of named [`UiCommand`]s.
pub trait Commandable {
    fn commands(&self) -> &HashMap<String, UiCommand>;

    fn commands_mut(&mut self) -> &mut HashMap<String, UiCommand>;

    fn command(&self, name: &str) -> Option<&UiCommand> {
        self.commands().get(name)
    }

    /// Execute the command registered under `name`.
    ///
    /// # Errors
    ///
    /// [`CommandError::UnknownCommand`] if nothing is registered under
    /// `name`, otherwise whatever the command returns.
    fn execute_command(&mut self, name: &str) -> CommandResult {
        self.commands_mut()
            .get_mut(name)
            .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?
            .execute()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn command_without_actions_cannot_execute() {
        let mut cmd = UiCommand::new("Nothing");
        assert!(!cmd.can_execute());
        assert!(!cmd.can_undo());
        assert_eq!(cmd.execute(), Err(CommandError::Unimplemented("execute")));
        assert_eq!(cmd.undo(), Err(CommandError::Unimplemented("undo")));
    }

    #[test]
    fn execute_runs_redo_and_undo_reverts() {
        let value = Rc::new(Cell::new(0));
        let v1 = Rc::clone(&value);
        let v2 = Rc::clone(&value);
        let mut cmd = UiCommand::new("Bump")
            .with_source("toolbar")
            .with_redo(move || {
                v1.set(v1.get() + 1);
                Ok(())
            })
            .with_undo(move || {
                v2.set(v2.get() - 1);
                Ok(())
            });

        assert!(cmd.can_execute());
        cmd.execute().unwrap();
        assert_eq!(value.get(), 1);
        cmd.undo().unwrap();
        assert_eq!(value.get(), 0);
        cmd.redo().unwrap();
        assert_eq!(value.get(), 1);
        assert_eq!(cmd.description(), "Bump");
        assert_eq!(cmd.metadata().source.as_deref(), Some("toolbar"));
    }

    #[test]
    fn can_execute_changed_fires_on_flip() {
        let mut cmd = UiCommand::new("Toggle");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = cmd.subscribe_can_execute_changed(move |v| sink.borrow_mut().push(*v));

        cmd.set_redo(Some(Box::new(|| Ok(()))));
        cmd.set_redo(Some(Box::new(|| Ok(()))));
        cmd.set_redo(None);
        assert_eq!(*seen.borrow(), vec![true, false]);
    }

    struct Menu {
        commands: HashMap<String, UiCommand>,
    }

    impl Commandable for Menu {
        fn commands(&self) -> &HashMap<String, UiCommand> {
            &self.commands
        }

        fn commands_mut(&mut self) -> &mut HashMap<String, UiCommand> {
            &mut self.commands
        }
    }

    #[test]
    fn commandable_dispatches_by_name() {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let mut menu = Menu {
            commands: HashMap::new(),
        };
        menu.commands.insert(
            "save".to_string(),
            UiCommand::new("Save").with_redo(move || {
                h.set(h.get() + 1);
                Ok(())
            }),
        );

        menu.execute_command("save").unwrap();
        assert_eq!(hits.get(), 1);
        assert!(menu.command("save").is_some_and(UiCommand::can_execute));
        assert_eq!(
            menu.execute_command("open"),
            Err(CommandError::UnknownCommand("open".to_string()))
        );
    }

    #[test]
    fn error_display_and_source() {
        let err = CommandError::from(ListError::OutOfRange { index: 1, len: 0 });
        assert!(err.to_string().contains("index 1 out of range"));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(
            CommandError::Unimplemented("undo").to_string(),
            "command has no undo action"
        );
    }
}
