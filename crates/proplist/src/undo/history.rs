#![forbid(unsafe_code)]

//! Undo/redo stacks.
//!
//! Every entry gets a sequence number when it is pushed. The number stays
//! with the entry as it moves between the stacks, which lets a recorder
//! recognize "the entry I pushed last is still on top" and fold a follow-up
//! edit into it (see [`SharedHistory`](super::SharedHistory)).
//!
//! ```text
//! push(a) push(b)      undo()           push(c)
//! undo: [a, b]         undo: [a]        undo: [a, c]
//! redo: []             redo: [b]        redo: []
//! ```
//!
//! A failed undo or redo leaves the entry on the stack it came from.

use std::fmt;

use tracing::debug;

use super::command::{CommandError, CommandResult, UndoableCmd};

/// Limits and policies for a [`HistoryManager`].
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Maximum number of entries kept for undo; older ones are dropped.
    pub max_depth: usize,
    /// Fold consecutive edits of the same list slot into one entry when
    /// recorded through [`SharedHistory::track`](super::SharedHistory::track).
    pub coalesce_slot_edits: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: 100,
            coalesce_slot_edits: true,
        }
    }
}

impl HistoryConfig {
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }

    /// No depth limit.
    #[must_use]
    pub fn unlimited() -> Self {
        Self::new(usize::MAX)
    }

    #[must_use]
    pub fn with_coalescing(mut self, coalesce: bool) -> Self {
        self.coalesce_slot_edits = coalesce;
        self
    }
}

struct Entry {
    seq: u64,
    cmd: Box<dyn UndoableCmd>,
}

#[derive(Clone, Copy)]
enum Direction {
    Undo,
    Redo,
}

/// Undo and redo stacks of executed commands.
pub struct HistoryManager {
    /// Oldest first.
    undo_stack: Vec<Entry>,
    /// Most recently undone last.
    redo_stack: Vec<Entry>,
    config: HistoryConfig,
    next_seq: u64,
}

impl fmt::Debug for HistoryManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryManager")
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("next_seq", &self.next_seq)
            .field("config", &self.config)
            .finish()
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl HistoryManager {
    #[must_use]
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            config,
            next_seq: 0,
        }
    }

    /// Record an already-applied command and return its sequence number.
    ///
    /// Discards everything on the redo stack.
    pub fn push(&mut self, cmd: Box<dyn UndoableCmd>) -> u64 {
        if !self.redo_stack.is_empty() {
            debug!(dropped = self.redo_stack.len(), "redo branch discarded");
            self.redo_stack.clear();
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.undo_stack.push(Entry { seq, cmd });

        let excess = self.undo_stack.len().saturating_sub(self.config.max_depth);
        for evicted in self.undo_stack.drain(..excess) {
            debug!(
                seq = evicted.seq,
                description = evicted.cmd.description(),
                "undo entry evicted"
            );
        }
        seq
    }

    /// Execute `cmd`, then record it.
    ///
    /// # Errors
    ///
    /// Returns the command's error; nothing is recorded in that case.
    pub fn execute(&mut self, mut cmd: Box<dyn UndoableCmd>) -> CommandResult {
        cmd.execute()?;
        self.push(cmd);
        Ok(())
    }

    /// Undo the newest entry.
    ///
    /// Returns `None` if there is nothing to undo, otherwise the entry's
    /// description or the error its command failed with.
    pub fn undo(&mut self) -> Option<Result<String, CommandError>> {
        self.step(Direction::Undo)
    }

    /// Redo the most recently undone entry.
    ///
    /// Returns `None` if there is nothing to redo, otherwise the entry's
    /// description or the error its command failed with.
    pub fn redo(&mut self) -> Option<Result<String, CommandError>> {
        self.step(Direction::Redo)
    }

    fn step(&mut self, direction: Direction) -> Option<Result<String, CommandError>> {
        let (from, to) = match direction {
            Direction::Undo => (&mut self.undo_stack, &mut self.redo_stack),
            Direction::Redo => (&mut self.redo_stack, &mut self.undo_stack),
        };
        let mut entry = from.pop()?;
        let outcome = match direction {
            Direction::Undo => entry.cmd.undo(),
            Direction::Redo => entry.cmd.redo(),
        };
        let description = entry.cmd.description().to_string();
        match outcome {
            Ok(()) => {
                to.push(entry);
                Some(Ok(description))
            }
            Err(err) => {
                debug!(seq = entry.seq, %err, "history step failed");
                from.push(entry);
                Some(Err(err))
            }
        }
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Description of what `undo` would revert, for an "Undo ..." menu
    /// label.
    #[must_use]
    pub fn next_undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|e| e.cmd.description())
    }

    #[must_use]
    pub fn next_redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|e| e.cmd.description())
    }

    /// Sequence number of the newest undo entry.
    #[must_use]
    pub fn top_seq(&self) -> Option<u64> {
        self.undo_stack.last().map(|e| e.seq)
    }

    #[must_use]
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Drop both stacks. Sequence numbers keep counting up.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Remove the newest undo entry without undoing it, if its sequence
    /// number is `seq`.
    pub(crate) fn discard_top(&mut self, seq: u64) -> bool {
        if self.top_seq() != Some(seq) {
            return false;
        }
        self.undo_stack.pop();
        true
    }
}
