#![forbid(unsafe_code)]

//! Undoable edits of an [`ObservableList`].
//!
//! Commands keep a strong handle to their list, so the list outlives any
//! history entry that refers to it. Every step goes through the list's own
//! mutation methods and therefore raises the usual notifications.

use super::command::{CommandMetadata, CommandResult, UndoableCmd};
use crate::reactive::{ObservableList, SlotChange, SlotChangeKind};

/// Replace one slot's value; undo writes the old value back.
pub struct SlotEditCmd<T> {
    list: ObservableList<T>,
    index: usize,
    old: T,
    new: T,
    metadata: CommandMetadata,
}

impl<T: Clone + PartialEq + 'static> SlotEditCmd<T> {
    #[must_use]
    pub fn new(list: &ObservableList<T>, index: usize, old: T, new: T) -> Self {
        Self {
            list: list.clone(),
            index,
            old,
            new,
            metadata: CommandMetadata::new(format!("Edit [{}]", index)),
        }
    }

    /// Build the command describing an already-applied replacement.
    ///
    /// Returns `None` for insertions, which are not slot edits.
    #[must_use]
    pub fn from_change(list: &ObservableList<T>, change: &SlotChange<T>) -> Option<Self> {
        if change.kind != SlotChangeKind::Replaced {
            return None;
        }
        let old = change.old.clone()?;
        Some(Self::new(list, change.index, old, change.new.clone()))
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<T: Clone + PartialEq + 'static> UndoableCmd for SlotEditCmd<T> {
    fn execute(&mut self) -> CommandResult {
        self.list.set(self.index, self.new.clone())?;
        Ok(())
    }

    fn undo(&mut self) -> CommandResult {
        self.list.set(self.index, self.old.clone())?;
        Ok(())
    }

    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }
}

/// Insert a value at an index; undo removes it again.
pub struct SlotInsertCmd<T> {
    list: ObservableList<T>,
    index: usize,
    value: T,
    metadata: CommandMetadata,
}

impl<T: Clone + PartialEq + 'static> SlotInsertCmd<T> {
    #[must_use]
    pub fn new(list: &ObservableList<T>, index: usize, value: T) -> Self {
        Self {
            list: list.clone(),
            index,
            value,
            metadata: CommandMetadata::new(format!("Insert [{}]", index)),
        }
    }
}

impl<T: Clone + PartialEq + 'static> UndoableCmd for SlotInsertCmd<T> {
    fn execute(&mut self) -> CommandResult {
        self.list.insert(self.index, self.value.clone())?;
        Ok(())
    }

    fn undo(&mut self) -> CommandResult {
        self.list.remove_at(self.index)?;
        Ok(())
    }

    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ListError;
    use crate::undo::{CommandError, HistoryManager};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn edit_round_trip_through_history() {
        let list: ObservableList<i32> = [1, 2].into_iter().collect();
        let mut history = HistoryManager::default();
        history
            .execute(Box::new(SlotEditCmd::new(&list, 1, 2, 20)))
            .unwrap();
        assert_eq!(list.to_vec(), vec![1, 20]);

        assert_eq!(history.undo(), Some(Ok("Edit [1]".to_string())));
        assert_eq!(list.to_vec(), vec![1, 2]);
        history.redo().unwrap().unwrap();
        assert_eq!(list.to_vec(), vec![1, 20]);
    }

    #[test]
    fn from_change_captures_replacement() {
        let list: ObservableList<i32> = [5].into_iter().collect();
        let captured = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&captured);
        let handle = list.clone();
        let _sub = list.subscribe_slots(move |change| {
            *sink.borrow_mut() = SlotEditCmd::from_change(&handle, change);
        });

        list.set(0, 7).unwrap();
        let mut cmd = captured.borrow_mut().take().expect("replacement recorded");
        cmd.undo().unwrap();
        assert_eq!(list.get(0), Ok(5));

        list.insert(0, 1).unwrap();
        assert!(captured.borrow().is_none());
    }

    #[test]
    fn insert_undo_removes() {
        let list: ObservableList<i32> = [1].into_iter().collect();
        let mut history = HistoryManager::default();
        history
            .execute(Box::new(SlotInsertCmd::new(&list, 0, 0)))
            .unwrap();
        assert_eq!(list.to_vec(), vec![0, 1]);
        history.undo().unwrap().unwrap();
        assert_eq!(list.to_vec(), vec![1]);
    }

    #[test]
    fn failed_edit_reports_list_error() {
        let list: ObservableList<i32> = ObservableList::new();
        let mut history = HistoryManager::default();
        let err = history
            .execute(Box::new(SlotEditCmd::new(&list, 3, 0, 1)))
            .unwrap_err();
        assert_eq!(
            err,
            CommandError::List(ListError::OutOfRange { index: 3, len: 0 })
        );
        assert!(!history.can_undo());
    }
}
