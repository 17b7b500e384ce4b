#![forbid(unsafe_code)]

//! A history shared between an editing surface and the lists it edits.
//!
//! [`SharedHistory::track`] subscribes to a list's slot notifications and
//! turns each one into an undo entry, so edits made anywhere (an inspector
//! writing through a descriptor, application code calling `set`) become
//! undoable without the caller building commands.
//!
//! - A `Replaced` change records a [`SlotEditCmd`], an `Inserted` change a
//!   [`SlotInsertCmd`]. Bulk add/remove notifications are not recorded.
//! - With [`HistoryConfig::coalesce_slot_edits`] on, an edit of the same
//!   slot that the newest entry covers replaces that entry, keeping the
//!   oldest value. An edit back to that value removes the entry.
//! - Changes raised while the history itself is undoing, redoing, or
//!   executing are not recorded again.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::{trace, warn};

use super::command::{CommandError, CommandResult, UndoableCmd};
use super::history::{HistoryConfig, HistoryManager};
use super::list_edit::{SlotEditCmd, SlotInsertCmd};
use crate::reactive::{ObservableList, SlotChange, SlotChangeKind, Subscription, WeakList};

/// Clonable handle to one [`HistoryManager`].
#[derive(Clone, Default)]
pub struct SharedHistory {
    history: Rc<RefCell<HistoryManager>>,
    replaying: Rc<Cell<bool>>,
}

impl fmt::Debug for SharedHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedHistory")
            .field("history", &self.history)
            .field("replaying", &self.replaying.get())
            .finish()
    }
}

/// Last edit a tracker recorded, kept for coalescing.
struct PendingEdit<T> {
    seq: u64,
    index: usize,
    first_old: T,
}

/// Marks the history as replaying until dropped.
struct ReplayGuard<'a> {
    flag: &'a Cell<bool>,
    previous: bool,
}

impl Drop for ReplayGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(self.previous);
    }
}

impl SharedHistory {
    #[must_use]
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            history: Rc::new(RefCell::new(HistoryManager::new(config))),
            replaying: Rc::default(),
        }
    }

    fn replay_guard(&self) -> ReplayGuard<'_> {
        ReplayGuard {
            flag: &self.replaying,
            previous: self.replaying.replace(true),
        }
    }

    /// Execute and record `cmd`. Changes it raises on tracked lists are
    /// not recorded a second time.
    ///
    /// # Errors
    ///
    /// Returns the command's error; nothing is recorded in that case.
    pub fn execute(&self, cmd: Box<dyn UndoableCmd>) -> CommandResult {
        let _guard = self.replay_guard();
        self.history.borrow_mut().execute(cmd)
    }

    /// Record an already-applied command.
    pub fn push(&self, cmd: Box<dyn UndoableCmd>) -> u64 {
        self.history.borrow_mut().push(cmd)
    }

    /// See [`HistoryManager::undo`].
    pub fn undo(&self) -> Option<Result<String, CommandError>> {
        let _guard = self.replay_guard();
        self.history.borrow_mut().undo()
    }

    /// See [`HistoryManager::redo`].
    pub fn redo(&self) -> Option<Result<String, CommandError>> {
        let _guard = self.replay_guard();
        self.history.borrow_mut().redo()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.borrow().can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.borrow().can_redo()
    }

    /// Read the underlying history.
    ///
    /// # Panics
    ///
    /// Panics if `f` drives this history.
    pub fn with<R>(&self, f: impl FnOnce(&HistoryManager) -> R) -> R {
        f(&self.history.borrow())
    }

    pub fn clear(&self) {
        self.history.borrow_mut().clear();
    }

    /// Record slot edits and insertions of `list` until the returned
    /// [`Subscription`] is dropped.
    ///
    /// The tracker holds the list weakly; recorded entries hold it
    /// strongly.
    pub fn track<T: Clone + PartialEq + 'static>(
        &self,
        list: &ObservableList<T>,
    ) -> Subscription {
        let history = self.clone();
        let target = list.downgrade();
        let pending: RefCell<Option<PendingEdit<T>>> = RefCell::new(None);
        list.subscribe_slots(move |change| history.record(&target, &pending, change))
    }

    fn record<T: Clone + PartialEq + 'static>(
        &self,
        target: &WeakList<T>,
        pending: &RefCell<Option<PendingEdit<T>>>,
        change: &SlotChange<T>,
    ) {
        if self.replaying.get() {
            return;
        }
        let Some(list) = target.upgrade() else {
            return;
        };
        let Ok(mut history) = self.history.try_borrow_mut() else {
            warn!(index = change.index, "history busy, slot change not recorded");
            return;
        };
        let mut pending = pending.borrow_mut();
        let previous = pending.take();

        match change.kind {
            SlotChangeKind::Inserted => {
                let cmd = SlotInsertCmd::new(&list, change.index, change.new.clone());
                history.push(Box::new(cmd));
            }
            SlotChangeKind::Replaced => {
                let Some(mut old) = change.old.clone() else {
                    return;
                };
                if let Some(prev) = previous {
                    if history.config().coalesce_slot_edits
                        && prev.index == change.index
                        && history.discard_top(prev.seq)
                    {
                        old = prev.first_old;
                    }
                }
                if old == change.new {
                    trace!(index = change.index, "slot edits cancelled out");
                    return;
                }
                let cmd = SlotEditCmd::new(&list, change.index, old.clone(), change.new.clone());
                let seq = history.push(Box::new(cmd));
                *pending = Some(PendingEdit {
                    seq,
                    index: change.index,
                    first_old: old,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::Describable;

    fn tracked(
        values: &[i32],
        config: HistoryConfig,
    ) -> (ObservableList<i32>, SharedHistory, Subscription) {
        let list: ObservableList<i32> = values.iter().copied().collect();
        let history = SharedHistory::new(config);
        let sub = history.track(&list);
        (list, history, sub)
    }

    #[test]
    fn direct_edits_become_undoable() {
        let (list, history, _sub) = tracked(&[1, 2], HistoryConfig::default());
        list.set(0, 10).unwrap();
        list.insert(2, 3).unwrap();
        assert_eq!(history.with(HistoryManager::undo_depth), 2);

        assert_eq!(history.undo(), Some(Ok("Insert [2]".to_string())));
        assert_eq!(history.undo(), Some(Ok("Edit [0]".to_string())));
        assert_eq!(list.to_vec(), vec![1, 2]);
        assert_eq!(history.with(HistoryManager::redo_depth), 2);

        history.redo().unwrap().unwrap();
        assert_eq!(list.to_vec(), vec![10, 2]);
        assert_eq!(history.with(HistoryManager::undo_depth), 1);
    }

    #[test]
    fn repeated_edits_of_one_slot_coalesce() {
        let (list, history, _sub) = tracked(&[1, 2], HistoryConfig::default());
        list.set(0, 5).unwrap();
        list.set(0, 6).unwrap();
        list.set(0, 7).unwrap();
        assert_eq!(history.with(HistoryManager::undo_depth), 1);

        history.undo().unwrap().unwrap();
        assert_eq!(list.to_vec(), vec![1, 2]);
    }

    #[test]
    fn edits_of_other_slots_do_not_coalesce() {
        let (list, history, _sub) = tracked(&[1, 2], HistoryConfig::default());
        list.set(0, 5).unwrap();
        list.set(1, 6).unwrap();
        list.set(0, 7).unwrap();
        assert_eq!(history.with(HistoryManager::undo_depth), 3);
    }

    #[test]
    fn edit_back_to_original_drops_entry() {
        let (list, history, _sub) = tracked(&[1], HistoryConfig::default());
        list.set(0, 4).unwrap();
        list.set(0, 1).unwrap();
        assert!(!history.can_undo());
    }

    #[test]
    fn coalescing_can_be_disabled() {
        let config = HistoryConfig::default().with_coalescing(false);
        let (list, history, _sub) = tracked(&[1], config);
        list.set(0, 5).unwrap();
        list.set(0, 6).unwrap();
        assert_eq!(history.with(HistoryManager::undo_depth), 2);
    }

    #[test]
    fn no_coalescing_across_undo() {
        let (list, history, _sub) = tracked(&[1], HistoryConfig::default());
        list.set(0, 5).unwrap();
        history.undo().unwrap().unwrap();
        list.set(0, 8).unwrap();

        assert!(!history.can_redo());
        history.undo().unwrap().unwrap();
        assert_eq!(list.get(0), Ok(1));
    }

    #[test]
    fn inspector_writes_are_recorded() {
        let (list, history, _sub) = tracked(&[3, 4], HistoryConfig::default());
        list.properties()[1].set_any(Box::new(40)).unwrap();
        assert_eq!(
            history.with(|h| h.next_undo_description().map(str::to_string)),
            Some("Edit [1]".to_string())
        );
    }

    #[test]
    fn executed_commands_are_recorded_once() {
        let (list, history, _sub) = tracked(&[1], HistoryConfig::default());
        history
            .execute(Box::new(SlotEditCmd::new(&list, 0, 1, 2)))
            .unwrap();
        assert_eq!(history.with(HistoryManager::undo_depth), 1);
        assert_eq!(list.get(0), Ok(2));
    }

    #[test]
    fn dropping_the_subscription_stops_recording() {
        let (list, history, sub) = tracked(&[1], HistoryConfig::default());
        drop(sub);
        list.set(0, 2).unwrap();
        assert!(!history.can_undo());
    }
}
