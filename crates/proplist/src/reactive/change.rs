#![forbid(unsafe_code)]

//! Notification payloads raised by [`ObservableList`](super::ObservableList).
//!
//! Two shapes exist:
//!
//! - [`SlotChange`]: one index changed value (an edit of an existing slot,
//!   or a new value placed at an index by `insert`).
//! - [`CollectionChange`]: elements joined or left the list as one
//!   structural event, however many elements were involved.

/// How a slot came to hold its new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotChangeKind {
    /// An existing slot was overwritten by `set`.
    Replaced,
    /// A value was inserted at the index; the previous occupant (if any)
    /// shifted one slot right.
    Inserted,
}

/// Single-slot change notification.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotChange<T> {
    /// Index of the slot that changed.
    pub index: usize,
    /// Value previously at `index`.
    ///
    /// Always `Some` for [`SlotChangeKind::Replaced`]. For
    /// [`SlotChangeKind::Inserted`] this is the displaced value, or `None`
    /// when the insert appended at the end.
    pub old: Option<T>,
    /// Value now at `index`.
    pub new: T,
    /// Replacement or insertion.
    pub kind: SlotChangeKind,
}

impl<T> SlotChange<T> {
    pub(crate) fn replaced(index: usize, old: T, new: T) -> Self {
        Self {
            index,
            old: Some(old),
            new,
            kind: SlotChangeKind::Replaced,
        }
    }

    pub(crate) fn inserted(index: usize, displaced: Option<T>, new: T) -> Self {
        Self {
            index,
            old: displaced,
            new,
            kind: SlotChangeKind::Inserted,
        }
    }

    /// Whether the list length changed as part of this notification.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        self.kind == SlotChangeKind::Inserted
    }
}

/// Kind of structural change carried by a [`CollectionChange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAction {
    Add,
    Remove,
}

/// Bulk change notification.
///
/// Exactly one of `added` / `removed` is populated, matching `action`.
/// Batches may be empty (e.g. `clear()` on an empty list).
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionChange<T> {
    pub added: Vec<T>,
    pub removed: Vec<T>,
    pub action: ChangeAction,
}

impl<T> CollectionChange<T> {
    pub(crate) fn added(items: Vec<T>) -> Self {
        Self {
            added: items,
            removed: Vec::new(),
            action: ChangeAction::Add,
        }
    }

    pub(crate) fn removed(items: Vec<T>) -> Self {
        Self {
            added: Vec::new(),
            removed: items,
            action: ChangeAction::Remove,
        }
    }

    /// Number of elements carried by this notification.
    #[must_use]
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaced_carries_old_value() {
        let change = SlotChange::replaced(2, "a", "b");
        assert_eq!(change.old, Some("a"));
        assert_eq!(change.new, "b");
        assert!(!change.is_structural());
    }

    #[test]
    fn inserted_at_end_has_no_old_value() {
        let change: SlotChange<i32> = SlotChange::inserted(3, None, 9);
        assert_eq!(change.old, None);
        assert!(change.is_structural());
    }

    #[test]
    fn collection_change_sides() {
        let add = CollectionChange::added(vec![1, 2]);
        assert_eq!(add.action, ChangeAction::Add);
        assert!(add.removed.is_empty());
        assert_eq!(add.len(), 2);

        let remove: CollectionChange<i32> = CollectionChange::removed(Vec::new());
        assert_eq!(remove.action, ChangeAction::Remove);
        assert!(remove.is_empty());
    }
}
