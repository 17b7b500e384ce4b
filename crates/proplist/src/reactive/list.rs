#![forbid(unsafe_code)]

//! Ordered list with change notification and shape tracking.
//!
//! # Design
//!
//! [`ObservableList<T>`] keeps its elements in shared, reference-counted
//! storage (`Rc<RefCell<..>>`). Cloning a list yields another handle to the
//! same elements and the same subscribers.
//!
//! Two notification channels exist:
//!
//! | Channel | Payload | Raised by |
//! |---------|---------|-----------|
//! | slot | [`SlotChange`] | `set` (value changed), `insert` |
//! | collection | [`CollectionChange`] | `add`, `add_range`, `remove`, `remove_at`, `remove_range`, `clear` |
//!
//! Bulk operations raise a single collection notification for the whole
//! batch. Removals notify *before* the elements leave the list; additions
//! and slot changes notify after.
//!
//! # Counters
//!
//! - `version` increments once per mutation that changed contents.
//! - `epoch` increments once per structural mutation (length changed or
//!   indices shifted). Slot descriptors capture it and refuse to operate
//!   once it has moved.
//!
//! # Re-entrancy
//!
//! Callbacks run after the interior borrow is released, so a subscriber
//! may read or mutate the list. Nested mutations notify immediately; there
//! is no cycle guard.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

use super::change::{CollectionChange, SlotChange};
use super::subscribers::{Subscribers, Subscription};
use crate::error::{ListError, ListResult};

/// What `remove(value)` reports when `value` is not in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingRemoval {
    /// Raise the removal notification anyway.
    #[default]
    Notify,
    /// Stay silent; nothing was removed.
    Suppress,
}

/// Behavior knobs for an [`ObservableList`].
#[derive(Debug, Clone, Default)]
pub struct ListConfig {
    /// Notification policy for removing an absent value.
    pub missing_removal: MissingRemoval,
}

impl ListConfig {
    /// Set the policy for removing an absent value.
    #[must_use]
    pub fn with_missing_removal(mut self, policy: MissingRemoval) -> Self {
        self.missing_removal = policy;
        self
    }
}

struct ListInner<T> {
    items: Vec<T>,
    version: u64,
    epoch: u64,
    config: ListConfig,
    slot_subscribers: Subscribers<SlotChange<T>>,
    collection_subscribers: Subscribers<CollectionChange<T>>,
}

impl<T> ListInner<T> {
    fn bump_structural(&mut self) {
        self.version += 1;
        self.epoch += 1;
    }

    fn out_of_range(&self, index: usize) -> ListError {
        ListError::OutOfRange {
            index,
            len: self.items.len(),
        }
    }
}

/// A shared, ordered list that notifies subscribers of changes.
///
/// # Invariants
///
/// 1. Indices are contiguous `0..len()`.
/// 2. `set(i, v)` with `v == get(i)` is a no-op: no notification, no
///    counter bump.
/// 3. Each bulk operation raises exactly one collection notification.
/// 4. Subscribers are notified in registration order.
pub struct ObservableList<T> {
    inner: Rc<RefCell<ListInner<T>>>,
}

impl<T> Clone for ObservableList<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Handles compare by identity: two lists are equal when they share
/// storage. Nesting lists therefore treats re-assigning the same handle as
/// a no-op and any other handle as a change.
impl<T> PartialEq for ObservableList<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Eq for ObservableList<T> {}

impl<T: fmt::Debug> fmt::Debug for ObservableList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ObservableList")
            .field("items", &inner.items)
            .field("version", &inner.version)
            .field("epoch", &inner.epoch)
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Default for ObservableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + PartialEq + 'static> FromIterator<T> for ObservableList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let list = Self::new();
        list.inner.borrow_mut().items.extend(iter);
        list
    }
}

impl<T: Clone + PartialEq + 'static> ObservableList<T> {
    /// Create an empty list with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ListConfig::default())
    }

    /// Create an empty list with the given configuration.
    #[must_use]
    pub fn with_config(config: ListConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ListInner {
                items: Vec::new(),
                version: 0,
                epoch: 0,
                config,
                slot_subscribers: Subscribers::default(),
                collection_subscribers: Subscribers::default(),
            })),
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Clone of the element at `index`.
    ///
    /// # Errors
    ///
    /// [`ListError::OutOfRange`] unless `index < len()`.
    pub fn get(&self, index: usize) -> ListResult<T> {
        let inner = self.inner.borrow();
        inner
            .items
            .get(index)
            .cloned()
            .ok_or_else(|| inner.out_of_range(index))
    }

    /// Borrow the elements as a slice for the duration of `f`.
    ///
    /// # Panics
    ///
    /// Panics if `f` mutates this list.
    pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.inner.borrow().items)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().items.is_empty()
    }

    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.inner.borrow().items.contains(value)
    }

    /// Index of the first element equal to `value`.
    #[must_use]
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.inner.borrow().items.iter().position(|x| x == value)
    }

    /// Clone every element into `target`, starting at `offset`.
    ///
    /// # Errors
    ///
    /// [`ListError::OutOfRange`] if the elements do not fit in
    /// `target[offset..]`.
    pub fn copy_into(&self, target: &mut [T], offset: usize) -> ListResult<()> {
        let inner = self.inner.borrow();
        let end = offset
            .checked_add(inner.items.len())
            .filter(|&end| end <= target.len())
            .ok_or(ListError::OutOfRange {
                index: offset,
                len: target.len(),
            })?;
        target[offset..end].clone_from_slice(&inner.items);
        Ok(())
    }

    /// Snapshot of the current elements.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.inner.borrow().items.clone()
    }

    /// Iterate over a snapshot of the current elements.
    ///
    /// Mutations made while iterating are not observed by the iterator.
    pub fn iter(&self) -> std::vec::IntoIter<T> {
        self.to_vec().into_iter()
    }

    /// Content version. Increments once per mutation that changed contents.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Shape epoch. Increments once per structural mutation.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.inner.borrow().epoch
    }

    #[must_use]
    pub fn config(&self) -> ListConfig {
        self.inner.borrow().config.clone()
    }

    // ========================================================================
    // Slot mutations
    // ========================================================================

    /// Replace the element at `index`.
    ///
    /// If `value` equals the current element nothing happens. Otherwise
    /// the slot is overwritten and a [`SlotChange`] is raised.
    ///
    /// # Errors
    ///
    /// [`ListError::OutOfRange`] unless `index < len()`.
    pub fn set(&self, index: usize, value: T) -> ListResult<()> {
        let change = {
            let mut inner = self.inner.borrow_mut();
            let len = inner.items.len();
            let slot = inner
                .items
                .get_mut(index)
                .ok_or(ListError::OutOfRange { index, len })?;
            if *slot == value {
                return Ok(());
            }
            let old = std::mem::replace(slot, value.clone());
            inner.version += 1;
            SlotChange::replaced(index, old, value)
        };
        trace!(index, "slot replaced");
        self.emit_slot(&change);
        Ok(())
    }

    /// Insert `value` at `index`, shifting later elements right.
    ///
    /// Raises a [`SlotChange`] of kind `Inserted` whose `old` is the element
    /// displaced from `index`, or `None` when inserting at `len()`.
    ///
    /// # Errors
    ///
    /// [`ListError::OutOfRange`] unless `index <= len()`.
    pub fn insert(&self, index: usize, value: T) -> ListResult<()> {
        let change = {
            let mut inner = self.inner.borrow_mut();
            if index > inner.items.len() {
                return Err(inner.out_of_range(index));
            }
            let displaced = inner.items.get(index).cloned();
            inner.items.insert(index, value.clone());
            inner.bump_structural();
            SlotChange::inserted(index, displaced, value)
        };
        trace!(index, "slot inserted");
        self.emit_slot(&change);
        Ok(())
    }

    // ========================================================================
    // Bulk mutations
    // ========================================================================

    /// Append `value`.
    pub fn add(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.items.push(value.clone());
            inner.bump_structural();
        }
        trace!(count = 1, "elements added");
        self.emit_collection(&CollectionChange::added(vec![value]));
    }

    /// Append every element of `values`, raising one notification for the
    /// whole batch (also for an empty batch).
    pub fn add_range(&self, values: impl IntoIterator<Item = T>) {
        let batch: Vec<T> = values.into_iter().collect();
        {
            let mut inner = self.inner.borrow_mut();
            inner.items.extend_from_slice(&batch);
            if !batch.is_empty() {
                inner.bump_structural();
            }
        }
        trace!(count = batch.len(), "elements added");
        self.emit_collection(&CollectionChange::added(batch));
    }

    /// Remove the first element equal to `value`.
    ///
    /// The removal notification is raised before the element leaves the
    /// list. With [`MissingRemoval::Notify`] (the default) it is raised even
    /// when no element matches.
    ///
    /// Returns whether an element was removed.
    pub fn remove(&self, value: &T) -> bool {
        let notify = {
            let inner = self.inner.borrow();
            inner.config.missing_removal == MissingRemoval::Notify
                || inner.items.contains(value)
        };
        if notify {
            self.emit_collection(&CollectionChange::removed(vec![value.clone()]));
        }

        let mut inner = self.inner.borrow_mut();
        let position = inner.items.iter().position(|x| x == value);
        match position {
            Some(pos) => {
                inner.items.remove(pos);
                inner.bump_structural();
                trace!(index = pos, "element removed");
                true
            }
            None => {
                trace!("remove found no matching element");
                false
            }
        }
    }

    /// Remove and return the element at `index`.
    ///
    /// The removal notification is raised before the element leaves the
    /// list.
    ///
    /// # Errors
    ///
    /// [`ListError::OutOfRange`] unless `index < len()`, checked both before
    /// notifying and again after subscribers have run.
    pub fn remove_at(&self, index: usize) -> ListResult<T> {
        let item = self.get(index)?;
        self.emit_collection(&CollectionChange::removed(vec![item]));

        let mut inner = self.inner.borrow_mut();
        if index >= inner.items.len() {
            return Err(inner.out_of_range(index));
        }
        let removed = inner.items.remove(index);
        inner.bump_structural();
        trace!(index, "element removed");
        Ok(removed)
    }

    /// Remove the first occurrence of each element of `values`, in order.
    ///
    /// One notification carrying all of `values` is raised before anything
    /// is removed. Returns how many elements were actually removed.
    pub fn remove_range(&self, values: impl IntoIterator<Item = T>) -> usize {
        let batch: Vec<T> = values.into_iter().collect();
        self.emit_collection(&CollectionChange::removed(batch.clone()));

        let mut inner = self.inner.borrow_mut();
        let mut removed = 0;
        for value in &batch {
            let position = inner.items.iter().position(|x| x == value);
            if let Some(pos) = position {
                inner.items.remove(pos);
                removed += 1;
            }
        }
        if removed > 0 {
            inner.bump_structural();
        }
        trace!(requested = batch.len(), removed, "elements removed");
        removed
    }

    /// Remove every element.
    ///
    /// One notification carrying the full prior contents is raised before
    /// the list is emptied.
    pub fn clear(&self) {
        let snapshot = self.to_vec();
        self.emit_collection(&CollectionChange::removed(snapshot));

        let mut inner = self.inner.borrow_mut();
        if !inner.items.is_empty() {
            inner.items.clear();
            inner.bump_structural();
        }
        trace!("list cleared");
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Subscribe to single-slot changes.
    ///
    /// Dropping the returned [`Subscription`] unsubscribes.
    pub fn subscribe_slots(&self, callback: impl Fn(&SlotChange<T>) + 'static) -> Subscription {
        self.inner.borrow_mut().slot_subscribers.subscribe(callback)
    }

    /// Subscribe to bulk add/remove changes.
    ///
    /// Dropping the returned [`Subscription`] unsubscribes.
    pub fn subscribe_collection(
        &self,
        callback: impl Fn(&CollectionChange<T>) + 'static,
    ) -> Subscription {
        self.inner
            .borrow_mut()
            .collection_subscribers
            .subscribe(callback)
    }

    /// Registered slot subscribers, including dead ones not yet pruned.
    #[must_use]
    pub fn slot_subscriber_count(&self) -> usize {
        self.inner.borrow().slot_subscribers.len()
    }

    /// Registered collection subscribers, including dead ones not yet
    /// pruned.
    #[must_use]
    pub fn collection_subscriber_count(&self) -> usize {
        self.inner.borrow().collection_subscribers.len()
    }

    /// Whether two handles share the same storage.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn downgrade(&self) -> WeakList<T> {
        WeakList {
            inner: Rc::downgrade(&self.inner),
        }
    }

    fn emit_slot(&self, change: &SlotChange<T>) {
        let callbacks = self.inner.borrow_mut().slot_subscribers.live();
        for cb in &callbacks {
            cb(change);
        }
    }

    fn emit_collection(&self, change: &CollectionChange<T>) {
        let callbacks = self.inner.borrow_mut().collection_subscribers.live();
        for cb in &callbacks {
            cb(change);
        }
    }
}

impl<T: Clone + PartialEq + 'static> IntoIterator for &ObservableList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Non-owning handle to an [`ObservableList`].
pub(crate) struct WeakList<T> {
    inner: Weak<RefCell<ListInner<T>>>,
}

impl<T> Clone for WeakList<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T> WeakList<T> {
    pub(crate) fn upgrade(&self) -> Option<ObservableList<T>> {
        self.inner.upgrade().map(|inner| ObservableList { inner })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
