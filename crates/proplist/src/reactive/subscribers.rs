#![forbid(unsafe_code)]

//! Weak subscriber lists and their RAII guards.
//!
//! Callbacks are owned by the [`Subscription`] handed back to the caller;
//! the notifying side only keeps `Weak` references. Dropping the guard
//! makes the callback unreachable, and dead entries are pruned the next
//! time the list is walked.

use std::any::Any;
use std::fmt;
use std::rc::{Rc, Weak};

type CallbackRc<E> = Rc<dyn Fn(&E)>;
type CallbackWeak<E> = Weak<dyn Fn(&E)>;

/// Ordered set of weakly held callbacks for one event type.
pub(crate) struct Subscribers<E> {
    entries: Vec<CallbackWeak<E>>,
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E: 'static> Subscribers<E> {
    /// Register a callback. The returned guard keeps it alive.
    pub(crate) fn subscribe(&mut self, callback: impl Fn(&E) + 'static) -> Subscription {
        let strong: CallbackRc<E> = Rc::new(callback);
        self.entries.push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Prune dead entries and return the live callbacks in registration
    /// order.
    ///
    /// Callers must release any borrow of the owning state before invoking
    /// the returned callbacks.
    pub(crate) fn live(&mut self) -> Vec<CallbackRc<E>> {
        self.entries.retain(|w| w.strong_count() > 0);
        self.entries.iter().filter_map(Weak::upgrade).collect()
    }

    /// Registered entries, including dead ones not yet pruned.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// RAII guard for a subscriber callback.
///
/// Dropping the `Subscription` drops the only strong reference to the
/// callback, so it is never invoked again.
pub struct Subscription {
    /// Type-erased `Rc<dyn Fn(&E)>`.
    _guard: Box<dyn Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
