#![forbid(unsafe_code)]

//! Reactive collections.
//!
//! - [`ObservableList`]: a shared, ordered list raising [`SlotChange`] and
//!   [`CollectionChange`] notifications.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//!
//! # Architecture
//!
//! Lists use `Rc<RefCell<..>>` for single-threaded shared ownership.
//! Subscribers are stored as `Weak` function pointers and cleaned up lazily
//! during notification.
//!
//! # Invariants
//!
//! 1. Setting a slot to an equal value is a no-op (no notification).
//! 2. Subscribers are notified in registration order.
//! 3. Each bulk operation raises exactly one notification.
//! 4. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.

pub mod change;
pub mod list;
mod subscribers;

pub use change::{ChangeAction, CollectionChange, SlotChange, SlotChangeKind};
pub use list::{ListConfig, MissingRemoval, ObservableList};
pub(crate) use list::WeakList;
pub(crate) use subscribers::Subscribers;
pub use subscribers::Subscription;
