#![forbid(unsafe_code)]

//! Observable, introspectable lists for property-grid UIs.
//!
//! # Role
//! `proplist` is glue between application data and a generic property
//! inspector. It owns three concerns:
//!
//! - **Reactive lists** ([`reactive`]): an ordered container that raises
//!   single-slot and bulk change notifications.
//! - **Introspection** ([`inspect`]): every list slot is exposed as a named,
//!   gettable/settable property, and a [`TypeDecorations`] registry tells the
//!   inspector which value types render as expandable nodes.
//! - **Undo** ([`undo`]): a command object with execute/undo/redo and a
//!   bounded history stack.
//!
//! # Threading
//! Everything here is single-threaded. Lists are `Rc`-shared handles and
//! notifications run synchronously on the caller's stack.

pub mod error;
pub mod inspect;
pub mod reactive;
pub mod undo;

pub use error::{ListError, ListResult};
pub use inspect::{
    Decoration, Describable, Property, PropertyGrid, PropertyRow, SlotDescriptor, SlotLabel,
    SlotValue, TypeDecorations, TypeInfo,
};
pub use reactive::{
    ChangeAction, CollectionChange, ListConfig, MissingRemoval, ObservableList, SlotChange,
    SlotChangeKind, Subscription,
};
