#![forbid(unsafe_code)]

//! Introspection for generic property inspectors.
//!
//! An inspector knows nothing about element types at compile time. It asks
//! a [`Describable`] object for an ordered set of [`Property`] records and
//! reads or writes values through them as `dyn Any`.
//!
//! - [`SlotDescriptor`]: one list slot presented as a named property.
//! - [`TypeDecorations`]: which value types render as expandable nodes,
//!   built once at start-up and passed to whoever needs it.
//! - [`PropertyGrid`]: walks a describable object into ordered rows.
//!
//! ```text
//! ObservableList ──properties()──▶ [ "[0]", "[1]", ... ]
//!                                      │ get/set
//!                                      ▼
//!                              ObservableList::set ──▶ subscribers
//! ```

use std::any::{Any, TypeId};
use std::fmt;

pub mod decorations;
pub mod describe;
pub mod descriptor;
pub mod grid;

pub use decorations::{Decoration, TypeDecorations};
pub use describe::{Describable, Property, SlotValue};
pub use descriptor::{SlotDescriptor, SlotLabel};
pub use grid::{PropertyGrid, PropertyRow};

/// Runtime identity of a type plus its name for display.
#[derive(Clone, Copy)]
pub struct TypeInfo {
    pub id: TypeId,
    pub name: &'static str,
}

impl TypeInfo {
    #[must_use]
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Whether this describes `T`.
    #[must_use]
    pub fn is<T: Any + ?Sized>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_info_identity() {
        let a = TypeInfo::of::<u8>();
        assert!(a.is::<u8>());
        assert!(!a.is::<u16>());
        assert_eq!(a, TypeInfo::of::<u8>());
        assert_eq!(format!("{:?}", a), "u8");
    }
}
