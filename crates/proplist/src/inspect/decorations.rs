#![forbid(unsafe_code)]

//! Type decorations: which value types an inspector renders as expandable.
//!
//! [`TypeDecorations`] is an ordinary value built at start-up and handed to
//! the components that classify values. Entries are keyed by [`TypeId`],
//! only ever added, and registering the same type twice is a no-op.
//!
//! Each entry captures a monomorphized describer so a value can be expanded
//! from a `&dyn Any`. Plain registrations describe the value through its own
//! [`Describable`] impl. List registrations are bound to their element type:
//! the value is described as an `ObservableList<E>` and a value of any other
//! type is not expanded.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use super::describe::{Describable, Property, SlotValue};
use super::TypeInfo;
use crate::reactive::ObservableList;

type Describer = fn(&dyn Any) -> Option<Vec<Box<dyn Property>>>;

fn describe_as<T: Describable + 'static>(value: &dyn Any) -> Option<Vec<Box<dyn Property>>> {
    value.downcast_ref::<T>().map(Describable::properties)
}

fn describe_list_of<E: SlotValue>(value: &dyn Any) -> Option<Vec<Box<dyn Property>>> {
    value
        .downcast_ref::<ObservableList<E>>()
        .map(Describable::properties)
}

/// How a registered type is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoration {
    /// Nested node showing the value's own properties.
    Expandable,
    /// Nested node showing one property per element.
    ExpandableList { element: TypeInfo },
}

struct Entry {
    info: TypeInfo,
    decoration: Decoration,
    describe: Describer,
}

/// Registry of expandable value types.
#[derive(Default)]
pub struct TypeDecorations {
    entries: HashMap<TypeId, Entry>,
}

impl fmt::Debug for TypeDecorations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.values().map(|e| (e.info, e.decoration)))
            .finish()
    }
}

impl TypeDecorations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `T` as expandable.
    ///
    /// A type already registered as an expandable list keeps that
    /// decoration.
    pub fn register_expandable<T: Describable + 'static>(&mut self) -> &mut Self {
        let info = TypeInfo::of::<T>();
        if self.entries.contains_key(&info.id) {
            return self;
        }
        debug!(type_name = info.name, "registered expandable type");
        self.entries.insert(
            info.id,
            Entry {
                info,
                decoration: Decoration::Expandable,
                describe: describe_as::<T>,
            },
        );
        self
    }

    /// Mark list type `L` as an expandable list of `E`.
    ///
    /// Values are expanded as `ObservableList<E>`, one `"[i]"` property
    /// per element; a value that is not one yields no properties.
    /// Overrides a plain [`Decoration::Expandable`] entry for `L`.
    pub fn register_expandable_list<E: SlotValue, L: 'static>(&mut self) -> &mut Self {
        let info = TypeInfo::of::<L>();
        let decoration = Decoration::ExpandableList {
            element: TypeInfo::of::<E>(),
        };
        if self
            .entries
            .get(&info.id)
            .is_some_and(|e| e.decoration == decoration)
        {
            return self;
        }
        debug!(
            type_name = info.name,
            element = std::any::type_name::<E>(),
            "registered expandable list type"
        );
        self.entries.insert(
            info.id,
            Entry {
                info,
                decoration,
                describe: describe_list_of::<E>,
            },
        );
        self
    }

    /// Builder form of [`register_expandable`](Self::register_expandable).
    #[must_use]
    pub fn with_expandable<T: Describable + 'static>(mut self) -> Self {
        self.register_expandable::<T>();
        self
    }

    /// Builder form of
    /// [`register_expandable_list`](Self::register_expandable_list).
    #[must_use]
    pub fn with_expandable_list<E: SlotValue, L: 'static>(mut self) -> Self {
        self.register_expandable_list::<E, L>();
        self
    }

    #[must_use]
    pub fn is_expandable(&self, id: TypeId) -> bool {
        self.entries.contains_key(&id)
    }

    #[must_use]
    pub fn decoration(&self, id: TypeId) -> Option<Decoration> {
        self.entries.get(&id).map(|e| e.decoration)
    }

    /// Element type of a registered list type.
    #[must_use]
    pub fn element_type(&self, id: TypeId) -> Option<TypeInfo> {
        match self.decoration(id)? {
            Decoration::ExpandableList { element } => Some(element),
            Decoration::Expandable => None,
        }
    }

    /// Properties of `value`, if its runtime type is registered.
    #[must_use]
    pub fn expand(&self, value: &dyn Any) -> Option<Vec<Box<dyn Property>>> {
        let entry = self.entries.get(&value.type_id())?;
        (entry.describe)(value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unit;

    impl Describable for Unit {
        fn type_info(&self) -> TypeInfo {
            TypeInfo::of::<Self>()
        }

        fn properties(&self) -> Vec<Box<dyn Property>> {
            Vec::new()
        }
    }

    #[test]
    fn empty_registry() {
        let deco = TypeDecorations::new();
        assert!(deco.is_empty());
        assert!(!deco.is_expandable(TypeId::of::<Unit>()));
        assert!(deco.expand(&Unit).is_none());
    }

    #[test]
    fn registration_is_idempotent() {
        let mut deco = TypeDecorations::new();
        deco.register_expandable::<Unit>().register_expandable::<Unit>();
        assert_eq!(deco.len(), 1);
        assert_eq!(
            deco.decoration(TypeId::of::<Unit>()),
            Some(Decoration::Expandable)
        );
        assert_eq!(deco.element_type(TypeId::of::<Unit>()), None);
    }

    #[test]
    fn list_registration_records_element() {
        let deco = TypeDecorations::new()
            .with_expandable::<ObservableList<u8>>()
            .with_expandable_list::<u8, ObservableList<u8>>()
            .with_expandable::<ObservableList<u8>>();
        let id = TypeId::of::<ObservableList<u8>>();
        assert_eq!(deco.len(), 1);
        assert_eq!(deco.element_type(id), Some(TypeInfo::of::<u8>()));
    }

    #[test]
    fn expand_uses_registered_describer() {
        let deco = TypeDecorations::new().with_expandable_list::<u8, ObservableList<u8>>();
        let list: ObservableList<u8> = [1, 2].into_iter().collect();
        let props = deco.expand(&list).expect("registered");
        assert_eq!(props.len(), 2);
        assert_eq!(props[1].name(), "[1]");

        assert!(deco.expand(&5u8).is_none());
    }

    /// A list-like type registered against an element type it does not
    /// hold.
    struct Tags(Vec<String>);

    #[test]
    fn list_registration_is_bound_to_element_type() {
        let deco = TypeDecorations::new()
            .with_expandable_list::<u8, ObservableList<u16>>()
            .with_expandable_list::<String, Tags>();

        let wide: ObservableList<u16> = [1, 2].into_iter().collect();
        assert!(deco.is_expandable(TypeId::of::<ObservableList<u16>>()));
        assert!(deco.expand(&wide).is_none());

        let tags = Tags(vec!["a".to_string()]);
        assert_eq!(tags.0.len(), 1);
        assert!(deco.is_expandable(TypeId::of::<Tags>()));
        assert!(deco.expand(&tags).is_none());
    }
}
