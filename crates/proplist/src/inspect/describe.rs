#![forbid(unsafe_code)]

//! The describable capability: "enumerate the addressable fields of this
//! object".

use std::any::Any;

use super::{SlotLabel, TypeDecorations, TypeInfo};
use crate::error::{ListError, ListResult};
use crate::reactive::ObservableList;

/// One addressable field of a describable object, with type-erased access.
pub trait Property {
    /// Display name.
    fn name(&self) -> &str;

    /// Type of the value this property holds.
    fn value_type(&self) -> TypeInfo;

    /// Type of the object this property belongs to.
    fn owner_type(&self) -> TypeInfo;

    /// Display-order hint. Properties without one sort by name after all
    /// hinted properties.
    fn order_hint(&self) -> Option<usize> {
        None
    }

    fn is_read_only(&self) -> bool {
        false
    }

    fn can_reset(&self) -> bool {
        false
    }

    /// Restore the default value.
    ///
    /// # Errors
    ///
    /// [`ListError::NotSupported`] unless overridden.
    fn reset(&self) -> ListResult<()> {
        Err(ListError::NotSupported("reset"))
    }

    /// Read the current value.
    ///
    /// # Errors
    ///
    /// Implementation defined; slot descriptors fail when stale.
    fn get_any(&self) -> ListResult<Box<dyn Any>>;

    /// Write a new value.
    ///
    /// # Errors
    ///
    /// [`ListError::TypeMismatch`] if `value` is not of
    /// [`value_type`](Property::value_type), plus implementation-defined
    /// failures.
    fn set_any(&self, value: Box<dyn Any>) -> ListResult<()>;

    /// Whether an inspector should render this value as a nested node.
    fn is_expandable(&self, decorations: &TypeDecorations) -> bool {
        decorations.is_expandable(self.value_type().id)
    }

    /// Properties of the current value when it renders as a nested node.
    ///
    /// `Ok(None)` for values that are not expandable.
    ///
    /// # Errors
    ///
    /// Whatever reading the value fails with.
    fn expand(
        &self,
        decorations: &TypeDecorations,
    ) -> ListResult<Option<Vec<Box<dyn Property>>>> {
        if !self.is_expandable(decorations) {
            return Ok(None);
        }
        let value = self.get_any()?;
        Ok(decorations.expand(value.as_ref()))
    }
}

/// A value that can sit in an inspected list slot.
///
/// Scalars use the defaults. Values that carry their own properties
/// without being registered in [`TypeDecorations`] override
/// [`NESTED`](Self::NESTED) and [`nested_properties`](Self::nested_properties);
/// [`ObservableList`] does, so lists of lists expand out of the box.
pub trait SlotValue: Clone + PartialEq + 'static {
    /// Whether every value of this type renders as a nested node.
    const NESTED: bool = false;

    /// Properties shown when the value is expanded without a registry
    /// entry.
    fn nested_properties(&self) -> Option<Vec<Box<dyn Property>>> {
        None
    }
}

macro_rules! scalar_slot_values {
    ($($ty:ty),* $(,)?) => {
        $(impl SlotValue for $ty {})*
    };
}

scalar_slot_values!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String, &'static str,
);

impl<T: SlotValue> SlotValue for Option<T> {}

/// Nested lists expand to their ordinal (`"#i"`) descriptors, the list's
/// default presentation when no list registration applies.
impl<U: SlotValue> SlotValue for ObservableList<U> {
    const NESTED: bool = true;

    fn nested_properties(&self) -> Option<Vec<Box<dyn Property>>> {
        Some(
            self.ordinal_descriptors()
                .into_iter()
                .map(|d| Box::new(d) as Box<dyn Property>)
                .collect(),
        )
    }
}

/// An object that can list its own properties.
pub trait Describable {
    /// Runtime type of the object.
    fn type_info(&self) -> TypeInfo;

    /// Current properties, in display order.
    ///
    /// The set reflects the object's shape at call time. Callers re-query
    /// after structural changes.
    fn properties(&self) -> Vec<Box<dyn Property>>;
}

impl<T: SlotValue> Describable for ObservableList<T> {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::of::<Self>()
    }

    fn properties(&self) -> Vec<Box<dyn Property>> {
        (0..self.len())
            .map(|index| {
                Box::new(self.slot_descriptor(index, SlotLabel::Indexed)) as Box<dyn Property>
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_properties_are_bracketed_and_ordered() {
        let list: ObservableList<i32> = [3, 4, 5].into_iter().collect();
        let props = list.properties();
        let names: Vec<&str> = props.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["[0]", "[1]", "[2]"]);
        let hints: Vec<Option<usize>> = props.iter().map(|p| p.order_hint()).collect();
        assert_eq!(hints, vec![Some(0), Some(1), Some(2)]);
        assert!(list.type_info().is::<ObservableList<i32>>());
    }

    #[test]
    fn set_any_routes_through_list() {
        let list: ObservableList<i32> = [3].into_iter().collect();
        let props = list.properties();
        props[0].set_any(Box::new(8)).unwrap();
        assert_eq!(list.get(0), Ok(8));

        let read = props[0].get_any().unwrap();
        assert_eq!(read.downcast_ref::<i32>(), Some(&8));
    }

    #[test]
    fn set_any_rejects_wrong_type() {
        let list: ObservableList<i32> = [3].into_iter().collect();
        let props = list.properties();
        let err = props[0].set_any(Box::new("nope")).unwrap_err();
        assert!(matches!(err, ListError::TypeMismatch { .. }));
        assert_eq!(list.get(0), Ok(3));
    }

    #[test]
    fn scalars_do_not_nest() {
        assert!(!<i32 as SlotValue>::NESTED);
        assert!(5i32.nested_properties().is_none());
        assert!(<ObservableList<i32> as SlotValue>::NESTED);
    }

    #[test]
    fn nested_list_expands_to_ordinal_descriptors() {
        let inner: ObservableList<i32> = [7, 8].into_iter().collect();
        let props = inner.nested_properties().expect("lists nest");
        let names: Vec<&str> = props.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["#0", "#1"]);
        assert!(props.iter().all(|p| p.order_hint().is_none()));
    }

    #[test]
    fn reset_is_not_supported() {
        let list: ObservableList<i32> = [3].into_iter().collect();
        let props = list.properties();
        assert!(!props[0].can_reset());
        assert!(!props[0].is_read_only());
        assert_eq!(props[0].reset(), Err(ListError::NotSupported("reset")));
        assert!(props[0].owner_type().is::<ObservableList<i32>>());
    }
}
