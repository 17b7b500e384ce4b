#![forbid(unsafe_code)]

//! Slot descriptors: one list slot presented as a named property.
//!
//! A descriptor never copies the slot value. Every `get`/`set` goes back to
//! the owning list by index, and `set` uses [`ObservableList::set`] so the
//! list's own subscribers see inspector edits.
//!
//! # Staleness
//!
//! A descriptor records the list's epoch when it is created. Any later
//! structural change (add, insert, remove, clear) moves the epoch and the
//! descriptor fails with [`ListError::StaleDescriptor`] instead of reading a
//! shifted or missing slot. Value edits through `set` do not move the epoch.
//!
//! Descriptors hold the list weakly and fail with
//! [`ListError::ListDropped`] once every list handle is gone.

use std::any::Any;
use std::fmt;

use super::describe::{Property, SlotValue};
use super::{TypeDecorations, TypeInfo};
use crate::error::{ListError, ListResult};
use crate::reactive::{ObservableList, WeakList};

/// How a slot descriptor is labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotLabel {
    /// `"[i]"`, with the index as display-order hint.
    Indexed,
    /// `"#i"`, no order hint.
    Ordinal,
}

impl SlotLabel {
    fn format(self, index: usize) -> String {
        match self {
            Self::Indexed => format!("[{}]", index),
            Self::Ordinal => format!("#{}", index),
        }
    }
}

/// A named, transient get/set view over one list slot.
pub struct SlotDescriptor<T> {
    list: WeakList<T>,
    index: usize,
    label: SlotLabel,
    name: String,
    epoch: u64,
}

impl<T> Clone for SlotDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            list: self.list.clone(),
            index: self.index,
            label: self.label,
            name: self.name.clone(),
            epoch: self.epoch,
        }
    }
}

impl<T> fmt::Debug for SlotDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotDescriptor")
            .field("name", &self.name)
            .field("index", &self.index)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

impl<T: Clone + PartialEq + 'static> SlotDescriptor<T> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn label(&self) -> SlotLabel {
        self.label
    }

    /// List epoch captured when this descriptor was created.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Display-order hint: the slot index for [`SlotLabel::Indexed`].
    #[must_use]
    pub fn order_hint(&self) -> Option<usize> {
        match self.label {
            SlotLabel::Indexed => Some(self.index),
            SlotLabel::Ordinal => None,
        }
    }

    /// Read the slot's current value.
    ///
    /// # Errors
    ///
    /// [`ListError::StaleDescriptor`] or [`ListError::ListDropped`] as
    /// described in the module docs, [`ListError::OutOfRange`] otherwise
    /// propagated from the list.
    pub fn get(&self) -> ListResult<T> {
        self.owner()?.get(self.index)
    }

    /// Write through to [`ObservableList::set`].
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub fn set(&self, value: T) -> ListResult<()> {
        self.owner()?.set(self.index, value)
    }

    /// # Errors
    ///
    /// Always [`ListError::NotSupported`].
    pub fn reset(&self) -> ListResult<()> {
        Err(ListError::NotSupported("reset"))
    }

    fn owner(&self) -> ListResult<ObservableList<T>> {
        let list = self.list.upgrade().ok_or(ListError::ListDropped)?;
        let current = list.epoch();
        if current != self.epoch {
            return Err(ListError::StaleDescriptor {
                captured: self.epoch,
                current,
            });
        }
        Ok(list)
    }
}

impl<T: SlotValue> SlotDescriptor<T> {
    /// Whether the slot renders as a nested node: its value type is
    /// registered in `decorations`, or is itself nested (a list of lists).
    #[must_use]
    pub fn is_expandable(&self, decorations: &TypeDecorations) -> bool {
        T::NESTED || decorations.is_expandable(std::any::TypeId::of::<T>())
    }

    /// Properties of the slot's current value, preferring a registry entry
    /// over the value's own nested properties.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub fn expand(
        &self,
        decorations: &TypeDecorations,
    ) -> ListResult<Option<Vec<Box<dyn Property>>>> {
        if !self.is_expandable(decorations) {
            return Ok(None);
        }
        let value = self.get()?;
        Ok(decorations
            .expand(&value)
            .or_else(|| value.nested_properties()))
    }
}

impl<T: SlotValue> Property for SlotDescriptor<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn value_type(&self) -> TypeInfo {
        TypeInfo::of::<T>()
    }

    fn owner_type(&self) -> TypeInfo {
        TypeInfo::of::<ObservableList<T>>()
    }

    fn order_hint(&self) -> Option<usize> {
        SlotDescriptor::order_hint(self)
    }

    fn get_any(&self) -> ListResult<Box<dyn Any>> {
        Ok(Box::new(self.get()?))
    }

    fn set_any(&self, value: Box<dyn Any>) -> ListResult<()> {
        let value = value.downcast::<T>().map_err(|_| ListError::TypeMismatch {
            expected: std::any::type_name::<T>(),
        })?;
        self.set(*value)
    }

    fn is_expandable(&self, decorations: &TypeDecorations) -> bool {
        SlotDescriptor::is_expandable(self, decorations)
    }

    fn expand(
        &self,
        decorations: &TypeDecorations,
    ) -> ListResult<Option<Vec<Box<dyn Property>>>> {
        SlotDescriptor::expand(self, decorations)
    }
}

impl<T: Clone + PartialEq + 'static> ObservableList<T> {
    /// One [`SlotLabel::Indexed`] descriptor per slot, `"[0]"` to
    /// `"[len-1]"`.
    #[must_use]
    pub fn descriptors(&self) -> Vec<SlotDescriptor<T>> {
        self.descriptors_with(SlotLabel::Indexed)
    }

    /// One [`SlotLabel::Ordinal`] descriptor per slot, `"#0"` to
    /// `"#len-1"`.
    ///
    /// This is what a nested list shows when it is expanded without a
    /// list registration (see [`SlotValue`]).
    #[must_use]
    pub fn ordinal_descriptors(&self) -> Vec<SlotDescriptor<T>> {
        self.descriptors_with(SlotLabel::Ordinal)
    }

    /// Descriptor for a single slot.
    ///
    /// # Errors
    ///
    /// [`ListError::OutOfRange`] unless `index < len()`.
    pub fn descriptor(&self, index: usize, label: SlotLabel) -> ListResult<SlotDescriptor<T>> {
        let len = self.len();
        if index >= len {
            return Err(ListError::OutOfRange { index, len });
        }
        Ok(self.slot_descriptor(index, label))
    }

    fn descriptors_with(&self, label: SlotLabel) -> Vec<SlotDescriptor<T>> {
        (0..self.len())
            .map(|index| self.slot_descriptor(index, label))
            .collect()
    }

    pub(crate) fn slot_descriptor(&self, index: usize, label: SlotLabel) -> SlotDescriptor<T> {
        SlotDescriptor {
            list: self.downgrade(),
            index,
            label,
            name: label.format(index),
            epoch: self.epoch(),
        }
    }
}
