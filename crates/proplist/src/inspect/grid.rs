#![forbid(unsafe_code)]

//! Property grid model.
//!
//! Walks a [`Describable`] object into a tree of [`PropertyRow`]s the way a
//! property-grid widget would lay it out: hinted properties first in hint
//! order, the rest by name, and expandable values opened into child rows
//! via the [`TypeDecorations`] registry or, for nested lists, their own
//! ordinal properties.

use std::cmp::Ordering;

use super::describe::{Describable, Property};
use super::TypeDecorations;
use crate::error::ListResult;

/// Default limit on nested expansion.
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// One rendered property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRow {
    pub name: String,
    pub type_name: &'static str,
    pub order_hint: Option<usize>,
    pub expandable: bool,
    pub read_only: bool,
    /// Child rows; empty for scalar values or past the depth limit.
    pub children: Vec<PropertyRow>,
}

/// Builds [`PropertyRow`] trees against a decoration registry.
#[derive(Debug, Clone, Copy)]
pub struct PropertyGrid<'a> {
    decorations: &'a TypeDecorations,
    max_depth: usize,
}

impl<'a> PropertyGrid<'a> {
    #[must_use]
    pub fn new(decorations: &'a TypeDecorations) -> Self {
        Self {
            decorations,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit how many levels of expandable values are opened. `0` renders
    /// only the top level.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Rows for every property of `target`.
    ///
    /// # Errors
    ///
    /// Propagates the first failing property read while expanding.
    pub fn rows(&self, target: &dyn Describable) -> ListResult<Vec<PropertyRow>> {
        self.collect(target.properties(), 0)
    }

    fn collect(
        &self,
        props: Vec<Box<dyn Property>>,
        depth: usize,
    ) -> ListResult<Vec<PropertyRow>> {
        let mut rows = Vec::with_capacity(props.len());
        for prop in props {
            let expandable = prop.is_expandable(self.decorations);
            let children = if expandable && depth < self.max_depth {
                match prop.expand(self.decorations)? {
                    Some(nested) => self.collect(nested, depth + 1)?,
                    None => Vec::new(),
                }
            } else {
                Vec::new()
            };
            rows.push(PropertyRow {
                name: prop.name().to_string(),
                type_name: prop.value_type().name,
                order_hint: prop.order_hint(),
                expandable,
                read_only: prop.is_read_only(),
                children,
            });
        }
        rows.sort_by(display_order);
        Ok(rows)
    }
}

fn display_order(a: &PropertyRow, b: &PropertyRow) -> Ordering {
    match (a.order_hint, b.order_hint) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.name.cmp(&b.name),
    }
}
