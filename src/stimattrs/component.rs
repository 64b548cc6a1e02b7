//! The host side of attribute composition.
//!
//! A [`Component`] is anything that can answer three questions for the rules
//! evaluated against it: what its default controller identifier is, what a named
//! property resolves to, and which attributes it already produces on its own.

use crate::value::AttrValue;
use std::collections::BTreeMap;

/// Final attribute key to attribute value mapping consumed by the rendering layer.
pub type AttributeMap = BTreeMap<String, String>;

pub trait Component {
    /// Controller identifier used when a declaration names no controller.
    ///
    /// Called at most once per instance; resets keep the first answer.
    fn controller_name(&self) -> String;

    /// Resolve a named-property reference.
    ///
    /// Returning `None` makes the referencing rule fail with
    /// [`StimulusError::UnknownProperty`](crate::error::StimulusError::UnknownProperty).
    fn property(&self, name: &str) -> Option<AttrValue> {
        let _ = name;
        None
    }

    /// Attributes the component produces before any rule is layered on top.
    fn base_attributes(&self) -> AttributeMap {
        AttributeMap::new()
    }
}
