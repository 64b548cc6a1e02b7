//! Naming conventions for Stimulus data attributes.
//!
//! The rule engine never formats keys itself: declarations call into a
//! [`NamingConvention`] to turn a controller identifier and a semantic name into a
//! concrete key, and to build action descriptors. [`StimulusNaming`] follows the
//! conventions Stimulus reads out of the DOM:
//!
//! ```text
//! class   → {controller}-{name}-class
//! outlet  → {controller}-{name}-outlet
//! param   → {controller}-{name}-param
//! value   → {controller}-{name}-value
//! target  → {controller}-target
//! action  → {event}->{controller}#{action}
//! ```
//!
//! Keys are emitted without the `data-` prefix; rendering adds it.

use std::fmt;

/// Which kind of Stimulus attribute a key is being built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Class,
    Outlet,
    Param,
    Target,
    Value,
}

impl AttributeKind {
    pub fn suffix(&self) -> &'static str {
        match self {
            AttributeKind::Class => "class",
            AttributeKind::Outlet => "outlet",
            AttributeKind::Param => "param",
            AttributeKind::Target => "target",
            AttributeKind::Value => "value",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

pub trait NamingConvention {
    /// Key for a class/outlet/param/target/value attribute.
    fn attribute_key(&self, controller: &str, name: &str, kind: AttributeKind) -> String;

    /// Descriptor placed in the `action` attribute.
    fn action_descriptor(&self, controller: &str, event: &str, action: &str) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StimulusNaming;

impl NamingConvention for StimulusNaming {
    fn attribute_key(&self, controller: &str, name: &str, kind: AttributeKind) -> String {
        match kind {
            AttributeKind::Target => format!("{}-target", controller),
            _ => format!("{}-{}-{}", controller, dasherize(name), kind.suffix()),
        }
    }

    fn action_descriptor(&self, controller: &str, event: &str, action: &str) -> String {
        format!("{}->{}#{}", event, controller, action)
    }
}

/// `class_name` → `class-name`, `resultUrl` → `result-url`.
pub fn dasherize(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;

    for ch in name.chars() {
        if ch == '_' || ch == ' ' {
            out.push('-');
            prev_lower = false;
        } else if ch.is_uppercase() {
            if prev_lower {
                out.push('-');
            }
            out.extend(ch.to_lowercase());
            prev_lower = false;
        } else {
            out.push(ch);
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        }
    }

    out
}
