//! # Stimattrs Architecture
//!
//! Stimattrs composes the `data-*` attributes a server-rendered component needs to
//! wire itself to [Stimulus](https://stimulus.hotwired.dev) controllers. Components
//! *declare* what they contribute (controllers, actions, classes, outlets, params,
//! targets, values); at render time those declarations are evaluated into one
//! attribute map.
//!
//! ## The Two Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Rule Registry (rule.rs, declare.rs)                        │
//! │  - One RuleChain per component type, built once            │
//! │  - Each declaration appends a Rule: key spec, value spec,   │
//! │    optional if/unless guard                                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Evaluation & Memoization (cache.rs)                        │
//! │  - First read per instance folds the chain over the base    │
//! │    attributes and caches the map                            │
//! │  - Later reads return the cache; reset() clears it          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both layers are pure and synchronous: no I/O happens below the CLI.
//!
//! ## Specs
//!
//! Keys, values and guards are all [`spec::Spec`]s: a fixed value, a named
//! property looked up on the component, or a deferred computation run against
//! the instance. Guards are resolved before anything else, so a rule guarded off
//! never evaluates its key or value.
//!
//! ## Merging
//!
//! Rules never overwrite each other. Contributions to one key are kept in
//! declaration order, with blanks and exact duplicates dropped, and are joined
//! by single spaces.
//!
//! ## Example
//!
//! ```
//! use once_cell::sync::Lazy;
//! use stimattrs::prelude::*;
//!
//! struct Dropdown {
//!     open: bool,
//!     cache: AttributeCache,
//! }
//!
//! impl Component for Dropdown {
//!     fn controller_name(&self) -> String {
//!         "dropdown".into()
//!     }
//!
//!     fn property(&self, name: &str) -> Option<AttrValue> {
//!         match name {
//!             "open" => Some(self.open.into()),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! static RULES: Lazy<RuleChain<Dropdown>> = Lazy::new(|| {
//!     RuleChain::builder()
//!         .has_stimulus_controller(Controller::default())
//!         .has_stimulus_action(Action::new("click", "toggle"))
//!         .has_stimulus_value(Value::from_property("open"))
//!         .has_stimulus_class(Class::new("active", "is-open").when(Spec::property("open")))
//!         .build()
//!         .expect("dropdown declarations are valid")
//! });
//!
//! impl HasStimulusAttrs for Dropdown {
//!     fn rules(&self) -> &RuleChain<Self> {
//!         &RULES
//!     }
//!
//!     fn attribute_cache(&self) -> &AttributeCache {
//!         &self.cache
//!     }
//!
//!     fn attribute_cache_mut(&mut self) -> &mut AttributeCache {
//!         &mut self.cache
//!     }
//! }
//!
//! let dropdown = Dropdown { open: true, cache: AttributeCache::new() };
//! let attrs = dropdown.stimulus_attributes().unwrap();
//! assert_eq!(attrs["controller"], "dropdown");
//! assert_eq!(attrs["action"], "click->dropdown#toggle");
//! assert_eq!(attrs["dropdown-open-value"], "true");
//! assert_eq!(attrs["dropdown-active-class"], "is-open");
//! ```
//!
//! ## Module Overview
//!
//! - [`spec`]: Spec, Guard and the evaluation context
//! - [`rule`]: Rule, RuleChain, ChainBuilder and merging
//! - [`declare`]: `has_stimulus_*` declarations
//! - [`cache`]: per-instance memoization and the host trait
//! - [`naming`]: attribute key conventions
//! - [`value`]: resolved values and coercions
//! - [`manifest`]: JSON component descriptions (used by the CLI)
//! - [`commands`]: logic behind the CLI subcommands
//! - [`config`]: configuration management
//! - [`error`]: Error types

pub mod cache;
pub mod commands;
pub mod component;
pub mod config;
pub mod declare;
pub mod error;
pub mod manifest;
pub mod naming;
pub mod rule;
pub mod spec;
pub mod value;

pub mod prelude {
    pub use crate::cache::{AttributeCache, HasStimulusAttrs};
    pub use crate::component::{AttributeMap, Component};
    pub use crate::declare::{
        Action, Actions, Class, Classes, Controller, Options, Outlet, Outlets, Param, Params,
        Target, Value, Values,
    };
    pub use crate::error::{Result, StimulusError};
    pub use crate::naming::{AttributeKind, NamingConvention, StimulusNaming};
    pub use crate::rule::{ChainBuilder, Rule, RuleChain};
    pub use crate::spec::{Guard, Instance, Polarity, Spec};
    pub use crate::value::AttrValue;
}
