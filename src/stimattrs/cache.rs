//! # Evaluation & Memoization
//!
//! Each component instance carries an [`AttributeCache`]. The first read runs the
//! component's whole [`RuleChain`] and stores the result; later reads return the
//! stored mapping without touching a single rule. [`AttributeCache::reset`]
//! drops the mapping so the next read evaluates from scratch, re-running every
//! value computation.
//!
//! ```text
//!            get()                      get()
//! Uncomputed ─────▶ evaluate chain ─▶ Computed ─────▶ cached mapping
//!     ▲                                  │
//!     └───────────── reset() ────────────┘
//! ```
//!
//! A failed evaluation stores nothing: the cache stays uncomputed and the next
//! read tries again.
//!
//! ## Threads
//!
//! The cache uses single-threaded cells, which makes it (and any component
//! embedding it) `!Sync`. Rule chains themselves are immutable and can be shared
//! freely; an instance must not be shared across threads without external
//! synchronization.

use crate::component::{AttributeMap, Component};
use crate::error::Result;
use crate::rule::RuleChain;
use crate::spec::Instance;
use once_cell::unsync::OnceCell;
use tracing::{debug, trace};

#[derive(Debug, Default)]
pub struct AttributeCache {
    attributes: OnceCell<AttributeMap>,
    controller_name: OnceCell<String>,
}

impl AttributeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_computed(&self) -> bool {
        self.attributes.get().is_some()
    }

    /// Composed attributes for `component`, evaluating `chain` on first access.
    pub fn get<C: Component + 'static>(
        &self,
        component: &C,
        chain: &RuleChain<C>,
    ) -> Result<&AttributeMap> {
        if let Some(attributes) = self.attributes.get() {
            trace!("attributes served from cache");
            return Ok(attributes);
        }

        self.attributes
            .get_or_try_init(|| chain.evaluate(&Instance::new(component, &self.controller_name)))
    }

    /// Discard the cached mapping. Rules are untouched.
    pub fn reset(&mut self) {
        self.reset_then(|| {});
    }

    /// Discard the cached mapping, then run `notify` so a host can clear caches of its own.
    pub fn reset_then(&mut self, notify: impl FnOnce()) {
        if self.attributes.take().is_some() {
            debug!("attribute cache reset");
        }
        notify();
    }
}

/// Host contract for components that compose Stimulus attributes.
///
/// Implementors point at their rule chain and their cache; reading and resetting
/// come for free.
///
/// ```ignore
/// static RULES: Lazy<RuleChain<Card>> = Lazy::new(|| {
///     RuleChain::builder()
///         .has_stimulus_controller(Controller::default())
///         .has_stimulus_value(Value::from_property("count"))
///         .build()
///         .expect("card declarations")
/// });
///
/// impl HasStimulusAttrs for Card {
///     fn rules(&self) -> &RuleChain<Self> { &RULES }
///     fn attribute_cache(&self) -> &AttributeCache { &self.cache }
///     fn attribute_cache_mut(&mut self) -> &mut AttributeCache { &mut self.cache }
/// }
///
/// let attrs = card.stimulus_attributes()?;
/// ```
pub trait HasStimulusAttrs: Component + Sized + 'static {
    fn rules(&self) -> &RuleChain<Self>;

    fn attribute_cache(&self) -> &AttributeCache;

    fn attribute_cache_mut(&mut self) -> &mut AttributeCache;

    /// Called after every reset. Hosts with their own memoized state clear it here.
    fn on_attributes_reset(&mut self) {}

    fn stimulus_attributes(&self) -> Result<&AttributeMap> {
        self.attribute_cache().get(self, self.rules())
    }

    fn reset_stimulus_attributes(&mut self) {
        self.attribute_cache_mut().reset();
        self.on_attributes_reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StimulusError;
    use crate::rule::Rule;
    use crate::spec::Spec;
    use std::cell::Cell;

    struct Counter {
        calls: Cell<usize>,
        fail: Cell<bool>,
    }

    impl Counter {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
                fail: Cell::new(false),
            }
        }
    }

    impl Component for Counter {
        fn controller_name(&self) -> String {
            "counter".into()
        }
    }

    fn chain() -> RuleChain<Counter> {
        RuleChain::builder()
            .rule(Rule::new(
                "k",
                Spec::try_deferred(|c: &Instance<'_, Counter>| {
                    c.calls.set(c.calls.get() + 1);
                    if c.fail.get() {
                        Err(StimulusError::computation("not yet"))
                    } else {
                        Ok(format!("v{}", c.calls.get()))
                    }
                }),
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn second_read_is_served_from_cache() {
        let chain = chain();
        let counter = Counter::new();
        let cache = AttributeCache::new();

        assert!(!cache.is_computed());
        let first = cache.get(&counter, &chain).unwrap().clone();
        let second = cache.get(&counter, &chain).unwrap().clone();

        assert!(cache.is_computed());
        assert_eq!(first, second);
        assert_eq!(counter.calls.get(), 1);
    }

    #[test]
    fn reset_recomputes() {
        let chain = chain();
        let counter = Counter::new();
        let mut cache = AttributeCache::new();

        assert_eq!(cache.get(&counter, &chain).unwrap()["k"], "v1");
        cache.reset();
        assert!(!cache.is_computed());
        assert_eq!(cache.get(&counter, &chain).unwrap()["k"], "v2");
        assert_eq!(counter.calls.get(), 2);
    }

    #[test]
    fn failed_evaluation_is_not_cached() {
        let chain = chain();
        let counter = Counter::new();
        let cache = AttributeCache::new();

        counter.fail.set(true);
        assert!(cache.get(&counter, &chain).is_err());
        assert!(!cache.is_computed());

        counter.fail.set(false);
        assert_eq!(cache.get(&counter, &chain).unwrap()["k"], "v2");
    }

    #[test]
    fn reset_then_notifies() {
        let mut cache = AttributeCache::new();
        let mut notified = false;
        cache.reset_then(|| notified = true);
        assert!(notified);
    }
}
