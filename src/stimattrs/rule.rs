//! # Rule Registry
//!
//! A component type owns one [`RuleChain`]: the ordered list of every rule its
//! declarations registered. Chains are assembled once with a [`ChainBuilder`]
//! (typically inside a `static` `Lazy`) and are read-only afterwards, so a single
//! chain is shared by every instance of the component.
//!
//! ## Evaluation
//!
//! Evaluating a chain is a fold over its rules in declaration order, starting
//! from the component's base attributes:
//!
//! ```text
//! base ──▶ rule 1 ──▶ rule 2 ──▶ … ──▶ rule n ──▶ AttributeMap
//! ```
//!
//! Each rule first consults its guard. A rule whose guard denies it is skipped
//! before its key or value spec is touched, so guarded-off computations cost
//! nothing. Otherwise the rule resolves its key and value and merges the value
//! into whatever earlier rules produced for that key.
//!
//! ## Merging
//!
//! Contributions to the same key are kept in declaration order, blank values are
//! dropped, exact duplicates are dropped, and the rest are joined with a single
//! space. Rules `k=a`, `k=b`, `k=a` therefore produce `k="a b"`.

use crate::component::{AttributeMap, Component};
use crate::error::{Result, StimulusError};
use crate::naming::{NamingConvention, StimulusNaming};
use crate::spec::{Guard, Instance, Spec};
use crate::value::AttrValue;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// One registered contribution to the attribute mapping.
pub struct Rule<C> {
    pub key: Spec<C>,
    pub value: Spec<C>,
    pub guard: Option<Guard<C>>,
}

impl<C: Component + 'static> Rule<C> {
    pub fn new(key: impl Into<Spec<C>>, value: impl Into<Spec<C>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            guard: None,
        }
    }

    pub fn guarded(mut self, guard: Option<Guard<C>>) -> Self {
        self.guard = guard;
        self
    }

    /// Apply this rule on top of `merged`.
    ///
    /// Returns `false` when the guard skipped the rule.
    pub fn apply(&self, instance: &Instance<'_, C>, merged: &mut Merged) -> Result<bool> {
        if let Some(guard) = &self.guard {
            if !guard.allows(instance)? {
                return Ok(false);
            }
        }

        let key = self.key.resolve_string(instance)?;
        if key.trim().is_empty() {
            return Err(StimulusError::BlankKey {
                key: format!("{:?}", self.key),
            });
        }

        let value = self.value.resolve(instance)?;
        merged.push(key, &value);
        Ok(true)
    }
}

impl<C> Clone for Rule<C> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            value: self.value.clone(),
            guard: self.guard.clone(),
        }
    }
}

impl<C> fmt::Debug for Rule<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("guard", &self.guard)
            .finish()
    }
}

/// Accumulator for the fold: every key's distinct, non-blank contributions in order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Merged {
    parts: BTreeMap<String, Vec<String>>,
}

impl Merged {
    /// Seed the accumulator with the host's own attributes.
    ///
    /// A base value counts as the first contribution for its key.
    pub fn from_base(base: AttributeMap) -> Self {
        let mut merged = Self::default();
        for (key, value) in base {
            merged.push(key, &AttrValue::Str(value));
        }
        merged
    }

    pub fn push(&mut self, key: String, value: &AttrValue) {
        let parts = self.parts.entry(key).or_default();
        if value.is_blank() {
            return;
        }
        let value = value.to_attr_string();
        if !parts.contains(&value) {
            parts.push(value);
        }
    }

    pub fn finish(self) -> AttributeMap {
        self.parts
            .into_iter()
            .map(|(key, parts)| (key, parts.join(" ")))
            .collect()
    }
}

/// Ordered rules for one component type.
pub struct RuleChain<C> {
    rules: Vec<Rule<C>>,
}

impl<C: Component + 'static> RuleChain<C> {
    pub fn builder() -> ChainBuilder<C> {
        ChainBuilder::new()
    }

    pub fn rules(&self) -> &[Rule<C>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule, bottom first, on top of the component's base attributes.
    pub fn evaluate(&self, instance: &Instance<'_, C>) -> Result<AttributeMap> {
        debug!(
            component = std::any::type_name::<C>(),
            rules = self.rules.len(),
            "evaluating attribute chain"
        );

        let base = instance.component().base_attributes();
        let merged = self.rules.iter().enumerate().try_fold(
            Merged::from_base(base),
            |mut merged, (idx, rule)| {
                if !rule.apply(instance, &mut merged)? {
                    trace!(rule = idx, "guard skipped rule");
                }
                Ok::<_, StimulusError>(merged)
            },
        )?;

        Ok(merged.finish())
    }
}

impl<C> Clone for RuleChain<C> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}

impl<C> fmt::Debug for RuleChain<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleChain")
            .field("rules", &self.rules)
            .finish()
    }
}

/// Collects declarations into a [`RuleChain`].
///
/// Declaration methods (`has_stimulus_*`) live in [`crate::declare`]. Malformed
/// declarations are recorded and reported together by [`ChainBuilder::build`].
pub struct ChainBuilder<C> {
    rules: Vec<Rule<C>>,
    naming: Arc<dyn NamingConvention + Send + Sync>,
    problems: Vec<String>,
}

impl<C: Component + 'static> ChainBuilder<C> {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            naming: Arc::new(StimulusNaming),
            problems: Vec::new(),
        }
    }

    /// Swap the naming convention used by declarations registered after this call.
    pub fn with_naming(mut self, naming: impl NamingConvention + Send + Sync + 'static) -> Self {
        self.naming = Arc::new(naming);
        self
    }

    /// Start from another chain's rules, e.g. a parent component's.
    pub fn extend(mut self, parent: &RuleChain<C>) -> Self {
        self.rules.extend(parent.rules.iter().cloned());
        self
    }

    /// Append one rule to the chain.
    pub fn rule(mut self, rule: Rule<C>) -> Self {
        self.rules.push(rule);
        self
    }

    pub(crate) fn naming(&self) -> Arc<dyn NamingConvention + Send + Sync> {
        Arc::clone(&self.naming)
    }

    pub(crate) fn reject(mut self, problem: impl Into<String>) -> Self {
        self.problems.push(problem.into());
        self
    }

    pub fn build(self) -> Result<RuleChain<C>> {
        if !self.problems.is_empty() {
            return Err(StimulusError::InvalidDeclaration(self.problems.join("; ")));
        }
        Ok(RuleChain { rules: self.rules })
    }
}

impl<C: Component + 'static> Default for ChainBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}
