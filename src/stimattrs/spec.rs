//! Resolvable specs for keys, values and guards.
//!
//! A [`Spec`] is one of three shapes:
//!
//! | Shape | Resolves to |
//! |-------|-------------|
//! | `Fixed` | the stored value, as-is |
//! | `Property` | [`Component::property`] on the instance |
//! | `Deferred` | the result of running the computation against the instance |
//!
//! All three go through [`Spec::resolve`], whether the spec stands for a key, a
//! value or a guard.

use crate::component::Component;
use crate::error::{Result, StimulusError};
use crate::value::AttrValue;
use once_cell::unsync::OnceCell;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

type Computation<C> = Arc<dyn Fn(&Instance<'_, C>) -> Result<AttrValue> + Send + Sync>;

fn computation<C, F>(f: F) -> Computation<C>
where
    F: Fn(&Instance<'_, C>) -> Result<AttrValue> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Evaluation context handed to deferred computations.
///
/// Derefs to the component, so closures can read fields and call methods on it
/// directly. The default controller name is looked up lazily and remembered by
/// the owning cache for the rest of the instance's life.
pub struct Instance<'a, C> {
    component: &'a C,
    controller_name: &'a OnceCell<String>,
}

impl<'a, C: Component> Instance<'a, C> {
    pub fn new(component: &'a C, controller_name: &'a OnceCell<String>) -> Self {
        Self {
            component,
            controller_name,
        }
    }

    pub fn component(&self) -> &'a C {
        self.component
    }

    /// The component's default controller identifier.
    pub fn controller_name(&self) -> &str {
        self.controller_name
            .get_or_init(|| self.component.controller_name())
    }

    /// Look up a named property, failing loudly when the component lacks it.
    pub fn property(&self, name: &str) -> Result<AttrValue> {
        self.component
            .property(name)
            .ok_or_else(|| StimulusError::UnknownProperty {
                component: std::any::type_name::<C>(),
                name: name.to_string(),
            })
    }
}

impl<C> Deref for Instance<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.component
    }
}

pub enum Spec<C> {
    Fixed(AttrValue),
    Property(String),
    Deferred(Computation<C>),
}

impl<C: Component + 'static> Spec<C> {
    pub fn fixed(value: impl Into<AttrValue>) -> Self {
        Spec::Fixed(value.into())
    }

    pub fn property(name: impl Into<String>) -> Self {
        Spec::Property(name.into())
    }

    /// A computation evaluated against the instance every time the chain runs.
    pub fn deferred<F, R>(f: F) -> Self
    where
        F: Fn(&Instance<'_, C>) -> R + Send + Sync + 'static,
        R: Into<AttrValue>,
    {
        Spec::Deferred(computation(move |instance| Ok(f(instance).into())))
    }

    /// Like [`Spec::deferred`], for computations that can fail.
    ///
    /// A failure propagates out of the chain evaluation and nothing is cached.
    pub fn try_deferred<F, R>(f: F) -> Self
    where
        F: Fn(&Instance<'_, C>) -> Result<R> + Send + Sync + 'static,
        R: Into<AttrValue>,
    {
        Spec::Deferred(computation(move |instance| f(instance).map(Into::into)))
    }

    pub fn resolve(&self, instance: &Instance<'_, C>) -> Result<AttrValue> {
        match self {
            Spec::Fixed(value) => Ok(value.clone()),
            Spec::Property(name) => instance.property(name),
            Spec::Deferred(f) => f(instance),
        }
    }

    /// Resolve and coerce to a string in one step.
    pub fn resolve_string(&self, instance: &Instance<'_, C>) -> Result<String> {
        self.resolve(instance).map(|value| value.to_attr_string())
    }

    /// True for fixed specs whose value is blank; used to reject declarations early.
    pub(crate) fn is_fixed_blank(&self) -> bool {
        matches!(self, Spec::Fixed(value) if value.is_blank())
            || matches!(self, Spec::Property(name) if name.trim().is_empty())
    }
}

impl<C> Clone for Spec<C> {
    fn clone(&self) -> Self {
        match self {
            Spec::Fixed(value) => Spec::Fixed(value.clone()),
            Spec::Property(name) => Spec::Property(name.clone()),
            Spec::Deferred(f) => Spec::Deferred(Arc::clone(f)),
        }
    }
}

impl<C> fmt::Debug for Spec<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spec::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Spec::Property(name) => f.debug_tuple("Property").field(name).finish(),
            Spec::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl<C> From<AttrValue> for Spec<C> {
    fn from(value: AttrValue) -> Self {
        Spec::Fixed(value)
    }
}

impl<C> From<&str> for Spec<C> {
    fn from(value: &str) -> Self {
        Spec::Fixed(value.into())
    }
}

impl<C> From<String> for Spec<C> {
    fn from(value: String) -> Self {
        Spec::Fixed(value.into())
    }
}

impl<C> From<&String> for Spec<C> {
    fn from(value: &String) -> Self {
        Spec::Fixed(value.into())
    }
}

impl<C> From<bool> for Spec<C> {
    fn from(value: bool) -> Self {
        Spec::Fixed(value.into())
    }
}

impl<C> From<i64> for Spec<C> {
    fn from(value: i64) -> Self {
        Spec::Fixed(value.into())
    }
}

impl<C> From<i32> for Spec<C> {
    fn from(value: i32) -> Self {
        Spec::Fixed(value.into())
    }
}

/// Whether a rule applies when its guard is truthy or when it is falsy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    If,
    Unless,
}

/// Optional predicate gating a rule.
pub struct Guard<C> {
    pub spec: Spec<C>,
    pub polarity: Polarity,
}

impl<C: Component + 'static> Guard<C> {
    /// Apply the rule only when `spec` resolves truthy.
    pub fn when(spec: impl Into<Spec<C>>) -> Self {
        Self {
            spec: spec.into(),
            polarity: Polarity::If,
        }
    }

    /// Apply the rule only when `spec` resolves falsy.
    pub fn unless(spec: impl Into<Spec<C>>) -> Self {
        Self {
            spec: spec.into(),
            polarity: Polarity::Unless,
        }
    }

    /// Resolve the guard and decide whether its rule applies.
    pub fn allows(&self, instance: &Instance<'_, C>) -> Result<bool> {
        let truthy = self.spec.resolve(instance)?.is_truthy();
        Ok(match self.polarity {
            Polarity::If => truthy,
            Polarity::Unless => !truthy,
        })
    }
}

impl<C> Clone for Guard<C> {
    fn clone(&self) -> Self {
        Self {
            spec: self.spec.clone(),
            polarity: self.polarity,
        }
    }
}

impl<C> fmt::Debug for Guard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("spec", &self.spec)
            .field("polarity", &self.polarity)
            .finish()
    }
}
