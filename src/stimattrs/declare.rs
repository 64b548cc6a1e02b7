//! # Stimulus Declarations
//!
//! Declarations are the friendly way to register rules. Each `has_stimulus_*`
//! method on [`ChainBuilder`] turns one declaration into one [`Rule`] (or, for
//! the plural batch forms, one rule per entry) and appends it to the chain.
//!
//! | Declaration | Key | Value |
//! |-------------|-----|-------|
//! | [`Controller`] | `controller` | the given name, or the component's controller |
//! | [`Action`] / [`Actions`] | `action` | `event->controller#action` descriptors |
//! | [`Class`] / [`Classes`] | `{controller}-{name}-class` | the given spec |
//! | [`Outlet`] / [`Outlets`] | `{controller}-{name}-outlet` | the given spec |
//! | [`Param`] / [`Params`] | `{controller}-{name}-param` | the given spec |
//! | [`Target`] | `{controller}-target` | the target name |
//! | [`Value`] / [`Values`] | `{controller}-{name}-value` | the given spec, or property `name` |
//!
//! Every declaration accepts `.when(spec)` / `.unless(spec)` guards, and all but
//! [`Controller`] accept `.controller(spec)` to target a controller other than
//! the component's own. Key formatting goes through the builder's
//! [`NamingConvention`](crate::naming::NamingConvention).
//!
//! ```ignore
//! RuleChain::<Card>::builder()
//!     .has_stimulus_controller(Controller::default())
//!     .has_stimulus_controller(Controller::named("tooltip").when(Spec::property("hint")))
//!     .has_stimulus_action(Action::new("click", "toggle"))
//!     .has_stimulus_values(Values::new([("open", Spec::property("open"))]))
//!     .build()
//! ```

use crate::component::Component;
use crate::error::Result;
use crate::naming::AttributeKind;
use crate::rule::{ChainBuilder, Rule};
use crate::spec::{Guard, Instance, Spec};

/// Options shared by every declaration.
pub struct Options<C> {
    /// Controller identifier; `None` means the component's own controller.
    pub controller: Option<Spec<C>>,
    pub guard: Option<Guard<C>>,
}

impl<C> Default for Options<C> {
    fn default() -> Self {
        Self {
            controller: None,
            guard: None,
        }
    }
}

impl<C> Clone for Options<C> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            guard: self.guard.clone(),
        }
    }
}

fn controller_of<C: Component + 'static>(
    controller: &Option<Spec<C>>,
    instance: &Instance<'_, C>,
) -> Result<String> {
    match controller {
        Some(spec) => spec.resolve_string(instance),
        None => Ok(instance.controller_name().to_string()),
    }
}

pub struct Controller<C> {
    name: Option<Spec<C>>,
    options: Options<C>,
}

impl<C> Default for Controller<C> {
    /// The component's own controller.
    fn default() -> Self {
        Self {
            name: None,
            options: Options::default(),
        }
    }
}

impl<C: Component + 'static> Controller<C> {
    pub fn named(name: impl Into<Spec<C>>) -> Self {
        Self {
            name: Some(name.into()),
            options: Options::default(),
        }
    }
}

pub struct Action<C> {
    event: String,
    action: String,
    options: Options<C>,
}

impl<C: Component + 'static> Action<C> {
    pub fn new(event: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            action: action.into(),
            options: Options::default(),
        }
    }
}

/// Several event/action pairs for one controller, registered as a single rule.
pub struct Actions<C> {
    pairs: Vec<(String, String)>,
    options: Options<C>,
}

impl<C: Component + 'static> Actions<C> {
    pub fn new<I, E, A>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (E, A)>,
        E: Into<String>,
        A: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(event, action)| (event.into(), action.into()))
                .collect(),
            options: Options::default(),
        }
    }
}

/// A named attribute whose value comes from a spec (class, outlet, param or value).
struct Keyed<C> {
    name: String,
    value: Spec<C>,
    options: Options<C>,
}

/// Several named attributes sharing options; one rule per entry.
struct KeyedBatch<C> {
    entries: Vec<(String, Spec<C>)>,
    options: Options<C>,
}

impl<C: Component + 'static> KeyedBatch<C> {
    fn collect<I, N, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<Spec<C>>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
            options: Options::default(),
        }
    }
}

macro_rules! keyed_declaration {
    ($single:ident, $batch:ident, $doc:literal) => {
        #[doc = $doc]
        pub struct $single<C>(Keyed<C>);

        impl<C: Component + 'static> $single<C> {
            pub fn new(name: impl Into<String>, value: impl Into<Spec<C>>) -> Self {
                Self(Keyed {
                    name: name.into(),
                    value: value.into(),
                    options: Options::default(),
                })
            }
        }

        pub struct $batch<C>(KeyedBatch<C>);

        impl<C: Component + 'static> $batch<C> {
            /// Entries are registered in iteration order.
            pub fn new<I, N, V>(entries: I) -> Self
            where
                I: IntoIterator<Item = (N, V)>,
                N: Into<String>,
                V: Into<Spec<C>>,
            {
                Self(KeyedBatch::collect(entries))
            }
        }
    };
}

keyed_declaration!(Class, Classes, "A CSS class handed to a controller.");
keyed_declaration!(Outlet, Outlets, "A selector for a controller outlet.");
keyed_declaration!(Param, Params, "An action parameter.");
keyed_declaration!(Value, Values, "A controller value.");

impl<C: Component + 'static> Value<C> {
    /// A value read from the component property of the same name.
    pub fn from_property(name: impl Into<String>) -> Self {
        let name: String = name.into();
        Self::new(name.clone(), Spec::property(name))
    }
}

impl<C: Component + 'static> Values<C> {
    /// Values read from the component properties of the same names.
    pub fn from_properties<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self(KeyedBatch::collect(names.into_iter().map(|name| {
            let name: String = name.into();
            (name.clone(), Spec::property(name))
        })))
    }
}

pub struct Target<C> {
    name: String,
    options: Options<C>,
}

impl<C: Component + 'static> Target<C> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Options::default(),
        }
    }
}

macro_rules! guard_options {
    ($($decl:ident),* $(,)?) => {
        $(
            impl<C: Component + 'static> $decl<C> {
                /// Register the rule only when `guard` resolves truthy.
                pub fn when(mut self, guard: impl Into<Spec<C>>) -> Self {
                    self.options_mut().guard = Some(Guard::when(guard));
                    self
                }

                /// Register the rule only when `guard` resolves falsy.
                pub fn unless(mut self, guard: impl Into<Spec<C>>) -> Self {
                    self.options_mut().guard = Some(Guard::unless(guard));
                    self
                }

                pub fn guarded(mut self, guard: Option<Guard<C>>) -> Self {
                    self.options_mut().guard = guard;
                    self
                }
            }
        )*
    };
}

macro_rules! controller_option {
    ($($decl:ident),* $(,)?) => {
        $(
            impl<C: Component + 'static> $decl<C> {
                /// Target another controller instead of the component's own.
                pub fn controller(mut self, controller: impl Into<Spec<C>>) -> Self {
                    self.options_mut().controller = Some(controller.into());
                    self
                }

                /// Replace all options at once.
                pub fn with_options(mut self, options: Options<C>) -> Self {
                    *self.options_mut() = options;
                    self
                }
            }
        )*
    };
}

macro_rules! options_field {
    ($($decl:ident => $($field:tt).+),* $(,)?) => {
        $(
            impl<C> $decl<C> {
                fn options_mut(&mut self) -> &mut Options<C> {
                    &mut self.$($field).+
                }
            }
        )*
    };
}

options_field!(
    Controller => options,
    Action => options,
    Actions => options,
    Target => options,
    Class => 0.options,
    Classes => 0.options,
    Outlet => 0.options,
    Outlets => 0.options,
    Param => 0.options,
    Params => 0.options,
    Value => 0.options,
    Values => 0.options,
);

guard_options!(
    Controller, Action, Actions, Target, Class, Classes, Outlet, Outlets, Param, Params, Value,
    Values,
);

controller_option!(
    Action, Actions, Target, Class, Classes, Outlet, Outlets, Param, Params, Value, Values,
);

impl<C: Component + 'static> ChainBuilder<C> {
    pub fn has_stimulus_controller(self, decl: Controller<C>) -> Self {
        let value = match decl.name {
            Some(name) if name.is_fixed_blank() => {
                return self.reject("controller name must not be blank");
            }
            Some(name) => name,
            None => Spec::deferred(|instance: &Instance<'_, C>| {
                instance.controller_name().to_string()
            }),
        };

        self.rule(Rule::new("controller", value).guarded(decl.options.guard))
    }

    pub fn has_stimulus_action(self, decl: Action<C>) -> Self {
        self.has_stimulus_actions(Actions {
            pairs: vec![(decl.event, decl.action)],
            options: decl.options,
        })
    }

    /// All pairs land in one space-separated `action` contribution.
    pub fn has_stimulus_actions(self, decl: Actions<C>) -> Self {
        if decl.pairs.is_empty() {
            return self.reject("has_stimulus_actions needs at least one event/action pair");
        }
        if let Some((event, action)) = decl
            .pairs
            .iter()
            .find(|(event, action)| event.trim().is_empty() || action.trim().is_empty())
        {
            return self.reject(format!(
                "action needs an event and a method (got {:?} -> {:?})",
                event, action
            ));
        }
        if let Some(problem) = check_controller(&decl.options) {
            return self.reject(problem);
        }

        let naming = self.naming();
        let controller = decl.options.controller;
        let pairs = decl.pairs;
        let value = Spec::try_deferred(move |instance: &Instance<'_, C>| {
            let controller = controller_of(&controller, instance)?;
            Ok(pairs
                .iter()
                .map(|(event, action)| naming.action_descriptor(&controller, event, action))
                .collect::<Vec<_>>()
                .join(" "))
        });

        self.rule(Rule::new("action", value).guarded(decl.options.guard))
    }

    pub fn has_stimulus_class(self, decl: Class<C>) -> Self {
        self.keyed(AttributeKind::Class, decl.0)
    }

    pub fn has_stimulus_classes(self, decl: Classes<C>) -> Self {
        self.keyed_batch(AttributeKind::Class, decl.0)
    }

    pub fn has_stimulus_outlet(self, decl: Outlet<C>) -> Self {
        self.keyed(AttributeKind::Outlet, decl.0)
    }

    pub fn has_stimulus_outlets(self, decl: Outlets<C>) -> Self {
        self.keyed_batch(AttributeKind::Outlet, decl.0)
    }

    pub fn has_stimulus_param(self, decl: Param<C>) -> Self {
        self.keyed(AttributeKind::Param, decl.0)
    }

    pub fn has_stimulus_params(self, decl: Params<C>) -> Self {
        self.keyed_batch(AttributeKind::Param, decl.0)
    }

    pub fn has_stimulus_target(self, decl: Target<C>) -> Self {
        let value = Spec::fixed(decl.name.clone());
        self.keyed(
            AttributeKind::Target,
            Keyed {
                name: decl.name,
                value,
                options: decl.options,
            },
        )
    }

    pub fn has_stimulus_value(self, decl: Value<C>) -> Self {
        self.keyed(AttributeKind::Value, decl.0)
    }

    pub fn has_stimulus_values(self, decl: Values<C>) -> Self {
        self.keyed_batch(AttributeKind::Value, decl.0)
    }

    fn keyed(self, kind: AttributeKind, decl: Keyed<C>) -> Self {
        if decl.name.trim().is_empty() {
            return self.reject(format!("{} name must not be blank", kind));
        }
        if let Some(problem) = check_controller(&decl.options) {
            return self.reject(problem);
        }

        let naming = self.naming();
        let controller = decl.options.controller;
        let name = decl.name;
        let key = Spec::try_deferred(move |instance: &Instance<'_, C>| {
            let controller = controller_of(&controller, instance)?;
            Ok(naming.attribute_key(&controller, &name, kind))
        });

        self.rule(Rule::new(key, decl.value).guarded(decl.options.guard))
    }

    fn keyed_batch(self, kind: AttributeKind, decl: KeyedBatch<C>) -> Self {
        if decl.entries.is_empty() {
            return self.reject(format!("batch {} declaration has no entries", kind));
        }

        let options = decl.options;
        decl.entries
            .into_iter()
            .fold(self, |builder, (name, value)| {
                builder.keyed(
                    kind,
                    Keyed {
                        name,
                        value,
                        options: options.clone(),
                    },
                )
            })
    }
}

fn check_controller<C: Component + 'static>(options: &Options<C>) -> Option<String> {
    match &options.controller {
        Some(spec) if spec.is_fixed_blank() => Some("controller option must not be blank".into()),
        _ => None,
    }
}
