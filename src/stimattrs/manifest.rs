//! # Component Manifests
//!
//! A manifest describes one component in JSON: its controller name, the
//! properties that named-property references resolve against, the base
//! attributes it already carries, and its declarations in order.
//!
//! ```json
//! {
//!   "controller": "card",
//!   "properties": { "count": 5, "open": true },
//!   "base": { "turbo-frame": "card" },
//!   "declarations": [
//!     { "kind": "controller" },
//!     { "kind": "controller", "name": "tooltip", "if": { "property": "open" } },
//!     { "kind": "action", "event": "click", "action": "toggle" },
//!     { "kind": "values", "values": { "count": { "property": "count" } } }
//!   ]
//! }
//! ```
//!
//! Fixed specs are plain JSON values; `{"property": "name"}` is a reference.
//! Batch kinds (`actions`, `classes`, `outlets`, `params`, `values`) take JSON
//! objects and register their entries in document order.

use crate::cache::{AttributeCache, HasStimulusAttrs};
use crate::component::{AttributeMap, Component};
use crate::config::StimattrsConfig;
use crate::declare::{
    Action, Actions, Class, Classes, Controller, Options, Outlet, Outlets, Param, Params, Target,
    Value, Values,
};
use crate::error::{Result, StimulusError};
use crate::rule::{ChainBuilder, RuleChain};
use crate::spec::{Guard, Spec};
use crate::value::AttrValue;
use serde::Deserialize;
use serde_json::Map;
use std::fs;
use std::path::Path;
use std::sync::Arc;

type JsonMap = Map<String, serde_json::Value>;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyRef {
    pub property: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SpecSource {
    Property(PropertyRef),
    Fixed(serde_json::Value),
}

impl SpecSource {
    fn to_spec(&self) -> Spec<ManifestComponent> {
        match self {
            SpecSource::Property(r) => Spec::property(r.property.clone()),
            SpecSource::Fixed(value) => Spec::fixed(value.clone()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeclarationKind {
    Controller {
        #[serde(default)]
        name: Option<SpecSource>,
    },
    Action {
        event: String,
        action: String,
    },
    Actions {
        actions: JsonMap,
    },
    Class {
        name: String,
        value: SpecSource,
    },
    Classes {
        classes: JsonMap,
    },
    Outlet {
        name: String,
        value: SpecSource,
    },
    Outlets {
        outlets: JsonMap,
    },
    Param {
        name: String,
        value: SpecSource,
    },
    Params {
        params: JsonMap,
    },
    Target {
        name: String,
    },
    Value {
        name: String,
        #[serde(default)]
        value: Option<SpecSource>,
    },
    Values {
        values: JsonMap,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Declaration {
    #[serde(flatten)]
    pub kind: DeclarationKind,

    #[serde(default)]
    pub controller: Option<SpecSource>,

    #[serde(default, rename = "if")]
    pub when: Option<SpecSource>,

    #[serde(default)]
    pub unless: Option<SpecSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub controller: Option<String>,

    #[serde(default)]
    pub properties: JsonMap,

    #[serde(default)]
    pub base: AttributeMap,

    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

impl Manifest {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| StimulusError::Manifest(e.to_string()))
    }

    /// Register every declaration, in order, on a fresh chain.
    pub fn compile(&self) -> Result<RuleChain<ManifestComponent>> {
        self.declarations
            .iter()
            .try_fold(RuleChain::builder(), register)?
            .build()
    }

    /// An instance ready to compose attributes.
    ///
    /// The controller name comes from the manifest, falling back to the config.
    pub fn component(&self, config: &StimattrsConfig) -> Result<ManifestComponent> {
        let controller = self
            .controller
            .clone()
            .or_else(|| config.controller.clone())
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| {
                StimulusError::Manifest(
                    "no controller name: set \"controller\" in the manifest or the config".into(),
                )
            })?;

        Ok(ManifestComponent {
            controller,
            properties: self.properties.clone(),
            base: self.base.clone(),
            rules: Arc::new(self.compile()?),
            cache: AttributeCache::new(),
        })
    }
}

fn options(decl: &Declaration) -> Result<Options<ManifestComponent>> {
    let guard = match (&decl.when, &decl.unless) {
        (Some(_), Some(_)) => {
            return Err(StimulusError::Manifest(
                "a declaration takes either \"if\" or \"unless\", not both".into(),
            ))
        }
        (Some(spec), None) => Some(Guard::when(spec.to_spec())),
        (None, Some(spec)) => Some(Guard::unless(spec.to_spec())),
        (None, None) => None,
    };

    Ok(Options {
        controller: decl.controller.as_ref().map(SpecSource::to_spec),
        guard,
    })
}

fn batch_entries(map: &JsonMap) -> Result<Vec<(String, Spec<ManifestComponent>)>> {
    map.iter()
        .map(|(name, value)| {
            let source: SpecSource = serde_json::from_value(value.clone())
                .map_err(|e| StimulusError::Manifest(format!("entry {}: {}", name, e)))?;
            Ok((name.clone(), source.to_spec()))
        })
        .collect()
}

fn register(
    builder: ChainBuilder<ManifestComponent>,
    decl: &Declaration,
) -> Result<ChainBuilder<ManifestComponent>> {
    let opts = options(decl)?;

    let builder = match &decl.kind {
        DeclarationKind::Controller { name } => {
            if opts.controller.is_some() {
                return Err(StimulusError::Manifest(
                    "\"controller\" is not an option of controller declarations; use \"name\""
                        .into(),
                ));
            }
            let controller = match name {
                Some(name) => Controller::named(name.to_spec()),
                None => Controller::default(),
            };
            builder.has_stimulus_controller(controller.guarded(opts.guard))
        }
        DeclarationKind::Action { event, action } => {
            builder.has_stimulus_action(Action::new(event.as_str(), action.as_str()).with_options(opts))
        }
        DeclarationKind::Actions { actions } => {
            let pairs = actions
                .iter()
                .map(|(event, action)| match action {
                    serde_json::Value::String(action) => Ok((event.clone(), action.clone())),
                    other => Err(StimulusError::Manifest(format!(
                        "action for event {} must be a string, got {}",
                        event, other
                    ))),
                })
                .collect::<Result<Vec<_>>>()?;
            builder.has_stimulus_actions(Actions::new(pairs).with_options(opts))
        }
        DeclarationKind::Class { name, value } => builder
            .has_stimulus_class(Class::new(name.as_str(), value.to_spec()).with_options(opts)),
        DeclarationKind::Classes { classes } => builder
            .has_stimulus_classes(Classes::new(batch_entries(classes)?).with_options(opts)),
        DeclarationKind::Outlet { name, value } => builder
            .has_stimulus_outlet(Outlet::new(name.as_str(), value.to_spec()).with_options(opts)),
        DeclarationKind::Outlets { outlets } => builder
            .has_stimulus_outlets(Outlets::new(batch_entries(outlets)?).with_options(opts)),
        DeclarationKind::Param { name, value } => builder
            .has_stimulus_param(Param::new(name.as_str(), value.to_spec()).with_options(opts)),
        DeclarationKind::Params { params } => builder
            .has_stimulus_params(Params::new(batch_entries(params)?).with_options(opts)),
        DeclarationKind::Target { name } => {
            builder.has_stimulus_target(Target::new(name.as_str()).with_options(opts))
        }
        DeclarationKind::Value { name, value } => {
            let value = match value {
                Some(value) => Value::new(name.as_str(), value.to_spec()),
                None => Value::from_property(name.as_str()),
            };
            builder.has_stimulus_value(value.with_options(opts))
        }
        DeclarationKind::Values { values } => {
            // A null entry reads the property of the same name, like a single value
            let entries = batch_entries(values)?
                .into_iter()
                .map(|(name, spec)| match spec {
                    Spec::Fixed(AttrValue::Null) => (name.clone(), Spec::property(name)),
                    spec => (name, spec),
                });
            builder.has_stimulus_values(Values::new(entries).with_options(opts))
        }
    };

    Ok(builder)
}

/// A component backed by a manifest's JSON properties.
pub struct ManifestComponent {
    controller: String,
    properties: JsonMap,
    base: AttributeMap,
    rules: Arc<RuleChain<ManifestComponent>>,
    cache: AttributeCache,
}

impl Component for ManifestComponent {
    fn controller_name(&self) -> String {
        self.controller.clone()
    }

    fn property(&self, name: &str) -> Option<AttrValue> {
        self.properties.get(name).cloned().map(AttrValue::from)
    }

    fn base_attributes(&self) -> AttributeMap {
        self.base.clone()
    }
}

impl HasStimulusAttrs for ManifestComponent {
    fn rules(&self) -> &RuleChain<Self> {
        &self.rules
    }

    fn attribute_cache(&self) -> &AttributeCache {
        &self.cache
    }

    fn attribute_cache_mut(&mut self) -> &mut AttributeCache {
        &mut self.cache
    }
}

impl ManifestComponent {
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}
