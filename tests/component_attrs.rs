use once_cell::sync::Lazy;
use std::cell::Cell;
use stimattrs::prelude::*;

struct Demo {
    dynamic_value: String,
    cache: AttributeCache,
}

impl Demo {
    fn new(dynamic_value: &str) -> Self {
        Self {
            dynamic_value: dynamic_value.to_string(),
            cache: AttributeCache::new(),
        }
    }

    fn instance_method_controller(&self) -> &'static str {
        "instance-method-controller"
    }
}

impl Component for Demo {
    fn controller_name(&self) -> String {
        "component-controller".into()
    }

    fn property(&self, name: &str) -> Option<AttrValue> {
        match name {
            "dynamic_value" => Some(self.dynamic_value.clone().into()),
            "if" | "unless" => Some(true.into()),
            _ => None,
        }
    }
}

fn proc_controller() -> Spec<Demo> {
    Spec::deferred(|_: &Instance<'_, Demo>| "proc--controller")
}

fn dynamic() -> Spec<Demo> {
    Spec::deferred(|c: &Instance<'_, Demo>| c.dynamic_value.clone())
}

static DEMO_RULES: Lazy<RuleChain<Demo>> = Lazy::new(|| {
    RuleChain::builder()
        .has_stimulus_controller(Controller::default())
        .has_stimulus_controller(Controller::named(proc_controller()))
        .has_stimulus_controller(Controller::named(Spec::deferred(
            |c: &Instance<'_, Demo>| c.instance_method_controller(),
        )))
        .has_stimulus_controller(Controller::named("other--controller"))
        .has_stimulus_controller(Controller::named("if--controller").when(Spec::property("if")))
        .has_stimulus_controller(
            Controller::named("unless--controller").unless(Spec::property("unless")),
        )
        .has_stimulus_action(Action::new("click", "onClick"))
        .has_stimulus_action(Action::new("click", "onClick").controller("other--controller"))
        .has_stimulus_action(Action::new("click", "onClick").controller(proc_controller()))
        .has_stimulus_class(Class::new("class_name", "component_class_name"))
        .has_stimulus_class(
            Class::new("class_name", "component_class_name").controller(proc_controller()),
        )
        .has_stimulus_class(Class::new("proc_class_name", dynamic()).controller("other--controller"))
        .has_stimulus_class(
            Class::new("sym_class_name", "other_class_name").controller("other--controller"),
        )
        .has_stimulus_outlet(Outlet::new("outlet", ".selector"))
        .has_stimulus_outlet(Outlet::new("outlet", ".selector").controller(proc_controller()))
        .has_stimulus_outlet(Outlet::new("proc_outlet", dynamic()).controller("other--controller"))
        .has_stimulus_outlet(
            Outlet::new("sym_outlet", Spec::property("dynamic_value"))
                .controller("other--controller"),
        )
        .has_stimulus_param(Param::new("param", "param_value"))
        .has_stimulus_param(Param::new("param", "param_value").controller(proc_controller()))
        .has_stimulus_param(Param::new("proc_param", dynamic()).controller("other--controller"))
        .has_stimulus_param(
            Param::new("sym_param", Spec::property("dynamic_value"))
                .controller("other--controller"),
        )
        .has_stimulus_target(Target::new("target"))
        .has_stimulus_target(Target::new("target").controller("other--controller"))
        .has_stimulus_target(Target::new("target").controller(proc_controller()))
        .has_stimulus_value(Value::new("value", "value_value"))
        .has_stimulus_value(Value::new("value", "value_value").controller(proc_controller()))
        .has_stimulus_value(Value::new("proc_value", dynamic()).controller("other--controller"))
        .has_stimulus_value(
            Value::new("sym_value", Spec::property("dynamic_value"))
                .controller("other--controller"),
        )
        .build()
        .expect("demo declarations are valid")
});

impl HasStimulusAttrs for Demo {
    fn rules(&self) -> &RuleChain<Self> {
        &DEMO_RULES
    }

    fn attribute_cache(&self) -> &AttributeCache {
        &self.cache
    }

    fn attribute_cache_mut(&mut self) -> &mut AttributeCache {
        &mut self.cache
    }
}

fn tokens(attrs: &AttributeMap, key: &str) -> Vec<String> {
    attrs
        .get(key)
        .map(|v| v.split(' ').map(str::to_string).collect())
        .unwrap_or_default()
}

#[test]
fn test_has_stimulus_controller() {
    let demo = Demo::new("");
    let attrs = demo.stimulus_attributes().unwrap();
    let controllers = tokens(attrs, "controller");

    for expected in [
        "component-controller",
        "proc--controller",
        "instance-method-controller",
        "other--controller",
        "if--controller",
    ] {
        assert!(controllers.contains(&expected.to_string()), "missing {}", expected);
    }
    assert!(!controllers.contains(&"unless--controller".to_string()));
    assert_eq!(
        attrs["controller"],
        "component-controller proc--controller instance-method-controller other--controller if--controller"
    );
}

#[test]
fn test_has_stimulus_action() {
    let demo = Demo::new("");
    let attrs = demo.stimulus_attributes().unwrap();

    assert_eq!(
        attrs["action"],
        "click->component-controller#onClick click->other--controller#onClick click->proc--controller#onClick"
    );
}

#[test]
fn test_has_stimulus_class() {
    let demo = Demo::new("foo");
    let attrs = demo.stimulus_attributes().unwrap();

    assert_eq!(attrs["component-controller-class-name-class"], "component_class_name");
    assert_eq!(attrs["proc--controller-class-name-class"], "component_class_name");
    assert_eq!(attrs["other--controller-proc-class-name-class"], "foo");
    assert_eq!(attrs["other--controller-sym-class-name-class"], "other_class_name");
}

#[test]
fn test_has_stimulus_outlet() {
    let demo = Demo::new("foo");
    let attrs = demo.stimulus_attributes().unwrap();

    assert_eq!(attrs["component-controller-outlet-outlet"], ".selector");
    assert_eq!(attrs["other--controller-proc-outlet-outlet"], "foo");
    assert_eq!(attrs["other--controller-sym-outlet-outlet"], "foo");
}

#[test]
fn test_has_stimulus_param() {
    let demo = Demo::new("foo");
    let attrs = demo.stimulus_attributes().unwrap();

    assert_eq!(attrs["component-controller-param-param"], "param_value");
    assert_eq!(attrs["other--controller-proc-param-param"], "foo");
    assert_eq!(attrs["other--controller-sym-param-param"], "foo");
}

#[test]
fn test_has_stimulus_target() {
    let demo = Demo::new("foo");
    let attrs = demo.stimulus_attributes().unwrap();

    assert_eq!(attrs["component-controller-target"], "target");
    assert_eq!(attrs["other--controller-target"], "target");
    assert_eq!(attrs["proc--controller-target"], "target");
}

#[test]
fn test_has_stimulus_value() {
    let demo = Demo::new("foo");
    let attrs = demo.stimulus_attributes().unwrap();

    assert_eq!(attrs["component-controller-value-value"], "value_value");
    assert_eq!(attrs["proc--controller-value-value"], "value_value");
    assert_eq!(attrs["other--controller-proc-value-value"], "foo");
    assert_eq!(attrs["other--controller-sym-value-value"], "foo");
}

#[test]
fn test_blank_dynamic_values_leave_an_empty_key() {
    let demo = Demo::new("");
    let attrs = demo.stimulus_attributes().unwrap();

    assert_eq!(attrs["other--controller-proc-value-value"], "");
    assert_eq!(attrs["other--controller-sym-outlet-outlet"], "");
}

// Memoization

struct Expensive {
    condition: bool,
    expensive_calls: Cell<usize>,
    cache: AttributeCache,
}

impl Expensive {
    fn new(condition: bool) -> Self {
        Self {
            condition,
            expensive_calls: Cell::new(0),
            cache: AttributeCache::new(),
        }
    }

    fn expensive_computation(&self) -> String {
        self.expensive_calls.set(self.expensive_calls.get() + 1);
        format!("expensive_result_{}", self.expensive_calls.get())
    }
}

impl Component for Expensive {
    fn controller_name(&self) -> String {
        "performance-test".into()
    }

    fn property(&self, name: &str) -> Option<AttrValue> {
        match name {
            "should_include_conditional" => Some(self.condition.into()),
            _ => None,
        }
    }
}

static EXPENSIVE_RULES: Lazy<RuleChain<Expensive>> = Lazy::new(|| {
    let conditional = || -> Spec<Expensive> { Spec::property("should_include_conditional") };
    let expensive =
        || -> Spec<Expensive> { Spec::deferred(|c: &Instance<'_, Expensive>| c.expensive_computation()) };

    RuleChain::builder()
        .has_stimulus_controller(Controller::default())
        .has_stimulus_controller(Controller::named("conditional").when(conditional()))
        .has_stimulus_action(Action::new("click", "handleClick"))
        .has_stimulus_value(Value::new("expensive", expensive()))
        .has_stimulus_value(
            Value::new("conditional_expensive", expensive()).when(conditional()),
        )
        .build()
        .expect("expensive declarations are valid")
});

impl HasStimulusAttrs for Expensive {
    fn rules(&self) -> &RuleChain<Self> {
        &EXPENSIVE_RULES
    }

    fn attribute_cache(&self) -> &AttributeCache {
        &self.cache
    }

    fn attribute_cache_mut(&mut self) -> &mut AttributeCache {
        &mut self.cache
    }
}

#[test]
fn test_attributes_are_memoized() {
    let component = Expensive::new(true);

    let first = component.stimulus_attributes().unwrap().clone();
    let calls_after_first = component.expensive_calls.get();
    let second = component.stimulus_attributes().unwrap().clone();

    assert_eq!(first, second);
    assert_eq!(component.expensive_calls.get(), calls_after_first);
}

#[test]
fn test_cache_reset_recomputes() {
    let mut component = Expensive::new(true);

    component.stimulus_attributes().unwrap();
    let first_calls = component.expensive_calls.get();

    component.reset_stimulus_attributes();
    let attrs = component.stimulus_attributes().unwrap();

    assert!(component.expensive_calls.get() > first_calls);
    assert_eq!(attrs["performance-test-expensive-value"], "expensive_result_3");
}

#[test]
fn test_guarded_off_rule_skips_its_computation() {
    let component = Expensive::new(false);
    let attrs = component.stimulus_attributes().unwrap();

    assert_eq!(component.expensive_calls.get(), 1);
    assert_eq!(attrs["controller"], "performance-test");
    assert!(!attrs.contains_key("performance-test-conditional-expensive-value"));
}

#[test]
fn test_guarded_on_rule_is_included() {
    let component = Expensive::new(true);
    let attrs = component.stimulus_attributes().unwrap();

    assert_eq!(component.expensive_calls.get(), 2);
    assert_eq!(attrs["controller"], "performance-test conditional");
    assert_eq!(
        attrs["performance-test-conditional-expensive-value"],
        "expensive_result_2"
    );
}

// Controller name lookup

struct Counted {
    lookups: Cell<usize>,
    cache: AttributeCache,
}

impl Component for Counted {
    fn controller_name(&self) -> String {
        self.lookups.set(self.lookups.get() + 1);
        "cached-test".into()
    }
}

static COUNTED_RULES: Lazy<RuleChain<Counted>> = Lazy::new(|| {
    RuleChain::builder()
        .has_stimulus_controller(Controller::default())
        .has_stimulus_action(Action::new("click", "go"))
        .has_stimulus_target(Target::new("item"))
        .has_stimulus_value(Value::new("size", 3))
        .build()
        .expect("counted declarations are valid")
});

impl HasStimulusAttrs for Counted {
    fn rules(&self) -> &RuleChain<Self> {
        &COUNTED_RULES
    }

    fn attribute_cache(&self) -> &AttributeCache {
        &self.cache
    }

    fn attribute_cache_mut(&mut self) -> &mut AttributeCache {
        &mut self.cache
    }
}

#[test]
fn test_controller_name_is_looked_up_once() {
    let mut component = Counted {
        lookups: Cell::new(0),
        cache: AttributeCache::new(),
    };

    let attrs = component.stimulus_attributes().unwrap().clone();
    assert_eq!(attrs["controller"], "cached-test");
    assert_eq!(attrs["action"], "click->cached-test#go");
    assert_eq!(attrs["cached-test-target"], "item");
    assert_eq!(attrs["cached-test-size-value"], "3");
    assert_eq!(component.lookups.get(), 1);

    component.reset_stimulus_attributes();
    component.stimulus_attributes().unwrap();
    assert_eq!(component.lookups.get(), 1);
}

// Reset hook

struct Hooked {
    resets: usize,
    cache: AttributeCache,
}

impl Component for Hooked {
    fn controller_name(&self) -> String {
        "hooked".into()
    }
}

static HOOKED_RULES: Lazy<RuleChain<Hooked>> = Lazy::new(|| {
    RuleChain::builder()
        .has_stimulus_controller(Controller::default())
        .build()
        .expect("hooked declarations are valid")
});

impl HasStimulusAttrs for Hooked {
    fn rules(&self) -> &RuleChain<Self> {
        &HOOKED_RULES
    }

    fn attribute_cache(&self) -> &AttributeCache {
        &self.cache
    }

    fn attribute_cache_mut(&mut self) -> &mut AttributeCache {
        &mut self.cache
    }

    fn on_attributes_reset(&mut self) {
        self.resets += 1;
    }
}

#[test]
fn test_reset_runs_host_hook() {
    let mut component = Hooked {
        resets: 0,
        cache: AttributeCache::new(),
    };

    component.stimulus_attributes().unwrap();
    component.reset_stimulus_attributes();
    component.reset_stimulus_attributes();

    assert_eq!(component.resets, 2);
    assert!(!component.attribute_cache().is_computed());
}
