//! Pure Event Props - keep pure components pure when parents pass inline callbacks.
//!
//! A parent that writes `on_press: Value::callback(|_| ...)` on every render
//! hands its child a new callback identity each time, so a shallow-compared
//! (pure) child re-renders even though nothing it cares about changed.
//!
//! A [`Decorator`] wraps a component type so a configured set of event props
//! always reaches it as the *same* handler per mounted instance. The handler
//! looks up the parent's current callback when it is invoked.
//!
//! - [`wrap_pure_event_props`] - callable event props become stable handlers;
//!   other values pass through and absent keys stay absent
//! - [`guard_pure_event_props`] - every configured event prop is always a
//!   stable handler, a no-op when the parent gave nothing callable
//!
//! # Example
//!
//! ```ignore
//! use spark_pure_events::{wrap_pure_event_props, mount, Element, Props, Value};
//!
//! let button = wrap_pure_event_props(["on_press"]).apply::<Button>();
//!
//! let mut root = mount(Element::component(
//!     button.clone(),
//!     Props::new().with("on_press", Value::callback(|_| Value::Undefined)),
//! ));
//!
//! // New closure, same handler: Button (PURE) does not re-render
//! root.update(Element::component(
//!     button,
//!     Props::new().with("on_press", Value::callback(|_| Value::Undefined)),
//! ));
//! ```
//!
//! Names can be nested: `wrap_pure_event_props([vec!["on_press"], vec!["on_blur"]])`.

mod config;
mod handlers;
mod wrapper;

pub use config::*;
pub use handlers::HandlerCache;
pub use wrapper::{DecoratedType, PureEventProps};

use std::rc::Rc;

use crate::engine::{Component, ComponentType};
use crate::error::Result;

// =============================================================================
// Decorator
// =============================================================================

/// Reusable decorator: apply it to any number of component types.
#[derive(Clone, Debug)]
pub struct Decorator {
    config: Rc<DecoratorConfig>,
}

impl Decorator {
    pub fn from_config(config: DecoratorConfig) -> Self {
        Self {
            config: Rc::new(config),
        }
    }

    /// Build a decorator from a TOML config.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        DecoratorConfig::from_toml_str(source).map(Self::from_config)
    }

    pub fn config(&self) -> &DecoratorConfig {
        &self.config
    }

    /// Wrap `base`. Each call yields a new wrapper type with its own identity;
    /// the base surface is hoisted once, here.
    pub fn decorate(&self, base: &ComponentType) -> ComponentType {
        ComponentType::from_def(DecoratedType::new(self.config.clone(), base.clone()))
    }

    /// Wrap a typed component.
    pub fn apply<C: Component>(&self) -> ComponentType {
        self.decorate(&ComponentType::of::<C>())
    }
}

// =============================================================================
// Factories
// =============================================================================

/// Build a decorator from event-name arguments and a policy.
pub fn make_decorator<I>(events: I, policy: EventPolicy) -> Decorator
where
    I: IntoIterator,
    I::Item: Into<EventNameArg>,
{
    Decorator::from_config(DecoratorConfig::new(EventNames::flatten(events), policy))
}

/// Stable handlers for callable event props; everything else untouched.
pub fn wrap_pure_event_props<I>(events: I) -> Decorator
where
    I: IntoIterator,
    I::Item: Into<EventNameArg>,
{
    make_decorator(events, EventPolicy::Wrap)
}

/// Stable handlers for every configured event prop, callable or not.
pub fn guard_pure_event_props<I>(events: I) -> Decorator
where
    I: IntoIterator,
    I::Item: Into<EventNameArg>,
{
    make_decorator(events, EventPolicy::Guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Element, MemberTable};
    use crate::types::{Props, Value};

    struct Button;

    impl Component for Button {
        const PURE: bool = true;

        fn create(_props: &Props) -> Self {
            Button
        }

        fn render(&mut self, _props: &Props) -> Element {
            Element::Empty
        }

        fn members() -> MemberTable<Self> {
            MemberTable::new().with_static("variants", |_| Value::from(3))
        }
    }

    #[test]
    fn test_factories_set_policy() {
        assert_eq!(wrap_pure_event_props(["a"]).config().policy, EventPolicy::Wrap);
        assert_eq!(guard_pure_event_props(["a"]).config().policy, EventPolicy::Guard);
    }

    #[test]
    fn test_zero_events() {
        let decorator = wrap_pure_event_props(Vec::<&str>::new());
        assert!(decorator.config().events.is_empty());
    }

    #[test]
    fn test_decorate_yields_new_identity() {
        let decorator = wrap_pure_event_props(["on_press"]);
        let a = decorator.apply::<Button>();
        let b = decorator.apply::<Button>();

        assert_ne!(a, b);
        assert_ne!(a, ComponentType::of::<Button>());
        assert_eq!(a.display_name(), "wrap_pure_event_props(Button)");
    }

    #[test]
    fn test_statics_hoisted() {
        let ty = guard_pure_event_props(["on_press"]).apply::<Button>();
        assert!(ty.has_static("variants"));
        assert_eq!(ty.call_static("variants", &[]).unwrap(), Value::from(3));
        assert_eq!(ty.display_name(), "guard_pure_event_props(Button)");
    }

    #[test]
    fn test_from_toml() {
        let decorator = Decorator::from_toml_str(r#"events = [["on_press"], "on_blur"]"#).unwrap();
        assert_eq!(decorator.config().events.as_slice(), ["on_press", "on_blur"]);
        assert!(!decorator.config().is_guard());
    }
}
