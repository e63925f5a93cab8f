//! Wrapper component produced by a [`Decorator`](super::Decorator).
//!
//! [`DecoratedType`] is the wrapper's definition (its "class"), built once per
//! `decorate` call. [`PureEventProps`] is one live wrapper instance.
//!
//! # Render
//!
//! ```text
//! props ──► latest_props (handlers read this at call time)
//!   │
//!   ├─► pass-through: props without the configured event names
//!   └─► event props:  per name, per policy
//!         guard               → stable handler, always
//!         wrap + callable     → stable handler
//!         wrap + other value  → the value, untouched
//!         wrap + absent       → key omitted
//!   ▼
//! Element(base, pass-through ∪ event props, ref = set_main_ref)
//! ```
//!
//! Resolution for every name finishes before the element is built, and the
//! ref callback is created once per instance so the host never re-attaches
//! it on ordinary renders.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use super::config::{DecoratorConfig, EventPolicy};
use super::handlers::HandlerCache;
use crate::engine::{
    ComponentDef, ComponentType, Element, HoistedMembers, Instance, InstanceHandle, RefCallback,
    StaticMember, hoist,
};
use crate::error::{PureEventsError, Result};
use crate::types::{Callback, Props, Value};

// =============================================================================
// Definition
// =============================================================================

/// Definition of a decorated component.
pub struct DecoratedType {
    config: Rc<DecoratorConfig>,
    base: ComponentType,
    display_name: String,
    hoisted: Rc<HoistedMembers>,
}

impl DecoratedType {
    /// Build the wrapper definition and hoist the base surface onto it.
    pub(crate) fn new(config: Rc<DecoratorConfig>, base: ComponentType) -> Self {
        let base_name = match base.display_name() {
            "" => "Component",
            name => name,
        };
        let display_name = format!("{}({})", config.policy.label(), base_name);
        let hoisted = Rc::new(hoist(base.def(), &[]));

        tracing::debug!(
            component = %display_name,
            policy = ?config.policy,
            events = ?config.events.as_slice(),
            "decorated component"
        );

        Self {
            config,
            base,
            display_name,
            hoisted,
        }
    }

    pub fn base(&self) -> &ComponentType {
        &self.base
    }

    pub fn config(&self) -> &DecoratorConfig {
        &self.config
    }
}

impl ComponentDef for DecoratedType {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn is_pure(&self) -> bool {
        false
    }

    fn instantiate(&self, _props: &Props) -> Rc<dyn Instance> {
        Rc::new(PureEventProps::new(
            self.config.clone(),
            self.base.clone(),
            self.display_name.clone(),
            self.hoisted.clone(),
        ))
    }

    fn static_member(&self, name: &str) -> Option<StaticMember> {
        self.hoisted.static_member(name)
    }

    fn static_names(&self) -> Vec<String> {
        self.hoisted.static_names()
    }

    fn method_names(&self) -> Vec<String> {
        self.hoisted.method_names()
    }
}

// =============================================================================
// Instance
// =============================================================================

/// A live wrapper instance.
pub struct PureEventProps {
    config: Rc<DecoratorConfig>,
    base: ComponentType,
    display_name: String,
    hoisted: Rc<HoistedMembers>,
    latest_props: Rc<RefCell<Props>>,
    handlers: RefCell<HandlerCache>,
    main_ref: Rc<RefCell<Option<InstanceHandle>>>,
    set_main_ref: RefCallback,
}

impl PureEventProps {
    fn new(
        config: Rc<DecoratorConfig>,
        base: ComponentType,
        display_name: String,
        hoisted: Rc<HoistedMembers>,
    ) -> Self {
        let latest_props = Rc::new(RefCell::new(Props::new()));
        let main_ref: Rc<RefCell<Option<InstanceHandle>>> = Rc::new(RefCell::new(None));

        let slot = main_ref.clone();
        let name = display_name.clone();
        let set_main_ref = RefCallback::new(move |instance| {
            tracing::debug!(component = %name, attached = instance.is_some(), "main ref updated");
            *slot.borrow_mut() = instance;
        });

        Self {
            config,
            base,
            display_name,
            hoisted,
            handlers: RefCell::new(HandlerCache::new(latest_props.clone())),
            latest_props,
            main_ref,
            set_main_ref,
        }
    }

    /// Stable handler for `name`, created on first request.
    pub fn event_handler_for(&self, name: &str) -> Callback {
        self.handlers.borrow_mut().get_or_create(name)
    }

    /// Number of stable handlers created so far.
    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// The most recently attached base instance.
    pub fn main_ref(&self) -> Option<InstanceHandle> {
        self.main_ref.borrow().clone()
    }

    /// The most recently rendered props.
    pub fn latest_props(&self) -> Props {
        self.latest_props.borrow().clone()
    }

    pub fn config(&self) -> &DecoratorConfig {
        &self.config
    }

    /// Props the base component receives for `props`.
    ///
    /// Pure function of `props` and the existing handler cache (which it may
    /// extend with new handlers).
    pub fn resolve_props(&self, props: &Props) -> Props {
        let events = &self.config.events;
        let mut resolved = props.omit(events);
        let mut handlers = self.handlers.borrow_mut();

        for name in events {
            let value = props.get(name);
            match self.config.policy {
                EventPolicy::Guard => {
                    resolved.insert(name.as_str(), handlers.get_or_create(name));
                }
                EventPolicy::Wrap => match value {
                    Some(value) if value.is_callable() => {
                        resolved.insert(name.as_str(), handlers.get_or_create(name));
                    }
                    Some(value) => {
                        resolved.insert(name.as_str(), value.clone());
                    }
                    None => {}
                },
            }
        }

        resolved
    }
}

impl Instance for PureEventProps {
    fn render(&self, props: &Props) -> Result<Element> {
        *self.latest_props.borrow_mut() = props.clone();

        let resolved = self.resolve_props(props);
        Ok(Element::component(self.base.clone(), resolved).with_ref(self.set_main_ref.clone()))
    }

    fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        if !self.hoisted.has_method(name) {
            return Err(PureEventsError::not_found(self.display_name.as_str(), name));
        }

        // Clone out of the slot: the base method may trigger a re-render
        let target = self.main_ref().ok_or_else(|| PureEventsError::NotMounted {
            component: self.display_name.clone(),
            member: name.to_string(),
        })?;
        target.call(name, args)
    }

    fn forwarded(&self) -> Option<InstanceHandle> {
        self.main_ref()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// Tests
// =============================================================================
