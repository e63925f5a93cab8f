//! # spark-pure-events
//!
//! Stable event-prop handlers for pure components.
//!
//! Pure components skip re-rendering when their props are shallow-equal to
//! the previous ones. Inline callbacks break that: every parent render hands
//! the child a new callback identity. This crate decorates a component type so
//! a configured set of event props always reaches it as the same handler,
//! which dispatches to the parent's current callback at call time.
//!
//! ## Architecture
//!
//! ```text
//! wrap_pure_event_props(names) / guard_pure_event_props(names) → Decorator
//! Decorator::decorate(base)  → ComponentType (wrapper, base surface hoisted)
//! host renders wrapper       → partition props, resolve events, render base
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Prop values, identity-compared callbacks, shallow-compared props
//! - [`engine`] - Component contract, member tables and hoisting, type registry
//! - [`decorator`] - Event-prop configuration, handler cache, wrapper component
//! - [`pipeline`] - Host renderer (mount, reconcile, refs, signal-driven updates)
//! - [`error`] - Error type

pub mod decorator;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{PureEventsError, Result};

pub use engine::{
    Component, ComponentDef, ComponentElement, ComponentType, Element, Instance, InstanceHandle,
    MemberTable, RefCallback, hoist, is_reserved, reset_registry,
};

pub use decorator::{
    Decorator, DecoratorConfig, EventNameArg, EventNames, EventPolicy, PureEventProps,
    guard_pure_event_props, make_decorator, wrap_pure_event_props,
};

pub use pipeline::{ReactiveRoot, Root, mount, mount_reactive};
