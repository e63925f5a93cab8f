//! Stable handler cache.
//!
//! One [`Callback`] per event name per wrapper instance, created on first
//! request and never replaced. Each handler reads the wrapper's *latest*
//! props when it is invoked, so its identity stays fixed while the function
//! it dispatches to follows whatever the parent passed most recently.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::types::{Callback, Props, Value};

/// Lazily-populated map of event name to stable handler.
pub struct HandlerCache {
    latest_props: Rc<RefCell<Props>>,
    handlers: HashMap<String, Callback>,
}

impl HandlerCache {
    /// Create a cache whose handlers dispatch against `latest_props`.
    pub fn new(latest_props: Rc<RefCell<Props>>) -> Self {
        Self {
            latest_props,
            handlers: HashMap::new(),
        }
    }

    /// Get the handler for `name`, creating it on first request.
    pub fn get_or_create(&mut self, name: &str) -> Callback {
        if let Some(handler) = self.handlers.get(name) {
            return handler.clone();
        }

        tracing::trace!(event = name, "creating stable handler");
        let handler = stable_handler(self.latest_props.clone(), name.to_string());
        self.handlers.insert(name.to_string(), handler.clone());
        handler
    }

    pub fn get(&self, name: &str) -> Option<&Callback> {
        self.handlers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Build the dispatching closure for one event name.
fn stable_handler(latest_props: Rc<RefCell<Props>>, name: String) -> Callback {
    Callback::new(move |args| {
        // Release the borrow before calling out: the callee may re-render us
        let current = latest_props
            .borrow()
            .get(&name)
            .and_then(Value::as_callback)
            .cloned();

        match current {
            Some(callback) => callback.call(args),
            None => {
                tracing::trace!(event = %name, "event prop is not callable, ignoring call");
                Value::Undefined
            }
        }
    })
}
