//! Decorator configuration - which props are events, and how they are resolved.
//!
//! Event names may be given flat or nested to any depth; they are flattened
//! once, when the decorator is built, and duplicates collapse to their first
//! occurrence. Only membership matters for behaviour.
//!
//! Configs are plain serde data, so an event list can live in a TOML file:
//!
//! ```toml
//! policy = "guard"
//! events = ["onPress", ["onChange", "onBlur"]]
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

// =============================================================================
// Event Policy
// =============================================================================

/// How configured event props are resolved on each render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPolicy {
    /// Callable values become stable handlers; anything else passes through,
    /// and absent keys stay absent.
    #[default]
    Wrap,
    /// Every configured key always resolves to a stable handler.
    Guard,
}

impl EventPolicy {
    /// Label used in wrapper display names.
    ///
    /// Policy-specific: a guard wrapper reads `guard_pure_event_props(..)`,
    /// not the `wrap_pure_event_props(..)` label older releases of this
    /// decorator used for both. Only diagnostics see the label.
    pub fn label(self) -> &'static str {
        match self {
            EventPolicy::Wrap => "wrap_pure_event_props",
            EventPolicy::Guard => "guard_pure_event_props",
        }
    }
}

// =============================================================================
// Event Names
// =============================================================================

/// One argument to a decorator factory: a name or a nested list of names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventNameArg {
    Name(String),
    List(Vec<EventNameArg>),
}

impl From<&str> for EventNameArg {
    fn from(name: &str) -> Self {
        EventNameArg::Name(name.to_string())
    }
}

impl From<String> for EventNameArg {
    fn from(name: String) -> Self {
        EventNameArg::Name(name)
    }
}

impl From<&String> for EventNameArg {
    fn from(name: &String) -> Self {
        EventNameArg::Name(name.clone())
    }
}

impl<T: Into<EventNameArg>> From<Vec<T>> for EventNameArg {
    fn from(list: Vec<T>) -> Self {
        EventNameArg::List(list.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<EventNameArg>, const N: usize> From<[T; N]> for EventNameArg {
    fn from(list: [T; N]) -> Self {
        EventNameArg::List(list.into_iter().map(Into::into).collect())
    }
}

impl EventNameArg {
    fn flatten_into(self, out: &mut EventNames) {
        match self {
            EventNameArg::Name(name) => out.push(name),
            EventNameArg::List(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }
}

/// Flattened, de-duplicated event prop names.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<EventNameArg>", into = "Vec<String>")]
pub struct EventNames(Vec<String>);

impl EventNames {
    /// Flatten any mix of names and nested lists.
    pub fn flatten<I>(args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<EventNameArg>,
    {
        let mut names = EventNames::default();
        for arg in args {
            arg.into().flatten_into(&mut names);
        }
        names
    }

    fn push(&mut self, name: String) {
        if !self.0.contains(&name) {
            self.0.push(name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<EventNameArg>> for EventNames {
    fn from(args: Vec<EventNameArg>) -> Self {
        EventNames::flatten(args)
    }
}

impl From<EventNames> for Vec<String> {
    fn from(names: EventNames) -> Self {
        names.0
    }
}

impl<'a> IntoIterator for &'a EventNames {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// =============================================================================
// Decorator Config
// =============================================================================

/// Immutable configuration captured by a decorator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoratorConfig {
    #[serde(default)]
    pub events: EventNames,
    #[serde(default)]
    pub policy: EventPolicy,
}

impl DecoratorConfig {
    pub fn new(events: EventNames, policy: EventPolicy) -> Self {
        Self { events, policy }
    }

    /// Parse a config from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn is_guard(&self) -> bool {
        self.policy == EventPolicy::Guard
    }
}

// =============================================================================
// Tests
// =============================================================================
