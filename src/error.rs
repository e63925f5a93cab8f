//! Error types for spark-pure-events

use thiserror::Error;

/// Errors raised by member forwarding, re-entrant access and decorator
/// configuration.
///
/// Event-prop resolution is total. A render only fails when the instance is
/// busy, and the host defers it. Panics inside a base component's own render
/// propagate untouched.
#[derive(Error, Debug)]
pub enum PureEventsError {
    /// No callable member with this name (or the name is reserved)
    #[error("`{member}` is not a callable member of {component}")]
    MemberNotFound { component: String, member: String },

    /// Forwarded instance member called with no rendered base instance
    #[error("{component} has no mounted instance to receive `{member}`")]
    NotMounted { component: String, member: String },

    /// Target instance is already mutably borrowed
    #[error("{component} is busy and cannot receive `{member}` re-entrantly")]
    InstanceBusy { component: String, member: String },

    /// Malformed declarative decorator config
    #[error("invalid decorator config: {0}")]
    Config(#[from] toml::de::Error),
}

impl PureEventsError {
    pub(crate) fn not_found(component: impl Into<String>, member: &str) -> Self {
        Self::MemberNotFound {
            component: component.into(),
            member: member.to_string(),
        }
    }
}

/// Result type for spark-pure-events operations
pub type Result<T> = std::result::Result<T, PureEventsError>;
