//! Member tables and hoisting.
//!
//! A component declares its callable surface explicitly:
//! - **Static members** - `Fn(&[Value]) -> Value`, called on the type
//! - **Instance methods** - `Fn(&mut C, &[Value]) -> Value`, called on a live instance
//!
//! [`hoist`] copies a definition's surface so a wrapper can expose it,
//! skipping names the host contract or the wrapper itself owns.
//! Statics are copied as-is. Instance methods are copied by name only: the
//! wrapper delegates each call to whatever base instance it currently holds.

use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use super::component::ComponentDef;
use crate::types::Value;

/// Static member callable.
pub type StaticMember = Rc<dyn Fn(&[Value]) -> Value>;

/// Instance method callable.
pub type MethodMember<C> = Rc<dyn Fn(&mut C, &[Value]) -> Value>;

/// Names owned by the host component contract. Never hoisted.
pub const RESERVED_MEMBERS: &[&str] = &[
    "constructor",
    "create",
    "render",
    "display_name",
    "members",
    "instantiate",
    "is_pure",
    "should_update",
    "did_mount",
    "did_update",
    "will_unmount",
    "set_state",
    "force_update",
    "call",
    "call_static",
    "forwarded",
];

/// Names owned by the event-prop wrapper. Never hoisted onto it.
pub const WRAPPER_MEMBERS: &[&str] = &["set_main_ref", "event_handler_for"];

/// Whether `name` belongs to the host contract or the wrapper.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_MEMBERS.contains(&name) || WRAPPER_MEMBERS.contains(&name)
}

// =============================================================================
// Member Table
// =============================================================================

/// Declared callable surface of a component type.
///
/// # Example
///
/// ```ignore
/// fn members() -> MemberTable<Self> {
///     MemberTable::new()
///         .with_static("version", |_| Value::from("1.0"))
///         .with_method("focus", |input: &mut Input, _| {
///             input.focused = true;
///             Value::Undefined
///         })
/// }
/// ```
pub struct MemberTable<C> {
    statics: HashMap<String, StaticMember>,
    methods: HashMap<String, MethodMember<C>>,
}

impl<C> Default for MemberTable<C> {
    fn default() -> Self {
        Self {
            statics: HashMap::new(),
            methods: HashMap::new(),
        }
    }
}

impl<C: 'static> MemberTable<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_static(
        mut self,
        name: impl Into<String>,
        member: impl Fn(&[Value]) -> Value + 'static,
    ) -> Self {
        self.statics.insert(name.into(), Rc::new(member));
        self
    }

    pub fn with_method(
        mut self,
        name: impl Into<String>,
        method: impl Fn(&mut C, &[Value]) -> Value + 'static,
    ) -> Self {
        self.methods.insert(name.into(), Rc::new(method));
        self
    }

    pub fn static_member(&self, name: &str) -> Option<StaticMember> {
        self.statics.get(name).cloned()
    }

    pub fn method(&self, name: &str) -> Option<&MethodMember<C>> {
        self.methods.get(name)
    }

    /// Sorted static member names.
    pub fn static_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.statics.keys().cloned().collect();
        names.sort();
        names
    }

    /// Sorted instance method names.
    pub fn method_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.statics.is_empty() && self.methods.is_empty()
    }
}

// =============================================================================
// Hoisting
// =============================================================================

/// Surface copied from a base definition onto a wrapper.
#[derive(Default)]
pub struct HoistedMembers {
    statics: HashMap<String, StaticMember>,
    methods: BTreeSet<String>,
}

impl HoistedMembers {
    pub fn static_member(&self, name: &str) -> Option<StaticMember> {
        self.statics.get(name).cloned()
    }

    pub fn static_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.statics.keys().cloned().collect();
        names.sort();
        names
    }

    /// Whether instance calls to `name` are forwarded.
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains(name)
    }

    pub fn method_names(&self) -> Vec<String> {
        self.methods.iter().cloned().collect()
    }
}

/// Copy the callable surface of `source`, excluding reserved names and
/// anything in `extra_excluded`.
///
/// Colliding names are skipped, never an error.
pub fn hoist(source: &dyn ComponentDef, extra_excluded: &[&str]) -> HoistedMembers {
    let excluded = |name: &str| is_reserved(name) || extra_excluded.contains(&name);
    let mut hoisted = HoistedMembers::default();

    for name in source.static_names() {
        if excluded(&name) {
            tracing::debug!(
                component = source.display_name(),
                member = %name,
                "skipping reserved static"
            );
            continue;
        }
        if let Some(member) = source.static_member(&name) {
            hoisted.statics.insert(name, member);
        }
    }

    for name in source.method_names() {
        if excluded(&name) {
            tracing::debug!(
                component = source.display_name(),
                member = %name,
                "skipping reserved method"
            );
            continue;
        }
        hoisted.methods.insert(name);
    }

    tracing::debug!(
        component = source.display_name(),
        statics = hoisted.statics.len(),
        methods = hoisted.methods.len(),
        "hoisted members"
    );

    hoisted
}

// =============================================================================
// Tests
// =============================================================================
