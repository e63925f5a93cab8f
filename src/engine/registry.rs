//! Component Type Registry - one definition per Rust type.
//!
//! The host reconciles by [`ComponentType`] identity, so
//! `ComponentType::of::<C>()` must hand back the same `Rc` every time it is
//! called for a given `C`. Definitions (and the member tables they build) are
//! memoised per thread.

use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;

use super::component::{Component, ComponentType, TypedDef};

// =============================================================================
// Registry State
// =============================================================================

thread_local! {
    /// Map Rust type to its shared definition.
    static TYPES: RefCell<HashMap<TypeId, ComponentType>> = RefCell::new(HashMap::new());
}

// =============================================================================
// Lookup / Registration
// =============================================================================

/// Get (or register) the definition for `C`.
pub fn component_type<C: Component>() -> ComponentType {
    let id = TypeId::of::<C>();

    let existing = TYPES.with(|types| types.borrow().get(&id).cloned());
    if let Some(ty) = existing {
        return ty;
    }

    // Build outside the borrow: C::members() may itself look up other types
    let ty = ComponentType::from_def(TypedDef::<C>::new());
    tracing::trace!(component = ty.display_name(), "registered component type");

    TYPES.with(|types| types.borrow_mut().entry(id).or_insert(ty).clone())
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Drop all registered definitions (for testing).
///
/// Types looked up afterwards get fresh identities, so any host still holding
/// old elements will remount on the next update.
pub fn reset_registry() {
    TYPES.with(|types| types.borrow_mut().clear());
}
