//! Engine - Component contract, member surface and type registry.
//!
//! The engine defines what a component *is* to a host:
//! - Component: typed trait, erased definition, live instance, render output
//! - Members: declared callable surface and hoisting onto wrappers
//! - Registry: one shared definition per Rust type
//!
//! # Architecture
//!
//! ```text
//! impl Component for C  →  ComponentType::of::<C>()  (Rc<dyn ComponentDef>, memoised)
//!                                 ↓ instantiate(props)
//!                          Rc<dyn Instance>  →  render(props) → Element
//!                                 ↓ ref callback
//!                          InstanceHandle (call members, borrow typed state)
//! ```

mod component;
mod members;
mod registry;

pub use component::*;
pub use members::*;
pub use registry::*;
