//! Host Pipeline
//!
//! The host side of the component contract: mounting, the shallow purity
//! check, reconciliation by type identity, ref attach/detach and unmount.
//!
//! # Pipeline Architecture
//!
//! ```text
//! Element → reconcile → (pure + shallow-equal? skip) → Instance::render → Element → ...
//!                                                    ↘ ref callbacks (attach / detach)
//! ```
//!
//! Updates are driven either by hand ([`Root::update`]) or by a
//! `spark-signals` effect ([`mount_reactive`]).

pub mod mount;

// Re-exports
pub use mount::{ReactiveRoot, Root, mount, mount_reactive};
