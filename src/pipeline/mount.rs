//! Mount API - host renderer for component trees.
//!
//! A small, synchronous host: it owns the render loop, the purity check and
//! instance identity. Decorated components are rendered by it exactly like
//! any other component.
//!
//! # Reconciliation
//!
//! 1. Same [`ComponentType`] as the mounted node: update in place. A pure type
//!    whose next props are shallow-equal to the previous ones skips rendering
//!    its subtree. Props are replaced either way.
//! 2. Different type (or [`Element::Empty`]): unmount the old subtree, mount the
//!    new one.
//! 3. Ref callbacks attach after the node's subtree is mounted. When a ref
//!    callback changes identity the old one receives `None` and the new one
//!    the instance; an unchanged callback is not re-invoked.
//! 4. An instance that is busy (one of its own member calls is re-rendering
//!    the tree) is not rendered. The node keeps its new props and is marked
//!    stale; the next [`Root::update`] or [`Root::flush`] renders it, purity
//!    notwithstanding.
//!
//! # Example
//!
//! ```ignore
//! use spark_pure_events::pipeline::mount;
//!
//! let mut root = mount(Element::of::<App>(Props::new().with("title", "hi")));
//! root.update(Element::of::<App>(Props::new().with("title", "bye")));
//! root.unmount();
//! ```
//!
//! [`mount_reactive`] drives the same updates from a `spark-signals` effect.

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::effect;

use crate::engine::{
    ComponentElement, ComponentType, Element, Instance, InstanceHandle, RefCallback,
};
use crate::types::Props;

// =============================================================================
// Mounted Tree
// =============================================================================

struct MountedNode {
    ty: ComponentType,
    instance: Rc<dyn Instance>,
    props: Props,
    ref_callback: Option<RefCallback>,
    child: Option<Box<MountedNode>>,
    /// Last render was deferred; props are newer than the subtree
    stale: bool,
}

impl MountedNode {
    fn handle(&self) -> InstanceHandle {
        InstanceHandle::new(self.instance.clone())
    }

    fn render(&mut self) {
        match self.instance.render(&self.props) {
            Ok(output) => {
                self.stale = false;
                reconcile(&mut self.child, output);
            }
            Err(err) => {
                tracing::debug!(
                    component = self.ty.display_name(),
                    error = %err,
                    "instance busy, render deferred"
                );
                self.stale = true;
            }
        }
    }

    fn has_stale(&self) -> bool {
        self.stale || self.child.as_ref().is_some_and(|child| child.has_stale())
    }
}

fn reconcile(slot: &mut Option<Box<MountedNode>>, element: Element) {
    match element {
        Element::Empty => {
            if let Some(old) = slot.take() {
                unmount_node(*old);
            }
        }
        Element::Component(el) => {
            let reuse = matches!(slot.as_deref(), Some(node) if node.ty == el.ty);
            if reuse {
                if let Some(node) = slot.as_mut() {
                    update_node(node, el);
                }
            } else {
                if let Some(old) = slot.take() {
                    unmount_node(*old);
                }
                *slot = Some(mount_node(el));
            }
        }
    }
}

fn mount_node(el: ComponentElement) -> Box<MountedNode> {
    let ComponentElement {
        ty,
        props,
        ref_callback,
    } = el;

    tracing::trace!(component = ty.display_name(), "mounting");
    let instance = ty.instantiate(&props);

    let mut node = Box::new(MountedNode {
        ty,
        instance,
        props,
        ref_callback,
        child: None,
        stale: false,
    });
    node.render();

    if let Some(ref_callback) = &node.ref_callback {
        ref_callback.call(Some(node.handle()));
    }
    node
}

fn update_node(node: &mut MountedNode, el: ComponentElement) {
    let ComponentElement {
        props,
        ref_callback,
        ..
    } = el;

    let skip = !node.stale && node.ty.is_pure() && node.props == props;
    node.props = props;

    if skip {
        tracing::trace!(
            component = node.ty.display_name(),
            "props unchanged, skipping render"
        );
    } else {
        node.render();
    }

    if node.ref_callback != ref_callback {
        if let Some(old) = node.ref_callback.take() {
            old.call(None);
        }
        if let Some(new) = &ref_callback {
            new.call(Some(node.handle()));
        }
        node.ref_callback = ref_callback;
    }
}

fn flush_node(node: &mut MountedNode) {
    if node.stale {
        node.render();
    }
    if let Some(child) = node.child.as_mut() {
        flush_node(child);
    }
}

fn unmount_node(node: MountedNode) {
    tracing::trace!(component = node.ty.display_name(), "unmounting");

    if let Some(ref_callback) = &node.ref_callback {
        ref_callback.call(None);
    }
    if let Some(child) = node.child {
        unmount_node(*child);
    }
}

// =============================================================================
// Root
// =============================================================================

/// A mounted component tree.
///
/// Dropping the root unmounts it (ref callbacks receive `None`).
#[derive(Default)]
pub struct Root {
    node: Option<Box<MountedNode>>,
}

/// Mount an element and render it once.
pub fn mount(element: Element) -> Root {
    let mut root = Root::new();
    root.update(element);
    root
}

impl Root {
    /// An empty root with nothing mounted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `element` against the current tree.
    ///
    /// Deferred renders anywhere in the tree are retried afterwards.
    pub fn update(&mut self, element: Element) {
        reconcile(&mut self.node, element);
        self.flush();
    }

    /// Render every node whose last render was deferred.
    ///
    /// Nodes that are still busy stay deferred.
    pub fn flush(&mut self) {
        if let Some(node) = self.node.as_mut() {
            flush_node(node);
        }
    }

    /// Whether any node is waiting for a deferred render.
    pub fn has_deferred(&self) -> bool {
        self.node.as_ref().is_some_and(|node| node.has_stale())
    }

    /// Instance of the top-level component.
    pub fn instance(&self) -> Option<InstanceHandle> {
        self.node.as_ref().map(|node| node.handle())
    }

    /// Type of the top-level component.
    pub fn component_type(&self) -> Option<&ComponentType> {
        self.node.as_ref().map(|node| &node.ty)
    }

    /// Props the top-level component last received.
    pub fn props(&self) -> Option<&Props> {
        self.node.as_ref().map(|node| &node.props)
    }

    /// Number of mounted components from the top down.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.node.as_deref();
        while let Some(node) = current {
            depth += 1;
            current = node.child.as_deref();
        }
        depth
    }

    pub fn is_mounted(&self) -> bool {
        self.node.is_some()
    }

    /// Unmount everything.
    pub fn unmount(&mut self) {
        if let Some(node) = self.node.take() {
            unmount_node(*node);
        }
    }
}

impl Drop for Root {
    fn drop(&mut self) {
        self.unmount();
    }
}

// =============================================================================
// Reactive Mount
// =============================================================================

/// Handle returned by [`mount_reactive`].
///
/// Holds the root and the render effect stop function.
pub struct ReactiveRoot {
    root: Rc<RefCell<Root>>,
    stop_effect: Option<Box<dyn FnOnce()>>,
}

/// Mount `ty` and re-render it whenever a signal read by `props` changes.
///
/// The first render happens before this returns. Updates are synchronous:
/// setting a signal re-renders before `set` returns. Setting a tracked signal
/// from inside a render is not supported.
pub fn mount_reactive(ty: ComponentType, props: impl Fn() -> Props + 'static) -> ReactiveRoot {
    let root = Rc::new(RefCell::new(Root::new()));
    let target = root.clone();

    let stop_fn = effect(move || {
        // Read props first so signal tracking happens outside the root borrow
        let next = props();
        target
            .borrow_mut()
            .update(Element::component(ty.clone(), next));
    });

    ReactiveRoot {
        root,
        stop_effect: Some(Box::new(stop_fn)),
    }
}

impl ReactiveRoot {
    /// Instance of the top-level component.
    pub fn instance(&self) -> Option<InstanceHandle> {
        self.root.borrow().instance()
    }

    /// Whether the render effect is still active.
    pub fn is_running(&self) -> bool {
        self.stop_effect.is_some()
    }

    /// Stop reacting to signals. The tree stays mounted.
    pub fn stop(&mut self) {
        if let Some(stop) = self.stop_effect.take() {
            stop();
        }
    }

    /// Stop the effect and unmount the tree.
    pub fn unmount(mut self) {
        self.stop();
        self.root.borrow_mut().unmount();
    }
}

impl Drop for ReactiveRoot {
    fn drop(&mut self) {
        self.stop();
        if let Ok(mut root) = self.root.try_borrow_mut() {
            root.unmount();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
