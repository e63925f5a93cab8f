//! Component contract - what a host needs to mount, render and address a component.
//!
//! Two layers:
//! - [`Component`] - the typed trait user components implement
//! - [`ComponentDef`] / [`Instance`] - the erased "class" and "object" the
//!   host and decorators work with
//!
//! A [`ComponentType`] is a shared `Rc<dyn ComponentDef>`. Its pointer
//! identity is the reconciliation key: the host reuses an instance only while
//! successive elements carry the *same* `ComponentType`.
//!
//! # Example
//!
//! ```ignore
//! struct Label;
//!
//! impl Component for Label {
//!     const PURE: bool = true;
//!
//!     fn create(_props: &Props) -> Self {
//!         Label
//!     }
//!
//!     fn render(&mut self, _props: &Props) -> Element {
//!         Element::Empty
//!     }
//! }
//!
//! let root = mount(Element::of::<Label>(Props::new().with("text", "hi")));
//! ```

use std::any::Any;
use std::cell::{RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use super::members::{MemberTable, StaticMember};
use super::registry;
use crate::error::{PureEventsError, Result};
use crate::types::{Props, Value};

// =============================================================================
// Typed Component
// =============================================================================

/// A renderable component.
pub trait Component: Sized + 'static {
    /// Skip re-rendering when the next props are shallow-equal to the previous.
    const PURE: bool = false;

    /// Construct an instance on mount.
    fn create(props: &Props) -> Self;

    /// Produce the render output for the given props.
    fn render(&mut self, props: &Props) -> Element;

    /// Diagnostic label.
    fn display_name() -> String {
        let full = std::any::type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base).to_string()
    }

    /// Declared callable surface (static members and instance methods).
    fn members() -> MemberTable<Self> {
        MemberTable::new()
    }
}

// =============================================================================
// Erased Definition
// =============================================================================

/// Erased component definition.
pub trait ComponentDef: 'static {
    fn display_name(&self) -> &str;

    fn is_pure(&self) -> bool;

    /// Create a live instance for a mount.
    fn instantiate(&self, props: &Props) -> Rc<dyn Instance>;

    fn static_member(&self, name: &str) -> Option<StaticMember>;

    fn static_names(&self) -> Vec<String>;

    /// Names of instance methods callable through [`Instance::call`].
    fn method_names(&self) -> Vec<String>;

    fn call_static(&self, name: &str, args: &[Value]) -> Result<Value> {
        match self.static_member(name) {
            Some(member) => Ok(member(args)),
            None => Err(PureEventsError::not_found(self.display_name(), name)),
        }
    }
}

/// Shared handle to a component definition.
#[derive(Clone)]
pub struct ComponentType(Rc<dyn ComponentDef>);

impl ComponentType {
    /// The definition for a typed component. Memoised per thread, so every
    /// call for the same `C` returns the same identity.
    pub fn of<C: Component>() -> Self {
        registry::component_type::<C>()
    }

    /// Wrap a custom definition. Each call yields a fresh identity.
    pub fn from_def(def: impl ComponentDef) -> Self {
        Self(Rc::new(def))
    }

    pub fn display_name(&self) -> &str {
        self.0.display_name()
    }

    pub fn is_pure(&self) -> bool {
        self.0.is_pure()
    }

    pub fn def(&self) -> &dyn ComponentDef {
        &*self.0
    }

    pub fn call_static(&self, name: &str, args: &[Value]) -> Result<Value> {
        self.0.call_static(name, args)
    }

    pub fn has_static(&self, name: &str) -> bool {
        self.0.static_member(name).is_some()
    }

    pub fn static_names(&self) -> Vec<String> {
        self.0.static_names()
    }

    pub fn method_names(&self) -> Vec<String> {
        self.0.method_names()
    }

    pub(crate) fn instantiate(&self, props: &Props) -> Rc<dyn Instance> {
        self.0.instantiate(props)
    }

    pub fn ptr_eq(&self, other: &ComponentType) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl PartialEq for ComponentType {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ComponentType")
            .field(&self.display_name())
            .finish()
    }
}

// =============================================================================
// Instances
// =============================================================================

/// A live, mounted component instance.
pub trait Instance: 'static {
    /// Render with the given props.
    ///
    /// Fails with [`PureEventsError::InstanceBusy`] when the instance is
    /// already borrowed, e.g. a member call whose event prop re-renders the
    /// tree. The host defers the render in that case.
    fn render(&self, props: &Props) -> Result<Element>;

    /// Invoke a named instance member.
    fn call(&self, name: &str, args: &[Value]) -> Result<Value>;

    /// The instance this one forwards its surface to, if any.
    fn forwarded(&self) -> Option<InstanceHandle> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

/// Cloneable handle to a live instance (what ref callbacks receive).
#[derive(Clone)]
pub struct InstanceHandle(Rc<dyn Instance>);

impl InstanceHandle {
    pub(crate) fn new(instance: Rc<dyn Instance>) -> Self {
        Self(instance)
    }

    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        self.0.call(name, args)
    }

    pub fn forwarded(&self) -> Option<InstanceHandle> {
        self.0.forwarded()
    }

    /// Borrow the typed component behind this handle.
    ///
    /// Returns `None` when the handle is not a `C` or the instance is
    /// currently mutably borrowed.
    pub fn with<C: Component, R>(&self, f: impl FnOnce(&C) -> R) -> Option<R> {
        let typed = self.0.as_any().downcast_ref::<TypedInstance<C>>()?;
        let component = typed.cell.try_borrow().ok()?;
        Some(f(&*component))
    }

    pub fn downcast_ref<T: Instance>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    pub fn same_instance(&self, other: &InstanceHandle) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl fmt::Debug for InstanceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceHandle({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

// =============================================================================
// Typed Adapter
// =============================================================================

/// Definition backing [`ComponentType::of`].
pub(crate) struct TypedDef<C: Component> {
    name: String,
    members: Rc<MemberTable<C>>,
}

impl<C: Component> TypedDef<C> {
    pub(crate) fn new() -> Self {
        Self {
            name: C::display_name(),
            members: Rc::new(C::members()),
        }
    }
}

impl<C: Component> ComponentDef for TypedDef<C> {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn is_pure(&self) -> bool {
        C::PURE
    }

    fn instantiate(&self, props: &Props) -> Rc<dyn Instance> {
        Rc::new(TypedInstance {
            name: self.name.clone(),
            cell: RefCell::new(C::create(props)),
            members: self.members.clone(),
        })
    }

    fn static_member(&self, name: &str) -> Option<StaticMember> {
        self.members.static_member(name)
    }

    fn static_names(&self) -> Vec<String> {
        self.members.static_names()
    }

    fn method_names(&self) -> Vec<String> {
        self.members.method_names()
    }
}

/// Instance backing a typed component.
pub(crate) struct TypedInstance<C: Component> {
    name: String,
    cell: RefCell<C>,
    members: Rc<MemberTable<C>>,
}

impl<C: Component> TypedInstance<C> {
    fn borrow_for(&self, member: &str) -> Result<RefMut<'_, C>> {
        self.cell
            .try_borrow_mut()
            .map_err(|_| PureEventsError::InstanceBusy {
                component: self.name.clone(),
                member: member.to_string(),
            })
    }
}

impl<C: Component> Instance for TypedInstance<C> {
    fn render(&self, props: &Props) -> Result<Element> {
        let mut component = self.borrow_for("render")?;
        Ok(component.render(props))
    }

    fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        let method = self
            .members
            .method(name)
            .ok_or_else(|| PureEventsError::not_found(self.name.as_str(), name))?;
        let mut component = self.borrow_for(name)?;
        Ok(method(&mut *component, args))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// Ref Callback
// =============================================================================

/// Callback the host invokes with the rendered instance (or `None` on detach).
///
/// Compared by identity: the host only re-attaches when the callback changes.
#[derive(Clone)]
pub struct RefCallback(Rc<dyn Fn(Option<InstanceHandle>)>);

impl RefCallback {
    pub fn new(f: impl Fn(Option<InstanceHandle>) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, instance: Option<InstanceHandle>) {
        (self.0)(instance)
    }

    pub fn ptr_eq(&self, other: &RefCallback) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl PartialEq for RefCallback {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for RefCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RefCallback({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

// =============================================================================
// Element
// =============================================================================

/// Render output.
#[derive(Clone, Debug, Default)]
pub enum Element {
    /// Renders nothing.
    #[default]
    Empty,
    Component(ComponentElement),
}

/// A component to render with its props and optional ref callback.
#[derive(Clone, Debug)]
pub struct ComponentElement {
    pub ty: ComponentType,
    pub props: Props,
    pub ref_callback: Option<RefCallback>,
}

impl Element {
    pub fn component(ty: ComponentType, props: Props) -> Self {
        Element::Component(ComponentElement {
            ty,
            props,
            ref_callback: None,
        })
    }

    /// Element for a typed component.
    pub fn of<C: Component>(props: Props) -> Self {
        Self::component(ComponentType::of::<C>(), props)
    }

    /// Attach a ref callback. No effect on [`Element::Empty`].
    pub fn with_ref(self, ref_callback: RefCallback) -> Self {
        match self {
            Element::Component(mut el) => {
                el.ref_callback = Some(ref_callback);
                Element::Component(el)
            }
            Element::Empty => Element::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Element::Empty)
    }
}

// =============================================================================
// Tests
// =============================================================================
