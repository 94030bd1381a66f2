//! Stateful components.
//!
//! A component owns its props, children and a JSON `state`. It never appears
//! in the canonical virtual tree itself; its rendered output does. Once
//! mounted it keeps the tree it last produced as the baseline for the next
//! reconciliation.

use std::cell::{RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;

use crate::error::RenderError;
use crate::host::Anchor;
use crate::props::{PropValue, Props};
use crate::reconcile::reconcile;
use crate::render::MountContext;
use crate::state::merge_state;
use crate::vnode::{attach, VNode};

/// Application-defined component behavior.
///
/// `render` runs with the component's base borrowed: calling `set_state` or
/// `update` from it fails with [`RenderError::UpdateDuringRender`]. Handlers
/// it installs may call them.
pub trait Component: 'static {
    /// Construction hook, run once before the node is handed out.
    fn init(&self, _base: &mut ComponentBase) {}

    fn render(&self, scope: &RenderScope<'_>) -> VNode;
}

#[derive(Default)]
pub struct ComponentBase {
    props: Props,
    children: Vec<VNode>,
    state: Value,
    anchor: Option<Anchor>,
    last_materialized: Option<VNode>,
    rendered: Option<VNode>,
    mounted_child: Option<ComponentNode>,
    context: Option<MountContext>,
}

impl ComponentBase {
    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn children(&self) -> &[VNode] {
        &self.children
    }

    pub fn state(&self) -> &Value {
        &self.state
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        self.props.insert(name, value);
    }

    pub fn append_child(&mut self, child: impl Into<VNode>) {
        self.children.push(child.into());
    }

    /// Replaces the state outright. Meant for construction; later changes go
    /// through [`ComponentNode::set_state`].
    pub fn replace_state(&mut self, state: Value) {
        self.state = state;
    }
}

struct ComponentInner {
    logic: Box<dyn Component>,
    base: RefCell<ComponentBase>,
}

/// Shared handle to a component instance.
#[derive(Clone)]
pub struct ComponentNode {
    inner: Rc<ComponentInner>,
}

impl ComponentNode {
    pub fn new<C: Component + Default>() -> Self {
        Self::from_boxed(Box::new(C::default()))
    }

    pub fn from_component<C: Component>(component: C) -> Self {
        Self::from_boxed(Box::new(component))
    }

    pub fn from_boxed(logic: Box<dyn Component>) -> Self {
        let mut base = ComponentBase::default();
        logic.init(&mut base);
        Self {
            inner: Rc::new(ComponentInner {
                logic,
                base: RefCell::new(base),
            }),
        }
    }

    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<PropValue>) {
        self.inner.base.borrow_mut().set_attribute(name, value);
    }

    pub fn append_child(&self, child: impl Into<VNode>) {
        self.inner.base.borrow_mut().append_child(child);
    }

    pub fn props(&self) -> Props {
        self.inner.base.borrow().props.clone()
    }

    pub fn state(&self) -> Value {
        self.inner.base.borrow().state.clone()
    }

    pub fn anchor(&self) -> Option<Anchor> {
        self.inner.base.borrow().anchor
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.base.borrow().context.is_some()
    }

    /// The tree currently mounted at this component's anchor.
    ///
    /// When the component rendered straight into another component, that
    /// mounted instance may have updated on its own since; its tree wins.
    /// The link is recorded at attach time, so a fresh render that has not
    /// been reconciled yet does not hide it.
    pub fn last_materialized(&self) -> Option<VNode> {
        let (child, last) = {
            let base = self.inner.base.borrow();
            (base.mounted_child.clone(), base.last_materialized.clone())
        };
        child
            .filter(ComponentNode::is_mounted)
            .and_then(|child| child.last_materialized())
            .or(last)
    }

    pub fn downgrade(&self) -> WeakComponent {
        WeakComponent {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn ptr_eq(&self, other: &ComponentNode) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Renders the component and materializes the output down to
    /// element/text nodes.
    pub fn materialize(&self) -> VNode {
        let rendered = {
            let base = self.inner.base.borrow();
            let scope = RenderScope {
                base: &base,
                handle: self.downgrade(),
            };
            self.inner.logic.render(&scope)
        };
        self.inner.base.borrow_mut().rendered = Some(rendered.clone());
        rendered.materialize()
    }

    /// Deep-merges `partial` into the state, then reconciles synchronously.
    pub fn set_state(&self, partial: Value) -> Result<(), RenderError> {
        {
            let mut base = self.base_mut()?;
            if base.context.is_none() {
                return Err(RenderError::NotMounted);
            }
            merge_state(&mut base.state, partial);
        }
        self.update()
    }

    /// Re-renders and patches the mounted tree against the new output.
    pub fn update(&self) -> Result<(), RenderError> {
        let ctx = self
            .base_mut()?
            .context
            .clone()
            .ok_or(RenderError::NotMounted)?;
        let old = self.last_materialized().ok_or(RenderError::NotMounted)?;
        let new = self.materialize();
        reconcile(&ctx, &old, &new)?;
        attach(&VNode::Component(self.clone()), &new, &ctx);
        Ok(())
    }

    pub(crate) fn rendered(&self) -> Option<VNode> {
        self.inner.base.borrow().rendered.clone()
    }

    pub(crate) fn set_anchor(&self, anchor: Anchor) {
        self.inner.base.borrow_mut().anchor = Some(anchor);
    }

    pub(crate) fn attach(&self, tree: VNode, ctx: MountContext, child: Option<ComponentNode>) {
        let mut base = self.inner.base.borrow_mut();
        base.anchor = tree.anchor();
        base.last_materialized = Some(tree);
        base.mounted_child = child;
        base.context = Some(ctx);
    }

    /// Exclusive access to the base. Fails while `render` holds it.
    fn base_mut(&self) -> Result<RefMut<'_, ComponentBase>, RenderError> {
        self.inner
            .base
            .try_borrow_mut()
            .map_err(|_| RenderError::UpdateDuringRender)
    }
}

impl fmt::Debug for ComponentNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = self.inner.base.borrow();
        f.debug_struct("ComponentNode")
            .field("props", &base.props)
            .field("children", &base.children.len())
            .field("state", &base.state)
            .field("anchor", &base.anchor)
            .finish()
    }
}

/// Weak handle for event handlers, so a mounted tree does not keep its own
/// component alive.
#[derive(Clone)]
pub struct WeakComponent {
    inner: Weak<ComponentInner>,
}

impl WeakComponent {
    pub fn upgrade(&self) -> Option<ComponentNode> {
        self.inner.upgrade().map(|inner| ComponentNode { inner })
    }

    pub fn set_state(&self, partial: Value) -> Result<(), RenderError> {
        self.upgrade()
            .ok_or(RenderError::ComponentDropped)?
            .set_state(partial)
    }

    pub fn update(&self) -> Result<(), RenderError> {
        self.upgrade().ok_or(RenderError::ComponentDropped)?.update()
    }
}

impl fmt::Debug for WeakComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakComponent")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

/// Read access handed to [`Component::render`].
pub struct RenderScope<'a> {
    base: &'a ComponentBase,
    handle: WeakComponent,
}

impl RenderScope<'_> {
    pub fn props(&self) -> &Props {
        &self.base.props
    }

    pub fn prop(&self, name: &str) -> Option<&PropValue> {
        self.base.props.get(name)
    }

    pub fn children(&self) -> &[VNode] {
        &self.base.children
    }

    pub fn state(&self) -> &Value {
        &self.base.state
    }

    pub fn handle(&self) -> WeakComponent {
        self.handle.clone()
    }
}

#[cfg(test)]
#[path = "tests/component_tests.rs"]
mod tests;
