//! Virtual node model: element, text and component variants.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::component::ComponentNode;
use crate::error::RenderError;
use crate::host::{Anchor, HostNodeId};
use crate::props::{classify_prop, PropTarget, PropValue, Props};
use crate::render::MountContext;

/// A host element description.
///
/// `children` keeps the raw child nodes, components included. The
/// materialized form of each child is computed once and cached in
/// `virtual_children`, positionally aligned with `children`.
#[derive(Debug)]
pub struct ElementNode {
    tag: String,
    props: Props,
    children: Vec<VNode>,
    virtual_children: RefCell<Option<Vec<VNode>>>,
    anchor: Cell<Option<Anchor>>,
    host_node: Cell<Option<HostNodeId>>,
}

impl ElementNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            props: Props::new(),
            children: Vec::new(),
            virtual_children: RefCell::new(None),
            anchor: Cell::new(None),
            host_node: Cell::new(None),
        }
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        self.props.insert(name, value);
    }

    pub fn append_child(&mut self, child: impl Into<VNode>) {
        self.children.push(child.into());
        self.virtual_children.get_mut().take();
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn children(&self) -> &[VNode] {
        &self.children
    }

    pub fn anchor(&self) -> Option<Anchor> {
        self.anchor.get()
    }

    /// Host element created for this node by its most recent mount, carried
    /// forward when a later tree patches it in place.
    pub fn host_node(&self) -> Option<HostNodeId> {
        self.host_node.get()
    }

    pub(crate) fn set_host_node(&self, node: Option<HostNodeId>) {
        self.host_node.set(node);
    }

    /// Materialized children, computed on first use and memoized.
    pub fn virtual_children(&self) -> Vec<VNode> {
        if let Some(cached) = self.virtual_children.borrow().as_ref() {
            return cached.clone();
        }
        let computed: Vec<VNode> = self.children.iter().map(VNode::materialize).collect();
        *self.virtual_children.borrow_mut() = Some(computed.clone());
        computed
    }

    fn mount(&self, ctx: &MountContext, anchor: Anchor) -> Result<(), RenderError> {
        self.anchor.set(Some(anchor));
        let host = ctx.host();
        let root = host.with(|host| host.create_element(&self.tag))?;
        self.host_node.set(Some(root));
        for (name, value) in self.props.iter() {
            match (classify_prop(name), value) {
                (PropTarget::Listener(event), PropValue::Handler(handler)) => {
                    host.with(|host| host.add_event_listener(root, &event, handler.clone()))?;
                }
                (PropTarget::Attribute(attribute), PropValue::Data(_)) => {
                    let text = value.attribute_text().unwrap_or_default();
                    host.with(|host| host.set_attribute(root, &attribute, &text))?;
                }
                (PropTarget::Listener(_), PropValue::Data(_)) => {
                    return Err(RenderError::InvalidProp {
                        name: name.to_owned(),
                        reason: "event props require a handler",
                    });
                }
                (PropTarget::Attribute(_), PropValue::Handler(_)) => {
                    return Err(RenderError::InvalidProp {
                        name: name.to_owned(),
                        reason: "handlers are only valid on `on*` props",
                    });
                }
            }
        }
        let virtual_children = self.virtual_children();
        for (raw, child) in self.children.iter().zip(&virtual_children) {
            let slot = host.with(|host| {
                let end = host.child_count(root)?;
                host.create_anchor(root, end, end)
            })?;
            mount_child(raw, child, ctx, slot)?;
        }
        host.with(|host| host.replace_contents(anchor, root))?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct TextNode {
    content: String,
    anchor: Cell<Option<Anchor>>,
}

impl TextNode {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            anchor: Cell::new(None),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn anchor(&self) -> Option<Anchor> {
        self.anchor.get()
    }

    fn mount(&self, ctx: &MountContext, anchor: Anchor) -> Result<(), RenderError> {
        self.anchor.set(Some(anchor));
        ctx.host().with(|host| {
            let node = host.create_text_node(&self.content)?;
            host.replace_contents(anchor, node)
        })?;
        Ok(())
    }
}

/// A node of the virtual tree. Cloning is cheap and shares the node.
#[derive(Clone)]
pub enum VNode {
    Element(Rc<ElementNode>),
    Text(Rc<TextNode>),
    Component(ComponentNode),
}

impl VNode {
    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text(Rc::new(TextNode::new(content)))
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            VNode::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            VNode::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_component(&self) -> Option<&ComponentNode> {
        match self {
            VNode::Component(component) => Some(component),
            _ => None,
        }
    }

    pub fn anchor(&self) -> Option<Anchor> {
        match self {
            VNode::Element(element) => element.anchor(),
            VNode::Text(text) => text.anchor(),
            VNode::Component(component) => component.anchor(),
        }
    }

    pub(crate) fn set_anchor(&self, anchor: Anchor) {
        match self {
            VNode::Element(element) => element.anchor.set(Some(anchor)),
            VNode::Text(text) => text.anchor.set(Some(anchor)),
            VNode::Component(component) => component.set_anchor(anchor),
        }
    }

    pub fn ptr_eq(&self, other: &VNode) -> bool {
        match (self, other) {
            (VNode::Element(a), VNode::Element(b)) => Rc::ptr_eq(a, b),
            (VNode::Text(a), VNode::Text(b)) => Rc::ptr_eq(a, b),
            (VNode::Component(a), VNode::Component(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Resolves the node to its canonical element/text form. Elements and
    /// text are their own canonical form; components render and materialize
    /// the result.
    pub fn materialize(&self) -> VNode {
        match self {
            VNode::Element(element) => {
                element.virtual_children();
                self.clone()
            }
            VNode::Text(_) => self.clone(),
            VNode::Component(component) => component.materialize(),
        }
    }

    /// Realizes the node into the host tree at `anchor`, replacing whatever
    /// the anchor currently spans.
    pub fn mount(&self, ctx: &MountContext, anchor: Anchor) -> Result<(), RenderError> {
        match self {
            VNode::Element(element) => element.mount(ctx, anchor),
            VNode::Text(text) => text.mount(ctx, anchor),
            VNode::Component(component) => {
                let tree = component.materialize();
                tree.mount(ctx, anchor)?;
                attach(self, &tree, ctx);
                Ok(())
            }
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            VNode::Element(element) => format!("<{}>", element.tag),
            VNode::Text(text) => format!("{:?}", text.content),
            VNode::Component(_) => "component".to_owned(),
        }
    }
}

impl fmt::Debug for VNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VNode::Element(element) => fmt::Debug::fmt(&**element, f),
            VNode::Text(text) => fmt::Debug::fmt(&**text, f),
            VNode::Component(component) => fmt::Debug::fmt(component, f),
        }
    }
}

impl From<ElementNode> for VNode {
    fn from(element: ElementNode) -> Self {
        VNode::Element(Rc::new(element))
    }
}

impl From<TextNode> for VNode {
    fn from(text: TextNode) -> Self {
        VNode::Text(Rc::new(text))
    }
}

impl From<ComponentNode> for VNode {
    fn from(component: ComponentNode) -> Self {
        VNode::Component(component)
    }
}

/// Mounts the materialized `tree` of a raw child and attaches any component
/// the raw child resolves through.
pub(crate) fn mount_child(
    raw: &VNode,
    tree: &VNode,
    ctx: &MountContext,
    anchor: Anchor,
) -> Result<(), RenderError> {
    tree.mount(ctx, anchor)?;
    attach(raw, tree, ctx);
    Ok(())
}

/// Records `tree` as the mounted output of every component in the render
/// chain starting at `raw`.
pub(crate) fn attach(raw: &VNode, tree: &VNode, ctx: &MountContext) {
    let mut current = raw.clone();
    while let VNode::Component(component) = current {
        let next = component.rendered();
        let child = next.as_ref().and_then(VNode::as_component).cloned();
        component.attach(tree.clone(), ctx.clone(), child);
        match next {
            Some(next) => current = next,
            None => break,
        }
    }
}

#[cfg(test)]
#[path = "tests/vnode_tests.rs"]
mod tests;
