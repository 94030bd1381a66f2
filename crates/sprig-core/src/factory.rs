//! Node factory: the call target of templated markup.

use std::fmt;

use crate::component::{Component, ComponentNode};
use crate::props::Props;
use crate::vnode::{ElementNode, TextNode, VNode};

/// What `create_node` should build.
#[derive(Clone)]
pub enum NodeType {
    Tag(String),
    Component(fn() -> Box<dyn Component>),
}

fn construct<C: Component + Default>() -> Box<dyn Component> {
    Box::new(C::default())
}

impl NodeType {
    pub fn component<C: Component + Default>() -> Self {
        NodeType::Component(construct::<C>)
    }
}

impl From<&str> for NodeType {
    fn from(tag: &str) -> Self {
        NodeType::Tag(tag.to_owned())
    }
}

impl From<String> for NodeType {
    fn from(tag: String) -> Self {
        NodeType::Tag(tag)
    }
}

impl fmt::Debug for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Tag(tag) => f.debug_tuple("Tag").field(tag).finish(),
            NodeType::Component(_) => f.write_str("Component"),
        }
    }
}

/// A child argument before flattening.
#[derive(Debug, Clone)]
pub enum Child {
    Node(VNode),
    Text(String),
    List(Vec<Child>),
    Empty,
}

impl From<VNode> for Child {
    fn from(node: VNode) -> Self {
        Child::Node(node)
    }
}

impl From<ElementNode> for Child {
    fn from(element: ElementNode) -> Self {
        Child::Node(element.into())
    }
}

impl From<TextNode> for Child {
    fn from(text: TextNode) -> Self {
        Child::Node(text.into())
    }
}

impl From<ComponentNode> for Child {
    fn from(component: ComponentNode) -> Self {
        Child::Node(component.into())
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Child::Text(text.to_owned())
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Child::Text(text)
    }
}

impl<T: Into<Child>> From<Vec<T>> for Child {
    fn from(items: Vec<T>) -> Self {
        Child::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Child>> From<Option<T>> for Child {
    fn from(item: Option<T>) -> Self {
        item.map_or(Child::Empty, Into::into)
    }
}

/// Builds a list of [`Child`] values from mixed expressions.
#[macro_export]
macro_rules! children {
    ($($child:expr),* $(,)?) => {
        ::std::vec![$($crate::Child::from($child)),*]
    };
}

fn flatten(children: impl IntoIterator<Item = Child>, out: &mut Vec<VNode>) {
    for child in children {
        match child {
            Child::Node(node) => out.push(node),
            Child::Text(text) => out.push(VNode::text(text)),
            Child::List(items) => flatten(items, out),
            Child::Empty => {}
        }
    }
}

/// Builds an unmounted node. Tags become elements; component types are
/// constructed without arguments. Props are applied in order, children are
/// flattened left to right with text wrapped and empty entries dropped.
pub fn create_node(
    node_type: impl Into<NodeType>,
    props: Props,
    children: impl IntoIterator<Item = Child>,
) -> VNode {
    let mut flat = Vec::new();
    flatten(children, &mut flat);
    match node_type.into() {
        NodeType::Tag(tag) => {
            let mut element = ElementNode::new(tag);
            for (name, value) in props {
                element.set_attribute(name, value);
            }
            for child in flat {
                element.append_child(child);
            }
            element.into()
        }
        NodeType::Component(construct) => {
            let component = ComponentNode::from_boxed(construct());
            for (name, value) in props {
                component.set_attribute(name, value);
            }
            for child in flat {
                component.append_child(child);
            }
            component.into()
        }
    }
}

/// Shorthand for an element with no components involved.
pub fn element(
    tag: impl Into<String>,
    props: Props,
    children: impl IntoIterator<Item = Child>,
) -> VNode {
    create_node(NodeType::Tag(tag.into()), props, children)
}

#[cfg(test)]
#[path = "tests/factory_tests.rs"]
mod tests;
