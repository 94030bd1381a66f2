#![doc = r"Core of the Sprig UI library: virtual nodes, stateful components and the reconciler that keeps an injected host tree in sync with them."]

mod collections;
pub mod component;
pub mod error;
pub mod factory;
pub mod host;
pub mod memory_host;
pub mod props;
pub mod reconcile;
pub mod render;
pub mod state;
pub mod vnode;

pub use component::{Component, ComponentBase, ComponentNode, RenderScope, WeakComponent};
pub use error::{HostError, RenderError};
pub use factory::{create_node, element, Child, NodeType};
pub use host::{Anchor, EventHandler, HostEvent, HostHandle, HostNodeId, HostTree};
pub use memory_host::{AnchorRange, MemoryHost, Mutation};
pub use props::{classify_prop, PropTarget, PropValue, Props};
pub use reconcile::{reconcile, same_node, ReconcileOptions, ShrinkPolicy};
pub use render::{render, MountContext};
pub use state::merge_state;
pub use vnode::{ElementNode, TextNode, VNode};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
