//! Diff/patch of a mounted virtual tree against a freshly materialized one.

use crate::error::RenderError;
use crate::host::Anchor;
use crate::render::MountContext;
use crate::vnode::{attach, mount_child, ElementNode, VNode};

/// What happens to trailing host nodes when a list of children shrinks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShrinkPolicy {
    /// Delete the contents of every stale child's anchor.
    #[default]
    Remove,
    /// Leave stale host nodes mounted.
    Retain,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    pub shrink: ShrinkPolicy,
}

/// Whether the host node mounted for `old` can be kept for `new`.
///
/// Same kind, same tag, every prop of `new` identical in `old`, and `old`
/// carrying no more props than `new`. Text nodes must match content.
/// Children are not inspected; they are reconciled on their own.
pub fn same_node(old: &VNode, new: &VNode) -> bool {
    match (old, new) {
        (VNode::Element(old), VNode::Element(new)) => {
            if old.tag() != new.tag() {
                return false;
            }
            let props_match = new
                .props()
                .iter()
                .all(|(name, value)| old.props().get(name) == Some(value));
            props_match && old.props().len() <= new.props().len()
        }
        (VNode::Text(old), VNode::Text(new)) => old.content() == new.content(),
        _ => false,
    }
}

/// Brings the host tree mounted for `old` in line with `new`.
///
/// Both trees must be materialized and `old` must be mounted. `new` either
/// takes over `old`'s anchor and host node, or is mounted fresh at that
/// anchor.
pub fn reconcile(ctx: &MountContext, old: &VNode, new: &VNode) -> Result<(), RenderError> {
    let anchor = old.anchor().ok_or(RenderError::NotMounted)?;
    if !same_node(old, new) {
        log::debug!("replacing {} with {}", old.describe(), new.describe());
        return new.mount(ctx, anchor);
    }
    log::trace!("patching {} in place", new.describe());
    new.set_anchor(anchor);
    match (old, new) {
        (VNode::Element(old), VNode::Element(new)) => {
            new.set_host_node(old.host_node());
            reconcile_children(ctx, old, new)
        }
        _ => Ok(()),
    }
}

fn reconcile_children(
    ctx: &MountContext,
    old: &ElementNode,
    new: &ElementNode,
) -> Result<(), RenderError> {
    let old_children = baseline_children(old);
    let new_children = new.virtual_children();
    let raw_children = new.children();
    let shared = old_children.len().min(new_children.len());

    for index in 0..shared {
        reconcile(ctx, &old_children[index], &new_children[index])?;
        attach(&raw_children[index], &new_children[index], ctx);
    }

    if new_children.len() > shared {
        log::debug!(
            "<{}> grew from {} to {} children",
            new.tag(),
            old_children.len(),
            new_children.len()
        );
        let start = tail_anchor(ctx, &old_children, new)?;
        let mut tail = start;
        for index in shared..new_children.len() {
            let slot = ctx.host().with(|host| host.anchor_after(tail))?;
            mount_child(&raw_children[index], &new_children[index], ctx, slot)?;
            tail = slot;
        }
        if old_children.is_empty() {
            ctx.host().with(|host| host.release_anchor(start))?;
        }
    } else if old_children.len() > shared {
        match ctx.options().shrink {
            ShrinkPolicy::Remove => {
                log::debug!(
                    "<{}> shrank from {} to {} children; removing stale nodes",
                    new.tag(),
                    old_children.len(),
                    new_children.len()
                );
                for stale in &old_children[shared..] {
                    if let Some(anchor) = stale.anchor() {
                        ctx.host().with(|host| {
                            host.delete_contents(anchor)?;
                            host.release_anchor(anchor)
                        })?;
                    }
                }
            }
            ShrinkPolicy::Retain => {
                log::debug!(
                    "<{}> shrank from {} to {} children; stale nodes retained",
                    new.tag(),
                    old_children.len(),
                    new_children.len()
                );
            }
        }
    }
    Ok(())
}

/// Materialized children of a mounted element as they are on screen now. A
/// component child that updated itself since the element was mounted
/// contributes its own latest tree.
fn baseline_children(element: &ElementNode) -> Vec<VNode> {
    let mut children = element.virtual_children();
    for (slot, raw) in children.iter_mut().zip(element.children()) {
        if let VNode::Component(component) = raw {
            if let Some(current) = component.last_materialized() {
                *slot = current;
            }
        }
    }
    children
}

/// Anchor new children are appended after: the last old child's anchor, or
/// a fresh zero-width anchor at the start of the element when it had no
/// children before. The caller releases the fresh one.
fn tail_anchor(
    ctx: &MountContext,
    old_children: &[VNode],
    element: &ElementNode,
) -> Result<Anchor, RenderError> {
    if let Some(last) = old_children.last() {
        return last.anchor().ok_or(RenderError::NotMounted);
    }
    let host_node = element.host_node().ok_or(RenderError::NotMounted)?;
    Ok(ctx.host().with(|host| host.create_anchor(host_node, 0, 0))?)
}

#[cfg(test)]
#[path = "tests/reconcile_tests.rs"]
mod tests;
