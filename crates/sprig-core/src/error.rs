use thiserror::Error;

use crate::host::{Anchor, HostNodeId};

/// Failures reported by a [`HostTree`](crate::HostTree) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("host node {id} missing")]
    MissingNode { id: HostNodeId },
    #[error("anchor {anchor:?} missing")]
    MissingAnchor { anchor: Anchor },
    #[error("invalid tag name {tag:?}")]
    InvalidTag { tag: String },
    #[error("host node {id} cannot hold children")]
    NotAContainer { id: HostNodeId },
    #[error("host node {id} is not an element")]
    NotAnElement { id: HostNodeId },
    #[error("anchor bounds {start}..{end} out of range for container {container} with {len} children")]
    AnchorOutOfBounds {
        container: HostNodeId,
        start: usize,
        end: usize,
        len: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("component updated before it was mounted")]
    NotMounted,
    #[error("component was dropped")]
    ComponentDropped,
    #[error("component state changed while it was rendering")]
    UpdateDuringRender,
    #[error("invalid prop {name:?}: {reason}")]
    InvalidProp { name: String, reason: &'static str },
}
