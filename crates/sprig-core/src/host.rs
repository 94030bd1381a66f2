//! The host tree adapter boundary.
//!
//! The core never touches a concrete rendering surface. Every mutation goes
//! through a [`HostTree`] that the caller injects as a [`HostHandle`], which
//! keeps test doubles and real backends interchangeable.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{HostError, RenderError};

pub type HostNodeId = usize;

/// Opaque handle to a live range inside the host tree.
///
/// The adapter owns the range bounds; the core only stores and passes the
/// handle around. A mounted node owns exactly one anchor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Anchor(usize);

impl Anchor {
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> usize {
        self.0
    }
}

/// Event delivered to a listener registered through an `on*` prop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEvent {
    pub name: String,
    pub target: HostNodeId,
}

type HandlerFn = dyn Fn(&HostEvent) -> Result<(), RenderError>;

/// Shared event callback. Two handlers are the same prop value only when they
/// point at the same closure.
#[derive(Clone)]
pub struct EventHandler {
    inner: Rc<HandlerFn>,
}

impl EventHandler {
    pub fn new(handler: impl Fn(&HostEvent) -> Result<(), RenderError> + 'static) -> Self {
        Self {
            inner: Rc::new(handler),
        }
    }

    pub fn call(&self, event: &HostEvent) -> Result<(), RenderError> {
        (self.inner)(event)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandler")
            .field("ptr", &Rc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}

/// Capability set the reconciler needs from a concrete host tree.
///
/// Anchors behave like live ranges: when a node is inserted into or removed
/// from a container, every anchor boundary in that container whose offset is
/// strictly greater than the mutation index shifts with it.
pub trait HostTree {
    fn create_element(&mut self, tag: &str) -> Result<HostNodeId, HostError>;
    fn create_text_node(&mut self, text: &str) -> Result<HostNodeId, HostError>;
    fn set_attribute(&mut self, node: HostNodeId, name: &str, value: &str)
        -> Result<(), HostError>;
    fn add_event_listener(
        &mut self,
        node: HostNodeId,
        event: &str,
        handler: EventHandler,
    ) -> Result<(), HostError>;
    fn child_count(&self, container: HostNodeId) -> Result<usize, HostError>;

    fn create_anchor(
        &mut self,
        container: HostNodeId,
        start: usize,
        end: usize,
    ) -> Result<Anchor, HostError>;
    /// Zero-width anchor positioned at the end of `anchor`.
    fn anchor_after(&mut self, anchor: Anchor) -> Result<Anchor, HostError>;
    /// Inserts `node` at the anchor start, deletes what the anchor previously
    /// spanned and re-spans the anchor around `node`.
    fn replace_contents(&mut self, anchor: Anchor, node: HostNodeId) -> Result<(), HostError>;
    /// Removes everything the anchor spans and collapses it.
    fn delete_contents(&mut self, anchor: Anchor) -> Result<(), HostError>;
    /// Stops tracking `anchor`. Anchors inside nodes that replace or delete
    /// discards are released by the host itself.
    fn release_anchor(&mut self, anchor: Anchor) -> Result<(), HostError>;
}

/// Injected, shared access to the host tree.
///
/// Each call borrows the adapter only for the duration of one operation, so
/// handlers dispatched by the host after it released its borrow may re-enter
/// through `set_state`.
#[derive(Clone)]
pub struct HostHandle {
    inner: Rc<RefCell<dyn HostTree>>,
}

impl HostHandle {
    pub fn new<H: HostTree + 'static>(host: H) -> Self {
        Self {
            inner: Rc::new(RefCell::new(host)),
        }
    }

    pub fn from_shared<H: HostTree + 'static>(host: Rc<RefCell<H>>) -> Self {
        Self { inner: host }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut dyn HostTree) -> R) -> R {
        let mut host = self.inner.borrow_mut();
        f(&mut *host)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for HostHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostHandle").finish_non_exhaustive()
    }
}
