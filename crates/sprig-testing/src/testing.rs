use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use sprig_core::{
    render, HostEvent, HostHandle, HostNodeId, HostTree, MemoryHost, MountContext, Mutation,
    ReconcileOptions, RenderError, VNode,
};

/// Headless harness for rendering Sprig trees in tests.
///
/// `SprigTestRule` owns an in-memory host with a root container element and
/// exposes helpers for mounting content, dispatching events the way a real
/// host would, and inspecting the resulting host tree.
pub struct SprigTestRule {
    host: Rc<RefCell<MemoryHost>>,
    ctx: MountContext,
    container: HostNodeId,
    content: Option<VNode>,
}

impl SprigTestRule {
    /// Create a new test rule with default reconcile options.
    pub fn new() -> Self {
        Self::with_options(ReconcileOptions::default())
    }

    pub fn with_options(options: ReconcileOptions) -> Self {
        let host = Rc::new(RefCell::new(MemoryHost::new()));
        let container = host
            .borrow_mut()
            .create_element("body")
            .expect("fresh memory host accepts a root element");
        let ctx = MountContext::with_options(HostHandle::from_shared(Rc::clone(&host)), options);
        Self {
            host,
            ctx,
            container,
            content: None,
        }
    }

    /// Mount `content` into the root container, replacing anything rendered
    /// before.
    pub fn set_content(&mut self, content: impl Into<VNode>) -> Result<(), RenderError> {
        let content = content.into();
        render(&content, self.container, &self.ctx)?;
        self.content = Some(content);
        Ok(())
    }

    /// Returns whether content has been mounted through this rule.
    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    /// The node last passed to [`set_content`](Self::set_content).
    pub fn content(&self) -> Option<&VNode> {
        self.content.as_ref()
    }

    pub fn container(&self) -> HostNodeId {
        self.container
    }

    pub fn context(&self) -> &MountContext {
        &self.ctx
    }

    /// Read access to the in-memory host for assertions.
    pub fn host(&self) -> Ref<'_, MemoryHost> {
        self.host.borrow()
    }

    pub fn host_mut(&self) -> RefMut<'_, MemoryHost> {
        self.host.borrow_mut()
    }

    /// Markup of everything inside the root container.
    pub fn markup(&self) -> String {
        self.host.borrow().inner_markup(self.container)
    }

    /// Elements with `tag` under the root container, in document order.
    pub fn find_all(&self, tag: &str) -> Vec<HostNodeId> {
        self.host.borrow().find_all(self.container, tag)
    }

    /// The `index`-th element with `tag`, if any.
    pub fn find(&self, tag: &str, index: usize) -> Option<HostNodeId> {
        self.find_all(tag).get(index).copied()
    }

    pub fn text_of(&self, node: HostNodeId) -> String {
        let host = self.host.borrow();
        let mut text = String::new();
        collect_text(&host, node, &mut text);
        text
    }

    /// Invoke every listener registered for `event` on `node`.
    ///
    /// Listeners are collected before any of them runs, so handlers are free
    /// to update components and mutate the host.
    pub fn dispatch(&self, node: HostNodeId, event: &str) -> Result<usize, RenderError> {
        let handlers = self.host.borrow().listeners(node, event);
        let host_event = HostEvent {
            name: event.to_owned(),
            target: node,
        };
        for handler in &handlers {
            handler.call(&host_event)?;
        }
        Ok(handlers.len())
    }

    pub fn click(&self, node: HostNodeId) -> Result<usize, RenderError> {
        self.dispatch(node, "click")
    }

    /// Drain the recorded host mutations.
    pub fn take_mutations(&self) -> Vec<Mutation> {
        self.host.borrow_mut().take_mutations()
    }
}

impl Default for SprigTestRule {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_text(host: &MemoryHost, node: HostNodeId, out: &mut String) {
    if let Some(text) = host.text(node) {
        out.push_str(text);
        return;
    }
    for &child in host.children(node) {
        collect_text(host, child, out);
    }
}

/// Convenience helper for tests that only need temporary access to a
/// `SprigTestRule`.
pub fn run_test_render<R>(f: impl FnOnce(&mut SprigTestRule) -> R) -> R {
    let mut rule = SprigTestRule::new();
    f(&mut rule)
}
