use crate::error::{HostError, RenderError};
use crate::host::{HostHandle, HostNodeId};
use crate::reconcile::ReconcileOptions;
use crate::vnode::VNode;

/// Injected host adapter plus reconcile configuration. Mounted components
/// keep a clone for their later updates.
#[derive(Debug, Clone)]
pub struct MountContext {
    host: HostHandle,
    options: ReconcileOptions,
}

impl MountContext {
    pub fn new(host: HostHandle) -> Self {
        Self::with_options(host, ReconcileOptions::default())
    }

    pub fn with_options(host: HostHandle, options: ReconcileOptions) -> Self {
        Self { host, options }
    }

    pub fn host(&self) -> &HostHandle {
        &self.host
    }

    pub fn options(&self) -> ReconcileOptions {
        self.options
    }
}

/// Mounts `vnode` into `container`, replacing its current contents.
pub fn render(vnode: &VNode, container: HostNodeId, ctx: &MountContext) -> Result<(), RenderError> {
    let anchor = ctx.host().with(|host| {
        let end = host.child_count(container)?;
        let anchor = host.create_anchor(container, 0, end)?;
        host.delete_contents(anchor)?;
        Ok::<_, HostError>(anchor)
    })?;
    log::debug!("rendering {} into host node {container}", vnode.describe());
    vnode.mount(ctx, anchor)
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
