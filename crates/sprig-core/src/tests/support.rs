use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{json, Value};

use crate::{
    children, element, Component, ComponentBase, HostEvent, HostHandle, HostNodeId, HostTree,
    MemoryHost, MountContext, Props, ReconcileOptions, RenderError, RenderScope, VNode,
};

pub(crate) struct Fixture {
    pub host: Rc<RefCell<MemoryHost>>,
    pub ctx: MountContext,
    pub container: HostNodeId,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_options(ReconcileOptions::default())
    }

    pub fn with_options(options: ReconcileOptions) -> Self {
        let host = Rc::new(RefCell::new(MemoryHost::new()));
        let container = host
            .borrow_mut()
            .create_element("main")
            .expect("container element");
        let ctx = MountContext::with_options(HostHandle::from_shared(host.clone()), options);
        Self {
            host,
            ctx,
            container,
        }
    }

    pub fn markup(&self) -> String {
        self.host.borrow().inner_markup(self.container)
    }

    pub fn find(&self, tag: &str) -> Vec<HostNodeId> {
        self.host.borrow().find_all(self.container, tag)
    }

    pub fn dispatch(&self, node: HostNodeId, event: &str) -> Result<(), RenderError> {
        let handlers = self.host.borrow().listeners(node, event);
        let event = HostEvent {
            name: event.to_owned(),
            target: node,
        };
        for handler in handlers {
            handler.call(&event)?;
        }
        Ok(())
    }
}

/// The reference counter: `{a: 1, b: 2}`, a heading, an add button and two
/// spans.
#[derive(Default)]
pub(crate) struct Counter;

impl Component for Counter {
    fn init(&self, base: &mut ComponentBase) {
        base.replace_state(json!({ "a": 1, "b": 2 }));
    }

    fn render(&self, scope: &RenderScope<'_>) -> VNode {
        let this = scope.handle();
        let a = scope.state()["a"].as_i64().unwrap_or_default();
        let b = scope.state()["b"].as_i64().unwrap_or_default();
        element(
            "div",
            Props::new(),
            children![
                element("h1", Props::new(), children!["my component"]),
                element(
                    "button",
                    Props::new().on("onclick", move |_| this.set_state(json!({ "a": a + 1 }))),
                    children!["add"],
                ),
                element("span", Props::new(), children![a.to_string()]),
                element("span", Props::new(), children![b.to_string()]),
            ],
        )
    }
}

/// Renders whatever `state.view` describes: `{tag, class, items, count}`.
/// Handler-free, so identical state yields same-node trees.
#[derive(Default)]
pub(crate) struct Listing;

impl Component for Listing {
    fn init(&self, base: &mut ComponentBase) {
        base.replace_state(json!({ "tag": "ul", "count": 2 }));
    }

    fn render(&self, scope: &RenderScope<'_>) -> VNode {
        let state = scope.state();
        let tag = state["tag"].as_str().unwrap_or("ul").to_owned();
        let count = state["count"].as_u64().unwrap_or_default();
        let mut props = Props::new();
        if let Some(class) = state.get("class").and_then(Value::as_str) {
            props.insert("className", class);
        }
        let items: Vec<VNode> = (0..count)
            .map(|index| element("li", Props::new(), children![format!("item {index}")]))
            .collect();
        element(tag, props, children![items])
    }
}
