use serde_json::json;
use sprig_core::{
    children, create_node, element, Component, ComponentBase, NodeType, Props, RenderScope, VNode,
};
use sprig_testing::SprigTestRule;

const CLICKS: usize = 3;

#[derive(Default)]
struct Counter;

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

fn main() {
    env_logger::init();

    println!("=== Sprig Counter Example ===");
    println!("Rendering into an in-memory host and clicking `add` {CLICKS} times.");
    println!("Run with RUST_LOG=debug to watch the reconciler.");
    println!();

    let mut rule = SprigTestRule::new();
    let counter = create_node(NodeType::component::<Counter>(), Props::new(), Vec::new());
    if let Err(err) = rule.set_content(counter) {
        log::error!("initial render failed: {err}");
        return;
    }
    println!("initial: {}", rule.markup());
    rule.take_mutations();

    for click in 1..=CLICKS {
        let Some(button) = rule.find("button", 0) else {
            log::error!("no button mounted");
            return;
        };
        if let Err(err) = rule.click(button) {
            log::error!("click {click} failed: {err}");
            return;
        }
        let mutations = rule.take_mutations();
        println!("click {click}: {} ({} host mutations)", rule.markup(), mutations.len());
    }
}
