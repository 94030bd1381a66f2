use super::*;
use crate::test_support::{Counter, Fixture};
use crate::{children, element, ComponentNode, HostTree, MemoryHost, Props, ShrinkPolicy};

#[test]
fn render_replaces_existing_container_contents() {
    let fixture = Fixture::new();
    {
        let mut host = fixture.host.borrow_mut();
        for index in 0..3 {
            let stale = host.create_text_node(&format!("stale {index}")).expect("text");
            let anchor = host.create_anchor(fixture.container, index, index).expect("anchor");
            host.replace_contents(anchor, stale).expect("insert");
        }
    }
    assert_eq!(fixture.markup(), "stale 0stale 1stale 2");

    let tree = element("p", Props::new(), children!["fresh"]);
    render(&tree, fixture.container, &fixture.ctx).expect("render");
    assert_eq!(fixture.markup(), "<p>fresh</p>");
}

#[test]
fn render_twice_keeps_only_the_latest_tree() {
    let fixture = Fixture::new();
    render(&VNode::text("one"), fixture.container, &fixture.ctx).expect("render");
    render(&VNode::text("two"), fixture.container, &fixture.ctx).expect("render");
    assert_eq!(fixture.markup(), "two");
}

#[test]
fn render_mounts_components() {
    let fixture = Fixture::new();
    let counter = ComponentNode::new::<Counter>();
    render(&counter.clone().into(), fixture.container, &fixture.ctx).expect("render");
    assert!(counter.is_mounted());
    assert!(fixture.markup().starts_with("<div><h1>my component</h1>"));
}

#[test]
fn render_into_a_text_node_fails() {
    let fixture = Fixture::new();
    let text = fixture.host.borrow_mut().create_text_node("leaf").expect("text");
    let err = render(&VNode::text("x"), text, &fixture.ctx).expect_err("must fail");
    assert_eq!(err, RenderError::Host(HostError::NotAContainer { id: text }));
}

#[test]
fn context_carries_options_and_host() {
    let host = HostHandle::new(MemoryHost::new());
    let ctx = MountContext::with_options(
        host.clone(),
        ReconcileOptions {
            shrink: ShrinkPolicy::Retain,
        },
    );
    assert_eq!(ctx.options().shrink, ShrinkPolicy::Retain);
    assert!(ctx.host().ptr_eq(&host));
    assert_eq!(
        MountContext::new(host).options(),
        ReconcileOptions::default()
    );
}
