use super::*;
use crate::test_support::{Fixture, Listing};
use crate::{children, element, render, ComponentNode, EventHandler, HostTree, Mutation, Props};
use serde_json::json;

fn mounted_listing(fixture: &Fixture) -> ComponentNode {
    let listing = ComponentNode::new::<Listing>();
    render(&listing.clone().into(), fixture.container, &fixture.ctx).expect("render");
    fixture.host.borrow_mut().take_mutations();
    listing
}

#[test]
fn same_node_compares_tag_and_props() {
    let plain = element("div", Props::new(), Vec::new());
    let with_id = element("div", Props::new().with("id", "a"), Vec::new());
    let other_id = element("div", Props::new().with("id", "b"), Vec::new());
    let span = element("span", Props::new(), Vec::new());

    assert!(same_node(&plain, &element("div", Props::new(), Vec::new())));
    assert!(same_node(&with_id, &element("div", Props::new().with("id", "a"), Vec::new())));
    assert!(!same_node(&plain, &span));
    assert!(!same_node(&with_id, &other_id));
    // A prop only the old node carries.
    assert!(!same_node(&with_id, &plain));
    // A prop only the new node carries.
    assert!(!same_node(&plain, &with_id));
}

#[test]
fn same_node_ignores_children() {
    let empty = element("ul", Props::new(), Vec::new());
    let full = element("ul", Props::new(), children![element("li", Props::new(), Vec::new())]);
    assert!(same_node(&empty, &full));
}

#[test]
fn same_node_compares_handlers_by_identity() {
    let handler = EventHandler::new(|_| Ok(()));
    let a = element("button", Props::new().with("onclick", handler.clone()), Vec::new());
    let b = element("button", Props::new().with("onclick", handler), Vec::new());
    let c = element("button", Props::new().on("onclick", |_| Ok(())), Vec::new());
    assert!(same_node(&a, &b));
    assert!(!same_node(&a, &c));
}

#[test]
fn same_node_for_text_and_mixed_kinds() {
    assert!(same_node(&VNode::text("a"), &VNode::text("a")));
    assert!(!same_node(&VNode::text("a"), &VNode::text("b")));
    assert!(!same_node(&VNode::text("div"), &element("div", Props::new(), Vec::new())));
}

#[test]
fn unmounted_old_tree_is_rejected() {
    let fixture = Fixture::new();
    let old = VNode::text("a");
    assert_eq!(
        reconcile(&fixture.ctx, &old, &VNode::text("b")),
        Err(RenderError::NotMounted)
    );
}

#[test]
fn identical_update_touches_nothing() {
    let fixture = Fixture::new();
    let listing = mounted_listing(&fixture);
    listing.set_state(json!({})).expect("set_state");
    assert!(fixture.host.borrow_mut().take_mutations().is_empty());
    assert_eq!(fixture.markup(), "<ul><li>item 0</li><li>item 1</li></ul>");
}

#[test]
fn tag_change_replaces_the_subtree() {
    let fixture = Fixture::new();
    let listing = mounted_listing(&fixture);
    let ul = fixture.find("ul")[0];

    listing.set_state(json!({ "tag": "ol" })).expect("set_state");

    assert_eq!(fixture.markup(), "<ol><li>item 0</li><li>item 1</li></ol>");
    assert!(fixture.find("ul").is_empty());
    assert_eq!(fixture.host.borrow().parent(ul), None);
}

#[test]
fn prop_change_replaces_the_element() {
    let fixture = Fixture::new();
    let listing = mounted_listing(&fixture);
    let ul = fixture.find("ul")[0];

    listing.set_state(json!({ "class": "big" })).expect("set_state");

    assert_eq!(
        fixture.markup(),
        "<ul class=\"big\"><li>item 0</li><li>item 1</li></ul>"
    );
    assert_ne!(fixture.find("ul")[0], ul);
}

#[test]
fn growth_appends_after_the_last_child() {
    let fixture = Fixture::new();
    let listing = mounted_listing(&fixture);
    let items = fixture.find("li");

    listing.set_state(json!({ "count": 4 })).expect("set_state");

    assert_eq!(
        fixture.markup(),
        "<ul><li>item 0</li><li>item 1</li><li>item 2</li><li>item 3</li></ul>"
    );
    let grown = fixture.find("li");
    assert_eq!(&grown[..2], &items[..]);
    let created = fixture
        .host
        .borrow_mut()
        .take_mutations()
        .into_iter()
        .filter(|mutation| matches!(mutation, Mutation::CreateElement { .. }))
        .count();
    assert_eq!(created, 2);
}

#[test]
fn growth_from_no_children() {
    let fixture = Fixture::new();
    let listing = mounted_listing(&fixture);
    listing.set_state(json!({ "count": 0 })).expect("shrink");
    assert_eq!(fixture.markup(), "<ul></ul>");

    listing.set_state(json!({ "count": 2 })).expect("grow");
    assert_eq!(fixture.markup(), "<ul><li>item 0</li><li>item 1</li></ul>");

    listing.set_state(json!({ "count": 3 })).expect("grow again");
    assert_eq!(fixture.find("li").len(), 3);
}

#[test]
fn shrink_removes_stale_children_by_default() {
    let fixture = Fixture::new();
    let listing = mounted_listing(&fixture);
    let first = fixture.find("li")[0];

    listing.set_state(json!({ "count": 1 })).expect("set_state");

    assert_eq!(fixture.markup(), "<ul><li>item 0</li></ul>");
    assert_eq!(fixture.find("li"), vec![first]);
}

#[test]
fn shrink_can_retain_stale_children() {
    let fixture = Fixture::with_options(ReconcileOptions {
        shrink: ShrinkPolicy::Retain,
    });
    let listing = mounted_listing(&fixture);

    listing.set_state(json!({ "count": 1 })).expect("set_state");

    assert_eq!(fixture.markup(), "<ul><li>item 0</li><li>item 1</li></ul>");
    assert!(fixture.host.borrow_mut().take_mutations().is_empty());
}

#[test]
fn changed_text_is_replaced_inside_a_kept_element() {
    let fixture = Fixture::new();
    let old = element("p", Props::new(), children!["before"]);
    render(&old, fixture.container, &fixture.ctx).expect("render");
    let paragraph = fixture.find("p")[0];

    let new = element("p", Props::new(), children!["after"]);
    reconcile(&fixture.ctx, &old, &new).expect("reconcile");

    assert_eq!(fixture.markup(), "<p>after</p>");
    assert_eq!(fixture.find("p"), vec![paragraph]);
    assert_eq!(new.as_element().and_then(|p| p.host_node()), Some(paragraph));
    assert_eq!(new.anchor(), old.anchor());
}

#[test]
fn replacing_a_middle_child_keeps_sibling_anchors() {
    let fixture = Fixture::new();
    let build = |middle: &str| {
        element(
            "div",
            Props::new(),
            children![
                element("i", Props::new(), children!["a"]),
                element(middle, Props::new(), children!["b"]),
                element("i", Props::new(), children!["c"]),
            ],
        )
    };
    let first = build("b");
    render(&first, fixture.container, &fixture.ctx).expect("render");
    let second = build("u");
    reconcile(&fixture.ctx, &first, &second).expect("reconcile");
    assert_eq!(fixture.markup(), "<div><i>a</i><u>b</u><i>c</i></div>");

    let third = build("s");
    reconcile(&fixture.ctx, &second, &third).expect("reconcile");
    assert_eq!(fixture.markup(), "<div><i>a</i><s>b</s><i>c</i></div>");

    let host = fixture.host.borrow();
    let div = fixture.find("div")[0];
    assert_eq!(host.child_count(div), Ok(3));
}

#[test]
fn resizing_lists_does_not_accumulate_anchors() {
    let fixture = Fixture::new();
    let listing = mounted_listing(&fixture);
    let before = fixture.host.borrow().anchor_count();

    for _ in 0..20 {
        listing.set_state(json!({ "count": 0 })).expect("shrink");
        listing.set_state(json!({ "count": 5 })).expect("grow");
        listing.set_state(json!({ "count": 2 })).expect("shrink");
    }

    assert_eq!(fixture.markup(), "<ul><li>item 0</li><li>item 1</li></ul>");
    assert_eq!(fixture.host.borrow().anchor_count(), before);
}
