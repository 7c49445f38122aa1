use std::cell::Cell;
use std::rc::Rc;

use crate::patch::commit_props;
use crate::{EventHandler, HostBackend, MemoryHost, Props};

fn element(host: &mut MemoryHost) -> usize {
    host.create_element("div")
}

#[test]
fn stale_attributes_are_removed_and_new_ones_set() {
    let mut host = MemoryHost::new();
    let node = element(&mut host);

    let first = Props::new().attr("id", "a").attr("class", "x");
    commit_props(&mut host, node, &first, None);
    assert_eq!(host.attribute(node, "class"), Some("x"));

    let second = Props::new().attr("id", "b").attr("title", "t");
    commit_props(&mut host, node, &second, Some(&first));
    assert_eq!(host.attribute(node, "id"), Some("b"));
    assert_eq!(host.attribute(node, "class"), None);
    assert_eq!(host.attribute(node, "title"), Some("t"));
}

#[test]
fn unchanged_attributes_survive_the_removal_pass() {
    let mut host = MemoryHost::new();
    let node = element(&mut host);

    let first = Props::new().attr("id", "same");
    commit_props(&mut host, node, &first, None);
    let second = Props::new().attr("id", "same");
    commit_props(&mut host, node, &second, Some(&first));
    assert_eq!(host.attribute(node, "id"), Some("same"));
}

#[test]
fn style_maps_diff_property_by_property() {
    let mut host = MemoryHost::new();
    let node = element(&mut host);

    let first = Props::new()
        .style_prop("color", "red")
        .style_prop("margin", "4px");
    commit_props(&mut host, node, &first, None);
    assert_eq!(host.style_value(node, "margin"), Some("4px"));

    let second = Props::new().style_prop("color", "blue");
    commit_props(&mut host, node, &second, Some(&first));
    assert_eq!(host.style_value(node, "color"), Some("blue"));
    assert_eq!(host.style_value(node, "margin"), None);
}

#[test]
fn dropping_the_style_prop_clears_every_property() {
    let mut host = MemoryHost::new();
    let node = element(&mut host);

    let first = Props::new().style_prop("color", "red");
    commit_props(&mut host, node, &first, None);
    let second = Props::new();
    commit_props(&mut host, node, &second, Some(&first));
    assert_eq!(host.style_value(node, "color"), None);
}

#[test]
fn handlers_are_reregistered_even_when_identical() {
    let mut host = MemoryHost::new();
    let node = element(&mut host);

    let fired = Rc::new(Cell::new(0));
    let handler = EventHandler::new({
        let fired = Rc::clone(&fired);
        move || fired.set(fired.get() + 1)
    });

    let first = Props::new().handler("click", handler.clone());
    commit_props(&mut host, node, &first, None);
    assert_eq!(host.listener_count(node), 1);

    // the same handler instance passed again: unregistered, then registered
    let second = Props::new().handler("click", handler);
    commit_props(&mut host, node, &second, Some(&first));
    assert_eq!(host.listener_count(node), 1, "no duplicate registrations");

    for callback in host.handlers(node, "click") {
        callback.invoke();
    }
    assert_eq!(fired.get(), 1);
}

#[test]
fn removed_handler_props_unregister_their_listener() {
    let mut host = MemoryHost::new();
    let node = element(&mut host);

    let first = Props::new().on("click", || {});
    commit_props(&mut host, node, &first, None);
    assert_eq!(host.listener_count(node), 1);

    let second = Props::new();
    commit_props(&mut host, node, &second, Some(&first));
    assert_eq!(host.listener_count(node), 0);
}

#[test]
fn flag_and_number_props_render_as_attribute_text() {
    let mut host = MemoryHost::new();
    let node = element(&mut host);

    let props = Props::new().flag("hidden", true).attr("width", 40);
    commit_props(&mut host, node, &props, None);
    assert_eq!(host.attribute(node, "hidden"), Some("true"));
    assert_eq!(host.attribute(node, "width"), Some("40"));
}

#[test]
fn backend_parent_links_follow_tree_mutations() {
    let mut host = MemoryHost::new();
    let container = host.create_container();
    let a = host.create_element("a");
    let b = host.create_element("b");

    host.append_child(container, a);
    assert_eq!(host.parent(a), Some(container));

    host.insert_before(container, b, a);
    assert_eq!(host.children(container), &[b, a]);

    host.replace_child(container, b, a);
    assert_eq!(host.children(container), &[b]);
    assert_eq!(host.parent(a), None);
}
