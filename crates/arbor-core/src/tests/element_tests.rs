use crate::element::event_name;
use crate::{build, ComponentFn, Element, EventHandler, Fragment, PropValue, Props, Tag};

fn noop_component(_props: &Props) -> Element {
    Element::Empty
}

#[test]
fn string_tag_builds_a_host_element() {
    let element = build("div", Props::new().attr("id", "a"), vec![Element::text("hi")]);
    match element {
        Element::Host(host) => {
            assert_eq!(host.tag, "div");
            assert_eq!(host.props.text("id"), Some("a"));
            assert_eq!(host.children.len(), 1);
        }
        other => panic!("expected host element, got {other:?}"),
    }
}

#[test]
fn fragment_tag_builds_a_group() {
    let element = build(Fragment, Props::new(), vec![Element::text("a"), Element::text("b")]);
    match element {
        Element::Group(children) => assert_eq!(children.len(), 2),
        other => panic!("expected group, got {other:?}"),
    }
}

#[test]
fn function_tag_builds_a_component_and_packs_children_into_props() {
    let element = build(
        Tag::Component(noop_component),
        Props::new().attr("title", "t"),
        vec![Element::text("a"), Element::text("b")],
    );
    match element {
        Element::Component(component) => {
            assert_eq!(component.props.text("title"), Some("t"));
            assert_eq!(component.props.children().len(), 2);
        }
        other => panic!("expected component, got {other:?}"),
    }
}

#[test]
fn component_without_children_gets_no_children_prop() {
    let func: ComponentFn = noop_component;
    let element = build(func, Props::new(), vec![]);
    match element {
        Element::Component(component) => assert!(component.props.children().is_empty()),
        other => panic!("expected component, got {other:?}"),
    }
}

#[test]
fn child_conversions_cover_the_primitive_kinds() {
    assert!(matches!(Element::from("text"), Element::Text(_)));
    assert!(matches!(Element::from(3), Element::Text(_)));
    assert!(matches!(Element::from(false), Element::Bool(false)));
    assert!(matches!(Element::from(None::<Element>), Element::Empty));
    assert!(matches!(
        Element::from(vec![Element::text("a")]),
        Element::List(_)
    ));
}

#[test]
fn event_keys_resolve_through_the_reserved_prefix() {
    assert_eq!(event_name("onClick").as_deref(), Some("click"));
    assert_eq!(event_name("onclick").as_deref(), Some("click"));
    assert_eq!(event_name("on"), None);
    assert_eq!(event_name("style"), None);
    assert_eq!(event_name("id"), None);
}

#[test]
fn handlers_never_compare_equal() {
    let handler = EventHandler::new(|| {});
    let a = PropValue::Handler(handler.clone());
    let b = PropValue::Handler(handler);
    assert_ne!(a, b);
    assert_eq!(
        PropValue::Text("x".to_string()),
        PropValue::Text("x".to_string())
    );
}

#[test]
fn style_props_accumulate_into_one_nested_map() {
    let props = Props::new()
        .style_prop("color", "red")
        .style_prop("margin", "4px");
    let style = props.style_map().expect("style map");
    assert_eq!(style.get("color").map(String::as_str), Some("red"));
    assert_eq!(style.get("margin").map(String::as_str), Some("4px"));
}
