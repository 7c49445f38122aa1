//! End-to-end scenarios driving mounted component trees through simulated
//! host events.

use arbor_core::{build, use_reducer, use_state, Element, Props, Tag};
use arbor_testing::TestHarness;

fn counter(_props: &Props) -> Element {
    let (count, set_count) = use_state(|| 0);
    build(
        "div",
        Props::new().attr("id", "app"),
        vec![
            build(
                "button",
                Props::new().attr("id", "increment").on("click", {
                    let set_count = set_count.clone();
                    move || set_count.update(|count| count + 1)
                }),
                vec![Element::text("+")],
            ),
            Element::text(count),
        ],
    )
}

#[test]
fn counter_increments_without_duplicating_nodes() {
    let harness = TestHarness::mount(build(Tag::Component(counter), Props::new(), vec![]))
        .expect("mount");
    let app = harness.find("id", "app").unwrap();
    let nodes_before = harness.with_host(|host| host.node_count());

    harness.click_by("id", "increment");

    assert_eq!(harness.text_content(app), "+1");
    let children = harness.children(app);
    assert_eq!(children.len(), 2, "one button and one text node");
    assert_eq!(
        harness.with_host(|host| host.node_count()),
        nodes_before,
        "the update reused nodes instead of recreating them"
    );

    harness.click_by("id", "increment");
    harness.click_by("id", "increment");
    assert_eq!(harness.text_content(app), "+3");
}

fn toggle(_props: &Props) -> Element {
    let (flipped, set_flipped) = use_state(|| false);
    if flipped {
        build("span", Props::new().attr("id", "y"), vec![Element::text(2)])
    } else {
        build(
            "div",
            Props::new().attr("id", "x").on("click", {
                let set_flipped = set_flipped.clone();
                move || set_flipped.update(|value| !value)
            }),
            vec![Element::text(1)],
        )
    }
}

#[test]
fn toggling_swaps_the_subtree_and_unregisters_old_handlers() {
    let harness =
        TestHarness::mount(build(Tag::Component(toggle), Props::new(), vec![])).expect("mount");
    let old_div = harness.find("id", "x").expect("initial branch");

    harness.click(old_div);

    assert!(harness.find("id", "y").is_some());
    assert!(harness.find("id", "x").is_none());
    assert_eq!(
        harness.listener_count(old_div),
        0,
        "the removed node's click handler is unregistered"
    );
    assert_eq!(harness.html(), r#"<span id="y">2</span>"#);
}

#[derive(Clone, PartialEq)]
enum RowsAction {
    RemoveAt(usize),
}

fn rows(_props: &Props) -> Element {
    let (items, dispatch) = use_reducer(
        |items: &Vec<String>, action: RowsAction| match action {
            RowsAction::RemoveAt(index) => {
                let mut next = items.clone();
                next.remove(index);
                next
            }
        },
        || vec!["first".to_string(), "second".to_string(), "third".to_string()],
    );
    let rows = items.iter().enumerate().map(|(index, label)| {
        build(
            "li",
            Props::new().attr("data-row", index).on("click", {
                let dispatch = dispatch.clone();
                move || dispatch.dispatch(RowsAction::RemoveAt(1))
            }),
            vec![Element::text(label)],
        )
    });
    build(
        "ul",
        Props::new().attr("id", "rows"),
        vec![Element::list(rows)],
    )
}

#[test]
fn removing_the_middle_row_shifts_content_into_reused_nodes() {
    let harness =
        TestHarness::mount(build(Tag::Component(rows), Props::new(), vec![])).expect("mount");
    let list = harness.find("id", "rows").unwrap();
    let before = harness.children(list);
    assert_eq!(before.len(), 3);

    harness.click_by("data-row", "1");

    let after = harness.children(list);
    assert_eq!(after.len(), 2, "exactly one row node was removed");
    assert_eq!(
        after,
        &before[..2],
        "the surviving positions keep their original host nodes"
    );
    // positional pairing: the second position now shows the third item's
    // content, because rows are matched by index, not identity
    assert_eq!(harness.text_content(after[1]), "third");
    assert_eq!(harness.text_content(list), "firstthird");
}
