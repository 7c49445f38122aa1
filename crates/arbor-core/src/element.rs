//! Element descriptors: the immutable "what should exist" values the
//! reconciler diffs against the live render tree.

use std::fmt;

use indexmap::IndexMap;

use crate::host::EventHandler;

/// Prop keys starting with this prefix register event handlers.
pub const EVENT_PREFIX: &str = "on";
/// Reserved prop key holding a nested style map.
pub const STYLE_KEY: &str = "style";
/// Reserved prop key through which a component receives its child elements.
pub const CHILDREN_KEY: &str = "children";

/// A component is a plain function from props to output. State lives in hook
/// slots, not in the function, so the same pointer is re-invoked on every
/// render of an instance and pointer identity doubles as the reuse tag.
pub type ComponentFn = fn(&Props) -> Element;

/// Ordered style property map nested under the reserved `style` key.
pub type StyleMap = IndexMap<String, String>;

/// Marker passed as the tag of a transparent grouping element.
pub struct Fragment;

/// Classified element tag. [`build`] accepts anything convertible into one:
/// a string names a host element, a component function produces a component,
/// and [`Fragment`] produces a wrapperless group.
pub enum Tag {
    Host(&'static str),
    Component(ComponentFn),
    Group,
}

impl From<&'static str> for Tag {
    fn from(tag: &'static str) -> Self {
        Tag::Host(tag)
    }
}

impl From<ComponentFn> for Tag {
    fn from(func: ComponentFn) -> Self {
        Tag::Component(func)
    }
}

impl From<Fragment> for Tag {
    fn from(_: Fragment) -> Self {
        Tag::Group
    }
}

/// Immutable descriptor for one tree position.
///
/// `Bool` and `Empty` render nothing but still occupy their position, so a
/// later render can pair a real element against the same slot.
#[derive(Clone, Debug)]
pub enum Element {
    Host(HostElement),
    Component(ComponentElement),
    Group(Vec<Element>),
    Text(String),
    Bool(bool),
    List(Vec<Element>),
    Empty,
}

#[derive(Clone, Debug)]
pub struct HostElement {
    pub tag: &'static str,
    pub props: Props,
    pub children: Vec<Element>,
}

#[derive(Clone, Debug)]
pub struct ComponentElement {
    pub func: ComponentFn,
    pub props: Props,
}

impl Element {
    pub fn text(value: impl fmt::Display) -> Element {
        Element::Text(value.to_string())
    }

    pub fn list(items: impl IntoIterator<Item = Element>) -> Element {
        Element::List(items.into_iter().collect())
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Element::Host(_) => "host",
            Element::Component(_) => "component",
            Element::Group(_) => "group",
            Element::Text(_) => "text",
            Element::Bool(_) => "bool",
            Element::List(_) => "list",
            Element::Empty => "empty",
        }
    }
}

impl From<&str> for Element {
    fn from(value: &str) -> Self {
        Element::Text(value.to_string())
    }
}

impl From<String> for Element {
    fn from(value: String) -> Self {
        Element::Text(value)
    }
}

impl From<bool> for Element {
    fn from(value: bool) -> Self {
        Element::Bool(value)
    }
}

impl From<i32> for Element {
    fn from(value: i32) -> Self {
        Element::text(value)
    }
}

impl From<i64> for Element {
    fn from(value: i64) -> Self {
        Element::text(value)
    }
}

impl From<f64> for Element {
    fn from(value: f64) -> Self {
        Element::text(value)
    }
}

impl From<Vec<Element>> for Element {
    fn from(items: Vec<Element>) -> Self {
        Element::List(items)
    }
}

impl<T: Into<Element>> From<Option<T>> for Element {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => Element::Empty,
        }
    }
}

/// Builds a descriptor from a tag, props, and ordered children.
///
/// Pure and side-effect free; safe to call outside any rendering context.
/// Children handed to a component are packed under the reserved `children`
/// prop so the function body can place them itself.
pub fn build(tag: impl Into<Tag>, props: Props, children: Vec<Element>) -> Element {
    match tag.into() {
        Tag::Host(name) => Element::Host(HostElement {
            tag: name,
            props,
            children,
        }),
        Tag::Group => Element::Group(children),
        Tag::Component(func) => {
            let mut props = props;
            if !children.is_empty() {
                props.set(CHILDREN_KEY, PropValue::Nodes(children));
            }
            Element::Component(ComponentElement { func, props })
        }
    }
}

/// A single property value. Handlers and child-element lists never compare
/// equal: the diff policy re-registers handlers unconditionally and component
/// props are not compared at all.
#[derive(Clone, Debug)]
pub enum PropValue {
    Text(String),
    Number(f64),
    Flag(bool),
    Handler(EventHandler),
    Style(StyleMap),
    Nodes(Vec<Element>),
}

impl PropValue {
    /// Textual attribute form, for values that map onto a host attribute.
    pub fn as_attr_text(&self) -> Option<String> {
        match self {
            PropValue::Text(value) => Some(value.clone()),
            PropValue::Number(value) => Some(value.to_string()),
            PropValue::Flag(value) => Some(value.to_string()),
            PropValue::Handler(_) | PropValue::Style(_) | PropValue::Nodes(_) => None,
        }
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Text(a), PropValue::Text(b)) => a == b,
            (PropValue::Number(a), PropValue::Number(b)) => a == b,
            (PropValue::Flag(a), PropValue::Flag(b)) => a == b,
            (PropValue::Style(a), PropValue::Style(b)) => a == b,
            _ => false,
        }
    }
}

/// Insertion-ordered string-keyed property map.
#[derive(Clone, Debug, Default)]
pub struct Props {
    entries: IndexMap<String, PropValue>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: PropValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.set(key, PropValue::Text(value.to_string()));
        self
    }

    pub fn flag(mut self, key: impl Into<String>, value: bool) -> Self {
        self.set(key, PropValue::Flag(value));
        self
    }

    /// Registers a handler for `event` under the reserved `on` prefix.
    pub fn on(mut self, event: &str, handler: impl Fn() + 'static) -> Self {
        self.set(
            format!("{EVENT_PREFIX}{event}"),
            PropValue::Handler(EventHandler::new(handler)),
        );
        self
    }

    pub fn handler(mut self, event: &str, handler: EventHandler) -> Self {
        self.set(format!("{EVENT_PREFIX}{event}"), PropValue::Handler(handler));
        self
    }

    pub fn style(mut self, style: StyleMap) -> Self {
        self.set(STYLE_KEY, PropValue::Style(style));
        self
    }

    /// Adds one property to the nested style map, creating it if absent.
    pub fn style_prop(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        let entry = self
            .entries
            .entry(STYLE_KEY.to_string())
            .or_insert_with(|| PropValue::Style(StyleMap::new()));
        if let PropValue::Style(map) = entry {
            map.insert(key.into(), value.to_string());
        }
        self
    }

    pub fn style_map(&self) -> Option<&StyleMap> {
        match self.get(STYLE_KEY) {
            Some(PropValue::Style(map)) => Some(map),
            _ => None,
        }
    }

    /// Child elements passed to a component through the reserved prop.
    pub fn children(&self) -> &[Element] {
        match self.get(CHILDREN_KEY) {
            Some(PropValue::Nodes(nodes)) => nodes,
            _ => &[],
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(PropValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        match self.get(key) {
            Some(PropValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn flag_value(&self, key: &str) -> Option<bool> {
        match self.get(key) {
            Some(PropValue::Flag(value)) => Some(*value),
            _ => None,
        }
    }
}

/// Event name for a prop key, when the key carries the reserved prefix.
/// `onClick` and `onclick` both resolve to `click`.
pub(crate) fn event_name(key: &str) -> Option<String> {
    match key.strip_prefix(EVENT_PREFIX) {
        Some(rest) if !rest.is_empty() => Some(rest.to_ascii_lowercase()),
        _ => None,
    }
}
