//! In-memory host backend.
//!
//! Behaves like a detached-capable document tree: records survive removal
//! from their parent (only the link is cut), attributes and styles keep
//! insertion order, and listeners are stored per event name. Tests lean on
//! the query surface and the mutation counter; nothing here is specific to
//! testing, though, and the backend works as a headless embedding.

use hashbrown::HashMap;
use indexmap::IndexMap;

use crate::host::{EventHandler, HostBackend, HostId};

pub struct MemoryHost {
    nodes: Vec<Option<HostRecord>>,
    mutations: usize,
}

struct HostRecord {
    kind: HostKind,
    parent: Option<HostId>,
    children: Vec<HostId>,
}

enum HostKind {
    Container,
    Element {
        tag: String,
        attributes: IndexMap<String, String>,
        styles: IndexMap<String, String>,
        listeners: HashMap<String, Vec<EventHandler>>,
    },
    Text {
        value: String,
    },
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            mutations: 0,
        }
    }

    /// Creates a root container node for mounting.
    pub fn create_container(&mut self) -> HostId {
        self.push(HostKind::Container)
    }

    /// Number of mutating backend calls performed so far.
    pub fn mutations(&self) -> usize {
        self.mutations
    }

    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_some()).count()
    }

    pub fn tag(&self, id: HostId) -> Option<&str> {
        match &self.record(id).kind {
            HostKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn text(&self, id: HostId) -> Option<&str> {
        match &self.record(id).kind {
            HostKind::Text { value } => Some(value),
            _ => None,
        }
    }

    pub fn attribute(&self, id: HostId, key: &str) -> Option<&str> {
        match &self.record(id).kind {
            HostKind::Element { attributes, .. } => attributes.get(key).map(String::as_str),
            _ => None,
        }
    }

    pub fn style_value(&self, id: HostId, key: &str) -> Option<&str> {
        match &self.record(id).kind {
            HostKind::Element { styles, .. } => styles.get(key).map(String::as_str),
            _ => None,
        }
    }

    pub fn children(&self, id: HostId) -> &[HostId] {
        &self.record(id).children
    }

    pub fn listener_count(&self, id: HostId) -> usize {
        match &self.record(id).kind {
            HostKind::Element { listeners, .. } => listeners.values().map(Vec::len).sum(),
            _ => 0,
        }
    }

    /// Snapshot of the handlers registered for one event. Callers invoke the
    /// clones after dropping their borrow of the host, so a handler is free
    /// to re-enter the backend.
    pub fn handlers(&self, id: HostId, event: &str) -> Vec<EventHandler> {
        match &self.record(id).kind {
            HostKind::Element { listeners, .. } => {
                listeners.get(event).cloned().unwrap_or_default()
            }
            _ => Vec::new(),
        }
    }

    /// Depth-first search of the attached tree under `root` for an element
    /// carrying the attribute.
    pub fn find_by_attribute(&self, root: HostId, key: &str, value: &str) -> Option<HostId> {
        if self.attribute(root, key) == Some(value) {
            return Some(root);
        }
        for &child in &self.record(root).children {
            if let Some(found) = self.find_by_attribute(child, key, value) {
                return Some(found);
            }
        }
        None
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self, id: HostId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: HostId, out: &mut String) {
        match &self.record(id).kind {
            HostKind::Text { value } => out.push_str(value),
            _ => {
                for &child in &self.record(id).children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    pub fn inner_html(&self, id: HostId) -> String {
        let mut out = String::new();
        for &child in &self.record(id).children {
            self.serialize(child, &mut out);
        }
        out
    }

    pub fn outer_html(&self, id: HostId) -> String {
        let mut out = String::new();
        self.serialize(id, &mut out);
        out
    }

    fn serialize(&self, id: HostId, out: &mut String) {
        match &self.record(id).kind {
            HostKind::Text { value } => out.push_str(&escape_text(value)),
            HostKind::Container => {
                for &child in &self.record(id).children {
                    self.serialize(child, out);
                }
            }
            HostKind::Element {
                tag,
                attributes,
                styles,
                ..
            } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                if !styles.is_empty() {
                    out.push_str(" style=\"");
                    for (index, (name, value)) in styles.iter().enumerate() {
                        if index > 0 {
                            out.push_str("; ");
                        }
                        out.push_str(name);
                        out.push_str(": ");
                        out.push_str(&escape_attr(value));
                    }
                    out.push('"');
                }
                out.push('>');
                for &child in &self.record(id).children {
                    self.serialize(child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }

    fn push(&mut self, kind: HostKind) -> HostId {
        let id = self.nodes.len();
        self.nodes.push(Some(HostRecord {
            kind,
            parent: None,
            children: Vec::new(),
        }));
        self.mutations += 1;
        id
    }

    fn record(&self, id: HostId) -> &HostRecord {
        self.nodes
            .get(id)
            .and_then(Option::as_ref)
            .unwrap_or_else(|| panic!("host node {id} missing"))
    }

    fn record_mut(&mut self, id: HostId) -> &mut HostRecord {
        self.nodes
            .get_mut(id)
            .and_then(Option::as_mut)
            .unwrap_or_else(|| panic!("host node {id} missing"))
    }

    fn detach(&mut self, child: HostId) {
        if let Some(parent) = self.record(child).parent {
            self.record_mut(parent).children.retain(|&c| c != child);
            self.record_mut(child).parent = None;
        }
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostBackend for MemoryHost {
    fn create_element(&mut self, tag: &str) -> HostId {
        self.push(HostKind::Element {
            tag: tag.to_string(),
            attributes: IndexMap::new(),
            styles: IndexMap::new(),
            listeners: HashMap::new(),
        })
    }

    fn create_text(&mut self, value: &str) -> HostId {
        self.push(HostKind::Text {
            value: value.to_string(),
        })
    }

    fn set_text(&mut self, node: HostId, value: &str) {
        self.mutations += 1;
        match &mut self.record_mut(node).kind {
            HostKind::Text { value: current } => *current = value.to_string(),
            _ => panic!("host node {node} is not a text node"),
        }
    }

    fn set_attribute(&mut self, node: HostId, key: &str, value: &str) {
        self.mutations += 1;
        if let HostKind::Element { attributes, .. } = &mut self.record_mut(node).kind {
            attributes.insert(key.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&mut self, node: HostId, key: &str) {
        self.mutations += 1;
        if let HostKind::Element { attributes, .. } = &mut self.record_mut(node).kind {
            attributes.shift_remove(key);
        }
    }

    fn add_event_listener(&mut self, node: HostId, name: &str, handler: EventHandler) {
        self.mutations += 1;
        if let HostKind::Element { listeners, .. } = &mut self.record_mut(node).kind {
            listeners.entry(name.to_string()).or_default().push(handler);
        }
    }

    fn remove_event_listener(&mut self, node: HostId, name: &str, handler: &EventHandler) {
        self.mutations += 1;
        if let HostKind::Element { listeners, .. } = &mut self.record_mut(node).kind {
            if let Some(registered) = listeners.get_mut(name) {
                if let Some(index) = registered.iter().position(|h| h.ptr_eq(handler)) {
                    registered.remove(index);
                }
                if registered.is_empty() {
                    listeners.remove(name);
                }
            }
        }
    }

    fn set_style_property(&mut self, node: HostId, key: &str, value: &str) {
        self.mutations += 1;
        if let HostKind::Element { styles, .. } = &mut self.record_mut(node).kind {
            styles.insert(key.to_string(), value.to_string());
        }
    }

    fn remove_style_property(&mut self, node: HostId, key: &str) {
        self.mutations += 1;
        if let HostKind::Element { styles, .. } = &mut self.record_mut(node).kind {
            styles.shift_remove(key);
        }
    }

    fn append_child(&mut self, parent: HostId, child: HostId) {
        self.mutations += 1;
        self.detach(child);
        self.record_mut(parent).children.push(child);
        self.record_mut(child).parent = Some(parent);
    }

    fn insert_before(&mut self, parent: HostId, child: HostId, before: HostId) {
        self.mutations += 1;
        self.detach(child);
        let index = self
            .record(parent)
            .children
            .iter()
            .position(|&c| c == before)
            .unwrap_or_else(|| panic!("host node {before} is not a child of {parent}"));
        self.record_mut(parent).children.insert(index, child);
        self.record_mut(child).parent = Some(parent);
    }

    fn remove_child(&mut self, parent: HostId, child: HostId) {
        self.mutations += 1;
        self.record_mut(parent).children.retain(|&c| c != child);
        self.record_mut(child).parent = None;
    }

    fn replace_child(&mut self, parent: HostId, next: HostId, previous: HostId) {
        self.mutations += 1;
        self.detach(next);
        let index = self
            .record(parent)
            .children
            .iter()
            .position(|&c| c == previous)
            .unwrap_or_else(|| panic!("host node {previous} is not a child of {parent}"));
        self.record_mut(parent).children[index] = next;
        self.record_mut(next).parent = Some(parent);
        self.record_mut(previous).parent = None;
    }

    fn parent(&self, node: HostId) -> Option<HostId> {
        self.record(node).parent
    }
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
