//! Testing utilities and harness for Arbor.
//!
//! [`TestHarness`] mounts an element tree into an in-memory host and exposes
//! the queries and event dispatch that scenario tests need: find a node by
//! attribute, fire its handlers the way a platform event loop would, and
//! assert on the resulting tree.

use std::cell::RefCell;
use std::rc::Rc;

use arbor_core::{create_root, Element, HostBackend, HostId, MemoryHost, RenderError, Root};

pub struct TestHarness {
    host: Rc<RefCell<MemoryHost>>,
    container: HostId,
    root: Root,
}

impl TestHarness {
    /// Mounts `element` into a fresh in-memory host tree.
    pub fn mount(element: Element) -> Result<Self, RenderError> {
        let mut memory = MemoryHost::new();
        let container = memory.create_container();
        let host = Rc::new(RefCell::new(memory));
        let backend: Rc<RefCell<dyn HostBackend>> = host.clone();
        let root = create_root(backend, container);
        root.render(element)?;
        Ok(Self {
            host,
            container,
            root,
        })
    }

    pub fn render(&self, element: Element) -> Result<(), RenderError> {
        self.root.render(element)
    }

    pub fn root(&self) -> &Root {
        &self.root
    }

    pub fn container(&self) -> HostId {
        self.container
    }

    pub fn with_host<R>(&self, f: impl FnOnce(&MemoryHost) -> R) -> R {
        f(&self.host.borrow())
    }

    /// First attached element carrying `key="value"`.
    pub fn find(&self, key: &str, value: &str) -> Option<HostId> {
        self.host
            .borrow()
            .find_by_attribute(self.container, key, value)
    }

    pub fn text_content(&self, id: HostId) -> String {
        self.host.borrow().text_content(id)
    }

    pub fn html(&self) -> String {
        self.host.borrow().inner_html(self.container)
    }

    pub fn children(&self, id: HostId) -> Vec<HostId> {
        self.host.borrow().children(id).to_vec()
    }

    pub fn listener_count(&self, id: HostId) -> usize {
        self.host.borrow().listener_count(id)
    }

    pub fn mutations(&self) -> usize {
        self.host.borrow().mutations()
    }

    /// Fires every handler registered on `id` for `event`, the handlers
    /// being invoked after the host borrow is released so they are free to
    /// trigger synchronous re-renders. Returns how many handlers ran.
    pub fn dispatch(&self, id: HostId, event: &str) -> usize {
        let handlers = self.host.borrow().handlers(id, event);
        let count = handlers.len();
        for handler in handlers {
            handler.invoke();
        }
        count
    }

    pub fn click(&self, id: HostId) -> usize {
        self.dispatch(id, "click")
    }

    /// Finds an element by attribute and clicks it; panics when nothing
    /// matches, which keeps scenario tests terse.
    pub fn click_by(&self, key: &str, value: &str) -> usize {
        let id = self
            .find(key, value)
            .unwrap_or_else(|| panic!("no attached element with {key}={value}"));
        self.click(id)
    }
}
