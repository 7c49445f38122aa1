//! Host platform interface.
//!
//! The engine never fabricates or inspects host nodes itself; everything it
//! knows about the platform tree goes through [`HostBackend`]. An embedding
//! supplies an implementation (a browser DOM bridge, a native widget tree,
//! or the in-memory [`crate::MemoryHost`] used by tests).

use std::fmt;
use std::rc::Rc;

/// Opaque handle into the host platform's node tree.
///
/// Owned by exactly one render node; the engine only ever hands ids back to
/// the backend that produced them.
pub type HostId = usize;

/// A callback registered for a named host event.
///
/// Handlers are deliberately opaque: the property diff never compares them by
/// value, it always unregisters the previous handler and registers the next
/// one, so two handlers only ever need identity comparison.
#[derive(Clone)]
pub struct EventHandler {
    callback: Rc<dyn Fn()>,
}

impl EventHandler {
    pub fn new(callback: impl Fn() + 'static) -> Self {
        Self {
            callback: Rc::new(callback),
        }
    }

    pub fn invoke(&self) {
        (self.callback)();
    }

    pub fn ptr_eq(&self, other: &EventHandler) -> bool {
        Rc::ptr_eq(&self.callback, &other.callback)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EventHandler(..)")
    }
}

/// Mutation surface the engine requires from a host platform.
///
/// Created nodes start detached; the reconciler attaches them with
/// [`HostBackend::append_child`] / [`HostBackend::insert_before`] once the
/// subtree beneath them is built.
pub trait HostBackend {
    fn create_element(&mut self, tag: &str) -> HostId;
    fn create_text(&mut self, value: &str) -> HostId;

    /// Replace the content of an existing text node in place.
    fn set_text(&mut self, node: HostId, value: &str);

    fn set_attribute(&mut self, node: HostId, key: &str, value: &str);
    fn remove_attribute(&mut self, node: HostId, key: &str);

    fn add_event_listener(&mut self, node: HostId, name: &str, handler: EventHandler);
    fn remove_event_listener(&mut self, node: HostId, name: &str, handler: &EventHandler);

    fn set_style_property(&mut self, node: HostId, key: &str, value: &str);
    fn remove_style_property(&mut self, node: HostId, key: &str);

    fn append_child(&mut self, parent: HostId, child: HostId);
    fn insert_before(&mut self, parent: HostId, child: HostId, before: HostId);
    fn remove_child(&mut self, parent: HostId, child: HostId);
    fn replace_child(&mut self, parent: HostId, next: HostId, previous: HostId);

    /// Current parent of a node, if it is attached.
    fn parent(&self, node: HostId) -> Option<HostId>;
}
