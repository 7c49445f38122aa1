use std::cell::RefCell;
use std::rc::Rc;

use crate::{create_root, Element, HostBackend, HostId, MemoryHost, Root};

mod element_tests;
mod patch_tests;

pub(crate) struct Fixture {
    pub host: Rc<RefCell<MemoryHost>>,
    pub container: HostId,
    pub root: Root,
}

pub(crate) fn fixture() -> Fixture {
    let mut memory = MemoryHost::new();
    let container = memory.create_container();
    let host = Rc::new(RefCell::new(memory));
    let backend: Rc<RefCell<dyn HostBackend>> = host.clone();
    let root = create_root(backend, container);
    Fixture {
        host,
        container,
        root,
    }
}

pub(crate) fn mount(element: Element) -> Fixture {
    let fixture = fixture();
    fixture.root.render(element).expect("initial render failed");
    fixture
}

impl Fixture {
    pub fn dispatch(&self, id: HostId, event: &str) {
        let handlers = self.host.borrow().handlers(id, event);
        for handler in handlers {
            handler.invoke();
        }
    }

    pub fn click(&self, id: HostId) {
        self.dispatch(id, "click");
    }

    pub fn find(&self, key: &str, value: &str) -> Option<HostId> {
        self.host.borrow().find_by_attribute(self.container, key, value)
    }

    pub fn text_content(&self) -> String {
        self.host.borrow().text_content(self.container)
    }

    pub fn html(&self) -> String {
        self.host.borrow().inner_html(self.container)
    }

    pub fn mutations(&self) -> usize {
        self.host.borrow().mutations()
    }

    pub fn children_of(&self, id: HostId) -> Vec<HostId> {
        self.host.borrow().children(id).to_vec()
    }
}
