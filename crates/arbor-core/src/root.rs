//! Root container and the synchronous update driver.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Instant;

use crate::element::Element;
use crate::error::RenderError;
use crate::host::{HostBackend, HostId};
use crate::node::{RenderArena, RenderNodeId};
use crate::reconcile::Reconciler;

/// Owns a render tree mounted into one host container.
///
/// The driver has two states, idle and rendering; the `RefCell` around the
/// root state is that machine. A hook setter firing re-enters through
/// [`UpdateHandle`], which runs one full synchronous pass scoped to the
/// owning component's subtree. There is no batching: N setter calls run N
/// passes.
pub struct Root {
    state: Rc<RefCell<RootState>>,
}

struct RootState {
    arena: RenderArena,
    host: Rc<RefCell<dyn HostBackend>>,
    container: HostId,
    node: Option<RenderNodeId>,
}

/// Creates a root whose content attaches under `container`.
pub fn create_root(host: Rc<RefCell<dyn HostBackend>>, container: HostId) -> Root {
    Root {
        state: Rc::new(RefCell::new(RootState {
            arena: RenderArena::new(),
            host,
            container,
            node: None,
        })),
    }
}

impl Root {
    /// Mounts `element` on the first call; later calls diff against the
    /// previously rendered tree. Runs to completion or returns the error;
    /// host mutations made before a failure are not rolled back.
    pub fn render(&self, element: Element) -> Result<(), RenderError> {
        let started = Instant::now();
        let mut state = self
            .state
            .try_borrow_mut()
            .unwrap_or_else(|_| panic!("render requested while a render pass is in flight"));
        let driver = UpdateHandle {
            state: Rc::downgrade(&self.state),
        };
        let host = Rc::clone(&state.host);
        let mut host = host.borrow_mut();
        let container = state.container;
        let prev = state.node;
        let node = {
            let mut reconciler = Reconciler {
                arena: &mut state.arena,
                host: &mut *host,
                driver,
            };
            reconciler.reconcile(element, prev, None, container, None)?
        };
        state.node = Some(node);
        log::debug!("root rendered in {:?}", started.elapsed());
        Ok(())
    }

    /// Detaches and destroys the rendered tree: host nodes removed, event
    /// listeners unregistered, hook slots dropped. The root can be rendered
    /// into again afterwards.
    pub fn unmount(&self) -> Result<(), RenderError> {
        let mut state = self
            .state
            .try_borrow_mut()
            .unwrap_or_else(|_| panic!("unmount requested while a render pass is in flight"));
        let Some(node) = state.node.take() else {
            return Ok(());
        };
        let driver = UpdateHandle {
            state: Rc::downgrade(&self.state),
        };
        let host = Rc::clone(&state.host);
        let mut host = host.borrow_mut();
        let mut reconciler = Reconciler {
            arena: &mut state.arena,
            host: &mut *host,
            driver,
        };
        reconciler.detach(node)?;
        reconciler.destroy(node)?;
        Ok(())
    }
}

/// Weak handle through which hook setters re-enter the driver. A handle that
/// outlives its root degrades to a no-op, so stale setters are harmless.
#[derive(Clone)]
pub(crate) struct UpdateHandle {
    state: Weak<RefCell<RootState>>,
}

impl UpdateHandle {
    /// Synchronously re-renders the component that owns `node`. Programmer
    /// errors surfaced by the pass abort it with a panic, per the engine's
    /// raise-immediately error policy.
    pub fn update(&self, node: RenderNodeId) {
        let Some(state_rc) = self.state.upgrade() else {
            return;
        };
        let started = Instant::now();
        let mut state = state_rc
            .try_borrow_mut()
            .unwrap_or_else(|_| panic!("state setter fired while a render pass is in flight"));
        if !state.arena.contains(node) {
            // the owning subtree was destroyed after the setter escaped
            log::warn!("dropping state update for removed component node {node}");
            return;
        }
        let driver = self.clone();
        let host = Rc::clone(&state.host);
        let mut host = host.borrow_mut();
        let result = {
            let mut reconciler = Reconciler {
                arena: &mut state.arena,
                host: &mut *host,
                driver,
            };
            reconciler.update_component(node)
        };
        if let Err(err) = result {
            panic!("synchronous update failed: {err}");
        }
        log::debug!("component node {node} re-rendered in {:?}", started.elapsed());
    }
}
