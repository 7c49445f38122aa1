#![doc = r"Core reconciliation and hooks engine for the Arbor retained-mode UI runtime.

A descriptor tree built with [`build`] is mounted into a host container via
[`create_root`]; component functions keep per-instance state through
[`use_state`] / [`use_reducer`], and every state write synchronously diffs the
owning subtree against its previous output, applying the minimal host
mutations through a [`HostBackend`]."]

mod element;
mod error;
mod hooks;
mod host;
mod memory;
mod node;
mod patch;
mod reconcile;
mod root;

pub use element::{
    build, ComponentElement, ComponentFn, Element, Fragment, HostElement, PropValue, Props,
    StyleMap, Tag, CHILDREN_KEY, EVENT_PREFIX, STYLE_KEY,
};
pub use error::RenderError;
pub use hooks::{use_reducer, use_state, Dispatch, SetState};
pub use host::{EventHandler, HostBackend, HostId};
pub use memory::MemoryHost;
pub use node::RenderNodeId;
pub use root::{create_root, Root};

#[cfg(test)]
mod tests;
