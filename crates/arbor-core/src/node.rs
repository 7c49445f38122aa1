//! Durable render tree: one mutable node per live descriptor position.

use crate::element::{ComponentFn, Props};
use crate::error::RenderError;
use crate::hooks::HookSlots;
use crate::host::HostId;

pub type RenderNodeId = usize;

/// Kind-specific payload of a render node. Host and text nodes own exactly
/// one host node; groups, lists, components, and blanks own none and expose
/// their descendants' host nodes instead.
pub(crate) enum NodeKind {
    Host {
        tag: &'static str,
        props: Props,
        host: HostId,
    },
    Component {
        func: ComponentFn,
        props: Props,
        hooks: HookSlots,
    },
    Group,
    List,
    Text {
        value: String,
        host: HostId,
    },
    /// Boolean or null position: occupies a slot, renders nothing.
    Blank,
}

pub(crate) struct RenderNode {
    pub kind: NodeKind,
    pub parent: Option<RenderNodeId>,
    pub children: Vec<RenderNodeId>,
    /// Nearest ancestor host node this node's content attaches into.
    pub host_parent: HostId,
}

/// Arena of render nodes. Ids are handed out once and never reused, so a
/// stale id from a destroyed subtree reads back as missing rather than
/// aliasing a newer node.
#[derive(Default)]
pub(crate) struct RenderArena {
    nodes: Vec<Option<RenderNode>>,
}

impl RenderArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: RenderNode) -> RenderNodeId {
        let id = self.nodes.len();
        self.nodes.push(Some(node));
        id
    }

    pub fn get(&self, id: RenderNodeId) -> Result<&RenderNode, RenderError> {
        self.nodes
            .get(id)
            .and_then(Option::as_ref)
            .ok_or(RenderError::Missing { id })
    }

    pub fn get_mut(&mut self, id: RenderNodeId) -> Result<&mut RenderNode, RenderError> {
        self.nodes
            .get_mut(id)
            .and_then(Option::as_mut)
            .ok_or(RenderError::Missing { id })
    }

    pub fn remove(&mut self, id: RenderNodeId) -> Option<RenderNode> {
        self.nodes.get_mut(id).and_then(Option::take)
    }

    pub fn contains(&self, id: RenderNodeId) -> bool {
        matches!(self.nodes.get(id), Some(Some(_)))
    }

    /// First host node contributed by the subtree at `id`, in host order.
    pub fn first_host(&self, id: RenderNodeId) -> Option<HostId> {
        let node = self.nodes.get(id)?.as_ref()?;
        match &node.kind {
            NodeKind::Host { host, .. } | NodeKind::Text { host, .. } => Some(*host),
            NodeKind::Blank => None,
            _ => node
                .children
                .iter()
                .find_map(|&child| self.first_host(child)),
        }
    }

    /// Collects the top-level host nodes of the subtree at `id`. These are
    /// the nodes that sit directly under `host_parent`; host nodes nested
    /// inside another owned host node are not included.
    pub fn collect_hosts(&self, id: RenderNodeId, out: &mut Vec<HostId>) {
        if let Some(Some(node)) = self.nodes.get(id) {
            match &node.kind {
                NodeKind::Host { host, .. } | NodeKind::Text { host, .. } => out.push(*host),
                NodeKind::Blank => {}
                _ => {
                    for &child in &node.children {
                        self.collect_hosts(child, out);
                    }
                }
            }
        }
    }
}
