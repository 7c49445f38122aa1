//! Positional tree diff between a new descriptor tree and the previous
//! render tree, translated into minimal host mutations.
//!
//! Reuse identity is `(kind, tag)` only; props are never compared for reuse,
//! just for incremental update. List children are paired by index, so a
//! reorder reads as "every position changed" and is repaired by prop
//! rewriting rather than node moves.

use std::cell::Cell;
use std::ptr;

use crate::element::{event_name, ComponentFn, Element, PropValue, Props};
use crate::error::RenderError;
use crate::hooks::{HookSlots, InstanceFrame, InstanceGuard};
use crate::host::{HostBackend, HostId};
use crate::node::{NodeKind, RenderArena, RenderNode, RenderNodeId};
use crate::patch::commit_props;
use crate::root::UpdateHandle;

pub(crate) struct Reconciler<'a> {
    pub arena: &'a mut RenderArena,
    pub host: &'a mut dyn HostBackend,
    pub driver: UpdateHandle,
}

impl<'a> Reconciler<'a> {
    /// Diffs `element` against the render node previously occupying the same
    /// position. `anchor` is only consulted when there is no previous node
    /// (or the previous node contributed no host nodes): it names the host
    /// node the fresh content must land in front of.
    pub fn reconcile(
        &mut self,
        element: Element,
        prev: Option<RenderNodeId>,
        parent: Option<RenderNodeId>,
        host_parent: HostId,
        anchor: Option<HostId>,
    ) -> Result<RenderNodeId, RenderError> {
        match prev {
            Some(prev_id) => {
                if self.same_type(&element, prev_id)? {
                    self.reuse(element, prev_id)
                } else {
                    self.replace(element, prev_id, parent, host_parent)
                }
            }
            None => {
                let id = self.mount(element, parent, host_parent)?;
                let mut hosts = Vec::new();
                self.arena.collect_hosts(id, &mut hosts);
                for host in hosts {
                    self.insert_at(host_parent, host, anchor);
                }
                Ok(id)
            }
        }
    }

    /// Re-runs one component in place after a hook slot write. The node is
    /// already attached, so only the diff's own operations touch the host
    /// tree.
    pub fn update_component(&mut self, node_id: RenderNodeId) -> Result<(), RenderError> {
        let (func, props) = {
            let node = self.arena.get(node_id)?;
            let NodeKind::Component { func, props, .. } = &node.kind else {
                return Err(RenderError::NotAComponent { id: node_id });
            };
            (*func, props.clone())
        };
        let output = self.invoke(node_id, func, props)?;
        self.reconcile_output(node_id, output)
    }

    fn same_type(&self, element: &Element, prev: RenderNodeId) -> Result<bool, RenderError> {
        let node = self.arena.get(prev)?;
        Ok(match (&node.kind, element) {
            (NodeKind::Host { tag, .. }, Element::Host(next)) => *tag == next.tag,
            (NodeKind::Component { func, .. }, Element::Component(next)) => {
                ptr::fn_addr_eq(*func, next.func)
            }
            (NodeKind::Group, Element::Group(_)) => true,
            (NodeKind::List, Element::List(_)) => true,
            (NodeKind::Text { .. }, Element::Text(_)) => true,
            // booleans and the null child all render nothing and reuse the
            // same blank slot, matching their shared placeholder ancestry
            (NodeKind::Blank, Element::Bool(_) | Element::Empty) => true,
            _ => false,
        })
    }

    fn reuse(&mut self, element: Element, node_id: RenderNodeId) -> Result<RenderNodeId, RenderError> {
        match element {
            Element::Bool(_) | Element::Empty => Ok(node_id),
            Element::Text(value) => {
                let (host, changed) = {
                    let node = self.arena.get_mut(node_id)?;
                    let NodeKind::Text { value: current, host } = &mut node.kind else {
                        return Err(RenderError::Missing { id: node_id });
                    };
                    let changed = *current != value;
                    if changed {
                        *current = value.clone();
                    }
                    (*host, changed)
                };
                if changed {
                    self.host.set_text(host, &value);
                }
                Ok(node_id)
            }
            Element::Group(children) | Element::List(children) => {
                let host_parent = self.arena.get(node_id)?.host_parent;
                self.reconcile_children(node_id, children, host_parent, false)?;
                Ok(node_id)
            }
            Element::Host(next) => {
                let (host, previous) = {
                    let node = self.arena.get_mut(node_id)?;
                    let NodeKind::Host { props, host, .. } = &mut node.kind else {
                        return Err(RenderError::Missing { id: node_id });
                    };
                    (*host, std::mem::replace(props, next.props.clone()))
                };
                commit_props(&mut *self.host, host, &next.props, Some(&previous));
                self.reconcile_children(node_id, next.children, host, true)?;
                Ok(node_id)
            }
            Element::Component(next) => {
                let output = self.invoke(node_id, next.func, next.props)?;
                self.reconcile_output(node_id, output)?;
                Ok(node_id)
            }
        }
    }

    /// Type changed at this position: build the replacement subtree detached,
    /// swap it into the host tree where the old content sat, then tear the
    /// old subtree down.
    fn replace(
        &mut self,
        element: Element,
        prev_id: RenderNodeId,
        parent: Option<RenderNodeId>,
        host_parent: HostId,
    ) -> Result<RenderNodeId, RenderError> {
        log::trace!(
            "replacing node {prev_id} with {} element",
            element.kind_name()
        );
        // anchor and old host set are read while the old tree is intact
        let anchor = self.next_host_anchor(prev_id)?;
        let mut old_hosts = Vec::new();
        self.arena.collect_hosts(prev_id, &mut old_hosts);

        let new_id = self.mount(element, parent, host_parent)?;
        let mut new_hosts = Vec::new();
        self.arena.collect_hosts(new_id, &mut new_hosts);

        self.splice(host_parent, &new_hosts, &old_hosts, anchor)?;
        self.destroy(prev_id)?;
        Ok(new_id)
    }

    /// Builds a fresh subtree. Host nodes nested under a new host element are
    /// attached inside it immediately; the subtree's top-level host nodes are
    /// left detached for the caller to place.
    fn mount(
        &mut self,
        element: Element,
        parent: Option<RenderNodeId>,
        host_parent: HostId,
    ) -> Result<RenderNodeId, RenderError> {
        match element {
            Element::Text(value) => {
                let host = self.host.create_text(&value);
                Ok(self.arena.insert(RenderNode {
                    kind: NodeKind::Text { value, host },
                    parent,
                    children: Vec::new(),
                    host_parent,
                }))
            }
            Element::Bool(_) | Element::Empty => Ok(self.arena.insert(RenderNode {
                kind: NodeKind::Blank,
                parent,
                children: Vec::new(),
                host_parent,
            })),
            Element::Group(children) => self.mount_transparent(NodeKind::Group, children, parent, host_parent),
            Element::List(children) => self.mount_transparent(NodeKind::List, children, parent, host_parent),
            Element::Host(next) => {
                let host = self.host.create_element(next.tag);
                commit_props(&mut *self.host, host, &next.props, None);
                let id = self.arena.insert(RenderNode {
                    kind: NodeKind::Host {
                        tag: next.tag,
                        props: next.props,
                        host,
                    },
                    parent,
                    children: Vec::new(),
                    host_parent,
                });
                let mut children = Vec::with_capacity(next.children.len());
                for child in next.children {
                    let child_id = self.mount(child, Some(id), host)?;
                    let mut hosts = Vec::new();
                    self.arena.collect_hosts(child_id, &mut hosts);
                    for child_host in hosts {
                        self.host.append_child(host, child_host);
                    }
                    children.push(child_id);
                }
                self.arena.get_mut(id)?.children = children;
                Ok(id)
            }
            Element::Component(next) => {
                let id = self.arena.insert(RenderNode {
                    kind: NodeKind::Component {
                        func: next.func,
                        props: next.props.clone(),
                        hooks: HookSlots::new(),
                    },
                    parent,
                    children: Vec::new(),
                    host_parent,
                });
                let output = self.invoke(id, next.func, next.props)?;
                let child = self.mount(output, Some(id), host_parent)?;
                self.arena.get_mut(id)?.children = vec![child];
                Ok(id)
            }
        }
    }

    fn mount_transparent(
        &mut self,
        kind: NodeKind,
        children: Vec<Element>,
        parent: Option<RenderNodeId>,
        host_parent: HostId,
    ) -> Result<RenderNodeId, RenderError> {
        let id = self.arena.insert(RenderNode {
            kind,
            parent,
            children: Vec::new(),
            host_parent,
        });
        let mut ids = Vec::with_capacity(children.len());
        for child in children {
            ids.push(self.mount(child, Some(id), host_parent)?);
        }
        self.arena.get_mut(id)?.children = ids;
        Ok(id)
    }

    /// Runs the component function with an instance frame installed so its
    /// hooks resolve to this node's slot store, then enforces the stable
    /// slot-count invariant.
    fn invoke(
        &mut self,
        node_id: RenderNodeId,
        func: ComponentFn,
        props: Props,
    ) -> Result<Element, RenderError> {
        let hooks = {
            let node = self.arena.get_mut(node_id)?;
            let NodeKind::Component {
                func: stored_func,
                props: stored_props,
                hooks,
            } = &mut node.kind
            else {
                return Err(RenderError::NotAComponent { id: node_id });
            };
            *stored_func = func;
            *stored_props = props.clone();
            hooks.clone()
        };

        let guard = InstanceGuard::enter(InstanceFrame {
            node: node_id,
            slots: hooks.clone(),
            cursor: Cell::new(0),
            driver: self.driver.clone(),
        });
        let output = func(&props);
        let used = guard.cursor();
        drop(guard);

        hooks
            .commit(used)
            .map_err(|(previous, current)| RenderError::HookCountMismatch {
                id: node_id,
                previous,
                current,
            })?;
        Ok(output)
    }

    /// Reconciles a component's new output against its cached previous
    /// output, which is always the node's single child.
    fn reconcile_output(
        &mut self,
        node_id: RenderNodeId,
        output: Element,
    ) -> Result<(), RenderError> {
        let (prev_output, host_parent) = {
            let node = self.arena.get(node_id)?;
            (node.children.first().copied(), node.host_parent)
        };
        let child = self.reconcile(output, prev_output, Some(node_id), host_parent, None)?;
        self.arena.get_mut(node_id)?.children = vec![child];
        Ok(())
    }

    /// Index-paired child diff. Order within the level: surplus previous
    /// children are destroyed first, surviving positions are reconciled in
    /// place, new tail positions are mounted and inserted at their anchor.
    fn reconcile_children(
        &mut self,
        parent_id: RenderNodeId,
        new_children: Vec<Element>,
        host_parent: HostId,
        parent_owns_host: bool,
    ) -> Result<(), RenderError> {
        let prev_children = self.arena.get(parent_id)?.children.clone();
        let new_len = new_children.len();
        let paired = prev_children.len().min(new_len);

        if prev_children.len() > new_len {
            for &surplus in &prev_children[new_len..] {
                self.detach(surplus)?;
                self.destroy(surplus)?;
            }
            self.arena.get_mut(parent_id)?.children.truncate(new_len);
        }

        for (index, child) in new_children.into_iter().enumerate() {
            if index < paired {
                let next_id =
                    self.reconcile(child, Some(prev_children[index]), Some(parent_id), host_parent, None)?;
                self.arena.get_mut(parent_id)?.children[index] = next_id;
            } else {
                let anchor = if parent_owns_host {
                    // tail of a host element's own child list
                    None
                } else {
                    self.next_host_anchor(parent_id)?
                };
                let next_id = self.reconcile(child, None, Some(parent_id), host_parent, anchor)?;
                self.arena.get_mut(parent_id)?.children.push(next_id);
            }
        }
        Ok(())
    }

    /// First host node that follows `node_id`'s content within the same host
    /// parent, found by scanning later sibling positions and walking up
    /// through host-transparent ancestors.
    fn next_host_anchor(&self, node_id: RenderNodeId) -> Result<Option<HostId>, RenderError> {
        let mut current = node_id;
        loop {
            let node = self.arena.get(current)?;
            let Some(parent_id) = node.parent else {
                return Ok(None);
            };
            let parent = self.arena.get(parent_id)?;
            let index = parent
                .children
                .iter()
                .position(|&child| child == current)
                .ok_or(RenderError::Missing { id: current })?;
            for &sibling in &parent.children[index + 1..] {
                if let Some(host) = self.arena.first_host(sibling) {
                    return Ok(Some(host));
                }
            }
            if matches!(parent.kind, NodeKind::Host { .. }) {
                // the parent's own host node bounds the search
                return Ok(None);
            }
            current = parent_id;
        }
    }

    /// Swaps one contiguous host block for another at the same position.
    fn splice(
        &mut self,
        host_parent: HostId,
        new_hosts: &[HostId],
        old_hosts: &[HostId],
        anchor: Option<HostId>,
    ) -> Result<(), RenderError> {
        match (new_hosts.split_first(), old_hosts.split_first()) {
            (Some((&first_new, rest_new)), Some((&first_old, rest_old))) => {
                if self.host.parent(first_old).is_none() {
                    return Err(RenderError::DetachedHost { host: first_old });
                }
                self.host.replace_child(host_parent, first_new, first_old);
                for &old in rest_old {
                    self.host.remove_child(host_parent, old);
                }
                for &new in rest_new {
                    self.insert_at(host_parent, new, anchor);
                }
            }
            (Some(_), None) => {
                for &new in new_hosts {
                    self.insert_at(host_parent, new, anchor);
                }
            }
            (None, Some(_)) => {
                for &old in old_hosts {
                    self.host.remove_child(host_parent, old);
                }
            }
            (None, None) => {}
        }
        Ok(())
    }

    fn insert_at(&mut self, parent: HostId, node: HostId, anchor: Option<HostId>) {
        match anchor {
            Some(before) => self.host.insert_before(parent, node, before),
            None => self.host.append_child(parent, node),
        }
    }

    /// Removes a subtree's top-level host nodes from their host parent.
    pub(crate) fn detach(&mut self, node_id: RenderNodeId) -> Result<(), RenderError> {
        let host_parent = self.arena.get(node_id)?.host_parent;
        let mut hosts = Vec::new();
        self.arena.collect_hosts(node_id, &mut hosts);
        for host in hosts {
            self.host.remove_child(host_parent, host);
        }
        Ok(())
    }

    /// Post-order teardown: children first, then this node's listeners are
    /// unregistered and its arena slot (hook slots included) is dropped.
    /// Host nodes must already be detached.
    pub(crate) fn destroy(&mut self, node_id: RenderNodeId) -> Result<(), RenderError> {
        let children = self.arena.get(node_id)?.children.clone();
        for child in children {
            self.destroy(child)?;
        }
        if let Some(node) = self.arena.remove(node_id) {
            if let NodeKind::Host { props, host, .. } = node.kind {
                for (key, value) in props.iter() {
                    if let (Some(event), PropValue::Handler(handler)) = (event_name(key), value) {
                        self.host.remove_event_listener(host, &event, handler);
                    }
                }
            }
        }
        Ok(())
    }
}
