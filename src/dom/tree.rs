//! The element arena and its structural edits.

use std::collections::VecDeque;
use std::iter;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{NodeData, NodeId, DATA_REF};

/// Every element of one application, stored in a slotmap.
///
/// Links live beside the data: `kids` holds ordered child lists and `up`
/// holds parent pointers. Both are keyed by the same [`NodeId`], so a
/// subtree is dropped by walking its ids once.
#[derive(Debug, Clone, Default)]
pub struct Dom {
    pub(crate) nodes: SlotMap<NodeId, NodeData>,
    kids: SecondaryMap<NodeId, Vec<NodeId>>,
    up: SecondaryMap<NodeId, NodeId>,
    root: Option<NodeId>,
}

impl Dom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element with no parent. The first such element becomes the root.
    ///
    /// The stored data gets a `data-ref` attribute equal to
    /// [`NodeId::data_ref`], overwriting any value the caller set.
    pub fn insert(&mut self, data: NodeData) -> NodeId {
        let id = self.allocate(data);
        self.root.get_or_insert(id);
        id
    }

    /// Append an element under `parent`, tagged with `data-ref` like [`insert`](Self::insert).
    ///
    /// `None` when `parent` is not in the arena; nothing is added then.
    pub fn insert_child(&mut self, parent: NodeId, data: NodeData) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        let id = self.allocate(data);
        self.attach(id, parent);
        Some(id)
    }

    fn allocate(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        if let Some(node) = self.nodes.get_mut(id) {
            node.attributes.insert(DATA_REF.to_owned(), id.data_ref());
        }
        self.kids.insert(id, Vec::new());
        id
    }

    fn attach(&mut self, id: NodeId, parent: NodeId) {
        self.up.insert(id, parent);
        if let Some(list) = self.kids.get_mut(parent) {
            list.push(id);
        }
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.up.remove(id) else {
            return;
        };
        if let Some(list) = self.kids.get_mut(parent) {
            list.retain(|&kid| kid != id);
        }
    }

    /// Drop `id` together with everything below it and hand back its data.
    pub fn remove(&mut self, id: NodeId) -> Option<NodeData> {
        if !self.contains(id) {
            return None;
        }
        self.detach(id);
        if self.root == Some(id) {
            self.root = None;
        }

        let mut pending = VecDeque::from([id]);
        let mut top = None;
        while let Some(next) = pending.pop_front() {
            pending.extend(self.kids.remove(next).unwrap_or_default());
            self.up.remove(next);
            let data = self.nodes.remove(next);
            if next == id {
                top = data;
            }
        }
        top
    }

    /// Move `node` and its subtree to the end of `new_parent`'s children.
    ///
    /// Refused (returns `false`, tree untouched) when either id is unknown or
    /// when `new_parent` lies inside the subtree being moved.
    pub fn reparent(&mut self, node: NodeId, new_parent: NodeId) -> bool {
        let known = self.contains(node) && self.contains(new_parent);
        if !known || node == new_parent || self.ancestors(new_parent).contains(&node) {
            return false;
        }
        self.detach(node);
        self.attach(node, new_parent);
        true
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.up.get(id).copied()
    }

    /// Ordered children; empty for leaves and unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.kids.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Parent first, then grandparent, up to the top. Excludes `id`.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        iter::successors(self.parent(id), |&above| self.parent(above)).collect()
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// `start` and its descendants in document (pre-)order.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            if self.contains(id) {
                order.push(id);
                stack.extend(self.children(id).iter().rev());
            }
        }
        order
    }
}
