//! DOM queries: by id, class, tag, predicate, and CSS selector.

use crate::css::model::{Combinator, CompoundSelector, Selector, SelectorComponent, SelectorPart};

use super::node::{NodeData, NodeId, DATA_REF};
use super::tree::Dom;

impl Dom {
    /// Find the first node whose `id` field matches the given string.
    ///
    /// Iterates all nodes in the arena (not just the tree rooted at `root`).
    pub fn query_by_id(&self, id: &str) -> Option<NodeId> {
        self.iter_nodes()
            .find(|(_, data)| data.id.as_deref() == Some(id))
            .map(|(node_id, _)| node_id)
    }

    /// Find all nodes that have the given CSS class.
    pub fn query_by_class(&self, class: &str) -> Vec<NodeId> {
        self.query_all(|data| data.has_class(class))
    }

    /// Find all nodes with the given tag.
    pub fn query_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.query_all(|data| data.tag == tag)
    }

    /// Find all nodes matching an arbitrary predicate.
    pub fn query_all(&self, predicate: impl Fn(&NodeData) -> bool) -> Vec<NodeId> {
        self.iter_nodes()
            .filter(|(_, data)| predicate(data))
            .map(|(node_id, _)| node_id)
            .collect()
    }

    /// Find all nodes matched by `selector`, in arena order.
    pub fn query(&self, selector: &Selector) -> Vec<NodeId> {
        self.iter_nodes()
            .map(|(node_id, _)| node_id)
            .filter(|&node_id| self.matches(selector, node_id))
            .collect()
    }

    /// Whether `selector` matches `node_id`.
    ///
    /// The rightmost compound must match the node itself; each combinator to
    /// its left constrains the parent (`>`) or some ancestor (whitespace).
    pub fn matches(&self, selector: &Selector, node_id: NodeId) -> bool {
        let parts = selector.parts();
        match parts.last() {
            Some(SelectorPart::Compound(_)) => self.matches_from(parts, parts.len() - 1, node_id),
            _ => false,
        }
    }

    /// Match `parts[..=idx]` with `parts[idx]` (a compound) applied to `node_id`.
    fn matches_from(&self, parts: &[SelectorPart], idx: usize, node_id: NodeId) -> bool {
        let SelectorPart::Compound(compound) = &parts[idx] else {
            return false;
        };
        if !self.matches_compound(compound, node_id) {
            return false;
        }
        if idx == 0 {
            return true;
        }
        if idx < 2 {
            return false;
        }
        let next = idx - 2;
        match &parts[idx - 1] {
            SelectorPart::Combinator(Combinator::Child) => self
                .parent(node_id)
                .is_some_and(|parent| self.matches_from(parts, next, parent)),
            // Try every ancestor so a near match that fails further left does
            // not hide a farther one that succeeds.
            SelectorPart::Combinator(Combinator::Descendant) => self
                .ancestors(node_id)
                .into_iter()
                .any(|ancestor| self.matches_from(parts, next, ancestor)),
            SelectorPart::Compound(_) => false,
        }
    }

    fn matches_compound(&self, compound: &CompoundSelector, node_id: NodeId) -> bool {
        let Some(node) = self.get(node_id) else {
            return false;
        };
        compound.components.iter().all(|component| match component {
            SelectorComponent::Tag(tag) => node.tag == *tag,
            SelectorComponent::Universal => true,
            SelectorComponent::Class(class) => node.has_class(class),
            SelectorComponent::Id(id) => node.id.as_deref() == Some(id.as_str()),
            SelectorComponent::Element(target) => {
                node.attribute(DATA_REF) == Some(target.data_ref().as_str())
            }
            SelectorComponent::PseudoClass(name) => self.matches_pseudo(name, node_id),
        })
    }

    /// Structural pseudo-classes only; dynamic ones (`:hover`, `:focus`)
    /// depend on the host and never match here.
    fn matches_pseudo(&self, name: &str, node_id: NodeId) -> bool {
        let siblings = self.parent(node_id).map(|parent| self.children(parent));
        match name {
            "root" => self.parent(node_id).is_none(),
            "empty" => self.children(node_id).is_empty(),
            "first-child" => siblings.is_some_and(|s| s.first() == Some(&node_id)),
            "last-child" => siblings.is_some_and(|s| s.last() == Some(&node_id)),
            "only-child" => siblings.is_some_and(|s| s.len() == 1),
            _ => false,
        }
    }

    /// Iterate over all `(NodeId, &NodeData)` pairs in the arena.
    ///
    /// Slotmap order: deterministic but not tree order.
    fn iter_nodes(&self) -> impl Iterator<Item = (NodeId, &NodeData)> {
        self.nodes.iter()
    }
}
