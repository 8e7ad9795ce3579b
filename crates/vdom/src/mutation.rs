//! Deferred DOM operations and the per-tick coalescing queue.
//!
//! Views never touch the DOM directly; they enqueue mutations here and a
//! flush later applies the batch in order.
//!
//! Invariants:
//! - Mutations target one element id each and are applied in the order
//!   their target ids were first touched during the tick.
//! - Per target id and tick the queue holds at most one net mutation per
//!   kind: attribute and text writes overwrite earlier ones, a replace
//!   supersedes everything pending for that id, a remove nets the entry
//!   to a single `Remove`.
//! - Coalescing is unobservable: applying the drained batch must be
//!   behaviorally equivalent to applying every enqueued mutation
//!   individually and redundantly.
//! - `cancel` forgets an id entirely, including its first-touch position.

use crate::node::Node;
use core_types::ElemId;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq)]
pub enum Mutation {
    /// Replace the target element and its whole subtree with `node`.
    /// The payload is captured at enqueue time and immutable.
    ReplaceSubtree { target: ElemId, node: Node },
    SetAttribute {
        target: ElemId,
        name: String,
        value: String,
    },
    /// Replace the target element's content with a single text node.
    SetText { target: ElemId, text: String },
    /// Detach the target element and its subtree.
    Remove { target: ElemId },
}

impl Mutation {
    pub fn target(&self) -> &ElemId {
        match self {
            Mutation::ReplaceSubtree { target, .. }
            | Mutation::SetAttribute { target, .. }
            | Mutation::SetText { target, .. }
            | Mutation::Remove { target } => target,
        }
    }
}

#[derive(Debug, Default)]
struct Pending {
    replace: Option<Node>,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    removed: bool,
}

#[derive(Debug, Default)]
pub struct MutationQueue {
    /// Target ids in first-touch order.
    order: Vec<ElemId>,
    pending: HashMap<ElemId, Pending>,
}

impl MutationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending_targets(&self) -> usize {
        self.pending.len()
    }

    pub fn has_pending(&self, target: &ElemId) -> bool {
        self.pending.contains_key(target)
    }

    fn entry(&mut self, target: &ElemId) -> &mut Pending {
        if !self.pending.contains_key(target) {
            self.order.push(target.clone());
        }
        self.pending.entry(target.clone()).or_default()
    }

    /// Queue a subtree replacement, discarding any earlier pending mutation
    /// for the id; the replace already captures the element's final state.
    pub fn push_replace(&mut self, target: &ElemId, node: &Node) {
        log::trace!(target: "vdom.queue", "replace <{}>", target);
        let entry = self.entry(target);
        entry.replace = Some(node.clone());
        entry.attributes.clear();
        entry.text = None;
        entry.removed = false;
    }

    /// Queue an attribute write. Merged map-style with pending writes;
    /// a no-op when a replace or remove is already pending for the id.
    pub fn push_attribute(&mut self, target: &ElemId, name: &str, value: &str) {
        let entry = self.entry(target);
        if entry.removed || entry.replace.is_some() {
            return;
        }
        match entry
            .attributes
            .iter_mut()
            .find(|(existing, _)| existing == name)
        {
            Some(slot) => slot.1 = value.to_string(),
            None => entry.attributes.push((name.to_string(), value.to_string())),
        }
    }

    /// Queue a text write. Last write wins; a no-op when a replace or
    /// remove is already pending for the id.
    pub fn push_text(&mut self, target: &ElemId, text: &str) {
        let entry = self.entry(target);
        if entry.removed || entry.replace.is_some() {
            return;
        }
        entry.text = Some(text.to_string());
    }

    /// Queue removal of the element; nets the entry to a single `Remove`.
    pub fn push_remove(&mut self, target: &ElemId) {
        log::trace!(target: "vdom.queue", "remove <{}>", target);
        let entry = self.entry(target);
        entry.removed = true;
        entry.replace = None;
        entry.attributes.clear();
        entry.text = None;
    }

    /// Drop everything pending for an id, including its first-touch
    /// position. Used when the owning view is discarded before the flush
    /// so no stale mutation survives it.
    pub fn cancel(&mut self, target: &ElemId) {
        if self.pending.remove(target).is_some() {
            self.order.retain(|id| id != target);
            log::trace!(target: "vdom.queue", "cancel <{}>", target);
        }
    }

    /// Return and clear all pending mutations, in first-touch target order.
    pub fn drain(&mut self) -> Vec<Mutation> {
        let mut batch = Vec::with_capacity(self.pending.len());
        for target in self.order.drain(..) {
            let Some(entry) = self.pending.remove(&target) else {
                debug_assert!(false, "order and pending must stay in sync");
                continue;
            };
            if entry.removed {
                batch.push(Mutation::Remove { target });
                continue;
            }
            if let Some(node) = entry.replace {
                batch.push(Mutation::ReplaceSubtree {
                    target: target.clone(),
                    node,
                });
            }
            for (name, value) in entry.attributes {
                batch.push(Mutation::SetAttribute {
                    target: target.clone(),
                    name,
                    value,
                });
            }
            if let Some(text) = entry.text {
                batch.push(Mutation::SetText { target, text });
            }
        }
        debug_assert!(self.pending.is_empty(), "drain must consume every entry");
        log::trace!(target: "vdom.queue", "drained {} mutations", batch.len());
        batch
    }
}
