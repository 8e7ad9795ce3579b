//! Retained stand-in for the live DOM.
//!
//! The host environment owns one tree under a single named container
//! element; drained mutations are applied here in batch order. Elements
//! are addressable by their `id` attribute, exactly like the real DOM;
//! a mutation targeting an id that is not in the tree is a recoverable
//! apply failure, not a crash.
//!
//! Composite views describe their children as empty placeholder elements
//! carrying only an id. Two rules keep child subtrees consistent without
//! any cooperation from the queue:
//! - A placeholder whose element already lives in the subtree being
//!   replaced grafts the live element back in, so a parent re-render
//!   never clobbers children that did not re-render themselves.
//! - A replace whose target id does not exist yet is deferred and
//!   resolved the moment its placeholder is created, so a child mounted
//!   in the same tick as its parent's re-render lands intact whichever
//!   order the batch drains in.
//!
//! Invariants:
//! - Mutations are applied in the order drained.
//! - Replacing a subtree drops every id index entry under the old subtree
//!   (grafted children excepted) and indexes the new one.
//! - Arena slots are never reused; detached records simply become
//!   unreachable.

use core_types::ElemId;
use std::collections::HashMap;
use vdom::{Mutation, Node, render_html};
use view::{ApplyError, DomSink};

pub struct DomTree {
    nodes: Vec<Rec>,
    by_id: HashMap<ElemId, usize>,
    /// Replaces waiting for their placeholder to appear.
    orphans: HashMap<ElemId, Node>,
    container: usize,
}

struct Rec {
    kind: RecKind,
    parent: Option<usize>,
    children: Vec<usize>,
}

enum RecKind {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
}

impl DomTree {
    /// Create the tree with its single named container element (the
    /// "threads" section in the discussion-board page shell).
    pub fn new(container: ElemId) -> Self {
        let root = Rec {
            kind: RecKind::Element {
                tag: "section".to_string(),
                attributes: vec![("id".to_string(), container.to_string())],
            },
            parent: None,
            children: Vec::new(),
        };
        let mut by_id = HashMap::new();
        by_id.insert(container, 0);
        Self {
            nodes: vec![root],
            by_id,
            orphans: HashMap::new(),
            container: 0,
        }
    }

    pub fn contains(&self, id: &ElemId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Attach the root view's node under the container, replacing whatever
    /// was attached before.
    pub fn attach_root(&mut self, node: &Node) -> Result<(), ApplyError> {
        let container = self.container;
        for child in std::mem::take(&mut self.nodes[container].children) {
            self.unindex_subtree(child);
        }
        let grafts = HashMap::new();
        let idx = self.build_subtree(node, Some(container), &grafts);
        self.nodes[container].children.push(idx);
        log::debug!(target: "client.dom", "attached root {:?}", node.id_attr());
        Ok(())
    }

    /// Serialize the container element and everything under it.
    pub fn snapshot(&self) -> String {
        render_html(&self.materialize(self.container))
    }

    /// Serialize one element by id.
    pub fn element_html(&self, id: &ElemId) -> Option<String> {
        let idx = *self.by_id.get(id)?;
        Some(render_html(&self.materialize(idx)))
    }

    fn lookup(&self, target: &ElemId) -> Result<usize, ApplyError> {
        self.by_id.get(target).copied().ok_or_else(|| {
            ApplyError::new(target.clone(), "no element with this id in the live tree")
        })
    }

    fn index(&mut self, id: ElemId, idx: usize) {
        let previous = self.by_id.insert(id.clone(), idx);
        debug_assert!(
            previous.is_none(),
            "duplicate element id <{id}> in the live tree"
        );
        if previous.is_some() {
            log::warn!(target: "client.dom", "duplicate element id <{id}>; later element wins");
        }
    }

    fn rec_id_attr(&self, idx: usize) -> Option<ElemId> {
        match &self.nodes[idx].kind {
            RecKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key == "id")
                .map(|(_, value)| ElemId::from(value.as_str())),
            RecKind::Text(_) => None,
        }
    }

    fn unindex_subtree(&mut self, idx: usize) {
        if let Some(id) = self.rec_id_attr(idx) {
            if self.by_id.get(&id) == Some(&idx) {
                self.by_id.remove(&id);
            }
        }
        let children = self.nodes[idx].children.clone();
        for child in children {
            self.unindex_subtree(child);
        }
    }

    fn is_descendant_of(&self, idx: usize, ancestor: usize) -> bool {
        let mut current = idx;
        while let Some(parent) = self.nodes[current].parent {
            if parent == ancestor {
                return true;
            }
            current = parent;
        }
        false
    }

    /// A placeholder is an empty element whose only job is to reference a
    /// child view's id.
    fn placeholder_id(node: &Node) -> Option<ElemId> {
        if node.children().is_empty() {
            node.id_attr().map(ElemId::from)
        } else {
            None
        }
    }

    /// Live elements, inside the subtree being replaced, that the new
    /// node references as placeholders. They survive the replace.
    fn collect_grafts(&self, node: &Node, within: usize, out: &mut HashMap<ElemId, usize>) {
        if let Some(id) = Self::placeholder_id(node) {
            if let Some(&existing) = self.by_id.get(&id) {
                if existing != within && self.is_descendant_of(existing, within) {
                    out.insert(id, existing);
                }
            }
        }
        for child in node.children() {
            self.collect_grafts(child, within, out);
        }
    }

    fn build_subtree(
        &mut self,
        node: &Node,
        parent: Option<usize>,
        grafts: &HashMap<ElemId, usize>,
    ) -> usize {
        if let Some(id) = Self::placeholder_id(node) {
            if let Some(&grafted) = grafts.get(&id) {
                self.nodes[grafted].parent = parent;
                return grafted;
            }
            if let Some(stashed) = self.orphans.remove(&id) {
                log::debug!(target: "client.dom", "resolving deferred replace for <{id}>");
                return self.build_subtree(&stashed, parent, grafts);
            }
        }
        let idx = self.nodes.len();
        match node {
            Node::Element {
                tag, attributes, ..
            } => {
                self.nodes.push(Rec {
                    kind: RecKind::Element {
                        tag: tag.clone(),
                        attributes: attributes.clone(),
                    },
                    parent,
                    children: Vec::new(),
                });
                if let Some(id) = node.id_attr() {
                    self.index(ElemId::from(id), idx);
                }
                for child in node.children() {
                    let child_idx = self.build_subtree(child, Some(idx), grafts);
                    self.nodes[idx].children.push(child_idx);
                }
            }
            Node::Text(text) => {
                self.nodes.push(Rec {
                    kind: RecKind::Text(text.clone()),
                    parent,
                    children: Vec::new(),
                });
            }
        }
        idx
    }

    fn materialize(&self, idx: usize) -> Node {
        match &self.nodes[idx].kind {
            RecKind::Element { tag, attributes } => Node::Element {
                tag: tag.clone(),
                attributes: attributes.clone(),
                children: self.nodes[idx]
                    .children
                    .iter()
                    .map(|child| self.materialize(*child))
                    .collect(),
            },
            RecKind::Text(text) => Node::Text(text.clone()),
        }
    }

    fn apply_replace(&mut self, target: &ElemId, node: &Node) -> Result<(), ApplyError> {
        let Ok(idx) = self.lookup(target) else {
            // The placeholder may be created later in this very batch; the
            // queue only guarantees equivalence with redundant individual
            // application, so defer instead of dropping the subtree.
            log::debug!(target: "client.dom", "deferring replace for absent <{target}>");
            self.orphans.insert(target.clone(), node.clone());
            return Ok(());
        };
        let Node::Element {
            tag, attributes, ..
        } = node
        else {
            return Err(ApplyError::new(
                target.clone(),
                "replace payload must be an element",
            ));
        };

        let mut grafts = HashMap::new();
        self.collect_grafts(node, idx, &mut grafts);
        for &grafted in grafts.values() {
            if let Some(parent) = self.nodes[grafted].parent.take() {
                self.nodes[parent].children.retain(|child| *child != grafted);
            }
        }

        self.unindex_subtree(idx);
        self.nodes[idx].kind = RecKind::Element {
            tag: tag.clone(),
            attributes: attributes.clone(),
        };
        self.nodes[idx].children.clear();
        if let Some(id) = node.id_attr() {
            self.index(ElemId::from(id), idx);
        }
        for child in node.children() {
            let child_idx = self.build_subtree(child, Some(idx), &grafts);
            self.nodes[idx].children.push(child_idx);
        }
        Ok(())
    }

    fn apply_set_attribute(
        &mut self,
        target: &ElemId,
        name: &str,
        value: &str,
    ) -> Result<(), ApplyError> {
        let idx = self.lookup(target)?;
        match &mut self.nodes[idx].kind {
            RecKind::Element { attributes, .. } => {
                match attributes.iter_mut().find(|(key, _)| key == name) {
                    Some(slot) => slot.1 = value.to_string(),
                    None => attributes.push((name.to_string(), value.to_string())),
                }
            }
            RecKind::Text(_) => {
                return Err(ApplyError::new(target.clone(), "target is not an element"));
            }
        }
        if name == "id" {
            self.by_id.remove(target);
            self.by_id.insert(ElemId::from(value), idx);
        }
        Ok(())
    }

    fn apply_set_text(&mut self, target: &ElemId, text: &str) -> Result<(), ApplyError> {
        let idx = self.lookup(target)?;
        if matches!(self.nodes[idx].kind, RecKind::Text(_)) {
            return Err(ApplyError::new(target.clone(), "target is not an element"));
        }
        for child in std::mem::take(&mut self.nodes[idx].children) {
            self.unindex_subtree(child);
        }
        let text_idx = self.nodes.len();
        self.nodes.push(Rec {
            kind: RecKind::Text(text.to_string()),
            parent: Some(idx),
            children: Vec::new(),
        });
        self.nodes[idx].children.push(text_idx);
        Ok(())
    }

    fn apply_remove(&mut self, target: &ElemId) -> Result<(), ApplyError> {
        // A deferred replace for a removed id must not resurrect it.
        self.orphans.remove(target);
        let idx = self.lookup(target)?;
        if idx == self.container {
            return Err(ApplyError::new(
                target.clone(),
                "cannot remove the root container",
            ));
        }
        self.unindex_subtree(idx);
        if let Some(parent) = self.nodes[idx].parent.take() {
            self.nodes[parent].children.retain(|child| *child != idx);
        }
        Ok(())
    }
}

impl DomSink for DomTree {
    fn apply(&mut self, mutation: &Mutation) -> Result<(), ApplyError> {
        log::trace!(target: "client.dom", "apply to <{}>", mutation.target());
        match mutation {
            Mutation::ReplaceSubtree { target, node } => self.apply_replace(target, node),
            Mutation::SetAttribute {
                target,
                name,
                value,
            } => self.apply_set_attribute(target, name, value),
            Mutation::SetText { target, text } => self.apply_set_text(target, text),
            Mutation::Remove { target } => self.apply_remove(target),
        }
    }
}
