//! Immutable element descriptions.
//!
//! Invariants:
//! - A node is never mutated after construction; a render produces a fresh
//!   tree every time and equality is structural.
//! - Element tags are non-empty and expected to be canonical
//!   ASCII-lowercase.
//! - Attribute keys are unique within an element; construction applies
//!   map insert/overwrite semantics (last value wins, first position kept).

use std::fmt;

#[derive(Debug, PartialEq, Eq)]
pub enum NodeError {
    InvalidTag,
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeError::InvalidTag => write!(f, "element tag must be non-empty"),
        }
    }
}

impl std::error::Error for NodeError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        children: Vec<Node>,
    },
    Text(String),
}

impl Node {
    pub fn element(
        tag: impl Into<String>,
        attributes: Vec<(String, String)>,
        children: Vec<Node>,
    ) -> Result<Node, NodeError> {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(NodeError::InvalidTag);
        }
        debug_assert!(
            tag.bytes().all(|b| !b.is_ascii_uppercase()),
            "element tags are canonical ASCII-lowercase"
        );

        let mut unique: Vec<(String, String)> = Vec::with_capacity(attributes.len());
        for (key, value) in attributes {
            match unique.iter_mut().find(|(existing, _)| *existing == key) {
                Some(slot) => slot.1 = value,
                None => unique.push((key, value)),
            }
        }

        Ok(Node::Element {
            tag,
            attributes: unique,
            children,
        })
    }

    pub fn text(text: impl Into<String>) -> Node {
        Node::Text(text.into())
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Node::Element { tag, .. } => Some(tag),
            Node::Text(_) => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            Node::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            Node::Text(_) => None,
        }
    }

    /// The element's `id` attribute, when present.
    pub fn id_attr(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element { children, .. } => children,
            Node::Text(_) => &[],
        }
    }
}

/// Convenience for building attribute lists from string literals.
pub fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}
