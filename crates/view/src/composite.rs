//! Keyed child sets for composite views.
//!
//! A composite view renders placeholder references to its children and lets
//! every child own and update its element independently, so updating one
//! child costs exactly one mutation.
//!
//! Invariants:
//! - Child order is render order.
//! - A child belongs to exactly one composite at a time (`Children` owns
//!   its views).
//! - Child ids derive from the composite's id and the child's key; keys are
//!   stable application identifiers, so reordering never re-targets a
//!   sibling. Two children claiming the same id is a fatal
//!   `DuplicateChildId`.

use crate::flush::FlushScheduler;
use crate::view::{View, ViewError};
use core_types::ElemId;
use vdom::Node;

/// Element id for the child at `key` inside the composite mounted at
/// `parent`.
pub fn derive_child_id(parent: &ElemId, key: &str) -> ElemId {
    ElemId::from(format!("{parent}-{key}"))
}

struct ChildSlot {
    key: String,
    view: Box<dyn View>,
}

/// Ordered, exclusively-owned child views, keyed for id derivation.
#[derive(Default)]
pub struct Children {
    slots: Vec<ChildSlot>,
}

impl Children {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slots.iter().any(|slot| slot.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|slot| slot.key.as_str())
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut (dyn View + '_)> {
        match self.slots.iter_mut().find(|slot| slot.key == key) {
            Some(slot) => Some(slot.view.as_mut()),
            None => None,
        }
    }

    /// Append a child at the end of the list. Duplicate keys would derive
    /// the same element id, which is a programmer error.
    pub fn insert(&mut self, key: impl Into<String>, view: Box<dyn View>) -> Result<(), ViewError> {
        let key = key.into();
        if self.contains(&key) {
            debug_assert!(false, "duplicate child key");
            return Err(ViewError::DuplicateChildId(ElemId::from(key)));
        }
        self.slots.push(ChildSlot { key, view });
        Ok(())
    }

    /// Mount every not-yet-mounted child at its derived id, in list order.
    /// Called from the composite's `render`.
    pub fn sync(&mut self, parent: &ElemId, sched: &mut FlushScheduler) -> Result<(), ViewError> {
        let mut derived: Vec<ElemId> = Vec::with_capacity(self.slots.len());
        for slot in &mut self.slots {
            let id = derive_child_id(parent, &slot.key);
            if derived.contains(&id) {
                debug_assert!(false, "duplicate derived child id");
                return Err(ViewError::DuplicateChildId(id));
            }
            derived.push(id.clone());
            if slot.view.state().is_mounted() {
                debug_assert_eq!(
                    slot.view.state().id(),
                    Some(&id),
                    "mounted child id must match its derivation"
                );
            } else {
                slot.view.mount(id, sched)?;
            }
        }
        Ok(())
    }

    /// Placeholder references to each mounted child, in list order. The
    /// composite's node carries these instead of inlined child markup;
    /// every child replaces its own placeholder independently.
    pub fn placeholders(&self) -> Result<Vec<Node>, ViewError> {
        let mut nodes = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            let Some(id) = slot.view.state().id() else {
                continue;
            };
            let node = Node::element(
                "div",
                vec![("id".to_string(), id.to_string())],
                Vec::new(),
            )?;
            nodes.push(node);
        }
        Ok(nodes)
    }

    /// Mounted child ids plus their own mounted descendants.
    pub fn descendant_ids(&self) -> Vec<ElemId> {
        let mut ids = Vec::new();
        for slot in &self.slots {
            if let Some(id) = slot.view.state().id() {
                ids.push(id.clone());
            }
            ids.extend(slot.view.mounted_descendants());
        }
        ids
    }

    /// Silently detach every child tree (no mutations queued).
    pub fn detach_all(&mut self) {
        for slot in &mut self.slots {
            slot.view.detach_tree();
        }
    }

    /// Remove one child: queues its Remove mutation and releases ownership
    /// of the view.
    pub fn remove_child(
        &mut self,
        key: &str,
        sched: &mut FlushScheduler,
    ) -> Result<Box<dyn View>, ViewError> {
        let position = self
            .slots
            .iter()
            .position(|slot| slot.key == key)
            .ok_or(ViewError::NotMounted)?;
        let mut slot = self.slots.remove(position);
        if slot.view.state().is_mounted() {
            slot.view.remove(sched)?;
        }
        Ok(slot.view)
    }

    /// Remove every child whose key is not in `desired`. Used by list
    /// composites reconciling against application state.
    pub fn remove_missing(
        &mut self,
        desired: &[String],
        sched: &mut FlushScheduler,
    ) -> Result<(), ViewError> {
        let stale: Vec<String> = self
            .slots
            .iter()
            .filter(|slot| !desired.iter().any(|key| *key == slot.key))
            .map(|slot| slot.key.clone())
            .collect();
        for key in stale {
            self.remove_child(&key, sched)?;
        }
        Ok(())
    }

    /// Reorder children to match `desired` key order. Keys absent from
    /// `desired` keep their relative order after the matched ones. Ids are
    /// key-derived, so reordering never re-targets a sibling's mutations.
    pub fn order_by(&mut self, desired: &[String]) {
        self.slots.sort_by_key(|slot| {
            desired
                .iter()
                .position(|key| *key == slot.key)
                .unwrap_or(usize::MAX)
        });
    }
}
