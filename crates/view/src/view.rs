//! View lifecycle.
//!
//! A view owns one DOM element id and a render function; its only side
//! effects are queued mutations. Lifecycle:
//! created → `mount` (id assigned) → `update`* → `remove` (id invalidated).
//!
//! Invariants:
//! - An id, once assigned, is immutable until `remove`.
//! - `mount` twice without an intervening `remove` is a contract error.
//! - `render` derives output from the view's own state only; it must not
//!   touch sibling views. The scheduler parameter exists so composite
//!   renders can mount their children.

use crate::flush::FlushScheduler;
use core_types::ElemId;
use std::fmt;
use vdom::{Node, NodeError};

#[derive(Debug)]
pub enum ViewError {
    AlreadyMounted(ElemId),
    NotMounted,
    DuplicateChildId(ElemId),
    BadNode(NodeError),
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::AlreadyMounted(id) => write!(f, "view already mounted at <{id}>"),
            ViewError::NotMounted => write!(f, "view is not mounted"),
            ViewError::DuplicateChildId(id) => {
                write!(f, "two children derive the same element id <{id}>")
            }
            ViewError::BadNode(err) => write!(f, "render produced an invalid node: {err}"),
        }
    }
}

impl std::error::Error for ViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewError::BadNode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NodeError> for ViewError {
    fn from(err: NodeError) -> Self {
        ViewError::BadNode(err)
    }
}

#[derive(Debug, Default)]
pub struct ViewState {
    id: Option<ElemId>,
    mounted: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<&ElemId> {
        self.id.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub(crate) fn attach(&mut self, id: ElemId) -> Result<(), ViewError> {
        if self.mounted {
            debug_assert!(self.id.is_some(), "mounted view must hold an id");
            let held = self.id.clone().unwrap_or_else(|| id.clone());
            return Err(ViewError::AlreadyMounted(held));
        }
        self.id = Some(id);
        self.mounted = true;
        Ok(())
    }

    /// Mark the view unmounted and invalidate its id. Enqueues nothing;
    /// callers are responsible for the Remove mutation when one is due.
    pub fn detach(&mut self) {
        self.id = None;
        self.mounted = false;
    }
}

pub trait View {
    fn state(&self) -> &ViewState;
    fn state_mut(&mut self) -> &mut ViewState;

    /// Compute this view's current markup from its own state.
    fn render(&mut self, sched: &mut FlushScheduler) -> Result<Node, ViewError>;

    /// Element ids of every mounted descendant view. Leaf views have none;
    /// composites report their mounted children recursively.
    fn mounted_descendants(&self) -> Vec<ElemId> {
        Vec::new()
    }

    /// Silently mark this view tree unmounted, without enqueueing
    /// mutations. Composites forward to their children first.
    fn detach_tree(&mut self) {
        self.state_mut().detach();
    }

    /// Attach the view at `id`, render it and queue the initial
    /// replace-subtree mutation.
    fn mount(&mut self, id: ElemId, sched: &mut FlushScheduler) -> Result<(), ViewError> {
        self.state_mut().attach(id.clone())?;
        log::debug!(target: "view.lifecycle", "mount <{id}>");
        let node = self.render(sched)?;
        sched.queue_mut().push_replace(&id, &node);
        sched.request_flush();
        Ok(())
    }

    /// Re-render and queue a replace-subtree mutation for the view's id.
    fn update(&mut self, sched: &mut FlushScheduler) -> Result<(), ViewError> {
        if !self.state().is_mounted() {
            return Err(ViewError::NotMounted);
        }
        let Some(id) = self.state().id().cloned() else {
            debug_assert!(false, "mounted view must hold an id");
            return Err(ViewError::NotMounted);
        };
        let node = self.render(sched)?;
        sched.queue_mut().push_replace(&id, &node);
        sched.request_flush();
        Ok(())
    }

    /// Queue removal of the view's element. Pending mutations for
    /// descendants are cancelled so no stale mutation outlives its owner.
    fn remove(&mut self, sched: &mut FlushScheduler) -> Result<(), ViewError> {
        if !self.state().is_mounted() {
            return Err(ViewError::NotMounted);
        }
        let Some(id) = self.state().id().cloned() else {
            debug_assert!(false, "mounted view must hold an id");
            return Err(ViewError::NotMounted);
        };
        log::debug!(target: "view.lifecycle", "remove <{id}>");
        for descendant in self.mounted_descendants() {
            sched.queue_mut().cancel(&descendant);
        }
        self.detach_tree();
        sched.queue_mut().push_remove(&id);
        sched.request_flush();
        Ok(())
    }

    /// First mount of a root view and all of its descendants. Returns the
    /// root node for the host to attach; no replace is queued for the root
    /// itself.
    fn init_as_root(
        &mut self,
        root_id: ElemId,
        sched: &mut FlushScheduler,
    ) -> Result<Node, ViewError> {
        self.state_mut().attach(root_id.clone())?;
        log::debug!(target: "view.lifecycle", "init root <{root_id}>");
        self.render(sched)
    }
}
