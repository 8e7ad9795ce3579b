//! Application wiring.
//!
//! Startup order matters: state loads first, the scheduler and its
//! pre-flush hook are installed next, then the root composite mounts and
//! its node is attached under the host container. Only then may flushes
//! run.

use crate::dom_tree::DomTree;
use crate::reltime::RelTimeRegistry;
use crate::state::{PageState, StateRef};
use crate::views::PageView;
use core_types::{ElemId, UnixSeconds};
use input_policy::{Button, ClickTarget, Modifiers, Verdict};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use view::{ApplyError, FlushReport, FlushScheduler, View, ViewError};

#[derive(Debug)]
pub enum ClientError {
    View(ViewError),
    Apply(ApplyError),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::View(err) => write!(f, "view error: {err}"),
            ClientError::Apply(err) => write!(f, "attach error: {err}"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::View(err) => Some(err),
            ClientError::Apply(err) => Some(err),
        }
    }
}

impl From<ViewError> for ClientError {
    fn from(err: ViewError) -> Self {
        ClientError::View(err)
    }
}

impl From<ApplyError> for ClientError {
    fn from(err: ApplyError) -> Self {
        ClientError::Apply(err)
    }
}

pub struct Client {
    page: StateRef,
    reltime: Rc<RefCell<RelTimeRegistry>>,
    sched: FlushScheduler,
    dom: DomTree,
    root: PageView,
}

impl Client {
    /// Root view element id.
    pub const ROOT_ID: &'static str = "page";
    /// Host container the root node attaches under.
    pub const CONTAINER_ID: &'static str = "threads";

    /// Mount the full page against already-loaded state and attach it to
    /// the host tree. The first flush is requested but not yet run.
    pub fn boot(state: PageState, now: UnixSeconds) -> Result<Self, ClientError> {
        let page = state.shared();
        let reltime = RelTimeRegistry::new(now).shared();

        let mut sched = FlushScheduler::new();
        RelTimeRegistry::install(Rc::clone(&reltime), &mut sched);

        let mut root = PageView::new(Rc::clone(&page), Rc::clone(&reltime))?;
        let node = root.init_as_root(ElemId::from(Self::ROOT_ID), &mut sched)?;

        let mut dom = DomTree::new(ElemId::from(Self::CONTAINER_ID));
        dom.attach_root(&node)?;
        sched.request_flush();

        log::info!(
            target: "client.app",
            "booted /{}/ with {} threads",
            page.borrow().board,
            page.borrow().threads.len()
        );
        Ok(Self {
            page,
            reltime,
            sched,
            dom,
            root,
        })
    }

    pub fn page(&self) -> &StateRef {
        &self.page
    }

    pub fn root_mut(&mut self) -> &mut PageView {
        &mut self.root
    }

    pub fn scheduler(&self) -> &FlushScheduler {
        &self.sched
    }

    pub fn scheduler_mut(&mut self) -> &mut FlushScheduler {
        &mut self.sched
    }

    pub fn dom(&self) -> &DomTree {
        &self.dom
    }

    /// Advance the clock the relative-time hook reads.
    pub fn set_now(&mut self, now: UnixSeconds) {
        self.reltime.borrow_mut().set_now(now);
    }

    /// Run one flush cycle against the host tree.
    pub fn flush(&mut self) -> FlushReport {
        self.sched.run_flush(&mut self.dom)
    }

    /// Flush only when one was requested this tick.
    pub fn flush_if_requested(&mut self) -> Option<FlushReport> {
        self.sched.flush_requested().then(|| self.flush())
    }

    /// Re-render a named top-level component.
    pub fn update_child(&mut self, key: &str) -> Result<(), ClientError> {
        let Some(child) = self.root.child_mut(key) else {
            return Err(ClientError::View(ViewError::NotMounted));
        };
        child.update(&mut self.sched)?;
        Ok(())
    }

    pub fn snapshot(&self) -> String {
        self.dom.snapshot()
    }

    /// Delegated-click policy, consulted by the host event layer.
    pub fn on_click(
        &self,
        button: Button,
        modifiers: Modifiers,
        target: &ClickTarget,
    ) -> Verdict {
        input_policy::decide_click(button, modifiers, target)
    }

    /// Delegated form-submission policy.
    pub fn on_submit(&self) -> Verdict {
        input_policy::decide_submit()
    }
}
