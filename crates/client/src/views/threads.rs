use crate::reltime::{RelTimeRegistry, format_ago};
use crate::state::StateRef;
use core_types::ElemId;
use std::cell::RefCell;
use std::rc::Rc;
use vdom::{Node, attrs};
use view::{Children, FlushScheduler, View, ViewError, ViewState};

/// One thread entry in the board index.
pub struct ThreadView {
    state: ViewState,
    page: StateRef,
    reltime: Rc<RefCell<RelTimeRegistry>>,
    thread_id: u64,
}

impl ThreadView {
    pub fn new(page: StateRef, reltime: Rc<RefCell<RelTimeRegistry>>, thread_id: u64) -> Self {
        Self {
            state: ViewState::new(),
            page,
            reltime,
            thread_id,
        }
    }

    fn time_elem_id(&self) -> Option<ElemId> {
        self.state
            .id()
            .map(|id| ElemId::from(format!("{id}-time")))
    }
}

impl View for ThreadView {
    fn state(&self) -> &ViewState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ViewState {
        &mut self.state
    }

    fn render(&mut self, _sched: &mut FlushScheduler) -> Result<Node, ViewError> {
        let Some(id) = self.state.id().map(ElemId::to_string) else {
            return Err(ViewError::NotMounted);
        };
        let page = self.page.borrow();
        let Some(thread) = page.thread(self.thread_id) else {
            // The thread left the page state between reconciliation and
            // render; show a tombstone until the parent drops this child.
            return Ok(Node::element(
                "article",
                attrs(&[("id", &id), ("class", "thread deleted")]),
                Vec::new(),
            )?);
        };

        let time_id = format!("{id}-time");
        let mut reltime = self.reltime.borrow_mut();
        reltime.register(ElemId::from(time_id.as_str()), thread.time);
        let age = reltime.now().saturating_sub(thread.time);

        Ok(Node::element(
            "article",
            attrs(&[("id", &id), ("class", "thread")]),
            vec![
                Node::element("h3", Vec::new(), vec![Node::text(thread.subject.clone())])?,
                Node::element(
                    "time",
                    attrs(&[("id", &time_id)]),
                    vec![Node::text(format_ago(age))],
                )?,
                Node::element(
                    "span",
                    attrs(&[("class", "counts")]),
                    vec![Node::text(format!(
                        "{} replies, {} images",
                        thread.post_count, thread.image_count
                    ))],
                )?,
            ],
        )?)
    }

    fn mounted_descendants(&self) -> Vec<ElemId> {
        // The time element belongs to this view; pending refreshes must
        // not outlive it.
        self.time_elem_id().into_iter().collect()
    }

    fn detach_tree(&mut self) {
        if let Some(time_id) = self.time_elem_id() {
            self.reltime.borrow_mut().unregister(&time_id);
        }
        self.state_mut().detach();
    }
}

/// Board index: one child view per thread in page state, keyed by thread
/// id so reordering never re-targets a sibling.
pub struct ThreadListView {
    state: ViewState,
    page: StateRef,
    reltime: Rc<RefCell<RelTimeRegistry>>,
    children: Children,
}

impl ThreadListView {
    pub fn new(page: StateRef, reltime: Rc<RefCell<RelTimeRegistry>>) -> Self {
        Self {
            state: ViewState::new(),
            page,
            reltime,
            children: Children::new(),
        }
    }

    pub fn thread_mut(&mut self, thread_id: u64) -> Option<&mut dyn View> {
        self.children.get_mut(&thread_id.to_string())
    }

    pub fn remove_thread(
        &mut self,
        thread_id: u64,
        sched: &mut FlushScheduler,
    ) -> Result<(), ViewError> {
        self.children
            .remove_child(&thread_id.to_string(), sched)
            .map(drop)
    }
}

impl View for ThreadListView {
    fn state(&self) -> &ViewState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ViewState {
        &mut self.state
    }

    fn render(&mut self, sched: &mut FlushScheduler) -> Result<Node, ViewError> {
        let Some(own) = self.state.id().cloned() else {
            return Err(ViewError::NotMounted);
        };

        // The current ordered child list, straight from page state.
        let threads: Vec<(String, u64)> = {
            let page = self.page.borrow();
            page.threads
                .iter()
                .map(|thread| (thread.id.to_string(), thread.id))
                .collect()
        };
        let keys: Vec<String> = threads.iter().map(|(key, _)| key.clone()).collect();

        self.children.remove_missing(&keys, sched)?;
        for (key, thread_id) in &threads {
            if !self.children.contains(key) {
                self.children.insert(
                    key.clone(),
                    Box::new(ThreadView::new(
                        self.page.clone(),
                        self.reltime.clone(),
                        *thread_id,
                    )),
                )?;
            }
        }
        self.children.order_by(&keys);
        self.children.sync(&own, sched)?;

        Ok(Node::element(
            "section",
            attrs(&[("id", own.as_str()), ("class", "thread-list")]),
            self.children.placeholders()?,
        )?)
    }

    fn mounted_descendants(&self) -> Vec<ElemId> {
        self.children.descendant_ids()
    }

    fn detach_tree(&mut self) {
        self.children.detach_all();
        self.state_mut().detach();
    }
}
