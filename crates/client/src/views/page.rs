use crate::reltime::RelTimeRegistry;
use crate::state::StateRef;
use crate::views::{BannerView, NavigationView, PageTitleView, ThreadListView};
use core_types::ElemId;
use std::cell::RefCell;
use std::rc::Rc;
use vdom::{Node, attrs};
use view::{Children, FlushScheduler, View, ViewError, ViewState};

/// Root composite for the board page: banner, board navigation, title and
/// the thread list, in that order.
pub struct PageView {
    state: ViewState,
    children: Children,
}

impl PageView {
    pub const BANNER: &'static str = "banner";
    pub const NAVIGATION: &'static str = "navigation";
    pub const TITLE: &'static str = "title";
    pub const THREADS: &'static str = "threads";

    pub fn new(
        page: StateRef,
        reltime: Rc<RefCell<RelTimeRegistry>>,
    ) -> Result<Self, ViewError> {
        let mut children = Children::new();
        children.insert(Self::BANNER, Box::new(BannerView::new(page.clone())))?;
        children.insert(
            Self::NAVIGATION,
            Box::new(NavigationView::new(page.clone())),
        )?;
        children.insert(Self::TITLE, Box::new(PageTitleView::new(page.clone())))?;
        children.insert(
            Self::THREADS,
            Box::new(ThreadListView::new(page, reltime)),
        )?;
        Ok(Self {
            state: ViewState::new(),
            children,
        })
    }

    pub fn child_mut(&mut self, key: &str) -> Option<&mut dyn View> {
        self.children.get_mut(key)
    }

    pub fn remove_child(
        &mut self,
        key: &str,
        sched: &mut FlushScheduler,
    ) -> Result<(), ViewError> {
        self.children.remove_child(key, sched).map(drop)
    }
}

impl View for PageView {
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
        self.children.sync(&own, sched)?;
        Ok(Node::element(
            "section",
            attrs(&[("id", own.as_str()), ("class", "page")]),
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
