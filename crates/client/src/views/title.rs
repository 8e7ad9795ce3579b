use crate::state::StateRef;
use core_types::ElemId;
use vdom::{Node, attrs};
use view::{FlushScheduler, View, ViewError, ViewState};

/// Page heading for the current board.
pub struct PageTitleView {
    state: ViewState,
    page: StateRef,
}

impl PageTitleView {
    pub fn new(page: StateRef) -> Self {
        Self {
            state: ViewState::new(),
            page,
        }
    }
}

impl View for PageTitleView {
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
        Ok(Node::element(
            "h2",
            attrs(&[("id", &id), ("class", "page-title")]),
            vec![Node::text(format!("/{}/", page.board))],
        )?)
    }
}
