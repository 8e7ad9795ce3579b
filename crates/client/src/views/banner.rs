use crate::state::StateRef;
use core_types::ElemId;
use vdom::{Node, attrs};
use view::{FlushScheduler, View, ViewError, ViewState};

/// Board banner: the staff message of the day, or the board name when no
/// message is configured.
pub struct BannerView {
    state: ViewState,
    page: StateRef,
}

impl BannerView {
    pub fn new(page: StateRef) -> Self {
        Self {
            state: ViewState::new(),
            page,
        }
    }
}

impl View for BannerView {
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
        let text = match &page.motd {
            Some(motd) => motd.clone(),
            None => format!("/{}/", page.board),
        };
        Ok(Node::element(
            "h1",
            attrs(&[("id", &id), ("class", "banner")]),
            vec![Node::text(text)],
        )?)
    }
}
