use crate::state::StateRef;
use core_types::ElemId;
use vdom::{Node, attrs};
use view::{FlushScheduler, View, ViewError, ViewState};

/// Top board list: one link per board the server advertises.
pub struct NavigationView {
    state: ViewState,
    page: StateRef,
}

impl NavigationView {
    pub fn new(page: StateRef) -> Self {
        Self {
            state: ViewState::new(),
            page,
        }
    }
}

impl View for NavigationView {
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
        let mut links = Vec::with_capacity(page.boards.len().saturating_mul(2));
        for (i, board) in page.boards.iter().enumerate() {
            if i > 0 {
                links.push(Node::text(" / "));
            }
            links.push(Node::element(
                "a",
                attrs(&[("href", &format!("/{board}/"))]),
                vec![Node::text(board.as_str())],
            )?);
        }
        Ok(Node::element(
            "nav",
            attrs(&[("id", &id), ("class", "board-navigation")]),
            links,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PageState;
    use vdom::render_html;

    #[test]
    fn renders_board_links_in_order() {
        let page = PageState {
            board: "g".into(),
            boards: vec!["a".into(), "g".into()],
            motd: None,
            threads: Vec::new(),
        }
        .shared();

        let mut sched = FlushScheduler::new();
        let mut nav = NavigationView::new(page);
        nav.mount(ElemId::from("page-navigation"), &mut sched)
            .unwrap();
        let node = nav.render(&mut sched).unwrap();
        assert_eq!(
            render_html(&node),
            concat!(
                r#"<nav id="page-navigation" class="board-navigation">"#,
                r#"<a href="/a/">a</a> / <a href="/g/">g</a></nav>"#
            )
        );
    }

    #[test]
    fn empty_board_list_renders_an_empty_nav() {
        let page = PageState {
            board: "g".into(),
            boards: Vec::new(),
            motd: None,
            threads: Vec::new(),
        }
        .shared();

        let mut sched = FlushScheduler::new();
        let mut nav = NavigationView::new(page);
        nav.mount(ElemId::from("page-navigation"), &mut sched)
            .unwrap();
        let node = nav.render(&mut sched).unwrap();
        assert_eq!(
            render_html(&node),
            r#"<nav id="page-navigation" class="board-navigation"></nav>"#
        );
    }
}
