//! End-to-end pipeline tests: views enqueue, the scheduler drains, the
//! host tree applies.

use client::views::{BannerView, PageTitleView};
use client::{Client, DomTree, PageState, ThreadSummary};
use core_types::ElemId;
use vdom::{Mutation, Node, attrs};
use view::{Children, FlushScheduler, View, ViewError, ViewState};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn empty_board() -> PageState {
    PageState {
        board: "g".into(),
        boards: vec!["a".into(), "g".into()],
        motd: Some("Read the sticky".into()),
        threads: Vec::new(),
    }
}

fn board_with_threads() -> PageState {
    PageState {
        threads: vec![
            ThreadSummary {
                id: 1,
                subject: "first".into(),
                time: 0,
                post_count: 2,
                image_count: 1,
            },
            ThreadSummary {
                id: 2,
                subject: "second".into(),
                time: 30,
                post_count: 0,
                image_count: 0,
            },
        ],
        ..empty_board()
    }
}

/// Minimal two-child composite used by the mount-order examples.
struct TwoPane {
    state: ViewState,
    children: Children,
}

impl TwoPane {
    fn new(page: client::StateRef) -> Self {
        let mut children = Children::new();
        children
            .insert("banner", Box::new(BannerView::new(page.clone())))
            .unwrap();
        children
            .insert("title", Box::new(PageTitleView::new(page)))
            .unwrap();
        Self {
            state: ViewState::new(),
            children,
        }
    }
}

impl View for TwoPane {
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
            attrs(&[("id", own.as_str())]),
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

#[test]
fn mounting_a_composite_queues_children_in_order_with_distinct_ids() {
    init_logging();
    let mut sched = FlushScheduler::new();
    let mut root = TwoPane::new(empty_board().shared());
    let _ = root.init_as_root(ElemId::from("root"), &mut sched).unwrap();

    let batch = sched.queue_mut().drain();
    let targets: Vec<&str> = batch.iter().map(|m| m.target().as_str()).collect();
    assert_eq!(targets, vec!["root-banner", "root-title"]);
    assert!(batch.iter().all(|m| matches!(m, Mutation::ReplaceSubtree { .. })));
}

#[test]
fn three_updates_in_one_tick_drain_to_one_replace() {
    init_logging();
    let mut client = Client::boot(empty_board(), 0).unwrap();
    client.flush();

    client.update_child("title").unwrap();
    client.update_child("title").unwrap();
    client.update_child("title").unwrap();

    let batch = client.scheduler_mut().queue_mut().drain();
    let title_mutations: Vec<&Mutation> = batch
        .iter()
        .filter(|m| m.target().as_str() == "page-title")
        .collect();
    assert_eq!(title_mutations.len(), 1);
    assert!(matches!(title_mutations[0], Mutation::ReplaceSubtree { .. }));
}

#[test]
fn removed_child_leaves_no_stale_mutation_and_parent_drops_its_placeholder() {
    init_logging();
    let mut sched = FlushScheduler::new();
    let mut root = TwoPane::new(empty_board().shared());
    let _ = root.init_as_root(ElemId::from("root"), &mut sched).unwrap();
    let _ = sched.queue_mut().drain();

    // Child re-renders, is removed, and the parent updates, all in one
    // tick.
    root.children
        .get_mut("banner")
        .unwrap()
        .update(&mut sched)
        .unwrap();
    root.children.remove_child("banner", &mut sched).unwrap();
    root.update(&mut sched).unwrap();

    let batch = sched.queue_mut().drain();
    assert!(batch.iter().any(|m| matches!(m, Mutation::Remove { target }
        if target.as_str() == "root-banner")));
    assert!(!batch.iter().any(|m| matches!(m, Mutation::ReplaceSubtree { target, .. }
        if target.as_str() == "root-banner")));

    let parent_markup = batch
        .iter()
        .find_map(|m| match m {
            Mutation::ReplaceSubtree { target, node } if target.as_str() == "root" => {
                Some(vdom::render_html(node))
            }
            _ => None,
        })
        .unwrap();
    assert!(!parent_markup.contains("root-banner"));
    assert!(parent_markup.contains("root-title"));
}

#[test]
fn pre_flush_hook_fires_once_for_any_number_of_requests() {
    init_logging();
    use std::cell::Cell;
    use std::rc::Rc;

    let mut sched = FlushScheduler::new();
    let counter = Rc::new(Cell::new(0u32));
    let hook_counter = Rc::clone(&counter);
    sched.set_before_flush(move |_queue| hook_counter.set(hook_counter.get() + 1));

    sched.request_flush();
    sched.request_flush();

    let mut tree = DomTree::new(ElemId::from("threads"));
    sched.run_flush(&mut tree);
    assert_eq!(counter.get(), 1);
}

#[test]
fn coalesced_batch_matches_single_application() {
    init_logging();
    // Two trees: one receives the coalesced drain, the other a single
    // clean write. Coalescing must be unobservable.
    let mut coalesced = Client::boot(empty_board(), 0).unwrap();
    let mut clean = Client::boot(empty_board(), 0).unwrap();
    coalesced.flush();
    clean.flush();

    coalesced.page().borrow_mut().motd = Some("one".into());
    coalesced.update_child("banner").unwrap();
    coalesced.page().borrow_mut().motd = Some("final".into());
    coalesced.update_child("banner").unwrap();
    coalesced.update_child("banner").unwrap();
    coalesced.flush();

    clean.page().borrow_mut().motd = Some("final".into());
    clean.update_child("banner").unwrap();
    clean.flush();

    assert_eq!(coalesced.snapshot(), clean.snapshot());
}

#[test]
fn mount_then_remove_leaves_no_trace_after_the_flush() {
    init_logging();
    let mut client = Client::boot(board_with_threads(), 60).unwrap();
    client.flush();
    assert!(client.dom().contains(&ElemId::from("page-threads-1")));

    {
        let page = client.page().clone();
        page.borrow_mut().threads.retain(|t| t.id != 1);
    }
    client.update_child("threads").unwrap();
    client.flush();

    assert!(!client.dom().contains(&ElemId::from("page-threads-1")));
    assert!(!client.dom().contains(&ElemId::from("page-threads-1-time")));
    assert!(client.dom().contains(&ElemId::from("page-threads-2")));
    assert!(client.scheduler().queue().is_empty());
}

#[test]
fn sibling_components_produce_zero_mutations_on_a_targeted_update() {
    init_logging();
    let mut client = Client::boot(empty_board(), 0).unwrap();
    client.flush();

    client.update_child("navigation").unwrap();
    let batch = client.scheduler_mut().queue_mut().drain();
    let targets: Vec<&str> = batch.iter().map(|m| m.target().as_str()).collect();
    assert_eq!(targets, vec!["page-navigation"]);
}

#[test]
fn relative_times_refresh_together_at_flush() {
    init_logging();
    let mut client = Client::boot(board_with_threads(), 60).unwrap();
    client.flush();
    let html = client.snapshot();
    assert!(html.contains(">posted 1 minute ago<"));
    assert!(html.contains(">posted just now<"));

    // No view re-renders; the pre-flush hook alone refreshes every clock.
    client.set_now(86_400);
    client.scheduler_mut().request_flush();
    client.flush();

    let html = client.snapshot();
    assert!(html.contains(">posted 1 day ago<"));
    assert!(html.contains(">posted 23 hours ago<"));
    assert!(!html.contains("minute"));
}

#[test]
fn a_thread_added_mid_life_lands_intact_in_one_flush() {
    init_logging();
    let mut client = Client::boot(board_with_threads(), 60).unwrap();
    client.flush();

    client.page().borrow_mut().threads.push(ThreadSummary {
        id: 3,
        subject: "third".into(),
        time: 60,
        post_count: 0,
        image_count: 0,
    });
    // The new child's mount drains before the parent's re-render; the
    // host must still materialize it this flush.
    client.update_child("threads").unwrap();
    client.flush();

    let html = client.snapshot();
    assert!(html.contains(r#"<article id="page-threads-3" class="thread">"#));
    assert!(html.contains("third"));
    // Existing threads kept their rendered content.
    assert!(html.contains("first"));
    assert!(html.contains("second"));
}

#[test]
fn a_failing_mutation_does_not_abort_the_rest_of_the_batch() {
    init_logging();
    let mut client = Client::boot(empty_board(), 0).unwrap();
    client.flush();

    client
        .scheduler_mut()
        .queue_mut()
        .push_text(&ElemId::from("no-such-element"), "orphan");
    client.page().borrow_mut().motd = Some("still applied".into());
    client.update_child("banner").unwrap();

    let report = client.flush();
    assert_eq!(report.skipped, 1);
    assert!(client.snapshot().contains("still applied"));
}

#[test]
fn full_page_snapshot_after_first_flush() {
    init_logging();
    let mut client = Client::boot(board_with_threads(), 60).unwrap();
    client.flush();

    let html = client.snapshot();
    assert!(html.starts_with(r#"<section id="threads">"#));
    assert!(html.contains(r#"<h1 id="page-banner" class="banner">Read the sticky</h1>"#));
    assert!(html.contains(r#"<a href="/a/">a</a>"#));
    assert!(html.contains(r#"<h2 id="page-title" class="page-title">/g/</h2>"#));
    assert!(html.contains(r#"<article id="page-threads-1" class="thread">"#));
    assert!(html.contains("2 replies, 1 images"));
}
