pub mod app;
pub mod dom_tree;
pub mod reltime;
pub mod state;
pub mod views;

pub use crate::app::{Client, ClientError};
pub use crate::dom_tree::DomTree;
pub use crate::reltime::{RelTimeRegistry, format_ago};
pub use crate::state::{PageState, StateError, StateRef, ThreadSummary, load_state};
