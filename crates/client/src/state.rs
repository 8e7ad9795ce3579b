//! Page state.
//!
//! The state loader runs once at startup, before any view mounts; views
//! read the loaded state during `render`. Loading failure is fatal before
//! mounting begins.

use core_types::UnixSeconds;
use serde::Deserialize;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared handle views hold onto page state. Never crosses threads.
pub type StateRef = Rc<RefCell<PageState>>;

#[derive(Clone, Debug, Deserialize)]
pub struct PageState {
    pub board: String,
    #[serde(default)]
    pub boards: Vec<String>,
    /// Banner message configured by the board staff.
    #[serde(default)]
    pub motd: Option<String>,
    #[serde(default)]
    pub threads: Vec<ThreadSummary>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ThreadSummary {
    pub id: u64,
    pub subject: String,
    /// Creation time, unix seconds.
    #[serde(default)]
    pub time: UnixSeconds,
    #[serde(default)]
    pub post_count: u32,
    #[serde(default)]
    pub image_count: u32,
}

impl PageState {
    pub fn shared(self) -> StateRef {
        Rc::new(RefCell::new(self))
    }

    pub fn thread(&self, id: u64) -> Option<&ThreadSummary> {
        self.threads.iter().find(|thread| thread.id == id)
    }
}

#[derive(Debug)]
pub enum StateError {
    Parse(serde_json::Error),
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::Parse(err) => write!(f, "malformed page state: {err}"),
        }
    }
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StateError::Parse(err) => Some(err),
        }
    }
}

pub fn load_state(json: &str) -> Result<PageState, StateError> {
    let state: PageState = serde_json::from_str(json).map_err(StateError::Parse)?;
    log::debug!(
        target: "client.state",
        "loaded /{}/: {} threads, {} boards",
        state.board,
        state.threads.len(),
        state.boards.len()
    );
    Ok(state)
}
