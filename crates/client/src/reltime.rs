//! Synchronized relative-time displays.
//!
//! Every "posted … ago" element registers here; one pre-flush hook
//! refreshes them all immediately before each batch commits, so every
//! visible timestamp is consistent within one flush instead of drifting
//! independently. The hook runs synchronously and does no I/O.

use core_types::{ElemId, UnixSeconds};
use std::cell::RefCell;
use std::rc::Rc;
use vdom::MutationQueue;
use view::FlushScheduler;

#[derive(Debug, Default)]
pub struct RelTimeRegistry {
    entries: Vec<(ElemId, UnixSeconds)>,
    now: UnixSeconds,
}

impl RelTimeRegistry {
    pub fn new(now: UnixSeconds) -> Self {
        Self {
            entries: Vec::new(),
            now,
        }
    }

    pub fn shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    /// The host clock, advanced by the event loop before flushing.
    pub fn set_now(&mut self, now: UnixSeconds) {
        self.now = now;
    }

    pub fn now(&self) -> UnixSeconds {
        self.now
    }

    pub fn register(&mut self, id: ElemId, posted: UnixSeconds) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => entry.1 = posted,
            None => self.entries.push((id, posted)),
        }
    }

    pub fn unregister(&mut self, id: &ElemId) {
        self.entries.retain(|(existing, _)| existing != id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Queue a text refresh for every registered element.
    pub fn refresh(&self, queue: &mut MutationQueue) {
        for (id, posted) in &self.entries {
            queue.push_text(id, &format_ago(self.now.saturating_sub(*posted)));
        }
    }

    /// Install the registry as the scheduler's pre-flush hook.
    pub fn install(registry: Rc<RefCell<Self>>, sched: &mut FlushScheduler) {
        sched.set_before_flush(move |queue| registry.borrow().refresh(queue));
    }
}

const MINUTE: UnixSeconds = 60;
const HOUR: UnixSeconds = 60 * MINUTE;
const DAY: UnixSeconds = 24 * HOUR;
const MONTH: UnixSeconds = 30 * DAY;
const YEAR: UnixSeconds = 365 * DAY;

/// Render an age in seconds the way post headers display it.
pub fn format_ago(delta: UnixSeconds) -> String {
    if delta < MINUTE {
        return "posted just now".to_string();
    }
    let (amount, unit) = if delta < HOUR {
        (delta / MINUTE, "minute")
    } else if delta < DAY {
        (delta / HOUR, "hour")
    } else if delta < MONTH {
        (delta / DAY, "day")
    } else if delta < YEAR {
        (delta / MONTH, "month")
    } else {
        (delta / YEAR, "year")
    };
    if amount == 1 {
        format!("posted 1 {unit} ago")
    } else {
        format!("posted {amount} {unit}s ago")
    }
}
