//! Flush scheduling.
//!
//! One scheduler exists per process: created at startup before the first
//! mount and passed by reference to every lifecycle call. It owns the
//! mutation queue, collapses any number of flush requests within a tick
//! into one flush, and applies the drained batch through the `DomSink`
//! boundary.
//!
//! Invariants:
//! - The pre-flush hook runs exactly once per flush, before the drain, so
//!   hook-enqueued refreshes land in the same batch.
//! - A failure applying one mutation is logged and skipped; the rest of
//!   the batch still applies.
//! - The hook runs synchronously inside every flush and must not block.

use core_types::ElemId;
use std::fmt;
use vdom::{Mutation, MutationQueue};

/// Environment-level failure applying a single mutation, e.g. the target
/// element is missing from the live tree. Recoverable; never aborts a
/// batch.
#[derive(Debug)]
pub struct ApplyError {
    pub target: ElemId,
    pub reason: String,
}

impl ApplyError {
    pub fn new(target: ElemId, reason: impl Into<String>) -> Self {
        Self {
            target,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot apply mutation to <{}>: {}", self.target, self.reason)
    }
}

impl std::error::Error for ApplyError {}

/// Where drained mutations land: the live DOM, or a test double.
pub trait DomSink {
    fn apply(&mut self, mutation: &Mutation) -> Result<(), ApplyError>;
}

type BeforeFlush = Box<dyn FnMut(&mut MutationQueue)>;

pub struct FlushScheduler {
    queue: MutationQueue,
    flush_pending: bool,
    before_flush: Option<BeforeFlush>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub applied: usize,
    pub skipped: usize,
}

impl FlushScheduler {
    pub fn new() -> Self {
        Self {
            queue: MutationQueue::new(),
            flush_pending: false,
            before_flush: None,
        }
    }

    pub fn queue(&self) -> &MutationQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut MutationQueue {
        &mut self.queue
    }

    /// Install the single pre-flush hook. The hook receives the queue so
    /// last-moment refreshes (e.g. relative-time text) enqueue through the
    /// normal pipeline and commit in the same batch.
    pub fn set_before_flush(&mut self, hook: impl FnMut(&mut MutationQueue) + 'static) {
        self.before_flush = Some(Box::new(hook));
    }

    /// Idempotently mark that a flush is needed. Any number of requests
    /// within a tick collapse into one flush.
    pub fn request_flush(&mut self) {
        self.flush_pending = true;
    }

    pub fn flush_requested(&self) -> bool {
        self.flush_pending
    }

    /// Run the pre-flush hook once, drain the queue and apply the batch in
    /// order. Per-mutation failures are logged and skipped.
    pub fn run_flush(&mut self, sink: &mut dyn DomSink) -> FlushReport {
        if let Some(hook) = self.before_flush.as_mut() {
            hook(&mut self.queue);
        }
        let batch = self.queue.drain();
        self.flush_pending = false;

        let mut report = FlushReport::default();
        for mutation in &batch {
            match sink.apply(mutation) {
                Ok(()) => report.applied += 1,
                Err(err) => {
                    report.skipped += 1;
                    log::warn!(target: "flush.apply", "skipping mutation: {err}");
                }
            }
        }
        log::trace!(
            target: "flush.apply",
            "flush done: {} applied, {} skipped",
            report.applied,
            report.skipped
        );
        report
    }
}

impl Default for FlushScheduler {
    fn default() -> Self {
        Self::new()
    }
}
