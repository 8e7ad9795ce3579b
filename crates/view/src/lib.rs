pub mod composite;
pub mod flush;
pub mod view;

pub use crate::composite::{Children, derive_child_id};
pub use crate::flush::{ApplyError, DomSink, FlushReport, FlushScheduler};
pub use crate::view::{View, ViewError, ViewState};
