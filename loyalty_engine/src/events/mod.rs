//! Messages passed between the tasks of the accrual reconciliation engine.
mod channel;
mod event_types;

pub use channel::EventProducer;
pub use event_types::*;
