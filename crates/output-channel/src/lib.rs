//! Output Channel
//!
//! The last hop before the external streaming consumer: arbitrated
//! instructions are wrapped in [`OutputRecord`]s and delivered through a
//! bounded, lock-guarded FIFO queue. Each record is consumed exactly once
//! and records from the same producer keep their relative order.

mod queue;
mod record;

pub use queue::OutputQueue;
pub use record::OutputRecord;
