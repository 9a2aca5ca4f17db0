//! Queue scheduler: runs many jobs with a concurrency cap.
//!
//! Admits queued jobs strictly in input order, keeps at most
//! `concurrency` of them running, refills slots as jobs finish, and
//! returns the full list — terminal states included — in input order.

mod run;
mod summary;

pub use run::{run_queue, QueueOptions};
pub use summary::{summarize, RunSummary};
