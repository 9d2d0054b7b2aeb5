//! Application services

mod poller;
mod recorder;

pub use poller::{CycleReport, PollerConfig, StatusPoller};
pub use recorder::{ChangeRecorder, RecordOutcome};
