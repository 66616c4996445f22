//! Progress tracking for resumable migration runs

pub mod progress;

pub use progress::ProgressLedger;
