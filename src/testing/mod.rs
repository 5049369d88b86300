//! Smoke-test runner
//!
//! Drives the fixed marketplace sequence through a [`Transport`] and
//! reports each step's outcome against structured response data rather
//! than raw text.
//!
//! [`Transport`]: crate::http::Transport

mod envelope;
#[cfg(test)]
mod mock;
mod report;
mod runner;
mod state;
mod steps;

pub use envelope::StepFailure;
pub use report::{payload_of, Reporter, TestResult};
pub use runner::{run_all, RunSummary};
pub use state::{SharedState, StateKey};
pub use steps::{TestStep, SEQUENCE};
