//! Run driver
//!
//! Executes the whole sequence in order. A failing step never stops the
//! run; later steps that depend on its output fail their own
//! precondition check instead.

use std::io::Write;

use crate::common::Fixtures;
use crate::http::Transport;

use super::report::Reporter;
use super::state::SharedState;
use super::steps::{TestStep, SEQUENCE};

/// Totals of a complete run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
    /// Identifiers produced during the run
    pub state: SharedState,
    /// Names of the steps that failed, in execution order
    pub failed_steps: Vec<&'static str>,
}

impl RunSummary {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Process exit code for this run
    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }
}

/// Run every step against `transport`, reporting as it goes
pub async fn run_all<W: Write>(
    transport: &dyn Transport,
    fixtures: &Fixtures,
    reporter: &mut Reporter<W>,
) -> RunSummary {
    run_steps(&SEQUENCE, transport, fixtures, reporter).await
}

/// Run `steps` in order against `transport`
pub(crate) async fn run_steps<W: Write>(
    steps: &[TestStep],
    transport: &dyn Transport,
    fixtures: &Fixtures,
    reporter: &mut Reporter<W>,
) -> RunSummary {
    let mut state = SharedState::default();
    let mut passed = 0;
    let mut failed_steps = Vec::new();

    for (i, step) in steps.iter().enumerate() {
        tracing::info!(step = step.name(), index = i + 1, "running step");

        let results = step.execute(&mut state, transport, fixtures).await;
        for result in &results {
            reporter.log(result);
        }

        if results.iter().all(|r| r.success) {
            passed += 1;
        } else {
            tracing::warn!(step = step.name(), "step failed");
            failed_steps.push(step.name());
        }
    }

    let summary = RunSummary {
        passed,
        failed: failed_steps.len(),
        total: steps.len(),
        state,
        failed_steps,
    };
    reporter.summary(&summary);
    summary
}
