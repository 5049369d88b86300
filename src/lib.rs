//! Crop Contract API smoke runner
//!
//! This library drives a fixed, ordered sequence of requests against the
//! crop contract marketplace API and reports pass/fail per step.

pub mod common;
pub mod http;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Config, Error, Fixtures, Result};
pub use http::{HttpSession, Transport};
pub use testing::{run_all, RunSummary};
