//! Common utilities shared by the CLI and the runner

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use config::{Config, Fixtures};
pub use error::{Error, Result};
