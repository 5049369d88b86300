//! HTTP session used by all steps

mod client;
mod types;

pub use client::{HttpSession, Transport};
pub use types::{resource_path, ApiRequest, ApiResponse, Method};
