//! Recording fake transport for unit tests

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use crate::common::Result;
use crate::http::{ApiRequest, ApiResponse, Method, Transport};

type Handler = Box<dyn Fn(&ApiRequest) -> Result<ApiResponse> + Send + Sync>;

pub struct MockTransport {
    handler: Handler,
    calls: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new(handler: impl Fn(&ApiRequest) -> Result<ApiResponse> + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A server answering every route with a well-formed 200 response
    pub fn healthy() -> Self {
        Self::new(|req| Ok(well_formed(req)))
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.calls.lock().unwrap().push(request.clone());
        (self.handler)(&request)
    }
}

/// Well-formed answers for the marketplace API
///
/// User ids are derived from the role and never equal the `user_id`
/// query parameter.
pub fn well_formed(req: &ApiRequest) -> ApiResponse {
    let created = |id: &str| ApiResponse::json(200, json!({"success": true, "data": {"id": id}}));

    match (req.method, req.path.as_str()) {
        (Method::Get, "/health") => ApiResponse::json(200, json!({"status": "healthy"})),
        (Method::Get, "/") => ApiResponse::json(200, json!({"message": "Crop Contract API"})),
        (Method::Post, "/users") => {
            let role = req
                .body
                .as_ref()
                .and_then(|b| b["role"].as_str())
                .unwrap_or("unknown");
            created(&format!("server-{}", role))
        }
        (Method::Post, "/wallet/add-funds") => {
            ApiResponse::json(200, json!({"success": true, "data": {"balance": 1000.0}}))
        }
        (Method::Post, "/listings") => created("listing-1"),
        (Method::Get, "/listings") => {
            ApiResponse::json(200, json!({"success": true, "data": [{"id": "listing-1"}]}))
        }
        (Method::Post, "/proposals") => created("proposal-1"),
        (Method::Put, path) if path.starts_with("/proposals/") && path.ends_with("/accept") => {
            ApiResponse::json(200, json!({"success": true, "data": {"status": "accepted"}}))
        }
        (Method::Post, "/contracts/generate") => created("contract-1"),
        (Method::Get, path) if path.starts_with("/dashboard/") => ApiResponse::json(
            200,
            json!({"success": true, "data": {"listings": [], "contracts": [], "wallet_balance": 0}}),
        ),
        _ => ApiResponse::from_text(404, r#"{"detail":"Not Found"}"#),
    }
}
