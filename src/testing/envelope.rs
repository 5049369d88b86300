//! Response-shape checks and the step failure taxonomy

use serde_json::Value;
use thiserror::Error;

use crate::common;
use crate::http::ApiResponse;

use super::state::StateKey;

/// Why a step did not pass
#[derive(Error, Debug)]
pub enum StepFailure {
    #[error("{0}")]
    Connectivity(#[from] common::Error),

    #[error("Status: {status}, Response: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Invalid response format: {reason}")]
    EnvelopeMismatch {
        reason: String,
        body: Option<Value>,
    },

    #[error("Missing {} from previous tests", join_keys(.0))]
    MissingDependency(Vec<StateKey>),
}

fn join_keys(keys: &[StateKey]) -> String {
    keys.iter()
        .map(StateKey::as_str)
        .collect::<Vec<_>>()
        .join(" and ")
}

impl StepFailure {
    pub(crate) fn mismatch(reason: impl Into<String>, response: &ApiResponse) -> Self {
        Self::EnvelopeMismatch {
            reason: reason.into(),
            body: response.body.clone(),
        }
    }

    /// Payload worth logging alongside the failure message
    pub fn payload(&self) -> Option<Value> {
        match self {
            Self::EnvelopeMismatch { body, .. } => body.clone(),
            _ => None,
        }
    }
}

/// Require status 200
pub fn expect_ok(response: &ApiResponse) -> Result<(), StepFailure> {
    if response.is_ok() {
        Ok(())
    } else {
        Err(StepFailure::UnexpectedStatus {
            status: response.status,
            body: response.text.clone(),
        })
    }
}

/// Require status 200 and a `{success: true, data: ...}` envelope
///
/// Returns the `data` member.
pub fn expect_envelope(response: &ApiResponse) -> Result<&Value, StepFailure> {
    expect_ok(response)?;
    let body = response
        .body
        .as_ref()
        .ok_or_else(|| StepFailure::mismatch("response body is not JSON", response))?;

    if body.get("success").and_then(Value::as_bool) != Some(true) {
        return Err(StepFailure::mismatch("`success` is not true", response));
    }
    match body.get("data") {
        Some(data) if !data.is_null() => Ok(data),
        _ => Err(StepFailure::mismatch("missing `data`", response)),
    }
}

/// Require status 200 and a `data` member that is a JSON object
///
/// Used for endpoints that wrap their payload without a `success` flag.
pub fn expect_data_object(
    response: &ApiResponse,
) -> Result<&serde_json::Map<String, Value>, StepFailure> {
    expect_ok(response)?;
    response
        .body
        .as_ref()
        .and_then(|body| body.get("data"))
        .and_then(Value::as_object)
        .ok_or_else(|| StepFailure::mismatch("`data` is not an object", response))
}

/// Extract `data.id` as text
///
/// Numeric ids are accepted and stored in their decimal form.
pub fn extract_id(data: &Value, response: &ApiResponse) -> Result<String, StepFailure> {
    match data.get("id") {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        _ => Err(StepFailure::mismatch("`data.id` is missing", response)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_returns_data() {
        let resp = ApiResponse::json(200, json!({"success": true, "data": {"id": "l-1"}}));
        let data = expect_envelope(&resp).unwrap();
        assert_eq!(extract_id(data, &resp).unwrap(), "l-1");
    }

    #[test]
    fn test_non_200_is_unexpected_status() {
        let resp = ApiResponse::from_text(500, "boom");
        let err = expect_envelope(&resp).unwrap_err();
        assert!(matches!(err, StepFailure::UnexpectedStatus { status: 500, .. }));
        assert_eq!(err.to_string(), "Status: 500, Response: boom");
    }

    #[test]
    fn test_success_false_is_mismatch() {
        let resp = ApiResponse::json(200, json!({"success": false, "data": {"id": 1}}));
        let err = expect_envelope(&resp).unwrap_err();
        assert!(matches!(err, StepFailure::EnvelopeMismatch { .. }));
        assert!(err.payload().is_some());
    }

    #[test]
    fn test_null_data_is_mismatch() {
        let resp = ApiResponse::json(200, json!({"success": true, "data": null}));
        assert!(matches!(
            expect_envelope(&resp),
            Err(StepFailure::EnvelopeMismatch { .. })
        ));
    }

    #[test]
    fn test_non_json_200_is_mismatch() {
        let resp = ApiResponse::from_text(200, "<html>");
        let err = expect_envelope(&resp).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid response format: response body is not JSON"
        );
        assert!(err.payload().is_none());
    }

    #[test]
    fn test_numeric_id_is_stringified() {
        let resp = ApiResponse::json(200, json!({"success": true, "data": {"id": 42}}));
        let data = expect_envelope(&resp).unwrap();
        assert_eq!(extract_id(data, &resp).unwrap(), "42");
    }

    #[test]
    fn test_missing_id_is_mismatch() {
        let resp = ApiResponse::json(200, json!({"success": true, "data": {"name": "x"}}));
        let data = expect_envelope(&resp).unwrap();
        assert!(extract_id(data, &resp).is_err());
    }

    #[test]
    fn test_data_object() {
        let resp = ApiResponse::json(200, json!({"data": {"listings": [], "wallet": 0}}));
        assert_eq!(expect_data_object(&resp).unwrap().len(), 2);

        let resp = ApiResponse::json(200, json!({"data": [1, 2]}));
        assert!(expect_data_object(&resp).is_err());
    }

    #[test]
    fn test_missing_dependency_names_keys() {
        let err = StepFailure::MissingDependency(vec![StateKey::BuyerId, StateKey::ListingId]);
        assert_eq!(
            err.to_string(),
            "Missing buyer_id and listing_id from previous tests"
        );
    }
}
