//! The `{status, data, error}` wrapper every API response uses.

use crate::error::{ClientError, Result};
use serde::Deserialize;
use serde_json::Value;

const SUCCESS: &str = "success";

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    status: String,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    error: Option<EnvelopeError>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeError {
    #[serde(default)]
    message: Option<String>,
}

impl Envelope {
    /// Unwrap the payload, turning a non-success status into
    /// [`ClientError::Rejected`].
    pub(crate) fn into_data(self, operation: &'static str) -> Result<Value> {
        if self.status == SUCCESS {
            return Ok(self.data);
        }

        let message = self
            .error
            .and_then(|e| e.message)
            .unwrap_or_else(|| format!("status {}", self.status));

        Err(ClientError::Rejected { operation, message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Envelope {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_success_returns_data() {
        let data = parse(r#"{"status":"success","data":{"jobid":"j1"}}"#)
            .into_data("run_job")
            .unwrap();
        assert_eq!(data["jobid"], "j1");
    }

    #[test]
    fn test_failure_carries_server_message() {
        let err = parse(r#"{"status":"fail","error":{"message":"no such survey"}}"#)
            .into_data("get_survey_details")
            .unwrap_err();
        match err {
            ClientError::Rejected { operation, message } => {
                assert_eq!(operation, "get_survey_details");
                assert_eq!(message, "no such survey");
            }
            other => panic!("Expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_failure_without_message() {
        let err = parse(r#"{"status":"error"}"#).into_data("x").unwrap_err();
        assert_eq!(err.server_message(), Some("status error"));
    }

    #[test]
    fn test_status_is_required() {
        assert!(serde_json::from_str::<Envelope>(r#"{"data":{}}"#).is_err());
    }
}
