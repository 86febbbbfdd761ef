//! Type definitions for the Thematic client.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::client::id_value;

/// Free-form job options, sent JSON-encoded as the `job_options` field.
pub type JobOptions = Map<String, Value>;

/// Extra form fields for job creation, sent in key order.
pub type JobParams = BTreeMap<String, String>;

/// Server-side job state, as observed by polling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobState {
    /// State not reported yet.
    Unknown,
    /// Waiting for a worker.
    Queued,
    /// Being processed.
    InProgress,
    /// Completed successfully.
    Finished,
    /// Failed.
    Errored,
    /// Canceled before completion.
    Canceled,
    /// A state this client does not know.
    Other(String),
}

impl JobState {
    /// Wire name of the state.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unknown => "unknown",
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::Finished => "finished",
            Self::Errored => "errored",
            Self::Canceled => "canceled",
            Self::Other(s) => s,
        }
    }

    /// Whether the job will not change state again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Errored | Self::Canceled)
    }
}

impl From<&str> for JobState {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "unknown" => Self::Unknown,
            "queued" => Self::Queued,
            "in_progress" => Self::InProgress,
            "finished" => Self::Finished,
            "errored" => Self::Errored,
            "canceled" | "cancelled" => Self::Canceled,
            _ => Self::Other(s.to_string()),
        }
    }
}

impl From<String> for JobState {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<JobState> for String {
    fn from(state: JobState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Job metadata returned by the job info endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDetails {
    /// Current state.
    pub state: JobState,
    /// Remaining fields, as sent by the server.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of the job listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    /// Current state, when listed.
    #[serde(default)]
    pub state: Option<JobState>,
    /// Remaining fields, as sent by the server.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobSummary {
    /// Job identifier, from `jobid` or `id`.
    pub fn job_id(&self) -> Option<String> {
        self.extra
            .get("jobid")
            .or_else(|| self.extra.get("id"))
            .and_then(id_value)
    }
}

/// Survey metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurveyDetails {
    /// Fields as sent by the server.
    pub fields: Map<String, Value>,
}

impl SurveyDetails {
    /// Survey identifier, when present.
    pub fn survey_id(&self) -> Option<String> {
        self.fields.get("survey_id").and_then(id_value)
    }

    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// How long a job spent queued and processing, as seen by the poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobTimings {
    /// From the first poll until `in_progress` was first seen (or until
    /// completion if it never was).
    pub queued: Duration,
    /// From first seeing `in_progress` until `finished`.
    pub processing: Option<Duration>,
    /// Number of status fetches made, failed ones included.
    pub polls: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_state_parse() {
        assert_eq!(JobState::from("finished"), JobState::Finished);
        assert_eq!(JobState::from("IN_PROGRESS"), JobState::InProgress);
        assert_eq!(JobState::from("cancelled"), JobState::Canceled);
        assert_eq!(
            JobState::from("uploading"),
            JobState::Other("uploading".to_string())
        );
        assert!(JobState::Errored.is_terminal());
        assert!(!JobState::Queued.is_terminal());
    }

    #[test]
    fn test_job_details_deserialize() {
        let details: JobDetails =
            serde_json::from_value(json!({"state": "in_progress", "survey_id": 7})).unwrap();
        assert_eq!(details.state, JobState::InProgress);
        assert_eq!(details.extra["survey_id"], 7);
        assert_eq!(serde_json::to_value(&details).unwrap()["state"], "in_progress");
    }

    #[test]
    fn test_job_summary_id() {
        let summary: JobSummary =
            serde_json::from_value(json!({"id": 12, "type": "newData"})).unwrap();
        assert_eq!(summary.state, None);
        assert_eq!(summary.job_id().as_deref(), Some("12"));
    }

    #[test]
    fn test_survey_details() {
        let survey: SurveyDetails =
            serde_json::from_value(json!({"survey_id": "s-1", "name": "NPS"})).unwrap();
        assert_eq!(survey.survey_id().as_deref(), Some("s-1"));
        assert_eq!(survey.get("name"), Some(&json!("NPS")));
    }
}
