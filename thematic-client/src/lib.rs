//! Async Rust client for the Thematic text-analytics API.
//!
//! The service hosts surveys (datasets) and runs analysis jobs over uploaded
//! files. This crate wraps its request/response API: every call builds one
//! HTTP request, checks the `{status, data, error}` envelope, and returns the
//! payload or a value derived from it.
//!
//! # Features
//!
//! - Login with username/password, or direct use of a known API key
//! - Survey creation, update and lookup
//! - Job submission with file uploads, follow-on configuration jobs
//! - Job control (cancel, delete, details, logs, listing)
//! - Polling until a job finishes, with cooperative cancellation
//! - Artifact retrieval into memory or streamed into any `AsyncWrite`
//!
//! # Example
//!
//! ```no_run
//! use thematic_client::{Client, JobParams, NewSurvey};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::from_login("https://client.getthematic.com/api", "me", "secret").await?;
//!
//! let survey = NewSurvey::new("Exit survey", 2, json!([{"name": "id"}, {"name": "comment"}]), true);
//! let survey_id = client.create_survey(&survey).await?.survey_id().unwrap_or_default();
//!
//! let job_id = client
//!     .run_job(&survey_id, "responses.csv", None, None, &JobParams::new())
//!     .await?;
//! client.wait_for_job_completion(&job_id).await?;
//!
//! if let Some(csv) = client.retrieve_csv(&job_id).await? {
//!     std::fs::write("coded.csv", csv)?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All operations return `Result<T, ClientError>`. Listing jobs and
//! downloading artifacts report a non-200 status as `Ok(None)` instead:
//!
//! ```no_run
//! # use thematic_client::{Client, ClientError};
//! # async fn example() -> Result<(), ClientError> {
//! # let client = Client::new("http://localhost:8080")?;
//! match client.wait_for_job_completion("job-123").await {
//!     Ok(timings) => println!("Done after {} polls", timings.polls),
//!     Err(ClientError::JobErrored { job_id }) => println!("{job_id} failed"),
//!     Err(e) => println!("Error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

mod artifacts;
mod auth;
mod client;
mod config;
mod configure;
mod envelope;
mod error;
mod form;
mod jobs;
mod lifecycle;
mod surveys;
mod types;
mod wait;

pub use artifacts::Artifact;
pub use client::{AUTH_HEADER, Client};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use configure::WordLists;
pub use error::{ClientError, Result};
pub use form::{FileField, JobFiles, Upload};
pub use jobs::DataUpdate;
pub use surveys::{NewSurvey, SurveyFields};
pub use types::{
    JobDetails, JobOptions, JobParams, JobState, JobSummary, JobTimings, SurveyDetails,
};
