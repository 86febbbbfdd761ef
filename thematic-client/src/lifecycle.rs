//! Job lifecycle control and inspection.

use crate::client::{Client, StatusCheck};
use crate::error::{ClientError, Result};
use crate::types::{JobDetails, JobSummary};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::warn;

impl Client {
    /// Ask the service to cancel a job.
    ///
    /// # Returns
    ///
    /// The raw response body; the envelope is not checked.
    pub async fn cancel_job(&self, job_id: &str) -> Result<String> {
        let path = format!("/job/{}/cancel", job_id);
        self.send_text(self.request(Method::POST, &path)).await
    }

    /// Ask the service to delete a job.
    ///
    /// # Returns
    ///
    /// The raw response body; the envelope is not checked.
    pub async fn delete_job(&self, job_id: &str) -> Result<String> {
        let path = format!("/job/{}/delete", job_id);
        self.send_text(self.request(Method::GET, &path)).await
    }

    /// Get a job's metadata.
    ///
    /// # Errors
    ///
    /// Returns an error on any non-200 status, on a rejected envelope, or
    /// when the payload lacks `state`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use thematic_client::{Client, JobState};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = Client::new("http://localhost:8080")?;
    /// let details = client.get_job_details("job-123").await?;
    /// if details.state == JobState::Finished {
    ///     println!("done");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_job_details(&self, job_id: &str) -> Result<JobDetails> {
        let path = format!("/job/{}/info", job_id);
        let response = self.send(self.request(Method::GET, &path)).await?;
        let data = self
            .handle_envelope("get_job_details", response, StatusCheck::Strict)
            .await?;

        if data.get("state").is_none() {
            return Err(ClientError::Protocol {
                operation: "get_job_details",
                missing: "state",
            });
        }

        Ok(serde_json::from_value(data)?)
    }

    /// Get a job's log as plain text.
    pub async fn get_job_logs(&self, job_id: &str) -> Result<String> {
        let path = format!("/job/{}/log", job_id);
        self.send_text(self.request(Method::GET, &path)).await
    }

    /// List jobs, optionally filtered by survey and job type.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the service answers with a status other than 200.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or a 200 response cannot be
    /// parsed.
    pub async fn list_jobs(
        &self,
        survey_id: Option<&str>,
        job_type: Option<&str>,
    ) -> Result<Option<Vec<JobSummary>>> {
        let mut query = Vec::new();
        if let Some(survey_id) = survey_id {
            query.push(("survey_id", survey_id));
        }
        if let Some(job_type) = job_type {
            query.push(("job_type", job_type));
        }

        let request = self.request(Method::GET, "/jobs/").query(&query);
        let response = self.send(request).await?;
        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            warn!(status = status.as_u16(), %body, "Failed to list jobs");
            return Ok(None);
        }

        let value: Value = serde_json::from_str(&body).map_err(|_| ClientError::BadResponse {
            operation: "list_jobs",
            status: status.as_u16(),
            body: body.clone(),
        })?;

        let jobs = value
            .get("data")
            .and_then(|data| data.get("jobs"))
            .cloned()
            .ok_or(ClientError::Protocol {
                operation: "list_jobs",
                missing: "jobs",
            })?;

        Ok(Some(serde_json::from_value(jobs)?))
    }
}
