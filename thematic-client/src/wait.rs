//! Polling a job until it reaches a terminal state.

use crate::client::Client;
use crate::error::{ClientError, Result};
use crate::types::{JobState, JobTimings};
use chrono::Utc;
use tokio::time::{Instant, sleep};
use tracing::{error, info, warn};

impl Client {
    /// Wait until a job finishes.
    ///
    /// Equivalent to [`Client::wait_for_job_completion_with`] with a callback
    /// that always continues.
    pub async fn wait_for_job_completion(&self, job_id: &str) -> Result<JobTimings> {
        self.wait_for_job_completion_with(job_id, || true).await
    }

    /// Poll a job's state every `poll_interval` until it finishes.
    ///
    /// `check_continue` runs once per poll, after the state has been
    /// inspected; returning `false` stops the wait. Failed status fetches are
    /// retried up to `num_retries` consecutive times. No overall timeout is
    /// applied.
    ///
    /// # Errors
    ///
    /// - [`ClientError::JobErrored`] or [`ClientError::JobCanceled`] when the
    ///   job ends unsuccessfully
    /// - [`ClientError::Interrupted`] when `check_continue` returns `false`
    /// - [`ClientError::PollFailed`] when the retry budget is exhausted
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use thematic_client::Client;
    /// # use std::sync::atomic::{AtomicBool, Ordering};
    /// # async fn example(stop: &AtomicBool) -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = Client::new("http://localhost:8080")?;
    /// let timings = client
    ///     .wait_for_job_completion_with("job-123", || !stop.load(Ordering::Relaxed))
    ///     .await?;
    /// println!("Processed in {:?}", timings.processing);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn wait_for_job_completion_with<F>(
        &self,
        job_id: &str,
        mut check_continue: F,
    ) -> Result<JobTimings>
    where
        F: FnMut() -> bool,
    {
        info!(job_id, started_at = %Utc::now(), "Waiting for results of job");

        let start = Instant::now();
        let mut current = JobState::Unknown;
        let mut processing_start: Option<Instant> = None;
        let mut failures: u32 = 0;
        let mut polls: u32 = 0;

        loop {
            polls += 1;

            match self.get_job_details(job_id).await {
                Ok(details) => {
                    failures = 0;
                    let state = details.state;

                    match state {
                        JobState::Finished => {
                            info!(job_id, finished_at = %Utc::now(), "Status is finished");
                            return Ok(finish(job_id, start, processing_start, polls));
                        }
                        JobState::Errored => {
                            error!(job_id, errored_at = %Utc::now(), "Job errored");
                            return Err(ClientError::JobErrored {
                                job_id: job_id.to_string(),
                            });
                        }
                        JobState::Canceled => {
                            info!(job_id, canceled_at = %Utc::now(), "Job was canceled");
                            return Err(ClientError::JobCanceled {
                                job_id: job_id.to_string(),
                            });
                        }
                        JobState::InProgress => {
                            processing_start.get_or_insert_with(Instant::now);
                        }
                        _ => {}
                    }

                    if state != current {
                        info!(job_id, status = %state, "Status changed");
                        current = state;
                    }
                }
                Err(err) => {
                    if failures >= self.config().num_retries() {
                        return Err(ClientError::PollFailed {
                            job_id: job_id.to_string(),
                            attempts: failures + 1,
                            source: Box::new(err),
                        });
                    }
                    failures += 1;
                    warn!(job_id, failures, error = %err, "Failed to fetch job status");
                }
            }

            if !check_continue() {
                return Err(ClientError::Interrupted {
                    job_id: job_id.to_string(),
                });
            }

            sleep(self.config().poll_interval()).await;
        }
    }
}

/// Split the elapsed time into queue and processing phases.
fn finish(
    job_id: &str,
    start: Instant,
    processing_start: Option<Instant>,
    polls: u32,
) -> JobTimings {
    let end = Instant::now();
    let queued = processing_start.unwrap_or(end).duration_since(start);
    let processing = processing_start.map(|p| end.duration_since(p));

    if let Some(processing) = processing {
        info!(
            job_id,
            queued_secs = queued.as_secs_f64(),
            processing_secs = processing.as_secs_f64(),
            "Waited in queue and spent time processing"
        );
    }

    JobTimings {
        queued,
        processing,
        polls,
    }
}
