//! Job commands - submit, inspect, control and wait for jobs.

use super::{Connection, print_json};
use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thematic_client::{Client, JobParams};

/// Options for submitting a job.
#[derive(Debug)]
pub struct RunOptions {
    pub survey_id: String,
    pub csv: PathBuf,
    pub themes: Option<PathBuf>,
    pub previous_job_id: Option<String>,
    pub params: Vec<(String, String)>,
    pub wait: bool,
}

/// Parse a `key=value` pair.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=value: no `=` found in `{}`", s))?;
    if key.is_empty() {
        return Err(format!("invalid KEY=value: empty key in `{}`", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Submit a job and print its id, optionally waiting for it to finish.
pub async fn run(connection: &Connection, options: RunOptions) -> Result<()> {
    let params: JobParams = options.params.into_iter().collect();

    let client = connection.connect().await?;
    let job_id = client
        .run_job(
            &options.survey_id,
            &options.csv,
            options.themes.as_deref(),
            options.previous_job_id.as_deref(),
            &params,
        )
        .await
        .with_context(|| format!("Failed to submit {}", options.csv.display()))?;

    tracing::info!(%job_id, survey_id = %options.survey_id, "Job submitted");
    println!("{}", job_id);

    if options.wait {
        wait_on(&client, &job_id).await?;
    }
    Ok(())
}

/// Print the details of a job.
pub async fn status(connection: &Connection, job_id: &str) -> Result<()> {
    let client = connection.connect().await?;
    let details = client
        .get_job_details(job_id)
        .await
        .with_context(|| format!("Failed to get details of job {}", job_id))?;
    print_json(&details)
}

/// Print the log of a job.
pub async fn logs(connection: &Connection, job_id: &str) -> Result<()> {
    let client = connection.connect().await?;
    let log = client
        .get_job_logs(job_id)
        .await
        .with_context(|| format!("Failed to get log of job {}", job_id))?;
    print!("{}", log);
    Ok(())
}

/// List jobs, optionally filtered.
pub async fn list(
    connection: &Connection,
    survey_id: Option<&str>,
    job_type: Option<&str>,
) -> Result<()> {
    let client = connection.connect().await?;
    let jobs = client
        .list_jobs(survey_id, job_type)
        .await
        .context("Failed to list jobs")?
        .ok_or_else(|| anyhow!("the service refused to list jobs"))?;

    if jobs.is_empty() {
        println!("No jobs found.");
        return Ok(());
    }

    println!("{:<40} STATE", "JOB ID");
    println!("{:<40} -----", "------");
    for job in &jobs {
        let id = job.job_id().unwrap_or_else(|| "?".to_string());
        let state = job.state.as_ref().map(|s| s.as_str()).unwrap_or("-");
        println!("{:<40} {}", id, state);
    }
    Ok(())
}

/// Cancel a job and print the raw response.
pub async fn cancel(connection: &Connection, job_id: &str) -> Result<()> {
    let client = connection.connect().await?;
    let body = client
        .cancel_job(job_id)
        .await
        .with_context(|| format!("Failed to cancel job {}", job_id))?;
    println!("{}", body);
    Ok(())
}

/// Delete a job and print the raw response.
pub async fn delete(connection: &Connection, job_id: &str) -> Result<()> {
    let client = connection.connect().await?;
    let body = client
        .delete_job(job_id)
        .await
        .with_context(|| format!("Failed to delete job {}", job_id))?;
    println!("{}", body);
    Ok(())
}

/// Wait for a job to reach a terminal state.
pub async fn wait(connection: &Connection, job_id: &str) -> Result<()> {
    let client = connection.connect().await?;
    wait_on(&client, job_id).await
}

/// Poll until the job finishes; Ctrl+C stops at the next poll.
async fn wait_on(client: &Client, job_id: &str) -> Result<()> {
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            flag.store(true, Ordering::SeqCst);
        }
    });

    let result = client
        .wait_for_job_completion_with(job_id, || !interrupted.load(Ordering::SeqCst))
        .await;
    watcher.abort();

    let timings = result.with_context(|| format!("Job {} did not finish", job_id))?;
    eprintln!(
        "Job {} finished after {} polls (queued {:.1}s, processing {})",
        job_id,
        timings.polls,
        timings.queued.as_secs_f64(),
        timings
            .processing
            .map(|d| format!("{:.1}s", d.as_secs_f64()))
            .unwrap_or_else(|| "-".to_string()),
    );
    Ok(())
}
