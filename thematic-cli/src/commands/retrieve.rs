//! Retrieve commands - download job artifacts and parameters.

use super::{Connection, print_json};
use anyhow::{Context, Result, bail};
use std::path::Path;
use thematic_client::Artifact;

/// Download an artifact to a file, or to stdout when no path is given.
pub async fn artifact(
    connection: &Connection,
    artifact: Artifact,
    job_id: &str,
    output: Option<&Path>,
) -> Result<()> {
    let client = connection.connect().await?;

    let written = match output {
        Some(path) => {
            let mut file = tokio::fs::File::create(path)
                .await
                .with_context(|| format!("Failed to create {}", path.display()))?;
            client.retrieve_to(job_id, artifact, &mut file).await
        }
        None => {
            let mut stdout = tokio::io::stdout();
            client.retrieve_to(job_id, artifact, &mut stdout).await
        }
    }
    .with_context(|| format!("Failed to retrieve {} for job {}", artifact, job_id))?;

    match written {
        Some(bytes) => {
            tracing::info!(%artifact, job_id, bytes, "Artifact retrieved");
            Ok(())
        }
        None => {
            if let Some(path) = output {
                // Leave no empty file behind.
                let _ = tokio::fs::remove_file(path).await;
            }
            bail!("{} is not available for job {}", artifact, job_id)
        }
    }
}

/// Print the parameters a job ran with.
pub async fn params(connection: &Connection, job_id: &str) -> Result<()> {
    let client = connection.connect().await?;
    let params = client
        .retrieve_parameters(job_id)
        .await
        .with_context(|| format!("Failed to get parameters of job {}", job_id))?;
    print_json(&params)
}
