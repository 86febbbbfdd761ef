//! Retrieval of job output artifacts.

use crate::client::{Client, StatusCheck};
use crate::error::Result;
use bytes::Bytes;
use reqwest::{Method, Response, StatusCode};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::error;

/// A downloadable job output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    /// Coded survey data.
    Csv,
    /// Coded data of the latest incremental upload.
    IncrementalCsv,
    /// Theme definitions.
    Themes,
    /// Stopword list.
    Stopwords,
    /// Concept definitions.
    Concepts,
    /// Noun frequencies.
    Nouns,
    /// Verb frequencies.
    Verbs,
    /// Adjective frequencies.
    Adjectives,
    /// Bundle of every artifact, for [`Client::create_job_from_artifacts`].
    Artifacts,
    /// Language model.
    LanguageModel,
}

impl Artifact {
    /// Every artifact kind.
    pub const ALL: [Artifact; 10] = [
        Self::Csv,
        Self::IncrementalCsv,
        Self::Themes,
        Self::Stopwords,
        Self::Concepts,
        Self::Nouns,
        Self::Verbs,
        Self::Adjectives,
        Self::Artifacts,
        Self::LanguageModel,
    ];

    /// Resource name under `/job/{id}/`.
    pub fn resource(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::IncrementalCsv => "incremental_csv",
            Self::Themes => "themes",
            Self::Stopwords => "stopwords",
            Self::Concepts => "concepts",
            Self::Nouns => "nouns",
            Self::Verbs => "verbs",
            Self::Adjectives => "adjectives",
            Self::Artifacts => "artifacts",
            Self::LanguageModel => "language_model",
        }
    }

    fn path(self, job_id: &str) -> String {
        format!("/job/{}/{}/", job_id, self.resource())
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource())
    }
}

impl FromStr for Artifact {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|a| a.resource() == normalized)
            .ok_or_else(|| format!("unknown artifact: {}", s))
    }
}

impl Client {
    /// Download an artifact into memory.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the service answers with a status other than 200.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn retrieve(&self, job_id: &str, artifact: Artifact) -> Result<Option<Bytes>> {
        let path = artifact.path(job_id);
        let response = self.send(self.request(Method::GET, &path)).await?;
        let Some(response) = ok_or_log(artifact, response).await else {
            return Ok(None);
        };

        Ok(Some(response.bytes().await?))
    }

    /// Stream an artifact into a sink chunk by chunk.
    ///
    /// Nothing is written when the service answers with a status other
    /// than 200.
    ///
    /// # Returns
    ///
    /// The number of bytes written, or `Ok(None)` on a non-200 status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or writing to the sink fails.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use thematic_client::{Artifact, Client};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = Client::new("http://localhost:8080")?;
    /// let mut file = tokio::fs::File::create("results.csv").await?;
    /// match client.retrieve_to("job-123", Artifact::Csv, &mut file).await? {
    ///     Some(bytes) => println!("Wrote {} bytes", bytes),
    ///     None => println!("Results not available"),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn retrieve_to<W>(
        &self,
        job_id: &str,
        artifact: Artifact,
        sink: &mut W,
    ) -> Result<Option<u64>>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let path = artifact.path(job_id);
        let response = self.send(self.request(Method::GET, &path)).await?;
        let Some(mut response) = ok_or_log(artifact, response).await else {
            return Ok(None);
        };

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            sink.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        sink.flush().await?;

        Ok(Some(written))
    }

    /// Download the coded survey data.
    pub async fn retrieve_csv(&self, job_id: &str) -> Result<Option<Bytes>> {
        self.retrieve(job_id, Artifact::Csv).await
    }

    /// Download the coded data of the latest incremental upload.
    pub async fn retrieve_incremental_csv(&self, job_id: &str) -> Result<Option<Bytes>> {
        self.retrieve(job_id, Artifact::IncrementalCsv).await
    }

    /// Download the theme definitions.
    pub async fn retrieve_themes(&self, job_id: &str) -> Result<Option<Bytes>> {
        self.retrieve(job_id, Artifact::Themes).await
    }

    /// Download the stopword list.
    pub async fn retrieve_stopwords(&self, job_id: &str) -> Result<Option<Bytes>> {
        self.retrieve(job_id, Artifact::Stopwords).await
    }

    /// Download the concept definitions.
    pub async fn retrieve_concepts(&self, job_id: &str) -> Result<Option<Bytes>> {
        self.retrieve(job_id, Artifact::Concepts).await
    }

    /// Download the noun frequencies.
    pub async fn retrieve_nouns(&self, job_id: &str) -> Result<Option<Bytes>> {
        self.retrieve(job_id, Artifact::Nouns).await
    }

    /// Download the verb frequencies.
    pub async fn retrieve_verbs(&self, job_id: &str) -> Result<Option<Bytes>> {
        self.retrieve(job_id, Artifact::Verbs).await
    }

    /// Download the adjective frequencies.
    pub async fn retrieve_adjectives(&self, job_id: &str) -> Result<Option<Bytes>> {
        self.retrieve(job_id, Artifact::Adjectives).await
    }

    /// Download the language model.
    pub async fn retrieve_language_model(&self, job_id: &str) -> Result<Option<Bytes>> {
        self.retrieve(job_id, Artifact::LanguageModel).await
    }

    /// Stream the artifact bundle into a sink.
    ///
    /// The bundle is only served as a stream, so a sink is required.
    pub async fn retrieve_artifacts<W>(&self, job_id: &str, sink: &mut W) -> Result<Option<u64>>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        self.retrieve_to(job_id, Artifact::Artifacts, sink).await
    }

    /// Get the parameters a job ran with.
    ///
    /// # Errors
    ///
    /// Returns an error if the envelope is malformed or rejected.
    pub async fn retrieve_parameters(&self, job_id: &str) -> Result<Value> {
        let path = format!("/job/{}/params", job_id);
        let response = self.send(self.request(Method::GET, &path)).await?;
        self.handle_envelope("retrieve_parameters", response, StatusCheck::Lenient)
            .await
    }
}

/// Pass a 200 response through; log and drop anything else.
async fn ok_or_log(artifact: Artifact, response: Response) -> Option<Response> {
    let status = response.status();
    if status == StatusCode::OK {
        return Some(response);
    }

    let body = response.text().await.unwrap_or_default();
    error!(%artifact, status = status.as_u16(), %body, "Failed to retrieve");
    None
}
