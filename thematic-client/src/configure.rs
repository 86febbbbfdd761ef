//! Follow-on jobs that reconfigure an existing job.

use crate::client::{Client, StatusCheck};
use crate::error::Result;
use crate::form::{FileField, FormFields, JobFiles};
use crate::jobs::job_id_from;
use crate::types::{JobOptions, JobParams};
use std::path::Path;

/// The three part-of-speech lists used for word frequencies.
#[derive(Debug, Clone, Copy)]
pub struct WordLists<'a> {
    /// Noun list.
    pub nouns: &'a Path,
    /// Verb list.
    pub verbs: &'a Path,
    /// Adjective list.
    pub adjectives: &'a Path,
}

impl Client {
    /// Replace the concepts of a job, creating a new job.
    ///
    /// # Arguments
    ///
    /// * `concepts_path` - Concepts file
    /// * `previous_job_id` - Job to reconfigure
    /// * `data_path` - Replacement data, if any
    /// * `themes_path` - Replacement themes, if any
    /// * `job_options` - Options for the new job
    ///
    /// # Returns
    ///
    /// The new job's id.
    ///
    /// # Errors
    ///
    /// Returns an error on any non-200 status, on a rejected envelope, or
    /// when the response lacks a `jobid`.
    pub async fn configure_concepts(
        &self,
        concepts_path: impl AsRef<Path>,
        previous_job_id: &str,
        data_path: Option<&Path>,
        themes_path: Option<&Path>,
        job_options: &JobOptions,
    ) -> Result<String> {
        let files = JobFiles::new()
            .attach(FileField::Concepts, concepts_path)
            .await?
            .attach_opt(FileField::Csv, data_path)
            .await?
            .attach_opt(FileField::Themes, themes_path)
            .await?;
        self.configure(
            "configure_concepts",
            previous_job_id,
            "concepts",
            files,
            job_options,
        )
        .await
    }

    /// Replace the word frequency lists of a job, creating a new job.
    pub async fn configure_word_frequencies(
        &self,
        lists: WordLists<'_>,
        previous_job_id: &str,
        data_path: Option<&Path>,
        themes_path: Option<&Path>,
        job_options: &JobOptions,
    ) -> Result<String> {
        let files = JobFiles::new()
            .attach(FileField::Nouns, lists.nouns)
            .await?
            .attach(FileField::Verbs, lists.verbs)
            .await?
            .attach(FileField::Adjectives, lists.adjectives)
            .await?
            .attach_opt(FileField::Csv, data_path)
            .await?
            .attach_opt(FileField::Themes, themes_path)
            .await?;
        self.configure(
            "configure_word_frequencies",
            previous_job_id,
            "word_frequencies",
            files,
            job_options,
        )
        .await
    }

    /// Replace the themes of a job, creating a new job.
    pub async fn configure_themes(
        &self,
        themes_path: impl AsRef<Path>,
        previous_job_id: &str,
        data_path: Option<&Path>,
        job_options: &JobOptions,
    ) -> Result<String> {
        let files = JobFiles::new()
            .attach(FileField::Themes, themes_path)
            .await?
            .attach_opt(FileField::Csv, data_path)
            .await?;
        self.configure(
            "configure_themes",
            previous_job_id,
            "themes",
            files,
            job_options,
        )
        .await
    }

    /// Replace the language model of a job, creating a new job.
    pub async fn configure_language_model(
        &self,
        model_path: impl AsRef<Path>,
        previous_job_id: &str,
        data_path: Option<&Path>,
        themes_path: Option<&Path>,
        job_options: &JobOptions,
    ) -> Result<String> {
        let files = JobFiles::new()
            .attach(FileField::Model, model_path)
            .await?
            .attach_opt(FileField::Csv, data_path)
            .await?
            .attach_opt(FileField::Themes, themes_path)
            .await?;
        self.configure(
            "configure_language_model",
            previous_job_id,
            "language_model",
            files,
            job_options,
        )
        .await
    }

    /// Replace the stopwords of a job, creating a new job.
    pub async fn configure_stopwords(
        &self,
        stopwords_path: impl AsRef<Path>,
        previous_job_id: &str,
        data_path: Option<&Path>,
        themes_path: Option<&Path>,
        job_options: &JobOptions,
    ) -> Result<String> {
        let files = JobFiles::new()
            .attach(FileField::Stopwords, stopwords_path)
            .await?
            .attach_opt(FileField::Csv, data_path)
            .await?
            .attach_opt(FileField::Themes, themes_path)
            .await?;
        self.configure(
            "configure_stopwords",
            previous_job_id,
            "stopwords",
            files,
            job_options,
        )
        .await
    }

    /// Replace the parameters of a job, creating a new job.
    ///
    /// The parameters are sent as plain form fields.
    pub async fn configure_parameters(
        &self,
        parameters: &JobParams,
        previous_job_id: &str,
        data_path: Option<&Path>,
        themes_path: Option<&Path>,
    ) -> Result<String> {
        let mut fields = FormFields::new();
        fields.extend(parameters);

        let files = JobFiles::new()
            .attach_opt(FileField::Csv, data_path)
            .await?
            .attach_opt(FileField::Themes, themes_path)
            .await?;

        let path = format!("/job/{}/params", previous_job_id);
        let data = self
            .submit(
                "configure_parameters",
                &path,
                fields,
                files,
                StatusCheck::Strict,
            )
            .await?;
        job_id_from("configure_parameters", &data)
    }

    async fn configure(
        &self,
        operation: &'static str,
        previous_job_id: &str,
        resource: &str,
        files: JobFiles,
        job_options: &JobOptions,
    ) -> Result<String> {
        let mut fields = FormFields::new();
        fields.set("job_options", serde_json::to_string(job_options)?);

        let path = format!("/job/{}/{}", previous_job_id, resource);
        let data = self
            .submit(operation, &path, fields, files, StatusCheck::Strict)
            .await?;
        job_id_from(operation, &data)
    }
}
