//! Job submission operations.

use crate::client::{Client, StatusCheck, id_field};
use crate::error::{ClientError, Result};
use crate::form::{FileField, FormFields, JobFiles, Upload};
use crate::types::{JobOptions, JobParams};
use serde_json::{Value, json};
use std::path::Path;

const CREATE_JOB: &str = "/create_job";

/// How new data relates to the data of the previous job.
#[derive(Debug, Clone, PartialEq)]
pub enum DataUpdate {
    /// Replace the survey data, optionally with new themes.
    Replace {
        /// Themes to apply to the replacement data.
        themes: Option<Upload>,
    },
    /// Append rows to the survey data.
    Incremental {
        /// Columns that identify a row across uploads.
        disambiguation_columns: Option<Value>,
    },
}

impl Client {
    /// Create a job from files already loaded into memory.
    ///
    /// # Arguments
    ///
    /// * `survey_id` - Survey the job belongs to
    /// * `files` - Files to upload
    /// * `previous_job_id` - Job this one follows on from
    /// * `params` - Extra form fields (for example `job_type`)
    ///
    /// # Returns
    ///
    /// The new job's id.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the job or the response
    /// lacks a `jobid`.
    pub async fn run_job_with_files(
        &self,
        survey_id: &str,
        files: JobFiles,
        previous_job_id: Option<&str>,
        params: &JobParams,
    ) -> Result<String> {
        let mut fields = FormFields::new();
        fields.set("survey_id", survey_id);
        fields.extend(params);
        fields.set_opt("previous_job_id", previous_job_id);

        let data = self
            .submit("run_job", CREATE_JOB, fields, files, StatusCheck::Lenient)
            .await?;
        job_id_from("run_job", &data)
    }

    /// Create a job from a CSV file and optional themes file on disk.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use thematic_client::{Client, JobParams};
    /// # use std::path::Path;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = Client::new("http://localhost:8080")?;
    /// let job_id = client
    ///     .run_job("survey-1", "responses.csv", None, None, &JobParams::new())
    ///     .await?;
    /// client.wait_for_job_completion(&job_id).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_job(
        &self,
        survey_id: &str,
        csv_path: impl AsRef<Path>,
        themes_path: Option<&Path>,
        previous_job_id: Option<&str>,
        params: &JobParams,
    ) -> Result<String> {
        let files = JobFiles::new()
            .attach(FileField::Csv, csv_path)
            .await?
            .attach_opt(FileField::Themes, themes_path)
            .await?;
        self.run_job_with_files(survey_id, files, previous_job_id, params)
            .await
    }

    /// Create a job that restores the state captured in an artifact bundle.
    pub async fn create_job_from_artifacts(
        &self,
        survey_id: &str,
        artifacts_path: impl AsRef<Path>,
    ) -> Result<String> {
        let files = JobFiles::new()
            .attach(FileField::Artifacts, artifacts_path)
            .await?;
        self.run_job_with_files(survey_id, files, None, &JobParams::new())
            .await
    }

    /// Create a job that removes the rows listed in a CSV file.
    ///
    /// # Arguments
    ///
    /// * `rows_path` - CSV of rows to delete
    /// * `previous_job_id` - Job whose data the rows are removed from
    /// * `disambiguation_columns` - Columns that identify a row
    pub async fn delete_rows(
        &self,
        survey_id: &str,
        rows_path: impl AsRef<Path>,
        previous_job_id: &str,
        disambiguation_columns: &Value,
    ) -> Result<String> {
        let mut params = JobParams::new();
        params.insert("job_type".to_string(), "deleterows".to_string());
        params.insert(
            "updated_parameters".to_string(),
            json!({ "disambiguation_columns": disambiguation_columns }).to_string(),
        );

        let files = JobFiles::new().attach(FileField::Csv, rows_path).await?;
        self.run_job_with_files(survey_id, files, Some(previous_job_id), &params)
            .await
    }

    /// Create a job that replaces or extends the data of a previous job.
    ///
    /// # Errors
    ///
    /// Any status other than 200 is an [`ClientError::Api`] error.
    pub async fn run_data_update(
        &self,
        survey_id: &str,
        csv: Upload,
        previous_job_id: Option<&str>,
        update: DataUpdate,
        job_options: &JobOptions,
    ) -> Result<String> {
        let mut files = JobFiles::new().with(FileField::Csv, csv);
        let mut fields = FormFields::new();
        fields.set("survey_id", survey_id);

        let operation = match update {
            DataUpdate::Replace { themes } => {
                fields.set("job_type", "apply");
                fields.set("job_options", serde_json::to_string(job_options)?);
                if let Some(themes) = themes {
                    files.insert(FileField::Themes, themes);
                }
                "run_replace_data"
            }
            DataUpdate::Incremental {
                disambiguation_columns,
            } => {
                fields.set("job_type", "incremental_data");
                fields.set("job_options", serde_json::to_string(job_options)?);
                let columns = disambiguation_columns.unwrap_or(Value::Null);
                fields.set(
                    "updated_parameters",
                    json!({ "disambiguation_columns": columns }).to_string(),
                );
                "run_incremental_update"
            }
        };
        fields.set_opt("previous_job_id", previous_job_id);

        let data = self
            .submit(operation, CREATE_JOB, fields, files, StatusCheck::Strict)
            .await?;
        job_id_from(operation, &data)
    }

    /// Replace the data of a previous job with a new CSV file.
    pub async fn run_replace_data(
        &self,
        survey_id: &str,
        csv_path: impl AsRef<Path>,
        previous_job_id: &str,
        themes_path: Option<&Path>,
        job_options: &JobOptions,
    ) -> Result<String> {
        let csv = Upload::from_path(csv_path).await?;
        let themes = match themes_path {
            Some(path) => Some(Upload::from_path(path).await?),
            None => None,
        };
        self.run_data_update(
            survey_id,
            csv,
            Some(previous_job_id),
            DataUpdate::Replace { themes },
            job_options,
        )
        .await
    }

    /// Add the rows of a CSV file to the data of a previous job.
    pub async fn run_incremental_update(
        &self,
        survey_id: &str,
        csv_path: impl AsRef<Path>,
        previous_job_id: &str,
        disambiguation_columns: Option<Value>,
        job_options: &JobOptions,
    ) -> Result<String> {
        let csv = Upload::from_path(csv_path).await?;
        self.run_data_update(
            survey_id,
            csv,
            Some(previous_job_id),
            DataUpdate::Incremental {
                disambiguation_columns,
            },
            job_options,
        )
        .await
    }

    /// Create a translation job for a CSV file.
    ///
    /// `columns`, when given, is merged into the job options.
    pub async fn run_translations(
        &self,
        survey_id: &str,
        csv_path: impl AsRef<Path>,
        columns: Option<Value>,
        job_options: &JobOptions,
    ) -> Result<String> {
        let mut options = job_options.clone();
        if let Some(columns) = columns {
            options.insert("columns".to_string(), columns);
        }

        let mut fields = FormFields::new();
        fields.set("survey_id", survey_id);
        fields.set("job_type", "translate");
        fields.set("job_options", serde_json::to_string(&options)?);

        let files = JobFiles::new().attach(FileField::Csv, csv_path).await?;
        let data = self
            .submit(
                "run_translations",
                CREATE_JOB,
                fields,
                files,
                StatusCheck::Strict,
            )
            .await?;
        job_id_from("run_translations", &data)
    }

    /// Ask the service to suggest new themes for the data of a job.
    ///
    /// # Returns
    ///
    /// The `data` payload describing the discovered themes.
    pub async fn discover_new_themes(
        &self,
        job_id: &str,
        csv_path: impl AsRef<Path>,
        themes_path: Option<&Path>,
    ) -> Result<Value> {
        let mut fields = FormFields::new();
        fields.set("job_id", job_id);

        let files = JobFiles::new()
            .attach(FileField::Csv, csv_path)
            .await?
            .attach_opt(FileField::Themes, themes_path)
            .await?;
        self.submit(
            "discover_new_themes",
            "/helpers/discoverThemes",
            fields,
            files,
            StatusCheck::Strict,
        )
        .await
    }
}

/// Extract the job id from a job creation payload.
pub(crate) fn job_id_from(operation: &'static str, data: &Value) -> Result<String> {
    id_field(data, "jobid").ok_or(ClientError::Protocol {
        operation,
        missing: "jobid",
    })
}
