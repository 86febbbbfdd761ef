//! Survey commands - create, inspect and update surveys.

use super::{Connection, print_json};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use thematic_client::{NewSurvey, SurveyFields};

/// Options for creating a survey.
#[derive(Debug)]
pub struct CreateOptions {
    pub name: String,
    pub columns: String,
    pub total_columns: Option<u32>,
    pub no_header: bool,
    pub modelset_id: Option<String>,
    pub output_format: Option<String>,
}

/// Options for updating a survey; only given fields are sent.
#[derive(Debug, Default)]
pub struct UpdateOptions {
    pub name: Option<String>,
    pub columns: Option<String>,
    pub total_columns: Option<u32>,
    pub has_header: Option<bool>,
    pub modelset_id: Option<String>,
    pub output_format: Option<String>,
}

/// Create a survey and print its details.
pub async fn create(connection: &Connection, options: CreateOptions) -> Result<()> {
    let columns = parse_columns(&options.columns)?;
    let total_columns = match options.total_columns {
        Some(n) => n,
        None => column_count(&columns)?,
    };

    let mut survey = NewSurvey::new(options.name, total_columns, columns, !options.no_header);
    if let Some(id) = options.modelset_id {
        survey = survey.with_modelset_id(id);
    }
    if let Some(format) = options.output_format {
        survey = survey.with_output_format(format);
    }

    let client = connection.connect().await?;
    let details = client
        .create_survey(&survey)
        .await
        .context("Failed to create survey")?;

    tracing::info!(survey_id = ?details.survey_id(), "Survey created");
    print_json(&details)
}

/// Print the details of a survey.
pub async fn get(connection: &Connection, survey_id: &str) -> Result<()> {
    let client = connection.connect().await?;
    let details = client
        .get_survey_details(survey_id)
        .await
        .with_context(|| format!("Failed to get survey {}", survey_id))?;
    print_json(&details)
}

/// Update a survey and print its new details.
pub async fn update(connection: &Connection, survey_id: &str, options: UpdateOptions) -> Result<()> {
    let fields = SurveyFields {
        name: options.name,
        total_columns: options.total_columns,
        columns: options.columns.as_deref().map(parse_columns).transpose()?,
        has_header: options.has_header,
        modelset_id: options.modelset_id,
        output_format: options.output_format,
    };
    if fields.is_empty() {
        bail!("nothing to update: give at least one field");
    }

    let client = connection.connect().await?;
    let details = client
        .update_survey(survey_id, &fields)
        .await
        .with_context(|| format!("Failed to update survey {}", survey_id))?;
    print_json(&details)
}

fn parse_columns(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).context("--columns must be a JSON array")
}

fn column_count(columns: &Value) -> Result<u32> {
    let Some(array) = columns.as_array() else {
        bail!("--columns must be a JSON array when --total-columns is omitted");
    };
    u32::try_from(array.len()).context("too many columns")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_column_count_from_array() {
        let columns = parse_columns(r#"[{"name":"id"},{"name":"comment"}]"#).unwrap();
        assert_eq!(column_count(&columns).unwrap(), 2);
    }

    #[test]
    fn test_column_count_rejects_object() {
        assert!(column_count(&json!({"id": 0})).is_err());
    }

    #[test]
    fn test_parse_columns_invalid_json() {
        assert!(parse_columns("id,comment").is_err());
    }
}
