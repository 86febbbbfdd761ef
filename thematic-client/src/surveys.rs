//! Survey management operations.

use crate::client::{Client, StatusCheck};
use crate::error::{ClientError, Result};
use crate::form::{FormFields, wire_bool};
use crate::types::SurveyDetails;
use reqwest::Method;
use serde_json::Value;

/// Fields required to create a survey.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSurvey {
    /// Survey name.
    pub name: String,
    /// Number of columns in the uploaded data.
    pub total_columns: u32,
    /// Column schema, sent JSON-encoded.
    pub columns: Value,
    /// Whether the data has a header row.
    pub has_header: bool,
    /// Model set to analyse with.
    pub modelset_id: Option<String>,
    /// Output format of result CSVs.
    pub output_format: Option<String>,
}

impl NewSurvey {
    /// Describe a survey with the required fields.
    pub fn new(name: impl Into<String>, total_columns: u32, columns: Value, has_header: bool) -> Self {
        Self {
            name: name.into(),
            total_columns,
            columns,
            has_header,
            modelset_id: None,
            output_format: None,
        }
    }

    /// Analyse with a specific model set.
    #[must_use]
    pub fn with_modelset_id(mut self, modelset_id: impl Into<String>) -> Self {
        self.modelset_id = Some(modelset_id.into());
        self
    }

    /// Request a specific output format.
    #[must_use]
    pub fn with_output_format(mut self, output_format: impl Into<String>) -> Self {
        self.output_format = Some(output_format.into());
        self
    }

    fn form_fields(&self) -> FormFields {
        let mut fields = FormFields::new();
        fields.set("name", self.name.as_str());
        fields.set("total_columns", self.total_columns.to_string());
        fields.set("columns", self.columns.to_string());
        fields.set("has_header", wire_bool(self.has_header));
        fields.set_opt("modelset_id", self.modelset_id.as_deref());
        fields.set_opt("output_format", self.output_format.as_deref());
        fields
    }
}

/// Survey fields to change; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyFields {
    /// New name.
    pub name: Option<String>,
    /// New column count.
    pub total_columns: Option<u32>,
    /// New column schema, sent JSON-encoded.
    pub columns: Option<Value>,
    /// Whether the data has a header row.
    pub has_header: Option<bool>,
    /// New model set.
    pub modelset_id: Option<String>,
    /// New output format.
    pub output_format: Option<String>,
}

impl SurveyFields {
    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.form_fields().as_pairs().is_empty()
    }

    fn form_fields(&self) -> FormFields {
        let mut fields = FormFields::new();
        fields.set_opt("name", self.name.as_deref());
        fields.set_opt("total_columns", self.total_columns.map(|n| n.to_string()));
        fields.set_opt("columns", self.columns.as_ref().map(Value::to_string));
        fields.set_opt("has_header", self.has_header.map(wire_bool));
        fields.set_opt("modelset_id", self.modelset_id.as_deref());
        fields.set_opt("output_format", self.output_format.as_deref());
        fields
    }
}

impl Client {
    /// Create a survey.
    ///
    /// # Returns
    ///
    /// The new survey's metadata, which always includes `survey_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the survey or the response
    /// lacks a `survey_id`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use thematic_client::{Client, NewSurvey};
    /// # use serde_json::json;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = Client::new("http://localhost:8080")?;
    /// let survey = NewSurvey::new("Onboarding NPS", 2, json!([{"name": "comment"}]), true);
    /// let details = client.create_survey(&survey).await?;
    /// println!("Created survey {:?}", details.survey_id());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_survey(&self, survey: &NewSurvey) -> Result<SurveyDetails> {
        let request = self
            .request(Method::POST, "/create_survey")
            .form(survey.form_fields().as_pairs());
        let response = self.send(request).await?;
        let data = self
            .handle_envelope("create_survey", response, StatusCheck::Lenient)
            .await?;

        if data.get("survey_id").is_none() {
            return Err(ClientError::Protocol {
                operation: "create_survey",
                missing: "survey_id",
            });
        }

        Ok(serde_json::from_value(data)?)
    }

    /// Update fields of an existing survey.
    ///
    /// Only fields that are `Some` are sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the update.
    pub async fn update_survey(
        &self,
        survey_id: &str,
        fields: &SurveyFields,
    ) -> Result<SurveyDetails> {
        let path = format!("/survey/{}", survey_id);
        let request = self
            .request(Method::PUT, &path)
            .form(fields.form_fields().as_pairs());
        let response = self.send(request).await?;
        let data = self
            .handle_envelope("update_survey", response, StatusCheck::Lenient)
            .await?;

        Ok(serde_json::from_value(data)?)
    }

    /// Get a survey's metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the survey is unknown or the request fails.
    pub async fn get_survey_details(&self, survey_id: &str) -> Result<SurveyDetails> {
        let path = format!("/survey/{}", survey_id);
        let response = self.send(self.request(Method::GET, &path)).await?;
        let data = self
            .handle_envelope("get_survey_details", response, StatusCheck::Lenient)
            .await?;

        Ok(serde_json::from_value(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(fields: &FormFields) -> Vec<&str> {
        fields.as_pairs().iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn test_new_survey_fields() {
        let survey = NewSurvey::new("NPS", 3, json!(["a", "b", "c"]), false);
        let fields = survey.form_fields();
        assert_eq!(keys(&fields), vec!["name", "total_columns", "columns", "has_header"]);
        assert_eq!(fields.as_pairs()[2].1, r#"["a","b","c"]"#);
        assert_eq!(fields.as_pairs()[3].1, "False");
    }

    #[test]
    fn test_new_survey_optional_fields() {
        let survey = NewSurvey::new("NPS", 1, json!([]), true)
            .with_modelset_id("ms-9")
            .with_output_format("wide");
        assert_eq!(
            keys(&survey.form_fields()),
            vec![
                "name",
                "total_columns",
                "columns",
                "has_header",
                "modelset_id",
                "output_format"
            ]
        );
    }

    #[test]
    fn test_survey_fields_only_present() {
        let fields = SurveyFields {
            name: Some("Renamed".to_string()),
            has_header: Some(false),
            ..Default::default()
        };
        let form = fields.form_fields();
        assert_eq!(keys(&form), vec!["name", "has_header"]);
        assert_eq!(form.as_pairs()[0].1, "Renamed");
        assert!(SurveyFields::default().is_empty());
    }
}
