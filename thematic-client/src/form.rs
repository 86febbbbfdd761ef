//! Form fields and file uploads for job requests.

use crate::error::Result;
use reqwest::multipart::{Form, Part};
use std::fmt;
use std::path::Path;

/// Multipart field a file is uploaded under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileField {
    /// Survey data.
    Csv,
    /// Theme definitions.
    Themes,
    /// Concept definitions.
    Concepts,
    /// Noun frequency list.
    Nouns,
    /// Verb frequency list.
    Verbs,
    /// Adjective frequency list.
    Adjectives,
    /// Language model.
    Model,
    /// Stopword list.
    Stopwords,
    /// Artifact bundle from an earlier job.
    Artifacts,
}

impl FileField {
    /// Wire name of the field.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Csv => "csv_file",
            Self::Themes => "themes_file",
            Self::Concepts => "concepts_file",
            Self::Nouns => "nouns_file",
            Self::Verbs => "verbs_file",
            Self::Adjectives => "adjectives_file",
            Self::Model => "model_file",
            Self::Stopwords => "stopwords_file",
            Self::Artifacts => "artifacts_file",
        }
    }
}

impl fmt::Display for FileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// A file to upload: its name and full contents.
///
/// Contents are read eagerly, so no file handle outlives construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    file_name: String,
    contents: Vec<u8>,
}

impl Upload {
    /// Read a file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        Ok(Self {
            file_name,
            contents,
        })
    }

    /// Wrap bytes already in memory.
    pub fn from_bytes(file_name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            contents: contents.into(),
        }
    }

    /// File name sent with the part.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Size of the contents in bytes.
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// Whether the upload is empty.
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    fn into_part(self) -> Part {
        Part::bytes(self.contents).file_name(self.file_name)
    }
}

/// The ordered set of files attached to one job request.
#[derive(Debug, Clone, Default)]
pub struct JobFiles {
    parts: Vec<(FileField, Upload)>,
}

impl JobFiles {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, replacing any earlier upload for the same field.
    #[must_use]
    pub fn with(mut self, field: FileField, upload: Upload) -> Self {
        self.insert(field, upload);
        self
    }

    /// Add a file in place, replacing any earlier upload for the same field.
    pub fn insert(&mut self, field: FileField, upload: Upload) {
        match self.parts.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = upload,
            None => self.parts.push((field, upload)),
        }
    }

    /// Read a file from disk into the set.
    pub(crate) async fn attach(mut self, field: FileField, path: impl AsRef<Path>) -> Result<Self> {
        self.insert(field, Upload::from_path(path).await?);
        Ok(self)
    }

    /// Read a file into the set when a path is given.
    pub(crate) async fn attach_opt(self, field: FileField, path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => self.attach(field, path).await,
            None => Ok(self),
        }
    }

    /// Fields present, in attachment order.
    pub fn fields(&self) -> impl Iterator<Item = FileField> + '_ {
        self.parts.iter().map(|(f, _)| *f)
    }

    /// Whether no files are attached.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Build a multipart body: text fields first, then files.
    pub(crate) fn into_form(self, fields: FormFields) -> Form {
        let form = fields
            .0
            .into_iter()
            .fold(Form::new(), |form, (key, value)| form.text(key, value));

        self.parts
            .into_iter()
            .fold(form, |form, (field, upload)| {
                form.part(field.field_name(), upload.into_part())
            })
    }
}

/// Ordered text form fields; setting an existing key replaces its value
/// in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FormFields(Vec<(String, String)>);

impl FormFields {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub(crate) fn set_opt(&mut self, key: &str, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    pub(crate) fn extend<'a>(&mut self, pairs: impl IntoIterator<Item = (&'a String, &'a String)>) {
        for (key, value) in pairs {
            self.set(key.as_str(), value.as_str());
        }
    }

    pub(crate) fn as_pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

/// Boolean form value in the service's wire form.
pub(crate) fn wire_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names() {
        assert_eq!(FileField::Csv.field_name(), "csv_file");
        assert_eq!(FileField::Model.field_name(), "model_file");
        assert_eq!(FileField::Artifacts.to_string(), "artifacts_file");
    }

    #[test]
    fn test_job_files_replace_same_field() {
        let files = JobFiles::new()
            .with(FileField::Csv, Upload::from_bytes("a.csv", "a"))
            .with(FileField::Themes, Upload::from_bytes("t.json", "{}"))
            .with(FileField::Csv, Upload::from_bytes("b.csv", "b"));

        let fields: Vec<_> = files.fields().collect();
        assert_eq!(fields, vec![FileField::Csv, FileField::Themes]);
        assert_eq!(files.parts[0].1.file_name(), "b.csv");
    }

    #[test]
    fn test_form_fields_keep_first_position() {
        let mut fields = FormFields::new();
        fields.set("survey_id", "1");
        fields.set("job_type", "apply");
        fields.set("survey_id", "2");
        fields.set_opt("previous_job_id", None::<String>);

        assert_eq!(
            fields.as_pairs(),
            &[
                ("survey_id".to_string(), "2".to_string()),
                ("job_type".to_string(), "apply".to_string()),
            ]
        );
    }

    #[test]
    fn test_wire_bool() {
        assert_eq!(wire_bool(true), "True");
        assert_eq!(wire_bool(false), "False");
    }

    #[tokio::test]
    async fn test_upload_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.csv");
        std::fs::write(&path, b"id,comment\n1,great\n").unwrap();

        let upload = Upload::from_path(&path).await.unwrap();
        assert_eq!(upload.file_name(), "survey.csv");
        assert_eq!(upload.len(), 19);
    }

    #[tokio::test]
    async fn test_upload_missing_file() {
        let result = Upload::from_path("/definitely/not/here.csv").await;
        assert!(matches!(result, Err(crate::ClientError::Io(_))));
    }
}
