//! Core Thematic client implementation.

use crate::config::ClientConfig;
use crate::envelope::Envelope;
use crate::error::{ClientError, Result};
use crate::form::{FormFields, JobFiles};
use reqwest::{Client as HttpClient, Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, error, info};

/// Header carrying the API key on every authenticated call.
pub const AUTH_HEADER: &str = "X-API-Authentication";

/// How a response's HTTP status is treated before the envelope is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusCheck {
    /// Parse the envelope whatever the status.
    Lenient,
    /// Anything but 200 is an [`ClientError::Api`] error.
    Strict,
}

/// A client for interacting with the Thematic API.
///
/// # Example
///
/// ```no_run
/// use thematic_client::Client;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new("https://client.getthematic.com/api")?
///     .with_api_key("my-secret-key");
///
/// let details = client.get_job_details("job-123").await?;
/// println!("Job state: {}", details.state);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    /// Base URL for the Thematic service, without trailing slash.
    base_url: String,
    /// HTTP client.
    http: HttpClient,
    /// API key, known after construction or login.
    api_key: Option<String>,
    /// `Set-Cookie` header captured at login.
    login_cookie: Option<String>,
    /// Per-client settings.
    config: ClientConfig,
}

impl Client {
    /// Create a new Thematic client with the default configuration.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the service (e.g., "https://client.getthematic.com/api")
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(format!(
                "URL must start with http:// or https://, got: {}",
                base_url
            )));
        }

        let config = ClientConfig::default();
        let http = build_http(&config)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            api_key: None,
            login_cookie: None,
            config,
        })
    }

    /// Set an API key for authentication.
    ///
    /// The key will be sent in the `X-API-Authentication` header.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Replace the client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be rebuilt.
    pub fn with_config(mut self, config: ClientConfig) -> Result<Self> {
        self.http = build_http(&config)?;
        self.config = config;
        Ok(self)
    }

    /// Base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// API key in use, if any.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Session cookie returned by the last successful login.
    pub fn login_cookie(&self) -> Option<&str> {
        self.login_cookie.as_deref()
    }

    /// Active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn set_credentials(&mut self, api_key: String, login_cookie: Option<String>) {
        self.api_key = Some(api_key);
        self.login_cookie = login_cookie;
    }

    /// Build a full URL from a path.
    fn url(&self, path: &str) -> String {
        let path = path.strip_prefix('/').unwrap_or(path);
        format!("{}/{}", self.base_url, path)
    }

    /// Add authentication headers to a request.
    fn with_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        if let Some(ref key) = self.api_key {
            builder.header(AUTH_HEADER, key)
        } else {
            builder
        }
    }

    /// Start an authenticated request, logging its URL.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        if self.config.log_requests() {
            info!(%method, %url, "Calling URL");
        } else {
            debug!(%method, %url, "Calling URL");
        }
        self.with_auth(self.http.request(method, &url))
    }

    /// Send a request.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response> {
        request.send().await.map_err(ClientError::Http)
    }

    /// Send a request and return its body text, ignoring the status.
    pub(crate) async fn send_text(&self, request: RequestBuilder) -> Result<String> {
        let response = self.send(request).await?;
        response.text().await.map_err(ClientError::Http)
    }

    /// Read an envelope from a response and return its `data` payload.
    pub(crate) async fn handle_envelope(
        &self,
        operation: &'static str,
        response: Response,
        check: StatusCheck,
    ) -> Result<Value> {
        let status = response.status();
        let body = response.text().await?;

        if check == StatusCheck::Strict && status != StatusCode::OK {
            return Err(ClientError::Api {
                operation,
                status: status.as_u16(),
                message: body,
            });
        }

        let envelope: Envelope = serde_json::from_str(&body).map_err(|_| {
            error!(operation, status = status.as_u16(), %body, "Bad response");
            ClientError::BadResponse {
                operation,
                status: status.as_u16(),
                body: body.clone(),
            }
        })?;

        envelope.into_data(operation)
    }

    /// Submit form fields and files to a job endpoint, returning `data`.
    ///
    /// Without files the fields are sent url-encoded; with files, as one
    /// multipart body.
    pub(crate) async fn submit(
        &self,
        operation: &'static str,
        path: &str,
        fields: FormFields,
        files: JobFiles,
        check: StatusCheck,
    ) -> Result<Value> {
        let request = self.request(Method::POST, path);
        let request = if files.is_empty() {
            request.form(fields.as_pairs())
        } else {
            request.multipart(files.into_form(fields))
        };

        let response = self.send(request).await?;
        self.handle_envelope(operation, response, check).await
    }
}

/// Build the underlying HTTP client for a configuration.
fn build_http(config: &ClientConfig) -> Result<HttpClient> {
    HttpClient::builder()
        .timeout(config.timeout())
        .build()
        .map_err(ClientError::Http)
}

/// Read an identifier that the service may send as a string or a number.
pub(crate) fn id_field(data: &Value, key: &str) -> Option<String> {
    data.get(key).and_then(id_value)
}

pub(crate) fn id_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
