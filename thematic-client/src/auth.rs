//! Login and API key retrieval.

use crate::client::{Client, StatusCheck};
use crate::error::{ClientError, Result};
use reqwest::Method;
use reqwest::header::SET_COOKIE;
use serde_json::Value;

impl Client {
    /// Log in with a username and password and return an authenticated client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Auth`] if the credentials are refused or the
    /// response is malformed, or a transport error if the request fails.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use thematic_client::Client;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::from_login("https://client.getthematic.com/api", "me", "secret").await?;
    /// println!("Logged in, key: {:?}", client.api_key());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn from_login(
        base_url: impl Into<String>,
        username: &str,
        password: &str,
    ) -> Result<Self> {
        let mut client = Self::new(base_url)?;
        client.retrieve_apikey(username, password).await?;
        Ok(client)
    }

    /// Exchange credentials for an API key and store it on this client.
    ///
    /// The session cookie set by the server is kept alongside the key.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Auth`] if the login is refused or the
    /// response is malformed.
    pub async fn retrieve_apikey(&mut self, username: &str, password: &str) -> Result<()> {
        let request = self
            .request(Method::POST, "/login")
            .form(&[("username", username), ("password", password)]);
        let response = self.send(request).await?;

        let login_cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let data = self
            .handle_envelope("retrieve_apikey", response, StatusCheck::Lenient)
            .await
            .map_err(|err| match err {
                ClientError::Rejected { message, .. } => {
                    ClientError::Auth(format!("failed to login ({message})"))
                }
                ClientError::BadResponse { status, .. } => {
                    ClientError::Auth(format!("bad response (status {status})"))
                }
                other => other,
            })?;

        let api_key = data
            .get("api_key")
            .and_then(Value::as_str)
            .ok_or_else(|| ClientError::Auth("response did not include an api_key".to_string()))?;

        tracing::info!(username, "Logged in");
        self.set_credentials(api_key.to_string(), login_cookie);
        Ok(())
    }
}
