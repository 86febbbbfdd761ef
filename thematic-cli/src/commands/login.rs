//! Login command - exchange credentials for an API key.

use super::Connection;
use anyhow::{Result, bail};

/// Run the login command, printing the API key.
pub async fn run(connection: &Connection) -> Result<()> {
    if connection.username.is_none() || connection.password.is_none() {
        bail!("login needs --username and --password");
    }

    let keyless = Connection {
        api_key: None,
        ..connection.clone()
    };
    let client = keyless.connect().await?;

    match client.api_key() {
        Some(key) => println!("{}", key),
        None => bail!("login succeeded without an API key"),
    }
    if let Some(cookie) = client.login_cookie() {
        tracing::debug!(cookie, "Session cookie");
    }

    Ok(())
}
