//! CLI command implementations.

pub mod job;
pub mod login;
pub mod retrieve;
pub mod survey;
pub mod version;

use anyhow::{Context, Result, bail};
use clap::Args;
use serde::Serialize;
use thematic_client::{Client, ClientConfig};

/// Service location and credentials shared by every remote command.
#[derive(Debug, Clone, Args)]
pub struct Connection {
    /// Base URL of the Thematic API
    #[arg(
        long,
        global = true,
        env = "THEMATIC_URL",
        default_value = "https://client.getthematic.com/api"
    )]
    pub url: String,

    /// API key (skips login)
    #[arg(long, global = true, env = "THEMATIC_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Username to log in with
    #[arg(long, global = true, env = "THEMATIC_USERNAME")]
    pub username: Option<String>,

    /// Password to log in with
    #[arg(long, global = true, env = "THEMATIC_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl Connection {
    /// Build a client, logging in when no API key is given.
    pub async fn connect(&self) -> Result<Client> {
        let client = Client::new(&self.url)?.with_config(ClientConfig::from_env())?;

        if let Some(ref key) = self.api_key {
            return Ok(client.with_api_key(key));
        }

        match (&self.username, &self.password) {
            (Some(username), Some(password)) => self.login(client, username, password).await,
            _ => bail!(
                "no credentials: pass --api-key, or --username and --password \
                 (or set THEMATIC_API_KEY / THEMATIC_USERNAME / THEMATIC_PASSWORD)"
            ),
        }
    }

    async fn login(&self, mut client: Client, username: &str, password: &str) -> Result<Client> {
        client
            .retrieve_apikey(username, password)
            .await
            .with_context(|| format!("Failed to log in to {}", self.url))?;
        Ok(client)
    }
}

/// Print a value as pretty JSON on stdout.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to format response")?;
    println!("{}", text);
    Ok(())
}
