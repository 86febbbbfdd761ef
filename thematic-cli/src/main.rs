//! Thematic CLI - Command-line interface for the Thematic text-analytics API.

mod commands;
mod observability;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::Connection;
use observability::{TracingConfig, init_tracing, verbosity_filter};
use std::path::PathBuf;
use thematic_client::Artifact;

/// Thematic - upload survey data, run analysis jobs and fetch the results.
#[derive(Parser)]
#[command(name = "thematic")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    connection: Connection,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and print the API key
    Login,

    /// Survey management commands
    Survey {
        #[command(subcommand)]
        action: SurveyAction,
    },

    /// Job management commands
    Job {
        #[command(subcommand)]
        action: JobAction,
    },

    /// Download a job artifact
    Retrieve {
        /// Artifact to download (csv, incremental_csv, themes, stopwords,
        /// concepts, nouns, verbs, adjectives, artifacts, language_model)
        artifact: Artifact,

        /// Job ID
        job_id: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the parameters a job ran with
    Params {
        /// Job ID
        job_id: String,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum SurveyAction {
    /// Create a survey
    Create {
        /// Survey name
        #[arg(short, long)]
        name: String,

        /// Column descriptions as a JSON array
        #[arg(short, long)]
        columns: String,

        /// Number of columns (defaults to the length of --columns)
        #[arg(long)]
        total_columns: Option<u32>,

        /// The data has no header row
        #[arg(long)]
        no_header: bool,

        /// Model set to analyze with
        #[arg(long)]
        modelset_id: Option<String>,

        /// Output format of coded data
        #[arg(long)]
        output_format: Option<String>,
    },

    /// Show the details of a survey
    Get {
        /// Survey ID
        survey_id: String,
    },

    /// Update fields of a survey
    Update {
        /// Survey ID
        survey_id: String,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        /// New column descriptions as a JSON array
        #[arg(short, long)]
        columns: Option<String>,

        /// New number of columns
        #[arg(long)]
        total_columns: Option<u32>,

        /// Whether the data has a header row
        #[arg(long)]
        has_header: Option<bool>,

        /// New model set
        #[arg(long)]
        modelset_id: Option<String>,

        /// New output format
        #[arg(long)]
        output_format: Option<String>,
    },
}

#[derive(Subcommand)]
enum JobAction {
    /// Upload data and start a job
    Run {
        /// Survey ID
        survey_id: String,

        /// CSV file to upload
        #[arg(long)]
        csv: PathBuf,

        /// Themes file to upload
        #[arg(long)]
        themes: Option<PathBuf>,

        /// Job this one follows on from
        #[arg(short, long)]
        previous: Option<String>,

        /// Extra job parameter (repeatable)
        #[arg(long = "param", value_name = "KEY=VALUE", value_parser = commands::job::parse_key_val)]
        params: Vec<(String, String)>,

        /// Wait for the job to finish
        #[arg(short, long)]
        wait: bool,
    },

    /// Show the details of a job
    Status {
        /// Job ID
        job_id: String,
    },

    /// Show the log of a job
    Logs {
        /// Job ID
        job_id: String,
    },

    /// List jobs
    List {
        /// Only jobs of this survey
        #[arg(short, long)]
        survey: Option<String>,

        /// Only jobs of this type
        #[arg(short = 't', long)]
        job_type: Option<String>,
    },

    /// Cancel a job
    Cancel {
        /// Job ID
        job_id: String,
    },

    /// Delete a job
    Delete {
        /// Job ID
        job_id: String,
    },

    /// Wait for a job to finish
    Wait {
        /// Job ID
        job_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&TracingConfig::from_env(verbosity_filter(cli.verbose)))?;

    let connection = &cli.connection;
    match cli.command {
        Commands::Login => commands::login::run(connection).await,
        Commands::Survey { action } => match action {
            SurveyAction::Create {
                name,
                columns,
                total_columns,
                no_header,
                modelset_id,
                output_format,
            } => {
                let options = commands::survey::CreateOptions {
                    name,
                    columns,
                    total_columns,
                    no_header,
                    modelset_id,
                    output_format,
                };
                commands::survey::create(connection, options).await
            }
            SurveyAction::Get { survey_id } => commands::survey::get(connection, &survey_id).await,
            SurveyAction::Update {
                survey_id,
                name,
                columns,
                total_columns,
                has_header,
                modelset_id,
                output_format,
            } => {
                let options = commands::survey::UpdateOptions {
                    name,
                    columns,
                    total_columns,
                    has_header,
                    modelset_id,
                    output_format,
                };
                commands::survey::update(connection, &survey_id, options).await
            }
        },
        Commands::Job { action } => match action {
            JobAction::Run {
                survey_id,
                csv,
                themes,
                previous,
                params,
                wait,
            } => {
                let options = commands::job::RunOptions {
                    survey_id,
                    csv,
                    themes,
                    previous_job_id: previous,
                    params,
                    wait,
                };
                commands::job::run(connection, options).await
            }
            JobAction::Status { job_id } => commands::job::status(connection, &job_id).await,
            JobAction::Logs { job_id } => commands::job::logs(connection, &job_id).await,
            JobAction::List { survey, job_type } => {
                commands::job::list(connection, survey.as_deref(), job_type.as_deref()).await
            }
            JobAction::Cancel { job_id } => commands::job::cancel(connection, &job_id).await,
            JobAction::Delete { job_id } => commands::job::delete(connection, &job_id).await,
            JobAction::Wait { job_id } => commands::job::wait(connection, &job_id).await,
        },
        Commands::Retrieve {
            artifact,
            job_id,
            output,
        } => commands::retrieve::artifact(connection, artifact, &job_id, output.as_deref()).await,
        Commands::Params { job_id } => commands::retrieve::params(connection, &job_id).await,
        Commands::Version => commands::version::run(),
    }
}
