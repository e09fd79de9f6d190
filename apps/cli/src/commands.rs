//! CLI command definitions, routing, and tracing setup.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use nebo_core::{Services, search_accounts};
use nebo_salesforce::{SalesforceClient, SalesforceOptions};
use nebo_shared::{
    AppConfig, init_config, load_config, resolve_credentials, resolve_salesforce_credentials,
};
use nebo_slack::{SlackClient, VerificationToken};
use tracing::info;

use crate::server::{self, AppState};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Nebo: find the rep behind a customer account.
#[derive(Parser)]
#[command(
    name = "nebo",
    version,
    about = "Slack slash commands for looking up customer accounts in Salesforce.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Serve the Slack slash-command endpoint.
    ///
    /// Restart the server when Salesforce expires its session.
    Serve {
        /// Listen address (defaults to `[server] bind` from the config file).
        #[arg(long, env = "NEBO_BIND")]
        bind: Option<String>,
    },

    /// Run one account search and print the Slack reply as JSON.
    Search {
        /// Search text, e.g. a domain fragment or a platform name.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "nebo=info",
        1 => "nebo=debug",
        _ => "nebo=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Serve { bind } => cmd_serve(bind).await,
        Command::Search { text } => cmd_search(&text.join(" ")).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

/// Serve slash commands with one Salesforce client for the process lifetime.
///
/// The Salesforce session is never refreshed. Once Salesforce expires it,
/// every lookup answers `INVALID_SESSION_ID` until the server is restarted.
async fn cmd_serve(bind: Option<String>) -> Result<()> {
    let config = load_config()?;
    let credentials = resolve_credentials(&config)?;

    let salesforce = SalesforceClient::new(
        credentials.salesforce.clone(),
        SalesforceOptions::from(&config.salesforce),
    )?;
    let slack = SlackClient::new(&config.slack.api_base, &credentials.slack.oauth_token)?;
    let token = VerificationToken::new(&credentials.slack.verification_token)?;

    let state = AppState {
        services: Services {
            accounts: Arc::new(salesforce),
            notifier: Arc::new(slack),
            feature_channel: config.slack.feature_channel.clone(),
        },
        token,
    };

    let bind = bind.unwrap_or_else(|| config.server.bind.clone());
    info!(%bind, feature_channel = %config.slack.feature_channel, "starting nebo server");

    server::serve(&bind, state).await
}

async fn cmd_search(text: &str) -> Result<()> {
    let config: AppConfig = load_config()?;
    let credentials = resolve_salesforce_credentials(&config)?;
    let client = SalesforceClient::new(credentials, SalesforceOptions::from(&config.salesforce))?;

    let message = search_accounts(&client, text).await?;
    let json = serde_json::to_string_pretty(&message)
        .map_err(|e| eyre!("failed to serialize reply: {e}"))?;
    println!("{json}");
    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
