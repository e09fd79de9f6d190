//! Application configuration for Nebo.
//!
//! User config lives at `~/.nebo/nebo.toml`.
//! CLI flags override config file values, which override defaults.
//! Credentials are never stored in the file: it only names the environment
//! variables that hold them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{NeboError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "nebo.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".nebo";

// ---------------------------------------------------------------------------
// Config structs (matching nebo.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Salesforce connection settings.
    #[serde(default)]
    pub salesforce: SalesforceConfig,

    /// Slack settings.
    #[serde(default)]
    pub slack: SlackConfig,
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the slash-command endpoint binds to.
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3000".into()
}

/// `[salesforce]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesforceConfig {
    /// REST/SOAP API version, without the `v` prefix.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Env var holding the login URL (e.g. `https://login.salesforce.com`).
    #[serde(default = "default_sf_url_env")]
    pub url_env: String,

    /// Env var holding the API user name.
    #[serde(default = "default_sf_user_env")]
    pub user_env: String,

    /// Env var holding the API user's password.
    #[serde(default = "default_sf_password_env")]
    pub password_env: String,

    /// Env var holding the API user's security token.
    #[serde(default = "default_sf_token_env")]
    pub token_env: String,
}

impl Default for SalesforceConfig {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
            url_env: default_sf_url_env(),
            user_env: default_sf_user_env(),
            password_env: default_sf_password_env(),
            token_env: default_sf_token_env(),
        }
    }
}

fn default_api_version() -> String {
    "52.0".into()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_sf_url_env() -> String {
    "SF_URL".into()
}
fn default_sf_user_env() -> String {
    "SF_USER".into()
}
fn default_sf_password_env() -> String {
    "SF_PASSWORD".into()
}
fn default_sf_token_env() -> String {
    "SF_TOKEN".into()
}

/// `[slack]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Env var holding the slash-command verification token.
    #[serde(default = "default_verification_token_env")]
    pub verification_token_env: String,

    /// Env var holding the bot OAuth token used for `chat.postMessage`.
    #[serde(default = "default_oauth_token_env")]
    pub oauth_token_env: String,

    /// Channel that receives `/feature` requests.
    #[serde(default = "default_feature_channel")]
    pub feature_channel: String,

    /// Base URL of the Slack Web API.
    #[serde(default = "default_slack_api_base")]
    pub api_base: String,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            verification_token_env: default_verification_token_env(),
            oauth_token_env: default_oauth_token_env(),
            feature_channel: default_feature_channel(),
            api_base: default_slack_api_base(),
        }
    }
}

fn default_verification_token_env() -> String {
    "SLACK_VERIFICATION_TOKEN".into()
}
fn default_oauth_token_env() -> String {
    "SLACK_OAUTH_TOKEN".into()
}
fn default_feature_channel() -> String {
    "G013YLWL3EX".into()
}
fn default_slack_api_base() -> String {
    "https://slack.com/api".into()
}

// ---------------------------------------------------------------------------
// Credentials (runtime, resolved from the environment)
// ---------------------------------------------------------------------------

/// Salesforce API user secrets.
#[derive(Clone)]
pub struct SalesforceCredentials {
    /// Login host, e.g. `https://login.salesforce.com`.
    pub login_url: String,
    pub username: String,
    pub password: String,
    pub security_token: String,
}

impl std::fmt::Debug for SalesforceCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesforceCredentials")
            .field("login_url", &self.login_url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Slack app secrets.
#[derive(Clone)]
pub struct SlackCredentials {
    pub verification_token: String,
    pub oauth_token: String,
}

impl std::fmt::Debug for SlackCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackCredentials").finish_non_exhaustive()
    }
}

/// Every secret the server needs.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub slack: SlackCredentials,
    pub salesforce: SalesforceCredentials,
}

/// Read every credential from the process environment.
///
/// Fails on the first variable that is unset or empty.
pub fn resolve_credentials(config: &AppConfig) -> Result<Credentials> {
    resolve_credentials_with(config, env_lookup)
}

/// Like [`resolve_credentials`], with a custom variable lookup.
pub fn resolve_credentials_with<F>(config: &AppConfig, lookup: F) -> Result<Credentials>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(Credentials {
        slack: resolve_slack_with(config, &lookup)?,
        salesforce: resolve_salesforce_with(config, &lookup)?,
    })
}

/// Read only the Salesforce credentials from the process environment.
pub fn resolve_salesforce_credentials(config: &AppConfig) -> Result<SalesforceCredentials> {
    resolve_salesforce_with(config, env_lookup)
}

fn resolve_slack_with<F>(config: &AppConfig, lookup: F) -> Result<SlackCredentials>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(SlackCredentials {
        verification_token: require(&lookup, &config.slack.verification_token_env)?,
        oauth_token: require(&lookup, &config.slack.oauth_token_env)?,
    })
}

fn resolve_salesforce_with<F>(config: &AppConfig, lookup: F) -> Result<SalesforceCredentials>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(SalesforceCredentials {
        login_url: require(&lookup, &config.salesforce.url_env)?,
        username: require(&lookup, &config.salesforce.user_env)?,
        password: require(&lookup, &config.salesforce.password_env)?,
        security_token: require(&lookup, &config.salesforce.token_env)?,
    })
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// The value of `name`, which must be set and non-empty.
fn require<F>(lookup: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(val) if !val.is_empty() => Ok(val),
        _ => Err(NeboError::config(format!("Must set: {name}"))),
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.nebo/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| NeboError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.nebo/nebo.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| NeboError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| NeboError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| NeboError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content = toml::to_string_pretty(&config).map_err(|e| NeboError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| NeboError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
