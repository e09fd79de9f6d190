//! Shared types, error model, and configuration for Nebo.
//!
//! This crate is the foundation depended on by all other Nebo crates.
//! It provides:
//! - [`NeboError`]: the unified error type
//! - Domain types ([`Account`], [`Message`], [`Attachment`])
//! - Configuration ([`AppConfig`], [`Credentials`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, Credentials, SalesforceConfig, SalesforceCredentials, ServerConfig, SlackConfig,
    SlackCredentials, config_dir, config_file_path, init_config, load_config, load_config_from,
    resolve_credentials, resolve_credentials_with, resolve_salesforce_credentials,
};
pub use error::{NeboError, Result};
pub use types::{Account, Active, Attachment, Message, ResponseType, UNKNOWN, UNKNOWN_REVENUE};
