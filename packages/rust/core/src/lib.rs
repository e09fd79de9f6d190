//! Account lookup pipeline and command handling for Nebo.
//!
//! A search runs sanitize → query → map → normalize → select → format;
//! [`commands::handle`] routes each slash command to that pipeline or to one
//! of the small auxiliary commands.

pub mod commands;
pub mod format;
pub mod mapping;
pub mod normalize;
pub mod search;
pub mod select;

pub use commands::{Command, Notifier, Services, handle};
pub use search::{AccountSource, search_accounts};
