//! Slash-command routing and the small non-search commands.

use std::sync::Arc;

use async_trait::async_trait;
use petname::{Generator, Petnames};
use rand::Rng;
use tracing::{info, instrument, warn};

use nebo_shared::{Message, NeboError, Result};
use nebo_slack::{SlackClient, SlashCommand};

use crate::search::{AccountSource, search_accounts};
use crate::select::PLATFORMS;

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// The commands this app answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Account lookup (`/nebo`, `/rep`, `/alpha-nebo`).
    Search,
    /// Feature request for the product team (`/feature`).
    Feature,
    /// Meeting link (`/meet`).
    Meet,
}

impl Command {
    /// Resolve a slash-command name such as `/nebo`.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "/rep" | "/nebo" | "/alpha-nebo" => Ok(Self::Search),
            "/feature" => Ok(Self::Feature),
            "/meet" => Ok(Self::Meet),
            other => Err(NeboError::UnknownCommand(other.to_string())),
        }
    }

    /// Whether `text` asks for usage instead of running the command.
    ///
    /// A bare `/meet` is a request for a random link, so only the other
    /// commands treat empty text as a help request.
    pub fn wants_help(&self, text: &str) -> bool {
        let text = text.trim();
        match self {
            Self::Search | Self::Feature => text.is_empty() || text == "help",
            Self::Meet => text == "help",
        }
    }

    /// Usage text, shown only to the caller.
    pub fn help(&self) -> Message {
        let text = match self {
            Self::Search => {
                let platforms = PLATFORMS.join(", ").to_lowercase();
                format!(
                    "Nebo usage:\n\
                     `/nebo shoes` - find all customers with shoe in the name\n\
                     `/nebo shopify` - show {{{platforms}}} clients sorted by MRR\n\
                     `/nebo help` - this message"
                )
            }
            Self::Feature => "Feature usage:\n\
                 `/feature description of feature required` - submits a feature to the product team\n\
                 `/feature help` - this message"
                .to_string(),
            Self::Meet => "Meet usage:\n\
                 `/meet` - generate a random meet\n\
                 `/meet name` - generate a meet with a name\n\
                 `/meet help` - this message"
                .to_string(),
        };
        Message::ephemeral(text)
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Sink for messages posted to a channel on the app's behalf.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, channel: &str, text: &str) -> Result<()>;
}

#[async_trait]
impl Notifier for SlackClient {
    async fn notify(&self, channel: &str, text: &str) -> Result<()> {
        self.post_message(channel, text).await.map(|_| ())
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Long-lived collaborators shared by every request.
#[derive(Clone)]
pub struct Services {
    pub accounts: Arc<dyn AccountSource>,
    pub notifier: Arc<dyn Notifier>,
    /// Channel that receives `/feature` requests.
    pub feature_channel: String,
}

/// Answer one slash command.
#[instrument(skip_all, fields(command = %cmd.command, user = %cmd.user_id))]
pub async fn handle(services: &Services, cmd: &SlashCommand) -> Result<Message> {
    let command = Command::parse(&cmd.command)?;

    if command.wants_help(&cmd.text) {
        return Ok(command.help());
    }

    match command {
        Command::Search => search_accounts(services.accounts.as_ref(), &cmd.text).await,
        Command::Feature => {
            let announcement = feature_announcement(&cmd.user_id, &cmd.text);
            match services
                .notifier
                .notify(&services.feature_channel, &announcement)
                .await
            {
                Ok(()) => info!(channel = %services.feature_channel, "feature request forwarded"),
                Err(e) => warn!(error = %e, "feature request could not be forwarded"),
            }
            Ok(feature_ack())
        }
        Command::Meet => Ok(meet_link(&cmd.text)),
    }
}

/// What the product channel sees for a `/feature` request.
pub fn feature_announcement(user_id: &str, text: &str) -> String {
    format!("<@{user_id}> requests: {text}")
}

/// Reply to the caller once a feature request is taken.
pub fn feature_ack() -> Message {
    Message::ephemeral("feature request submitted, we'll be in touch!")
}

// ---------------------------------------------------------------------------
// Meet links
// ---------------------------------------------------------------------------

const MEET_PREFIX: &str = "g.co/meet/";

/// A meeting link, named by `text` or by a random pet name when blank.
pub fn meet_link(text: &str) -> Message {
    meet_link_with(text, &mut rand::thread_rng())
}

/// [`meet_link`] with a caller-supplied random source.
///
/// The name is the trimmed text with inner spaces replaced by `-`.
pub fn meet_link_with<R: Rng>(text: &str, rng: &mut R) -> Message {
    let name = if text.trim().is_empty() {
        pet_name(rng)
    } else {
        text.trim().replace(' ', "-")
    };
    Message::in_channel(format!("{MEET_PREFIX}{name}"))
}

/// `adverb-adjective-name` from the default petname word lists.
fn pet_name<R: Rng>(rng: &mut R) -> String {
    Petnames::default()
        .generate(rng, 3, "-")
        .unwrap_or_else(|| "nebo-standup".to_string())
}
