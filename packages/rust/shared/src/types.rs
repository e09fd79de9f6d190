//! Core domain types: the normalized account entity and the Slack message schema.

use serde::{Deserialize, Serialize};

/// Stand-in for a text field the CRM did not provide.
pub const UNKNOWN: &str = "unknown";

/// Stand-in for a revenue figure the CRM did not provide.
pub const UNKNOWN_REVENUE: f64 = -1.0;

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// Whether the account is a current customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Active {
    #[serde(rename = "Yes")]
    Yes,
    #[serde(rename = "Not active")]
    NotActive,
}

impl Active {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::NotActive => "Not active",
        }
    }
}

impl std::fmt::Display for Active {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A customer account, normalized from one CRM record.
///
/// Every field is always populated; data the CRM lacked is carried as
/// [`UNKNOWN`] or [`UNKNOWN_REVENUE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Display URL, canonicalized by the normalizer.
    pub website: String,
    /// Customer success manager, or [`UNKNOWN`].
    pub manager: String,
    pub active: Active,
    /// Monthly recurring revenue, or [`UNKNOWN_REVENUE`].
    pub monthly_revenue: f64,
    /// MRR across the account family, or [`UNKNOWN_REVENUE`].
    pub family_monthly_revenue: f64,
    /// E-commerce platform, or [`UNKNOWN`].
    pub platform: String,
}

impl Account {
    /// Whether the account has no known manager.
    pub fn manager_unknown(&self) -> bool {
        self.manager == UNKNOWN
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// Visibility of a slash-command reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Visible to everyone in the channel.
    InChannel,
    /// Visible only to the user who ran the command.
    Ephemeral,
}

/// A slash-command reply, serialized as Slack's message JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub response_type: ResponseType,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Message {
    /// A reply visible to the whole channel.
    pub fn in_channel(text: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::InChannel,
            text: text.into(),
            attachments: Vec::new(),
        }
    }

    /// A reply only the caller sees.
    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Ephemeral,
            text: text.into(),
            attachments: Vec::new(),
        }
    }
}

/// One account card in a reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// `#RRGGBB` side-bar color.
    pub color: String,
    pub text: String,
    pub author_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_serializes_camel_case() {
        let account = Account {
            website: "fabletics.com".into(),
            manager: "Ashley Hilton".into(),
            active: Active::Yes,
            monthly_revenue: 3955.17,
            family_monthly_revenue: UNKNOWN_REVENUE,
            platform: UNKNOWN.into(),
        };
        let json = serde_json::to_value(&account).expect("serialize");
        assert_eq!(json["monthlyRevenue"], 3955.17);
        assert_eq!(json["familyMonthlyRevenue"], -1.0);
        assert_eq!(json["active"], "Yes");
        assert_eq!(json["platform"], "unknown");
    }

    #[test]
    fn active_display() {
        assert_eq!(Active::Yes.to_string(), "Yes");
        assert_eq!(Active::NotActive.to_string(), "Not active");
        let json = serde_json::to_string(&Active::NotActive).unwrap();
        assert_eq!(json, r#""Not active""#);
    }

    #[test]
    fn message_wire_shape() {
        let mut msg = Message::in_channel("Reps for search: shoes");
        msg.attachments.push(Attachment {
            color: "#3A23AD".into(),
            text: "Rep: Ashley Hilton".into(),
            author_name: "shoes.com".into(),
        });
        let json = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(json["response_type"], "in_channel");
        assert_eq!(json["text"], "Reps for search: shoes");
        assert_eq!(json["attachments"][0]["color"], "#3A23AD");
        assert_eq!(json["attachments"][0]["author_name"], "shoes.com");
    }

    #[test]
    fn ephemeral_message_omits_empty_attachments() {
        let json = serde_json::to_string(&Message::ephemeral("help")).unwrap();
        assert_eq!(json, r#"{"response_type":"ephemeral","text":"help"}"#);
    }
}
