//! Rendering of selected accounts as a Slack reply.

use nebo_shared::{Account, Attachment, Message, UNKNOWN, UNKNOWN_REVENUE};

/// Side-bar color for a normal account card.
pub const BRAND_COLOR: &str = "#3A23AD";

/// Side-bar color for an account nobody manages.
pub const ALERT_COLOR: &str = "#FF0000";

/// Build the channel reply for a finished search.
pub fn format_message(accounts: &[Account], search_term: &str) -> Message {
    let headline = if accounts.is_empty() {
        format!("No results for: {search_term}")
    } else {
        format!("Reps for search: {search_term}")
    };

    Message {
        attachments: accounts.iter().map(attachment).collect(),
        ..Message::in_channel(headline)
    }
}

fn attachment(account: &Account) -> Attachment {
    let color = if account.manager_unknown() {
        ALERT_COLOR
    } else {
        BRAND_COLOR
    };

    let text = [
        format!("Rep: {}", account.manager),
        format!("MRR: {}", format_revenue(account.monthly_revenue)),
        format!("Family MRR: {}", format_revenue(account.family_monthly_revenue)),
        format!("Platform: {}", account.platform),
        format!("Active: {}", account.active),
    ]
    .join("\n");

    Attachment {
        color: color.to_string(),
        text,
        author_name: account.website.clone(),
    }
}

/// `$1234.50`, or `unknown` for the sentinel.
fn format_revenue(revenue: f64) -> String {
    if revenue == UNKNOWN_REVENUE {
        UNKNOWN.to_string()
    } else {
        format!("${revenue:.2}")
    }
}

#[cfg(test)]
mod tests {
    use nebo_shared::{Active, ResponseType};

    use super::*;

    fn account(manager: &str, revenue: f64) -> Account {
        Account {
            website: "fabletics.com".into(),
            manager: manager.into(),
            active: Active::Yes,
            monthly_revenue: revenue,
            family_monthly_revenue: 14858.54,
            platform: "Custom".into(),
        }
    }

    #[test]
    fn revenue_formatting() {
        assert_eq!(format_revenue(3955.17), "$3955.17");
        assert_eq!(format_revenue(120.5), "$120.50");
        assert_eq!(format_revenue(0.0), "$0.00");
        assert_eq!(format_revenue(UNKNOWN_REVENUE), "unknown");
    }

    #[test]
    fn attachment_lists_every_field() {
        let msg = format_message(&[account("Ashley Hilton", 3955.17)], "fabletics");
        assert_eq!(msg.response_type, ResponseType::InChannel);
        assert_eq!(msg.text, "Reps for search: fabletics");

        let att = &msg.attachments[0];
        assert_eq!(
            att.text,
            "Rep: Ashley Hilton\nMRR: $3955.17\nFamily MRR: $14858.54\nPlatform: Custom\nActive: Yes"
        );
        assert_eq!(att.author_name, "fabletics.com");
        assert_eq!(att.color, BRAND_COLOR);
    }

    #[test]
    fn unknown_manager_gets_alert_color() {
        let msg = format_message(&[account(UNKNOWN, UNKNOWN_REVENUE)], "fab");
        assert_eq!(msg.attachments[0].color, ALERT_COLOR);
        assert!(msg.attachments[0].text.contains("Rep: unknown"));
        assert!(msg.attachments[0].text.contains("\nMRR: unknown\n"));
    }

    #[test]
    fn empty_result_headline() {
        let msg = format_message(&[], "nothing-here");
        assert_eq!(msg.text, "No results for: nothing-here");
        assert!(msg.attachments.is_empty());
    }

    #[test]
    fn one_attachment_per_account_in_order() {
        let accounts = vec![account("A", 1.0), account("B", 2.0), account("C", 3.0)];
        let msg = format_message(&accounts, "x");
        let reps: Vec<_> = msg
            .attachments
            .iter()
            .map(|a| a.text.lines().next().unwrap())
            .collect();
        assert_eq!(reps, ["Rep: A", "Rep: B", "Rep: C"]);
    }
}
