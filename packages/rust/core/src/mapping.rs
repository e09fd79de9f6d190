//! CRM record → [`Account`] mapping.

use nebo_salesforce::AccountRecord;
use nebo_shared::{Account, Active, UNKNOWN, UNKNOWN_REVENUE};

/// The only account type reported as active.
const ACTIVE_TYPE: &str = "Customer";

/// Build an [`Account`] from one decoded record, filling gaps with sentinels.
///
/// The website is carried over as text; normalizing it is a separate step.
pub fn map_record(raw: AccountRecord) -> Account {
    let manager = raw
        .manager
        .and_then(|m| m.name)
        .unwrap_or_else(|| UNKNOWN.to_string());

    let active = match raw.account_type.as_deref() {
        Some(ACTIVE_TYPE) => Active::Yes,
        _ => Active::NotActive,
    };

    Account {
        website: website_text(raw.website),
        manager,
        active,
        monthly_revenue: raw.monthly_revenue.unwrap_or(UNKNOWN_REVENUE),
        family_monthly_revenue: raw.family_monthly_revenue.unwrap_or(UNKNOWN_REVENUE),
        platform: raw.platform.unwrap_or_else(|| UNKNOWN.to_string()),
    }
}

fn website_text(value: Option<serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
    }
}
