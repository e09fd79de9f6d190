//! End-to-end account search: text → SOQL → CRM → accounts → reply.

use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use nebo_salesforce::{AccountRecord, SalesforceClient, SanitizedTerm, build_query};
use nebo_shared::{Account, Message, Result};

use crate::format::format_message;
use crate::mapping::map_record;
use crate::normalize::normalize_websites;
use crate::select::{is_platform_search, select};

/// Where account records come from.
#[async_trait]
pub trait AccountSource: Send + Sync {
    /// Run `soql` and return the matching records in CRM order.
    async fn fetch_accounts(&self, soql: &str) -> Result<Vec<AccountRecord>>;
}

#[async_trait]
impl AccountSource for SalesforceClient {
    async fn fetch_accounts(&self, soql: &str) -> Result<Vec<AccountRecord>> {
        self.query(soql).await
    }
}

/// Answer a search command.
///
/// The reply headline echoes the caller's text (trimmed); only the sanitized
/// form reaches the query. A term that sanitizes to nothing matches nothing
/// and is not sent to the CRM.
#[instrument(skip(source))]
pub async fn search_accounts(source: &dyn AccountSource, text: &str) -> Result<Message> {
    let start = Instant::now();
    let text = text.trim();
    let term = SanitizedTerm::from(text);

    if term.is_empty() {
        debug!("search term empty after sanitizing");
        return Ok(format_message(&[], text));
    }

    let soql = build_query(&term);
    let records = source.fetch_accounts(&soql).await?;
    let fetched = records.len();

    let mut accounts: Vec<Account> = records.into_iter().map(map_record).collect();
    normalize_websites(&mut accounts);
    let accounts = select(accounts, text);

    info!(
        %term,
        fetched,
        shown = accounts.len(),
        platform_search = is_platform_search(text),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "account search complete"
    );

    Ok(format_message(&accounts, text))
}
