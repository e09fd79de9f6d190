//! Search-term sanitizing and SOQL construction for the account lookup.

use std::sync::LazyLock;

use regex::Regex;

/// Fields selected for every account.
const ACCOUNT_FIELDS: &[&str] = &[
    "Website",
    "CS_Manager__r.Name",
    "Type",
    "Chargify_MRR__c",
    "Family_MRR__c",
    "Platform__c",
];

/// Account types that count as customers, current or former.
const CUSTOMER_TYPES: &[&str] = &["Customer", "Inactive Customer"];

/// Fields the search term is matched against.
const MATCH_FIELDS: &[&str] = &["Website", "Platform__c"];

/// Results come back highest revenue first.
const ORDER_FIELD: &str = "Chargify_MRR__c";

/// Remove every character outside `[a-zA-Z0-9_.-]`.
pub fn sanitize(raw: &str) -> String {
    static DISALLOWED_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_.\-]").expect("valid regex"));

    DISALLOWED_RE.replace_all(raw, "").into_owned()
}

/// A search term that has passed through [`sanitize`].
///
/// Only this type is accepted by [`build_query`], so raw user text cannot
/// reach a SOQL literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedTerm(String);

impl SanitizedTerm {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for SanitizedTerm {
    fn from(raw: &str) -> Self {
        Self(sanitize(raw))
    }
}

impl std::fmt::Display for SanitizedTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the read-only account search query for `term`.
pub fn build_query(term: &SanitizedTerm) -> String {
    let types = CUSTOMER_TYPES
        .iter()
        .map(|t| format!("'{t}'"))
        .collect::<Vec<_>>()
        .join(", ");

    let matches = MATCH_FIELDS
        .iter()
        .map(|field| format!("{field} LIKE '%{term}%'"))
        .collect::<Vec<_>>()
        .join(" OR ");

    format!(
        "SELECT {fields} FROM Account WHERE Type IN ({types}) AND ({matches}) ORDER BY {ORDER_FIELD} DESC",
        fields = ACCOUNT_FIELDS.join(", "),
    )
}
