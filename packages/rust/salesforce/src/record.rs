//! Typed decoding of Salesforce account query results.

use serde::Deserialize;

use nebo_shared::{NeboError, Result};

/// Body of a successful `/query` call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub total_size: u64,
    pub done: bool,
    #[serde(default)]
    pub records: Vec<serde_json::Value>,
}

/// One `Account` row as returned by the query in [`crate::build_query`].
///
/// Every field is optional; a field that is present with the wrong type
/// fails decoding.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AccountRecord {
    /// Left untyped: the mapper renders whatever the org stores here.
    #[serde(rename = "Website")]
    pub website: Option<serde_json::Value>,
    #[serde(rename = "CS_Manager__r")]
    pub manager: Option<ManagerRef>,
    #[serde(rename = "Type")]
    pub account_type: Option<String>,
    #[serde(rename = "Chargify_MRR__c")]
    pub monthly_revenue: Option<f64>,
    #[serde(rename = "Family_MRR__c")]
    pub family_monthly_revenue: Option<f64>,
    #[serde(rename = "Platform__c")]
    pub platform: Option<String>,
}

/// The `CS_Manager__r` relationship.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ManagerRef {
    #[serde(rename = "Name")]
    pub name: Option<String>,
}

/// Decode raw query records, keeping their order.
///
/// The first record with an unexpected field type fails the whole batch.
pub fn decode_records(records: Vec<serde_json::Value>) -> Result<Vec<AccountRecord>> {
    records
        .into_iter()
        .enumerate()
        .map(|(idx, raw)| {
            serde_json::from_value(raw)
                .map_err(|e| NeboError::record_shape(format!("account record {idx}: {e}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_full_record() {
        let records = decode_records(vec![json!({
            "attributes": { "type": "Account", "url": "/services/data/v52.0/sobjects/Account/001" },
            "Website": "https://www.fabletics.com/",
            "CS_Manager__r": { "attributes": { "type": "User" }, "Name": "Ashley Hilton" },
            "Family_MRR__c": 14858.54,
            "Chargify_MRR__c": 3955.17,
            "Platform__c": "Custom",
            "Type": "Customer"
        })])
        .expect("decode");

        let rec = &records[0];
        assert_eq!(rec.website, Some(json!("https://www.fabletics.com/")));
        assert_eq!(rec.manager.as_ref().and_then(|m| m.name.as_deref()), Some("Ashley Hilton"));
        assert_eq!(rec.monthly_revenue, Some(3955.17));
        assert_eq!(rec.family_monthly_revenue, Some(14858.54));
        assert_eq!(rec.account_type.as_deref(), Some("Customer"));
    }

    #[test]
    fn nulls_and_missing_fields_decode_as_none() {
        let records = decode_records(vec![json!({
            "Website": "shop.example",
            "CS_Manager__r": null,
            "Chargify_MRR__c": null
        })])
        .expect("decode");

        assert_eq!(records[0].manager, None);
        assert_eq!(records[0].monthly_revenue, None);
        assert_eq!(records[0].family_monthly_revenue, None);
        assert_eq!(records[0].platform, None);
    }

    #[test]
    fn non_numeric_revenue_is_a_shape_error() {
        let err = decode_records(vec![
            json!({ "Website": "ok.com", "Chargify_MRR__c": 10.0 }),
            json!({ "Website": "bad.com", "Chargify_MRR__c": "lots" }),
        ])
        .unwrap_err();

        assert!(matches!(err, NeboError::RecordShape { .. }));
        assert!(err.to_string().contains("account record 1"));
    }

    #[test]
    fn query_response_fixture_decodes() {
        let fixture = std::fs::read_to_string("../../../fixtures/salesforce/query-response.json")
            .expect("read fixture");
        let parsed: QueryResponse = serde_json::from_str(&fixture).expect("parse fixture");
        assert!(parsed.done);
        assert_eq!(parsed.total_size, 3);

        let records = decode_records(parsed.records).expect("decode fixture records");
        assert_eq!(records.len(), 3);
        assert!(records[2].manager.is_none());
    }
}
