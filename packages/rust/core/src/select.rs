//! Ordering and capping of search results.

use nebo_shared::Account;

/// Most accounts shown for one search.
pub const MAX_RESULTS: usize = 20;

/// Platform names that switch a search into platform mode.
pub const PLATFORMS: &[&str] = &[
    "BigCommerce",
    "Magento",
    "Miva",
    "Shopify",
    "Volusion",
    "3dcart",
    "Custom",
];

/// Whether `search_term` names a platform exactly, ignoring case.
pub fn is_platform_search(search_term: &str) -> bool {
    PLATFORMS
        .iter()
        .any(|platform| platform.eq_ignore_ascii_case(search_term))
}

/// Order and truncate accounts for display.
///
/// A platform search keeps the incoming (revenue-descending) order; any other
/// search puts the shortest websites, the closest matches, first. Ties keep
/// their incoming order.
pub fn select(mut accounts: Vec<Account>, search_term: &str) -> Vec<Account> {
    if !is_platform_search(search_term) {
        accounts.sort_by_key(|account| account.website.len());
    }
    accounts.truncate(MAX_RESULTS);
    accounts
}

#[cfg(test)]
mod tests {
    use nebo_shared::Active;
    use proptest::prelude::*;

    use super::*;

    fn account(website: &str, revenue: f64) -> Account {
        Account {
            website: website.into(),
            manager: "Sam".into(),
            active: Active::Yes,
            monthly_revenue: revenue,
            family_monthly_revenue: revenue,
            platform: "Shopify".into(),
        }
    }

    #[test]
    fn platform_match_ignores_case() {
        assert!(is_platform_search("Shopify"));
        assert!(is_platform_search("shopify"));
        assert!(is_platform_search("BIGCOMMERCE"));
        assert!(!is_platform_search("shop"));
        assert!(!is_platform_search("shopify plus"));
        assert!(!is_platform_search(""));
    }

    #[test]
    fn keyword_search_sorts_by_website_length() {
        let input = vec![
            account("fableticsoutlet.com", 3.0),
            account("fab.io", 2.0),
            account("fabletics.com", 1.0),
        ];
        let out = select(input, "fab");
        let sites: Vec<_> = out.iter().map(|a| a.website.as_str()).collect();
        assert_eq!(sites, ["fab.io", "fabletics.com", "fableticsoutlet.com"]);
    }

    #[test]
    fn equal_lengths_keep_input_order() {
        let input = vec![account("bbb.com", 3.0), account("aaa.com", 2.0), account("a.io", 1.0)];
        let out = select(input, "a");
        let revenues: Vec<_> = out.iter().map(|a| a.monthly_revenue).collect();
        assert_eq!(revenues, [1.0, 3.0, 2.0]);
    }

    #[test]
    fn platform_search_keeps_order_and_caps() {
        // 25 accounts, revenue descending, website lengths deliberately shuffled
        let input: Vec<Account> = (0..25)
            .map(|i| account(&format!("{}.com", "x".repeat((i * 7) % 11 + 1)), 1000.0 - i as f64))
            .collect();
        let expected: Vec<Account> = input[..MAX_RESULTS].to_vec();

        let out = select(input, "Shopify");
        assert_eq!(out, expected);
    }

    #[test]
    fn output_is_never_longer_than_cap() {
        for n in [0, 1, 19, 20, 21, 40] {
            let input: Vec<Account> = (0..n).map(|i| account(&format!("s{i}.com"), 1.0)).collect();
            assert_eq!(select(input.clone(), "s").len(), n.min(MAX_RESULTS));
            assert_eq!(select(input, "magento").len(), n.min(MAX_RESULTS));
        }
    }

    #[test]
    fn keyword_output_is_non_decreasing_in_length() {
        let input: Vec<Account> = (0..30)
            .map(|i| account(&"y".repeat((i * 13) % 17 + 1), 1.0))
            .collect();
        let out = select(input, "y");
        assert!(out.windows(2).all(|w| w[0].website.len() <= w[1].website.len()));
    }

    fn accounts() -> impl Strategy<Value = Vec<Account>> {
        prop::collection::vec(("[a-z0-9./]{0,30}", 0.0f64..1.0e6), 0..50)
            .prop_map(|rows| rows.iter().map(|(site, mrr)| account(site, *mrr)).collect())
    }

    fn terms() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("Shopify".to_string()),
            Just("bigcommerce".to_string()),
            "[a-zA-Z0-9]{0,10}",
        ]
    }

    proptest! {
        #[test]
        fn select_caps_and_orders_any_input(input in accounts(), term in terms()) {
            let out = select(input.clone(), &term);

            prop_assert_eq!(out.len(), input.len().min(MAX_RESULTS));
            if is_platform_search(&term) {
                prop_assert_eq!(&out[..], &input[..out.len()]);
            } else {
                prop_assert!(out.windows(2).all(|w| w[0].website.len() <= w[1].website.len()));
            }
        }
    }
}
