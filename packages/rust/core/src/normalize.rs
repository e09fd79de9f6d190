//! Website display cleanup.

use nebo_shared::Account;

const SCHEMES: &[&str] = &["https://", "http://"];

/// Reduce a website to its bare host and path: no scheme, no `www.`, no
/// trailing slash.
///
/// Idempotent. Prefixes are stripped until none is left, so inputs such as
/// `www.http://x` settle in one pass.
pub fn normalize(website: &str) -> String {
    let mut rest = website;
    loop {
        let without_scheme = SCHEMES
            .iter()
            .find_map(|scheme| rest.strip_prefix(scheme))
            .unwrap_or(rest);
        let stripped = without_scheme.strip_prefix("www.").unwrap_or(without_scheme);

        if stripped.len() == rest.len() {
            break;
        }
        rest = stripped;
    }

    rest.trim_end_matches('/').to_string()
}

/// Normalize the website of every account in place.
pub fn normalize_websites(accounts: &mut [Account]) {
    for account in accounts {
        account.website = normalize(&account.website);
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn strips_scheme_www_and_slash() {
        assert_eq!(normalize("https://www.fabletics.com/"), "fabletics.com");
        assert_eq!(normalize("http://shop.example.com"), "shop.example.com");
        assert_eq!(normalize("www.example.org/"), "example.org");
        assert_eq!(normalize("example.org/store"), "example.org/store");
    }

    #[test]
    fn absent_parts_are_fine() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("fabletics.com"), "fabletics.com");
        assert_eq!(normalize("wwwshop.com"), "wwwshop.com");
    }

    #[test]
    fn is_idempotent() {
        let samples = [
            "https://www.fabletics.com/",
            "http://www.www.example.com//",
            "www.https://odd.io/",
            "https://",
            "www./",
            "/",
            "ftp://files.example.com/",
            "fabletics.com (Not active)",
        ];
        for w in samples {
            let once = normalize(w);
            assert_eq!(normalize(&once), once, "input {w:?}");
        }
    }

    #[test]
    fn normalizes_accounts_in_place() {
        let mut accounts = vec![nebo_shared::Account {
            website: "https://www.shoes.com/".into(),
            manager: "Pat".into(),
            active: nebo_shared::Active::Yes,
            monthly_revenue: 1.0,
            family_monthly_revenue: 1.0,
            platform: "Shopify".into(),
        }];
        normalize_websites(&mut accounts);
        assert_eq!(accounts[0].website, "shoes.com");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent_for_any_text(website in any::<String>()) {
            let once = normalize(&website);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn normalize_is_idempotent_for_url_like_text(
            website in "((https?://)|(www\\.)){0,3}[a-z0-9./:-]{0,24}/{0,3}"
        ) {
            let once = normalize(&website);
            prop_assert!(!once.starts_with("https://"));
            prop_assert!(!once.starts_with("http://"));
            prop_assert!(!once.starts_with("www."));
            prop_assert!(!once.ends_with('/'));
            prop_assert_eq!(normalize(&once), once);
        }
    }
}
