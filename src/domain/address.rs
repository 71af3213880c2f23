// src/domain/address.rs

use once_cell::sync::Lazy;
use regex::Regex;

// e.g. "/WA/Spokane/11628-N-Galahad-Dr-99218/home/23456789"
static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/WA/Spokane/([^/]+)/home").unwrap());
static CITY_STATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\sSPOKANE|\sWA\s").unwrap());
static TRAILING_ZIP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s\d{5}$").unwrap());

/// Returns the canonical street line without city or ZIP,
/// e.g. `"11628 N GALAHAD DR"`.
///
/// Prefers the card-displayed address; falls back to the detail-page URL
/// slug. An empty return means "no usable address, skip this listing" —
/// it is a normal outcome, not an error.
pub fn extract_street(card_addr: Option<&str>, url_href: &str) -> String {
    if let Some(addr) = card_addr {
        let addr = addr.trim();
        if !addr.is_empty() {
            return addr
                .split(',')
                .next()
                .unwrap_or("")
                .to_uppercase()
                .trim()
                .to_string();
        }
    }

    let slug = match SLUG_RE.captures(url_href) {
        Some(caps) => caps[1].replace('-', " ").to_uppercase(),
        None => return String::new(),
    };

    // Cut off any trailing city/state token, then a trailing ZIP.
    let street = CITY_STATE_RE.splitn(&slug, 2).next().unwrap_or("");
    TRAILING_ZIP_RE.replace(street, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_address_takes_portion_before_comma() {
        let street = extract_street(Some("456 W Pine St, Spokane, WA 99201"), "");
        assert_eq!(street, "456 W PINE ST");
    }

    #[test]
    fn card_address_is_uppercased_and_trimmed() {
        let street = extract_street(Some("  11628 n galahad dr  "), "");
        assert_eq!(street, "11628 N GALAHAD DR");
    }

    #[test]
    fn url_slug_is_used_when_card_address_missing() {
        let street = extract_street(None, "/WA/Spokane/11628-N-Galahad-Dr-99218/home/23456789");
        assert_eq!(street, "11628 N GALAHAD DR");
    }

    #[test]
    fn url_slug_strips_city_token() {
        let street = extract_street(None, "/WA/Spokane/456-W-Pine-St-Spokane-WA-99201/home/1");
        assert_eq!(street, "456 W PINE ST");
    }

    #[test]
    fn unusable_inputs_yield_empty_string() {
        assert_eq!(extract_street(None, "/WA/Seattle/foo/home/1"), "");
        assert_eq!(extract_street(None, "not a url"), "");
    }

    #[test]
    fn result_never_contains_comma_or_trailing_zip() {
        let inputs: [(Option<&str>, &str); 3] = [
            (Some("1 E Main Ave, Spokane, WA 99202"), ""),
            (None, "/WA/Spokane/1-E-Main-Ave-99202/home/7"),
            (None, "/WA/Spokane/2-S-Oak-St-Spokane-WA-99203/home/8"),
        ];
        for (card, href) in inputs {
            let street = extract_street(card, href);
            assert!(!street.contains(','), "comma in {street:?}");
            assert!(
                !TRAILING_ZIP_RE.is_match(&street),
                "trailing ZIP in {street:?}"
            );
        }
    }
}
