// src/domain/keywords.rs

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Subdivision/lot-reference vocabulary, counted by raw substring
/// occurrence against the uppercased text. `" TO "` must be bounded by
/// spaces so it is not matched inside longer words; it is reported under
/// the key `"TO"`.
const BASE_KEYWORDS: [&str; 8] = [" LT", "LTS", " L ", "LOTS", "THRU", " TO ", "THROUGH", "&"];

const DASH_KEY: &str = "-";

// Lot references like "L5", "L-5", "L 23", "L&7". Word-bounded so the
// digits stop at two and an unrelated "L" inside a word never matches.
static LOT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bL[-\s&]*(\d{1,2})\b").unwrap());
static LOT_SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"L[-\s]*\d+").unwrap());

/// Per-property keyword counts. Base keywords are cumulative occurrence
/// counts; each lot counter `L0`..`L99` is a presence flag holding at
/// most 1 no matter how often the lot is mentioned.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordCounts {
    counts: HashMap<String, u32>,
}

/// Column order for the rectangular export: base keywords (with `" TO "`
/// reported as `"TO"`), then `L0`..`L99`, then the dash diagnostic.
pub fn keyword_columns() -> Vec<String> {
    let mut columns: Vec<String> = BASE_KEYWORDS
        .iter()
        .map(|kw| display_key(kw).to_string())
        .collect();
    columns.extend((0..100).map(|i| format!("L{i}")));
    columns.push(DASH_KEY.to_string());
    columns
}

fn display_key(keyword: &str) -> &str {
    if keyword == " TO " {
        "TO"
    } else {
        keyword
    }
}

/// Non-overlapping substring occurrences, same semantics for every base
/// keyword.
fn count_occurrences(haystack: &str, needle: &str) -> u32 {
    haystack.matches(needle).count() as u32
}

/// Distinct lot numbers referenced in the text, as values 0..=99.
fn unique_lot_numbers(upper_text: &str) -> HashSet<u32> {
    LOT_RE
        .captures_iter(upper_text)
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .filter(|n| *n < 100)
        .collect()
}

impl KeywordCounts {
    /// Analyzes one property's text. Every column named by
    /// [`keyword_columns`] is present in the result, defaulting to 0.
    pub fn analyze(text: &str) -> Self {
        let upper = text.to_uppercase();
        let mut counts = HashMap::new();

        for keyword in BASE_KEYWORDS {
            counts.insert(
                display_key(keyword).to_string(),
                count_occurrences(&upper, keyword),
            );
        }

        // All 100 lot counters stay present so the export is rectangular;
        // each referenced lot counts once regardless of repetition.
        for i in 0..100 {
            counts.insert(format!("L{i}"), 0);
        }
        for lot in unique_lot_numbers(&upper) {
            counts.insert(format!("L{lot}"), 1);
        }

        // Diagnostic: lot tokens written with a separator next to the L.
        counts.insert(
            DASH_KEY.to_string(),
            LOT_SEPARATOR_RE.find_iter(&upper).count() as u32,
        );

        KeywordCounts { counts }
    }

    pub fn get(&self, key: &str) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Sum over every counter; zero means the property mentioned nothing
    /// from the vocabulary.
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    /// `(column, count)` pairs for the non-zero counters, in column order.
    pub fn non_zero(&self) -> Vec<(String, u32)> {
        keyword_columns()
            .into_iter()
            .filter_map(|col| {
                let count = self.get(&col);
                (count > 0).then_some((col, count))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_lot_reference_counts_once() {
        let counts = KeywordCounts::analyze("L7 AND L7 AND AGAIN L7");
        assert_eq!(counts.get("L7"), 1);
    }

    #[test]
    fn separator_variants_resolve_to_same_lot() {
        let counts = KeywordCounts::analyze("LOT L-5 ALSO L 5 ALSO L&5");
        assert_eq!(counts.get("L5"), 1);
    }

    #[test]
    fn distinct_lots_each_count_once() {
        let counts = KeywordCounts::analyze("FAIRWOOD CREST NO 4 L23 B2 THRU L25");
        assert_eq!(counts.get("L23"), 1);
        assert_eq!(counts.get("L25"), 1);
        assert_eq!(counts.get("L24"), 0);
    }

    #[test]
    fn all_hundred_lot_counters_are_present() {
        let counts = KeywordCounts::analyze("no lots here");
        for i in 0..100 {
            assert_eq!(counts.get(&format!("L{i}")), 0);
        }
    }

    #[test]
    fn base_keywords_are_cumulative_substring_counts() {
        let counts = KeywordCounts::analyze("lots 1 thru 4, lots 5 thru 8");
        assert_eq!(counts.get("LOTS"), 2);
        assert_eq!(counts.get("THRU"), 2);
        // "LOTS" contains "LTS" nowhere, but " LT" is not present either
        // since "LOTS" does not start with "LT" after a space boundary.
        assert_eq!(counts.get("LTS"), 0);
    }

    #[test]
    fn to_requires_surrounding_spaces() {
        let counts = KeywordCounts::analyze("DONATION TO COUNTY, TOGETHER WITH");
        // "TOGETHER" must not match; only the free-standing " TO ".
        assert_eq!(counts.get("TO"), 1);
    }

    #[test]
    fn case_is_ignored() {
        let counts = KeywordCounts::analyze("l7 and lots 3 & 4");
        assert_eq!(counts.get("L7"), 1);
        assert_eq!(counts.get("LOTS"), 1);
        assert_eq!(counts.get("&"), 1);
    }

    #[test]
    fn three_digit_number_is_not_a_lot_reference() {
        let counts = KeywordCounts::analyze("PARCEL L123 IS NOT A LOT TOKEN");
        assert_eq!(counts.get("L12"), 0);
        assert_eq!(counts.get("L1"), 0);
    }

    #[test]
    fn dash_diagnostic_counts_every_occurrence() {
        let counts = KeywordCounts::analyze("L-5 PLUS L-5 PLUS L 6");
        assert_eq!(counts.get("-"), 3);
        // While the deduplicated lot flags stay at one each.
        assert_eq!(counts.get("L5"), 1);
        assert_eq!(counts.get("L6"), 1);
    }

    #[test]
    fn column_order_is_stable_and_complete() {
        let columns = keyword_columns();
        assert_eq!(columns.len(), 8 + 100 + 1);
        assert_eq!(columns[0], " LT");
        assert_eq!(columns[5], "TO");
        assert_eq!(columns[8], "L0");
        assert_eq!(columns[107], "L99");
        assert_eq!(columns.last().unwrap(), "-");
    }
}
