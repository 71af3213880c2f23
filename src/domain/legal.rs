// src/domain/legal.rs

/// Start/end anchors bounding the plat legal description inside the
/// registry summary text.
const START_ANCHOR: &str = "Active";
const END_ANCHOR: &str = "Appraisal";

/// Plat categories that disqualify a property outright.
const EXCLUDED_PLATS: [&str; 2] = ["SHORT PLAT", "LONG PLAT"];

/// How the legal description was obtained. Segmentation never fails
/// outward; when the anchors are missing it degrades to a wider text
/// window, and an empty document degrades to a placeholder naming the
/// address.
#[derive(Debug, Clone, PartialEq)]
pub enum LegalDescription {
    /// Trimmed text strictly between the two anchors.
    Segmented(String),
    /// Anchors absent; the trimmed full document stands in.
    FellBackToFullText(String),
    /// Document empty; synthetic one-liner naming the street.
    FellBackToPlaceholder(String),
}

impl LegalDescription {
    pub fn text(&self) -> &str {
        match self {
            LegalDescription::Segmented(s) => s,
            LegalDescription::FellBackToFullText(s) => s,
            LegalDescription::FellBackToPlaceholder(s) => s,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            LegalDescription::Segmented(s) => s,
            LegalDescription::FellBackToFullText(s) => s,
            LegalDescription::FellBackToPlaceholder(s) => s,
        }
    }
}

/// Extracts the legal description from the full summary text.
pub fn segment_legal_description(document: &str, street: &str) -> LegalDescription {
    if let Some(start) = document.find(START_ANCHOR) {
        let after_start = start + START_ANCHOR.len();
        if let Some(end) = document[after_start..].find(END_ANCHOR) {
            let inner = document[after_start..after_start + end].trim();
            return LegalDescription::Segmented(inner.to_string());
        }
    }

    let trimmed = document.trim();
    if trimmed.is_empty() {
        LegalDescription::FellBackToPlaceholder(format!("Property at {street}"))
    } else {
        LegalDescription::FellBackToFullText(trimmed.to_string())
    }
}

/// Hard filter: a description naming a short or long plat excludes the
/// property from the result set entirely.
pub fn has_excluded_plat(description: &str) -> bool {
    let upper = description.to_uppercase();
    EXCLUDED_PLATS.iter().any(|plat| upper.contains(plat))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_lies_strictly_between_anchors() {
        let doc = "Parcel 35242.0101 Active XYZ SUBDIVISION L4 B2 Appraisal $410,000";
        let legal = segment_legal_description(doc, "456 W PINE ST");
        assert_eq!(
            legal,
            LegalDescription::Segmented("XYZ SUBDIVISION L4 B2".to_string())
        );
    }

    #[test]
    fn end_anchor_is_searched_after_the_start_anchor() {
        let doc = "Appraisal history Active GLENROSE ADD L1 B3 Appraisal";
        let legal = segment_legal_description(doc, "1 E MAIN AVE");
        assert_eq!(legal.text(), "GLENROSE ADD L1 B3");
    }

    #[test]
    fn missing_anchor_falls_back_to_full_text() {
        let doc = "  GLENROSE ADD L1 B3  ";
        let legal = segment_legal_description(doc, "1 E MAIN AVE");
        assert_eq!(
            legal,
            LegalDescription::FellBackToFullText("GLENROSE ADD L1 B3".to_string())
        );
    }

    #[test]
    fn empty_document_falls_back_to_placeholder() {
        let legal = segment_legal_description("   ", "456 W PINE ST");
        assert_eq!(
            legal,
            LegalDescription::FellBackToPlaceholder("Property at 456 W PINE ST".to_string())
        );
    }

    #[test]
    fn plat_exclusion_is_case_insensitive() {
        assert!(has_excluded_plat("SHORT PLAT NO 12"));
        assert!(has_excluded_plat("recorded as Long Plat 88-3"));
        assert!(!has_excluded_plat("FAIRWOOD CREST NO 4 L23 B2"));
    }
}
