// src/domain/record.rs

use crate::domain::KeywordCounts;
use chrono::NaiveDate;
use std::fmt;

/// Governing entity of a parcel, derived from the registry summary.
#[derive(Debug, Clone, PartialEq)]
pub enum Jurisdiction {
    CityOfSpokane,
    SpokaneCounty,
    SpokaneValley,
    /// An incorporated city other than the county seat, title-cased.
    City(String),
    Unknown,
}

impl Jurisdiction {
    /// Case-insensitive match against a configured exclusion name.
    pub fn matches(&self, name: &str) -> bool {
        self.to_string().eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Jurisdiction::CityOfSpokane => write!(f, "City of Spokane"),
            Jurisdiction::SpokaneCounty => write!(f, "Spokane County"),
            Jurisdiction::SpokaneValley => write!(f, "Spokane Valley"),
            Jurisdiction::City(name) => write!(f, "{name}"),
            Jurisdiction::Unknown => write!(f, "Unknown"),
        }
    }
}

/// The terminal entity of the pipeline: one accepted property with its
/// resolved parcel, derived legal description, and keyword analysis.
/// Immutable after creation; handed read-only to the export layer.
#[derive(Debug, Clone)]
pub struct PropertyRecord {
    pub street: String,
    pub pid: String,
    pub legal_description: String,
    pub sqft: Option<u32>,
    pub price: Option<u64>,
    pub lot_size_acres: f64,
    pub post_date: Option<NaiveDate>,
    pub source: String,
    pub jurisdiction: Jurisdiction,
    pub keywords: KeywordCounts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jurisdiction_labels() {
        assert_eq!(Jurisdiction::CityOfSpokane.to_string(), "City of Spokane");
        assert_eq!(Jurisdiction::SpokaneValley.to_string(), "Spokane Valley");
        assert_eq!(
            Jurisdiction::City("Cheney".to_string()).to_string(),
            "Cheney"
        );
        assert_eq!(Jurisdiction::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn exclusion_match_ignores_case() {
        assert!(Jurisdiction::SpokaneCounty.matches("spokane county"));
        assert!(!Jurisdiction::SpokaneCounty.matches("Spokane Valley"));
    }
}
