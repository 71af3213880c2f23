// src/scout/extract.rs
//
// Extractors over the flattened summary text: jurisdiction, lot size,
// dwelling square footage. Registry values are preferred to listing-card
// values wherever both exist.

use crate::domain::Jurisdiction;
use once_cell::sync::Lazy;
use regex::Regex;

const COUNTY_SEAT: &str = "SPOKANE";
const SQFT_PER_ACRE: f64 = 43_560.0;

// The site-address city sits between the "Site Address" header and the
// land-size figure (square footage or acreage).
static SITE_CITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Site Address\s+([A-Z\s]+?)\s+(?:\d+\s+Square Feet|\d+\.?\d*\s+Acre)").unwrap()
});
// Four-digit tax code; a leading zero marks the incorporated city.
static TAX_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)Tax Code Area Status.*?(\d{4})").unwrap());

static ACRES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+\.?\d*)\s+Acre\(s\)").unwrap());
static SQFT_LOT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s+Square Feet").unwrap());

static DWELLING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Dwelling\s+\d{4}\s+([\d,]+)\s+NA\s+SF").unwrap());
static GROSS_AREA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Gross\s+Living\s+Area\s+([\d,]+)").unwrap());

/// Derives the governing jurisdiction from the summary text.
///
/// The county seat's name is ambiguous between the incorporated city and
/// the unincorporated county; the tax code disambiguates. Any other city
/// is used directly. When the structured field is absent, literal
/// substring checks run before defaulting to Unknown.
pub fn extract_jurisdiction(text: &str) -> Jurisdiction {
    if let Some(caps) = SITE_CITY_RE.captures(text) {
        let city = caps[1].trim().to_string();
        if city == COUNTY_SEAT {
            if let Some(code) = TAX_CODE_RE.captures(text) {
                if code[1].starts_with('0') {
                    return Jurisdiction::CityOfSpokane;
                }
                return Jurisdiction::SpokaneCounty;
            }
            return Jurisdiction::CityOfSpokane;
        }
        return match title_case(&city).as_str() {
            "Spokane Valley" => Jurisdiction::SpokaneValley,
            titled => Jurisdiction::City(titled.to_string()),
        };
    }

    let upper = text.to_uppercase();
    if upper.contains("SPOKANE VALLEY") {
        Jurisdiction::SpokaneValley
    } else if upper.contains(COUNTY_SEAT) {
        Jurisdiction::CityOfSpokane
    } else {
        Jurisdiction::Unknown
    }
}

/// Lot size in acres from the summary text, converting square footage
/// at 43,560 sq ft per acre.
pub fn extract_lot_size(text: &str) -> Option<f64> {
    if let Some(caps) = ACRES_RE.captures(text) {
        if let Ok(acres) = caps[1].parse::<f64>() {
            return Some(acres);
        }
    }
    if let Some(caps) = SQFT_LOT_RE.captures(text) {
        if let Ok(sqft) = caps[1].parse::<f64>() {
            return Some((sqft / SQFT_PER_ACRE * 1000.0).round() / 1000.0);
        }
    }
    None
}

/// Dwelling square footage from the improvements table, falling back to
/// the gross living area line.
pub fn extract_dwelling_sqft(text: &str) -> Option<u32> {
    let caps = DWELLING_RE
        .captures(text)
        .or_else(|| GROSS_AREA_RE.captures(text))?;
    caps[1].replace(',', "").parse::<u32>().ok()
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
