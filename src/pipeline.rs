// src/pipeline.rs
//
// Sequences the per-property stages: normalize -> resolve -> fetch ->
// segment/analyze -> filter. Properties are processed one at a time with
// a politeness delay between remote calls; one property's failure never
// aborts the batch.

use crate::config::{PipelineConfig, USER_AGENT};
use crate::domain::{
    extract_street, has_excluded_plat, segment_legal_description, Jurisdiction, KeywordCounts,
    PropertyRecord,
};
use crate::errors::PipelineError;
use crate::listing::{
    extract_lot_size_acres, extract_post_date, extract_price, extract_sqft, ListingSource,
    RawListing,
};
use crate::scout::{
    extract_dwelling_sqft, extract_lot_size, LegalTextFetcher, ParcelResolver, SummaryDocument,
};
use chrono::Local;
use log::{error, info, warn};
use reqwest::blocking::Client;
use std::cmp::Ordering;
use std::thread;

/// Terminal non-accepted states of the per-property state machine.
/// These are counted outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RejectReason {
    NoAddress,
    LookupFailed,
    PlatExcluded,
    JurisdictionExcluded,
    UndersizedLot,
}

enum Outcome {
    Accepted(Box<PropertyRecord>),
    Rejected(RejectReason),
}

/// Run-end counters, reported to the user once the batch finishes.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunSummary {
    pub total_found: usize,
    pub accepted: usize,
    pub no_address: usize,
    pub failed_lookups: usize,
    pub plat_rejected: usize,
    pub jurisdiction_rejected: usize,
    pub undersized_rejected: usize,
    pub errors: usize,
}

impl RunSummary {
    fn record_rejection(&mut self, reason: RejectReason) {
        match reason {
            RejectReason::NoAddress => self.no_address += 1,
            RejectReason::LookupFailed => self.failed_lookups += 1,
            RejectReason::PlatExcluded => self.plat_rejected += 1,
            RejectReason::JurisdictionExcluded => self.jurisdiction_rejected += 1,
            RejectReason::UndersizedLot => self.undersized_rejected += 1,
        }
    }

    pub fn log(&self) {
        info!("=== processing summary ===");
        info!("Total properties found: {}", self.total_found);
        info!("Successfully accepted: {}", self.accepted);
        if self.no_address > 0 {
            info!("Skipped (no usable address): {}", self.no_address);
        }
        if self.failed_lookups > 0 {
            info!("Failed lookups: {}", self.failed_lookups);
        }
        if self.plat_rejected > 0 {
            info!("Rejected (short/long plat): {}", self.plat_rejected);
        }
        if self.jurisdiction_rejected > 0 {
            info!("Rejected (jurisdiction): {}", self.jurisdiction_rejected);
        }
        if self.undersized_rejected > 0 {
            info!("Rejected (undersized lot): {}", self.undersized_rejected);
        }
        if self.errors > 0 {
            info!("Unexpected per-property errors: {}", self.errors);
        }
        if self.total_found > 0 {
            info!(
                "Success rate: {:.1}%",
                self.accepted as f64 / self.total_found as f64 * 100.0
            );
        }
    }
}

pub struct Pipeline {
    source: ListingSource,
    resolver: ParcelResolver,
    fetcher: LegalTextFetcher,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| PipelineError::Network(e.to_string()))?;

        Ok(Self {
            source: ListingSource::new(client.clone()),
            resolver: ParcelResolver::new(client.clone(), &config),
            fetcher: LegalTextFetcher::new(client, config.clone()),
            config,
        })
    }

    /// Gathers raw listings from every configured feed. A feed that
    /// fails to fetch is logged and skipped; the others still run.
    pub fn collect_listings(&self) -> Vec<RawListing> {
        let mut listings = Vec::new();
        for (label, url) in &self.config.listing_sources {
            info!("Fetching properties from {label}...");
            match self.source.fetch_listings(label, url) {
                Ok(found) => listings.extend(found),
                Err(e) => error!("Error fetching from {label}: {e}"),
            }
        }
        info!("Total properties found: {}", listings.len());
        listings
    }

    /// Runs every listing through the pipeline and returns the accepted
    /// records, most recently posted first, plus the run counters.
    pub fn run(&self, mut listings: Vec<RawListing>) -> (Vec<PropertyRecord>, RunSummary) {
        if let Some(limit) = self.config.limit {
            if listings.len() > limit {
                listings.truncate(limit);
                info!("Limiting to {limit} properties");
            }
        }

        let total = listings.len();
        let mut summary = RunSummary {
            total_found: total,
            ..RunSummary::default()
        };
        let mut records = Vec::new();

        for (i, listing) in listings.iter().enumerate() {
            match self.process(listing) {
                Ok(Outcome::Accepted(record)) => {
                    info!("[{}/{total}] {} accepted", i + 1, record.street);
                    summary.accepted += 1;
                    records.push(*record);
                }
                Ok(Outcome::Rejected(reason)) => {
                    info!("[{}/{total}] rejected: {reason:?}", i + 1);
                    summary.record_rejection(reason);
                }
                Err(e) => {
                    // Contained here: log, skip this property, continue.
                    error!("[{}/{total}] unexpected error: {e}; continuing", i + 1);
                    summary.errors += 1;
                }
            }

            if i + 1 < total {
                thread::sleep(self.config.politeness_delay);
            }
        }

        sort_by_recency(&mut records);
        (records, summary)
    }

    fn process(&self, listing: &RawListing) -> Result<Outcome, PipelineError> {
        let street = extract_street(listing.display_address.as_deref(), &listing.detail_href);
        if street.is_empty() {
            return Ok(Outcome::Rejected(RejectReason::NoAddress));
        }

        let Some(pid) = self.resolver.resolve(&street) else {
            warn!("Skipping {street} - no PID found");
            return Ok(Outcome::Rejected(RejectReason::LookupFailed));
        };

        // Fetch failure degrades to a synthetic one-line document so the
        // property still flows through analysis.
        let (full_text, jurisdiction) = match self.fetcher.fetch(&pid) {
            Some(SummaryDocument { text, jurisdiction }) => (text, jurisdiction),
            None => {
                warn!("No summary for {street} (PID {pid}) - using fallback values");
                (format!("PROPERTY: {street}"), Jurisdiction::Unknown)
            }
        };

        let record = assemble_record(
            listing,
            street,
            pid,
            &full_text,
            jurisdiction,
            Local::now().date_naive(),
        );
        if let Some(reason) = filter_record(&record, &self.config) {
            return Ok(Outcome::Rejected(reason));
        }
        Ok(Outcome::Accepted(Box::new(record)))
    }
}

/// Builds the terminal record from the summary text plus the listing
/// card. Registry numbers win; card numbers are the fallback.
fn assemble_record(
    listing: &RawListing,
    street: String,
    pid: String,
    full_text: &str,
    jurisdiction: Jurisdiction,
    today: chrono::NaiveDate,
) -> PropertyRecord {
    let lot_size_acres = extract_lot_size(full_text)
        .or_else(|| extract_lot_size_acres(&listing.card_text))
        .unwrap_or(0.0);
    let sqft = extract_dwelling_sqft(full_text).or_else(|| extract_sqft(&listing.card_text));

    PropertyRecord {
        keywords: KeywordCounts::analyze(full_text),
        legal_description: segment_legal_description(full_text, &street).into_text(),
        price: extract_price(&listing.card_text),
        post_date: extract_post_date(&listing.card_text, today),
        source: listing.source.clone(),
        street,
        pid,
        sqft,
        lot_size_acres,
        jurisdiction,
    }
}

/// Business filters, in order: plat-type exclusion, jurisdiction
/// exclusion (matched against the resolved jurisdiction, the source
/// label, and the address text; any one match excludes), then the
/// minimum lot size.
fn filter_record(record: &PropertyRecord, config: &PipelineConfig) -> Option<RejectReason> {
    if has_excluded_plat(&record.legal_description) {
        return Some(RejectReason::PlatExcluded);
    }
    if let Some(excluded) = &config.exclude_jurisdiction {
        let needle = excluded.to_uppercase();
        if record.jurisdiction.matches(excluded)
            || record.source.to_uppercase().contains(&needle)
            || record.street.to_uppercase().contains(&needle)
        {
            return Some(RejectReason::JurisdictionExcluded);
        }
    }
    if record.lot_size_acres < config.min_lot_acres {
        return Some(RejectReason::UndersizedLot);
    }
    None
}

/// Most recent posting first; records without a parseable date go last.
fn sort_by_recency(records: &mut [PropertyRecord]) {
    records.sort_by(|a, b| match (a.post_date, b.post_date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
