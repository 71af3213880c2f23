// src/scout/mod.rs
//
// Clients for the county parcel registry: the attribute-query endpoint
// that resolves a street line to a PID, and the summary-page endpoint
// that yields the parcel's full-text record.

mod extract;
mod fetcher;
mod resolver;

pub use extract::{extract_dwelling_sqft, extract_jurisdiction, extract_lot_size};
pub use fetcher::{LegalTextFetcher, SummaryDocument};
pub use resolver::ParcelResolver;

use crate::errors::PipelineError;
use log::warn;
use std::thread;
use std::time::Duration;

/// Runs `op` up to `max_attempts` times, sleeping `2^attempt` seconds
/// (1 s, 2 s, ...) between retryable failures. Non-retryable errors
/// propagate immediately; retrying cannot fix a schema mismatch.
pub(crate) fn with_retries<T>(
    max_attempts: u32,
    label: &str,
    mut op: impl FnMut() -> Result<T, PipelineError>,
) -> Result<T, PipelineError> {
    let mut last_err = None;
    for attempt in 0..max_attempts {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() => {
                warn!(
                    "{label}: attempt {}/{} failed: {e}",
                    attempt + 1,
                    max_attempts
                );
                last_err = Some(e);
                if attempt + 1 < max_attempts {
                    thread::sleep(Duration::from_secs(1 << attempt));
                }
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err
        .unwrap_or_else(|| PipelineError::Network(format!("{label}: no attempts were made"))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_first_success() {
        let mut calls = 0;
        let result = with_retries(3, "test", || {
            calls += 1;
            Ok::<_, PipelineError>(42)
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 1);
    }

    #[test]
    fn non_retryable_error_propagates_immediately() {
        let mut calls = 0;
        let result: Result<(), _> = with_retries(3, "test", || {
            calls += 1;
            Err(PipelineError::UnexpectedShape("bad".into()))
        });
        assert!(matches!(result, Err(PipelineError::UnexpectedShape(_))));
        assert_eq!(calls, 1);
    }

    #[test]
    fn retryable_error_exhausts_all_attempts() {
        let mut calls = 0;
        let result: Result<(), _> = with_retries(1, "test", || {
            calls += 1;
            Err(PipelineError::HttpStatus(503))
        });
        assert!(matches!(result, Err(PipelineError::HttpStatus(503))));
        assert_eq!(calls, 1);
    }
}
