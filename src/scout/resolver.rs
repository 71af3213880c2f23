// src/scout/resolver.rs

use crate::config::PipelineConfig;
use crate::errors::PipelineError;
use crate::scout::with_retries;
use log::{error, warn};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

/// Resolves a canonical street line to a parcel identifier through the
/// registry's attribute-query endpoint, using a "starts-with" match on
/// the site-address attribute.
pub struct ParcelResolver {
    client: Client,
    query_url: String,
    max_attempts: u32,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    features: Option<Vec<Feature>>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    attributes: Option<Attributes>,
}

#[derive(Debug, Deserialize)]
struct Attributes {
    #[serde(rename = "PID_NUM")]
    pid_num: Option<Value>,
}

impl ParcelResolver {
    pub fn new(client: Client, config: &PipelineConfig) -> Self {
        Self {
            client,
            query_url: config.parcel_query_url.clone(),
            max_attempts: config.max_attempts,
        }
    }

    /// `None` covers both "service answered, no parcel" and "service
    /// unreachable after retries" — the orchestrator's only action in
    /// either case is to skip the property.
    pub fn resolve(&self, street: &str) -> Option<String> {
        let label = format!("PID lookup for {street}");
        let body = match with_retries(self.max_attempts, &label, || self.query(street)) {
            Ok(body) => body,
            Err(e) => {
                error!("Final failure on PID lookup for {street}: {e}");
                return None;
            }
        };

        match parse_pid(&body) {
            Ok(Some(pid)) => Some(pid),
            Ok(None) => {
                warn!("No PID for {street}");
                None
            }
            Err(e) => {
                // Data-shape failure: logged, not retried.
                error!("PID lookup for {street} returned malformed data: {e}");
                None
            }
        }
    }

    fn query(&self, street: &str) -> Result<String, PipelineError> {
        let where_clause = format!("site_address LIKE '{street}%'");
        let resp = self
            .client
            .get(&self.query_url)
            .query(&[
                ("f", "json"),
                ("where", where_clause.as_str()),
                ("outFields", "PID_NUM"),
                ("returnGeometry", "false"),
            ])
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PipelineError::HttpStatus(status.as_u16()));
        }
        Ok(resp.text()?)
    }
}

/// Pulls the first feature's PID out of a query response body.
/// `Ok(None)` means the service answered with zero features.
fn parse_pid(body: &str) -> Result<Option<String>, PipelineError> {
    let parsed: QueryResponse =
        serde_json::from_str(body).map_err(|e| PipelineError::JsonParse(e.to_string()))?;

    let features = parsed.features.unwrap_or_default();
    let Some(first) = features.first() else {
        return Ok(None);
    };

    let attributes = first
        .attributes
        .as_ref()
        .ok_or_else(|| PipelineError::UnexpectedShape("feature has no attributes".into()))?;

    match &attributes.pid_num {
        Some(Value::String(s)) if !s.is_empty() => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        _ => Err(PipelineError::UnexpectedShape(
            "PID_NUM missing from attributes".into(),
        )),
    }
}
