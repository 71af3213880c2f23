// config.rs
use std::time::Duration;

pub const USER_AGENT: &str = "Mozilla/5.0";

/// Everything the pipeline needs to know up front: where the listing
/// feeds and the county registry live, how patient to be with them, and
/// which business filters apply.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Listing feeds, label -> search URL. The label is carried through
    /// into every record as its `source`.
    pub listing_sources: Vec<(String, String)>,

    /// ArcGIS attribute-query endpoint for parcel lookup.
    pub parcel_query_url: String,
    /// Summary page URL template; `{}` is replaced with the PID.
    pub summary_url_template: String,

    /// Attempts per remote call, lookup and fetch counted separately.
    pub max_attempts: u32,
    /// Per-request timeout on the shared client.
    pub request_timeout: Duration,
    /// Pause between consecutive properties, to bound request rate.
    pub politeness_delay: Duration,

    /// Cap on properties processed, applied before the pipeline starts.
    pub limit: Option<usize>,
    /// Jurisdiction name that excludes a property when it matches the
    /// resolved jurisdiction, the source label, or the address itself.
    pub exclude_jurisdiction: Option<String>,
    /// Records with a lot smaller than this (acres) are rejected.
    pub min_lot_acres: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            listing_sources: vec![
                (
                    "Spokane City".to_string(),
                    "https://www.redfin.com/city/17154/WA/Spokane/filter/status=active".to_string(),
                ),
                (
                    "Spokane County".to_string(),
                    "https://www.redfin.com/county/1736/WA/Spokane-County/filter/status=active"
                        .to_string(),
                ),
            ],
            parcel_query_url:
                "https://gismo.spokanecounty.org/arcgis/rest/services/SCOUT/PropertyLookup/MapServer/0/query"
                    .to_string(),
            summary_url_template:
                "https://cp.spokanecounty.org/SCOUT/propertyinformation/Summary.aspx?PID={}"
                    .to_string(),
            max_attempts: 3,
            request_timeout: Duration::from_secs(45),
            politeness_delay: Duration::from_millis(300),
            limit: None,
            exclude_jurisdiction: None,
            min_lot_acres: 0.0,
        }
    }
}

impl PipelineConfig {
    pub fn summary_url(&self, pid: &str) -> String {
        self.summary_url_template.replacen("{}", pid, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_url_substitutes_pid() {
        let config = PipelineConfig::default();
        let url = config.summary_url("35242.0101");
        assert!(url.ends_with("Summary.aspx?PID=35242.0101"));
    }
}
