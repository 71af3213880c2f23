// src/scout/fetcher.rs

use crate::config::PipelineConfig;
use crate::domain::Jurisdiction;
use crate::errors::PipelineError;
use crate::scout::{extract_jurisdiction, with_retries};
use log::error;
use reqwest::blocking::Client;
use scraper::Html;

/// The parcel's summary page flattened to plain text, with the
/// jurisdiction extracted as a side product. The text lives only long
/// enough to derive the legal description and the keyword counts.
#[derive(Debug)]
pub struct SummaryDocument {
    pub text: String,
    pub jurisdiction: Jurisdiction,
}

/// Retrieves the full-text property summary for a parcel identifier.
/// Owns its own retry policy; fetch failures never count against the
/// resolver's attempts.
pub struct LegalTextFetcher {
    client: Client,
    config: PipelineConfig,
}

impl LegalTextFetcher {
    pub fn new(client: Client, config: PipelineConfig) -> Self {
        Self { client, config }
    }

    /// `None` means the summary could not be fetched after retries. The
    /// orchestrator substitutes a synthetic minimal document and keeps
    /// the property rather than dropping it.
    pub fn fetch(&self, pid: &str) -> Option<SummaryDocument> {
        let label = format!("summary fetch for PID {pid}");
        let html = match with_retries(self.config.max_attempts, &label, || self.get_summary(pid)) {
            Ok(html) => html,
            Err(e) => {
                error!("Final failure fetching summary for PID {pid}: {e}");
                return None;
            }
        };

        let text = html_to_text(&html);
        let jurisdiction = extract_jurisdiction(&text);
        Some(SummaryDocument { text, jurisdiction })
    }

    fn get_summary(&self, pid: &str) -> Result<String, PipelineError> {
        let resp = self.client.get(self.config.summary_url(pid)).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(PipelineError::HttpStatus(status.as_u16()));
        }
        Ok(resp.text()?)
    }
}

/// Flattens summary HTML to newline-separated plain text. Markup
/// structure is irrelevant beyond keeping field labels and values on
/// separate lines for the anchor searches.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .root_element()
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_flattens_to_one_field_per_line() {
        let html = "<html><body>\
            <td>Site Address</td><td>SPOKANE</td>\
            <td>6540 Square Feet</td>\
            <span>Active</span><span>XYZ SUBDIVISION L4 B2</span><span>Appraisal</span>\
            </body></html>";
        let text = html_to_text(html);
        assert_eq!(
            text,
            "Site Address\nSPOKANE\n6540 Square Feet\nActive\nXYZ SUBDIVISION L4 B2\nAppraisal"
        );
    }

    #[test]
    fn whitespace_only_nodes_are_dropped() {
        let text = html_to_text("<p>  a  </p>\n\n<p>   </p><p>b</p>");
        assert_eq!(text, "a\nb");
    }
}
