// src/listing/source.rs

use crate::errors::PipelineError;
use crate::listing::RawListing;
use log::{info, warn};
use reqwest::blocking::Client;
use scraper::{Html, Selector};
use url::Url;

/// Boundary adapter over a listing feed. The pipeline only requires that
/// each card yields a detail link, an optional displayed address, and
/// the card's flattened text; everything else about the feed's markup is
/// this module's concern.
pub struct ListingSource {
    client: Client,
}

impl ListingSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetches one feed page and parses its cards. A feed that cannot be
    /// fetched is reported to the caller; it decides whether to continue
    /// with the remaining feeds.
    pub fn fetch_listings(&self, label: &str, url: &str) -> Result<Vec<RawListing>, PipelineError> {
        let resp = self.client.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(PipelineError::HttpStatus(status.as_u16()));
        }
        let html = resp.text()?;

        let listings = parse_listing_cards(&html, label, url)?;
        info!("Found {} properties from {label}", listings.len());
        Ok(listings)
    }
}

/// Parses the per-property cards out of a feed page.
pub fn parse_listing_cards(
    html: &str,
    label: &str,
    base_url: &str,
) -> Result<Vec<RawListing>, PipelineError> {
    let document = Html::parse_document(html);
    let card_selector = Selector::parse("div.HomeCardContainer")
        .map_err(|e| PipelineError::HtmlParse(e.to_string()))?;
    let link_selector =
        Selector::parse("a[href]").map_err(|e| PipelineError::HtmlParse(e.to_string()))?;
    let address_selector = Selector::parse("div.homeAddressV2")
        .map_err(|e| PipelineError::HtmlParse(e.to_string()))?;

    let base = Url::parse(base_url).ok();
    let mut listings = Vec::new();

    for card in document.select(&card_selector) {
        let Some(link) = card.select(&link_selector).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };

        let detail_href = match &base {
            Some(base) => base
                .join(href)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| href.to_string()),
            None => href.to_string(),
        };

        let display_address = card
            .select(&address_selector)
            .next()
            .map(|el| flatten_text(el.text()))
            .filter(|s| !s.is_empty());

        let card_text = flatten_text(card.text());
        if card_text.is_empty() {
            warn!("Empty card from {label}, skipping");
            continue;
        }

        listings.push(RawListing {
            source: label.to_string(),
            detail_href,
            display_address,
            card_text,
        });
    }

    Ok(listings)
}

fn flatten_text<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED_PAGE: &str = r#"
        <html><body>
          <div class="HomeCardContainer">
            <a href="/WA/Spokane/11628-N-Galahad-Dr-99218/home/23456789">view</a>
            <div class="homeAddressV2">11628 N Galahad Dr, Spokane, WA 99218</div>
            <div class="stats">$450,000 · 1,920 Sq Ft · 6,540 sq ft lot · NEW 3 DAYS AGO</div>
          </div>
          <div class="HomeCardContainer">
            <a href="/WA/Spokane/456-W-Pine-St-99201/home/7">view</a>
            <div class="stats">$98,000</div>
          </div>
          <div class="HomeCardContainer">
            <span>card without a link is dropped</span>
          </div>
        </body></html>
    "#;

    #[test]
    fn cards_with_links_are_parsed() {
        let listings =
            parse_listing_cards(FEED_PAGE, "Spokane City", "https://www.redfin.com/").unwrap();
        assert_eq!(listings.len(), 2);

        let first = &listings[0];
        assert_eq!(first.source, "Spokane City");
        assert_eq!(
            first.display_address.as_deref(),
            Some("11628 N Galahad Dr, Spokane, WA 99218")
        );
        assert!(first
            .detail_href
            .contains("/WA/Spokane/11628-N-Galahad-Dr-99218/home/23456789"));
        assert!(first.card_text.contains("$450,000"));
    }

    #[test]
    fn missing_display_address_is_none() {
        let listings =
            parse_listing_cards(FEED_PAGE, "Spokane City", "https://www.redfin.com/").unwrap();
        assert_eq!(listings[1].display_address, None);
    }

    #[test]
    fn relative_hrefs_resolve_against_the_feed_base() {
        let listings =
            parse_listing_cards(FEED_PAGE, "Spokane City", "https://www.redfin.com/").unwrap();
        assert!(listings[0].detail_href.starts_with("https://www.redfin.com/"));
    }
}
