// src/listing/models.rs

/// One listing card as yielded by a listing feed: the raw flattened card
/// text, the detail-page link, and whatever display address the card
/// carried. Produced and consumed within a single pipeline pass.
#[derive(Debug, Clone)]
pub struct RawListing {
    /// Label of the feed this card came from (e.g. "Spokane City").
    pub source: String,
    pub detail_href: String,
    pub display_address: Option<String>,
    pub card_text: String,
}
