mod fields;
mod models;
mod source;

pub use fields::{extract_lot_size_acres, extract_post_date, extract_price, extract_sqft};
pub use models::RawListing;
pub use source::ListingSource;
