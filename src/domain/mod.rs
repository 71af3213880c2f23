mod address;
mod keywords;
mod legal;
mod record;

pub use address::extract_street;
pub use keywords::{keyword_columns, KeywordCounts};
pub use legal::{has_excluded_plat, segment_legal_description, LegalDescription};
pub use record::{Jurisdiction, PropertyRecord};
