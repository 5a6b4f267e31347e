//! Domain types for rating-panel extraction.

use chrono::{DateTime, Utc};

/// Text for both required fields, as found by one strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFields {
    pub rating_text: String,
    pub count_text: String,
}

/// Unvalidated rating-panel text for one hotel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawExtraction {
    /// Hotel slug.
    pub hotel: String,
    pub rating_text: String,
    pub count_text: String,
    /// Tag of the extraction strategy that produced both fields.
    pub strategy: String,
    pub extracted_at: DateTime<Utc>,
}
