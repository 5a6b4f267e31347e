//! Raw rating-panel text to typed, range-checked values.

use hotelpulse_core::AppConfig;

use crate::error::ValidationFailure;
use crate::locator::RawExtraction;
use crate::parse_helpers::{parse_rating, parse_review_count};

/// Inclusive bounds on an accepted rating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for RatingBounds {
    fn default() -> Self {
        Self { min: 0.0, max: 5.0 }
    }
}

impl RatingBounds {
    #[must_use]
    pub fn contains(&self, rating: f64) -> bool {
        rating >= self.min && rating <= self.max
    }
}

impl std::fmt::Display for RatingBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.1}, {:.1}]", self.min, self.max)
    }
}

/// Typed fields of a validated extraction, before timing is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedFields {
    pub hotel: String,
    pub rating: f64,
    pub review_count: u64,
    pub strategy: String,
}

#[derive(Debug, Clone, Default)]
pub struct RecordValidator {
    bounds: RatingBounds,
}

impl RecordValidator {
    #[must_use]
    pub fn new(bounds: RatingBounds) -> Self {
        Self { bounds }
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(RatingBounds {
            min: config.rating_min,
            max: config.rating_max,
        })
    }

    #[must_use]
    pub fn bounds(&self) -> RatingBounds {
        self.bounds
    }

    /// Coerce raw text into a rating and a review count.
    ///
    /// The rating is checked before the count. Out-of-range values are
    /// rejected as they are, never clamped.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationFailure`] naming the first field that could not be
    /// parsed or fell outside its range.
    pub fn validate(&self, raw: &RawExtraction) -> Result<ValidatedFields, ValidationFailure> {
        let rating =
            parse_rating(&raw.rating_text).ok_or_else(|| ValidationFailure::UnparsableRating {
                text: raw.rating_text.clone(),
            })?;
        if !self.bounds.contains(rating) {
            return Err(ValidationFailure::OutOfRange {
                field: "rating",
                value: rating.to_string(),
                range: self.bounds.to_string(),
            });
        }

        let count =
            parse_review_count(&raw.count_text).ok_or_else(|| ValidationFailure::UnparsableCount {
                text: raw.count_text.clone(),
            })?;
        let review_count = u64::try_from(count).map_err(|_| ValidationFailure::OutOfRange {
            field: "review_count",
            value: count.to_string(),
            range: ">= 0".to_string(),
        })?;

        Ok(ValidatedFields {
            hotel: raw.hotel.clone(),
            rating,
            review_count,
            strategy: raw.strategy.clone(),
        })
    }
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
