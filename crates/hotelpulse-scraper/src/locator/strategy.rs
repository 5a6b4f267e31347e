//! Extraction strategies: one way of reading both rating-panel fields.

use std::sync::Arc;

use async_trait::async_trait;

use super::types::RawFields;
use crate::error::SessionError;
use crate::session::BrowserSession;

/// One method of locating the rating and review-count text on a page.
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    /// Short stable name recorded on every extraction this strategy produces.
    fn tag(&self) -> &str;

    /// Try to read both fields from the session's current page.
    ///
    /// Returns `Ok(None)` when either field is missing or empty.
    async fn attempt(
        &self,
        session: &mut dyn BrowserSession,
    ) -> Result<Option<RawFields>, SessionError>;
}

/// Where a field's text comes from once its element is found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    Text,
    /// `aria-label` when present and non-empty, else the visible text.
    AriaLabelOrText,
    Attribute(String),
}

/// Ordered selectors for one field; the first non-empty match wins.
#[derive(Debug, Clone)]
pub struct FieldLocator {
    pub selectors: Vec<String>,
    pub source: TextSource,
}

impl FieldLocator {
    #[must_use]
    pub fn new(selectors: &[&str], source: TextSource) -> Self {
        Self {
            selectors: selectors.iter().map(|s| (*s).to_string()).collect(),
            source,
        }
    }

    /// Read the field's text.
    ///
    /// # Errors
    ///
    /// Propagates any [`SessionError`] raised by the session.
    pub async fn read(
        &self,
        session: &mut dyn BrowserSession,
    ) -> Result<Option<String>, SessionError> {
        for selector in &self.selectors {
            let Some(element) = session.find(selector).await? else {
                continue;
            };
            let text = match &self.source {
                TextSource::Text => session.read_text(&element).await?,
                TextSource::AriaLabelOrText => {
                    match session.read_attribute(&element, "aria-label").await? {
                        Some(label) if !label.trim().is_empty() => label,
                        _ => session.read_text(&element).await?,
                    }
                }
                TextSource::Attribute(name) => session
                    .read_attribute(&element, name)
                    .await?
                    .unwrap_or_default(),
            };
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_string()));
            }
        }
        Ok(None)
    }
}

/// A strategy built from CSS selectors for each field.
#[derive(Debug, Clone)]
pub struct SelectorStrategy {
    pub tag: String,
    pub rating: FieldLocator,
    pub review_count: FieldLocator,
}

#[async_trait]
impl ExtractionStrategy for SelectorStrategy {
    fn tag(&self) -> &str {
        &self.tag
    }

    async fn attempt(
        &self,
        session: &mut dyn BrowserSession,
    ) -> Result<Option<RawFields>, SessionError> {
        let Some(rating_text) = self.rating.read(session).await? else {
            return Ok(None);
        };
        let Some(count_text) = self.review_count.read(session).await? else {
            return Ok(None);
        };
        Ok(Some(RawFields {
            rating_text,
            count_text,
        }))
    }
}

/// The rating-panel strategies for the map listing service, primary first.
#[must_use]
pub fn default_strategies() -> Vec<Arc<dyn ExtractionStrategy>> {
    vec![
        Arc::new(SelectorStrategy {
            tag: "aria_label".to_string(),
            rating: FieldLocator::new(
                &[
                    r#"div.F7nice span[aria-label*="stars"]"#,
                    r#"[aria-label*="Rated"]"#,
                    r#"[aria-label*="out of 5"]"#,
                ],
                TextSource::AriaLabelOrText,
            ),
            review_count: FieldLocator::new(
                &[
                    r#"div.F7nice span[aria-label*="reviews"]"#,
                    r#"button[jsaction*="pane.rating.moreReviews"]"#,
                    r#"span[aria-label*="reviews"]"#,
                ],
                TextSource::AriaLabelOrText,
            ),
        }),
        Arc::new(SelectorStrategy {
            tag: "microdata".to_string(),
            rating: FieldLocator::new(
                &[r#"meta[itemprop="ratingValue"]"#],
                TextSource::Attribute("content".to_string()),
            ),
            review_count: FieldLocator::new(
                &[r#"meta[itemprop="reviewCount"]"#],
                TextSource::Attribute("content".to_string()),
            ),
        }),
        Arc::new(SelectorStrategy {
            tag: "visible_text".to_string(),
            rating: FieldLocator::new(
                &[
                    "span.MW4etd",
                    r#"span[jsname="Te9Tpc"]"#,
                    ".aMPvhf-fI6EEc-KVuj8d",
                ],
                TextSource::Text,
            ),
            review_count: FieldLocator::new(&["span.UY7F9", "span.OEwtMc"], TextSource::Text),
        }),
    ]
}
