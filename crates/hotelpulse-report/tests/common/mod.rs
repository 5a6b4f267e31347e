//! In-memory listing site and browser sessions for pipeline tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hotelpulse_core::HotelTarget;
use hotelpulse_scraper::{
    BrowserSession, ElementHandle, PageLocator, RecordValidator, RetrievalWorker, Scheduler,
    SessionError, SessionFactory, SessionPool,
};

pub const STARS: &str = r#"div.F7nice span[aria-label*="stars"]"#;
pub const REVIEWS: &str = r#"div.F7nice span[aria-label*="reviews"]"#;
pub const META_RATING: &str = r#"meta[itemprop="ratingValue"]"#;

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub text: String,
    pub attributes: HashMap<String, String>,
    pub delay: Option<Duration>,
}

#[derive(Debug, Clone, Default)]
pub struct Listing {
    elements: HashMap<String, FakeElement>,
    unreachable: bool,
}

impl Listing {
    /// A rating panel exposing both fields through `aria-label`.
    pub fn panel(rating: &str, count: &str) -> Self {
        let mut listing = Self::default();
        listing.elements.insert(STARS.to_string(), labelled(rating));
        listing.elements.insert(REVIEWS.to_string(), labelled(count));
        listing
    }

    /// A page whose primary and microdata lookups hang past any strategy timeout.
    pub fn stalled() -> Self {
        let mut listing = Self::default();
        for selector in [STARS, META_RATING] {
            listing.elements.insert(
                selector.to_string(),
                FakeElement {
                    delay: Some(Duration::from_secs(30)),
                    ..labelled("4.0")
                },
            );
        }
        listing
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }
}

fn labelled(label: &str) -> FakeElement {
    let mut attributes = HashMap::new();
    attributes.insert("aria-label".to_string(), label.to_string());
    attributes.insert("content".to_string(), label.to_string());
    FakeElement {
        attributes,
        ..FakeElement::default()
    }
}

/// Listings keyed by search query.
#[derive(Debug, Clone, Default)]
pub struct FakeSite {
    listings: HashMap<String, Listing>,
}

impl FakeSite {
    pub fn with(mut self, target: &HotelTarget, listing: Listing) -> Self {
        self.listings.insert(target.query.clone(), listing);
        self
    }
}

pub struct FakeSession {
    site: Arc<FakeSite>,
    page: Option<Listing>,
    page_id: u64,
    found: Vec<FakeElement>,
}

impl FakeSession {
    fn element(&self, handle: &ElementHandle) -> Result<&FakeElement, SessionError> {
        if handle.page() != self.page_id {
            return Err(SessionError::StaleElement);
        }
        self.found.get(handle.index()).ok_or(SessionError::StaleElement)
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn navigate(&mut self, query: &str) -> Result<(), SessionError> {
        let listing = self.site.listings.get(query).cloned().unwrap_or_default();
        if listing.unreachable {
            return Err(SessionError::Unreachable(format!("no route to listing for {query}")));
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
        self.page_id += 1;
        self.found.clear();
        self.page = Some(listing);
        Ok(())
    }

    async fn find(&mut self, selector: &str) -> Result<Option<ElementHandle>, SessionError> {
        let page = self.page.as_ref().ok_or(SessionError::NoPage)?;
        let Some(element) = page.elements.get(selector).cloned() else {
            return Ok(None);
        };
        if let Some(delay) = element.delay {
            tokio::time::sleep(delay).await;
        }
        self.found.push(element);
        Ok(Some(ElementHandle::new(self.page_id, self.found.len() - 1)))
    }

    async fn read_text(&mut self, element: &ElementHandle) -> Result<String, SessionError> {
        Ok(self.element(element)?.text.clone())
    }

    async fn read_attribute(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, SessionError> {
        Ok(self.element(element)?.attributes.get(name).cloned())
    }

    async fn reset(&mut self) -> Result<(), SessionError> {
        self.page = None;
        self.page_id += 1;
        self.found.clear();
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        Ok(())
    }
}

pub struct FakeFactory {
    site: Arc<FakeSite>,
}

#[async_trait]
impl SessionFactory for FakeFactory {
    async fn open(&self) -> Result<Box<dyn BrowserSession>, SessionError> {
        Ok(Box::new(FakeSession {
            site: Arc::clone(&self.site),
            page: None,
            page_id: 0,
            found: Vec::new(),
        }))
    }
}

/// A scheduler over `site` with default strategies and a short strategy timeout.
pub fn scheduler(site: FakeSite, pool_size: usize) -> Scheduler {
    let factory: Arc<dyn SessionFactory> = Arc::new(FakeFactory {
        site: Arc::new(site),
    });
    let worker = RetrievalWorker::new(
        Arc::new(PageLocator::with_default_strategies(Duration::from_millis(50))),
        Arc::new(RecordValidator::default()),
        Arc::new(SessionPool::new(factory, pool_size)),
    );
    Scheduler::new(Arc::new(worker))
}

/// A fresh report path under the system temp directory.
pub fn scratch_report() -> PathBuf {
    std::env::temp_dir()
        .join(format!("hotelpulse-report-{}", uuid::Uuid::new_v4()))
        .join("hotel_ratings.jsonl")
}
