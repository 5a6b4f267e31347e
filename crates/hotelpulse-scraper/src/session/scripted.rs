//! In-memory browser sessions serving scripted pages, for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::{BrowserSession, ElementHandle, SessionFactory};
use crate::error::SessionError;

#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedElement {
    pub text: String,
    pub attributes: HashMap<String, String>,
    /// Delay applied when the element is looked up.
    pub delay: Option<Duration>,
}

impl ScriptedElement {
    pub fn text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn attr(name: &str, value: &str) -> Self {
        let mut attributes = HashMap::new();
        attributes.insert(name.to_string(), value.to_string());
        Self {
            attributes,
            ..Self::default()
        }
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedPage {
    pub elements: HashMap<String, ScriptedElement>,
}

impl ScriptedPage {
    pub fn with(mut self, selector: &str, element: ScriptedElement) -> Self {
        self.elements.insert(selector.to_string(), element);
        self
    }
}

/// Pages keyed by search query, plus queries whose navigation fails.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedSite {
    pub pages: HashMap<String, ScriptedPage>,
    pub unreachable: Vec<String>,
    pub navigation_delay: Option<Duration>,
    /// Overrides `navigation_delay` for individual queries.
    pub query_delays: HashMap<String, Duration>,
}

impl ScriptedSite {
    pub fn page(mut self, query: &str, page: ScriptedPage) -> Self {
        self.pages.insert(query.to_string(), page);
        self
    }

    pub fn delay(mut self, query: &str, delay: Duration) -> Self {
        self.query_delays.insert(query.to_string(), delay);
        self
    }
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

pub(crate) struct ScriptedSession {
    site: Arc<ScriptedSite>,
    counters: Arc<Counters>,
    closed: Arc<AtomicUsize>,
    page: Option<ScriptedPage>,
    page_id: u64,
    found: Vec<ScriptedElement>,
}

impl ScriptedSession {
    pub fn new(site: ScriptedSite) -> Self {
        Self {
            site: Arc::new(site),
            counters: Arc::new(Counters::default()),
            closed: Arc::new(AtomicUsize::new(0)),
            page: None,
            page_id: 0,
            found: Vec::new(),
        }
    }

    fn element(&self, handle: &ElementHandle) -> Result<&ScriptedElement, SessionError> {
        if handle.page() != self.page_id {
            return Err(SessionError::StaleElement);
        }
        self.found
            .get(handle.index())
            .ok_or(SessionError::StaleElement)
    }
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    async fn navigate(&mut self, query: &str) -> Result<(), SessionError> {
        let now = self.counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let delay = self
            .site
            .query_delays
            .get(query)
            .copied()
            .or(self.site.navigation_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.counters.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.site.unreachable.iter().any(|q| q == query) {
            return Err(SessionError::Unreachable(format!("browser crashed on {query}")));
        }
        self.page_id += 1;
        self.found.clear();
        self.page = Some(self.site.pages.get(query).cloned().unwrap_or_default());
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
        self.found.clear();
        Ok(())
    }

    fn page_source(&self) -> Option<String> {
        self.page
            .as_ref()
            .map(|p| format!("<html><!-- {} scripted elements --></html>", p.elements.len()))
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub(crate) struct ScriptedFactory {
    site: Arc<ScriptedSite>,
    pub counters: Arc<Counters>,
    pub opened: AtomicUsize,
    pub closed: Arc<AtomicUsize>,
}

impl ScriptedFactory {
    pub fn new(site: ScriptedSite) -> Self {
        Self {
            site: Arc::new(site),
            counters: Arc::new(Counters::default()),
            opened: AtomicUsize::new(0),
            closed: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl SessionFactory for ScriptedFactory {
    async fn open(&self) -> Result<Box<dyn BrowserSession>, SessionError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedSession {
            site: Arc::clone(&self.site),
            counters: Arc::clone(&self.counters),
            closed: Arc::clone(&self.closed),
            page: None,
            page_id: 0,
            found: Vec::new(),
        }))
    }
}
