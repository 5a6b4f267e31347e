//! HTTP-backed browser session.
//!
//! Fetches the listing search page with `reqwest` and answers element
//! lookups by running CSS selectors over the fetched HTML with `scraper`.
//! No JavaScript is executed, so only server-rendered markup is visible.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use scraper::{Html, Selector};

use super::{BrowserSession, ElementHandle, SessionFactory};
use crate::error::SessionError;
use crate::retry::retry_with_backoff;

/// Build the search URL for `query`: words are percent-encoded and joined with `+`.
#[must_use]
pub fn search_url(base_url: &str, query: &str) -> String {
    let encoded = query
        .split_whitespace()
        .map(|word| utf8_percent_encode(word, NON_ALPHANUMERIC).to_string())
        .collect::<Vec<_>>()
        .join("+");
    if base_url.ends_with('/') {
        format!("{base_url}{encoded}")
    } else {
        format!("{base_url}/{encoded}")
    }
}

/// Opens [`HttpSession`]s that share one connection pool.
#[derive(Clone)]
pub struct HttpSessionFactory {
    client: Client,
    search_base_url: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl HttpSessionFactory {
    /// Creates a factory with configured timeout, `User-Agent`, and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        search_base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, SessionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            search_base_url: search_base_url.to_string(),
            max_retries,
            backoff_base_ms,
        })
    }

    /// Build a factory from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Http`] if the HTTP client cannot be constructed.
    pub fn from_app_config(config: &hotelpulse_core::AppConfig) -> Result<Self, SessionError> {
        Self::new(
            &config.search_base_url,
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_ms,
        )
    }

    #[must_use]
    pub fn session(&self) -> HttpSession {
        HttpSession {
            client: self.client.clone(),
            search_base_url: self.search_base_url.clone(),
            max_retries: self.max_retries,
            backoff_base_ms: self.backoff_base_ms,
            page: None,
            page_id: 0,
            found: Vec::new(),
        }
    }
}

#[async_trait]
impl SessionFactory for HttpSessionFactory {
    async fn open(&self) -> Result<Box<dyn BrowserSession>, SessionError> {
        Ok(Box::new(self.session()))
    }
}

/// Text and attributes captured from a matched element.
#[derive(Debug, Clone)]
struct ElementSnapshot {
    text: String,
    attributes: HashMap<String, String>,
}

pub struct HttpSession {
    client: Client,
    search_base_url: String,
    max_retries: u32,
    backoff_base_ms: u64,
    page: Option<Arc<str>>,
    page_id: u64,
    found: Vec<ElementSnapshot>,
}

impl HttpSession {
    fn snapshot(&self, handle: &ElementHandle) -> Result<&ElementSnapshot, SessionError> {
        if handle.page() != self.page_id {
            return Err(SessionError::StaleElement);
        }
        self.found
            .get(handle.index())
            .ok_or(SessionError::StaleElement)
    }
}

async fn fetch_page(client: &Client, url: &str) -> Result<String, SessionError> {
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
        .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        return Err(SessionError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_owned(),
        });
    }
    Ok(response.text().await?)
}

/// Parse `html` and capture the first element matching `selector`.
///
/// Parsing is CPU-bound; async callers run this on the blocking pool.
fn select_first(html: &str, selector: &str) -> Result<Option<ElementSnapshot>, SessionError> {
    let parsed = Selector::parse(selector).map_err(|e| SessionError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })?;
    let document = Html::parse_document(html);
    let snapshot = document.select(&parsed).next().map(|element| {
        let text = element
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ");
        let attributes = element
            .value()
            .attrs()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        ElementSnapshot { text, attributes }
    });
    Ok(snapshot)
}

#[async_trait]
impl BrowserSession for HttpSession {
    async fn navigate(&mut self, query: &str) -> Result<(), SessionError> {
        let url = search_url(&self.search_base_url, query);
        tracing::debug!(url, "navigating");
        let client = &self.client;
        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            fetch_page(client, &url)
        })
        .await?;

        self.page_id += 1;
        self.found.clear();
        self.page = Some(Arc::from(body));
        Ok(())
    }

    async fn find(&mut self, selector: &str) -> Result<Option<ElementHandle>, SessionError> {
        let html = Arc::clone(self.page.as_ref().ok_or(SessionError::NoPage)?);
        let owned_selector = selector.to_owned();
        let lookup = tokio::task::spawn_blocking(move || select_first(&html, &owned_selector))
            .await
            .map_err(|e| SessionError::Unreachable(format!("element lookup aborted: {e}")))?;
        let Some(snapshot) = lookup? else {
            return Ok(None);
        };
        self.found.push(snapshot);
        Ok(Some(ElementHandle::new(self.page_id, self.found.len() - 1)))
    }

    async fn read_text(&mut self, element: &ElementHandle) -> Result<String, SessionError> {
        Ok(self.snapshot(element)?.text.clone())
    }

    async fn read_attribute(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, SessionError> {
        Ok(self.snapshot(element)?.attributes.get(name).cloned())
    }

    async fn reset(&mut self) -> Result<(), SessionError> {
        self.page = None;
        self.page_id += 1;
        self.found.clear();
        Ok(())
    }

    fn page_source(&self) -> Option<String> {
        self.page.as_deref().map(str::to_owned)
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        self.page = None;
        self.found.clear();
        Ok(())
    }
}
