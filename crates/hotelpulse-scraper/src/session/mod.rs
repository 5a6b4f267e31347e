//! Browser-session capability used by the page locator.
//!
//! A session is exclusively owned by one worker for one retrieval. Sessions
//! come from a [`SessionPool`] and go back to it (reset) or get discarded
//! when they fail.

mod http;
mod pool;
#[cfg(test)]
pub(crate) mod scripted;

pub use http::{search_url, HttpSession, HttpSessionFactory};
pub use pool::{PooledSession, SessionPool};

use async_trait::async_trait;

use crate::error::SessionError;

/// Opaque reference to an element found on the current page.
///
/// Handles are only valid for the page they were found on; using one after
/// the next `navigate` or `reset` yields [`SessionError::StaleElement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementHandle {
    page: u64,
    index: usize,
}

impl ElementHandle {
    #[must_use]
    pub fn new(page: u64, index: usize) -> Self {
        Self { page, index }
    }

    #[must_use]
    pub fn page(&self) -> u64 {
        self.page
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

/// The browser-driving capability the retrieval pipeline needs.
#[async_trait]
pub trait BrowserSession: Send {
    /// Load the listing search page for `query`, replacing the current page.
    async fn navigate(&mut self, query: &str) -> Result<(), SessionError>;

    /// Find the first element matching a CSS `selector` on the current page.
    async fn find(&mut self, selector: &str) -> Result<Option<ElementHandle>, SessionError>;

    /// Visible text of an element, whitespace-collapsed.
    async fn read_text(&mut self, element: &ElementHandle) -> Result<String, SessionError>;

    async fn read_attribute(
        &mut self,
        _element: &ElementHandle,
        _name: &str,
    ) -> Result<Option<String>, SessionError> {
        Ok(None)
    }

    /// Return the session to an idle state so it can serve another hotel.
    async fn reset(&mut self) -> Result<(), SessionError> {
        Ok(())
    }

    /// Source of the current page, when the session can provide it.
    fn page_source(&self) -> Option<String> {
        None
    }

    async fn close(&mut self) -> Result<(), SessionError>;
}

/// Opens new browser sessions for the pool.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> Result<Box<dyn BrowserSession>, SessionError>;
}
