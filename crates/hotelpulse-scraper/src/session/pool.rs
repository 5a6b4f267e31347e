use std::sync::Arc;

use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};

use super::{BrowserSession, SessionFactory};
use crate::error::SessionError;

/// Bounded pool of browser sessions.
///
/// At most `capacity` sessions are checked out at once. Idle sessions are
/// reused before the factory is asked for a new one.
pub struct SessionPool {
    factory: Arc<dyn SessionFactory>,
    idle: Mutex<Vec<Box<dyn BrowserSession>>>,
    permits: Arc<Semaphore>,
    capacity: usize,
}

/// A session checked out of a [`SessionPool`].
///
/// Holds a pool permit until it is handed back with [`SessionPool::release`]
/// or [`SessionPool::discard`].
pub struct PooledSession {
    session: Box<dyn BrowserSession>,
    _permit: OwnedSemaphorePermit,
}

impl PooledSession {
    pub fn session_mut(&mut self) -> &mut dyn BrowserSession {
        self.session.as_mut()
    }
}

impl SessionPool {
    #[must_use]
    pub fn new(factory: Arc<dyn SessionFactory>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            factory,
            idle: Mutex::new(Vec::new()),
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of idle sessions waiting for reuse.
    pub async fn idle_count(&self) -> usize {
        self.idle.lock().await.len()
    }

    /// Check a session out, waiting for a free slot when the pool is at capacity.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Open`] if the pool has been closed or the
    /// factory fails to open a new session.
    pub async fn checkout(&self) -> Result<PooledSession, SessionError> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| SessionError::Open("session pool is closed".to_string()))?;

        let reused = self.idle.lock().await.pop();
        let session = match reused {
            Some(session) => session,
            None => {
                tracing::debug!(capacity = self.capacity, "opening new browser session");
                self.factory.open().await?
            }
        };

        Ok(PooledSession {
            session,
            _permit: permit,
        })
    }

    /// Reset a session and return it to the idle set. A session that fails
    /// to reset is closed and dropped instead.
    pub async fn release(&self, pooled: PooledSession) {
        let PooledSession {
            mut session,
            _permit,
        } = pooled;

        match session.reset().await {
            Ok(()) => self.idle.lock().await.push(session),
            Err(e) => {
                tracing::warn!(error = %e, "session reset failed; discarding session");
                close_quietly(session.as_mut()).await;
            }
        }
    }

    /// Close a session that must not be reused.
    pub async fn discard(&self, pooled: PooledSession) {
        let PooledSession {
            mut session,
            _permit,
        } = pooled;
        close_quietly(session.as_mut()).await;
    }

    /// Close every idle session and stop handing out new ones.
    pub async fn close_all(&self) {
        self.permits.close();
        let drained: Vec<Box<dyn BrowserSession>> = self.idle.lock().await.drain(..).collect();
        for mut session in drained {
            close_quietly(session.as_mut()).await;
        }
    }
}

async fn close_quietly(session: &mut dyn BrowserSession) {
    if let Err(e) = session.close().await {
        tracing::debug!(error = %e, "error closing browser session");
    }
}
