//! In-memory implementation of SessionBackend for testing and short-lived processes

use crate::core::error::SessionError;
use crate::core::session::{Session, SessionBackend};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// In-memory session backend
///
/// Nothing survives the process. Uses RwLock for thread-safe access.
#[derive(Clone, Default)]
pub struct InMemorySessionBackend {
    session: Arc<RwLock<Option<Session>>>,
}

impl InMemorySessionBackend {
    /// Create a new, empty in-memory backend
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionBackend for InMemorySessionBackend {
    async fn load(&self) -> Result<Option<Session>, SessionError> {
        let session = self.session.read().unwrap_or_else(|e| e.into_inner());
        Ok(session.clone())
    }

    async fn save(&self, session: &Session) -> Result<(), SessionError> {
        let mut slot = self.session.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(session.clone());
        Ok(())
    }

    async fn remove(&self) -> Result<(), SessionError> {
        let mut slot = self.session.write().unwrap_or_else(|e| e.into_inner());
        *slot = None;
        Ok(())
    }
}
