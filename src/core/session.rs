//! Session store holding the auth token and signed-in user
//!
//! The token is the only piece of client state that outlives a page
//! session. It is loaded once at startup (`init`), replaced at login
//! (`set`) and dropped at logout (`clear`). Components that make
//! authenticated calls receive a `SessionStore` handle instead of reading
//! persisted storage themselves.

use crate::core::error::SessionError;
use crate::entities::User;
use crate::storage::InMemorySessionBackend;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// A signed-in session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token sent in the `Authorization` header
    pub token: String,

    /// Profile of the signed-in user, when the backend returned one
    #[serde(default)]
    pub user: Option<User>,

    /// When the session was established
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: impl Into<String>, user: Option<User>) -> Self {
        Self {
            token: token.into(),
            user,
            logged_in_at: Utc::now(),
        }
    }
}

/// Persistence for the session between runs
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Load the persisted session, if any
    async fn load(&self) -> Result<Option<Session>, SessionError>;

    /// Persist a session, replacing the previous one
    async fn save(&self, session: &Session) -> Result<(), SessionError>;

    /// Forget the persisted session
    async fn remove(&self) -> Result<(), SessionError>;
}

/// Process-wide handle to the current session
///
/// Cloning is cheap; all clones share the same state and backend.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn SessionBackend>,
    current: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    pub fn new(backend: impl SessionBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Store that keeps the session for the lifetime of the process only
    pub fn in_memory() -> Self {
        Self::new(InMemorySessionBackend::new())
    }

    /// Load the persisted session on startup
    ///
    /// A corrupt persisted session is discarded and treated as signed out.
    pub async fn init(&self) -> Result<Option<Session>, SessionError> {
        let loaded = match self.backend.load().await {
            Ok(session) => session,
            Err(SessionError::Corrupt(e)) => {
                tracing::warn!(error = %e, "discarding corrupt persisted session");
                self.backend.remove().await?;
                None
            }
            Err(e) => return Err(e),
        };

        tracing::debug!(authenticated = loaded.is_some(), "session initialised");
        self.replace(loaded.clone());
        Ok(loaded)
    }

    /// Establish a session (login)
    pub async fn set(&self, session: Session) -> Result<(), SessionError> {
        self.backend.save(&session).await?;
        tracing::debug!(
            user = session.user.as_ref().map(|u| u.email.as_str()),
            "session established"
        );
        self.replace(Some(session));
        Ok(())
    }

    /// Drop the session (logout)
    pub async fn clear(&self) -> Result<(), SessionError> {
        self.replace(None);
        self.backend.remove().await?;
        tracing::debug!("session cleared");
        Ok(())
    }

    pub fn current(&self) -> Option<Session> {
        self.read(|s| s.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.read(|s| s.as_ref().map(|s| s.token.clone()))
    }

    pub fn user(&self) -> Option<User> {
        self.read(|s| s.as_ref().and_then(|s| s.user.clone()))
    }

    pub fn is_authenticated(&self) -> bool {
        self.read(|s| s.is_some())
    }

    fn read<T>(&self, f: impl FnOnce(&Option<Session>) -> T) -> T {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }

    fn replace(&self, session: Option<Session>) {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = session;
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lifecycle() {
        let store = SessionStore::in_memory();
        assert_eq!(store.init().await.unwrap(), None);
        assert!(!store.is_authenticated());

        store.set(Session::new("tok-1", None)).await.unwrap();
        assert_eq!(store.token().as_deref(), Some("tok-1"));

        store.clear().await.unwrap();
        assert!(store.token().is_none());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = SessionStore::in_memory();
        let other = store.clone();
        store.set(Session::new("shared", None)).await.unwrap();
        assert_eq!(other.token().as_deref(), Some("shared"));
    }

    #[tokio::test]
    async fn test_init_restores_persisted_session() {
        let backend = InMemorySessionBackend::new();
        backend.save(&Session::new("persisted", None)).await.unwrap();

        let store = SessionStore::new(backend);
        let loaded = store.init().await.unwrap();
        assert_eq!(loaded.map(|s| s.token), Some("persisted".to_string()));
        assert!(store.is_authenticated());
    }
}
