//! Favorites controller
//!
//! Each `(item_type, item_id)` pair is in one of three states:
//!
//! ```text
//!                add / toggle                  refetch
//! NotFavorited ───────────────▶ Pending ───────────────▶ Favorited
//!      ▲                          │ failure                  │
//!      │         refetch          ▼                          │ remove / toggle
//!      └──────────────────── (unchanged) ◀── Pending ◀───────┘
//! ```
//!
//! A successful mutation is never patched into the local set: the whole
//! collection is refetched and the server's answer replaces it. Concurrent
//! mutations of the same item are not serialized against each other, so
//! the last refetch to land wins.

use crate::core::entity::ItemType;
use crate::core::error::Result;
use crate::entities::{FavoriteEntry, FavoriteKey};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

/// Backend operations the controller relies on
#[async_trait]
pub trait FavoritesApi: Send + Sync {
    /// Fetch the full favorites collection of the signed-in user
    async fn fetch_favorites(&self) -> Result<Vec<FavoriteEntry>>;

    /// Create a favorite record
    async fn add_favorite(&self, key: &FavoriteKey) -> Result<()>;

    /// Delete a favorite record
    async fn remove_favorite(&self, key: &FavoriteKey) -> Result<()>;
}

/// Membership state of a single item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteState {
    NotFavorited,
    Favorited,
    /// A mutation for this item is in flight
    Pending,
}

#[derive(Default)]
struct FavoritesState {
    entries: BTreeMap<FavoriteKey, FavoriteEntry>,
    pending: HashMap<FavoriteKey, usize>,
    last_error: Option<String>,
    loaded: bool,
}

/// Tracks the signed-in user's favorites
///
/// Cloning is cheap; clones share the same state.
pub struct FavoritesController<A: FavoritesApi> {
    api: Arc<A>,
    state: Arc<RwLock<FavoritesState>>,
}

impl<A: FavoritesApi> Clone for FavoritesController<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            state: self.state.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Mutation {
    Add,
    Remove,
}

/// Marks an item `Pending` until dropped, including when the mutation is
/// cancelled mid-flight
struct PendingGuard {
    state: Arc<RwLock<FavoritesState>>,
    key: FavoriteKey,
}

impl PendingGuard {
    fn enter(state: &Arc<RwLock<FavoritesState>>, key: &FavoriteKey) -> Self {
        let mut guard = state.write().unwrap_or_else(|e| e.into_inner());
        *guard.pending.entry(key.clone()).or_insert(0) += 1;
        Self {
            state: state.clone(),
            key: key.clone(),
        }
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        let mut guard = self.state.write().unwrap_or_else(|e| e.into_inner());
        if let Some(count) = guard.pending.get_mut(&self.key) {
            *count -= 1;
            if *count == 0 {
                guard.pending.remove(&self.key);
            }
        }
    }
}

impl<A: FavoritesApi> FavoritesController<A> {
    pub fn new(api: A) -> Self {
        Self::from_shared(Arc::new(api))
    }

    pub fn from_shared(api: Arc<A>) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(FavoritesState::default())),
        }
    }

    fn read<T>(&self, f: impl FnOnce(&FavoritesState) -> T) -> T {
        let guard = self.state.read().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }

    fn write<T>(&self, f: impl FnOnce(&mut FavoritesState) -> T) -> T {
        let mut guard = self.state.write().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    /// Refetch the whole collection and replace the local set
    pub async fn refresh(&self) -> Result<()> {
        match self.api.fetch_favorites().await {
            Ok(entries) => {
                self.write(|s| {
                    s.entries = entries.into_iter().map(|e| (e.key.clone(), e)).collect();
                    s.loaded = true;
                    s.last_error = None;
                });
                tracing::debug!(count = self.count(), "favorites refreshed");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch favorites");
                self.write(|s| s.last_error = Some(e.user_message()));
                Err(e)
            }
        }
    }

    async fn mutate(&self, key: FavoriteKey, mutation: Mutation) -> Result<()> {
        let _pending = PendingGuard::enter(&self.state, &key);

        let outcome = match mutation {
            Mutation::Add => self.api.add_favorite(&key).await,
            Mutation::Remove => self.api.remove_favorite(&key).await,
        };
        let outcome = match outcome {
            Ok(()) => {
                tracing::debug!(%key, ?mutation, "favorite mutation accepted");
                self.refresh().await
            }
            Err(e) => {
                tracing::warn!(%key, ?mutation, error = %e, "favorite mutation failed");
                self.write(|s| s.last_error = Some(e.user_message()));
                Err(e)
            }
        };
        outcome
    }

    /// Favorite an item, then refetch
    pub async fn add(&self, item_type: ItemType, item_id: &str) -> Result<()> {
        self.mutate(FavoriteKey::new(item_type, item_id), Mutation::Add)
            .await
    }

    /// Unfavorite an item, then refetch
    pub async fn remove(&self, item_type: ItemType, item_id: &str) -> Result<()> {
        self.mutate(FavoriteKey::new(item_type, item_id), Mutation::Remove)
            .await
    }

    /// Remove when favorited, add otherwise
    ///
    /// Returns the membership the server reported after the refetch.
    pub async fn toggle(&self, item_type: ItemType, item_id: &str) -> Result<bool> {
        if self.is_favorited(item_type, item_id) {
            self.remove(item_type, item_id).await?;
        } else {
            self.add(item_type, item_id).await?;
        }
        Ok(self.is_favorited(item_type, item_id))
    }

    pub fn is_favorited(&self, item_type: ItemType, item_id: &str) -> bool {
        let key = FavoriteKey::new(item_type, item_id);
        self.read(|s| s.entries.contains_key(&key))
    }

    pub fn state(&self, item_type: ItemType, item_id: &str) -> FavoriteState {
        let key = FavoriteKey::new(item_type, item_id);
        self.read(|s| {
            if s.pending.contains_key(&key) {
                FavoriteState::Pending
            } else if s.entries.contains_key(&key) {
                FavoriteState::Favorited
            } else {
                FavoriteState::NotFavorited
            }
        })
    }

    /// Current favorites, ordered by item type then id
    pub fn favorites(&self) -> Vec<FavoriteEntry> {
        self.read(|s| s.entries.values().cloned().collect())
    }

    /// Favorites of one kind
    pub fn favorites_of(&self, item_type: ItemType) -> Vec<FavoriteEntry> {
        self.read(|s| {
            s.entries
                .values()
                .filter(|e| e.key.item_type == item_type)
                .cloned()
                .collect()
        })
    }

    pub fn count(&self) -> usize {
        self.read(|s| s.entries.len())
    }

    /// Whether at least one fetch succeeded
    pub fn is_loaded(&self) -> bool {
        self.read(|s| s.loaded)
    }

    /// Message of the last failed operation, cleared by a successful refetch
    pub fn last_error(&self) -> Option<String> {
        self.read(|s| s.last_error.clone())
    }

    /// Forget everything (logout)
    pub fn reset(&self) {
        self.write(|s| *s = FavoritesState::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::MarketError;
    use crate::core::cancel::ViewScope;
    use reqwest::StatusCode;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeApi {
        server: Mutex<Vec<FavoriteKey>>,
        calls: Mutex<Vec<String>>,
        fail_mutations: bool,
        hang_mutations: bool,
    }

    #[async_trait]
    impl FavoritesApi for FakeApi {
        async fn fetch_favorites(&self) -> Result<Vec<FavoriteEntry>> {
            self.calls.lock().unwrap().push("fetch".to_string());
            Ok(self
                .server
                .lock()
                .unwrap()
                .iter()
                .map(|key| FavoriteEntry {
                    id: None,
                    key: key.clone(),
                    user_id: None,
                    created_at: None,
                    item: None,
                })
                .collect())
        }

        async fn add_favorite(&self, key: &FavoriteKey) -> Result<()> {
            self.calls.lock().unwrap().push(format!("add {}", key));
            if self.hang_mutations {
                futures::future::pending::<()>().await;
            }
            if self.fail_mutations {
                return Err(MarketError::api(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Some("Database unavailable".to_string()),
                ));
            }
            self.server.lock().unwrap().push(key.clone());
            Ok(())
        }

        async fn remove_favorite(&self, key: &FavoriteKey) -> Result<()> {
            self.calls.lock().unwrap().push(format!("remove {}", key));
            self.server.lock().unwrap().retain(|k| k != key);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_add_then_remove() {
        let controller = FavoritesController::new(FakeApi::default());

        controller.add(ItemType::Vehicle, "42").await.unwrap();
        assert!(controller.is_favorited(ItemType::Vehicle, "42"));
        assert_eq!(
            controller.state(ItemType::Vehicle, "42"),
            FavoriteState::Favorited
        );

        controller.remove(ItemType::Vehicle, "42").await.unwrap();
        assert!(!controller.is_favorited(ItemType::Vehicle, "42"));
    }

    #[tokio::test]
    async fn test_every_mutation_refetches() {
        let api = Arc::new(FakeApi::default());
        let controller = FavoritesController::from_shared(api.clone());

        controller.add(ItemType::Part, "7").await.unwrap();
        controller.remove(ItemType::Part, "7").await.unwrap();

        assert_eq!(
            *api.calls.lock().unwrap(),
            vec!["add part:7", "fetch", "remove part:7", "fetch"]
        );
    }

    #[tokio::test]
    async fn test_toggle_dispatches_on_membership() {
        let api = Arc::new(FakeApi::default());
        let controller = FavoritesController::from_shared(api.clone());

        assert!(controller.toggle(ItemType::Service, "3").await.unwrap());
        assert!(!controller.toggle(ItemType::Service, "3").await.unwrap());

        let calls = api.calls.lock().unwrap();
        assert_eq!(calls[0], "add service:3");
        assert_eq!(calls[2], "remove service:3");
    }

    #[tokio::test]
    async fn test_failure_keeps_membership_and_reports_message() {
        let api = FakeApi {
            fail_mutations: true,
            ..FakeApi::default()
        };
        let controller = FavoritesController::new(api);

        let err = controller.add(ItemType::Vehicle, "1").await.unwrap_err();
        assert_eq!(err.user_message(), "Database unavailable");
        assert!(!controller.is_favorited(ItemType::Vehicle, "1"));
        assert_eq!(
            controller.state(ItemType::Vehicle, "1"),
            FavoriteState::NotFavorited
        );
        assert_eq!(
            controller.last_error().as_deref(),
            Some("Database unavailable")
        );
    }

    #[tokio::test]
    async fn test_favorites_of_kind() {
        let controller = FavoritesController::new(FakeApi::default());
        controller.add(ItemType::Vehicle, "1").await.unwrap();
        controller.add(ItemType::Part, "2").await.unwrap();

        assert_eq!(controller.count(), 2);
        assert_eq!(controller.favorites_of(ItemType::Part).len(), 1);

        controller.reset();
        assert_eq!(controller.count(), 0);
        assert!(!controller.is_loaded());
    }

    #[test]
    fn test_cancelled_mutation_clears_pending() {
        let api = FakeApi {
            hang_mutations: true,
            ..FakeApi::default()
        };
        let controller = FavoritesController::new(api);
        let scope = ViewScope::new();
        let handle = scope.handle();

        let mut task =
            tokio_test::task::spawn(handle.run(controller.add(ItemType::Vehicle, "42")));
        tokio_test::assert_pending!(task.poll());
        assert_eq!(
            controller.state(ItemType::Vehicle, "42"),
            FavoriteState::Pending
        );

        drop(scope);
        let result = tokio_test::assert_ready!(task.poll());
        assert!(matches!(result, Err(MarketError::Cancelled)));
        assert_eq!(
            controller.state(ItemType::Vehicle, "42"),
            FavoriteState::NotFavorited
        );
    }

    #[test]
    fn test_dropped_mutation_clears_pending() {
        let api = FakeApi {
            hang_mutations: true,
            ..FakeApi::default()
        };
        let controller = FavoritesController::new(api);

        let mut task = tokio_test::task::spawn(controller.add(ItemType::Part, "7"));
        tokio_test::assert_pending!(task.poll());
        assert_eq!(controller.state(ItemType::Part, "7"), FavoriteState::Pending);
        drop(task);
        assert_eq!(
            controller.state(ItemType::Part, "7"),
            FavoriteState::NotFavorited
        );
    }
}
