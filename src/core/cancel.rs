//! Cancellation scopes tying in-flight requests to a view's lifetime
//!
//! A view owns a [`ViewScope`] and hands [`ScopeHandle`]s to the requests
//! it starts. When the view goes away (explicit `cancel()` or drop), every
//! outstanding request resolves to [`MarketError::Cancelled`] and its
//! response is never applied.
//!
//! ```rust,ignore
//! let scope = ViewScope::new();
//! let handle = scope.handle();
//! let page = tokio::spawn(async move {
//!     client.list::<Vehicle>(&query, Some(&handle)).await
//! });
//! drop(scope); // navigating away
//! assert!(matches!(page.await?, Err(MarketError::Cancelled)));
//! ```

use crate::core::error::{MarketError, Result};
use futures::future::{AbortHandle, Abortable, Aborted};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct ScopeState {
    cancelled: bool,
    next_id: u64,
    in_flight: HashMap<u64, AbortHandle>,
}

/// Cloneable handle used to run futures inside a scope
#[derive(Clone, Default)]
pub struct ScopeHandle {
    state: Arc<Mutex<ScopeState>>,
}

impl ScopeHandle {
    /// Run `fut` unless the scope is (or becomes) cancelled
    pub async fn run<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let (handle, registration) = AbortHandle::new_pair();
        let _entry = {
            let mut state = self.lock();
            if state.cancelled {
                return Err(MarketError::Cancelled);
            }
            let id = state.next_id;
            state.next_id += 1;
            state.in_flight.insert(id, handle);
            InFlight {
                state: self.state.clone(),
                id,
            }
        };

        match Abortable::new(fut, registration).await {
            Ok(result) => result,
            Err(Aborted) => {
                tracing::debug!("discarding response of cancelled request");
                Err(MarketError::Cancelled)
            }
        }
    }

    /// Abort every outstanding future and refuse new ones
    pub fn cancel(&self) {
        let mut state = self.lock();
        state.cancelled = true;
        let aborted = state.in_flight.len();
        for (_, handle) in state.in_flight.drain() {
            handle.abort();
        }
        if aborted > 0 {
            tracing::debug!(aborted, "view scope cancelled");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.lock().cancelled
    }

    /// Number of futures currently running in the scope
    pub fn in_flight(&self) -> usize {
        self.lock().in_flight.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScopeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Registration of one running future, removed when the future finishes
/// or is dropped
struct InFlight {
    state: Arc<Mutex<ScopeState>>,
    id: u64,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.in_flight.remove(&self.id);
    }
}

/// Owner of a cancellation scope; dropping it cancels the scope
#[derive(Default)]
pub struct ViewScope {
    handle: ScopeHandle,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> ScopeHandle {
        self.handle.clone()
    }

    /// Run `fut` inside this scope
    pub async fn run<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.handle.run(fut).await
    }

    pub fn cancel(&self) {
        self.handle.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.handle.is_cancelled()
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.handle.cancel();
    }
}

/// Run `fut` in `scope` when one is given, otherwise run it directly
pub(crate) async fn run_scoped<F, T>(scope: Option<&ScopeHandle>, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match scope {
        Some(scope) => scope.run(fut).await,
        None => fut.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_completed_future_passes_through() {
        let scope = ViewScope::new();
        let value = scope.handle().run(async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
        assert_eq!(scope.handle().in_flight(), 0);
    }

    #[tokio::test]
    async fn test_drop_cancels_pending_future() {
        let scope = ViewScope::new();
        let handle = scope.handle();
        let task = tokio::spawn(async move {
            handle
                .run(async {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok("late")
                })
                .await
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(scope);

        let result = task.await.unwrap();
        assert!(matches!(result, Err(MarketError::Cancelled)));
    }

    #[test]
    fn test_cancel_wakes_pending_future() {
        let scope = ViewScope::new();
        let handle = scope.handle();
        let mut task =
            tokio_test::task::spawn(handle.run(futures::future::pending::<Result<()>>()));

        tokio_test::assert_pending!(task.poll());
        assert_eq!(scope.handle().in_flight(), 1);

        scope.cancel();
        assert!(task.is_woken());
        let result = tokio_test::assert_ready!(task.poll());
        assert!(matches!(result, Err(MarketError::Cancelled)));
        assert_eq!(scope.handle().in_flight(), 0);
    }

    #[test]
    fn test_dropped_future_is_unregistered() {
        let scope = ViewScope::new();
        let handle = scope.handle();

        let mut task =
            tokio_test::task::spawn(handle.run(futures::future::pending::<Result<()>>()));
        tokio_test::assert_pending!(task.poll());
        assert_eq!(scope.handle().in_flight(), 1);

        drop(task);
        assert_eq!(scope.handle().in_flight(), 0);
        assert!(!scope.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_scope_refuses_new_work() {
        let scope = ViewScope::new();
        scope.cancel();
        let result = scope.handle().run(async { Ok(()) }).await;
        assert!(matches!(result, Err(MarketError::Cancelled)));
    }

    #[tokio::test]
    async fn test_unscoped_run() {
        let value = run_scoped(None, async { Ok::<_, MarketError>(1) }).await.unwrap();
        assert_eq!(value, 1);
    }
}
