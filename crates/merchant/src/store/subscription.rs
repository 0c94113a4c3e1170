//! Live query subscriptions.
//!
//! A [`Subscription`] owns a background task that evaluates a query once,
//! then again after every write reported by the store's change token. Each
//! distinct result is published to the subscriber. The first value a
//! subscriber sees is always [`QueryState::Loading`].
//!
//! The task is aborted when the subscription is released, either through
//! [`Subscription::unsubscribe`] or by dropping it.

use std::future::Future;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use super::StoreError;

/// The latest value of a live query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState<T> {
    /// The store has not answered yet.
    Loading,
    /// The query resolved.
    Ready(T),
    /// The store rejected the query.
    Failed(StoreError),
}

impl<T> QueryState<T> {
    /// Whether the store has not answered yet.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The resolved value, if any.
    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Loading | Self::Failed(_) => None,
        }
    }

    /// Convert into a `Result`, treating `Loading` as `None`.
    ///
    /// # Errors
    ///
    /// Returns the store error of a failed query.
    pub fn into_result(self) -> Result<Option<T>, StoreError> {
        match self {
            Self::Loading => Ok(None),
            Self::Ready(value) => Ok(Some(value)),
            Self::Failed(err) => Err(err),
        }
    }
}

/// Handle to a live query. Release it when the consuming view goes away.
#[derive(Debug)]
pub struct Subscription<T> {
    rx: watch::Receiver<QueryState<T>>,
    task: JoinHandle<()>,
}

impl<T> Subscription<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Start a live query driven by `changes`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F, Fut>(name: &'static str, mut changes: watch::Receiver<u64>, query: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, StoreError>> + Send + 'static,
    {
        let (tx, rx) = watch::channel(QueryState::Loading);

        let task = tokio::spawn(async move {
            loop {
                let version = *changes.borrow_and_update();
                let next = match query().await {
                    Ok(value) => QueryState::Ready(value),
                    Err(err) => QueryState::Failed(err),
                };

                let delivered = tx.send_if_modified(|current| {
                    if *current == next {
                        false
                    } else {
                        *current = next;
                        true
                    }
                });
                trace!(query = name, version, delivered, "Query evaluated");

                if tx.is_closed() {
                    debug!(query = name, "Subscriber gone, stopping query");
                    break;
                }
                if changes.changed().await.is_err() {
                    debug!(query = name, "Store closed, stopping query");
                    break;
                }
            }
        });

        Self { rx, task }
    }
}

impl<T: Clone> Subscription<T> {
    /// The most recent value, whether or not it was seen before.
    #[must_use]
    pub fn current(&self) -> QueryState<T> {
        self.rx.borrow().clone()
    }

    /// The most recent value if it arrived since the last call to
    /// `poll_update` or `changed`.
    pub fn poll_update(&mut self) -> Option<QueryState<T>> {
        if self.rx.has_changed().unwrap_or(false) {
            Some(self.rx.borrow_and_update().clone())
        } else {
            None
        }
    }

    /// Wait for the next delivered value.
    ///
    /// Returns `None` once the query task has stopped.
    pub async fn changed(&mut self) -> Option<QueryState<T>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Wait until the query has left the `Loading` state.
    ///
    /// Returns `Loading` only if the query task stopped before answering.
    pub async fn resolved(&mut self) -> QueryState<T> {
        loop {
            let state = self.rx.borrow_and_update().clone();
            if !state.is_loading() {
                return state;
            }
            if self.rx.changed().await.is_err() {
                return QueryState::Loading;
            }
        }
    }

    /// Release the subscription. No further values are delivered.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn counter_query(
        hits: Arc<AtomicU32>,
    ) -> impl Fn() -> std::future::Ready<Result<u32, StoreError>> + Send + 'static {
        move || std::future::ready(Ok(hits.fetch_add(1, Ordering::SeqCst) + 1))
    }

    #[tokio::test]
    async fn test_starts_loading_then_resolves() {
        let (_version, changes) = watch::channel(0_u64);
        let mut sub = Subscription::spawn("count", changes, || {
            std::future::ready(Ok::<_, StoreError>(7_u32))
        });

        assert_eq!(sub.current(), QueryState::Loading);
        assert_eq!(sub.resolved().await, QueryState::Ready(7));
    }

    #[tokio::test]
    async fn test_reruns_after_each_change() {
        let (version, changes) = watch::channel(0_u64);
        let hits = Arc::new(AtomicU32::new(0));
        let mut sub = Subscription::spawn("count", changes, counter_query(Arc::clone(&hits)));

        assert_eq!(sub.resolved().await, QueryState::Ready(1));

        version.send_modify(|v| *v += 1);
        assert_eq!(sub.changed().await, Some(QueryState::Ready(2)));
    }

    #[tokio::test]
    async fn test_identical_results_are_not_redelivered() {
        let (version, changes) = watch::channel(0_u64);
        let mut sub = Subscription::spawn("constant", changes, || {
            std::future::ready(Ok::<_, StoreError>("same"))
        });
        assert_eq!(sub.resolved().await, QueryState::Ready("same"));

        version.send_modify(|v| *v += 1);
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert_eq!(sub.poll_update(), None);
    }

    #[tokio::test]
    async fn test_failures_are_delivered() {
        let (_version, changes) = watch::channel(0_u64);
        let mut sub = Subscription::spawn("broken", changes, || {
            std::future::ready(Err::<u32, _>(StoreError::Unavailable("offline".to_owned())))
        });

        assert_eq!(
            sub.resolved().await,
            QueryState::Failed(StoreError::Unavailable("offline".to_owned()))
        );
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_the_query() {
        let (version, changes) = watch::channel(0_u64);
        let hits = Arc::new(AtomicU32::new(0));
        let mut sub = Subscription::spawn("count", changes, counter_query(Arc::clone(&hits)));
        sub.resolved().await;

        sub.unsubscribe();
        tokio::task::yield_now().await;
        let before = hits.load(Ordering::SeqCst);

        version.send_modify(|v| *v += 1);
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert_eq!(hits.load(Ordering::SeqCst), before);
    }

    #[test]
    fn test_query_state_helpers() {
        assert!(QueryState::<u8>::Loading.is_loading());
        assert_eq!(QueryState::Ready(3).ready(), Some(&3));
        assert_eq!(QueryState::Ready(3).into_result(), Ok(Some(3)));
        assert!(QueryState::<u8>::Failed(StoreError::NotFound("x".into()))
            .into_result()
            .is_err());
    }
}
