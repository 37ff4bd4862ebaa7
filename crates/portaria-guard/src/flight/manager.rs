//! Keyed single-flight execution with shared results and timeouts.

use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::types::{FlightError, FlightResult, DEFAULT_FLIGHT_TIMEOUT};

/// One registered in-flight operation.
///
/// The generation distinguishes this flight from any successor registered
/// under the same key after a cancellation: settlement must never tear down
/// a flight it does not own.
struct Flight<V> {
    tx: broadcast::Sender<FlightResult<V>>,
    generation: u64,
    started_at: Instant,
}

/// Deduplicates concurrent executions of the same logical fetch.
///
/// At most one operation is in flight per key. The first caller for a key
/// becomes the leader and spawns the operation; everyone else attaches as a
/// follower and awaits the shared outcome. The registry entry is removed
/// when the operation settles (success, failure, or timeout, whichever
/// fires first), so sequential calls always execute fresh.
///
/// The manager owns all flight state; callers hold nothing beyond the
/// returned result. Construct one instance per resource type and share it
/// (no hidden global registry).
pub struct SingleFlight<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
    V: Clone + Send + 'static,
{
    /// Map of in-flight operations to their broadcast senders.
    flights: Arc<DashMap<K, Flight<V>>>,
    /// Source of flight generations.
    generations: AtomicU64,
    /// Timeout applied by [`SingleFlight::execute`].
    default_timeout: Duration,
}

impl<K, V> SingleFlight<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
    V: Clone + Send + 'static,
{
    /// Creates a manager with [`DEFAULT_FLIGHT_TIMEOUT`].
    pub fn new() -> Self {
        Self::with_default_timeout(DEFAULT_FLIGHT_TIMEOUT)
    }

    /// Creates a manager with a custom default timeout.
    pub fn with_default_timeout(default_timeout: Duration) -> Self {
        Self {
            flights: Arc::new(DashMap::new()),
            generations: AtomicU64::new(0),
            default_timeout,
        }
    }

    /// Executes `operation` under the manager's default timeout.
    ///
    /// See [`SingleFlight::execute_with_timeout`].
    pub async fn execute<F, Fut, E>(&self, key: K, operation: F) -> FlightResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        self.execute_with_timeout(key, self.default_timeout, operation)
            .await
    }

    /// Executes `operation` at most once per flight for `key`.
    ///
    /// If a flight for `key` is already registered, attaches to it and
    /// awaits its outcome; `operation` is not invoked. Otherwise invokes
    /// `operation` exactly once and broadcasts its settlement (value,
    /// error, or timeout) to every attached caller.
    ///
    /// A timeout rejects all waiters and frees the key immediately, but it
    /// does not abort the operation: a late completion is simply ignored.
    pub async fn execute_with_timeout<F, Fut, E>(
        &self,
        key: K,
        timeout: Duration,
        operation: F,
    ) -> FlightResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        match self.flights.entry(key.clone()) {
            Entry::Occupied(entry) => {
                let mut rx = entry.get().tx.subscribe();
                // Release the shard lock before suspending.
                drop(entry);
                match rx.recv().await {
                    Ok(result) => result,
                    // Leader vanished without settling; retry as a fresh leader.
                    Err(_) => Box::pin(self.execute_with_timeout(key, timeout, operation)).await,
                }
            }
            Entry::Vacant(entry) => {
                let (tx, mut rx) = broadcast::channel(1);
                let generation = self.generations.fetch_add(1, Ordering::Relaxed);
                entry.insert(Flight {
                    tx: tx.clone(),
                    generation,
                    started_at: Instant::now(),
                });

                let flights = Arc::clone(&self.flights);
                let future = operation();
                let task_key = key.clone();
                tokio::spawn(async move {
                    // The operation runs detached so a timeout abandons the
                    // handle instead of aborting the work; a late completion
                    // settles into the void.
                    let handle = tokio::spawn(future);
                    let result = match tokio::time::timeout(timeout, handle).await {
                        Ok(Ok(Ok(value))) => Ok(value),
                        Ok(Ok(Err(err))) => Err(FlightError::operation(err)),
                        Ok(Err(join_err)) => Err(FlightError::operation(join_err)),
                        Err(_elapsed) => {
                            warn!(
                                key = ?task_key,
                                waited_ms = timeout.as_millis() as u64,
                                "flight timed out, releasing waiters"
                            );
                            Err(FlightError::Timeout {
                                waited_ms: timeout.as_millis() as u64,
                            })
                        }
                    };
                    // Deregister before notifying, so a caller woken by this
                    // settlement can immediately start a fresh flight.
                    flights.remove_if(&task_key, |_, flight| flight.generation == generation);
                    let _ = tx.send(result);
                });

                match rx.recv().await {
                    Ok(result) => result,
                    Err(_) => Err(FlightError::Cancelled),
                }
            }
        }
    }

    /// Whether a flight is currently registered for `key`.
    ///
    /// Observability query, no side effect.
    pub fn is_in_flight(&self, key: &K) -> bool {
        self.flights.contains_key(key)
    }

    /// Number of currently registered flights.
    pub fn in_flight_count(&self) -> usize {
        self.flights.len()
    }

    /// How long the flight for `key` has been pending, if one exists.
    pub fn flight_age(&self, key: &K) -> Option<Duration> {
        self.flights
            .get(key)
            .map(|flight| flight.started_at.elapsed())
    }

    /// Rejects all waiters for `key` with [`FlightError::Cancelled`] and
    /// frees the key immediately, independent of the underlying operation.
    ///
    /// Returns whether a flight was actually cancelled. Intended for
    /// emergency resets, e.g. logout while a fetch is pending.
    pub fn cancel(&self, key: &K) -> bool {
        match self.flights.remove(key) {
            Some((_, flight)) => {
                debug!(key = ?key, "flight cancelled, releasing waiters");
                let _ = flight.tx.send(Err(FlightError::Cancelled));
                true
            }
            None => false,
        }
    }

    /// Cancels every registered flight. Reserved for recovery tooling.
    ///
    /// Returns the number of flights cancelled.
    pub fn cancel_all(&self) -> usize {
        let keys: Vec<K> = self.flights.iter().map(|entry| entry.key().clone()).collect();
        let cancelled = keys.iter().filter(|key| self.cancel(key)).count();
        if cancelled > 0 {
            warn!(cancelled, "cancelled all in-flight operations");
        }
        cancelled
    }
}

impl<K, V> Default for SingleFlight<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
    V: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
