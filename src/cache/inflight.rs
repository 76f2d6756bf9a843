//! In-Flight Tracker Module
//!
//! Per-key deduplication of outstanding fetches. The first caller to join a
//! key becomes the leader and receives a [`FetchGuard`]; everyone arriving
//! while the guard is registered becomes a waiter and is handed the leader's
//! outcome through a watch channel instead of issuing a second network call.
//!
//! Membership check and leader registration happen under one lock, so at
//! most one fetch per key can ever be outstanding.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::error::{Result, StoreError};

/// Slot observed by waiters: `None` while the fetch is outstanding, then the
/// leader's final result.
type Outcome<V> = Option<Result<V>>;

type Registry<K, V> = Arc<Mutex<HashMap<K, watch::Receiver<Outcome<V>>>>>;

// == In-Flight Tracker ==
/// Registry of keys with an outstanding fetch.
///
/// Mutated only through [`InFlightTracker::join`] and the guards it hands
/// out; a key is removed exactly once, when its guard completes or drops.
#[derive(Debug)]
pub struct InFlightTracker<K, V> {
    registry: Registry<K, V>,
}

impl<K, V> Clone for InFlightTracker<K, V> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<K, V> Default for InFlightTracker<K, V> {
    fn default() -> Self {
        Self {
            registry: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

/// The two ways a caller can come out of [`InFlightTracker::join`].
#[derive(Debug)]
pub enum Flight<K, V>
where
    K: Eq + Hash + Display,
{
    /// This caller owns the fetch for the key
    Leader(FetchGuard<K, V>),
    /// Another caller owns the fetch; await its outcome
    Waiter(FlightWaiter<V>),
}

impl<K, V> InFlightTracker<K, V>
where
    K: Eq + Hash + Clone + Display,
    V: Clone,
{
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Join ==
    /// Registers interest in `key`.
    ///
    /// If no fetch is outstanding the caller becomes the leader and must
    /// eventually call [`FetchGuard::complete`]; otherwise the caller gets a
    /// waiter handle onto the existing fetch.
    pub fn join(&self, key: K) -> Flight<K, V> {
        let mut registry = self.registry.lock().unwrap();
        if let Some(rx) = registry.get(&key) {
            return Flight::Waiter(FlightWaiter { rx: rx.clone() });
        }

        let (tx, rx) = watch::channel(None);
        registry.insert(key.clone(), rx);
        Flight::Leader(FetchGuard {
            key,
            tx: Some(tx),
            registry: Arc::clone(&self.registry),
        })
    }

    // == Contains ==
    /// Whether a fetch for `key` is currently outstanding.
    pub fn contains(&self, key: &K) -> bool {
        self.registry.lock().unwrap().contains_key(key)
    }

    // == Length ==
    /// Number of keys with an outstanding fetch.
    pub fn len(&self) -> usize {
        self.registry.lock().unwrap().len()
    }

    /// Returns true if no fetch is outstanding.
    pub fn is_empty(&self) -> bool {
        self.registry.lock().unwrap().is_empty()
    }
}

// == Fetch Guard ==
/// Leadership of one outstanding fetch.
///
/// Every exit path deregisters the key: [`FetchGuard::complete`] publishes
/// the real result, and dropping an uncompleted guard (the owning future was
/// cancelled or panicked) publishes an abort error so waiters are never left
/// hanging.
#[derive(Debug)]
pub struct FetchGuard<K, V>
where
    K: Eq + Hash + Display,
{
    key: K,
    tx: Option<watch::Sender<Outcome<V>>>,
    registry: Registry<K, V>,
}

impl<K, V> FetchGuard<K, V>
where
    K: Eq + Hash + Display,
{
    /// The key this guard owns.
    pub fn key(&self) -> &K {
        &self.key
    }

    // == Complete ==
    /// Deregisters the key and delivers `result` to every waiter.
    ///
    /// Deregistration happens before the send: a caller arriving after the
    /// key vanished reads the cache (populated by the leader before calling
    /// this), never a channel that will not fire again.
    pub fn complete(mut self, result: Result<V>) {
        if let Some(tx) = self.tx.take() {
            self.registry.lock().unwrap().remove(&self.key);
            let _ = tx.send(Some(result));
        }
    }
}

impl<K, V> Drop for FetchGuard<K, V>
where
    K: Eq + Hash + Display,
{
    fn drop(&mut self) {
        let Some(tx) = self.tx.take() else {
            return;
        };
        // Uncompleted guard: the fetch never produced a result.
        if let Ok(mut registry) = self.registry.lock() {
            registry.remove(&self.key);
        }
        let _ = tx.send(Some(Err(StoreError::Aborted(self.key.to_string()))));
    }
}

// == Flight Waiter ==
/// Handle held by a coalesced caller; resolves to the leader's outcome.
#[derive(Debug)]
pub struct FlightWaiter<V> {
    rx: watch::Receiver<Outcome<V>>,
}

impl<V: Clone> FlightWaiter<V> {
    /// Waits for the leading fetch to finish and returns its result.
    ///
    /// The watch channel retains the final value, so a waiter that starts
    /// observing after the leader finished still sees the outcome.
    pub async fn outcome(mut self) -> Result<V> {
        match self.rx.wait_for(|slot| slot.is_some()).await {
            Ok(slot) => match slot.clone() {
                Some(result) => result,
                None => Err(StoreError::Internal(
                    "in-flight outcome vanished".to_string(),
                )),
            },
            Err(_) => Err(StoreError::Internal(
                "in-flight channel closed without an outcome".to_string(),
            )),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> InFlightTracker<String, u32> {
        InFlightTracker::new()
    }

    fn as_leader(flight: Flight<String, u32>) -> FetchGuard<String, u32> {
        match flight {
            Flight::Leader(guard) => guard,
            Flight::Waiter(_) => panic!("expected to lead this fetch"),
        }
    }

    fn as_waiter(flight: Flight<String, u32>) -> FlightWaiter<u32> {
        match flight {
            Flight::Waiter(waiter) => waiter,
            Flight::Leader(_) => panic!("expected to join an existing fetch"),
        }
    }

    #[tokio::test]
    async fn test_first_join_leads_second_waits() {
        let tracker = tracker();

        let guard = as_leader(tracker.join("k".to_string()));
        assert!(tracker.contains(&"k".to_string()));

        let waiter = as_waiter(tracker.join("k".to_string()));
        guard.complete(Ok(7));

        assert_eq!(waiter.outcome().await, Ok(7));
        assert!(tracker.is_empty());
    }

    #[tokio::test]
    async fn test_complete_deregisters_before_notifying() {
        let tracker = tracker();
        let guard = as_leader(tracker.join("k".to_string()));

        guard.complete(Ok(1));
        assert!(!tracker.contains(&"k".to_string()));

        // key free again, next join leads
        let _guard = as_leader(tracker.join("k".to_string()));
    }

    #[tokio::test]
    async fn test_waiter_observes_leader_error() {
        let tracker = tracker();
        let guard = as_leader(tracker.join("k".to_string()));
        let waiter = as_waiter(tracker.join("k".to_string()));

        guard.complete(Err(StoreError::Network("connection refused".to_string())));

        assert_eq!(
            waiter.outcome().await,
            Err(StoreError::Network("connection refused".to_string()))
        );
        assert!(tracker.is_empty());
    }

    #[tokio::test]
    async fn test_dropped_guard_aborts_waiters_and_deregisters() {
        let tracker = tracker();
        let guard = as_leader(tracker.join("k".to_string()));
        let waiter = as_waiter(tracker.join("k".to_string()));

        drop(guard);

        assert_eq!(
            waiter.outcome().await,
            Err(StoreError::Aborted("k".to_string()))
        );
        assert!(tracker.is_empty());
    }

    #[tokio::test]
    async fn test_waiter_joining_late_still_sees_outcome() {
        let tracker = tracker();
        let guard = as_leader(tracker.join("k".to_string()));
        let waiter = as_waiter(tracker.join("k".to_string()));

        // leader finishes before the waiter ever polls
        guard.complete(Ok(42));

        assert_eq!(waiter.outcome().await, Ok(42));
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let tracker = tracker();

        let guard_a = as_leader(tracker.join("a".to_string()));
        let guard_b = as_leader(tracker.join("b".to_string()));
        assert_eq!(tracker.len(), 2);

        guard_a.complete(Ok(1));
        assert!(!tracker.contains(&"a".to_string()));
        assert!(tracker.contains(&"b".to_string()));

        guard_b.complete(Ok(2));
        assert!(tracker.is_empty());
    }

    #[tokio::test]
    async fn test_many_waiters_share_one_outcome() {
        let tracker = tracker();
        let guard = as_leader(tracker.join("k".to_string()));

        let waiters: Vec<_> = (0..8)
            .map(|_| as_waiter(tracker.join("k".to_string())))
            .collect();

        let handles: Vec<_> = waiters
            .into_iter()
            .map(|w| tokio::spawn(w.outcome()))
            .collect();

        guard.complete(Ok(99));

        for handle in handles {
            assert_eq!(handle.await.unwrap(), Ok(99));
        }
        assert!(tracker.is_empty());
    }
}
