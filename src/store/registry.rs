//! Subscription registry - per-key subscriber bookkeeping
//!
//! Internal to the store. Tracks callbacks per key, hands out opaque
//! handles, and snapshots subscriber lists so removal during a
//! notification pass cannot skip or double-invoke remaining callbacks.

use super::types::StoreKey;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub type SubscriberFn = Arc<dyn Fn(&Value) + Send + Sync>;

/// Opaque token identifying one registered callback
///
/// A handle is only valid for the key it was issued against; the registry
/// checks the pairing so a stale or misdirected handle can never touch
/// another key's subscriber list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberHandle {
    key: StoreKey,
    id: u64,
}

impl SubscriberHandle {
    /// The key this handle was issued for
    pub fn key(&self) -> StoreKey {
        self.key
    }
}

/// Tracks active subscriber callbacks per store key
pub(crate) struct SubscriptionRegistry {
    /// Monotonic handle id source, collision-free for the process lifetime
    next_id: AtomicU64,
    /// Per-key handle-to-callback maps (BTreeMap keeps delivery order
    /// stable: subscribers are notified in registration order)
    subscribers: RwLock<HashMap<StoreKey, BTreeMap<u64, SubscriberFn>>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        let mut subscribers = HashMap::new();
        for key in StoreKey::all() {
            subscribers.insert(*key, BTreeMap::new());
        }
        Self {
            next_id: AtomicU64::new(1),
            subscribers: RwLock::new(subscribers),
        }
    }

    /// Register a callback for `key` and return its handle
    pub fn insert(&self, key: StoreKey, callback: SubscriberFn) -> SubscriberHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut subscribers = self.subscribers.write();
        if let Some(for_key) = subscribers.get_mut(&key) {
            for_key.insert(id, callback);
        }
        SubscriberHandle { key, id }
    }

    /// Remove a registration; returns whether anything was removed
    ///
    /// Unknown or already-removed handles are a no-op. A handle issued for
    /// a different key never touches `key`'s list.
    pub fn remove(&self, key: StoreKey, handle: SubscriberHandle) -> bool {
        if handle.key != key {
            return false;
        }
        let mut subscribers = self.subscribers.write();
        subscribers
            .get_mut(&key)
            .map(|for_key| for_key.remove(&handle.id).is_some())
            .unwrap_or(false)
    }

    /// Snapshot the current subscribers of `key` for one notification pass
    ///
    /// The lock is released before the snapshot is used, so callbacks are
    /// free to subscribe, unsubscribe, or set re-entrantly.
    pub fn snapshot(&self, key: StoreKey) -> Vec<SubscriberFn> {
        let subscribers = self.subscribers.read();
        subscribers
            .get(&key)
            .map(|for_key| for_key.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of active subscribers for `key`
    #[cfg(test)]
    pub fn count(&self, key: StoreKey) -> usize {
        let subscribers = self.subscribers.read();
        subscribers.get(&key).map(|m| m.len()).unwrap_or(0)
    }
}
