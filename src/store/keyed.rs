//! KeyedStore - shared UI state with subscribe/unsubscribe support
//!
//! The single shared mutable resource of the shell. Each key holds one JSON
//! object; `set` shallow-merges a patch into it and synchronously notifies
//! every subscriber of that key before returning. Components read with
//! `get`/`get_as` and never hold references into the store.

use super::registry::{SubscriberFn, SubscriberHandle, SubscriptionRegistry};
use super::types::{
    ControlPanelSlice, EffectFlags, NotificationSlice, PlaybackOptions, RomCollectionSlice,
    SaveStatesSlice, StoreKey,
};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{trace, warn};

/// Shallow merge: top-level fields of `patch` overwrite matching fields of
/// `current`, unspecified fields persist. A non-object patch replaces the
/// value wholesale.
fn shallow_merge(current: &mut Value, patch: Value) {
    match (current, patch) {
        (Value::Object(current), Value::Object(patch)) => {
            for (field, value) in patch {
                current.insert(field, value);
            }
        }
        (current, patch) => *current = patch,
    }
}

/// Default object seeded for each key at store construction
fn default_slice(key: StoreKey) -> Value {
    let result = match key {
        StoreKey::RomCollection => serde_json::to_value(RomCollectionSlice::default()),
        StoreKey::SaveStates => serde_json::to_value(SaveStatesSlice::default()),
        StoreKey::ControlPanel => serde_json::to_value(ControlPanelSlice::default()),
        StoreKey::Options => serde_json::to_value(PlaybackOptions::default()),
        StoreKey::Effects => serde_json::to_value(EffectFlags::default()),
        StoreKey::Notification => serde_json::to_value(NotificationSlice::default()),
    };
    result.unwrap_or_else(|_| Value::Object(Map::new()))
}

/// Process-scoped key/value state container with subscription support
///
/// All keys exist from construction with their default slice values and
/// live for the lifetime of the store. Subscribers come and go with the
/// components that own them.
pub struct KeyedStore {
    /// State storage per key
    slices: RwLock<HashMap<StoreKey, Value>>,
    /// Subscriber bookkeeping
    registry: SubscriptionRegistry,
}

impl KeyedStore {
    /// Create a store with every key seeded to its default slice
    pub fn new() -> Self {
        let mut slices = HashMap::new();
        for key in StoreKey::all() {
            slices.insert(*key, default_slice(*key));
        }
        Self {
            slices: RwLock::new(slices),
            registry: SubscriptionRegistry::new(),
        }
    }

    /// Current value for `key`
    ///
    /// Never blocks on subscriber activity and never fails; a key that was
    /// never written returns its seeded default.
    pub fn get(&self, key: StoreKey) -> Value {
        let slices = self.slices.read();
        slices.get(&key).cloned().unwrap_or_else(|| default_slice(key))
    }

    /// Current value for `key`, deserialized into its typed slice
    ///
    /// Falls back to the slice default if the stored object no longer
    /// matches the type (a producer wrote an incompatible patch).
    pub fn get_as<T: DeserializeOwned + Default>(&self, key: StoreKey) -> T {
        serde_json::from_value(self.get(key)).unwrap_or_else(|e| {
            warn!("store slice {} failed to deserialize: {}", key, e);
            T::default()
        })
    }

    /// Merge `patch` into `key` and synchronously notify its subscribers
    ///
    /// The merge completes and every subscriber registered on `key` at the
    /// moment of the call observes the merged value before `set` returns.
    /// No lock is held while callbacks run, so a callback may subscribe,
    /// unsubscribe, or `set` again; a nested `set` completes its own
    /// notification pass before control returns to the outer one.
    pub fn set(&self, key: StoreKey, patch: Value) {
        let merged = {
            let mut slices = self.slices.write();
            let slice = slices.entry(key).or_insert_with(|| default_slice(key));
            shallow_merge(slice, patch);
            slice.clone()
        };

        let subscribers = self.registry.snapshot(key);
        trace!(
            "store set {} -> notifying {} subscriber(s)",
            key,
            subscribers.len()
        );
        for subscriber in subscribers {
            subscriber(&merged);
        }
    }

    /// Serialize a typed slice and merge it as a patch for `key`
    pub fn set_slice<T: Serialize>(&self, key: StoreKey, slice: &T) {
        match serde_json::to_value(slice) {
            Ok(patch) => self.set(key, patch),
            Err(e) => warn!("store slice {} failed to serialize: {}", key, e),
        }
    }

    /// Register a callback invoked with the full value of `key` on every
    /// subsequent `set`
    ///
    /// The callback is not invoked for the current value; callers read the
    /// initial value with `get` themselves. Subscribing is for future
    /// changes only.
    pub fn subscribe<F>(&self, key: StoreKey, callback: F) -> SubscriberHandle
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.registry.insert(key, Arc::new(callback) as SubscriberFn)
    }

    /// Remove a registration
    ///
    /// Unknown, stale, or wrong-key handles are swallowed silently; this is
    /// an expected race with component teardown.
    pub fn unsubscribe(&self, key: StoreKey, handle: SubscriberHandle) {
        if !self.registry.remove(key, handle) {
            trace!("store unsubscribe {}: stale handle ignored", key);
        }
    }
}

impl Default for KeyedStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[test]
    fn test_get_before_set_returns_default() {
        let store = KeyedStore::new();
        let options: PlaybackOptions = store.get_as(StoreKey::Options);
        assert_eq!(options, PlaybackOptions::default());
        // No bleed between keys
        let effects = store.get(StoreKey::Effects);
        assert!(effects.get("frameRate").is_none());
    }

    #[test]
    fn test_set_shallow_merges() {
        let store = KeyedStore::new();
        store.set(StoreKey::Options, json!({ "frameRate": 120 }));
        store.set(StoreKey::Options, json!({ "frameSkip": 2 }));

        let options: PlaybackOptions = store.get_as(StoreKey::Options);
        assert_eq!(options.frame_rate, 120);
        assert_eq!(options.frame_skip, 2);
        // Fields untouched by either patch keep their defaults
        assert!(!options.audio_batch_processing);
    }

    #[test]
    fn test_subscriber_observes_each_merged_value() {
        let store = KeyedStore::new();
        let seen: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        store.subscribe(StoreKey::Options, move |value| {
            seen_clone.lock().unwrap().push(value.clone());
        });

        store.set(StoreKey::Options, json!({ "frameRate": 100 }));
        store.set(StoreKey::Options, json!({ "frameSkip": 1 }));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0]["frameRate"], json!(100));
        assert_eq!(seen[1]["frameRate"], json!(100));
        assert_eq!(seen[1]["frameSkip"], json!(1));
    }

    #[test]
    fn test_subscribe_does_not_fire_immediately() {
        let store = KeyedStore::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();

        store.subscribe(StoreKey::Effects, move |_value| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        store.set(StoreKey::Effects, json!({ "vapor": true }));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_notification_scoped_to_key() {
        let store = KeyedStore::new();
        let options_hits = Arc::new(AtomicUsize::new(0));
        let effects_hits = Arc::new(AtomicUsize::new(0));

        let hits = options_hits.clone();
        store.subscribe(StoreKey::Options, move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        });
        let hits = effects_hits.clone();
        store.subscribe(StoreKey::Effects, move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        });

        store.set(StoreKey::Options, json!({ "frameRate": 30 }));
        assert_eq!(options_hits.load(Ordering::SeqCst), 1);
        assert_eq!(effects_hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unsubscribe_stops_future_delivery() {
        let store = KeyedStore::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();

        let handle = store.subscribe(StoreKey::SaveStates, move |_value| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        store.set(StoreKey::SaveStates, json!({ "saveStates": [] }));
        store.unsubscribe(StoreKey::SaveStates, handle);
        store.set(StoreKey::SaveStates, json!({ "saveStates": [] }));

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_stale_handle_is_silent() {
        let store = KeyedStore::new();
        let handle = store.subscribe(StoreKey::Options, |_value| {});
        store.unsubscribe(StoreKey::Options, handle);
        // Double unsubscribe and wrong-key unsubscribe are both swallowed
        store.unsubscribe(StoreKey::Options, handle);
        store.unsubscribe(StoreKey::Effects, handle);
    }

    #[test]
    fn test_unsubscribe_during_notification_pass() {
        let store = Arc::new(KeyedStore::new());
        let first_hits = Arc::new(AtomicUsize::new(0));
        let second_hits = Arc::new(AtomicUsize::new(0));

        // First subscriber unsubscribes itself while being notified
        let handle_slot: Arc<Mutex<Option<SubscriberHandle>>> = Arc::new(Mutex::new(None));
        let slot = handle_slot.clone();
        let store_clone = store.clone();
        let hits = first_hits.clone();
        let handle = store.subscribe(StoreKey::Options, move |_value| {
            hits.fetch_add(1, Ordering::SeqCst);
            if let Some(own) = slot.lock().unwrap().take() {
                store_clone.unsubscribe(StoreKey::Options, own);
            }
        });
        *handle_slot.lock().unwrap() = Some(handle);

        let hits = second_hits.clone();
        store.subscribe(StoreKey::Options, move |_value| {
            hits.fetch_add(1, Ordering::SeqCst);
        });

        store.set(StoreKey::Options, json!({ "frameRate": 45 }));
        // Removal mid-pass must not skip the still-registered subscriber
        assert_eq!(first_hits.load(Ordering::SeqCst), 1);
        assert_eq!(second_hits.load(Ordering::SeqCst), 1);

        store.set(StoreKey::Options, json!({ "frameRate": 50 }));
        // The removed handle receives nothing further
        assert_eq!(first_hits.load(Ordering::SeqCst), 1);
        assert_eq!(second_hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_reentrant_set_from_subscriber() {
        let store = Arc::new(KeyedStore::new());
        let notification_hits = Arc::new(AtomicUsize::new(0));

        // Reacting to an effects change by writing the notification slice,
        // the way a binding posts user-visible feedback
        let store_clone = store.clone();
        store.subscribe(StoreKey::Effects, move |value| {
            let message = if value["vapor"] == json!(true) {
                "vapor on"
            } else {
                "vapor off"
            };
            store_clone.set(StoreKey::Notification, json!({ "message": message }));
        });

        let hits = notification_hits.clone();
        store.subscribe(StoreKey::Notification, move |_value| {
            hits.fetch_add(1, Ordering::SeqCst);
        });

        store.set(StoreKey::Effects, json!({ "vapor": true }));
        assert_eq!(notification_hits.load(Ordering::SeqCst), 1);
        let notification: NotificationSlice = store.get_as(StoreKey::Notification);
        assert_eq!(notification.message, "vapor on");
    }

    #[test]
    fn test_full_replace_with_non_object_patch() {
        let store = KeyedStore::new();
        store.set(StoreKey::Notification, json!({ "message": "hello" }));
        store.set(StoreKey::Notification, json!(null));
        // Wholesale replacement is the caller's explicit choice
        assert_eq!(store.get(StoreKey::Notification), json!(null));
        // Typed read degrades to the default slice
        let slice: NotificationSlice = store.get_as(StoreKey::Notification);
        assert_eq!(slice.message, "");
    }
}
