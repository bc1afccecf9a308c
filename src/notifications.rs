//! User-visible notification channel
//!
//! Bindings post messages by patching the notification store slice; the
//! toast widget subscribes to that slice and renders whatever lands there.

use crate::store::{KeyedStore, StoreKey};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Default toast lifetime
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

/// Notification message catalog
pub mod messages {
    pub const SAVE_STATE: &str = "State Saved! 💾";
    pub const ERROR_SAVE_STATE: &str = "Error Saving State... 😞";
    pub const ERROR_RESUME_ROM: &str = "However, there was an error resuming the ROM... 😞";
    pub const RESUME_ROM: &str = "Resumed ROM! ▶️";
    pub const PAUSE_ROM: &str = "Paused ROM. ⏸️";
}

/// Posts messages to the notification slice
#[derive(Clone)]
pub struct Notifier {
    store: Arc<KeyedStore>,
}

impl Notifier {
    pub fn new(store: Arc<KeyedStore>) -> Self {
        Self { store }
    }

    /// Show a message with the default timeout
    pub fn show(&self, message: &str) {
        debug!("notification: {}", message);
        self.store.set(
            StoreKey::Notification,
            json!({ "message": message, "timeoutMs": DEFAULT_TIMEOUT_MS }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NotificationSlice;

    #[test]
    fn test_show_patches_notification_slice() {
        let store = Arc::new(KeyedStore::new());
        let notifier = Notifier::new(store.clone());
        notifier.show(messages::PAUSE_ROM);

        let slice: NotificationSlice = store.get_as(StoreKey::Notification);
        assert_eq!(slice.message, messages::PAUSE_ROM);
        assert_eq!(slice.timeout_ms, DEFAULT_TIMEOUT_MS);
    }
}
