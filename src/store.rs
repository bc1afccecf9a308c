//! Shared state module - reactive key/value store for the shell
//!
//! This module provides the process-scoped store that every UI binding
//! reads from and writes to without direct references to each other.
//! Keys are fixed at startup; updates are shallow-merged and delivered
//! synchronously to the affected key's subscribers.

mod keyed;
mod registry;
mod types;

pub use keyed::KeyedStore;
pub use registry::SubscriberHandle;
pub use types::{
    ControlPanelSlice, EffectFlags, NotificationSlice, PlaybackOptions, RomCollectionSlice,
    RomEntry, SaveStateRecord, SaveStatesSlice, StoreKey,
};
