//! Store key and state slice type definitions
//!
//! Defines the fixed set of store keys and the typed shape of each key's
//! state slice. The store itself holds untyped JSON objects; these structs
//! are the contract between each slice's producers and consumers.

use serde::{Deserialize, Serialize};

/// Logical state slice tracked by the [`KeyedStore`](super::KeyedStore)
///
/// The key set is fixed at startup; no dynamic key creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreKey {
    /// ROM library shown by the ROM source selector
    RomCollection,
    /// Captured save states (with screenshot side channel)
    SaveStates,
    /// Control panel visibility and view stack
    ControlPanel,
    /// Playback options fed to the emulation engine
    Options,
    /// Audio/video effect toggles
    Effects,
    /// User-visible notification channel
    Notification,
}

impl StoreKey {
    /// All store keys, in seeding order
    pub fn all() -> &'static [StoreKey] {
        &[
            StoreKey::RomCollection,
            StoreKey::SaveStates,
            StoreKey::ControlPanel,
            StoreKey::Options,
            StoreKey::Effects,
            StoreKey::Notification,
        ]
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "rom-collection" => Some(StoreKey::RomCollection),
            "save-states" => Some(StoreKey::SaveStates),
            "control-panel" => Some(StoreKey::ControlPanel),
            "options" => Some(StoreKey::Options),
            "effects" => Some(StoreKey::Effects),
            "notification" => Some(StoreKey::Notification),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::RomCollection => "rom-collection",
            StoreKey::SaveStates => "save-states",
            StoreKey::ControlPanel => "control-panel",
            StoreKey::Options => "options",
            StoreKey::Effects => "effects",
            StoreKey::Notification => "notification",
        }
    }
}

impl std::fmt::Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Playback options installed into the emulation engine
///
/// Field names serialize in camelCase to stay wire-compatible with the
/// engine configuration object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaybackOptions {
    /// Target frames per second for the emulation core
    pub frame_rate: u32,
    /// Frames to skip between rendered frames
    pub frame_skip: u32,
    /// Batch audio processing between output callbacks
    pub audio_batch_processing: bool,
    /// Accumulate audio samples instead of emitting per-step
    pub audio_accumulate_samples: bool,
    /// Batch timer updates
    pub timers_batch_processing: bool,
    /// Batch graphics processing per scanline group
    pub graphics_batch_processing: bool,
    /// Skip per-scanline rendering work
    pub graphics_disable_scanline_rendering: bool,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            frame_skip: 0,
            audio_batch_processing: false,
            audio_accumulate_samples: false,
            timers_batch_processing: false,
            graphics_batch_processing: false,
            graphics_disable_scanline_rendering: false,
        }
    }
}

/// Effect toggles for the audio/video pipeline
///
/// `crt` is presentational only; it never becomes a pipeline stage.
/// Serialized names match the effect names the pipeline builder declares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EffectFlags {
    pub vapor: bool,
    pub bass_boost: bool,
    pub rainbow: bool,
    pub inverted: bool,
    pub monochrome: bool,
    pub crt: bool,
}

/// One ROM known to the collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RomEntry {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// ROM collection slice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RomCollectionSlice {
    pub roms: Vec<RomEntry>,
}

/// One captured save state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveStateRecord {
    /// Save slot index
    pub slot: u32,
    /// Capture time (milliseconds since epoch)
    pub timestamp_ms: u64,
    /// Screenshot data URL attached by the canvas side channel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
}

/// Save states slice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveStatesSlice {
    pub save_states: Vec<SaveStateRecord>,
}

/// Control panel slice: visibility plus the stack of pushed views
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControlPanelSlice {
    pub visible: bool,
    /// Titles of the views pushed onto the panel, root first
    pub view_stack: Vec<String>,
}

/// Notification channel slice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationSlice {
    pub message: String,
    pub timeout_ms: u64,
}
