//! Engine configuration object
//!
//! What the shell hands to [`Engine::configure`](super::Engine::configure):
//! the playback options read from the store plus the two injection points
//! for composed transform chains, and the save-state side channel.

use crate::effects::{AudioChain, VideoChain};
use crate::store::{PlaybackOptions, SaveStateRecord};
use std::sync::Arc;

/// Invoked by the engine on every save-state capture
///
/// The canvas binding attaches a screenshot here; the shell otherwise
/// leaves the record alone.
pub type SaveStateCallback = Arc<dyn Fn(&mut SaveStateRecord) + Send + Sync>;

/// Full engine configuration installed in one pass
#[derive(Clone)]
pub struct EngineConfig {
    /// Playback options, already adjusted by the pipeline builder
    /// (vapor frame-rate coupling applied)
    pub options: PlaybackOptions,
    /// Composed audio transform, invoked once per audio buffer
    pub audio_chain: AudioChain,
    /// Composed video transform, invoked once per rendered frame
    pub video_chain: VideoChain,
    /// Save-state capture side channel
    pub save_state_callback: Option<SaveStateCallback>,
}

impl EngineConfig {
    pub fn new(options: PlaybackOptions, audio_chain: AudioChain, video_chain: VideoChain) -> Self {
        Self {
            options,
            audio_chain,
            video_chain,
            save_state_callback: None,
        }
    }

    pub fn with_save_state_callback(mut self, callback: SaveStateCallback) -> Self {
        self.save_state_callback = Some(callback);
        self
    }
}

impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("options", &self.options)
            .field("audio_chain", &self.audio_chain.stage_names())
            .field("video_chain", &self.video_chain.stage_names())
            .field("save_state_callback", &self.save_state_callback.is_some())
            .finish()
    }
}
