//! Emulation engine contract
//!
//! The engine itself is an external collaborator; this module owns only
//! the configuration surface the shell installs into it (playback options
//! plus the two transform injection points) and the readiness/playing
//! queries that gate UI affordances.

use crate::store::SaveStateRecord;
use anyhow::Result;
use async_trait::async_trait;

mod config;
mod console;

pub use config::{EngineConfig, SaveStateCallback};
pub use console::ConsoleEngine;

/// Engine trait - the emulation core the shell drives
///
/// Note: all methods take &self (not &mut self) to support Arc<dyn Engine>.
/// Implementations use interior mutability for their state.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Engine name (e.g., "console", "wasmboy")
    fn name(&self) -> &str;

    /// Install a full configuration: options plus the composed audio and
    /// video chains
    ///
    /// Called from the canvas binding on every options/effects change.
    /// Installing a new configuration replaces the previous one wholesale.
    async fn configure(&self, config: EngineConfig) -> Result<()>;

    /// Start or resume playback of the loaded ROM
    async fn play(&self) -> Result<()>;

    /// Pause playback
    async fn pause(&self) -> Result<()>;

    /// Capture a save state
    ///
    /// The engine invokes the configured save-state callback on the record
    /// before returning it, so side channels (screenshot capture) see
    /// every capture.
    async fn save_state(&self) -> Result<SaveStateRecord>;

    /// Whether a ROM is loaded and the engine can play
    fn is_ready(&self) -> bool;

    /// Whether the engine is currently playing
    fn is_playing(&self) -> bool;
}
