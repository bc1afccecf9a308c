//! Console engine - logs all engine calls for testing and development
//!
//! Stands in for the real emulation core. Useful for:
//! - Exercising bindings without the emulator present
//! - Debugging configuration passes
//! - Development without a ROM

use super::config::EngineConfig;
use super::Engine;
use crate::store::SaveStateRecord;
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// ConsoleEngine logs all engine interactions
pub struct ConsoleEngine {
    name: String,
    ready: AtomicBool,
    playing: AtomicBool,
    /// Next save slot to hand out
    next_slot: AtomicU32,
    /// Last installed configuration, kept for inspection
    last_config: RwLock<Option<EngineConfig>>,
    /// Configuration passes seen, for debugging and tests
    configure_count: AtomicU32,
}

impl ConsoleEngine {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ready: AtomicBool::new(false),
            playing: AtomicBool::new(false),
            next_slot: AtomicU32::new(0),
            last_config: RwLock::new(None),
            configure_count: AtomicU32::new(0),
        }
    }

    /// Simulate inserting a cartridge: the engine becomes ready
    pub fn load_rom(&self, title: &str) {
        info!("🎮 ConsoleEngine '{}' loaded ROM '{}'", self.name, title);
        self.ready.store(true, Ordering::SeqCst);
    }

    /// Number of configuration passes installed so far
    pub fn configure_count(&self) -> u32 {
        self.configure_count.load(Ordering::SeqCst)
    }

    /// Stage names of the last installed configuration
    pub async fn last_chain_names(&self) -> Option<(Vec<&'static str>, Vec<&'static str>)> {
        let config = self.last_config.read().await;
        config
            .as_ref()
            .map(|c| (c.audio_chain.stage_names(), c.video_chain.stage_names()))
    }

    /// Frame rate of the last installed configuration
    pub async fn last_frame_rate(&self) -> Option<u32> {
        let config = self.last_config.read().await;
        config.as_ref().map(|c| c.options.frame_rate)
    }
}

#[async_trait]
impl Engine for ConsoleEngine {
    fn name(&self) -> &str {
        &self.name
    }

    async fn configure(&self, config: EngineConfig) -> Result<()> {
        info!(
            "🔧 ConsoleEngine '{}' configured: {:?}",
            self.name, config
        );
        *self.last_config.write().await = Some(config);
        self.configure_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn play(&self) -> Result<()> {
        if !self.is_ready() {
            bail!("cannot play: no ROM loaded");
        }
        self.playing.store(true, Ordering::SeqCst);
        info!("▶️ ConsoleEngine '{}' playing", self.name);
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        if !self.is_ready() {
            bail!("cannot pause: no ROM loaded");
        }
        self.playing.store(false, Ordering::SeqCst);
        info!("⏸️ ConsoleEngine '{}' paused", self.name);
        Ok(())
    }

    async fn save_state(&self) -> Result<SaveStateRecord> {
        if !self.is_ready() {
            bail!("cannot save state: no ROM loaded");
        }
        let mut record = SaveStateRecord {
            slot: self.next_slot.fetch_add(1, Ordering::SeqCst),
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0),
            screenshot: None,
        };
        let config = self.last_config.read().await;
        if let Some(callback) = config.as_ref().and_then(|c| c.save_state_callback.as_ref()) {
            callback(&mut record);
        }
        debug!(
            "💾 ConsoleEngine '{}' captured save state slot {}",
            self.name, record.slot
        );
        Ok(record)
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
}
