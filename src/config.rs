//! Configuration management for the shell
//!
//! Loads startup defaults (playback options, effect toggles, ROM seeds)
//! from a YAML file and seeds the store with them. The store keys exist
//! either way; the file only changes their initial values.

use crate::store::{
    EffectFlags, KeyedStore, PlaybackOptions, RomCollectionSlice, RomEntry, StoreKey,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Initial playback options
    pub options: PlaybackOptions,
    /// Initial effect toggles
    pub effects: EffectFlags,
    /// ROMs preloaded into the collection
    pub rom_collection: Vec<RomEntry>,
}

impl ShellConfig {
    /// Write this configuration's defaults into the store slices
    pub fn seed_store(&self, store: &KeyedStore) {
        store.set_slice(StoreKey::Options, &self.options);
        store.set_slice(StoreKey::Effects, &self.effects);
        store.set_slice(
            StoreKey::RomCollection,
            &RomCollectionSlice {
                roms: self.rom_collection.clone(),
            },
        );
    }
}

/// Load configuration from a YAML file
///
/// A missing file is not an error: the shell starts with defaults.
pub async fn load_config(path: impl AsRef<Path>) -> Result<ShellConfig> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(
            "Configuration file {} not found, using defaults",
            path.display()
        );
        return Ok(ShellConfig::default());
    }

    let contents = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: ShellConfig = serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    info!("Configuration loaded from {}", path.display());
    Ok(config)
}
