//! Canvas binding - owns the live engine configuration hook
//!
//! The one binding that rebuilds the effect pipeline: it subscribes to
//! the options and effects keys and, on any change to either, re-reads
//! the store, builds fresh chains, and installs them into the engine.
//! It also decides the presentational CSS classes for the canvas element
//! (the `crt` flag lives there, not in the pipeline).

use super::ComponentBinding;
use crate::effects::{PipelineBuilder, TransformSet};
use crate::engine::{Engine, EngineConfig};
use crate::store::{EffectFlags, KeyedStore, PlaybackOptions, StoreKey, SubscriberHandle};
use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Produces the screenshot payload attached to save-state captures
pub type ScreenshotSource = Arc<dyn Fn() -> String + Send + Sync>;

/// Binding between the canvas component and the emulation engine
pub struct CanvasBinding {
    store: Arc<KeyedStore>,
    engine: Arc<dyn Engine>,
    builder: PipelineBuilder,
    /// Handles acquired on activation, released on deactivation
    handles: Mutex<Vec<SubscriberHandle>>,
    active: AtomicBool,
    /// Screenshot side channel for save states (the canvas snapshot)
    screenshot_source: Mutex<Option<ScreenshotSource>>,
    /// Chain lengths of the last configuration this binding installed
    /// while active. UI-only state: guarded by the liveness check, never
    /// written by a reconfigure that outlived its binding.
    last_installed: Mutex<Option<(usize, usize)>>,
}

impl CanvasBinding {
    pub fn new(
        store: Arc<KeyedStore>,
        engine: Arc<dyn Engine>,
        transforms: TransformSet,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            engine,
            builder: PipelineBuilder::new(transforms),
            handles: Mutex::new(Vec::new()),
            active: AtomicBool::new(false),
            screenshot_source: Mutex::new(None),
            last_installed: Mutex::new(None),
        })
    }

    /// Attach the screenshot side channel
    pub fn set_screenshot_source(&self, source: ScreenshotSource) {
        *self.screenshot_source.lock() = Some(source);
    }

    /// Chain lengths (audio, video) of the last installed configuration
    pub fn last_installed(&self) -> Option<(usize, usize)> {
        *self.last_installed.lock()
    }

    /// CSS classes for the canvas element, derived from current flags
    pub fn canvas_classes(&self) -> Vec<String> {
        let flags: EffectFlags = self.store.get_as(StoreKey::Effects);
        let mut classes = vec!["wasmboy-canvas".to_string()];
        if flags.crt {
            classes.push("aesthetic-effect-crt".to_string());
        }
        classes
    }

    /// Rebuild both chains from current store state and install them
    ///
    /// Always re-reads the store on entry: state may have changed between
    /// the notification that scheduled this pass and the moment it runs,
    /// and again across the engine suspension. The configuration pass runs
    /// to completion even if the binding deactivates mid-flight; only the
    /// binding's own bookkeeping is gated on liveness.
    pub async fn reconfigure(&self) -> Result<()> {
        let mut options: PlaybackOptions = self.store.get_as(StoreKey::Options);
        let flags = self.store.get(StoreKey::Effects);
        let (audio_chain, video_chain) = self.builder.build(&flags, &mut options);
        let summary = (audio_chain.len(), video_chain.len());

        let mut config = EngineConfig::new(options, audio_chain, video_chain);
        if let Some(source) = self.screenshot_source.lock().clone() {
            config = config.with_save_state_callback(Arc::new(
                move |record: &mut crate::store::SaveStateRecord| {
                    record.screenshot = Some(source());
                },
            ));
        }

        self.engine
            .configure(config)
            .await
            .context("installing engine configuration")?;

        if self.active.load(Ordering::SeqCst) {
            *self.last_installed.lock() = Some(summary);
        } else {
            debug!("canvas reconfigure completed after deactivation");
        }
        Ok(())
    }

    fn spawn_reconfigure(self: Arc<Self>) {
        tokio::spawn(async move {
            if let Err(e) = self.reconfigure().await {
                warn!("canvas reconfigure failed: {}", e);
            }
        });
    }
}

impl ComponentBinding for CanvasBinding {
    fn name(&self) -> &str {
        "canvas"
    }

    fn activate(self: Arc<Self>) {
        self.active.store(true, Ordering::SeqCst);

        let mut handles = Vec::new();
        for key in [StoreKey::Options, StoreKey::Effects] {
            let weak = Arc::downgrade(&self);
            handles.push(self.store.subscribe(key, move |_value| {
                // The value is re-read inside the reconfigure pass; only
                // the wake-up matters here
                if let Some(binding) = weak.upgrade() {
                    binding.spawn_reconfigure();
                }
            }));
        }
        self.handles.lock().extend(handles);

        // Mirror mount behavior: configure a fresh engine, re-attach and
        // resume one that is already mid-session
        if !self.engine.is_ready() {
            self.clone().spawn_reconfigure();
        } else if self.engine.is_playing() {
            let engine = self.engine.clone();
            tokio::spawn(async move {
                if let Err(e) = engine.play().await {
                    warn!("resume after remount failed: {}", e);
                }
            });
        }
    }

    fn deactivate(&self) {
        self.active.store(false, Ordering::SeqCst);
        let handles: Vec<SubscriberHandle> = self.handles.lock().drain(..).collect();
        for handle in handles {
            self.store.unsubscribe(handle.key(), handle);
        }
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}
