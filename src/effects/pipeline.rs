//! Effect pipeline builder
//!
//! Turns the current effect flag set into one audio chain and one video
//! chain, rebuilt from scratch on every call. Stage order is declared
//! here, once, per domain; which subset of flags is enabled only decides
//! which of those stages appear, never their order.

use super::chain::{AudioChain, AudioTransform, FrameBuffer, Stage, VideoChain, VideoTransform};
use crate::store::PlaybackOptions;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Effect names, as they appear in the effects store slice
pub mod effect {
    pub const VAPOR: &str = "vapor";
    pub const BASS_BOOST: &str = "bassBoost";
    pub const RAINBOW: &str = "rainbow";
    pub const INVERTED: &str = "inverted";
    pub const MONOCHROME: &str = "monochrome";
    pub const CRT: &str = "crt";
}

/// Vapor mode slows the emulation core down by this factor
pub const VAPOR_FRAME_RATE_FACTOR: f64 = 0.875;

/// The opaque transforms backing each effect, supplied by the engine
/// collaborator
///
/// The shell composes these; it never implements the DSP itself. `crt`
/// has no transform because it is consumed by rendering, not by the
/// pipeline.
#[derive(Clone)]
pub struct TransformSet {
    pub vapor_audio: AudioTransform,
    pub bass_boost: AudioTransform,
    pub vapor_video: VideoTransform,
    pub rainbow: VideoTransform,
    pub inverted: VideoTransform,
    pub monochrome: VideoTransform,
}

impl TransformSet {
    /// A set of do-nothing transforms, for tests and the console engine
    pub fn passthrough() -> Self {
        Self {
            vapor_audio: Arc::new(|_samples: &mut [f32]| {}),
            bass_boost: Arc::new(|_samples: &mut [f32]| {}),
            vapor_video: Arc::new(|_frame: &mut FrameBuffer| {}),
            rainbow: Arc::new(|_frame: &mut FrameBuffer| {}),
            inverted: Arc::new(|_frame: &mut FrameBuffer| {}),
            monochrome: Arc::new(|_frame: &mut FrameBuffer| {}),
        }
    }
}

/// Builds composed audio/video chains from the current effect flags
///
/// Holds the declared stage tables; adding an effect means appending one
/// entry to the relevant table (and a transform to [`TransformSet`]).
pub struct PipelineBuilder {
    transforms: TransformSet,
}

impl PipelineBuilder {
    pub fn new(transforms: TransformSet) -> Self {
        Self { transforms }
    }

    /// Audio priority order: vapor, then bassBoost
    fn audio_stage_table(&self) -> [(&'static str, &AudioTransform); 2] {
        [
            (effect::VAPOR, &self.transforms.vapor_audio),
            (effect::BASS_BOOST, &self.transforms.bass_boost),
        ]
    }

    /// Video priority order: vapor, rainbow, inverted, monochrome
    fn video_stage_table(&self) -> [(&'static str, &VideoTransform); 4] {
        [
            (effect::VAPOR, &self.transforms.vapor_video),
            (effect::RAINBOW, &self.transforms.rainbow),
            (effect::INVERTED, &self.transforms.inverted),
            (effect::MONOCHROME, &self.transforms.monochrome),
        ]
    }

    /// Every effect name this builder understands
    pub fn known_effects() -> &'static [&'static str] {
        &[
            effect::VAPOR,
            effect::BASS_BOOST,
            effect::RAINBOW,
            effect::INVERTED,
            effect::MONOCHROME,
            effect::CRT,
        ]
    }

    /// Build fresh chains for the given flag set
    ///
    /// `flags` is the raw effects slice from the store; names not in the
    /// declared tables are ignored. When vapor is enabled the target frame
    /// rate in `options` is multiplied by [`VAPOR_FRAME_RATE_FACTOR`]
    /// (floored), exactly once per call. Callers pass a fresh copy of the
    /// options read from the store for each configuration pass, so the
    /// multiplier never compounds across rebuilds.
    pub fn build(&self, flags: &Value, options: &mut PlaybackOptions) -> (AudioChain, VideoChain) {
        let enabled =
            |name: &str| flags.get(name).and_then(Value::as_bool).unwrap_or(false);

        if enabled(effect::VAPOR) {
            options.frame_rate =
                (f64::from(options.frame_rate) * VAPOR_FRAME_RATE_FACTOR).floor() as u32;
        }

        let audio_stages: Vec<Stage<AudioTransform>> = self
            .audio_stage_table()
            .into_iter()
            .filter(|(name, _)| enabled(name))
            .map(|(name, transform)| Stage {
                name,
                transform: transform.clone(),
            })
            .collect();

        let video_stages: Vec<Stage<VideoTransform>> = self
            .video_stage_table()
            .into_iter()
            .filter(|(name, _)| enabled(name))
            .map(|(name, transform)| Stage {
                name,
                transform: transform.clone(),
            })
            .collect();

        let audio = AudioChain::from_stages(audio_stages);
        let video = VideoChain::from_stages(video_stages);
        debug!(
            "pipeline rebuilt: audio={:?} video={:?} frame_rate={}",
            audio.stage_names(),
            video.stage_names(),
            options.frame_rate
        );
        (audio, video)
    }
}
