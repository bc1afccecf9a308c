//! Composed audio and video transform chains
//!
//! A chain is an ordered sequence of named stages built fresh by the
//! pipeline builder. Stages are opaque transforms supplied by the engine
//! collaborator; the shell only sequences them. Disabled effects
//! contribute no stage, so the per-frame path walks exactly the enabled
//! transforms and nothing else.

use std::sync::Arc;

/// In-place transform over one interleaved audio buffer
pub type AudioTransform = Arc<dyn Fn(&mut [f32]) + Send + Sync>;

/// In-place transform over one rendered frame
pub type VideoTransform = Arc<dyn Fn(&mut FrameBuffer) + Send + Sync>;

/// One rendered frame, RGBA bytes row-major
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height * 4],
        }
    }
}

/// One named stage in a chain
#[derive(Clone)]
pub struct Stage<T> {
    pub name: &'static str,
    pub transform: T,
}

/// Ordered audio stages, applied per audio buffer
#[derive(Clone, Default)]
pub struct AudioChain {
    stages: Vec<Stage<AudioTransform>>,
}

impl AudioChain {
    pub(crate) fn from_stages(stages: Vec<Stage<AudioTransform>>) -> Self {
        Self { stages }
    }

    /// Run every stage over `samples`, in chain order
    pub fn process(&self, samples: &mut [f32]) {
        for stage in &self.stages {
            (stage.transform)(samples);
        }
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage names in application order
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name).collect()
    }
}

/// Ordered video stages, applied per rendered frame
#[derive(Clone, Default)]
pub struct VideoChain {
    stages: Vec<Stage<VideoTransform>>,
}

impl VideoChain {
    pub(crate) fn from_stages(stages: Vec<Stage<VideoTransform>>) -> Self {
        Self { stages }
    }

    /// Run every stage over `frame`, each consuming the previous stage's
    /// output
    pub fn apply(&self, frame: &mut FrameBuffer) {
        for stage in &self.stages {
            (stage.transform)(frame);
        }
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage names in application order
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name).collect()
    }
}
