//! Effect composition module - dynamic audio/video pipeline
//!
//! Composes the enabled effect transforms into per-buffer audio and
//! per-frame video chains, in a fixed priority order, rebuilt on every
//! effects or options change.

mod chain;
mod pipeline;

pub use chain::{AudioChain, AudioTransform, FrameBuffer, Stage, VideoChain, VideoTransform};
pub use pipeline::{effect, PipelineBuilder, TransformSet, VAPOR_FRAME_RATE_FACTOR};
