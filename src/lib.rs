//! VaporBoy shell - reactive state and effect pipeline for an emulator
//! front-end
//!
//! The shell sits between independent UI components and the emulation
//! engine. Components share state through a keyed publish/subscribe store;
//! one binding owns the engine configuration hook and rebuilds the
//! audio/video effect chains whenever the relevant state changes.

pub mod cli;
pub mod components;
pub mod config;
pub mod effects;
pub mod engine;
pub mod error;
pub mod notifications;
pub mod store;
