//! Shell error taxonomy
//!
//! None of these are fatal to the process: readiness errors are prevented
//! by gating in the UI, and the async failures are surfaced through the
//! notification channel with remediation-specific messages.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    /// Operation requires an active emulation session
    #[error("emulation engine is not ready")]
    EngineNotReady,

    /// Save-state capture failed
    #[error("failed to capture save state: {0}")]
    SaveState(String),

    /// State was saved but playback did not resume
    #[error("save state captured but resuming the ROM failed: {0}")]
    Resume(String),

    /// Pause request failed
    #[error("failed to pause the ROM: {0}")]
    Pause(String),
}
