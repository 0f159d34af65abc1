//! Error types for the synthesis pipeline.
//!
//! Validation failures deep inside the pipeline (an out-of-range note, a
//! broken timing setup) propagate unchanged through the renderer and
//! scheduler up to the orchestrator, which aborts the whole conversion.
//! None of these conditions are retryable: they indicate bad input data,
//! not transient failures.

use thiserror::Error;

/// Errors raised while rendering a score into audio.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Note number outside the MIDI range 0-127.
    #[error("invalid note number {0}: must be 0-127")]
    InvalidNote(u8),

    /// The score's timing constants cannot produce a tick duration.
    #[error("invalid timing: {0}")]
    InvalidTiming(String),
}
