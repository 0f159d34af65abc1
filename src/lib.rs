//! midipluck - renders Standard MIDI Files to plucked-string audio.
//!
//! The library is an offline synthesis pipeline built around the
//! Karplus-Strong algorithm: a parsed score's note events are synthesized
//! as decaying plucked strings, placed on an absolute timeline, mixed by
//! linear superposition, and peak-normalized into a single mono buffer
//! ready for WAV output.

pub mod error;
pub mod midi;
pub mod pipeline;
pub mod synth;
pub mod wav;

// Re-export the types that make up the public pipeline surface.
pub use error::RenderError;
pub use midi::{load_score, Score, ScoreError, TrackEvent};
pub use pipeline::{mix, render_score, RenderConfig, RenderedEvent};
pub use synth::{frequency_of, NoteRenderer, StringSynth};
pub use wav::write_wav;
