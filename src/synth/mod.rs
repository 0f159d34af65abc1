//! Plucked-string synthesis.
//!
//! This module turns note numbers into audio: a precomputed pitch table
//! maps MIDI notes to frequencies, the Karplus-Strong synthesizer turns a
//! (frequency, envelope) pair into a waveform, and the note renderer
//! applies per-event velocity. Both synthesis stages memoize their output
//! in bounded LRU caches owned by the component instance.

mod cache;
mod pitch;
mod renderer;
mod string;

pub use cache::LruCache;
pub use pitch::frequency_of;
pub use renderer::NoteRenderer;
pub use string::{pluck, StringSynth, SYNTH_CACHE_CAPACITY};
