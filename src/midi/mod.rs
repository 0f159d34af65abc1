//! Score representation at the MIDI boundary.
//!
//! The importer reduces a Standard MIDI File to the minimum the synthesis
//! pipeline needs: a timing resolution, one tempo, and per-track event
//! lists that preserve delta times. Everything the pipeline ignores
//! (note-offs, controllers, meta events) is folded into `EventKind::Other`
//! so its delta time still advances the clock during scheduling.

mod import;

pub use import::{load_score, parse_score, ScoreError};

/// Tempo assumed when a file carries no `set_tempo` event.
pub const DEFAULT_BPM: f64 = 120.0;

/// What a track event means to the synthesis pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A note starts sounding. Velocity 0 is the conventional note-off
    /// encoding and produces no sound.
    NoteOn { note: u8, velocity: u8 },
    /// Any other message; only its delta time matters.
    Other,
}

/// One event in a track, with the delta time to the following event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackEvent {
    pub kind: EventKind,
    pub delta_ticks: u32,
}

impl TrackEvent {
    /// A note-on event.
    pub fn note_on(note: u8, velocity: u8, delta_ticks: u32) -> Self {
        Self {
            kind: EventKind::NoteOn { note, velocity },
            delta_ticks,
        }
    }

    /// An event that only advances time.
    pub fn other(delta_ticks: u32) -> Self {
        Self {
            kind: EventKind::Other,
            delta_ticks,
        }
    }
}

/// A parsed score: timing constants plus per-track event lists.
///
/// Tracks are independent timelines; each starts at time zero and they are
/// reconciled against the shared tempo-derived clock only when mixed.
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    /// Ticks per quarter note from the file header.
    pub ticks_per_beat: u32,
    /// Tempo in beats per minute.
    pub bpm: f64,
    /// Event lists, one per MIDI track, in file order.
    pub tracks: Vec<Vec<TrackEvent>>,
}

impl Score {
    /// Total number of events across all tracks.
    pub fn event_count(&self) -> usize {
        self.tracks.iter().map(Vec::len).sum()
    }
}

/// Converts a MIDI tempo value (microseconds per quarter note) to BPM.
pub fn bpm_from_micros(microseconds_per_beat: u32) -> f64 {
    60_000_000.0 / microseconds_per_beat as f64
}
