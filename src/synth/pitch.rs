//! Equal-tempered pitch lookup.
//!
//! Maps MIDI note numbers to fundamental frequencies using the standard
//! A440 reference: `440 * 2^((n - 69) / 12)`. The full table is computed
//! once on first use; lookups after that are a bounds check and an index.

use crate::error::RenderError;
use std::sync::LazyLock;

/// Frequencies for every valid MIDI note number, indexed by note.
static FREQUENCY_TABLE: LazyLock<[f32; 128]> = LazyLock::new(|| {
    let mut table = [0.0f32; 128];
    for (note, frequency) in table.iter_mut().enumerate() {
        *frequency = 440.0 * 2.0f32.powf((note as f32 - 69.0) / 12.0);
    }
    table
});

/// Returns the fundamental frequency in Hz for a MIDI note number.
///
/// # Errors
///
/// Returns `RenderError::InvalidNote` for note numbers above 127. An
/// out-of-range note is a data error in the score, never clamped.
pub fn frequency_of(note: u8) -> Result<f32, RenderError> {
    FREQUENCY_TABLE
        .get(note as usize)
        .copied()
        .ok_or(RenderError::InvalidNote(note))
}
