//! Per-note rendering: pitch lookup, synthesis, and velocity scaling.

use crate::error::RenderError;
use crate::synth::cache::LruCache;
use crate::synth::pitch::frequency_of;
use crate::synth::string::{StringSynth, SYNTH_CACHE_CAPACITY};
use std::sync::Arc;

/// Cache key for a fully rendered note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct NoteKey {
    note: u8,
    velocity: u8,
    sample_rate: u32,
    decay_factor: u32,
    harmonic_time: u32,
}

/// Renders individual note events into audible waveforms.
///
/// Looks up the note's frequency, obtains the base waveform from the
/// memoized string synthesizer, and scales it by `velocity / 127`. The
/// scaled result is memoized separately so repeated note/velocity pairs
/// skip even the scaling pass; the underlying synthesis cache is keyed on
/// frequency, so different velocities of the same pitch still share one
/// noise burst.
#[derive(Debug)]
pub struct NoteRenderer {
    synth: StringSynth,
    cache: LruCache<NoteKey, Arc<[f32]>>,
}

impl Default for NoteRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteRenderer {
    /// Creates a renderer with fresh caches.
    pub fn new() -> Self {
        Self {
            synth: StringSynth::new(),
            cache: LruCache::new(SYNTH_CACHE_CAPACITY),
        }
    }

    /// Renders one note event.
    ///
    /// # Arguments
    ///
    /// * `note` - MIDI note number (0-127)
    /// * `velocity` - Intensity (0-127); scales amplitude linearly
    /// * `sample_rate` - Output sample rate in Hz
    /// * `decay_factor` - Feedback attenuation in (0, 1]
    /// * `harmonic_time` - Resonance duration in seconds
    ///
    /// # Errors
    ///
    /// Returns `RenderError::InvalidNote` for note numbers above 127.
    /// The caller is expected to abort the conversion: a bad note number
    /// means the score data is broken, not that one note should be
    /// skipped.
    pub fn render(
        &mut self,
        note: u8,
        velocity: u8,
        sample_rate: u32,
        decay_factor: f32,
        harmonic_time: f32,
    ) -> Result<Arc<[f32]>, RenderError> {
        let key = NoteKey {
            note,
            velocity,
            sample_rate,
            decay_factor: decay_factor.to_bits(),
            harmonic_time: harmonic_time.to_bits(),
        };
        if let Some(waveform) = self.cache.get(&key) {
            return Ok(Arc::clone(waveform));
        }

        let frequency = frequency_of(note)?;
        let base = self
            .synth
            .synthesize(sample_rate, frequency, decay_factor, harmonic_time);

        let gain = velocity as f32 / 127.0;
        let scaled: Arc<[f32]> = base.iter().map(|sample| sample * gain).collect();
        self.cache.insert(key, Arc::clone(&scaled));
        Ok(scaled)
    }

    /// Returns the number of distinct base waveforms synthesized so far.
    pub fn synthesized_waveforms(&self) -> usize {
        self.synth.cached_waveforms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_note_rejected() {
        let mut renderer = NoteRenderer::new();
        let result = renderer.render(128, 100, 8000, 0.996, 0.2);
        assert_eq!(result.unwrap_err(), RenderError::InvalidNote(128));
    }

    #[test]
    fn test_zero_velocity_is_silent() {
        let mut renderer = NoteRenderer::new();
        let silent = renderer.render(69, 0, 8000, 0.996, 0.2).unwrap();
        let loud = renderer.render(69, 127, 8000, 0.996, 0.2).unwrap();

        assert_eq!(silent.len(), loud.len());
        assert!(silent.iter().all(|&s| s == 0.0));
        assert!(loud.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn test_velocity_scales_linearly() {
        let mut renderer = NoteRenderer::new();
        // Full velocity has unit gain, so it reproduces the base waveform
        // exactly; half velocity must be the same buffer scaled down.
        let full = renderer.render(60, 127, 8000, 0.996, 0.2).unwrap();
        let half = renderer.render(60, 64, 8000, 0.996, 0.2).unwrap();

        assert_eq!(renderer.synthesized_waveforms(), 1);
        let gain = 64.0f32 / 127.0;
        for (f, h) in full.iter().zip(half.iter()) {
            assert_eq!(*h, f * gain);
        }
    }

    #[test]
    fn test_repeated_render_hits_cache() {
        let mut renderer = NoteRenderer::new();
        let first = renderer.render(69, 100, 8000, 0.996, 0.2).unwrap();
        let second = renderer.render(69, 100, 8000, 0.996, 0.2).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
