//! The offline synthesis pipeline.
//!
//! Sequences the synthesis components over a parsed score: every track is
//! scheduled onto the shared timeline, all rendered events are mixed into
//! one buffer, and the normalized result is handed back for the caller to
//! write out. Any timing or note error aborts the whole conversion; there
//! is no partial recovery.

mod mixer;
mod scheduler;

pub use mixer::{mix, PEAK_TARGET};
pub use scheduler::{schedule_track, time_per_tick, RenderedEvent};

use crate::error::RenderError;
use crate::midi::Score;
use crate::synth::NoteRenderer;

/// Default output sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Default feedback attenuation; close to 1 for a guitar-like sustain.
pub const DEFAULT_DECAY_FACTOR: f32 = 0.996;

/// Default resonance duration per note, in seconds.
pub const DEFAULT_HARMONIC_TIME: f32 = 4.0;

/// Synthesis parameters for one conversion run.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Feedback attenuation in (0, 1].
    pub decay_factor: f32,
    /// Resonance duration per note, in seconds.
    pub harmonic_time: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            decay_factor: DEFAULT_DECAY_FACTOR,
            harmonic_time: DEFAULT_HARMONIC_TIME,
        }
    }
}

/// Renders a whole score into one normalized mono buffer.
///
/// Tracks are scheduled independently (each from time zero) and their
/// rendered events accumulate into a single list that is mixed once. The
/// optional progress callback receives the fraction of events consumed,
/// reported at track boundaries.
///
/// A score whose events produce no sound yields an empty buffer, which is
/// a valid result rather than an error.
///
/// # Errors
///
/// Returns `RenderError::InvalidTiming` for unusable timing constants and
/// `RenderError::InvalidNote` for out-of-range notes. The first error
/// aborts the conversion.
pub fn render_score<F>(
    score: &Score,
    config: &RenderConfig,
    mut progress: Option<F>,
) -> Result<Vec<f32>, RenderError>
where
    F: FnMut(f32),
{
    let tick_seconds = time_per_tick(score.ticks_per_beat, score.bpm)?;

    let mut renderer = NoteRenderer::new();
    let total_events = score.event_count();
    let mut processed_events = 0usize;
    let mut rendered = Vec::new();

    for (index, track) in score.tracks.iter().enumerate() {
        tracing::debug!("Scheduling track {} ({} events)", index + 1, track.len());
        let mut track_events = schedule_track(&mut renderer, track, tick_seconds, config)?;
        rendered.append(&mut track_events);

        processed_events += track.len();
        if let Some(ref mut callback) = progress {
            if total_events > 0 {
                callback(processed_events as f32 / total_events as f32);
            }
        }
    }

    tracing::info!(
        "Mixing {} rendered events ({} waveforms synthesized)",
        rendered.len(),
        renderer.synthesized_waveforms()
    );
    Ok(mix(&rendered, config.sample_rate))
}
