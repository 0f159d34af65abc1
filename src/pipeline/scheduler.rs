//! Timeline scheduling: relative event deltas to absolute start times.

use crate::error::RenderError;
use crate::midi::{EventKind, TrackEvent};
use crate::pipeline::RenderConfig;
use crate::synth::NoteRenderer;
use std::sync::Arc;

/// A waveform placed on the absolute timeline.
#[derive(Debug, Clone)]
pub struct RenderedEvent {
    /// Start time in seconds from the beginning of the piece.
    pub start_time: f64,
    /// The rendered mono samples.
    pub samples: Arc<[f32]>,
}

/// Computes the duration of one tick in seconds.
///
/// # Errors
///
/// Returns `RenderError::InvalidTiming` if `ticks_per_beat` is zero or the
/// tempo is not positive; neither admits a meaningful tick duration.
pub fn time_per_tick(ticks_per_beat: u32, bpm: f64) -> Result<f64, RenderError> {
    if ticks_per_beat == 0 {
        return Err(RenderError::InvalidTiming(
            "ticks per beat is zero".to_string(),
        ));
    }
    if bpm <= 0.0 {
        return Err(RenderError::InvalidTiming(format!(
            "tempo must be positive, got {} BPM",
            bpm
        )));
    }
    Ok(60.0 / (ticks_per_beat as f64 * bpm))
}

/// Schedules one track's events onto the absolute timeline.
///
/// Walks the events in order with a running clock that starts at zero.
/// A note-on with non-zero velocity is rendered at the current time;
/// every event then advances the clock by its delta, whether or not it
/// made a sound. Note-offs and other messages are inert beyond that time
/// advance.
///
/// Each track is an independent timeline; the mixer reconciles tracks
/// because they all share the same tempo-derived clock.
///
/// # Errors
///
/// Propagates `RenderError::InvalidNote` from the renderer; the first bad
/// note aborts the track (and with it, the conversion).
pub fn schedule_track(
    renderer: &mut NoteRenderer,
    events: &[TrackEvent],
    time_per_tick: f64,
    config: &RenderConfig,
) -> Result<Vec<RenderedEvent>, RenderError> {
    let mut current_time = 0.0f64;
    let mut rendered = Vec::new();

    for event in events {
        if let EventKind::NoteOn { note, velocity } = event.kind {
            if velocity > 0 {
                let samples = renderer.render(
                    note,
                    velocity,
                    config.sample_rate,
                    config.decay_factor,
                    config.harmonic_time,
                )?;
                if !samples.is_empty() {
                    rendered.push(RenderedEvent {
                        start_time: current_time,
                        samples,
                    });
                }
            }
        }
        current_time += event.delta_ticks as f64 * time_per_tick;
    }

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> RenderConfig {
        RenderConfig {
            sample_rate: 8000,
            decay_factor: 0.996,
            harmonic_time: 0.2,
        }
    }

    #[test]
    fn test_time_per_tick() {
        // 480 ticks per beat at 120 BPM: one beat is 0.5 s.
        let tpt = time_per_tick(480, 120.0).unwrap();
        assert!((tpt * 480.0 - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_timing() {
        assert!(matches!(
            time_per_tick(0, 120.0),
            Err(RenderError::InvalidTiming(_))
        ));
        assert!(matches!(
            time_per_tick(480, 0.0),
            Err(RenderError::InvalidTiming(_))
        ));
        assert!(matches!(
            time_per_tick(480, -30.0),
            Err(RenderError::InvalidTiming(_))
        ));
    }

    #[test]
    fn test_schedule_places_events() {
        let mut renderer = NoteRenderer::new();
        let tpt = time_per_tick(480, 120.0).unwrap();
        // First note sounds at t=0 and carries the delta to the second.
        let events = vec![
            TrackEvent::note_on(69, 100, 480),
            TrackEvent::note_on(60, 100, 0),
        ];

        let rendered = schedule_track(&mut renderer, &events, tpt, &test_config()).unwrap();
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].start_time, 0.0);
        assert!((rendered[1].start_time - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_silent_events_still_advance_time() {
        let mut renderer = NoteRenderer::new();
        let tpt = time_per_tick(480, 120.0).unwrap();
        // A velocity-0 note-on makes no sound but its delta still counts.
        let events = vec![
            TrackEvent::note_on(69, 0, 240),
            TrackEvent::other(240),
            TrackEvent::note_on(69, 100, 0),
        ];

        let rendered = schedule_track(&mut renderer, &events, tpt, &test_config()).unwrap();
        assert_eq!(rendered.len(), 1);
        assert!((rendered[0].start_time - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_note_off_only_track_is_silent() {
        let mut renderer = NoteRenderer::new();
        let tpt = time_per_tick(480, 120.0).unwrap();
        let events = vec![
            TrackEvent::note_on(69, 0, 480),
            TrackEvent::note_on(60, 0, 480),
            TrackEvent::other(480),
        ];

        let rendered = schedule_track(&mut renderer, &events, tpt, &test_config()).unwrap();
        assert!(rendered.is_empty());
    }

    #[test]
    fn test_invalid_note_aborts() {
        let mut renderer = NoteRenderer::new();
        let tpt = time_per_tick(480, 120.0).unwrap();
        let events = vec![TrackEvent::note_on(200, 100, 0)];

        let result = schedule_track(&mut renderer, &events, tpt, &test_config());
        assert_eq!(result.unwrap_err(), RenderError::InvalidNote(200));
    }
}
