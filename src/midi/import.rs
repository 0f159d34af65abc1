//! Standard MIDI File (SMF) import.
//!
//! Reads .mid files into the `Score` representation consumed by the
//! synthesis pipeline. Only note-on events and the first tempo are
//! extracted; all other messages survive as time-advancing placeholders.
//!
//! # Limitations
//!
//! - SMPTE timecode timing is not supported
//! - Tempo changes after the first `set_tempo` are ignored; the whole
//!   score plays at one tempo
//! - Channels are not distinguished; every note is rendered with the same
//!   plucked-string voice

use super::{bpm_from_micros, EventKind, Score, TrackEvent, DEFAULT_BPM};
use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while importing a MIDI file.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// File could not be read.
    #[error("failed to read MIDI file: {0}")]
    Io(#[from] std::io::Error),
    /// MIDI parsing failed.
    #[error("failed to parse MIDI file: {0}")]
    Parse(String),
    /// The file parsed but uses a feature the pipeline cannot handle.
    #[error("unsupported MIDI file: {0}")]
    Unsupported(String),
}

/// Imports a MIDI file from disk.
///
/// # Errors
///
/// Returns `ScoreError::Io` if the file cannot be read, `ScoreError::Parse`
/// if it is not valid SMF data, and `ScoreError::Unsupported` for SMPTE
/// timecode timing.
pub fn load_score<P: AsRef<Path>>(path: P) -> Result<Score, ScoreError> {
    let data = fs::read(path.as_ref())?;
    parse_score(&data)
}

/// Parses SMF bytes into a `Score`.
///
/// The first `set_tempo` event anywhere in the file wins. A file without
/// one falls back to 120 BPM; the substitution is logged as a warning so
/// a silent default never masquerades as score data.
pub fn parse_score(data: &[u8]) -> Result<Score, ScoreError> {
    let smf = Smf::parse(data).map_err(|e| ScoreError::Parse(e.to_string()))?;

    let ticks_per_beat = match smf.header.timing {
        Timing::Metrical(tpb) => tpb.as_int() as u32,
        Timing::Timecode(_, _) => {
            return Err(ScoreError::Unsupported(
                "SMPTE timecode timing is not supported".to_string(),
            ))
        }
    };

    let bpm = match first_tempo(&smf) {
        Some(microseconds_per_beat) => bpm_from_micros(microseconds_per_beat),
        None => {
            tracing::warn!(
                "No set_tempo event found; assuming the default {} BPM",
                DEFAULT_BPM
            );
            DEFAULT_BPM
        }
    };

    let tracks = smf
        .tracks
        .iter()
        .map(|track| track.iter().map(convert_event).collect())
        .collect();

    Ok(Score {
        ticks_per_beat,
        bpm,
        tracks,
    })
}

/// Finds the first tempo event in file order, skipping zero values that
/// would produce an infinite BPM.
fn first_tempo(smf: &Smf) -> Option<u32> {
    for track in &smf.tracks {
        for event in track {
            if let TrackEventKind::Meta(MetaMessage::Tempo(tempo)) = event.kind {
                let microseconds_per_beat = tempo.as_int();
                if microseconds_per_beat > 0 {
                    return Some(microseconds_per_beat);
                }
            }
        }
    }
    None
}

fn convert_event(event: &midly::TrackEvent) -> TrackEvent {
    let delta_ticks = event.delta.as_int();
    let kind = match event.kind {
        TrackEventKind::Midi {
            message: MidiMessage::NoteOn { key, vel },
            ..
        } => EventKind::NoteOn {
            note: key.as_int(),
            velocity: vel.as_int(),
        },
        _ => EventKind::Other,
    };
    TrackEvent { kind, delta_ticks }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Assembles a minimal SMF byte stream: format 1 header with the given
    /// division, followed by the given track chunks.
    fn smf_bytes(division: u16, tracks: &[Vec<u8>]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(b"MThd");
        data.extend_from_slice(&6u32.to_be_bytes());
        data.extend_from_slice(&1u16.to_be_bytes());
        data.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
        data.extend_from_slice(&division.to_be_bytes());
        for track in tracks {
            data.extend_from_slice(b"MTrk");
            data.extend_from_slice(&(track.len() as u32).to_be_bytes());
            data.extend_from_slice(track);
        }
        data
    }

    const END_OF_TRACK: [u8; 4] = [0x00, 0xFF, 0x2F, 0x00];

    #[test]
    fn test_parse_tempo_and_notes() {
        // Track 0: set_tempo 1,000,000 us/beat (60 BPM).
        let mut tempo_track = vec![0x00, 0xFF, 0x51, 0x03, 0x0F, 0x42, 0x40];
        tempo_track.extend_from_slice(&END_OF_TRACK);

        // Track 1: note-on A4 velocity 100 at delta 0, note-off (as
        // velocity-0 note-on) after 480 ticks.
        let mut note_track = vec![0x00, 0x90, 69, 100];
        note_track.extend_from_slice(&[0x83, 0x60, 0x90, 69, 0]); // delta 480 as VLQ
        note_track.extend_from_slice(&END_OF_TRACK);

        let data = smf_bytes(480, &[tempo_track, note_track]);
        let score = parse_score(&data).unwrap();

        assert_eq!(score.ticks_per_beat, 480);
        assert_eq!(score.bpm, 60.0);
        assert_eq!(score.tracks.len(), 2);

        let notes = &score.tracks[1];
        assert_eq!(notes[0], TrackEvent::note_on(69, 100, 0));
        assert_eq!(notes[1], TrackEvent::note_on(69, 0, 480));
    }

    #[test]
    fn test_missing_tempo_defaults() {
        let mut track = vec![0x00, 0x90, 60, 90];
        track.extend_from_slice(&END_OF_TRACK);

        let score = parse_score(&smf_bytes(96, &[track])).unwrap();
        assert_eq!(score.bpm, DEFAULT_BPM);
    }

    #[test]
    fn test_first_tempo_wins() {
        // Two tempo events; only the first (90 BPM) applies.
        let mut track = Vec::new();
        track.extend_from_slice(&[0x00, 0xFF, 0x51, 0x03, 0x0A, 0x2C, 0x2A]); // 666,666 us
        track.extend_from_slice(&[0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]); // 500,000 us
        track.extend_from_slice(&END_OF_TRACK);

        let score = parse_score(&smf_bytes(480, &[track])).unwrap();
        assert!((score.bpm - 90.0).abs() < 0.001, "got {}", score.bpm);
    }

    #[test]
    fn test_non_note_events_keep_delta() {
        // A program change still advances time by its delta.
        let mut track = vec![0x60, 0xC0, 0x05];
        track.extend_from_slice(&END_OF_TRACK);

        let score = parse_score(&smf_bytes(480, &[track])).unwrap();
        assert_eq!(score.tracks[0][0], TrackEvent::other(0x60));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            parse_score(b"not a midi file"),
            Err(ScoreError::Parse(_))
        ));
    }

    #[test]
    fn test_timecode_unsupported() {
        // Division with the high bit set selects SMPTE timecode.
        let mut track = Vec::new();
        track.extend_from_slice(&END_OF_TRACK);
        let data = smf_bytes(0xE728, &[track]);
        assert!(matches!(
            parse_score(&data),
            Err(ScoreError::Unsupported(_))
        ));
    }
}
