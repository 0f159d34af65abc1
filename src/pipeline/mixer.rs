//! Additive signal mixing and peak normalization.
//!
//! Simultaneous notes superpose linearly, the physical model for summed
//! acoustic pressure. The mixed buffer is then scaled so its peak sits
//! just under full scale, preserving relative dynamics while leaving
//! headroom against clipping in the output encoding.

use crate::pipeline::scheduler::RenderedEvent;
use rayon::prelude::*;

/// Peak amplitude of a normalized mix.
pub const PEAK_TARGET: f32 = 0.99;

/// Overlays rendered events into a single normalized buffer.
///
/// The buffer is sized to the end of the latest-finishing event, so decay
/// tails that outlast every other note are kept rather than trimmed. An
/// empty event list yields an empty buffer; an all-silent mix is returned
/// unscaled.
pub fn mix(events: &[RenderedEvent], sample_rate: u32) -> Vec<f32> {
    if events.is_empty() {
        return Vec::new();
    }

    let max_time = events
        .iter()
        .map(|event| event.start_time + event.samples.len() as f64 / sample_rate as f64)
        .fold(0.0f64, f64::max);
    let total_samples = (max_time * sample_rate as f64).round() as usize;

    let mut combined = vec![0.0f32; total_samples];
    for event in events {
        let start = (event.start_time * sample_rate as f64) as usize;
        let start = start.min(combined.len());
        for (slot, sample) in combined[start..].iter_mut().zip(event.samples.iter()) {
            *slot += sample;
        }
    }

    normalize(&mut combined);
    combined
}

/// Scales the buffer so its peak magnitude is exactly `PEAK_TARGET`.
///
/// A silent buffer is left untouched. Both passes are data-parallel over
/// disjoint samples.
fn normalize(samples: &mut [f32]) {
    let peak = samples
        .par_iter()
        .map(|sample| sample.abs())
        .reduce(|| 0.0f32, f32::max);

    if peak > 0.0 {
        let gain = PEAK_TARGET / peak;
        samples.par_iter_mut().for_each(|sample| *sample *= gain);
    }
}
