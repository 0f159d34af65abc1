//! Karplus-Strong plucked-string synthesis.
//!
//! A pluck is modeled as a burst of white noise recirculated through a
//! delay line one fundamental period long, averaged with a two-tap filter
//! on each pass. The averaging bleeds energy out of the upper harmonics
//! first, which is what gives the decay its string-like character.
//!
//! Waveforms are memoized per parameter tuple: a score that repeats the
//! same pitch and envelope reuses the cached buffer, including its noise
//! burst, so identical notes sound identical within a run.

use crate::synth::cache::LruCache;
use rand::Rng;
use std::sync::Arc;

/// Number of waveforms kept by the synthesis cache.
pub const SYNTH_CACHE_CAPACITY: usize = 128;

/// Shortest resonance the synthesizer will compute, in seconds.
///
/// Requested durations below this are silently raised to it; a shorter
/// buffer would cut the pluck transient itself.
const MIN_HARMONIC_TIME: f32 = 0.1;

/// Cache key for one synthesized waveform.
///
/// Float parameters are compared by bit pattern: the cache only needs to
/// recognize the exact tuples the scheduler passes in, not numerically
/// close ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PluckKey {
    sample_rate: u32,
    frequency: u32,
    decay_factor: u32,
    harmonic_time: u32,
}

impl PluckKey {
    fn new(sample_rate: u32, frequency: f32, decay_factor: f32, harmonic_time: f32) -> Self {
        Self {
            sample_rate,
            frequency: frequency.to_bits(),
            decay_factor: decay_factor.to_bits(),
            harmonic_time: harmonic_time.to_bits(),
        }
    }
}

/// Computes one plucked-string waveform.
///
/// # Arguments
///
/// * `sample_rate` - Output sample rate in Hz
/// * `frequency` - Fundamental frequency in Hz
/// * `decay_factor` - Feedback attenuation in (0, 1]; near 1 sustains,
///   near 0 damps quickly
/// * `harmonic_time` - Requested duration in seconds (floored to 0.1)
///
/// A non-positive frequency degenerates to a one-sample period, which
/// produces rapidly filtered noise rather than an error.
pub fn pluck(sample_rate: u32, frequency: f32, decay_factor: f32, harmonic_time: f32) -> Vec<f32> {
    // Samples per fundamental cycle; also the delay-line length. A zero
    // frequency divides to infinity; it floors to one like any other
    // non-positive input.
    let cycles = (sample_rate as f32 / frequency).round();
    let period = if cycles.is_finite() {
        (cycles as usize).max(1)
    } else {
        1
    };

    let harmonic_time = harmonic_time.max(MIN_HARMONIC_TIME);
    let count = ((sample_rate as f32 * harmonic_time).round() as usize).max(1);

    let mut output = vec![0.0f32; count];

    // Initial excitation: one period of uniform noise in [-1, 1].
    let mut rng = rand::thread_rng();
    for sample in output.iter_mut().take(period) {
        *sample = rng.gen_range(-1.0f32..=1.0);
    }

    // Recirculate through the delay line, averaging adjacent taps.
    let feedback = 0.5 * decay_factor;
    for i in period..count {
        let delay = i - period;
        // The tap before the excitation window is silence.
        let previous = if delay == 0 { 0.0 } else { output[delay - 1] };
        output[i] = (output[delay] + previous) * feedback;
    }

    output
}

/// Memoizing plucked-string synthesizer.
///
/// Owns a bounded LRU cache of waveforms keyed by the exact synthesis
/// parameters. The cache lives as long as the synthesizer instance, which
/// the pipeline creates once per conversion run.
#[derive(Debug)]
pub struct StringSynth {
    cache: LruCache<PluckKey, Arc<[f32]>>,
}

impl StringSynth {
    /// Creates a synthesizer with the default cache capacity.
    pub fn new() -> Self {
        Self {
            cache: LruCache::new(SYNTH_CACHE_CAPACITY),
        }
    }

    /// Returns the waveform for the given parameters, synthesizing it on
    /// the first request and serving the cached buffer afterwards.
    pub fn synthesize(
        &mut self,
        sample_rate: u32,
        frequency: f32,
        decay_factor: f32,
        harmonic_time: f32,
    ) -> Arc<[f32]> {
        let key = PluckKey::new(sample_rate, frequency, decay_factor, harmonic_time);
        if let Some(waveform) = self.cache.get(&key) {
            return Arc::clone(waveform);
        }

        let waveform: Arc<[f32]> =
            pluck(sample_rate, frequency, decay_factor, harmonic_time).into();
        self.cache.insert(key, Arc::clone(&waveform));
        waveform
    }

    /// Returns the number of distinct waveforms currently cached.
    pub fn cached_waveforms(&self) -> usize {
        self.cache.len()
    }
}

impl Default for StringSynth {
    fn default() -> Self {
        Self::new()
    }
}
