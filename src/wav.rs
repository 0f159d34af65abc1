//! WAV output.
//!
//! Writes the mixed buffer as a mono 32-bit-float WAV file. Float samples
//! are written as-is; the mixer has already bounded the peak below full
//! scale, so no conversion or clamping happens here.

use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::Path;

/// Writes mono float samples to a WAV file.
///
/// # Errors
///
/// Returns a `hound::Error` if the file cannot be created or a write
/// fails. A failed write leaves no usable output; callers treat it as
/// fatal to the conversion.
pub fn write_wav<P: AsRef<Path>>(
    path: P,
    sample_rate: u32,
    samples: &[f32],
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path.as_ref(), spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::WavReader;
    use std::fs;

    #[test]
    fn test_write_and_read_back() {
        let path = std::env::temp_dir().join("midipluck_test_roundtrip.wav");
        let samples = vec![0.0f32, 0.5, -0.5, 0.99, -0.99];

        write_wav(&path, 44100, &samples).unwrap();

        let mut reader = WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 44100);
        assert_eq!(spec.bits_per_sample, 32);
        assert_eq!(spec.sample_format, SampleFormat::Float);

        let read: Vec<f32> = reader.samples::<f32>().map(Result::unwrap).collect();
        assert_eq!(read, samples);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_empty_buffer() {
        let path = std::env::temp_dir().join("midipluck_test_empty.wav");
        write_wav(&path, 8000, &[]).unwrap();

        let reader = WavReader::open(&path).unwrap();
        assert_eq!(reader.len(), 0);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_unwritable_path_fails() {
        let result = write_wav("/nonexistent-dir/out.wav", 8000, &[0.0]);
        assert!(result.is_err());
    }
}
