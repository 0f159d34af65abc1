//! midipluck - a MIDI to plucked-string audio converter.
//!
//! Renders a Standard MIDI File to a mono WAV file using Karplus-Strong
//! string synthesis. Every note in the file is played as a plucked
//! string; tracks are mixed together and the result is peak-normalized.
//!
//! # Usage
//!
//! ```bash
//! midipluck song.mid                  # writes song.wav next to the input
//! midipluck song.mid -o out.wav       # explicit output path
//! midipluck song.mid --decay 0.98     # shorter sustain
//! ```

use anyhow::{bail, Context, Result};
use midipluck::pipeline::{
    DEFAULT_DECAY_FACTOR, DEFAULT_HARMONIC_TIME, DEFAULT_SAMPLE_RATE,
};
use midipluck::{load_score, render_score, write_wav, RenderConfig};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Command-line options for the converter.
struct CliOptions {
    /// Input MIDI file.
    input: PathBuf,
    /// Output WAV path; defaults to the input with a .wav extension.
    output: Option<PathBuf>,
    /// Synthesis parameters, overridable per flag.
    config: RenderConfig,
    /// Open the output folder when done.
    open_folder: bool,
}

impl CliOptions {
    /// Parses command-line arguments.
    ///
    /// Supports:
    /// - `<input.mid>`: the MIDI file to render (required)
    /// - `-o <path>` or `--output <path>`: output WAV path
    /// - `--rate <hz>`: output sample rate
    /// - `--decay <factor>`: feedback attenuation in (0, 1]
    /// - `--duration <seconds>`: resonance time per note
    /// - `--open`: open the output folder afterwards
    /// - `--help` or `-h`: print help and exit
    fn parse() -> Result<Self> {
        let args: Vec<String> = std::env::args().collect();
        let mut input: Option<PathBuf> = None;
        let mut output: Option<PathBuf> = None;
        let mut config = RenderConfig::default();
        let mut open_folder = false;
        let mut i = 1;

        while i < args.len() {
            match args[i].as_str() {
                "--output" | "-o" => {
                    output = Some(PathBuf::from(Self::value(&args, &mut i, "--output")));
                }
                "--rate" => {
                    config.sample_rate = Self::parse_value(&args, &mut i, "--rate")?;
                }
                "--decay" => {
                    config.decay_factor = Self::parse_value(&args, &mut i, "--decay")?;
                }
                "--duration" => {
                    config.harmonic_time = Self::parse_value(&args, &mut i, "--duration")?;
                }
                "--open" => open_folder = true,
                "--help" | "-h" => {
                    Self::print_help(args.first().map(String::as_str).unwrap_or("midipluck"));
                    std::process::exit(0);
                }
                other if other.starts_with('-') => {
                    eprintln!("Unknown option: {}", other);
                    eprintln!("Use --help for usage information");
                    std::process::exit(1);
                }
                other => {
                    if input.is_some() {
                        eprintln!("Unexpected extra argument: {}", other);
                        std::process::exit(1);
                    }
                    input = Some(PathBuf::from(other));
                }
            }
            i += 1;
        }

        let Some(input) = input else {
            eprintln!("Error: no input MIDI file given");
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        };

        Ok(Self {
            input,
            output,
            config,
            open_folder,
        })
    }

    /// Returns the value following a flag, exiting with an error if absent.
    fn value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> &'a str {
        *i += 1;
        if *i >= args.len() {
            eprintln!("Error: {} requires a value", flag);
            std::process::exit(1);
        }
        &args[*i]
    }

    fn parse_value<T: std::str::FromStr>(args: &[String], i: &mut usize, flag: &str) -> Result<T> {
        let raw = Self::value(args, i, flag);
        match raw.parse() {
            Ok(value) => Ok(value),
            Err(_) => bail!("invalid value for {}: {}", flag, raw),
        }
    }

    fn print_help(program: &str) {
        eprintln!("midipluck - renders MIDI files to plucked-string audio");
        eprintln!();
        eprintln!("Usage: {} <input.mid> [OPTIONS]", program);
        eprintln!();
        eprintln!("Options:");
        eprintln!(
            "  -o, --output PATH     Output WAV path (default: input with .wav extension)"
        );
        eprintln!(
            "      --rate HZ         Sample rate (default: {})",
            DEFAULT_SAMPLE_RATE
        );
        eprintln!(
            "      --decay FACTOR    Feedback decay in (0, 1] (default: {})",
            DEFAULT_DECAY_FACTOR
        );
        eprintln!(
            "      --duration SECS   Resonance per note in seconds (default: {})",
            DEFAULT_HARMONIC_TIME
        );
        eprintln!("      --open            Open the output folder when done");
        eprintln!("  -h, --help            Print this help message");
    }
}

/// Main entry point.
fn main() -> Result<()> {
    let cli = CliOptions::parse()?;

    // Initialize logging (optional, for debugging)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if !cli.input.is_file() {
        bail!("input is not a readable file: {}", cli.input.display());
    }

    let output = cli
        .output
        .unwrap_or_else(|| cli.input.with_extension("wav"));
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            bail!("output directory does not exist: {}", parent.display());
        }
    }

    let score = load_score(&cli.input)
        .with_context(|| format!("Failed to load MIDI file: {}", cli.input.display()))?;
    println!(
        "Loaded {} ({} tracks, {} events, {:.1} BPM)",
        cli.input.display(),
        score.tracks.len(),
        score.event_count(),
        score.bpm
    );

    let samples = render_score(
        &score,
        &cli.config,
        Some(|fraction: f32| {
            print!("\rRendering tracks... {:3.0}%", fraction * 100.0);
            let _ = std::io::stdout().flush();
        }),
    )?;
    println!();

    write_wav(&output, cli.config.sample_rate, &samples)
        .with_context(|| format!("Failed to write WAV file: {}", output.display()))?;
    println!(
        "Wrote {} ({:.2} s of audio)",
        output.display(),
        samples.len() as f64 / cli.config.sample_rate as f64
    );

    if cli.open_folder {
        open_folder(&output);
    }

    Ok(())
}

/// Opens the folder containing `path` with the platform file manager.
///
/// Failures are logged, not fatal: the WAV file is already on disk.
fn open_folder(path: &Path) {
    let Some(folder) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return;
    };

    #[cfg(target_os = "macos")]
    let opener = "open";
    #[cfg(target_os = "windows")]
    let opener = "explorer";
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let opener = "xdg-open";

    if let Err(e) = std::process::Command::new(opener).arg(folder).spawn() {
        tracing::warn!("Failed to open {}: {}", folder.display(), e);
    }
}
