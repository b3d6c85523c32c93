//! CLI Module
//!
//! Command-line interface for the Sonora synthesizer and quizzes.

pub mod commands;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::engine::{TimeGrid, WaveParameters};
use crate::quiz::Category;

/// Sonora - sound-wave synthesis and listening quizzes
#[derive(Parser, Debug)]
#[command(name = "sonora")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (JSON); falls back to $SONORA_CONFIG
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Tone description shared by `render` and `plot`
#[derive(Args, Debug, Clone)]
pub struct WaveArgs {
    /// Frequency in Hz
    #[arg(short, long, default_value_t = 10.0)]
    pub frequency: f64,

    /// Peak amplitude in (0, 1]
    #[arg(short, long, default_value_t = 0.8)]
    pub amplitude: f64,

    /// Duration in seconds
    #[arg(short, long, default_value_t = 1.0)]
    pub duration: f64,

    /// Add a harmonic at twice the frequency (complex timbre)
    #[arg(long)]
    pub harmonic: bool,
}

impl WaveArgs {
    pub fn params(&self) -> WaveParameters {
        WaveParameters::new(self.frequency, self.amplitude, self.duration)
            .with_harmonic(self.harmonic)
    }
}

/// Grid convention as a command-line value
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridArg {
    /// Include the endpoint
    Closed,
    /// Exclude the endpoint
    HalfOpen,
}

impl From<GridArg> for TimeGrid {
    fn from(arg: GridArg) -> Self {
        match arg {
            GridArg::Closed => TimeGrid::Closed,
            GridArg::HalfOpen => TimeGrid::HalfOpen,
        }
    }
}

/// Output encoding for `plot`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synthesize a tone at the playback rate and write it as WAV
    #[command(name = "render")]
    Render {
        #[command(flatten)]
        wave: WaveArgs,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,

        /// Bit depth: 16 (PCM) or 32 (float)
        #[arg(long)]
        bit_depth: Option<u16>,

        /// Sample rate in Hz
        #[arg(long)]
        sample_rate: Option<u32>,
    },

    /// Synthesize a tone at plotting density and write the series
    #[command(name = "plot")]
    Plot {
        #[command(flatten)]
        wave: WaveArgs,

        /// Number of points
        #[arg(long)]
        points: Option<usize>,

        /// Time grid convention
        #[arg(long, value_enum)]
        grid: Option<GridArg>,

        /// Output encoding
        #[arg(long, value_enum, default_value_t = PlotFormat::Csv)]
        format: PlotFormat,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Name the numbered parts of the ear
    #[command(name = "anatomy-quiz")]
    AnatomyQuiz {
        /// Number of questions
        #[arg(short, long, default_value_t = 5)]
        rounds: u32,

        /// Seed for reproducible questions
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Listen to tones and describe their pitch, intensity or duration
    #[command(name = "sound-quiz")]
    SoundQuiz {
        /// Number of questions
        #[arg(short, long, default_value_t = 5)]
        rounds: u32,

        /// Seed for reproducible questions
        #[arg(short, long)]
        seed: Option<u64>,

        /// Directory the round clips are written to
        #[arg(long, default_value = ".")]
        clips_dir: PathBuf,

        /// Categories to ask about (comma separated)
        #[arg(long, value_delimiter = ',')]
        categories: Vec<Category>,
    },

    /// Print the effective configuration
    #[command(name = "print-config")]
    PrintConfig,
}
