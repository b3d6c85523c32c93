//! Sonora - Sound Synthesis for Teaching Acoustics
//!
//! Sonora backs a set of classroom sound programs with one numeric core and
//! some small quiz logic:
//! 1. Waveform synthesis - sine tones with an optional harmonic, sampled for
//!    plotting or for playback
//! 2. Sinks - 16-bit / float conversion, WAV encoding and plot series
//! 3. Quizzes - ear anatomy and sound qualities as pure state transitions
//!
//! # Example
//! ```
//! use sonora::engine::{render, SynthProfile, WaveParameters};
//!
//! let params = WaveParameters::new(10.0, 0.8, 1.0).with_harmonic(true);
//! let buffer = render(&params, &SynthProfile::visual()).unwrap();
//! assert_eq!(buffer.len(), 2000);
//! assert!((buffer.peak() - 0.8).abs() < 1e-12);
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod quiz;

pub use config::SonoraConfig;
pub use error::{Result, SonoraError};
