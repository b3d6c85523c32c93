//! Synthesis Engine Module
//!
//! Everything between wave parameters and something a sink can consume:
//! - Waveform synthesis with visual and playback profiles
//! - Sample buffers and their sink conversions
//! - WAV encoding
//! - Plot series for renderers

pub mod buffer;
pub mod io;
pub mod plot;
pub mod synth;

pub use buffer::{SampleBuffer, TimeGrid};
pub use io::{decode_wav, encode_wav, export_wav, import_wav, DecodedWav, ExportFormat};
pub use plot::PlotSeries;
pub use synth::{render, synthesize, SynthProfile, WaveParameters};
