//! WAV encoding for Sonora
//!
//! Sample buffers leave the crate as mono WAV streams, either in memory (for
//! embedding in a web response) or on disk. The RIFF layout itself is left
//! to `hound`. Decoding exists so files can be checked and replayed.

use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::engine::buffer::{sample_to_i16, SampleBuffer};
use crate::engine::synth::DEFAULT_SAMPLE_RATE;
use crate::error::{wav_error, Result, SonoraError};

/// Export format configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFormat {
    /// Target sample rate (default: 44100)
    pub sample_rate: u32,
    /// Bit depth: 16 (integer PCM) or 32 (IEEE float)
    pub bit_depth: u16,
}

impl Default for ExportFormat {
    fn default() -> Self {
        Self::web_playback()
    }
}

impl ExportFormat {
    /// Create a new export format with the given sample rate and bit depth
    pub fn new(sample_rate: u32, bit_depth: u16) -> Self {
        ExportFormat {
            sample_rate,
            bit_depth,
        }
    }

    /// 44.1kHz 16-bit PCM, what browsers play back from an embedded clip
    pub fn web_playback() -> Self {
        ExportFormat {
            sample_rate: DEFAULT_SAMPLE_RATE,
            bit_depth: 16,
        }
    }

    /// 44.1kHz 32-bit float, for sinks that take float samples directly
    pub fn float_playback() -> Self {
        ExportFormat {
            sample_rate: DEFAULT_SAMPLE_RATE,
            bit_depth: 32,
        }
    }

    /// Check the format can be written
    ///
    /// # Errors
    /// * `InvalidParameter` - if the sample rate is zero
    /// * `UnsupportedFormat` - if the bit depth is not 16 or 32
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(SonoraError::invalid("sample_rate", "must be non-zero"));
        }
        match self.bit_depth {
            16 | 32 => Ok(()),
            other => Err(SonoraError::UnsupportedFormat {
                format: format!("{}-bit audio (only 16, 32 supported)", other),
            }),
        }
    }

    fn wav_spec(&self) -> WavSpec {
        WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bit_depth,
            sample_format: if self.bit_depth == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Audio read back from a WAV stream
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedWav {
    /// Mono samples normalized to [-1, 1]
    pub samples: Vec<f32>,
    /// Sample rate declared in the header
    pub sample_rate: u32,
    /// Channel count declared in the header (stereo is down-mixed)
    pub channels: u16,
    /// Bits per sample declared in the header
    pub bit_depth: u16,
}

impl DecodedWav {
    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Encode a buffer as an in-memory mono WAV byte stream
///
/// # Arguments
/// * `buffer` - Samples to encode, expected within [-1, 1]
/// * `format` - Sample rate and bit depth of the stream
///
/// # Returns
/// * `Ok(Vec<u8>)` - Complete WAV file contents
///
/// # Errors
/// * `InvalidParameter` / `UnsupportedFormat` - if `format` is invalid
/// * `InvalidAudio` - if the encoder fails
pub fn encode_wav(buffer: &SampleBuffer, format: &ExportFormat) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    write_wav(buffer, format, &mut cursor)?;
    let bytes = cursor.into_inner();
    debug!(
        "encoded {} samples as {}-bit WAV ({} bytes)",
        buffer.len(),
        format.bit_depth,
        bytes.len()
    );
    Ok(bytes)
}

/// Export a buffer to a mono WAV file
///
/// # Errors
/// * `InvalidParameter` / `UnsupportedFormat` - if `format` is invalid
/// * `Io` - if the file cannot be created or written
pub fn export_wav(buffer: &SampleBuffer, path: &Path, format: &ExportFormat) -> Result<()> {
    format.validate()?;
    let file = std::fs::File::create(path)?;
    write_wav(buffer, format, std::io::BufWriter::new(file))?;
    info!(
        "wrote {} ({} samples, {} Hz, {}-bit)",
        path.display(),
        buffer.len(),
        format.sample_rate,
        format.bit_depth
    );
    Ok(())
}

/// Decode a WAV byte stream
///
/// # Errors
/// * `InvalidAudio` - if the bytes are not a readable WAV stream
/// * `UnsupportedFormat` - for more than two channels or an unhandled bit depth
pub fn decode_wav(bytes: &[u8]) -> Result<DecodedWav> {
    let reader = WavReader::new(Cursor::new(bytes)).map_err(|e| wav_error("open WAV", e))?;
    read_wav(reader)
}

/// Import a WAV file from disk
///
/// # Errors
/// * `Io` - if the file cannot be opened
/// * see [`decode_wav`]
pub fn import_wav(path: &Path) -> Result<DecodedWav> {
    let file = std::fs::File::open(path)?;
    let reader = WavReader::new(std::io::BufReader::new(file))
        .map_err(|e| wav_error("open WAV", e))?;
    read_wav(reader)
}

// ============================================================================
// Internal helper functions
// ============================================================================

fn write_wav<W: Write + Seek>(buffer: &SampleBuffer, format: &ExportFormat, sink: W) -> Result<()> {
    format.validate()?;

    let mut writer = WavWriter::new(sink, format.wav_spec()).map_err(|e| wav_error("create WAV", e))?;

    match format.bit_depth {
        16 => {
            for &sample in buffer.samples() {
                writer
                    .write_sample(sample_to_i16(sample))
                    .map_err(|e| wav_error("write sample", e))?;
            }
        }
        _ => {
            for &sample in buffer.samples() {
                writer
                    .write_sample(sample as f32)
                    .map_err(|e| wav_error("write sample", e))?;
            }
        }
    }

    writer.finalize().map_err(|e| wav_error("finalize WAV", e))
}

fn read_wav<R: Read>(mut reader: WavReader<R>) -> Result<DecodedWav> {
    let spec = reader.spec();
    let channels = spec.channels;

    if channels == 0 || channels > 2 {
        return Err(SonoraError::UnsupportedFormat {
            format: format!("{}-channel audio (only mono/stereo supported)", channels),
        });
    }

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| wav_error("read float samples", e))?,
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| (v as f32 / 32767.0).max(-1.0)))
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| wav_error("read 16-bit samples", e))?,
        (SampleFormat::Int, 24) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| (v as f32 / 8388607.0).max(-1.0)))
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| wav_error("read 24-bit samples", e))?,
        (format, bits) => {
            return Err(SonoraError::UnsupportedFormat {
                format: format!("{}-bit {:?} audio", bits, format),
            })
        }
    };

    let samples = if channels == 2 {
        interleaved
            .chunks_exact(2)
            .map(|frame| (frame[0] + frame[1]) * 0.5)
            .collect()
    } else {
        interleaved
    };

    Ok(DecodedWav {
        samples,
        sample_rate: spec.sample_rate,
        channels,
        bit_depth: spec.bits_per_sample,
    })
}

// ============================================================================
// Tests
// ============================================================================
