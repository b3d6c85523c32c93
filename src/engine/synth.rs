//! Waveform Synthesizer
//!
//! Turns a handful of acoustic parameters into a deterministic sample
//! buffer. Plotting and playback share this single code path and differ only
//! in sample density and grid convention, captured by [`SynthProfile`].

use std::f64::consts::TAU;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::engine::buffer::{SampleBuffer, TimeGrid};
use crate::error::{Result, SonoraError};

// ============================================================================
// Constants
// ============================================================================

/// Sample rate used for every playback clip
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Number of points drawn by the visualizer
pub const DEFAULT_VISUAL_POINTS: usize = 2000;

/// Harmonic frequency as a multiple of the fundamental
pub const HARMONIC_RATIO: f64 = 2.0;

/// Harmonic amplitude as a fraction of the fundamental's
pub const HARMONIC_GAIN: f64 = 1.0 / 3.0;

// ============================================================================
// Wave Parameters
// ============================================================================

/// Acoustic description of a tone
///
/// # Example
/// ```
/// use sonora::engine::{synthesize, TimeGrid, WaveParameters};
///
/// let params = WaveParameters::new(440.0, 0.7, 1.0);
/// let buffer = synthesize(&params, 44100, TimeGrid::HalfOpen).unwrap();
/// assert_eq!(buffer.len(), 44100);
/// assert!(buffer.peak() <= 0.7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveParameters {
    /// Fundamental frequency in Hz
    pub frequency: f64,
    /// Peak amplitude in (0, 1]
    pub amplitude: f64,
    /// Length in seconds
    pub duration: f64,
    /// Mix in a second component at twice the frequency and a third the amplitude
    #[serde(default)]
    pub harmonic: bool,
}

impl WaveParameters {
    /// Create parameters for a pure tone
    pub fn new(frequency: f64, amplitude: f64, duration: f64) -> Self {
        Self {
            frequency,
            amplitude,
            duration,
            harmonic: false,
        }
    }

    /// Set the harmonic flag
    pub fn with_harmonic(mut self, harmonic: bool) -> Self {
        self.harmonic = harmonic;
        self
    }

    /// Reject parameters the synthesizer cannot honor
    ///
    /// # Errors
    /// * `InvalidParameter` - frequency or duration not finite and positive,
    ///   or amplitude outside (0, 1]
    pub fn validate(&self) -> Result<()> {
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            return Err(SonoraError::invalid(
                "frequency",
                format!("must be finite and positive, got {}", self.frequency),
            ));
        }
        if !self.amplitude.is_finite() || self.amplitude <= 0.0 || self.amplitude > 1.0 {
            return Err(SonoraError::invalid(
                "amplitude",
                format!("must lie in (0, 1], got {}", self.amplitude),
            ));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(SonoraError::invalid(
                "duration",
                format!("must be finite and positive, got {}", self.duration),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Profiles
// ============================================================================

/// Sample density and grid convention for a rendering purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SynthProfile {
    /// Fixed number of points for drawing, independent of duration
    Visual { points: usize, grid: TimeGrid },
    /// Fixed sample rate for audio, always on a half-open grid
    Playback { sample_rate: u32 },
}

impl SynthProfile {
    /// Visualizer defaults: 2000 points over the closed interval
    pub fn visual() -> Self {
        SynthProfile::Visual {
            points: DEFAULT_VISUAL_POINTS,
            grid: TimeGrid::Closed,
        }
    }

    /// Playback defaults: 44.1 kHz
    pub fn playback() -> Self {
        SynthProfile::Playback {
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }

    /// Number of samples this profile produces for `duration` seconds
    ///
    /// Playback uses `round(duration * sample_rate)`.
    pub fn sample_count(&self, duration: f64) -> usize {
        match self {
            SynthProfile::Visual { points, .. } => *points,
            SynthProfile::Playback { sample_rate } => {
                (duration * *sample_rate as f64).round().max(0.0) as usize
            }
        }
    }

    /// Grid convention this profile samples on
    pub fn grid(&self) -> TimeGrid {
        match self {
            SynthProfile::Visual { grid, .. } => *grid,
            SynthProfile::Playback { .. } => TimeGrid::HalfOpen,
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            SynthProfile::Playback { sample_rate: 0 } => {
                Err(SonoraError::invalid("sample_rate", "must be non-zero"))
            }
            SynthProfile::Visual { points: 0, .. } => {
                Err(SonoraError::invalid("points", "must be non-zero"))
            }
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Synthesis
// ============================================================================

/// Synthesize `sample_count` samples of the described tone
///
/// The fundamental is `amplitude * sin(2π f t)`. With `harmonic` set, a
/// component at `2f` and `amplitude / 3` is added and the sum is rescaled so
/// its peak magnitude is exactly `amplitude` again. Output always lies in
/// `[-amplitude, amplitude]` and is a pure function of the arguments.
///
/// # Arguments
/// * `params` - Tone description
/// * `sample_count` - Number of samples to produce (> 0)
/// * `grid` - Whether the final sample lands before or on `duration`
///
/// # Errors
/// * `InvalidParameter` - if `params` fail validation or `sample_count` is 0
pub fn synthesize(
    params: &WaveParameters,
    sample_count: usize,
    grid: TimeGrid,
) -> Result<SampleBuffer> {
    params.validate()?;
    if sample_count == 0 {
        return Err(SonoraError::invalid("sample_count", "must be non-zero"));
    }

    let WaveParameters {
        frequency,
        amplitude,
        duration,
        harmonic,
    } = *params;

    let mut samples: Vec<f64> = (0..sample_count)
        .map(|i| {
            let t = grid.time_at(i, duration, sample_count);
            let mut value = amplitude * (TAU * frequency * t).sin();
            if harmonic {
                value += amplitude
                    * HARMONIC_GAIN
                    * (TAU * frequency * HARMONIC_RATIO * t).sin();
            }
            value
        })
        .collect();

    if harmonic {
        normalize_peak(&mut samples, amplitude);
    }

    debug!(
        "synthesized {} samples: {:.2} Hz, amplitude {:.3}, {:.3}s, harmonic={}, {:?}",
        sample_count, frequency, amplitude, duration, harmonic, grid
    );

    Ok(SampleBuffer::new(samples, duration, grid))
}

/// Synthesize the tone with the sample count and grid a profile dictates
///
/// # Errors
/// * `InvalidParameter` - if the profile has a zero rate or point count, or
///   the tone is too short to yield a single sample at the profile's rate
pub fn render(params: &WaveParameters, profile: &SynthProfile) -> Result<SampleBuffer> {
    profile.validate()?;
    params.validate()?;
    synthesize(params, profile.sample_count(params.duration), profile.grid())
}

/// Rescale `samples` in place so the largest magnitude equals `target`
///
/// All-zero input is left untouched.
fn normalize_peak(samples: &mut [f64], target: f64) {
    let max_abs = samples.iter().map(|s| s.abs()).fold(0.0_f64, f64::max);
    if max_abs > 0.0 {
        let gain = target / max_abs;
        for sample in samples.iter_mut() {
            *sample *= gain;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_quarter_point_sample() {
        let params = WaveParameters::new(440.0, 0.7, 1.0);
        let buffer = synthesize(&params, 44100, TimeGrid::HalfOpen).unwrap();

        assert_eq!(buffer.len(), 44100);
        assert_eq!(buffer.samples()[0], 0.0);

        let expected = 0.7 * (TAU * 440.0 * 0.25).sin();
        assert_abs_diff_eq!(buffer.samples()[11025], expected, epsilon = 1e-9);
    }

    #[test]
    fn test_harmonic_peak_is_renormalized() {
        let params = WaveParameters::new(10.0, 0.8, 1.0).with_harmonic(true);
        let buffer = synthesize(&params, 2000, TimeGrid::Closed).unwrap();

        assert_abs_diff_eq!(buffer.peak(), 0.8, epsilon = 1e-12);
        assert!(buffer.peak() < 0.8 + 0.8 / 3.0);
    }

    #[test]
    fn test_harmonic_changes_shape() {
        let pure = WaveParameters::new(10.0, 0.8, 1.0);
        let complex = pure.with_harmonic(true);

        let a = synthesize(&pure, 500, TimeGrid::Closed).unwrap();
        let b = synthesize(&complex, 500, TimeGrid::Closed).unwrap();
        assert_ne!(a.samples(), b.samples());
    }

    #[test]
    fn test_pure_tone_bounded() {
        let params = WaveParameters::new(37.5, 0.45, 0.8);
        let buffer = synthesize(&params, 3000, TimeGrid::HalfOpen).unwrap();
        assert!(buffer.samples().iter().all(|s| s.abs() <= 0.45));
    }

    #[test]
    fn test_deterministic() {
        let params = WaveParameters::new(523.25, 0.9, 0.5).with_harmonic(true);
        let a = synthesize(&params, 22050, TimeGrid::HalfOpen).unwrap();
        let b = synthesize(&params, 22050, TimeGrid::HalfOpen).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_grids_differ_only_in_timing() {
        let params = WaveParameters::new(3.0, 0.5, 1.0);
        let half = synthesize(&params, 100, TimeGrid::HalfOpen).unwrap();
        let closed = synthesize(&params, 100, TimeGrid::Closed).unwrap();

        assert_eq!(half.samples()[0], closed.samples()[0]);
        assert_ne!(half.samples()[99], closed.samples()[99]);
        // 3 whole cycles end back at zero on the closed grid
        assert_abs_diff_eq!(closed.samples()[99], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        let cases = [
            (WaveParameters::new(0.0, 0.5, 1.0), "frequency"),
            (WaveParameters::new(-5.0, 0.5, 1.0), "frequency"),
            (WaveParameters::new(f64::NAN, 0.5, 1.0), "frequency"),
            (WaveParameters::new(440.0, 0.0, 1.0), "amplitude"),
            (WaveParameters::new(440.0, 1.5, 1.0), "amplitude"),
            (WaveParameters::new(440.0, f64::INFINITY, 1.0), "amplitude"),
            (WaveParameters::new(440.0, 0.5, 0.0), "duration"),
            (WaveParameters::new(440.0, 0.5, -1.0), "duration"),
        ];

        for (params, field) in cases {
            match synthesize(&params, 100, TimeGrid::HalfOpen) {
                Err(SonoraError::InvalidParameter { name, .. }) => assert_eq!(name, field),
                other => panic!("Expected InvalidParameter({}), got: {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_rejects_zero_sample_count() {
        let params = WaveParameters::new(440.0, 0.5, 1.0);
        let err = synthesize(&params, 0, TimeGrid::HalfOpen).unwrap_err();
        assert!(matches!(
            err,
            SonoraError::InvalidParameter {
                name: "sample_count",
                ..
            }
        ));
    }

    #[test]
    fn test_playback_sample_count_rounds() {
        let profile = SynthProfile::playback();
        assert_eq!(profile.sample_count(1.0), 44100);
        assert_eq!(profile.sample_count(0.3), 13230);
        assert_eq!(profile.grid(), TimeGrid::HalfOpen);
    }

    #[test]
    fn test_visual_profile_ignores_duration() {
        let profile = SynthProfile::visual();
        assert_eq!(profile.sample_count(0.1), 2000);
        assert_eq!(profile.sample_count(3.0), 2000);
        assert_eq!(profile.grid(), TimeGrid::Closed);
    }

    #[test]
    fn test_render_playback_profile() {
        let params = WaveParameters::new(220.0, 0.2, 0.3);
        let buffer = render(&params, &SynthProfile::playback()).unwrap();

        assert_eq!(buffer.len(), 13230);
        assert_abs_diff_eq!(buffer.peak(), 0.2, epsilon = 1e-4);
    }

    #[test]
    fn test_render_rejects_degenerate_profiles() {
        let params = WaveParameters::new(220.0, 0.2, 0.3);
        assert!(render(&params, &SynthProfile::Playback { sample_rate: 0 }).is_err());
        assert!(render(
            &params,
            &SynthProfile::Visual {
                points: 0,
                grid: TimeGrid::Closed
            }
        )
        .is_err());
    }

    #[test]
    fn test_render_rejects_clip_shorter_than_one_sample() {
        let params = WaveParameters::new(220.0, 0.2, 1e-6);
        assert!(render(&params, &SynthProfile::playback()).is_err());
    }

    #[test]
    fn test_normalize_peak_skips_silence() {
        let mut samples = vec![0.0; 8];
        normalize_peak(&mut samples, 0.5);
        assert!(samples.iter().all(|&s| s == 0.0));
    }
}
