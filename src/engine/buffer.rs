//! Sample Buffer
//!
//! The synthesizer's output: a mono run of real-valued samples plus the
//! information needed to recover each sample's time. Buffers are immutable
//! once built and owned by whoever asked for them (a plot renderer or an
//! audio sink).

use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Full-scale multiplier used when converting to 16-bit PCM
pub const I16_SCALE: f64 = 32767.0;

// ============================================================================
// Time Grid
// ============================================================================

/// How sample times are laid out over `duration`
///
/// Both conventions start at `t = 0`. They differ only at the final sample,
/// which is why the choice is explicit rather than inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeGrid {
    /// `[0, duration)`: step is `duration / n`, the endpoint is never sampled
    HalfOpen,
    /// `[0, duration]`: step is `duration / (n - 1)`, the endpoint is sampled
    Closed,
}

impl TimeGrid {
    /// Spacing between consecutive samples
    ///
    /// A single-sample grid has no spacing; it reports a step of zero.
    pub fn step(&self, duration: f64, sample_count: usize) -> f64 {
        match self {
            TimeGrid::HalfOpen if sample_count > 0 => duration / sample_count as f64,
            TimeGrid::Closed if sample_count > 1 => duration / (sample_count - 1) as f64,
            _ => 0.0,
        }
    }

    /// Time of sample `index`
    #[inline]
    pub fn time_at(&self, index: usize, duration: f64, sample_count: usize) -> f64 {
        // Pin the closed grid's last point so it lands exactly on `duration`.
        if *self == TimeGrid::Closed && sample_count > 1 && index == sample_count - 1 {
            return duration;
        }
        index as f64 * self.step(duration, sample_count)
    }
}

// ============================================================================
// Sample Buffer
// ============================================================================

/// Discretized waveform with an implicit uniform time step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleBuffer {
    samples: Vec<f64>,
    duration: f64,
    grid: TimeGrid,
}

impl SampleBuffer {
    /// Wrap already-computed samples
    ///
    /// # Arguments
    /// * `samples` - Sample values, in time order
    /// * `duration` - Span in seconds the samples cover
    /// * `grid` - Convention that places the samples in time
    pub fn new(samples: Vec<f64>, duration: f64, grid: TimeGrid) -> Self {
        Self {
            samples,
            duration,
            grid,
        }
    }

    /// Sample values in time order
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Number of samples
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the buffer holds no samples
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Span in seconds covered by the grid
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Time grid convention
    pub fn grid(&self) -> TimeGrid {
        self.grid
    }

    /// Spacing between consecutive samples in seconds
    pub fn time_step(&self) -> f64 {
        self.grid.step(self.duration, self.len())
    }

    /// Time in seconds of every sample, aligned with [`samples`](Self::samples)
    pub fn time_grid(&self) -> Vec<f64> {
        let n = self.len();
        (0..n)
            .map(|i| self.grid.time_at(i, self.duration, n))
            .collect()
    }

    /// Largest absolute sample value (0.0 for an empty buffer)
    pub fn peak(&self) -> f64 {
        self.samples.iter().map(|s| s.abs()).fold(0.0_f64, f64::max)
    }

    /// Check that every sample is finite and within `[-1, 1]`
    pub fn is_normalized(&self) -> bool {
        self.samples
            .iter()
            .all(|s| s.is_finite() && s.abs() <= 1.0)
    }

    /// Samples as 32-bit floats for a float audio sink
    pub fn to_f32(&self) -> Vec<f32> {
        self.samples.iter().map(|&s| s as f32).collect()
    }

    /// Samples as 16-bit PCM
    ///
    /// Each sample is multiplied by 32767, rounded to the nearest step and
    /// clamped to the `i16` range.
    pub fn to_i16(&self) -> Vec<i16> {
        self.samples.iter().map(|&s| sample_to_i16(s)).collect()
    }
}

/// Scale a normalized sample to 16-bit PCM
#[inline]
pub fn sample_to_i16(sample: f64) -> i16 {
    (sample * I16_SCALE)
        .round()
        .clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_half_open_grid_excludes_endpoint() {
        let buffer = SampleBuffer::new(vec![0.0; 4], 1.0, TimeGrid::HalfOpen);
        assert_eq!(buffer.time_grid(), vec![0.0, 0.25, 0.5, 0.75]);
        assert_relative_eq!(buffer.time_step(), 0.25);
    }

    #[test]
    fn test_closed_grid_includes_endpoint() {
        let buffer = SampleBuffer::new(vec![0.0; 5], 2.0, TimeGrid::Closed);
        assert_eq!(buffer.time_grid(), vec![0.0, 0.5, 1.0, 1.5, 2.0]);
        assert_relative_eq!(buffer.time_step(), 0.5);
    }

    #[test]
    fn test_closed_grid_last_point_is_exact() {
        let buffer = SampleBuffer::new(vec![0.0; 2000], 0.3, TimeGrid::Closed);
        assert_eq!(buffer.time_grid().last().copied(), Some(0.3));
    }

    #[test]
    fn test_single_sample_grid() {
        for grid in [TimeGrid::HalfOpen, TimeGrid::Closed] {
            let buffer = SampleBuffer::new(vec![0.5], 1.0, grid);
            assert_eq!(buffer.time_grid(), vec![0.0]);
        }
        let closed = SampleBuffer::new(vec![0.5], 1.0, TimeGrid::Closed);
        assert_eq!(closed.time_step(), 0.0);
    }

    #[test]
    fn test_peak() {
        let buffer = SampleBuffer::new(vec![0.1, -0.7, 0.3], 1.0, TimeGrid::HalfOpen);
        assert_relative_eq!(buffer.peak(), 0.7);

        let empty = SampleBuffer::new(Vec::new(), 1.0, TimeGrid::HalfOpen);
        assert_eq!(empty.peak(), 0.0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_to_i16_scales_and_clamps() {
        let buffer = SampleBuffer::new(
            vec![0.0, 1.0, -1.0, 0.5, 2.0, -2.0],
            1.0,
            TimeGrid::HalfOpen,
        );
        assert_eq!(
            buffer.to_i16(),
            vec![0, 32767, -32767, 16384, 32767, -32768]
        );
    }

    #[test]
    fn test_to_f32() {
        let buffer = SampleBuffer::new(vec![0.25, -0.5], 1.0, TimeGrid::HalfOpen);
        assert_eq!(buffer.to_f32(), vec![0.25_f32, -0.5_f32]);
    }

    #[test]
    fn test_is_normalized() {
        let ok = SampleBuffer::new(vec![1.0, -1.0, 0.0], 1.0, TimeGrid::HalfOpen);
        assert!(ok.is_normalized());

        let loud = SampleBuffer::new(vec![1.01], 1.0, TimeGrid::HalfOpen);
        assert!(!loud.is_normalized());

        let nan = SampleBuffer::new(vec![f64::NAN], 1.0, TimeGrid::HalfOpen);
        assert!(!nan.is_normalized());
    }
}
