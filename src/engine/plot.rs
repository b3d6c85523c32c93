//! Plot Series
//!
//! Hands a renderer the `(time, amplitude)` pairs of a buffer along with the
//! framing the visualizer always used: fixed y-limits so loud and soft waves
//! are visibly different, and x-limits matching the clip length.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::engine::buffer::SampleBuffer;
use crate::error::Result;

/// Vertical extent shown for every wave, wide enough for full-scale output
pub const Y_LIMIT: f64 = 1.5;

/// Everything a line-plot renderer needs for one wave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSeries {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_limits: (f64, f64),
    pub y_limits: (f64, f64),
    pub time: Vec<f64>,
    pub amplitude: Vec<f64>,
}

impl PlotSeries {
    /// Build a series from a synthesized buffer
    ///
    /// `harmonic` only picks the title: "Complex wave" or "Pure wave".
    pub fn from_buffer(buffer: &SampleBuffer, harmonic: bool) -> Self {
        let title = if harmonic { "Complex wave" } else { "Pure wave" };
        Self {
            title: title.to_string(),
            x_label: "Time (s)".to_string(),
            y_label: "Amplitude".to_string(),
            x_limits: (0.0, buffer.duration()),
            y_limits: (-Y_LIMIT, Y_LIMIT),
            time: buffer.time_grid(),
            amplitude: buffer.samples().to_vec(),
        }
    }

    /// Number of points in the series
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Check if the series has no points
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Write the points as CSV with a `time,amplitude` header
    pub fn write_csv<W: Write>(&self, mut out: W) -> Result<()> {
        writeln!(out, "time,amplitude")?;
        for (t, a) in self.time.iter().zip(self.amplitude.iter()) {
            writeln!(out, "{},{}", t, a)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Write the series, framing included, as pretty JSON
    pub fn write_json<W: Write>(&self, out: W) -> Result<()> {
        serde_json::to_writer_pretty(out, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::synth::{render, SynthProfile, WaveParameters};

    fn series(harmonic: bool) -> PlotSeries {
        let params = WaveParameters::new(10.0, 0.8, 1.0).with_harmonic(harmonic);
        let buffer = render(&params, &SynthProfile::visual()).unwrap();
        PlotSeries::from_buffer(&buffer, harmonic)
    }

    #[test]
    fn test_framing() {
        let pure = series(false);
        assert_eq!(pure.title, "Pure wave");
        assert_eq!(pure.x_limits, (0.0, 1.0));
        assert_eq!(pure.y_limits, (-1.5, 1.5));
        assert_eq!(pure.len(), 2000);

        assert_eq!(series(true).title, "Complex wave");
    }

    #[test]
    fn test_time_axis_matches_grid() {
        let s = series(false);
        assert_eq!(s.time.first().copied(), Some(0.0));
        assert_eq!(s.time.last().copied(), Some(1.0));
        assert_eq!(s.time.len(), s.amplitude.len());
    }

    #[test]
    fn test_write_csv() {
        let params = WaveParameters::new(1.0, 0.5, 1.0);
        let buffer = crate::engine::synth::synthesize(
            &params,
            3,
            crate::engine::buffer::TimeGrid::HalfOpen,
        )
        .unwrap();
        let series = PlotSeries::from_buffer(&buffer, false);

        let mut out = Vec::new();
        series.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "time,amplitude");
        assert_eq!(lines[1], "0,0");
        assert!(lines[2].starts_with("0.3333333333333333,0.43"));
    }

    #[test]
    fn test_json_round_trip_keeps_framing() {
        let s = series(true);
        let mut out = Vec::new();
        s.write_json(&mut out).unwrap();

        let back: PlotSeries = serde_json::from_slice(&out).unwrap();
        assert_eq!(back.title, s.title);
        assert_eq!(back.y_limits, s.y_limits);
        assert_eq!(back.len(), s.len());
    }
}
