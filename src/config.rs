//! Configuration
//!
//! Defaults match the classroom programs: 44.1 kHz clips, 2000-point plots
//! on a closed grid, 16-bit WAV output and one-second quiz tones. A JSON file
//! can override any subset of fields.

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::engine::synth::{DEFAULT_SAMPLE_RATE, DEFAULT_VISUAL_POINTS};
use crate::engine::{ExportFormat, SynthProfile, TimeGrid};
use crate::error::{Result, SonoraError};
use crate::quiz::quality::{Category, DEFAULT_CLIP_DURATION};

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "SONORA_CONFIG";

/// Effective settings for synthesis, export and quizzes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SonoraConfig {
    /// Playback sample rate in Hz
    pub sample_rate: u32,
    /// Points per plotted wave
    pub visual_points: usize,
    /// Grid convention for plotted waves
    pub visual_grid: TimeGrid,
    /// WAV bit depth: 16 or 32
    pub bit_depth: u16,
    /// Length of sound-quiz tones whose duration is not being asked
    pub clip_duration: f64,
    /// Categories the sound quiz draws from
    pub categories: Vec<Category>,
}

impl Default for SonoraConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            visual_points: DEFAULT_VISUAL_POINTS,
            visual_grid: TimeGrid::Closed,
            bit_depth: 16,
            clip_duration: DEFAULT_CLIP_DURATION,
            categories: Category::ALL.to_vec(),
        }
    }
}

impl SonoraConfig {
    /// Read a config file; fields it omits keep their defaults
    ///
    /// # Errors
    /// * `Config` - if the file cannot be read, parsed, or fails [`validate`](Self::validate)
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| SonoraError::Config {
            reason: format!("cannot read {}: {}", path.display(), e),
        })?;
        let config: SonoraConfig = serde_json::from_str(&text).map_err(|e| SonoraError::Config {
            reason: format!("cannot parse {}: {}", path.display(), e),
        })?;
        config.validate()?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve the config from an explicit path, then `SONORA_CONFIG`, then defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));
        match path {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Check every field holds a usable value
    pub fn validate(&self) -> Result<()> {
        let fail = |reason: String| Err(SonoraError::Config { reason });

        if self.sample_rate == 0 {
            return fail("sample_rate must be non-zero".to_string());
        }
        if self.visual_points == 0 {
            return fail("visual_points must be non-zero".to_string());
        }
        if !matches!(self.bit_depth, 16 | 32) {
            return fail(format!("bit_depth must be 16 or 32, got {}", self.bit_depth));
        }
        if !self.clip_duration.is_finite() || self.clip_duration <= 0.0 {
            return fail(format!(
                "clip_duration must be finite and positive, got {}",
                self.clip_duration
            ));
        }
        if self.categories.is_empty() {
            return fail("categories must not be empty".to_string());
        }
        Ok(())
    }

    pub fn visual_profile(&self) -> SynthProfile {
        SynthProfile::Visual {
            points: self.visual_points,
            grid: self.visual_grid,
        }
    }

    pub fn playback_profile(&self) -> SynthProfile {
        SynthProfile::Playback {
            sample_rate: self.sample_rate,
        }
    }

    pub fn export_format(&self) -> ExportFormat {
        ExportFormat::new(self.sample_rate, self.bit_depth)
    }
}
