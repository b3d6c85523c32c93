//! Sound-Quality Quiz
//!
//! A tone is played and the player names one of its qualities. Each round
//! picks a category (pitch, intensity or duration), then one of that
//! category's two labels, then draws tone parameters from the label's range
//! while holding the other qualities fixed.

use std::fmt;
use std::str::FromStr;

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::{render, SampleBuffer, SynthProfile, WaveParameters};
use crate::error::{Result, SonoraError};
use crate::quiz::state::{Question, QuizState};

/// Frequency used when pitch is not the quality being asked
pub const FIXED_FREQUENCY: f64 = 440.0;

/// Amplitude used when intensity is not the quality being asked
pub const FIXED_AMPLITUDE: f64 = 0.7;

/// Clip length used when duration is not the quality being asked
pub const DEFAULT_CLIP_DURATION: f64 = 1.0;

// ============================================================================
// Categories and labels
// ============================================================================

/// Quality of a sound the player is asked about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Pitch,
    Intensity,
    Duration,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Pitch, Category::Intensity, Category::Duration];

    /// The two answers offered for this category
    pub fn labels(&self) -> [Label; 2] {
        match self {
            Category::Pitch => [Label::Low, Label::High],
            Category::Intensity => [Label::Soft, Label::Loud],
            Category::Duration => [Label::Short, Label::Long],
        }
    }

    /// Acoustic quantity this category varies
    pub fn quantity(&self) -> &'static str {
        match self {
            Category::Pitch => "frequency",
            Category::Intensity => "amplitude",
            Category::Duration => "length",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Pitch => "pitch",
            Category::Intensity => "intensity",
            Category::Duration => "duration",
        };
        f.write_str(name)
    }
}

impl FromStr for Category {
    type Err = SonoraError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pitch" => Ok(Category::Pitch),
            "intensity" => Ok(Category::Intensity),
            "duration" => Ok(Category::Duration),
            other => Err(SonoraError::invalid(
                "category",
                format!("unknown category '{}' (pitch, intensity, duration)", other),
            )),
        }
    }
}

/// Answer naming one end of a quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Low,
    High,
    Soft,
    Loud,
    Short,
    Long,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Low => "Low",
            Label::High => "High",
            Label::Soft => "Soft",
            Label::Loud => "Loud",
            Label::Short => "Short",
            Label::Long => "Long",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Label::Low | Label::High => Category::Pitch,
            Label::Soft | Label::Loud => Category::Intensity,
            Label::Short | Label::Long => Category::Duration,
        }
    }

    /// Draw tone parameters that fit this label
    ///
    /// | Label | Varies | Range |
    /// |---|---|---|
    /// | Low | frequency (whole Hz) | 150..=250 |
    /// | High | frequency (whole Hz) | 500..=800 |
    /// | Soft | amplitude | 0.1..=0.3 |
    /// | Loud | amplitude | 0.6..=0.9 |
    /// | Short | duration (s) | 0.2..=0.4 |
    /// | Long | duration (s) | 1.5..=2.5 |
    ///
    /// Qualities not being asked stay at 440 Hz, 0.7 and `clip_duration`.
    pub fn draw_params<R: Rng + ?Sized>(&self, clip_duration: f64, rng: &mut R) -> WaveParameters {
        let (frequency, amplitude, duration) = match self {
            Label::Low => (f64::from(rng.gen_range(150_u32..=250)), FIXED_AMPLITUDE, clip_duration),
            Label::High => (f64::from(rng.gen_range(500_u32..=800)), FIXED_AMPLITUDE, clip_duration),
            Label::Soft => (FIXED_FREQUENCY, rng.gen_range(0.1..=0.3), clip_duration),
            Label::Loud => (FIXED_FREQUENCY, rng.gen_range(0.6..=0.9), clip_duration),
            Label::Short => (FIXED_FREQUENCY, FIXED_AMPLITUDE, rng.gen_range(0.2..=0.4)),
            Label::Long => (FIXED_FREQUENCY, FIXED_AMPLITUDE, rng.gen_range(1.5..=2.5)),
        };
        WaveParameters::new(frequency, amplitude, duration)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Question
// ============================================================================

/// "How would you describe this sound's <category>?"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityQuestion {
    pub category: Category,
    pub correct: Label,
    /// Tone to play; replaying re-renders these same parameters
    pub params: WaveParameters,
    options: Vec<Label>,
}

impl QualityQuestion {
    /// Draw a question from `categories`
    ///
    /// # Errors
    /// * `InvalidParameter` - if `categories` is empty or `clip_duration` is
    ///   not finite and positive
    pub fn random<R: Rng + ?Sized>(
        categories: &[Category],
        clip_duration: f64,
        rng: &mut R,
    ) -> Result<Self> {
        if !clip_duration.is_finite() || clip_duration <= 0.0 {
            return Err(SonoraError::invalid(
                "clip_duration",
                format!("must be finite and positive, got {}", clip_duration),
            ));
        }
        let category = *categories
            .choose(rng)
            .ok_or_else(|| SonoraError::invalid("categories", "at least one is required"))?;

        let mut options = category.labels().to_vec();
        let correct = options[rng.gen_range(0..options.len())];
        let params = correct.draw_params(clip_duration, rng);
        options.shuffle(rng);

        Ok(Self {
            category,
            correct,
            params,
            options,
        })
    }

    /// Labels offered to the player, in display order
    pub fn labels(&self) -> &[Label] {
        &self.options
    }

    /// Synthesize the tone for this question
    pub fn render(&self, profile: &SynthProfile) -> Result<SampleBuffer> {
        render(&self.params, profile)
    }
}

impl Question for QualityQuestion {
    fn prompt(&self) -> String {
        format!("How would you describe this sound's {}?", self.category)
    }

    fn correct_answer(&self) -> &str {
        self.correct.as_str()
    }

    fn options(&self) -> Vec<&str> {
        self.options.iter().map(Label::as_str).collect()
    }
}

/// Start a new round with a freshly drawn question
///
/// # Errors
/// * `InvalidParameter` - see [`QualityQuestion::random`]
pub fn generate_question<R: Rng + ?Sized>(
    state: QuizState<QualityQuestion>,
    categories: &[Category],
    clip_duration: f64,
    rng: &mut R,
) -> Result<QuizState<QualityQuestion>> {
    let question = QualityQuestion::random(categories, clip_duration, rng)?;
    debug!(
        "quality question: {} = {} ({:?})",
        question.category, question.correct, question.params
    );
    Ok(state.with_question(question))
}

/// Grade an answer to the current question
///
/// # Errors
/// * `NoActiveQuestion` - if no question has been generated
pub fn check_answer(
    state: &QuizState<QualityQuestion>,
    answer: &str,
) -> Result<QuizState<QualityQuestion>> {
    state.answer(answer)
}
