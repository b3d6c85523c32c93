//! Quiz State
//!
//! A quiz round is a value passed between two pure steps: a generator that
//! installs a fresh question, and a checker that grades an answer and clears
//! it. Whatever drives the quiz (a CLI loop, a web session) only stores the
//! latest state and shows it.

use std::fmt;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SonoraError};

/// A question that can be graded by string equality
pub trait Question {
    /// Text shown to the player
    fn prompt(&self) -> String;

    /// The one option that counts as correct
    fn correct_answer(&self) -> &str;

    /// Options offered to the player, in display order
    fn options(&self) -> Vec<&str>;
}

/// Outcome of the last answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feedback {
    Correct { answer: String },
    Incorrect { given: String, expected: String },
}

impl Feedback {
    pub fn is_correct(&self) -> bool {
        matches!(self, Feedback::Correct { .. })
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Correct { answer } => write!(f, "Correct! The answer was: {}", answer),
            Feedback::Incorrect { expected, .. } => {
                write!(f, "Incorrect. The correct answer was: {}", expected)
            }
        }
    }
}

/// Running tally across rounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub correct: u32,
    pub answered: u32,
}

impl Score {
    /// Fraction answered correctly (0.0 before the first answer)
    pub fn accuracy(&self) -> f64 {
        if self.answered == 0 {
            0.0
        } else {
            self.correct as f64 / self.answered as f64
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.correct, self.answered)
    }
}

/// Everything a quiz front end has to hold between interactions
#[derive(Debug, Clone, PartialEq)]
pub struct QuizState<Q> {
    current: Option<Q>,
    feedback: Option<Feedback>,
    score: Score,
}

impl<Q> Default for QuizState<Q> {
    fn default() -> Self {
        Self {
            current: None,
            feedback: None,
            score: Score::default(),
        }
    }
}

impl<Q: Question> QuizState<Q> {
    /// Fresh state: no question, no feedback, empty score
    pub fn new() -> Self {
        Self::default()
    }

    /// Question waiting for an answer, if any
    pub fn current(&self) -> Option<&Q> {
        self.current.as_ref()
    }

    /// Feedback from the most recent answer, if any
    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn score(&self) -> Score {
        self.score
    }

    /// Check if a question is waiting for an answer
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Install a new question, clearing the previous feedback
    ///
    /// An unanswered question is discarded without touching the score.
    pub fn with_question(self, question: Q) -> Self {
        Self {
            current: Some(question),
            feedback: None,
            score: self.score,
        }
    }

    /// Grade `answer` against the current question
    ///
    /// The answer is correct only if it equals the expected text exactly. The
    /// returned state has the question cleared either way, so a new one has to
    /// be generated before the next answer. `self` is left untouched.
    ///
    /// # Errors
    /// * `NoActiveQuestion` - if there is no question to answer
    pub fn answer(&self, answer: &str) -> Result<Self> {
        let question = self.current.as_ref().ok_or(SonoraError::NoActiveQuestion)?;
        let expected = question.correct_answer();

        let feedback = if answer == expected {
            Feedback::Correct {
                answer: expected.to_string(),
            }
        } else {
            Feedback::Incorrect {
                given: answer.to_string(),
                expected: expected.to_string(),
            }
        };

        let score = Score {
            correct: self.score.correct + feedback.is_correct() as u32,
            answered: self.score.answered + 1,
        };
        info!("answered {:?}: {} (score {})", answer, feedback, score);

        Ok(Self {
            current: None,
            feedback: Some(feedback),
            score,
        })
    }
}
