//! Ear-Anatomy Quiz
//!
//! The player sees a numbered diagram of the ear and names the part a number
//! points at, picking from the right answer and up to three distractors.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::quiz::state::{Question, QuizState};

/// Diagram labels that can be asked about
///
/// Number 6 on the diagram is left unlabelled, so it is never asked.
pub const EAR_PARTS: [(u8, &str); 6] = [
    (1, "Outer ear (pinna)"),
    (2, "Eardrum"),
    (3, "Hammer (malleus)"),
    (4, "Cochlea"),
    (5, "Stirrup (stapes)"),
    (7, "Ear canal"),
];

/// Every part name that may appear as an option
pub const ALL_PARTS: [&str; 7] = [
    "Outer ear (pinna)",
    "Ear canal",
    "Eardrum",
    "Hammer (malleus)",
    "Anvil (incus)",
    "Stirrup (stapes)",
    "Cochlea",
];

/// Maximum number of wrong options shown alongside the right one
pub const MAX_DISTRACTORS: usize = 3;

/// "Which part of the ear is number N?"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnatomyQuestion {
    /// Number pointed at on the diagram
    pub number: u8,
    correct_answer: String,
    options: Vec<String>,
}

impl AnatomyQuestion {
    /// Draw a question uniformly over [`EAR_PARTS`]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let (number, correct) = EAR_PARTS[rng.gen_range(0..EAR_PARTS.len())];

        let distractors: Vec<&str> = ALL_PARTS
            .iter()
            .copied()
            .filter(|part| *part != correct)
            .collect();

        let mut options: Vec<String> = Vec::with_capacity(MAX_DISTRACTORS + 1);
        options.push(correct.to_string());
        options.extend(
            distractors
                .choose_multiple(rng, MAX_DISTRACTORS.min(distractors.len()))
                .map(|part| part.to_string()),
        );
        options.shuffle(rng);

        Self {
            number,
            correct_answer: correct.to_string(),
            options,
        }
    }
}

impl Question for AnatomyQuestion {
    fn prompt(&self) -> String {
        format!("Which part of the ear is number {}?", self.number)
    }

    fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    fn options(&self) -> Vec<&str> {
        self.options.iter().map(String::as_str).collect()
    }
}

/// Start a new round with a freshly drawn question
pub fn generate_question<R: Rng + ?Sized>(
    state: QuizState<AnatomyQuestion>,
    rng: &mut R,
) -> QuizState<AnatomyQuestion> {
    let question = AnatomyQuestion::random(rng);
    debug!("anatomy question: number {}", question.number);
    state.with_question(question)
}

/// Grade an answer to the current question
///
/// # Errors
/// * `NoActiveQuestion` - if no question has been generated
pub fn check_answer(
    state: &QuizState<AnatomyQuestion>,
    answer: &str,
) -> Result<QuizState<AnatomyQuestion>> {
    state.answer(answer)
}
