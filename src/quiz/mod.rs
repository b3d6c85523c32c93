//! Quiz Module
//!
//! Pure question generation and answer checking for the listening games.
//! Randomness always comes from the caller, so seeded runs are reproducible.

pub mod anatomy;
pub mod quality;
pub mod state;

pub use anatomy::AnatomyQuestion;
pub use quality::{Category, Label, QualityQuestion};
pub use state::{Feedback, Question, QuizState, Score};
