//! gradewise-core: short-answer grading engine and exam model.
//!
//! Grades a free-text answer against a teacher's model answer by combining
//! three signals (token similarity, keyword coverage, answer length) into a
//! score with written feedback. Around the engine sit the exam and
//! submission records, batch grading, class statistics, and configuration.

pub mod batch;
pub mod coherence;
pub mod config;
pub mod error;
pub mod feedback;
pub mod grader;
pub mod keywords;
pub mod model;
pub mod parser;
pub mod policy;
pub mod results;
pub mod similarity;
pub mod statistics;
pub mod submission;
pub mod text;

pub use grader::{grade, Grader};
pub use policy::{ScoringPolicy, Weights};
pub use results::GradingResult;
