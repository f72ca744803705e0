//! Scoring engine
//!
//! This module converts attribute ratings into category and overall scores
//! and performs the inverse redistributions:
//! - ScoreCalculator for forward and inverse transforms
//! - AttributeValidator for range checks against the rules table

pub mod calculator;
pub mod validation;

pub use calculator::ScoreCalculator;
pub use validation::AttributeValidator;
