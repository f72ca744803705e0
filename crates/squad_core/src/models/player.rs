use super::{AttributeSet, Category, Score, ScoreCard};
use crate::error::Result;
use crate::player::calculator::ScoreCalculator;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type PlayerId = u32;

/// Lineup role used for quota computation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    pub const ALL: [Position; 4] =
        [Position::Goalkeeper, Position::Defender, Position::Midfielder, Position::Forward];

    /// Stable bucket index, matching `Position::ALL`.
    pub fn index(&self) -> usize {
        match self {
            Position::Goalkeeper => 0,
            Position::Defender => 1,
            Position::Midfielder => 2,
            Position::Forward => 3,
        }
    }

    pub fn is_goalkeeper(&self) -> bool {
        matches!(self, Position::Goalkeeper)
    }

    pub fn is_outfield(&self) -> bool {
        !self.is_goalkeeper()
    }

    pub fn short_code(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DF",
            Position::Midfielder => "MF",
            Position::Forward => "FW",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Position::Goalkeeper => "Goalkeeper",
            Position::Defender => "Defender",
            Position::Midfielder => "Midfielder",
            Position::Forward => "Forward",
        };
        f.write_str(name)
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GOALKEEPER" | "GK" | "G" => Ok(Position::Goalkeeper),
            "DEFENDER" | "DF" | "DEF" | "D" => Ok(Position::Defender),
            "MIDFIELDER" | "MF" | "MID" | "M" => Ok(Position::Midfielder),
            "FORWARD" | "FW" | "FWD" | "F" => Ok(Position::Forward),
            _ => Err(format!("Invalid position: {}", s)),
        }
    }
}

/// Player as supplied by the surrounding application, before scores are derived.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    pub attributes: AttributeSet,
}

/// A player with attribute ratings and the scores derived from them.
///
/// `scores` is a cache over `attributes`; every mutator re-derives it before
/// returning, so a `Player` never carries stale scores.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    attributes: AttributeSet,
    scores: ScoreCard,
}

impl Player {
    pub fn new(
        calculator: &ScoreCalculator,
        id: PlayerId,
        name: impl Into<String>,
        position: Position,
        attributes: AttributeSet,
    ) -> Result<Self> {
        let scores = calculator.score_card(&attributes)?;
        Ok(Self { id, name: name.into(), position, attributes, scores })
    }

    pub fn from_record(calculator: &ScoreCalculator, record: PlayerRecord) -> Result<Self> {
        Self::new(calculator, record.id, record.name, record.position, record.attributes)
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    pub fn scores(&self) -> &ScoreCard {
        &self.scores
    }

    pub fn overall(&self) -> Score {
        self.scores.overall
    }

    pub fn category_score(&self, category: Category) -> Score {
        self.scores.categories.get(category)
    }

    /// Plain single-attribute edit.
    pub fn set_attribute(
        &mut self,
        calculator: &ScoreCalculator,
        name: &str,
        value: i64,
    ) -> Result<ScoreCard> {
        let mut attributes = self.attributes.clone();
        attributes.set(calculator.rules(), name, value)?;
        self.commit(calculator, attributes)
    }

    /// Single-attribute edit that rescales the rest of the attribute's group
    /// by the change in group average.
    pub fn rebalance_attribute(
        &mut self,
        calculator: &ScoreCalculator,
        name: &str,
        value: i64,
    ) -> Result<ScoreCard> {
        let attributes = calculator.adjust_attribute_in_set(&self.attributes, name, value)?;
        self.commit(calculator, attributes)
    }

    /// Redistribute one group so that it reproduces `target`.
    pub fn set_category_score(
        &mut self,
        calculator: &ScoreCalculator,
        category: Category,
        target: i64,
    ) -> Result<ScoreCard> {
        let ratings = self.attributes.ratings(calculator.rules(), category);
        let rescaled = calculator.set_category_score(&ratings, target)?;
        let mut attributes = self.attributes.clone();
        attributes.replace_group(calculator.rules(), category, &rescaled);
        self.commit(calculator, attributes)
    }

    /// Rescale the four categories towards `target`, then every group towards its category.
    pub fn set_overall_score(
        &mut self,
        calculator: &ScoreCalculator,
        target: i64,
    ) -> Result<ScoreCard> {
        let categories = calculator.set_overall_score(&self.scores.categories, target)?;
        let mut attributes = self.attributes.clone();
        for (category, score) in categories.iter() {
            let ratings = attributes.ratings(calculator.rules(), category);
            let rescaled = calculator.set_category_score(&ratings, score as i64)?;
            attributes.replace_group(calculator.rules(), category, &rescaled);
        }
        self.commit(calculator, attributes)
    }

    fn commit(
        &mut self,
        calculator: &ScoreCalculator,
        attributes: AttributeSet,
    ) -> Result<ScoreCard> {
        self.scores = calculator.score_card(&attributes)?;
        self.attributes = attributes;
        Ok(self.scores)
    }
}
