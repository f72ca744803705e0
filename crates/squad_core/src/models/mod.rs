pub mod attributes;
pub mod player;
pub mod scores;

pub use attributes::{AttributeSet, Rating};
pub use player::{Player, PlayerId, PlayerRecord, Position};
pub use scores::{Category, CategoryScores, Score, ScoreCard};
