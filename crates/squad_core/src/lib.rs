//! # squad_core - Player Scoring and Team Allocation
//!
//! This library derives football player ratings from attribute sheets and
//! splits rosters into balanced teams.
//!
//! ## Features
//! - Attribute → category → overall scoring with integer half-up rounding
//! - Inverse edits that redistribute a target score back onto attributes
//! - Position-quota team allocation with swap-based score balancing
//! - JSON API for easy integration

pub mod allocation;
pub mod api;
pub mod error;
pub mod models;
pub mod player;
pub mod rules;

pub use allocation::{
    allocate_teams, AllocationRequest, AllocationResult, PositionQuota, RosterEntry, Shortfall,
    TeamAllocator, TeamSheet,
};
pub use api::{allocate_teams_json, score_player_json, SCHEMA_VERSION};
pub use error::{Result, SquadError};
pub use models::{
    AttributeSet, Category, CategoryScores, Player, PlayerId, PlayerRecord, Position, Rating,
    Score, ScoreCard,
};
pub use player::{AttributeValidator, ScoreCalculator};
pub use rules::{get_rules, SquadRules};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
