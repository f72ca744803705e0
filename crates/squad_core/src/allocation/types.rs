use super::quota::PositionQuota;
use crate::models::{Player, PlayerId, Position, Score};
use serde::{Deserialize, Serialize};

/// What the allocation engine needs to know about a player.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RosterEntry {
    pub id: PlayerId,
    pub position: Position,
    pub overall: Score,
}

impl RosterEntry {
    pub fn new(id: PlayerId, position: Position, overall: Score) -> Self {
        Self { id, position, overall }
    }
}

impl From<&Player> for RosterEntry {
    fn from(player: &Player) -> Self {
        Self { id: player.id, position: player.position, overall: player.overall() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub roster: Vec<RosterEntry>,
    pub team_count: usize,
    pub capacity: usize,
}

impl AllocationRequest {
    pub fn new(roster: Vec<RosterEntry>, team_count: usize, capacity: usize) -> Self {
        Self { roster, team_count, capacity }
    }
}

/// One team's lineup after allocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamSheet {
    pub index: usize,
    pub quota: PositionQuota,
    /// Ordered by position, then by overall score descending.
    pub starters: Vec<RosterEntry>,
    /// Ordered by overall score descending.
    pub substitutes: Vec<RosterEntry>,
    /// Sum of the starters' overall scores; substitutes are excluded.
    pub total_score: u32,
    /// Starter slots left empty because the roster ran out.
    pub open_slots: usize,
}

impl TeamSheet {
    pub fn count(&self, position: Position) -> usize {
        self.starters.iter().filter(|p| p.position == position).count()
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.starters.iter().chain(&self.substitutes).any(|p| p.id == id)
    }
}

/// A position quota that players of that position could not fill.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Shortfall {
    pub team: usize,
    pub position: Position,
    pub required: usize,
    pub filled: usize,
}

impl Shortfall {
    pub fn missing(&self) -> usize {
        self.required - self.filled
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AllocationResult {
    pub capacity: usize,
    pub teams: Vec<TeamSheet>,
    /// Quota gaps by position. Outfield gaps may have been covered by
    /// players of another outfield position; `open_slots` says whether they were.
    pub shortfalls: Vec<Shortfall>,
    /// Swaps applied while rebalancing.
    pub iterations: usize,
    /// False only when the iteration cap stopped rebalancing early.
    pub converged: bool,
}

impl AllocationResult {
    /// At least one team has fewer starters than its capacity.
    pub fn is_underfilled(&self) -> bool {
        self.teams.iter().any(|t| t.open_slots > 0)
    }

    pub fn has_shortfalls(&self) -> bool {
        !self.shortfalls.is_empty()
    }

    /// Absolute difference of the two starter totals; zero for a single team.
    pub fn score_gap(&self) -> u32 {
        match self.teams.as_slice() {
            [a, b] => a.total_score.abs_diff(b.total_score),
            _ => 0,
        }
    }

    pub fn substitute_count(&self) -> usize {
        self.teams.iter().map(|t| t.substitutes.len()).sum()
    }

    pub fn team_of(&self, id: PlayerId) -> Option<usize> {
        self.teams.iter().find(|t| t.contains(id)).map(|t| t.index)
    }
}
