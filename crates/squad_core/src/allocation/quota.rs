use crate::models::Position;
use crate::rules::AllocationRules;
use serde::{Deserialize, Serialize};

/// Guards the floor against ratios such as 0.35 * 20 landing a hair below 7.
const RATIO_EPSILON: f64 = 1e-9;

/// Target starter count per position for one team.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PositionQuota {
    pub goalkeepers: usize,
    pub defenders: usize,
    pub midfielders: usize,
    pub forwards: usize,
}

impl PositionQuota {
    /// Goalkeepers first, then floor(ratio * outfield) defenders and
    /// midfielders; forwards take the remainder so the quota sums to capacity.
    pub fn for_capacity(capacity: usize, rules: &AllocationRules) -> Self {
        let goalkeepers = rules.goalkeepers_per_team.min(capacity);
        let outfield = capacity - goalkeepers;
        let share = |ratio: f64| (outfield as f64 * ratio + RATIO_EPSILON).floor() as usize;

        let defenders = share(rules.defender_ratio).min(outfield);
        let midfielders = share(rules.midfielder_ratio).min(outfield - defenders);
        let forwards = outfield - defenders - midfielders;

        Self { goalkeepers, defenders, midfielders, forwards }
    }

    pub fn get(&self, position: Position) -> usize {
        match position {
            Position::Goalkeeper => self.goalkeepers,
            Position::Defender => self.defenders,
            Position::Midfielder => self.midfielders,
            Position::Forward => self.forwards,
        }
    }

    pub fn total(&self) -> usize {
        self.goalkeepers + self.defenders + self.midfielders + self.forwards
    }

    pub fn outfield(&self) -> usize {
        self.total() - self.goalkeepers
    }
}
