//! Team allocation
//!
//! Phases, in order:
//! 1. rank the roster by overall score (ties keep input order)
//! 2. bucket by position
//! 3. compute the per-team position quota
//! 4. deal each bucket round-robin across teams up to the quota
//! 5. collect what no quota could absorb as overflow
//! 6. optionally backfill open outfield slots from outfield overflow
//! 7. with two teams, swap same-position starters while the score gap shrinks
//! 8. alternate the remaining overflow into substitute lists

use super::quota::PositionQuota;
use super::types::{AllocationRequest, AllocationResult, RosterEntry, Shortfall, TeamSheet};
use crate::error::{Result, SquadError};
use crate::models::Position;
use crate::player::validation::AttributeValidator;
use crate::rules::{get_rules, SquadRules};
use itertools::Itertools;
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// A roster entry tagged with its place in the score ranking.
#[derive(Debug, Clone, Copy)]
struct Ranked {
    rank: usize,
    entry: RosterEntry,
}

#[derive(Debug, Default)]
struct Lineup {
    starters: Vec<Ranked>,
    total: u32,
}

impl Lineup {
    fn push(&mut self, player: Ranked) {
        self.total += player.entry.overall as u32;
        self.starters.push(player);
    }

    fn count(&self, position: Position) -> usize {
        self.starters.iter().filter(|p| p.entry.position == position).count()
    }

    fn outfield_count(&self) -> usize {
        self.starters.iter().filter(|p| p.entry.position.is_outfield()).count()
    }
}

/// Partitions a roster into balanced teams.
#[derive(Debug, Clone, Copy)]
pub struct TeamAllocator<'a> {
    rules: &'a SquadRules,
}

impl Default for TeamAllocator<'static> {
    fn default() -> Self {
        Self::new(get_rules())
    }
}

impl<'a> TeamAllocator<'a> {
    pub fn new(rules: &'a SquadRules) -> Self {
        Self { rules }
    }

    pub fn allocate(&self, request: &AllocationRequest) -> Result<AllocationResult> {
        self.validate(request)?;
        let team_count = request.team_count;
        let capacity = request.capacity;

        let ranked = rank_roster(&request.roster);
        let quota = PositionQuota::for_capacity(capacity, &self.rules.allocation);
        debug!(?quota, team_count, roster = ranked.len(), "allocation started");

        let mut lineups: Vec<Lineup> = (0..team_count).map(|_| Lineup::default()).collect();
        let mut overflow = Vec::new();
        let mut shortfalls = Vec::new();

        for (position, bucket) in Position::ALL.into_iter().zip(bucket_by_position(&ranked)) {
            let required = quota.get(position);
            let mut next_team = 0;
            for player in bucket {
                let open = (0..team_count)
                    .map(|k| (next_team + k) % team_count)
                    .find(|&t| lineups[t].count(position) < required);
                match open {
                    Some(team) => {
                        lineups[team].push(player);
                        next_team = (team + 1) % team_count;
                    }
                    None => overflow.push(player),
                }
            }

            for (team, lineup) in lineups.iter().enumerate() {
                let filled = lineup.count(position);
                if filled < required {
                    shortfalls.push(Shortfall { team, position, required, filled });
                }
            }
        }
        overflow.sort_by_key(|p| p.rank);

        if self.rules.allocation.backfill_outfield {
            overflow = backfill_outfield(&mut lineups, overflow, quota.outfield());
        }

        let (iterations, converged) = if team_count == 2 {
            self.rebalance(&mut lineups)
        } else {
            (0, true)
        };

        let mut substitutes: Vec<Vec<RosterEntry>> = vec![Vec::new(); team_count];
        for (i, player) in overflow.into_iter().enumerate() {
            substitutes[i % team_count].push(player.entry);
        }

        let teams: Vec<TeamSheet> = lineups
            .into_iter()
            .zip(substitutes)
            .enumerate()
            .map(|(index, (lineup, substitutes))| {
                let starters: Vec<RosterEntry> = lineup
                    .starters
                    .iter()
                    .sorted_by_key(|p| (p.entry.position, p.rank))
                    .map(|p| p.entry)
                    .collect();
                TeamSheet {
                    index,
                    quota,
                    open_slots: capacity.saturating_sub(starters.len()),
                    starters,
                    substitutes,
                    total_score: lineup.total,
                }
            })
            .collect();

        let result = AllocationResult { capacity, teams, shortfalls, iterations, converged };

        if result.is_underfilled() {
            warn!(
                open_slots = result.teams.iter().map(|t| t.open_slots).sum::<usize>(),
                "roster too small to fill every starting slot"
            );
        }
        for shortfall in &result.shortfalls {
            debug!(
                team = shortfall.team,
                position = %shortfall.position,
                missing = shortfall.missing(),
                "position quota not met"
            );
        }
        info!(
            teams = team_count,
            gap = result.score_gap(),
            substitutes = result.substitute_count(),
            iterations,
            "teams allocated"
        );

        Ok(result)
    }

    /// Allocate independent requests in parallel.
    pub fn allocate_batch(&self, requests: &[AllocationRequest]) -> Vec<Result<AllocationResult>> {
        requests.par_iter().map(|request| self.allocate(request)).collect()
    }

    fn validate(&self, request: &AllocationRequest) -> Result<()> {
        if !(1..=2).contains(&request.team_count) {
            return Err(SquadError::InvalidTeamCount(request.team_count as i64));
        }
        if request.capacity == 0 {
            return Err(SquadError::InvalidCapacity(0));
        }

        let mut seen = HashSet::with_capacity(request.roster.len());
        for entry in &request.roster {
            AttributeValidator::validate_overall(self.rules, entry.overall as i64)?;
            if !seen.insert(entry.id) {
                return Err(SquadError::DuplicatePlayer(entry.id));
            }
        }
        Ok(())
    }

    /// Apply the best same-position cross-team swap until none narrows the gap.
    fn rebalance(&self, lineups: &mut [Lineup]) -> (usize, bool) {
        let max_iterations = self.rules.allocation.max_rebalance_iterations;
        let (left, right) = lineups.split_at_mut(1);
        let (a, b) = (&mut left[0], &mut right[0]);

        let mut iterations = 0;
        while iterations < max_iterations {
            let Some((i, j)) = best_swap(a, b) else {
                debug!(iterations, gap = a.total.abs_diff(b.total), "rebalancing converged");
                return (iterations, true);
            };
            let (x, y) = (a.starters[i].entry.overall as u32, b.starters[j].entry.overall as u32);
            a.total = a.total - x + y;
            b.total = b.total - y + x;
            std::mem::swap(&mut a.starters[i], &mut b.starters[j]);
            iterations += 1;
        }

        let converged = best_swap(a, b).is_none();
        if !converged {
            warn!(iterations, "rebalancing stopped at the iteration cap");
        }
        (iterations, converged)
    }
}

/// Allocate with the embedded rules table.
pub fn allocate_teams(
    roster: Vec<RosterEntry>,
    team_count: usize,
    capacity: usize,
) -> Result<AllocationResult> {
    TeamAllocator::default().allocate(&AllocationRequest::new(roster, team_count, capacity))
}

/// Sort by overall descending; the stable sort keeps input order for ties.
fn rank_roster(roster: &[RosterEntry]) -> Vec<Ranked> {
    roster
        .iter()
        .sorted_by(|x, y| y.overall.cmp(&x.overall))
        .enumerate()
        .map(|(rank, entry)| Ranked { rank, entry: *entry })
        .collect()
}

fn bucket_by_position(ranked: &[Ranked]) -> [Vec<Ranked>; 4] {
    let mut buckets: [Vec<Ranked>; 4] = Default::default();
    for player in ranked {
        buckets[player.entry.position.index()].push(*player);
    }
    buckets
}

/// Hand outfield overflow to teams with open outfield slots, lowest total
/// first. Goalkeepers are never moved into outfield slots.
fn backfill_outfield(
    lineups: &mut [Lineup],
    overflow: Vec<Ranked>,
    outfield_slots: usize,
) -> Vec<Ranked> {
    let mut remaining = Vec::new();
    for player in overflow {
        if player.entry.position.is_goalkeeper() {
            remaining.push(player);
            continue;
        }
        let target = lineups
            .iter()
            .enumerate()
            .filter(|(_, l)| l.outfield_count() < outfield_slots)
            .min_by_key(|(i, l)| (l.total, *i))
            .map(|(i, _)| i);
        match target {
            Some(team) => {
                debug!(
                    player = player.entry.id,
                    team,
                    position = %player.entry.position,
                    "outfield slot backfilled"
                );
                lineups[team].push(player);
            }
            None => remaining.push(player),
        }
    }
    remaining
}

/// Best gap-reducing swap of two same-position starters, if any.
///
/// Ties keep the first pair in (position, team-0 order, team-1 order).
fn best_swap(a: &Lineup, b: &Lineup) -> Option<(usize, usize)> {
    let gap = a.total as i64 - b.total as i64;
    let mut best_gap = gap.abs();
    let mut best = None;

    for position in Position::ALL {
        let left = a.starters.iter().enumerate().filter(|(_, p)| p.entry.position == position);
        let right = b.starters.iter().enumerate().filter(|(_, p)| p.entry.position == position);
        for ((i, x), (j, y)) in left.cartesian_product(right.collect_vec()) {
            let delta = x.entry.overall as i64 - y.entry.overall as i64;
            let new_gap = (gap - 2 * delta).abs();
            if new_gap < best_gap {
                best_gap = new_gap;
                best = Some((i, j));
            }
        }
    }
    best
}
