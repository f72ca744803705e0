//! Allocation engine
//!
//! Splits a roster into one or two teams of fixed capacity:
//! - PositionQuota derives per-position starter targets from the capacity
//! - TeamAllocator deals players by position, backfills, rebalances
//!   and collects substitutes

pub mod allocator;
pub mod quota;
pub mod types;

pub use allocator::{allocate_teams, TeamAllocator};
pub use quota::PositionQuota;
pub use types::{AllocationRequest, AllocationResult, RosterEntry, Shortfall, TeamSheet};
