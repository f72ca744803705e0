use serde::{Deserialize, Serialize};

use crate::allocation::{
    AllocationRequest, AllocationResult, RosterEntry, Shortfall, TeamAllocator, TeamSheet,
};
use crate::error::{error_codes, SquadError};
use crate::models::{Category, Player, PlayerId, PlayerRecord, Position};
use crate::player::{AttributeValidator, ScoreCalculator};

pub const SCHEMA_VERSION: u8 = 1;

fn err_code(code: &str, message: impl std::fmt::Display) -> String {
    format!("{code}: {message}")
}

fn squad_err(err: SquadError) -> String {
    err_code(err.code(), err)
}

fn check_schema(version: u8) -> Result<(), String> {
    if version == SCHEMA_VERSION {
        Ok(())
    } else {
        Err(err_code(
            error_codes::UNSUPPORTED_SCHEMA,
            format!("unsupported schema version: {version}"),
        ))
    }
}

// ============================================================================
// Scoring
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub schema_version: u8,
    pub player: PlayerRecord,
    /// Applied in order; the first failing edit aborts the request.
    #[serde(default)]
    pub edits: Vec<ScoreEdit>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScoreEdit {
    SetAttribute { name: String, value: i64 },
    RebalanceAttribute { name: String, value: i64 },
    SetCategory { category: String, value: i64 },
    SetOverall { value: i64 },
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub schema_version: u8,
    pub player: Player,
}

/// Score a player and apply optional edits.
///
/// Request:
/// ```json
/// { "schema_version": 1,
///   "player": { "id": 7, "name": "...", "position": "Forward",
///               "attributes": { "pace": 18, "finishing": 16 } },
///   "edits": [ { "op": "set_category", "category": "physical", "value": 80 } ] }
/// ```
pub fn score_player_json(request_json: &str) -> Result<String, String> {
    let request: ScoreRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::INVALID_REQUEST, format!("invalid JSON request: {e}")))?;
    check_schema(request.schema_version)?;

    let calculator = ScoreCalculator::default();
    let mut player = Player::from_record(&calculator, request.player).map_err(squad_err)?;

    for edit in &request.edits {
        apply_edit(&calculator, &mut player, edit)?;
    }

    let response = ScoreResponse { schema_version: SCHEMA_VERSION, player };
    serde_json::to_string(&response)
        .map_err(|e| err_code(error_codes::INVALID_REQUEST, format!("serialization failed: {e}")))
}

fn apply_edit(
    calculator: &ScoreCalculator,
    player: &mut Player,
    edit: &ScoreEdit,
) -> Result<(), String> {
    match edit {
        ScoreEdit::SetAttribute { name, value } => player.set_attribute(calculator, name, *value),
        ScoreEdit::RebalanceAttribute { name, value } => {
            player.rebalance_attribute(calculator, name, *value)
        }
        ScoreEdit::SetCategory { category, value } => {
            let category: Category = category
                .parse()
                .map_err(|e: String| err_code(error_codes::INVALID_REQUEST, e))?;
            player.set_category_score(calculator, category, *value)
        }
        ScoreEdit::SetOverall { value } => player.set_overall_score(calculator, *value),
    }
    .map(|_| ())
    .map_err(squad_err)
}

// ============================================================================
// Allocation
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AllocateRequest {
    pub schema_version: u8,
    /// Pre-scored roster entries.
    #[serde(default)]
    pub roster: Vec<RosterEntryData>,
    /// Full players, scored before allocation and appended to the roster.
    #[serde(default)]
    pub players: Vec<PlayerRecord>,
    pub team_count: i64,
    pub capacity: i64,
}

#[derive(Debug, Deserialize)]
pub struct RosterEntryData {
    pub id: PlayerId,
    /// Full name or short code ("GK", "DF", "MF", "FW").
    pub position: String,
    pub overall: i64,
}

#[derive(Debug, Serialize)]
pub struct AllocateResponse {
    pub schema_version: u8,
    pub teams: Vec<TeamSheet>,
    pub shortfalls: Vec<Shortfall>,
    pub score_gap: u32,
    pub underfilled: bool,
    pub iterations: usize,
    pub converged: bool,
}

impl From<AllocationResult> for AllocateResponse {
    fn from(result: AllocationResult) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            score_gap: result.score_gap(),
            underfilled: result.is_underfilled(),
            teams: result.teams,
            shortfalls: result.shortfalls,
            iterations: result.iterations,
            converged: result.converged,
        }
    }
}

/// Split a roster into one or two teams.
///
/// Request:
/// ```json
/// { "schema_version": 1, "team_count": 2, "capacity": 11,
///   "roster": [ { "id": 1, "position": "GK", "overall": 120 } ] }
/// ```
pub fn allocate_teams_json(request_json: &str) -> Result<String, String> {
    let request: AllocateRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::INVALID_REQUEST, format!("invalid JSON request: {e}")))?;
    check_schema(request.schema_version)?;

    let allocator = TeamAllocator::default();
    let calculator = ScoreCalculator::default();

    let team_count = usize::try_from(request.team_count)
        .map_err(|_| squad_err(SquadError::InvalidTeamCount(request.team_count)))?;
    let capacity = usize::try_from(request.capacity)
        .map_err(|_| squad_err(SquadError::InvalidCapacity(request.capacity)))?;

    let mut roster = Vec::with_capacity(request.roster.len() + request.players.len());
    for data in request.roster {
        roster.push(convert_entry(&calculator, data)?);
    }
    for record in request.players {
        let player = Player::from_record(&calculator, record).map_err(squad_err)?;
        roster.push(RosterEntry::from(&player));
    }

    let result = allocator
        .allocate(&AllocationRequest::new(roster, team_count, capacity))
        .map_err(squad_err)?;

    serde_json::to_string(&AllocateResponse::from(result))
        .map_err(|e| err_code(error_codes::INVALID_REQUEST, format!("serialization failed: {e}")))
}

fn convert_entry(
    calculator: &ScoreCalculator,
    data: RosterEntryData,
) -> Result<RosterEntry, String> {
    let position: Position = data
        .position
        .parse()
        .map_err(|e: String| {
            err_code(error_codes::INVALID_REQUEST, format!("player {}: {e}", data.id))
        })?;
    let overall =
        AttributeValidator::validate_overall(calculator.rules(), data.overall).map_err(squad_err)?;
    Ok(RosterEntry::new(data.id, position, overall))
}
