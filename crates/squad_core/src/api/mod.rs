pub mod json_api;

pub use json_api::{
    allocate_teams_json, score_player_json, AllocateRequest, AllocateResponse, RosterEntryData,
    ScoreEdit, ScoreRequest, ScoreResponse, SCHEMA_VERSION,
};
