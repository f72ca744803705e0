use thiserror::Error;

/// Input-validation failures raised by the scoring and allocation engines.
///
/// Every variant is a contract violation by the caller. Roster shortfalls and
/// clamping residuals are not errors; they are reported on the results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SquadError {
    #[error("Invalid attribute {attribute}: {value}. Must be between {min} and {max}")]
    InvalidAttributeRange { attribute: String, value: i64, min: u16, max: u16 },

    #[error("Invalid category score: {value}. Must be between {min} and {max}")]
    InvalidCategoryRange { value: i64, min: u16, max: u16 },

    #[error("Invalid overall score: {value}. Must be between {min} and {max}")]
    InvalidOverallRange { value: i64, min: u16, max: u16 },

    #[error("Invalid team count: {0}. Must be 1 or 2")]
    InvalidTeamCount(i64),

    #[error("Invalid team capacity: {0}. Must be at least 1")]
    InvalidCapacity(i64),

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Attribute group is empty")]
    EmptyGroup,

    #[error("Player {0} appears more than once in the roster")]
    DuplicatePlayer(u32),

    #[error("Invalid rules table: {0}")]
    InvalidRules(String),
}

impl SquadError {
    /// Stable machine-readable code used at the JSON boundary.
    pub fn code(&self) -> &'static str {
        match self {
            SquadError::InvalidAttributeRange { .. } => error_codes::INVALID_ATTRIBUTE_RANGE,
            SquadError::InvalidCategoryRange { .. } => error_codes::INVALID_CATEGORY_RANGE,
            SquadError::InvalidOverallRange { .. } => error_codes::INVALID_OVERALL_RANGE,
            SquadError::InvalidTeamCount(_) => error_codes::INVALID_TEAM_COUNT,
            SquadError::InvalidCapacity(_) => error_codes::INVALID_CAPACITY,
            SquadError::UnknownAttribute(_) => error_codes::UNKNOWN_ATTRIBUTE,
            SquadError::EmptyGroup => error_codes::EMPTY_GROUP,
            SquadError::DuplicatePlayer(_) => error_codes::DUPLICATE_PLAYER,
            SquadError::InvalidRules(_) => error_codes::INVALID_RULES,
        }
    }
}

pub mod error_codes {
    pub const INVALID_ATTRIBUTE_RANGE: &str = "INVALID_ATTRIBUTE_RANGE";
    pub const INVALID_CATEGORY_RANGE: &str = "INVALID_CATEGORY_RANGE";
    pub const INVALID_OVERALL_RANGE: &str = "INVALID_OVERALL_RANGE";
    pub const INVALID_TEAM_COUNT: &str = "INVALID_TEAM_COUNT";
    pub const INVALID_CAPACITY: &str = "INVALID_CAPACITY";
    pub const UNKNOWN_ATTRIBUTE: &str = "UNKNOWN_ATTRIBUTE";
    pub const EMPTY_GROUP: &str = "EMPTY_GROUP";
    pub const DUPLICATE_PLAYER: &str = "DUPLICATE_PLAYER";
    pub const INVALID_RULES: &str = "INVALID_RULES";
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const UNSUPPORTED_SCHEMA: &str = "UNSUPPORTED_SCHEMA";
}

pub type Result<T> = std::result::Result<T, SquadError>;
