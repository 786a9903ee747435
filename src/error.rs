use thiserror::Error;

use crate::model::{LeagueId, TeamId};

pub type Result<T> = std::result::Result<T, LeagueError>;

#[derive(Debug, Error)]
pub enum LeagueError {
    #[error("invalid league config: {0}")]
    InvalidConfig(String),

    #[error("invalid roster size: expected {expected} teams, found {found}")]
    InvalidRoster { expected: usize, found: usize },

    #[error("team {0} appears more than once in the roster")]
    DuplicateTeam(TeamId),

    #[error("unknown team id {0}")]
    UnknownTeam(TeamId),

    #[error("league {0} not found")]
    LeagueNotFound(LeagueId),

    // Another advance already moved the league past the week we read.
    #[error("league {league_id} is at week {found}, expected week {expected}")]
    StaleWeek {
        league_id: LeagueId,
        expected: u32,
        found: u32,
    },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
