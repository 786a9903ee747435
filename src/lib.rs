pub mod config;
pub mod error;
pub mod fixtures;
pub mod league;
pub mod model;
pub mod prediction;
pub mod roster;
pub mod simulator;
pub mod sqlite_store;
pub mod standings;
pub mod status;
pub mod store;
pub mod sweep;

pub use config::LeagueConfig;
pub use error::{LeagueError, Result};
pub use league::{LeagueOverview, LeagueService, PredictionHistory, WeekReport};
pub use model::{LeagueId, LeagueState, Match, Prediction, Team, TeamId};
