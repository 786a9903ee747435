use serde::{Deserialize, Serialize};

pub type TeamId = u32;
pub type LeagueId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    // 0..=100, fixed for the whole season.
    pub strength: u8,
}

impl Team {
    /// Strengths above 100 are clamped to 100. Callers that need to reject
    /// out-of-range input must check before constructing.
    pub fn new(id: TeamId, name: impl Into<String>, strength: u8) -> Self {
        Self {
            id,
            name: name.into(),
            strength: strength.min(100),
        }
    }
}

/// A fixture, or a result once `score` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub week: u32,
    // Home and away goals are set together or not at all.
    pub score: Option<(u32, u32)>,
}

impl Match {
    pub fn fixture(home_team_id: TeamId, away_team_id: TeamId, week: u32) -> Self {
        Self {
            home_team_id,
            away_team_id,
            week,
            score: None,
        }
    }

    pub fn is_played(&self) -> bool {
        self.score.is_some()
    }

    pub fn home_score(&self) -> Option<u32> {
        self.score.map(|(h, _)| h)
    }

    pub fn away_score(&self) -> Option<u32> {
        self.score.map(|(_, a)| a)
    }

    pub fn involves(&self, team_id: TeamId) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    pub fn record_result(&mut self, home_score: u32, away_score: u32) {
        self.score = Some((home_score, away_score));
    }

    pub fn clear_result(&mut self) {
        self.score = None;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueState {
    pub id: LeagueId,
    pub name: String,
    pub teams: Vec<Team>,
    // 0 = not started.
    pub current_week: u32,
    pub matches: Vec<Match>,
}

impl LeagueState {
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn matches_in_week(&self, week: u32) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(move |m| m.week == week)
    }

    pub fn played_matches(&self) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(|m| m.is_played())
    }
}

/// One stored championship percentage for (league, week, team).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub league_id: LeagueId,
    pub week: u32,
    pub team_id: TeamId,
    pub percentage: f64,
}
