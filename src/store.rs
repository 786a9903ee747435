use std::collections::{BTreeMap, HashMap};

use crate::error::{LeagueError, Result};
use crate::model::{LeagueId, LeagueState, Match, Prediction, Team, TeamId};

/// Persistence seam for leagues, their matches and the prediction series.
pub trait LeagueStore {
    fn insert_league(&mut self, name: &str, teams: &[Team], matches: &[Match]) -> Result<LeagueId>;

    fn load_league(&self, league_id: LeagueId) -> Result<LeagueState>;

    /// Move `current_week` from `from` to `to` and overwrite scores for the
    /// given (home, away) fixtures as one unit. Fails with
    /// [`LeagueError::StaleWeek`] if the stored week is no longer `from`; on
    /// any error neither the week nor the scores change.
    fn commit_week(&mut self, league_id: LeagueId, from: u32, to: u32, results: &[Match]) -> Result<()>;

    /// Unplay every match, rewind to week 0 and drop the prediction series,
    /// all or nothing.
    fn reset_league(&mut self, league_id: LeagueId) -> Result<()>;

    fn upsert_predictions(
        &mut self,
        league_id: LeagueId,
        week: u32,
        percentages: &HashMap<TeamId, f64>,
    ) -> Result<()>;

    fn predictions_for_week(&self, league_id: LeagueId, week: u32) -> Result<HashMap<TeamId, f64>>;

    /// Every stored prediction for the league, ordered by week then team.
    fn prediction_history(&self, league_id: LeagueId) -> Result<Vec<Prediction>>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    next_id: LeagueId,
    leagues: HashMap<LeagueId, LeagueState>,
    predictions: HashMap<LeagueId, BTreeMap<(u32, TeamId), f64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn league_mut(&mut self, league_id: LeagueId) -> Result<&mut LeagueState> {
        self.leagues
            .get_mut(&league_id)
            .ok_or(LeagueError::LeagueNotFound(league_id))
    }
}

impl LeagueStore for MemoryStore {
    fn insert_league(&mut self, name: &str, teams: &[Team], matches: &[Match]) -> Result<LeagueId> {
        self.next_id += 1;
        let id = self.next_id;
        self.leagues.insert(
            id,
            LeagueState {
                id,
                name: name.to_string(),
                teams: teams.to_vec(),
                current_week: 0,
                matches: matches.to_vec(),
            },
        );
        Ok(id)
    }

    fn load_league(&self, league_id: LeagueId) -> Result<LeagueState> {
        self.leagues
            .get(&league_id)
            .cloned()
            .ok_or(LeagueError::LeagueNotFound(league_id))
    }

    fn commit_week(&mut self, league_id: LeagueId, from: u32, to: u32, results: &[Match]) -> Result<()> {
        let league = self.league_mut(league_id)?;
        if league.current_week != from {
            return Err(LeagueError::StaleWeek {
                league_id,
                expected: from,
                found: league.current_week,
            });
        }
        // Nothing below can fail.
        for updated in results {
            if let Some(stored) = league.matches.iter_mut().find(|m| {
                m.home_team_id == updated.home_team_id && m.away_team_id == updated.away_team_id
            }) {
                stored.score = updated.score;
            }
        }
        league.current_week = to;
        Ok(())
    }

    fn reset_league(&mut self, league_id: LeagueId) -> Result<()> {
        let league = self.league_mut(league_id)?;
        league.current_week = 0;
        for m in &mut league.matches {
            m.clear_result();
        }
        self.predictions.remove(&league_id);
        Ok(())
    }

    fn upsert_predictions(
        &mut self,
        league_id: LeagueId,
        week: u32,
        percentages: &HashMap<TeamId, f64>,
    ) -> Result<()> {
        if !self.leagues.contains_key(&league_id) {
            return Err(LeagueError::LeagueNotFound(league_id));
        }
        let series = self.predictions.entry(league_id).or_default();
        for (team_id, pct) in percentages {
            series.insert((week, *team_id), *pct);
        }
        Ok(())
    }

    fn predictions_for_week(&self, league_id: LeagueId, week: u32) -> Result<HashMap<TeamId, f64>> {
        Ok(self
            .predictions
            .get(&league_id)
            .map(|series| {
                series
                    .iter()
                    .filter(|((w, _), _)| *w == week)
                    .map(|((_, team_id), pct)| (*team_id, *pct))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn prediction_history(&self, league_id: LeagueId) -> Result<Vec<Prediction>> {
        Ok(self
            .predictions
            .get(&league_id)
            .map(|series| {
                series
                    .iter()
                    .map(|((week, team_id), pct)| Prediction {
                        league_id,
                        week: *week,
                        team_id: *team_id,
                        percentage: *pct,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}
