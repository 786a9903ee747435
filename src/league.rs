use std::collections::{HashMap, HashSet};

use log::{info, warn};
use rand::Rng;
use serde::Serialize;

use crate::config::LeagueConfig;
use crate::error::{LeagueError, Result};
use crate::fixtures::FixtureScheduler;
use crate::model::{LeagueId, LeagueState, Match, Prediction, Team, TeamId};
use crate::prediction::PredictionEngine;
use crate::simulator::MatchSimulator;
use crate::standings::{Standing, attach_predictions, calculate_standings};
use crate::status::LeagueProgress;
use crate::store::LeagueStore;

/// How much of the prediction series `simulate_all` writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PredictionHistory {
    // A snapshot for every week past the threshold that gets stepped through.
    #[default]
    EveryWeek,
    // One snapshot, computed after the last simulated week.
    FinalWeekOnly,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekReport {
    pub week: u32,
    pub results: Vec<Match>,
    pub predictions: Option<HashMap<TeamId, f64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeagueOverview {
    pub league: LeagueState,
    pub standings: Vec<Standing>,
    pub progress: LeagueProgress,
}

/// Drives one store through the season. Each call runs to completion before
/// the next; a week's results are committed with a compare-and-set on the
/// week counter so two services sharing a database cannot both play it.
pub struct LeagueService<S, R> {
    config: LeagueConfig,
    store: S,
    rng: R,
}

impl<S: LeagueStore, R: Rng> LeagueService<S, R> {
    pub fn new(config: LeagueConfig, store: S, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, store, rng })
    }

    pub fn config(&self) -> &LeagueConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn create_league(&mut self, name: &str, teams: &[Team]) -> Result<LeagueId> {
        if teams.len() != self.config.teams_per_league {
            return Err(LeagueError::InvalidRoster {
                expected: self.config.teams_per_league,
                found: teams.len(),
            });
        }
        let mut seen = HashSet::new();
        for team in teams {
            if !seen.insert(team.id) {
                return Err(LeagueError::DuplicateTeam(team.id));
            }
        }

        let ids: Vec<TeamId> = teams.iter().map(|t| t.id).collect();
        let schedule = FixtureScheduler::new(&self.config).pack(&ids, &mut self.rng);
        let league_id = self.store.insert_league(name, teams, &schedule.matches)?;
        info!(
            "created league {league_id} '{name}' with {} fixtures over {} weeks",
            schedule.matches.len(),
            self.config.total_weeks
        );
        Ok(league_id)
    }

    /// Play the next week. `None` when the season is already over.
    pub fn simulate_week(&mut self, league_id: LeagueId) -> Result<Option<WeekReport>> {
        self.advance_one(league_id, true)
    }

    pub fn simulate_all(
        &mut self,
        league_id: LeagueId,
        history: PredictionHistory,
    ) -> Result<Vec<WeekReport>> {
        let per_week = history == PredictionHistory::EveryWeek;
        let mut reports = Vec::new();
        while let Some(report) = self.advance_one(league_id, per_week)? {
            reports.push(report);
        }
        if !per_week
            && !reports.is_empty()
            && let Some(predictions) = self.refresh_predictions(league_id)?
            && let Some(last) = reports.last_mut()
        {
            last.predictions = Some(predictions);
        }
        Ok(reports)
    }

    /// Recompute and store predictions for the league's current week.
    pub fn refresh_predictions(&mut self, league_id: LeagueId) -> Result<Option<HashMap<TeamId, f64>>> {
        let league = self.store.load_league(league_id)?;
        let standings = calculate_standings(&league.teams, &league.matches, &self.config);
        let engine = PredictionEngine::new(&self.config);
        let Some(predictions) = engine.calculate(league.current_week, &standings) else {
            return Ok(None);
        };
        self.store
            .upsert_predictions(league_id, league.current_week, &predictions)?;
        Ok(Some(predictions))
    }

    pub fn reset_league(&mut self, league_id: LeagueId) -> Result<()> {
        self.store.reset_league(league_id)?;
        info!("reset league {league_id}");
        Ok(())
    }

    pub fn league_overview(&self, league_id: LeagueId) -> Result<LeagueOverview> {
        let league = self.store.load_league(league_id)?;
        let mut standings = calculate_standings(&league.teams, &league.matches, &self.config);
        let stored = self
            .store
            .predictions_for_week(league_id, league.current_week)?;
        attach_predictions(&mut standings, &stored);
        let progress = LeagueProgress::new(league.current_week, self.config.total_weeks);
        Ok(LeagueOverview {
            league,
            standings,
            progress,
        })
    }

    pub fn prediction_history(&self, league_id: LeagueId) -> Result<Vec<Prediction>> {
        self.store.prediction_history(league_id)
    }

    fn advance_one(&mut self, league_id: LeagueId, write_predictions: bool) -> Result<Option<WeekReport>> {
        let league = self.store.load_league(league_id)?;
        if league.current_week >= self.config.total_weeks {
            return Ok(None);
        }
        let week = league.current_week + 1;

        let simulator = MatchSimulator::new(&self.config);
        let mut results = Vec::new();
        for fixture in league.matches_in_week(week) {
            if fixture.is_played() {
                continue;
            }
            let (Some(home), Some(away)) = (
                league.team(fixture.home_team_id),
                league.team(fixture.away_team_id),
            ) else {
                warn!(
                    "league {league_id} week {week}: fixture {} v {} references an unknown team",
                    fixture.home_team_id, fixture.away_team_id
                );
                continue;
            };
            let mut played = fixture.clone();
            simulator.play(&mut played, home, away, &mut self.rng);
            results.push(played);
        }
        // Claims the week and writes its results together; a failure leaves
        // the league on the week it started from.
        self.store
            .commit_week(league_id, league.current_week, week, &results)?;
        info!(
            "league {league_id}: week {week} simulated ({} matches)",
            results.len()
        );

        let predictions = if write_predictions {
            self.refresh_predictions(league_id)?
        } else {
            None
        };

        Ok(Some(WeekReport {
            week,
            results,
            predictions,
        }))
    }
}
