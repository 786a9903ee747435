use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::Serialize;

use crate::config::LeagueConfig;
use crate::error::{LeagueError, Result};
use crate::league::LeagueService;
use crate::model::{Team, TeamId};
use crate::prediction::PredictionEngine;
use crate::standings::calculate_standings;
use crate::store::{LeagueStore, MemoryStore};

#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub seasons: usize,
    pub check_week: u32,
    // Mean over seasons of the squared error summed across teams.
    pub brier: f64,
    // Share of seasons the top predicted team won (or shared) the title.
    pub favourite_hit_rate: f64,
    pub mean_prediction: HashMap<TeamId, f64>,
    pub title_share: HashMap<TeamId, f64>,
}

struct SeasonSample {
    predicted: HashMap<TeamId, f64>,
    champions: Vec<TeamId>,
}

/// Play `seasons` independent seeded seasons and score the week-`check_week`
/// forecast against who actually finished top.
pub fn run_sweep(
    config: &LeagueConfig,
    teams: &[Team],
    seasons: usize,
    base_seed: u64,
    check_week: u32,
) -> Result<SweepReport> {
    config.validate()?;
    if check_week < config.prediction_start_week || check_week >= config.total_weeks {
        return Err(LeagueError::InvalidConfig(format!(
            "check week {check_week} must be in [{}, {})",
            config.prediction_start_week, config.total_weeks
        )));
    }

    let samples = (0..seasons)
        .into_par_iter()
        .map(|i| play_season(config, teams, base_seed.wrapping_add(i as u64), check_week))
        .collect::<Result<Vec<_>>>()?;

    Ok(summarize(teams, &samples, check_week))
}

fn play_season(
    config: &LeagueConfig,
    teams: &[Team],
    seed: u64,
    check_week: u32,
) -> Result<SeasonSample> {
    let rng = StdRng::seed_from_u64(seed);
    let mut service = LeagueService::new(config.clone(), MemoryStore::new(), rng)?;
    let league_id = service.create_league("sweep", teams)?;

    let mut predicted = HashMap::new();
    while let Some(report) = service.simulate_week(league_id)? {
        if report.week == check_week {
            predicted = report.predictions.unwrap_or_default();
        }
    }

    let league = service.store().load_league(league_id)?;
    let standings = calculate_standings(&league.teams, &league.matches, config);
    let finals = PredictionEngine::new(config)
        .calculate(league.current_week, &standings)
        .unwrap_or_default();
    let champions = finals
        .into_iter()
        .filter(|(_, pct)| *pct >= 100.0)
        .map(|(id, _)| id)
        .collect();

    Ok(SeasonSample {
        predicted,
        champions,
    })
}

fn summarize(teams: &[Team], samples: &[SeasonSample], check_week: u32) -> SweepReport {
    let n = samples.len().max(1) as f64;
    let mut brier_sum = 0.0_f64;
    let mut hits = 0.0_f64;
    let mut mean_prediction: HashMap<TeamId, f64> = teams.iter().map(|t| (t.id, 0.0)).collect();
    let mut title_share: HashMap<TeamId, f64> = teams.iter().map(|t| (t.id, 0.0)).collect();

    for sample in samples {
        // A shared title splits the outcome evenly.
        let share = 1.0 / sample.champions.len().max(1) as f64;
        for team in teams {
            let p = sample.predicted.get(&team.id).copied().unwrap_or(0.0) / 100.0;
            let y = if sample.champions.contains(&team.id) { share } else { 0.0 };
            brier_sum += (p - y).powi(2);
            *mean_prediction.entry(team.id).or_default() += p * 100.0;
            *title_share.entry(team.id).or_default() += y;
        }

        let favourite = sample
            .predicted
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(id, _)| *id);
        if favourite.is_some_and(|id| sample.champions.contains(&id)) {
            hits += 1.0;
        }
    }

    for v in mean_prediction.values_mut() {
        *v /= n;
    }
    for v in title_share.values_mut() {
        *v /= n;
    }

    SweepReport {
        seasons: samples.len(),
        check_week,
        brier: brier_sum / n,
        favourite_hit_rate: hits / n,
        mean_prediction,
        title_share,
    }
}
