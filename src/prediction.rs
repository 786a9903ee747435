use std::collections::HashMap;

use log::debug;

use crate::config::LeagueConfig;
use crate::model::TeamId;
use crate::standings::{Standing, compare_standings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionPhase {
    // Too early in the season; nothing is computed or stored.
    PreThreshold,
    MidSeason { remaining_weeks: u32 },
    SeasonComplete,
}

pub struct PredictionEngine<'a> {
    config: &'a LeagueConfig,
}

impl<'a> PredictionEngine<'a> {
    pub fn new(config: &'a LeagueConfig) -> Self {
        Self { config }
    }

    pub fn phase(&self, current_week: u32) -> PredictionPhase {
        if current_week < self.config.prediction_start_week {
            PredictionPhase::PreThreshold
        } else if current_week >= self.config.total_weeks {
            PredictionPhase::SeasonComplete
        } else {
            PredictionPhase::MidSeason {
                remaining_weeks: self.config.total_weeks - current_week,
            }
        }
    }

    /// Championship percentage per team for `current_week`, or `None` before
    /// the prediction threshold. `standings` need not be sorted.
    pub fn calculate(
        &self,
        current_week: u32,
        standings: &[Standing],
    ) -> Option<HashMap<TeamId, f64>> {
        if standings.is_empty() {
            return None;
        }
        let out = match self.phase(current_week) {
            PredictionPhase::PreThreshold => return None,
            PredictionPhase::SeasonComplete => final_table(standings),
            PredictionPhase::MidSeason { remaining_weeks } => {
                self.mid_season(standings, remaining_weeks)
            }
        };
        debug!("week {current_week} predictions: {out:?}");
        Some(out)
    }

    /// Whether `standing` can still reach the current top points total.
    pub fn in_contention(&self, standing: &Standing, leader_points: u32, remaining_weeks: u32) -> bool {
        let ceiling = standing.points + remaining_weeks * self.config.points_for_win;
        ceiling >= leader_points
    }

    fn mid_season(&self, standings: &[Standing], remaining_weeks: u32) -> HashMap<TeamId, f64> {
        let leader_points = standings.iter().map(|s| s.points).max().unwrap_or(0);

        let mut contenders: Vec<&Standing> = standings
            .iter()
            .filter(|s| self.in_contention(s, leader_points, remaining_weeks))
            .collect();
        contenders.sort_by(|a, b| compare_standings(a, b));

        let mut out: HashMap<TeamId, f64> = standings.iter().map(|s| (s.team_id, 0.0)).collect();

        if contenders.len() == 1 {
            out.insert(contenders[0].team_id, 100.0);
            return out;
        }

        let scores = self.weighted_scores(&contenders);
        let score_sum: f64 = scores.iter().sum();
        let mut pcts: Vec<f64> = if score_sum > 0.0 {
            scores.iter().map(|s| s / score_sum * 100.0).collect()
        } else {
            vec![100.0 / contenders.len() as f64; contenders.len()]
        };

        enforce_points_order(&contenders, &mut pcts);

        for (standing, pct) in contenders.iter().zip(pcts) {
            out.insert(standing.team_id, round2(pct));
        }
        out
    }

    fn weighted_scores(&self, contenders: &[&Standing]) -> Vec<f64> {
        let cfg = self.config;
        let total_points = (contenders.iter().map(|s| s.points).sum::<u32>() as f64).max(1.0);
        let total_gf = (contenders.iter().map(|s| s.goals_for).sum::<u32>() as f64).max(1.0);
        let total_ga = (contenders.iter().map(|s| s.goals_against).sum::<u32>() as f64).max(1.0);

        contenders
            .iter()
            .map(|s| {
                let points_share = s.points as f64 / total_points;
                let goals_for_share = s.goals_for as f64 / total_gf;
                // Fewer goals conceded scores higher.
                let goals_against_share = 1.0 - s.goals_against as f64 / total_ga;
                points_share * cfg.points_weight
                    + goals_for_share * cfg.goals_for_weight
                    + goals_against_share * cfg.goals_against_weight
            })
            .collect()
    }
}

/// Everyone level with the top side on points, goal difference and goals for
/// is champion (100%); the rest get 0%.
fn final_table(standings: &[Standing]) -> HashMap<TeamId, f64> {
    let Some(top) = standings
        .iter()
        .min_by(|a, b| compare_standings(a, b))
    else {
        return HashMap::new();
    };
    standings
        .iter()
        .map(|s| {
            let pct = if compare_standings(top, s).is_eq() { 100.0 } else { 0.0 };
            (s.team_id, pct)
        })
        .collect()
}

/// Walk adjacent contenders (sorted best first) and swap percentages whenever a
/// side with fewer points is rated above the side directly ahead of it. Passes
/// repeat until a full walk makes no swap.
fn enforce_points_order(contenders: &[&Standing], pcts: &mut [f64]) {
    loop {
        let mut swapped = false;
        for i in 1..contenders.len() {
            if contenders[i].points < contenders[i - 1].points && pcts[i] > pcts[i - 1] {
                pcts.swap(i, i - 1);
                swapped = true;
            }
        }
        if !swapped {
            break;
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
