use std::env;

use serde::{Deserialize, Serialize};

use crate::error::{LeagueError, Result};

/// Every numeric knob of the league pipeline. Built once and handed to each
/// component by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueConfig {
    pub total_weeks: u32,
    pub teams_per_league: usize,
    pub matches_per_week: usize,

    pub points_for_win: u32,
    pub points_for_draw: u32,

    // Match simulation.
    pub home_advantage_multiplier: f64,
    pub random_factor_min: f64,
    pub random_factor_max: f64,
    pub strength_to_goal_multiplier: f64,
    pub max_goal_probability: f64,
    // Ascending cumulative cut-offs on a (0, 100] roll scaled by the goal
    // probability; bucket index = goals. The last one must sit below
    // 100 x max_goal_probability or the top buckets can never be drawn.
    pub goal_thresholds: Vec<f64>,
    pub strength_difference_threshold: f64,
    pub favorite_bonus_range: u32,
    pub goal_randomness_range: u32,
    pub max_goals_cap: u32,

    // Championship prediction.
    pub prediction_start_week: u32,
    pub points_weight: f64,
    pub goals_for_weight: f64,
    pub goals_against_weight: f64,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            total_weeks: 6,
            teams_per_league: 4,
            matches_per_week: 2,
            points_for_win: 3,
            points_for_draw: 1,
            home_advantage_multiplier: 1.1,
            random_factor_min: 0.8,
            random_factor_max: 1.2,
            strength_to_goal_multiplier: 1.2,
            max_goal_probability: 0.95,
            goal_thresholds: vec![25.0, 50.0, 68.0, 80.0, 88.0, 92.0, 94.0],
            strength_difference_threshold: 20.0,
            favorite_bonus_range: 1,
            goal_randomness_range: 2,
            max_goals_cap: 7,
            prediction_start_week: 3,
            points_weight: 0.7,
            goals_for_weight: 0.2,
            goals_against_weight: 0.1,
        }
    }
}

impl LeagueConfig {
    /// Defaults overlaid with any `LEAGUE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`LeagueConfig::from_env`] but reads keys through `lookup`.
    /// Values that fail to parse keep their default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let goal_thresholds = lookup("LEAGUE_GOAL_THRESHOLDS")
            .map(|raw| parse_f64_list(&raw))
            .filter(|list| !list.is_empty())
            .unwrap_or(d.goal_thresholds);

        Self {
            total_weeks: parse_or(&lookup, "LEAGUE_TOTAL_WEEKS", d.total_weeks),
            teams_per_league: parse_or(&lookup, "LEAGUE_TEAMS_PER_LEAGUE", d.teams_per_league),
            matches_per_week: parse_or(&lookup, "LEAGUE_MATCHES_PER_WEEK", d.matches_per_week),
            points_for_win: parse_or(&lookup, "LEAGUE_POINTS_FOR_WIN", d.points_for_win),
            points_for_draw: parse_or(&lookup, "LEAGUE_POINTS_FOR_DRAW", d.points_for_draw),
            home_advantage_multiplier: parse_or(
                &lookup,
                "LEAGUE_HOME_ADVANTAGE_MULTIPLIER",
                d.home_advantage_multiplier,
            ),
            random_factor_min: parse_or(&lookup, "LEAGUE_RANDOM_FACTOR_MIN", d.random_factor_min),
            random_factor_max: parse_or(&lookup, "LEAGUE_RANDOM_FACTOR_MAX", d.random_factor_max),
            strength_to_goal_multiplier: parse_or(
                &lookup,
                "LEAGUE_STRENGTH_TO_GOAL_MULTIPLIER",
                d.strength_to_goal_multiplier,
            ),
            max_goal_probability: parse_or(
                &lookup,
                "LEAGUE_MAX_GOAL_PROBABILITY",
                d.max_goal_probability,
            ),
            goal_thresholds,
            strength_difference_threshold: parse_or(
                &lookup,
                "LEAGUE_STRENGTH_DIFFERENCE_THRESHOLD",
                d.strength_difference_threshold,
            ),
            favorite_bonus_range: parse_or(
                &lookup,
                "LEAGUE_FAVORITE_BONUS_RANGE",
                d.favorite_bonus_range,
            ),
            goal_randomness_range: parse_or(
                &lookup,
                "LEAGUE_GOAL_RANDOMNESS_RANGE",
                d.goal_randomness_range,
            ),
            max_goals_cap: parse_or(&lookup, "LEAGUE_MAX_GOALS_CAP", d.max_goals_cap),
            prediction_start_week: parse_or(
                &lookup,
                "LEAGUE_PREDICTION_WEEKS_THRESHOLD",
                d.prediction_start_week,
            ),
            points_weight: parse_or(&lookup, "LEAGUE_POINTS_WEIGHT", d.points_weight),
            goals_for_weight: parse_or(&lookup, "LEAGUE_GOALS_FOR_WEIGHT", d.goals_for_weight),
            goals_against_weight: parse_or(
                &lookup,
                "LEAGUE_GOALS_AGAINST_WEIGHT",
                d.goals_against_weight,
            ),
        }
    }

    /// Parse a (possibly partial) JSON document; missing fields keep their
    /// defaults. The result is validated.
    pub fn from_json(raw: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.total_weeks == 0 {
            return Err(invalid("total_weeks must be at least 1"));
        }
        if self.teams_per_league < 2 || self.teams_per_league % 2 != 0 {
            return Err(invalid(format!(
                "teams_per_league must be an even number >= 2 (got {})",
                self.teams_per_league
            )));
        }
        if self.matches_per_week == 0 {
            return Err(invalid("matches_per_week must be at least 1"));
        }
        if !(self.random_factor_min > 0.0 && self.random_factor_min <= self.random_factor_max) {
            return Err(invalid(format!(
                "random factor range [{}, {}] is empty or non-positive",
                self.random_factor_min, self.random_factor_max
            )));
        }
        if self.home_advantage_multiplier <= 0.0 {
            return Err(invalid("home_advantage_multiplier must be positive"));
        }
        if !(self.max_goal_probability > 0.0 && self.max_goal_probability <= 1.0) {
            return Err(invalid("max_goal_probability must be in (0, 1]"));
        }
        if self.goal_thresholds.is_empty()
            || self.goal_thresholds.windows(2).any(|w| w[0] >= w[1])
        {
            return Err(invalid("goal_thresholds must be non-empty and strictly ascending"));
        }
        let roll_ceiling = 100.0 * self.max_goal_probability;
        if let Some(last) = self.goal_thresholds.last()
            && *last >= roll_ceiling
        {
            return Err(invalid(format!(
                "last goal threshold {last} is unreachable; scaled rolls top out at {roll_ceiling}"
            )));
        }
        if self.prediction_start_week == 0 {
            return Err(invalid("prediction_start_week must be at least 1"));
        }
        if self.prediction_start_week > self.total_weeks {
            return Err(invalid(format!(
                "prediction_start_week {} is past the last week {}",
                self.prediction_start_week, self.total_weeks
            )));
        }
        let weights = [
            self.points_weight,
            self.goals_for_weight,
            self.goals_against_weight,
        ];
        if weights.iter().any(|w| *w < 0.0) || weights.iter().sum::<f64>() <= 0.0 {
            return Err(invalid("prediction weights must be non-negative with a positive sum"));
        }
        Ok(())
    }

    /// Matches a full double round robin needs: N x (N - 1).
    pub fn season_match_count(&self) -> usize {
        self.teams_per_league * self.teams_per_league.saturating_sub(1)
    }
}

fn invalid(msg: impl Into<String>) -> LeagueError {
    LeagueError::InvalidConfig(msg.into())
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|raw| raw.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_f64_list(raw: &str) -> Vec<f64> {
    raw.split([',', ';', ' '])
        .filter_map(|part| part.trim().parse::<f64>().ok())
        .collect()
}
