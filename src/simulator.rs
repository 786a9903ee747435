use log::debug;
use rand::Rng;

use crate::config::LeagueConfig;
use crate::model::{Match, Team};

/// Strength-and-noise score generator. Pure apart from the caller's RNG.
pub struct MatchSimulator<'a> {
    config: &'a LeagueConfig,
}

impl<'a> MatchSimulator<'a> {
    pub fn new(config: &'a LeagueConfig) -> Self {
        Self { config }
    }

    pub fn simulate<R: Rng + ?Sized>(&self, home: &Team, away: &Team, rng: &mut R) -> (u32, u32) {
        let cfg = self.config;

        let home_base = home.strength as f64 * cfg.home_advantage_multiplier;
        let away_base = away.strength as f64;

        let home_final = home_base * self.random_factor(rng);
        let away_final = away_base * self.random_factor(rng);

        let mut home_goals = self.draw_goals(self.goal_probability(home_final), rng) as i64;
        let mut away_goals = self.draw_goals(self.goal_probability(away_final), rng) as i64;

        // The clear favourite may get a small bonus.
        let strength_diff = home_final - away_final;
        if strength_diff > cfg.strength_difference_threshold {
            home_goals += rng.gen_range(0..=cfg.favorite_bonus_range) as i64;
        } else if strength_diff < -cfg.strength_difference_threshold {
            away_goals += rng.gen_range(0..=cfg.favorite_bonus_range) as i64;
        }

        home_goals += self.jitter(rng);
        away_goals += self.jitter(rng);

        let cap = cfg.max_goals_cap as i64;
        let home_score = home_goals.clamp(0, cap) as u32;
        let away_score = away_goals.clamp(0, cap) as u32;

        debug!(
            "{} {}-{} {} (final strength {:.1} vs {:.1})",
            home.name, home_score, away_score, away.name, home_final, away_final
        );
        (home_score, away_score)
    }

    /// Simulate `fixture` in place. Already played matches are left untouched.
    pub fn play<R: Rng + ?Sized>(
        &self,
        fixture: &mut Match,
        home: &Team,
        away: &Team,
        rng: &mut R,
    ) -> bool {
        if fixture.is_played() {
            return false;
        }
        let (h, a) = self.simulate(home, away, rng);
        fixture.record_result(h, a);
        true
    }

    pub fn goal_probability(&self, final_strength: f64) -> f64 {
        let raw = final_strength / 100.0 * self.config.strength_to_goal_multiplier;
        raw.clamp(0.0, self.config.max_goal_probability)
    }

    /// Map a probability onto the cumulative goal table using one roll in (0, 100].
    pub fn draw_goals<R: Rng + ?Sized>(&self, probability: f64, rng: &mut R) -> u32 {
        let roll = 100.0 - rng.gen_range(0.0..100.0);
        goals_for_roll(&self.config.goal_thresholds, roll * probability)
    }

    fn random_factor<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.gen_range(self.config.random_factor_min..=self.config.random_factor_max)
    }

    fn jitter<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        let range = self.config.goal_randomness_range as i64;
        rng.gen_range(-range..=range)
    }
}

/// Index of the first threshold the scaled roll does not exceed; past the last
/// threshold the top bucket (thresholds.len()) applies.
pub fn goals_for_roll(thresholds: &[f64], scaled_roll: f64) -> u32 {
    thresholds
        .iter()
        .position(|t| scaled_roll <= *t)
        .unwrap_or(thresholds.len()) as u32
}
