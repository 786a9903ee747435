use log::{debug, warn};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::LeagueConfig;
use crate::model::{Match, TeamId};

/// Output of one greedy packing pass.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    pub matches: Vec<Match>,
    // Pairings still in the pool once the week limit was reached.
    pub unscheduled: Vec<(TeamId, TeamId)>,
}

pub struct FixtureScheduler<'a> {
    config: &'a LeagueConfig,
}

impl<'a> FixtureScheduler<'a> {
    pub fn new(config: &'a LeagueConfig) -> Self {
        Self { config }
    }

    /// Every ordered (home, away) pair with home != away: N x (N - 1) entries.
    pub fn generate_all_pairings(&self, team_ids: &[TeamId]) -> Vec<(TeamId, TeamId)> {
        let n = team_ids.len();
        let mut out = Vec::with_capacity(n * n.saturating_sub(1));
        for i in 0..n {
            for j in (i + 1)..n {
                out.push((team_ids[i], team_ids[j]));
                out.push((team_ids[j], team_ids[i]));
            }
        }
        out
    }

    pub fn generate_schedule<R: Rng + ?Sized>(&self, team_ids: &[TeamId], rng: &mut R) -> Vec<Match> {
        self.pack(team_ids, rng).matches
    }

    /// Shuffle the pairing pool, then fill weeks 1.. greedily: a pairing is
    /// taken when neither side already plays that week, until the week quota
    /// is met. Weeks may come out short; leftovers are reported, not retried.
    pub fn pack<R: Rng + ?Sized>(&self, team_ids: &[TeamId], rng: &mut R) -> Schedule {
        let mut pool = self.generate_all_pairings(team_ids);
        pool.shuffle(rng);

        let quota = self.config.matches_per_week;
        let mut matches = Vec::with_capacity(pool.len());
        let mut week = 1u32;

        while !pool.is_empty() && week <= self.config.total_weeks {
            let mut busy: Vec<TeamId> = Vec::with_capacity(quota * 2);
            let mut taken = 0usize;
            let mut idx = 0usize;

            while idx < pool.len() && taken < quota {
                let (home, away) = pool[idx];
                if busy.contains(&home) || busy.contains(&away) {
                    idx += 1;
                    continue;
                }
                busy.push(home);
                busy.push(away);
                matches.push(Match::fixture(home, away, week));
                pool.remove(idx);
                taken += 1;
            }

            if taken < quota {
                warn!("schedule week {week} under-filled: {taken}/{quota} matches");
            } else {
                debug!("schedule week {week} packed with {taken} matches");
            }
            week += 1;
        }

        if !pool.is_empty() {
            warn!(
                "{} pairings left unscheduled after {} weeks",
                pool.len(),
                self.config.total_weeks
            );
        }

        Schedule {
            matches,
            unscheduled: pool,
        }
    }
}
