use std::collections::HashSet;

use crate::error::{LeagueError, Result};
use crate::model::{Team, TeamId};

const CLUBS: &[&str] = &[
    "Manchester City",
    "Arsenal",
    "Manchester United",
    "Newcastle United",
    "Liverpool",
    "Brighton And Hove Albion",
    "Aston Villa",
    "Tottenham Hotspur",
    "Brentford",
    "Fulham",
    "Crystal Palace",
    "Chelsea",
    "Wolverhampton Wanderers",
    "West Ham United",
    "Bournemouth",
    "Nottingham Forest",
    "Everton",
    "Leicester City",
    "Leeds United",
    "Southampton",
];

/// Built-in clubs, ids 1..=20, strength falling linearly from 100 to 0.
pub fn catalogue() -> Vec<Team> {
    let count = CLUBS.len();
    let step = 100.0 / (count as f64 - 1.0);
    CLUBS
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let strength = (100.0 - idx as f64 * step).round().clamp(0.0, 100.0) as u8;
            Team::new(idx as TeamId + 1, *name, strength)
        })
        .collect()
}

/// Select teams from the catalogue, keeping the requested order.
pub fn pick(ids: &[TeamId]) -> Result<Vec<Team>> {
    let all = catalogue();
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(*id) {
            return Err(LeagueError::DuplicateTeam(*id));
        }
        let team = all
            .iter()
            .find(|t| t.id == *id)
            .cloned()
            .ok_or(LeagueError::UnknownTeam(*id))?;
        out.push(team);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_spans_full_strength_range() {
        let teams = catalogue();
        assert_eq!(teams.len(), 20);
        assert_eq!(teams[0].strength, 100);
        assert_eq!(teams[19].strength, 0);
        assert!(teams.windows(2).all(|w| w[0].strength >= w[1].strength));
    }

    #[test]
    fn pick_rejects_duplicates_and_unknown_ids() {
        assert!(matches!(pick(&[1, 2, 1]), Err(LeagueError::DuplicateTeam(1))));
        assert!(matches!(pick(&[1, 99]), Err(LeagueError::UnknownTeam(99))));
        let teams = pick(&[5, 2]).unwrap();
        assert_eq!(teams[0].name, "Liverpool");
        assert_eq!(teams[1].name, "Arsenal");
    }
}
