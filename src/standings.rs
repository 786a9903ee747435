use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::LeagueConfig;
use crate::model::{Match, Team, TeamId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub team_id: TeamId,
    pub team_name: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,
    pub championship_percentage: f64,
}

#[derive(Debug, Clone, Copy, Default)]
struct Record {
    played: u32,
    won: u32,
    drawn: u32,
    lost: u32,
    goals_for: u32,
    goals_against: u32,
}

impl Record {
    fn add(mut self, own: u32, opp: u32) -> Self {
        self.played += 1;
        self.goals_for += own;
        self.goals_against += opp;
        match own.cmp(&opp) {
            Ordering::Greater => self.won += 1,
            Ordering::Equal => self.drawn += 1,
            Ordering::Less => self.lost += 1,
        }
        self
    }
}

/// Aggregate every played match into one standing per team, sorted by
/// [`compare_standings`]. Unplayed fixtures are ignored.
pub fn calculate_standings(teams: &[Team], matches: &[Match], config: &LeagueConfig) -> Vec<Standing> {
    let mut standings: Vec<Standing> = teams
        .iter()
        .map(|team| team_standing(team, matches, config))
        .collect();
    sort_standings(&mut standings);
    standings
}

pub fn team_standing(team: &Team, matches: &[Match], config: &LeagueConfig) -> Standing {
    let record = matches
        .iter()
        .filter_map(|m| {
            let (home, away) = m.score?;
            if m.home_team_id == team.id {
                Some((home, away))
            } else if m.away_team_id == team.id {
                Some((away, home))
            } else {
                None
            }
        })
        .fold(Record::default(), |acc, (own, opp)| acc.add(own, opp));

    Standing {
        team_id: team.id,
        team_name: team.name.clone(),
        played: record.played,
        won: record.won,
        drawn: record.drawn,
        lost: record.lost,
        goals_for: record.goals_for,
        goals_against: record.goals_against,
        goal_difference: record.goals_for as i32 - record.goals_against as i32,
        points: record.won * config.points_for_win + record.drawn * config.points_for_draw,
        championship_percentage: 0.0,
    }
}

/// Points, then goal difference, then goals for; all descending.
pub fn compare_standings(a: &Standing, b: &Standing) -> Ordering {
    b.points
        .cmp(&a.points)
        .then(b.goal_difference.cmp(&a.goal_difference))
        .then(b.goals_for.cmp(&a.goals_for))
}

/// Stable, so full ties keep their input order.
pub fn sort_standings(standings: &mut [Standing]) {
    standings.sort_by(compare_standings);
}

/// Copy stored percentages onto the table; teams without one get 0.
pub fn attach_predictions(standings: &mut [Standing], predictions: &HashMap<TeamId, f64>) {
    for row in standings.iter_mut() {
        row.championship_percentage = predictions.get(&row.team_id).copied().unwrap_or(0.0);
    }
}
