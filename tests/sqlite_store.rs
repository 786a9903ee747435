use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::tempdir;

use league_forecast::sqlite_store::SqliteStore;
use league_forecast::store::LeagueStore;
use league_forecast::{LeagueConfig, LeagueError, LeagueService, Match, PredictionHistory, Team};

fn teams() -> Vec<Team> {
    vec![
        Team::new(1, "Alpha", 90),
        Team::new(2, "Bravo", 70),
        Team::new(3, "Charlie", 50),
        Team::new(4, "Delta", 30),
    ]
}

fn fixtures() -> Vec<Match> {
    vec![
        Match::fixture(1, 2, 1),
        Match::fixture(3, 4, 1),
        Match::fixture(2, 1, 2),
        Match::fixture(4, 3, 2),
    ]
}

#[test]
fn league_round_trips_through_a_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("leagues.sqlite");

    let id = {
        let mut store = SqliteStore::open(&path).unwrap();
        let id = store.insert_league("Persisted", &teams(), &fixtures()).unwrap();
        let mut played = Match::fixture(1, 2, 1);
        played.record_result(2, 1);
        store.commit_week(id, 0, 1, &[played]).unwrap();
        id
    };

    let store = SqliteStore::open(&path).unwrap();
    let league = store.load_league(id).unwrap();
    assert_eq!(league.name, "Persisted");
    assert_eq!(league.current_week, 1);
    assert_eq!(league.teams, teams());
    assert_eq!(league.matches.len(), 4);
    assert_eq!(league.matches[0].score, Some((2, 1)));
    assert!(league.matches[1..].iter().all(|m| !m.is_played()));

    let listed = store.league_ids().unwrap();
    assert_eq!(listed, vec![(id, "Persisted".to_string(), 1)]);
}

#[test]
fn missing_league_is_not_found() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    assert!(matches!(store.load_league(9), Err(LeagueError::LeagueNotFound(9))));
    assert!(matches!(store.reset_league(9), Err(LeagueError::LeagueNotFound(9))));
    assert!(matches!(store.commit_week(9, 0, 1, &[]), Err(LeagueError::LeagueNotFound(9))));
}

#[test]
fn prediction_upsert_overwrites_existing_rows() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let id = store.insert_league("Preds", &teams(), &fixtures()).unwrap();

    store
        .upsert_predictions(id, 3, &HashMap::from([(1, 60.0), (2, 40.0)]))
        .unwrap();
    store
        .upsert_predictions(id, 3, &HashMap::from([(1, 55.5), (2, 44.5)]))
        .unwrap();
    store
        .upsert_predictions(id, 4, &HashMap::from([(1, 100.0), (2, 0.0)]))
        .unwrap();

    let week3 = store.predictions_for_week(id, 3).unwrap();
    assert_eq!(week3, HashMap::from([(1, 55.5), (2, 44.5)]));

    let history = store.prediction_history(id).unwrap();
    let rows: Vec<(u32, u32, f64)> = history.iter().map(|p| (p.week, p.team_id, p.percentage)).collect();
    assert_eq!(rows, vec![(3, 1, 55.5), (3, 2, 44.5), (4, 1, 100.0), (4, 2, 0.0)]);

    store.reset_league(id).unwrap();
    assert!(store.prediction_history(id).unwrap().is_empty());
    assert!(store.predictions_for_week(id, 3).unwrap().is_empty());
}

#[test]
fn second_connection_loses_the_week_claim() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("race.sqlite");
    let mut first = SqliteStore::open(&path).unwrap();
    let id = first.insert_league("Race", &teams(), &fixtures()).unwrap();
    let mut second = SqliteStore::open(&path).unwrap();

    assert_eq!(first.load_league(id).unwrap().current_week, 0);
    assert_eq!(second.load_league(id).unwrap().current_week, 0);

    let mut first_result = Match::fixture(1, 2, 1);
    first_result.record_result(1, 0);
    let mut second_result = Match::fixture(3, 4, 1);
    second_result.record_result(5, 5);

    first.commit_week(id, 0, 1, &[first_result]).unwrap();
    let err = second.commit_week(id, 0, 1, &[second_result]).unwrap_err();
    assert!(matches!(
        err,
        LeagueError::StaleWeek { expected: 0, found: 1, .. }
    ));

    // The losing commit wrote nothing.
    let league = second.load_league(id).unwrap();
    assert_eq!(league.current_week, 1);
    assert_eq!(league.matches[0].score, Some((1, 0)));
    assert!(!league.matches[1].is_played());
}

#[test]
fn service_season_on_sqlite_then_reset() {
    let store = SqliteStore::open_in_memory().unwrap();
    let mut svc =
        LeagueService::new(LeagueConfig::default(), store, StdRng::seed_from_u64(8)).unwrap();
    let id = svc.create_league("Sqlite", &teams()).unwrap();
    svc.simulate_all(id, PredictionHistory::EveryWeek).unwrap();

    let overview = svc.league_overview(id).unwrap();
    assert_eq!(overview.league.current_week, 6);
    assert_eq!(overview.league.matches.len(), 12);
    assert!(overview.league.matches.iter().all(|m| m.is_played()));
    assert_eq!(svc.prediction_history(id).unwrap().len(), 16);

    svc.reset_league(id).unwrap();
    let overview = svc.league_overview(id).unwrap();
    assert_eq!(overview.league.current_week, 0);
    assert!(overview.league.matches.iter().all(|m| !m.is_played()));
    assert!(overview.standings.iter().all(|s| s.championship_percentage == 0.0));
    assert!(svc.prediction_history(id).unwrap().is_empty());
}
