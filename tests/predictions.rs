use league_forecast::LeagueConfig;
use league_forecast::prediction::{PredictionEngine, PredictionPhase};
use league_forecast::standings::Standing;

fn row(id: u32, points: u32, gf: u32, ga: u32) -> Standing {
    Standing {
        team_id: id,
        team_name: format!("T{id}"),
        played: 0,
        won: 0,
        drawn: 0,
        lost: 0,
        goals_for: gf,
        goals_against: ga,
        goal_difference: gf as i32 - ga as i32,
        points,
        championship_percentage: 0.0,
    }
}

#[test]
fn nothing_before_threshold() {
    let cfg = LeagueConfig::default();
    let engine = PredictionEngine::new(&cfg);
    let table = vec![row(1, 6, 4, 1), row(2, 0, 1, 4)];
    assert!(engine.calculate(0, &table).is_none());
    assert!(engine.calculate(2, &table).is_none());
    assert!(engine.calculate(3, &table).is_some());
}

#[test]
fn season_end_clear_leader_takes_everything() {
    let cfg = LeagueConfig::default();
    let engine = PredictionEngine::new(&cfg);
    let table = vec![row(2, 10, 9, 5), row(1, 12, 11, 4), row(3, 7, 6, 8), row(4, 2, 3, 12)];
    let out = engine.calculate(6, &table).unwrap();
    assert_eq!(out[&1], 100.0);
    assert_eq!(out[&2], 0.0);
    assert_eq!(out[&3], 0.0);
    assert_eq!(out[&4], 0.0);
}

#[test]
fn season_end_full_tie_gives_two_champions() {
    let cfg = LeagueConfig::default();
    let engine = PredictionEngine::new(&cfg);
    let table = vec![row(1, 10, 8, 4), row(2, 10, 8, 4), row(3, 7, 6, 8), row(4, 4, 3, 9)];
    let out = engine.calculate(6, &table).unwrap();
    assert_eq!(out[&1], 100.0);
    assert_eq!(out[&2], 100.0);
    assert_eq!(out[&3], 0.0);
    assert_eq!(out[&4], 0.0);
}

#[test]
fn season_end_points_tie_broken_by_goals() {
    let cfg = LeagueConfig::default();
    let engine = PredictionEngine::new(&cfg);

    let by_gd = vec![row(1, 10, 8, 6), row(2, 10, 8, 4)];
    let out = engine.calculate(6, &by_gd).unwrap();
    assert_eq!((out[&1], out[&2]), (0.0, 100.0));

    let by_gf = vec![row(1, 10, 9, 5), row(2, 10, 8, 4)];
    let out = engine.calculate(6, &by_gf).unwrap();
    assert_eq!((out[&1], out[&2]), (100.0, 0.0));
}

#[test]
fn lone_contender_is_certain() {
    let cfg = LeagueConfig::default();
    let engine = PredictionEngine::new(&cfg);
    assert_eq!(engine.phase(5), PredictionPhase::MidSeason { remaining_weeks: 1 });

    // One week left: 8 + 3 < 12.
    let table = vec![row(1, 12, 10, 2), row(2, 8, 7, 5), row(3, 4, 4, 8), row(4, 1, 2, 8)];
    let out = engine.calculate(5, &table).unwrap();
    assert_eq!(out[&1], 100.0);
    assert_eq!(out[&2], 0.0);
    assert_eq!(out[&3], 0.0);
    assert_eq!(out[&4], 0.0);
}

#[test]
fn reachable_ceiling_keeps_team_in_contention() {
    let cfg = LeagueConfig::default();
    let engine = PredictionEngine::new(&cfg);
    // 9 + 3 == 12 ties the leader, so still alive.
    let table = vec![row(1, 12, 10, 2), row(2, 9, 7, 5), row(3, 4, 4, 8), row(4, 1, 2, 8)];
    let out = engine.calculate(5, &table).unwrap();
    assert!(out[&1] > 0.0 && out[&1] < 100.0);
    assert!(out[&2] > 0.0);
    assert_eq!(out[&3], 0.0);
    assert_eq!(out[&4], 0.0);
}

#[test]
fn contenders_share_one_hundred_and_eliminated_get_zero() {
    let cfg = LeagueConfig::default();
    let engine = PredictionEngine::new(&cfg);
    // Two weeks left (+6): team 4 tops out at 8 < 9.
    let table = vec![row(1, 9, 8, 3), row(2, 7, 6, 4), row(3, 4, 5, 6), row(4, 2, 2, 8)];
    let out = engine.calculate(4, &table).unwrap();

    let total: f64 = out.values().sum();
    assert!((total - 100.0).abs() <= 0.1, "sum was {total}");
    assert_eq!(out[&4], 0.0);
    assert!(out[&1] >= out[&2]);
    assert!(out[&2] >= out[&3]);
    assert!(out.values().all(|p| (0.0..=100.0).contains(p)));
}

#[test]
fn zero_totals_do_not_divide_by_zero() {
    let cfg = LeagueConfig::default();
    let engine = PredictionEngine::new(&cfg);
    let table = vec![row(1, 0, 0, 0), row(2, 0, 0, 0), row(3, 0, 0, 0), row(4, 0, 0, 0)];
    let out = engine.calculate(3, &table).unwrap();
    let total: f64 = out.values().sum();
    assert!((total - 100.0).abs() <= 0.1);
    assert!(out.values().all(|p| p.is_finite()));
}

#[test]
fn fewer_points_never_outrank_more_points() {
    // Weights that favour goals would rank team 2 first without the swap pass.
    let cfg = LeagueConfig {
        points_weight: 0.1,
        goals_for_weight: 0.9,
        goals_against_weight: 0.0,
        ..LeagueConfig::default()
    };
    let engine = PredictionEngine::new(&cfg);
    let table = vec![row(1, 9, 2, 0), row(2, 7, 20, 0), row(3, 6, 1, 0)];
    let out = engine.calculate(3, &table).unwrap();
    assert!(out[&1] >= out[&2], "{out:?}");
    assert!(out[&2] >= out[&3], "{out:?}");
}
