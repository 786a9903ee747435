use std::str::FromStr;

use anyhow::{Context, Result};

use league_forecast::sweep::run_sweep;
use league_forecast::{LeagueConfig, TeamId, roster};

const DEFAULT_SEASONS: usize = 2000;
const DEFAULT_SEED: u64 = 7;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = LeagueConfig::from_env();
    let seasons = parse_arg::<usize>("--seasons")
        .unwrap_or(DEFAULT_SEASONS)
        .clamp(1, 1_000_000);
    let seed = parse_arg::<u64>("--seed").unwrap_or(DEFAULT_SEED);
    let check_week = parse_arg::<u32>("--week").unwrap_or(config.prediction_start_week);

    let ids = parse_team_ids_arg()
        .unwrap_or_else(|| (1..=config.teams_per_league as TeamId).collect());
    let teams = roster::pick(&ids).context("resolve sweep roster")?;

    let report = run_sweep(&config, &teams, seasons, seed, check_week)
        .context("season sweep failed")?;

    if has_flag("--json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Seasons: {}", report.seasons);
    println!("Forecast week: {}", report.check_week);
    println!("Brier: {:.4}", report.brier);
    println!("Favourite hit rate: {:.1}%", report.favourite_hit_rate * 100.0);
    println!("{:<26} {:>9} {:>9}", "Team", "Pred%", "Title%");
    for team in &teams {
        let pred = report.mean_prediction.get(&team.id).copied().unwrap_or(0.0);
        let title = report.title_share.get(&team.id).copied().unwrap_or(0.0) * 100.0;
        println!("{:<26} {:>9.2} {:>9.2}", team.name, pred, title);
    }
    Ok(())
}

fn parse_arg<T: FromStr>(name: &str) -> Option<T> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&format!("{name}="))
            && let Ok(v) = raw.trim().parse::<T>()
        {
            return Some(v);
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && let Ok(v) = next.trim().parse::<T>()
        {
            return Some(v);
        }
    }
    None
}

fn has_flag(name: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == name)
}

fn parse_team_ids_arg() -> Option<Vec<TeamId>> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let raw = args.iter().enumerate().find_map(|(idx, arg)| {
        arg.strip_prefix("--teams=")
            .map(|s| s.to_string())
            .or_else(|| (arg == "--teams").then(|| args.get(idx + 1).cloned()).flatten())
    })?;
    let ids = raw
        .split([',', ';', ' '])
        .filter_map(|part| part.trim().parse::<TeamId>().ok())
        .collect::<Vec<_>>();
    if ids.is_empty() { None } else { Some(ids) }
}
