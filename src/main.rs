use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use rand::SeedableRng;
use rand::rngs::StdRng;

use league_forecast::sqlite_store::{self, SqliteStore};
use league_forecast::{
    LeagueConfig, LeagueId, LeagueOverview, LeagueService, PredictionHistory, TeamId, WeekReport,
    roster,
};

const USAGE: &str = "usage: league_forecast [--db PATH] [--seed N] [--config FILE] <command>

commands:
  teams                         list the built-in clubs
  config                        print the effective config as JSON
  list                          list stored leagues
  create <name> [team-id...]    create a league (defaults to the first N clubs)
  show <league-id> [--json]     standings with current-week predictions
  week <league-id>              simulate the next week
  all <league-id> [--final-only]
                                simulate every remaining week
  reset <league-id>             unplay all matches and clear predictions
  history <league-id>           week-by-week championship percentages";

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let (flags, positional) = split_args(&args);
    let Some(command) = positional.first() else {
        println!("{USAGE}");
        return Ok(());
    };

    let config = match flag_value(&flags, "--config") {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("read config {path}"))?;
            LeagueConfig::from_json(&raw).with_context(|| format!("parse config {path}"))?
        }
        None => LeagueConfig::from_env(),
    };
    match command.as_str() {
        "teams" => {
            for team in roster::catalogue() {
                println!("{:>3}  {:<26} {:>3}", team.id, team.name, team.strength);
            }
            return Ok(());
        }
        "config" => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            return Ok(());
        }
        _ => {}
    }

    let db_path = flag_value(&flags, "--db")
        .map(PathBuf::from)
        .or_else(|| std::env::var("LEAGUE_DB_PATH").ok().map(PathBuf::from))
        .or_else(sqlite_store::default_db_path)
        .context("unable to resolve sqlite path")?;
    let store = SqliteStore::open(&db_path)?;
    let rng = match flag_value(&flags, "--seed") {
        Some(raw) => StdRng::seed_from_u64(raw.parse().context("--seed must be an integer")?),
        None => StdRng::from_entropy(),
    };
    let mut service = LeagueService::new(config, store, rng)?;

    match command.as_str() {
        "list" => {
            for (id, name, week) in service.store().league_ids()? {
                println!("{id:>4}  {name:<24} week {week}");
            }
        }
        "create" => {
            let name = positional.get(1).context("create needs a league name")?;
            let ids = positional[2..]
                .iter()
                .map(|raw| raw.parse::<TeamId>().with_context(|| format!("bad team id '{raw}'")))
                .collect::<Result<Vec<_>>>()?;
            let ids = if ids.is_empty() {
                (1..=service.config().teams_per_league as TeamId).collect()
            } else {
                ids
            };
            let teams = roster::pick(&ids)?;
            let league_id = service.create_league(name, &teams)?;
            println!("created league {league_id}");
            print_overview(&service.league_overview(league_id)?);
        }
        "show" => {
            let league_id = league_id_arg(&positional)?;
            let overview = service.league_overview(league_id)?;
            if has_flag(&flags, "--json") {
                println!("{}", serde_json::to_string_pretty(&overview)?);
            } else {
                print_overview(&overview);
            }
        }
        "week" => {
            let league_id = league_id_arg(&positional)?;
            let report = service.simulate_week(league_id)?;
            let overview = service.league_overview(league_id)?;
            match report {
                Some(report) => print_week(&overview, &report),
                None => println!("League completed!"),
            }
            print_overview(&overview);
        }
        "all" => {
            let league_id = league_id_arg(&positional)?;
            let history = if has_flag(&flags, "--final-only") {
                PredictionHistory::FinalWeekOnly
            } else {
                PredictionHistory::EveryWeek
            };
            let reports = service.simulate_all(league_id, history)?;
            let overview = service.league_overview(league_id)?;
            for report in &reports {
                print_week(&overview, report);
            }
            print_overview(&overview);
        }
        "reset" => {
            let league_id = league_id_arg(&positional)?;
            service.reset_league(league_id)?;
            println!("league {league_id} reset");
        }
        "history" => {
            let league_id = league_id_arg(&positional)?;
            let overview = service.league_overview(league_id)?;
            let mut by_week: BTreeMap<u32, Vec<(TeamId, f64)>> = BTreeMap::new();
            for p in service.prediction_history(league_id)? {
                by_week.entry(p.week).or_default().push((p.team_id, p.percentage));
            }
            if by_week.is_empty() {
                println!("no predictions yet");
            }
            for (week, rows) in by_week {
                println!("Week {week}");
                for (team_id, pct) in rows {
                    println!("  {:<26} {:>6.2}%", team_name(&overview, team_id), pct);
                }
            }
        }
        other => return Err(anyhow!("unknown command '{other}'\n\n{USAGE}")),
    }

    Ok(())
}

fn print_overview(overview: &LeagueOverview) {
    let progress = &overview.progress;
    println!(
        "{} - week {}/{} ({}, {}%)",
        overview.league.name,
        overview.league.current_week,
        progress.total_weeks,
        progress.status_label,
        progress.progress_percentage
    );
    println!(
        "{:<3} {:<26} {:>2} {:>2} {:>2} {:>2} {:>3} {:>3} {:>4} {:>3} {:>7}",
        "#", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts", "Champ%"
    );
    for (pos, row) in overview.standings.iter().enumerate() {
        println!(
            "{:<3} {:<26} {:>2} {:>2} {:>2} {:>2} {:>3} {:>3} {:>4} {:>3} {:>7.2}",
            pos + 1,
            row.team_name,
            row.played,
            row.won,
            row.drawn,
            row.lost,
            row.goals_for,
            row.goals_against,
            row.goal_difference,
            row.points,
            row.championship_percentage
        );
    }
}

fn print_week(overview: &LeagueOverview, report: &WeekReport) {
    println!("Week {} completed!", report.week);
    for m in &report.results {
        let (h, a) = m.score.unwrap_or_default();
        println!(
            "  {:>26} {h} - {a} {}",
            team_name(overview, m.home_team_id),
            team_name(overview, m.away_team_id)
        );
    }
}

fn team_name(overview: &LeagueOverview, team_id: TeamId) -> String {
    overview
        .league
        .team(team_id)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| format!("team {team_id}"))
}

fn league_id_arg(positional: &[String]) -> Result<LeagueId> {
    let raw = positional.get(1).context("missing league id")?;
    raw.parse::<LeagueId>()
        .with_context(|| format!("bad league id '{raw}'"))
}

// Flags that take a value consume the following argument.
fn split_args(args: &[String]) -> (Vec<(String, Option<String>)>, Vec<String>) {
    let mut flags = Vec::new();
    let mut positional = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if let Some((key, value)) = arg.split_once('=')
            && key.starts_with("--")
        {
            flags.push((key.to_string(), Some(value.to_string())));
        } else if arg == "--db" || arg == "--seed" || arg == "--config" {
            flags.push((arg.clone(), iter.next().cloned()));
        } else if arg.starts_with("--") {
            flags.push((arg.clone(), None));
        } else {
            positional.push(arg.clone());
        }
    }
    (flags, positional)
}

fn flag_value<'a>(flags: &'a [(String, Option<String>)], name: &str) -> Option<&'a str> {
    flags
        .iter()
        .find(|(key, _)| key == name)
        .and_then(|(_, value)| value.as_deref())
        .filter(|v| !v.trim().is_empty())
}

fn has_flag(flags: &[(String, Option<String>)], name: &str) -> bool {
    flags.iter().any(|(key, _)| key == name)
}
