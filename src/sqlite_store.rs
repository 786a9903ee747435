use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::info;
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::{LeagueError, Result};
use crate::model::{LeagueId, LeagueState, Match, Prediction, Team, TeamId};
use crate::store::LeagueStore;

const DB_DIR: &str = "league_forecast";
const DB_FILE: &str = "leagues.sqlite";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        info!("opened league db {}", path.display());
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn league_ids(&self) -> Result<Vec<(LeagueId, String, u32)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, current_week FROM leagues ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, LeagueId>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

/// `$XDG_CACHE_HOME/league_forecast/leagues.sqlite`, else under `~/.cache`.
pub fn default_db_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(DB_DIR).join(DB_FILE));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(DB_DIR).join(DB_FILE))
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        PRAGMA foreign_keys = ON;
        CREATE TABLE IF NOT EXISTS leagues (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            current_week INTEGER NOT NULL DEFAULT 0
        );
        CREATE TABLE IF NOT EXISTS league_teams (
            league_id INTEGER NOT NULL REFERENCES leagues(id) ON DELETE CASCADE,
            team_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            strength INTEGER NOT NULL,
            position INTEGER NOT NULL,
            PRIMARY KEY (league_id, team_id)
        );
        CREATE TABLE IF NOT EXISTS league_matches (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            league_id INTEGER NOT NULL REFERENCES leagues(id) ON DELETE CASCADE,
            week INTEGER NOT NULL,
            home_team_id INTEGER NOT NULL,
            away_team_id INTEGER NOT NULL,
            is_played INTEGER NOT NULL DEFAULT 0,
            home_score INTEGER NULL,
            away_score INTEGER NULL,
            UNIQUE (league_id, home_team_id, away_team_id)
        );
        CREATE INDEX IF NOT EXISTS idx_league_matches_week ON league_matches(league_id, week);
        CREATE TABLE IF NOT EXISTS predictions (
            league_id INTEGER NOT NULL REFERENCES leagues(id) ON DELETE CASCADE,
            week INTEGER NOT NULL,
            team_id INTEGER NOT NULL,
            percentage REAL NOT NULL,
            PRIMARY KEY (league_id, week, team_id)
        );
        "#,
    )?;
    Ok(())
}

impl LeagueStore for SqliteStore {
    fn insert_league(&mut self, name: &str, teams: &[Team], matches: &[Match]) -> Result<LeagueId> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO leagues(name, current_week) VALUES (?1, 0)",
            params![name],
        )?;
        let league_id = tx.last_insert_rowid() as LeagueId;

        for (position, team) in teams.iter().enumerate() {
            tx.execute(
                "INSERT INTO league_teams(league_id, team_id, name, strength, position)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![league_id, team.id, team.name, team.strength, position as i64],
            )?;
        }
        for m in matches {
            tx.execute(
                "INSERT INTO league_matches(league_id, week, home_team_id, away_team_id, is_played, home_score, away_score)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    league_id,
                    m.week,
                    m.home_team_id,
                    m.away_team_id,
                    bool_to_i64(m.is_played()),
                    m.home_score(),
                    m.away_score(),
                ],
            )?;
        }
        tx.commit()?;
        Ok(league_id)
    }

    fn load_league(&self, league_id: LeagueId) -> Result<LeagueState> {
        let (name, current_week) = self
            .conn
            .query_row(
                "SELECT name, current_week FROM leagues WHERE id = ?1",
                params![league_id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?)),
            )
            .optional()?
            .ok_or(LeagueError::LeagueNotFound(league_id))?;

        let mut stmt = self.conn.prepare(
            "SELECT team_id, name, strength FROM league_teams
             WHERE league_id = ?1 ORDER BY position ASC",
        )?;
        let team_rows = stmt.query_map(params![league_id], |row| {
            Ok(Team {
                id: row.get(0)?,
                name: row.get(1)?,
                strength: row.get(2)?,
            })
        })?;
        let mut teams = Vec::new();
        for row in team_rows {
            teams.push(row?);
        }

        let mut stmt = self.conn.prepare(
            "SELECT home_team_id, away_team_id, week, is_played, home_score, away_score
             FROM league_matches WHERE league_id = ?1 ORDER BY week ASC, id ASC",
        )?;
        let match_rows = stmt.query_map(params![league_id], |row| {
            let played = row.get::<_, i64>(3)? != 0;
            let home: Option<u32> = row.get(4)?;
            let away: Option<u32> = row.get(5)?;
            let score = match (played, home, away) {
                (true, Some(h), Some(a)) => Some((h, a)),
                _ => None,
            };
            Ok(Match {
                home_team_id: row.get(0)?,
                away_team_id: row.get(1)?,
                week: row.get(2)?,
                score,
            })
        })?;
        let mut matches = Vec::new();
        for row in match_rows {
            matches.push(row?);
        }

        Ok(LeagueState {
            id: league_id,
            name,
            teams,
            current_week,
            matches,
        })
    }

    fn commit_week(&mut self, league_id: LeagueId, from: u32, to: u32, results: &[Match]) -> Result<()> {
        let tx = self.conn.transaction()?;
        let changed = tx.execute(
            "UPDATE leagues SET current_week = ?1 WHERE id = ?2 AND current_week = ?3",
            params![to, league_id, from],
        )?;
        if changed != 1 {
            let found = stored_week(&tx, league_id)?;
            return Err(LeagueError::StaleWeek {
                league_id,
                expected: from,
                found,
            });
        }
        for m in results {
            tx.execute(
                "UPDATE league_matches
                 SET is_played = ?1, home_score = ?2, away_score = ?3
                 WHERE league_id = ?4 AND home_team_id = ?5 AND away_team_id = ?6",
                params![
                    bool_to_i64(m.is_played()),
                    m.home_score(),
                    m.away_score(),
                    league_id,
                    m.home_team_id,
                    m.away_team_id,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn reset_league(&mut self, league_id: LeagueId) -> Result<()> {
        let tx = self.conn.transaction()?;
        let changed = tx.execute(
            "UPDATE leagues SET current_week = 0 WHERE id = ?1",
            params![league_id],
        )?;
        if changed == 0 {
            return Err(LeagueError::LeagueNotFound(league_id));
        }
        tx.execute(
            "UPDATE league_matches SET is_played = 0, home_score = NULL, away_score = NULL
             WHERE league_id = ?1",
            params![league_id],
        )?;
        tx.execute(
            "DELETE FROM predictions WHERE league_id = ?1",
            params![league_id],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn upsert_predictions(
        &mut self,
        league_id: LeagueId,
        week: u32,
        percentages: &HashMap<TeamId, f64>,
    ) -> Result<()> {
        let tx = self.conn.transaction()?;
        for (team_id, pct) in percentages {
            tx.execute(
                r#"
                INSERT INTO predictions(league_id, week, team_id, percentage)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(league_id, week, team_id) DO UPDATE SET
                    percentage = excluded.percentage
                "#,
                params![league_id, week, team_id, pct],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn predictions_for_week(&self, league_id: LeagueId, week: u32) -> Result<HashMap<TeamId, f64>> {
        let mut stmt = self.conn.prepare(
            "SELECT team_id, percentage FROM predictions WHERE league_id = ?1 AND week = ?2",
        )?;
        let rows = stmt.query_map(params![league_id, week], |row| {
            Ok((row.get::<_, TeamId>(0)?, row.get::<_, f64>(1)?))
        })?;
        let mut out = HashMap::new();
        for row in rows {
            let (team_id, pct) = row?;
            out.insert(team_id, pct);
        }
        Ok(out)
    }

    fn prediction_history(&self, league_id: LeagueId) -> Result<Vec<Prediction>> {
        let mut stmt = self.conn.prepare(
            "SELECT week, team_id, percentage FROM predictions
             WHERE league_id = ?1 ORDER BY week ASC, team_id ASC",
        )?;
        let rows = stmt.query_map(params![league_id], |row| {
            Ok(Prediction {
                league_id,
                week: row.get(0)?,
                team_id: row.get(1)?,
                percentage: row.get(2)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

fn stored_week(conn: &Connection, league_id: LeagueId) -> Result<u32> {
    conn.query_row(
        "SELECT current_week FROM leagues WHERE id = ?1",
        params![league_id],
        |row| row.get::<_, u32>(0),
    )
    .optional()?
    .ok_or(LeagueError::LeagueNotFound(league_id))
}

fn bool_to_i64(v: bool) -> i64 {
    if v { 1 } else { 0 }
}
