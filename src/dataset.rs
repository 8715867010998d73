use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, params};

use crate::boxscore::{BoxScoreRow, GameId};
use crate::game_file::{self, LoadedGame};
use crate::rundown::{PlayKind, RundownEvent};

const DATA_DIR: &str = "hoops_terminal";
const DB_FILE: &str = "season.sqlite";
const DATE_FMT: &str = "%Y-%m-%d";

pub fn app_data_dir() -> Option<PathBuf> {
    // Prefer XDG data.
    if let Ok(base) = std::env::var("XDG_DATA_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(DATA_DIR));
        }
    }
    // Fallback to ~/.local/share on linux-like systems.
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(DATA_DIR),
    )
}

pub fn default_db_path() -> Option<PathBuf> {
    app_data_dir().map(|dir| dir.join(DB_FILE))
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS games (
            game_date TEXT NOT NULL,
            opponent TEXT NOT NULL,
            team_score INTEGER NOT NULL,
            opponent_score INTEGER NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (game_date, opponent)
        );
        CREATE TABLE IF NOT EXISTS box_rows (
            game_date TEXT NOT NULL,
            opponent TEXT NOT NULL,
            player TEXT NOT NULL,
            points INTEGER NOT NULL,
            ft_attempted INTEGER NOT NULL,
            ft_made INTEGER NOT NULL,
            fg_made INTEGER NOT NULL,
            three_made INTEGER NOT NULL,
            fouls INTEGER NOT NULL,
            PRIMARY KEY (game_date, opponent, player)
        );
        CREATE TABLE IF NOT EXISTS rundown_events (
            game_date TEXT NOT NULL,
            opponent TEXT NOT NULL,
            seq INTEGER NOT NULL,
            minute INTEGER NOT NULL,
            player TEXT NOT NULL,
            kind TEXT NOT NULL,
            PRIMARY KEY (game_date, opponent, seq)
        );
        CREATE INDEX IF NOT EXISTS idx_games_date ON games(game_date);
        CREATE INDEX IF NOT EXISTS idx_box_rows_game ON box_rows(game_date, opponent);
        CREATE INDEX IF NOT EXISTS idx_rundown_game ON rundown_events(game_date, opponent);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

/// Replace one game's stored record: totals row plus all of its box
/// rows and rundown events, in a single transaction.
pub fn upsert_game(conn: &mut Connection, game: &LoadedGame) -> Result<()> {
    let date = game.id.date.format(DATE_FMT).to_string();
    let opponent = game.id.opponent.as_str();
    let tx = conn.transaction().context("begin upsert transaction")?;

    tx.execute(
        r#"
        INSERT INTO games (game_date, opponent, team_score, opponent_score, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(game_date, opponent) DO UPDATE SET
            team_score = excluded.team_score,
            opponent_score = excluded.opponent_score,
            updated_at = excluded.updated_at
        "#,
        params![
            date,
            opponent,
            game.team_score,
            game.opponent_score,
            Utc::now().to_rfc3339(),
        ],
    )
    .with_context(|| format!("upsert game {}", game.id))?;

    tx.execute(
        "DELETE FROM box_rows WHERE game_date = ?1 AND opponent = ?2",
        params![date, opponent],
    )?;
    for row in &game.rows {
        tx.execute(
            r#"
            INSERT INTO box_rows
                (game_date, opponent, player, points, ft_attempted, ft_made, fg_made, three_made, fouls)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                date,
                opponent,
                row.player,
                row.points,
                row.ft_attempted,
                row.ft_made,
                row.fg_made,
                row.three_made,
                row.fouls,
            ],
        )
        .with_context(|| format!("insert box row for {} / {}", game.id, row.player))?;
    }

    tx.execute(
        "DELETE FROM rundown_events WHERE game_date = ?1 AND opponent = ?2",
        params![date, opponent],
    )?;
    for (seq, ev) in game.rundown.iter().enumerate() {
        tx.execute(
            r#"
            INSERT INTO rundown_events (game_date, opponent, seq, minute, player, kind)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![date, opponent, seq as i64, ev.minute, ev.player, kind_code(ev.kind)],
        )
        .with_context(|| format!("insert rundown event {seq} for {}", game.id))?;
    }

    tx.commit().context("commit upsert transaction")?;
    Ok(())
}

/// All stored games, date ascending, each with its box rows and tape.
pub fn load_games(conn: &Connection) -> Result<Vec<LoadedGame>> {
    let mut stmt = conn
        .prepare(
            "SELECT game_date, opponent, team_score, opponent_score
             FROM games ORDER BY game_date ASC, opponent ASC",
        )
        .context("prepare games query")?;
    let headers = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, u32>(3)?,
            ))
        })
        .context("query games")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("read games")?;

    let mut games = Vec::with_capacity(headers.len());
    for (date_raw, opponent, team_score, opponent_score) in headers {
        let date = NaiveDate::parse_from_str(&date_raw, DATE_FMT)
            .with_context(|| format!("stored game date {date_raw:?}"))?;
        let id = GameId::new(date, opponent);
        let rows = load_box_rows(conn, &id, &date_raw)?;
        let rundown = load_rundown(conn, &id, &date_raw)?;
        games.push(LoadedGame {
            id,
            team_score,
            opponent_score,
            rows,
            rundown,
        });
    }
    Ok(games)
}

fn load_box_rows(conn: &Connection, id: &GameId, date_raw: &str) -> Result<Vec<BoxScoreRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT player, points, ft_attempted, ft_made, fg_made, three_made, fouls
             FROM box_rows WHERE game_date = ?1 AND opponent = ?2 ORDER BY player ASC",
        )
        .context("prepare box rows query")?;
    let rows = stmt
        .query_map(params![date_raw, id.opponent], |row| {
            Ok(BoxScoreRow {
                game: id.clone(),
                player: row.get(0)?,
                points: row.get(1)?,
                ft_attempted: row.get(2)?,
                ft_made: row.get(3)?,
                fg_made: row.get(4)?,
                three_made: row.get(5)?,
                fouls: row.get(6)?,
            })
        })
        .with_context(|| format!("query box rows for {id}"))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("read box rows for {id}"))?;
    Ok(rows)
}

fn load_rundown(conn: &Connection, id: &GameId, date_raw: &str) -> Result<Vec<RundownEvent>> {
    let mut stmt = conn
        .prepare(
            "SELECT minute, player, kind FROM rundown_events
             WHERE game_date = ?1 AND opponent = ?2 ORDER BY seq ASC",
        )
        .context("prepare rundown query")?;
    let raw = stmt
        .query_map(params![date_raw, id.opponent], |row| {
            Ok((
                row.get::<_, u32>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .with_context(|| format!("query rundown for {id}"))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("read rundown for {id}"))?;

    let mut events = Vec::with_capacity(raw.len());
    for (minute, player, kind) in raw {
        let kind = kind_from_code(&kind)
            .ok_or_else(|| anyhow!("unknown rundown kind {kind:?} stored for {id}"))?;
        events.push(RundownEvent {
            minute,
            player,
            kind,
        });
    }
    Ok(events)
}

#[derive(Debug, Clone)]
pub struct IngestSummary {
    pub db_path: PathBuf,
    pub files_seen: usize,
    pub games_upserted: usize,
    pub latest_game: Option<GameId>,
    pub errors: Vec<String>,
}

/// Scan `dir` for game files and upsert every game that parses.
pub fn ingest_dir(conn: &mut Connection, db_path: PathBuf, dir: &Path) -> Result<IngestSummary> {
    let scan = game_file::load_game_dir(dir)?;
    let files_seen = scan.games.len() + scan.errors.len();
    let mut errors = scan.errors;
    let mut upserted = 0usize;
    let mut latest: Option<GameId> = None;

    for game in &scan.games {
        match upsert_game(conn, game) {
            Ok(()) => {
                upserted += 1;
                if latest.as_ref().is_none_or(|cur| cur < &game.id) {
                    latest = Some(game.id.clone());
                }
            }
            Err(err) => errors.push(format!("{err:#}")),
        }
    }

    Ok(IngestSummary {
        db_path,
        files_seen,
        games_upserted: upserted,
        latest_game: latest,
        errors,
    })
}

fn kind_code(kind: PlayKind) -> &'static str {
    match kind {
        PlayKind::FreeThrowMade => "free_throw_made",
        PlayKind::FreeThrowMissed => "free_throw_missed",
        PlayKind::FieldGoal => "field_goal",
        PlayKind::ThreePointer => "three_pointer",
        PlayKind::Foul => "foul",
    }
}

fn kind_from_code(code: &str) -> Option<PlayKind> {
    match code {
        "free_throw_made" => Some(PlayKind::FreeThrowMade),
        "free_throw_missed" => Some(PlayKind::FreeThrowMissed),
        "field_goal" => Some(PlayKind::FieldGoal),
        "three_pointer" => Some(PlayKind::ThreePointer),
        "foul" => Some(PlayKind::Foul),
        _ => None,
    }
}
