use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::boxscore::{BoxScoreRow, GameId};
use crate::rundown::{self, RundownEvent};

/// On-disk schema of one game file. A file carries explicit box lines,
/// a rundown tape, or both; when box lines are absent they are tallied
/// from the tape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameFile {
    pub date: String,
    pub opponent: String,
    #[serde(default)]
    pub team_score: Option<u32>,
    pub opponent_score: u32,
    #[serde(default)]
    pub box_rows: Vec<BoxLine>,
    #[serde(default)]
    pub rundown: Vec<RundownEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxLine {
    pub player: String,
    #[serde(default)]
    pub pts: u32,
    #[serde(default)]
    pub fta: u32,
    #[serde(default)]
    pub ftm: u32,
    #[serde(default)]
    pub fgm: u32,
    #[serde(default, rename = "3pm")]
    pub three_pm: u32,
    #[serde(default)]
    pub pf: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RosterPlayer {
    pub number: u32,
    pub name: String,
    #[serde(default)]
    pub position: Option<String>,
}

/// A fully validated game, ready for aggregation and storage.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedGame {
    pub id: GameId,
    pub team_score: u32,
    pub opponent_score: u32,
    pub rows: Vec<BoxScoreRow>,
    pub rundown: Vec<RundownEvent>,
}

/// Result of scanning a game directory. Files that fail to parse are
/// reported, not fatal; the rest of the season still loads.
#[derive(Debug, Clone, Default)]
pub struct DirScan {
    pub games: Vec<LoadedGame>,
    pub errors: Vec<String>,
}

pub fn parse_game_json(raw: &str) -> Result<LoadedGame> {
    let file: GameFile = serde_json::from_str(raw).context("parse game json")?;
    let date = parse_game_date(&file.date)
        .ok_or_else(|| anyhow!("unrecognized game date {:?}", file.date))?;
    let id = GameId::new(date, file.opponent.clone());

    let rows = if file.box_rows.is_empty() {
        rundown::tally_box_rows(&id, &file.rundown)
    } else {
        let mut rows = Vec::with_capacity(file.box_rows.len());
        for line in &file.box_rows {
            let row = BoxScoreRow {
                game: id.clone(),
                player: line.player.clone(),
                points: line.pts,
                ft_attempted: line.fta,
                ft_made: line.ftm,
                fg_made: line.fgm,
                three_made: line.three_pm,
                fouls: line.pf,
            };
            row.check()?;
            rows.push(row);
        }
        rows
    };
    if rows.is_empty() {
        return Err(anyhow!("game {id} has neither box rows nor a rundown"));
    }

    let team_score = file
        .team_score
        .unwrap_or_else(|| rows.iter().map(|r| r.points).sum());

    Ok(LoadedGame {
        id,
        team_score,
        opponent_score: file.opponent_score,
        rows,
        rundown: file.rundown,
    })
}

pub fn parse_roster_json(raw: &str) -> Result<Vec<RosterPlayer>> {
    serde_json::from_str(raw).context("parse roster json")
}

pub fn load_roster(path: &Path) -> Result<Vec<RosterPlayer>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read roster {}", path.display()))?;
    parse_roster_json(&raw)
}

/// Parse every `*.json` game file under `dir`, sorted by game date
/// ascending (date ties break on opponent name).
pub fn load_game_dir(dir: &Path) -> Result<DirScan> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("read game dir {}", dir.display()))?;

    let mut scan = DirScan::default();
    for entry in entries {
        let entry = entry.with_context(|| format!("scan game dir {}", dir.display()))?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if path.file_name().and_then(|n| n.to_str()) == Some("roster.json") {
            continue;
        }
        let parsed = fs::read_to_string(&path)
            .with_context(|| format!("read {}", path.display()))
            .and_then(|raw| {
                parse_game_json(&raw).with_context(|| format!("parse {}", path.display()))
            });
        match parsed {
            Ok(game) => scan.games.push(game),
            Err(err) => scan.errors.push(format!("{err:#}")),
        }
    }

    scan.games.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(scan)
}

fn parse_game_date(raw: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y"];

    let cleaned = raw.trim();
    for fmt in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(cleaned, fmt) {
            return Some(date);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_date_accepts_iso_and_dotted() {
        let iso = parse_game_date("2025-11-08").expect("iso date");
        let dotted = parse_game_date("08.11.2025").expect("dotted date");
        assert_eq!(iso, dotted);
        assert!(parse_game_date("next saturday").is_none());
    }

    #[test]
    fn box_lines_win_over_rundown_when_both_present() {
        let raw = r#"{
            "date": "2025-11-08",
            "opponent": "Dockside Owls",
            "opponent_score": 40,
            "box_rows": [{"player": "K. Rook", "pts": 12, "fta": 2, "ftm": 2, "fgm": 5, "3pm": 0, "pf": 1}],
            "rundown": [{"minute": 3, "player": "K. Rook", "kind": "field_goal"}]
        }"#;
        let game = parse_game_json(raw).expect("valid game file");
        assert_eq!(game.rows.len(), 1);
        assert_eq!(game.rows[0].points, 12);
        assert_eq!(game.team_score, 12);
        assert_eq!(game.rundown.len(), 1);
    }

    #[test]
    fn invalid_box_line_is_rejected() {
        let raw = r#"{
            "date": "2025-11-08",
            "opponent": "Dockside Owls",
            "opponent_score": 40,
            "box_rows": [{"player": "K. Rook", "pts": 3, "fta": 1, "ftm": 2}]
        }"#;
        assert!(parse_game_json(raw).is_err());
    }

    #[test]
    fn empty_game_file_is_rejected() {
        let raw = r#"{"date": "2025-11-08", "opponent": "Dockside Owls", "opponent_score": 40}"#;
        assert!(parse_game_json(raw).is_err());
    }
}
