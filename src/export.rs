use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::aggregate::{self, GameTotals, METRICS};
use crate::game_file::LoadedGame;
use crate::season;

#[derive(Debug, Clone)]
pub struct ExportReport {
    pub path: PathBuf,
    pub games: usize,
    pub players: usize,
    pub events: usize,
    pub errors: Vec<String>,
}

/// Write the season workbook: one sheet of per-game totals with deltas
/// against the previous matchday, one of per-player season lines, and
/// one of rundown events.
pub fn export_season(path: &Path, games: &[LoadedGame]) -> Result<ExportReport> {
    let totals = season::totals_per_game(games).context("aggregate games for export")?;
    let mut errors = Vec::new();

    let games_rows = games_rows(games, &totals, &mut errors);
    let player_lines = season::player_season_lines(games);
    let players_rows = players_rows(&player_lines);
    let rundown_rows = rundown_rows(games);

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Games")?;
        write_rows(sheet, &games_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Players")?;
        write_rows(sheet, &players_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Rundown")?;
        write_rows(sheet, &rundown_rows)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;

    Ok(ExportReport {
        path: path.to_path_buf(),
        games: games.len(),
        players: player_lines.len(),
        events: rundown_rows.len().saturating_sub(1),
        errors,
    })
}

fn games_rows(
    games: &[LoadedGame],
    totals: &[GameTotals],
    errors: &mut Vec<String>,
) -> Vec<Vec<String>> {
    let mut header = vec![
        "Date".to_string(),
        "Opponent".to_string(),
        "Result".to_string(),
    ];
    for metric in METRICS {
        header.push(metric.abbr().to_string());
    }
    for metric in METRICS {
        header.push(format!("{} vs prev", metric.abbr()));
    }

    let mut rows = vec![header];
    for (idx, (game, t)) in games.iter().zip(totals).enumerate() {
        let comparison = if idx == 0 {
            None
        } else {
            match aggregate::compare_games(&totals[idx - 1], t) {
                Ok(c) => Some(c),
                Err(err) => {
                    errors.push(err.to_string());
                    None
                }
            }
        };

        let mut row = vec![
            game.id.date.format("%Y-%m-%d").to_string(),
            game.id.opponent.clone(),
            format!(
                "{} {}:{}",
                result_code(game),
                game.team_score,
                game.opponent_score
            ),
        ];
        for metric in METRICS {
            row.push(format_value(metric.is_percentage(), t.metric(metric)));
        }
        for metric in METRICS {
            row.push(match &comparison {
                Some(c) => format_delta(metric.is_percentage(), c.delta(metric)),
                None => "-".to_string(),
            });
        }
        rows.push(row);
    }
    rows
}

fn players_rows(lines: &[season::PlayerSeasonLine]) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Player".to_string(),
        "Games".to_string(),
        "PTS".to_string(),
        "PPG".to_string(),
        "FTA".to_string(),
        "FTM".to_string(),
        "FT%".to_string(),
        "FGM".to_string(),
        "3PM".to_string(),
        "PF".to_string(),
    ]];
    for line in lines {
        rows.push(vec![
            line.player.clone(),
            line.games.to_string(),
            line.points.to_string(),
            format!("{:.1}", line.points_per_game),
            line.ft_attempted.to_string(),
            line.ft_made.to_string(),
            format!("{:.1}%", line.ft_pct * 100.0),
            line.fg_made.to_string(),
            line.three_made.to_string(),
            line.fouls.to_string(),
        ]);
    }
    rows
}

fn rundown_rows(games: &[LoadedGame]) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Date".to_string(),
        "Opponent".to_string(),
        "Minute".to_string(),
        "Player".to_string(),
        "Play".to_string(),
    ]];
    for game in games {
        for ev in &game.rundown {
            rows.push(vec![
                game.id.date.format("%Y-%m-%d").to_string(),
                game.id.opponent.clone(),
                ev.minute.to_string(),
                ev.player.clone(),
                ev.kind.label().to_string(),
            ]);
        }
    }
    rows
}

fn result_code(game: &LoadedGame) -> &'static str {
    if game.team_score > game.opponent_score {
        "W"
    } else if game.team_score < game.opponent_score {
        "L"
    } else {
        "T"
    }
}

fn format_value(percentage: bool, value: f64) -> String {
    if percentage {
        format!("{:.1}%", value * 100.0)
    } else {
        format!("{value:.0}")
    }
}

fn format_delta(percentage: bool, delta: f64) -> String {
    if percentage {
        // Percentage-point difference of the two ratios.
        format!("{:+.1}", delta * 100.0)
    } else {
        format!("{delta:+.0}")
    }
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxscore::{BoxScoreRow, GameId};
    use chrono::NaiveDate;

    fn loaded(day: u32, opponent: &str, points: u32) -> LoadedGame {
        let id = GameId::new(
            NaiveDate::from_ymd_opt(2025, 11, day).expect("valid date"),
            opponent,
        );
        let mut row = BoxScoreRow::empty(id.clone(), "A");
        row.points = points;
        LoadedGame {
            id,
            team_score: points,
            opponent_score: 40,
            rows: vec![row],
            rundown: Vec::new(),
        }
    }

    #[test]
    fn games_rows_put_deltas_after_the_first_game() {
        let games = vec![loaded(1, "Owls", 44), loaded(8, "Hawks", 50)];
        let totals = season::totals_per_game(&games).expect("homogeneous rows");
        let mut errors = Vec::new();
        let rows = games_rows(&games, &totals, &mut errors);

        assert!(errors.is_empty());
        assert_eq!(rows.len(), 3);
        // Seven value columns then seven delta columns after the three label columns.
        assert_eq!(rows[0].len(), 3 + 7 + 7);
        assert_eq!(rows[1][3], "44");
        assert_eq!(rows[1][10], "-");
        assert_eq!(rows[2][10], "+6");
    }

    #[test]
    fn delta_formatting_keeps_signs() {
        assert_eq!(format_delta(false, 6.0), "+6");
        assert_eq!(format_delta(false, -2.0), "-2");
        assert_eq!(format_delta(true, -0.05), "-5.0");
        assert_eq!(format_value(true, 0.8333), "83.3%");
    }
}
