use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::aggregate::{self, GameTotals, MatchdayComparison, StatError};
use crate::game_file::LoadedGame;

/// Season-level rollup for the homepage tiles. `latest` is None until
/// two games exist; the renderer shows "not enough games played yet".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub games_played: usize,
    pub wins: usize,
    pub points_per_game: f64,
    pub ft_pct: f64,
    pub latest: Option<MatchdayComparison>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSeasonLine {
    pub player: String,
    pub games: usize,
    pub points: u32,
    pub points_per_game: f64,
    pub ft_attempted: u32,
    pub ft_made: u32,
    pub ft_pct: f64,
    pub fg_made: u32,
    pub three_made: u32,
    pub fouls: u32,
}

/// Aggregate every loaded game, preserving the caller's (date
/// ascending) order.
pub fn totals_per_game(games: &[LoadedGame]) -> Result<Vec<GameTotals>, StatError> {
    games
        .iter()
        .map(|game| aggregate::aggregate_game(&game.rows, &game.id))
        .collect()
}

pub fn season_summary(
    games: &[LoadedGame],
    totals: &[GameTotals],
) -> Result<SeasonSummary, StatError> {
    let mut points = 0u32;
    let mut ft_attempted = 0u32;
    let mut ft_made = 0u32;
    for t in totals {
        points += t.points;
        ft_attempted += t.ft_attempted;
        ft_made += t.ft_made;
    }

    let latest = match aggregate::select_latest_and_previous(totals) {
        Ok((previous, current)) => Some(aggregate::compare_games(previous, current)?),
        Err(_) => None,
    };

    let games_played = totals.len();
    Ok(SeasonSummary {
        games_played,
        wins: games
            .iter()
            .filter(|g| g.team_score > g.opponent_score)
            .count(),
        points_per_game: if games_played == 0 {
            0.0
        } else {
            f64::from(points) / games_played as f64
        },
        ft_pct: aggregate::ft_percentage(ft_made, ft_attempted),
        latest,
    })
}

/// Per-player season lines, ordered by total points descending with
/// name as the tiebreak.
pub fn player_season_lines(games: &[LoadedGame]) -> Vec<PlayerSeasonLine> {
    let mut by_player: HashMap<String, PlayerSeasonLine> = HashMap::new();
    for game in games {
        for row in &game.rows {
            let line = by_player
                .entry(row.player.clone())
                .or_insert_with(|| PlayerSeasonLine {
                    player: row.player.clone(),
                    games: 0,
                    points: 0,
                    points_per_game: 0.0,
                    ft_attempted: 0,
                    ft_made: 0,
                    ft_pct: 0.0,
                    fg_made: 0,
                    three_made: 0,
                    fouls: 0,
                });
            line.games += 1;
            line.points += row.points;
            line.ft_attempted += row.ft_attempted;
            line.ft_made += row.ft_made;
            line.fg_made += row.fg_made;
            line.three_made += row.three_made;
            line.fouls += row.fouls;
        }
    }

    let mut lines: Vec<PlayerSeasonLine> = by_player.into_values().collect();
    for line in &mut lines {
        line.points_per_game = f64::from(line.points) / line.games as f64;
        line.ft_pct = aggregate::ft_percentage(line.ft_made, line.ft_attempted);
    }
    lines.sort_by(|a, b| b.points.cmp(&a.points).then(a.player.cmp(&b.player)));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxscore::{BoxScoreRow, GameId};
    use chrono::NaiveDate;

    fn loaded(day: u32, opponent: &str, player_points: &[(&str, u32)]) -> LoadedGame {
        let id = GameId::new(
            NaiveDate::from_ymd_opt(2025, 11, day).expect("valid date"),
            opponent,
        );
        let rows: Vec<BoxScoreRow> = player_points
            .iter()
            .map(|(player, points)| {
                let mut row = BoxScoreRow::empty(id.clone(), *player);
                row.points = *points;
                row
            })
            .collect();
        let team_score = rows.iter().map(|r| r.points).sum();
        LoadedGame {
            id,
            team_score,
            opponent_score: 30,
            rows,
            rundown: Vec::new(),
        }
    }

    #[test]
    fn summary_counts_wins_and_points_per_game() {
        let games = vec![
            loaded(1, "Owls", &[("A", 20), ("B", 12)]),
            loaded(8, "Hawks", &[("A", 14), ("B", 14)]),
        ];
        let totals = totals_per_game(&games).expect("homogeneous rows");
        let summary = season_summary(&games, &totals).expect("valid season");

        assert_eq!(summary.games_played, 2);
        assert_eq!(summary.wins, 1);
        assert_eq!(summary.points_per_game, 30.0);
        let latest = summary.latest.expect("two games played");
        assert_eq!(latest.current.game, games[1].id);
        assert_eq!(latest.delta(crate::aggregate::Metric::Points), -4.0);
    }

    #[test]
    fn single_game_season_has_no_comparison() {
        let games = vec![loaded(1, "Owls", &[("A", 20)])];
        let totals = totals_per_game(&games).expect("homogeneous rows");
        let summary = season_summary(&games, &totals).expect("valid season");
        assert!(summary.latest.is_none());
    }

    #[test]
    fn player_lines_rank_by_points() {
        let games = vec![
            loaded(1, "Owls", &[("A", 10), ("B", 12)]),
            loaded(8, "Hawks", &[("A", 20), ("B", 2)]),
        ];
        let lines = player_season_lines(&games);
        assert_eq!(lines[0].player, "A");
        assert_eq!(lines[0].points, 30);
        assert_eq!(lines[0].points_per_game, 15.0);
        assert_eq!(lines[1].player, "B");
    }
}
