use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::boxscore::{BoxScoreRow, GameId};

/// The seven metrics every totals and comparison record carries. The
/// abbreviation/full-name pairs are a display contract; renderers and
/// exporters use them verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Points,
    FreethrowsAttempted,
    FreethrowsMade,
    FreethrowPercentage,
    FieldGoalsMade,
    ThreePointersMade,
    PersonalFouls,
}

pub const METRICS: [Metric; 7] = [
    Metric::Points,
    Metric::FreethrowsAttempted,
    Metric::FreethrowsMade,
    Metric::FreethrowPercentage,
    Metric::FieldGoalsMade,
    Metric::ThreePointersMade,
    Metric::PersonalFouls,
];

impl Metric {
    pub fn abbr(self) -> &'static str {
        match self {
            Metric::Points => "PTS",
            Metric::FreethrowsAttempted => "FTA",
            Metric::FreethrowsMade => "FTM",
            Metric::FreethrowPercentage => "FT%",
            Metric::FieldGoalsMade => "FGM",
            Metric::ThreePointersMade => "3PM",
            Metric::PersonalFouls => "PF",
        }
    }

    pub fn full_name(self) -> &'static str {
        match self {
            Metric::Points => "Points",
            Metric::FreethrowsAttempted => "Freethrows Attempted",
            Metric::FreethrowsMade => "Freethrows Made",
            Metric::FreethrowPercentage => "Freethrow Percentage",
            Metric::FieldGoalsMade => "Field Goals Made",
            Metric::ThreePointersMade => "Three Pointers Made",
            Metric::PersonalFouls => "Personal Fouls",
        }
    }

    /// FT% renders as a percentage; everything else is a plain count.
    pub fn is_percentage(self) -> bool {
        matches!(self, Metric::FreethrowPercentage)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("not enough data: {0}")]
    InsufficientData(String),
}

/// Team aggregate for one game, derived on demand from the box score
/// rows sharing a game id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameTotals {
    pub game: GameId,
    pub points: u32,
    pub ft_attempted: u32,
    pub ft_made: u32,
    /// made / attempted in [0, 1]; exactly 0.0 when nothing was attempted.
    pub ft_pct: f64,
    pub fg_made: u32,
    pub three_made: u32,
    pub fouls: u32,
}

impl GameTotals {
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Points => f64::from(self.points),
            Metric::FreethrowsAttempted => f64::from(self.ft_attempted),
            Metric::FreethrowsMade => f64::from(self.ft_made),
            Metric::FreethrowPercentage => self.ft_pct,
            Metric::FieldGoalsMade => f64::from(self.fg_made),
            Metric::ThreePointersMade => f64::from(self.three_made),
            Metric::PersonalFouls => f64::from(self.fouls),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    pub metric: Metric,
    pub delta: f64,
}

/// Delta between two games ordered by the caller. `previous` and
/// `current` are kept alongside the signed differences so renderers can
/// show both the values and the +/- indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchdayComparison {
    pub previous: GameTotals,
    pub current: GameTotals,
    pub deltas: [MetricDelta; 7],
}

impl MatchdayComparison {
    pub fn delta(&self, metric: Metric) -> f64 {
        self.deltas
            .iter()
            .find(|d| d.metric == metric)
            .map(|d| d.delta)
            .unwrap_or(0.0)
    }
}

pub fn ft_percentage(made: u32, attempted: u32) -> f64 {
    if attempted == 0 {
        0.0
    } else {
        f64::from(made) / f64::from(attempted)
    }
}

/// Sum every raw metric across `rows` and derive FT%. All rows must
/// belong to `game`; a stray row or an empty slice is a data error, not
/// something to aggregate around.
pub fn aggregate_game(rows: &[BoxScoreRow], game: &GameId) -> Result<GameTotals, StatError> {
    if rows.is_empty() {
        return Err(StatError::Validation(format!(
            "no box score rows for {game}"
        )));
    }

    let mut totals = GameTotals {
        game: game.clone(),
        points: 0,
        ft_attempted: 0,
        ft_made: 0,
        ft_pct: 0.0,
        fg_made: 0,
        three_made: 0,
        fouls: 0,
    };
    for row in rows {
        if &row.game != game {
            return Err(StatError::Validation(format!(
                "box score row for {} mixed into {game}",
                row.game
            )));
        }
        totals.points += row.points;
        totals.ft_attempted += row.ft_attempted;
        totals.ft_made += row.ft_made;
        totals.fg_made += row.fg_made;
        totals.three_made += row.three_made;
        totals.fouls += row.fouls;
    }
    totals.ft_pct = ft_percentage(totals.ft_made, totals.ft_attempted);
    Ok(totals)
}

/// current − previous for each display metric. Chronology is the
/// caller's job; this only refuses to compare a game with itself.
pub fn compare_games(
    previous: &GameTotals,
    current: &GameTotals,
) -> Result<MatchdayComparison, StatError> {
    if previous.game == current.game {
        return Err(StatError::Validation(format!(
            "cannot compare {} with itself",
            current.game
        )));
    }
    let deltas = METRICS.map(|metric| MetricDelta {
        metric,
        delta: current.metric(metric) - previous.metric(metric),
    });
    Ok(MatchdayComparison {
        previous: previous.clone(),
        current: current.clone(),
        deltas,
    })
}

/// Last two entries of a date-ascending slice, as (previous, current).
pub fn select_latest_and_previous(
    games: &[GameTotals],
) -> Result<(&GameTotals, &GameTotals), StatError> {
    if games.len() < 2 {
        return Err(StatError::InsufficientData(format!(
            "need two games for a matchday comparison, have {}",
            games.len()
        )));
    }
    Ok((&games[games.len() - 2], &games[games.len() - 1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ft_percentage_is_zero_without_attempts() {
        assert_eq!(ft_percentage(0, 0), 0.0);
        assert_eq!(ft_percentage(7, 10), 0.7);
    }

    #[test]
    fn metric_table_matches_display_contract() {
        let abbrs: Vec<&str> = METRICS.iter().map(|m| m.abbr()).collect();
        assert_eq!(abbrs, ["PTS", "FTA", "FTM", "FT%", "FGM", "3PM", "PF"]);

        let names: Vec<&str> = METRICS.iter().map(|m| m.full_name()).collect();
        assert_eq!(
            names,
            [
                "Points",
                "Freethrows Attempted",
                "Freethrows Made",
                "Freethrow Percentage",
                "Field Goals Made",
                "Three Pointers Made",
                "Personal Fouls",
            ]
        );
    }

    #[test]
    fn only_ft_pct_renders_as_percentage() {
        assert_eq!(
            METRICS.iter().filter(|m| m.is_percentage()).count(),
            1,
            "FT% is the only ratio metric"
        );
        assert!(Metric::FreethrowPercentage.is_percentage());
    }
}
