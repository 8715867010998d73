use std::fmt;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identity of one matchday. The club plays at most one game per date,
/// but the opponent name keeps ids readable and unique across
/// rescheduled fixtures. Ordering is by date, then opponent.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameId {
    pub date: NaiveDate,
    pub opponent: String,
}

impl GameId {
    pub fn new(date: NaiveDate, opponent: impl Into<String>) -> Self {
        Self {
            date,
            opponent: opponent.into(),
        }
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.date.format("%d.%m.%Y"), self.opponent)
    }
}

/// One player's recorded stats for one game. Rows are read from the
/// data source and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxScoreRow {
    pub game: GameId,
    pub player: String,
    pub points: u32,
    pub ft_attempted: u32,
    pub ft_made: u32,
    pub fg_made: u32,
    pub three_made: u32,
    pub fouls: u32,
}

impl BoxScoreRow {
    pub fn empty(game: GameId, player: impl Into<String>) -> Self {
        Self {
            game,
            player: player.into(),
            points: 0,
            ft_attempted: 0,
            ft_made: 0,
            fg_made: 0,
            three_made: 0,
            fouls: 0,
        }
    }

    /// Row-level invariants. Counts are non-negative by construction;
    /// the made/attempted relations come from the data source.
    pub fn check(&self) -> Result<()> {
        if self.ft_made > self.ft_attempted {
            return Err(anyhow!(
                "{} {}: {} free throws made but only {} attempted",
                self.game,
                self.player,
                self.ft_made,
                self.ft_attempted
            ));
        }
        if self.three_made > self.fg_made {
            return Err(anyhow!(
                "{} {}: {} threes made but only {} field goals made",
                self.game,
                self.player,
                self.three_made,
                self.fg_made
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> GameId {
        GameId::new(
            NaiveDate::from_ymd_opt(2025, 11, 8).expect("valid date"),
            "Dockside Owls",
        )
    }

    #[test]
    fn game_id_orders_by_date_then_opponent() {
        let a = game();
        let b = GameId::new(a.date, "Harbor Hawks");
        let c = GameId::new(
            NaiveDate::from_ymd_opt(2025, 11, 15).expect("valid date"),
            "Alley Cats",
        );
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn check_rejects_made_over_attempted() {
        let mut row = BoxScoreRow::empty(game(), "N. Gray");
        row.ft_attempted = 2;
        row.ft_made = 3;
        assert!(row.check().is_err());

        row.ft_made = 2;
        assert!(row.check().is_ok());
    }

    #[test]
    fn check_rejects_threes_over_field_goals() {
        let mut row = BoxScoreRow::empty(game(), "N. Gray");
        row.fg_made = 1;
        row.three_made = 2;
        assert!(row.check().is_err());
    }
}
