use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::boxscore::{BoxScoreRow, GameId};

pub const QUARTER_MINUTES: u32 = 10;
pub const QUARTERS: u32 = 4;

/// One recorded play from the game tape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayKind {
    FreeThrowMade,
    FreeThrowMissed,
    FieldGoal,
    ThreePointer,
    Foul,
}

impl PlayKind {
    pub fn points(self) -> u32 {
        match self {
            PlayKind::FreeThrowMade => 1,
            PlayKind::FieldGoal => 2,
            PlayKind::ThreePointer => 3,
            PlayKind::FreeThrowMissed | PlayKind::Foul => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayKind::FreeThrowMade => "made a free throw",
            PlayKind::FreeThrowMissed => "missed a free throw",
            PlayKind::FieldGoal => "made a bucket",
            PlayKind::ThreePointer => "hit a three",
            PlayKind::Foul => "committed a foul",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RundownEvent {
    pub minute: u32,
    pub player: String,
    pub kind: PlayKind,
}

pub fn team_score(events: &[RundownEvent]) -> u32 {
    events.iter().map(|ev| ev.kind.points()).sum()
}

/// Tally the event tape into per-player box score rows, in order of
/// first appearance. FGM counts every made field goal, threes
/// included, so 3PM <= FGM holds and
/// PTS = FTM + 2*(FGM - 3PM) + 3*3PM.
pub fn tally_box_rows(game: &GameId, events: &[RundownEvent]) -> Vec<BoxScoreRow> {
    let mut order: Vec<String> = Vec::new();
    let mut by_player: HashMap<String, BoxScoreRow> = HashMap::new();

    for ev in events {
        let row = by_player.entry(ev.player.clone()).or_insert_with(|| {
            order.push(ev.player.clone());
            BoxScoreRow::empty(game.clone(), ev.player.clone())
        });
        match ev.kind {
            PlayKind::FreeThrowMade => {
                row.ft_attempted += 1;
                row.ft_made += 1;
            }
            PlayKind::FreeThrowMissed => row.ft_attempted += 1,
            PlayKind::FieldGoal => row.fg_made += 1,
            PlayKind::ThreePointer => {
                row.fg_made += 1;
                row.three_made += 1;
            }
            PlayKind::Foul => row.fouls += 1,
        }
        row.points += ev.kind.points();
    }

    order
        .into_iter()
        .filter_map(|player| by_player.remove(&player))
        .collect()
}

/// Display lines for the Play by Play tab: one line per event with the
/// running team score, end-of-quarter markers, and a final result line
/// naming the winner.
pub fn render_lines(
    team: &str,
    opponent: &str,
    opponent_score: u32,
    events: &[RundownEvent],
) -> Vec<String> {
    let mut lines = Vec::with_capacity(events.len() + 6);
    let mut score = 0u32;

    for (idx, ev) in events.iter().enumerate() {
        score += ev.kind.points();
        lines.push(format!(
            "{:02}'  {:>3}  {} {}",
            ev.minute,
            score,
            ev.player,
            ev.kind.label()
        ));

        if let Some(next) = events.get(idx + 1) {
            let quarter = quarter_of(ev.minute);
            if quarter < QUARTERS && quarter_of(next.minute) > quarter {
                lines.push(format!(
                    "----- End of {} quarter, {team} {score} -----",
                    ordinal(quarter)
                ));
            }
        }
    }

    lines.push(format!(
        "----- Final score {team} {score} : {opponent_score} {opponent} -----"
    ));
    lines.push(winner_line(team, score, opponent, opponent_score));
    lines
}

pub fn winner_line(team: &str, team_score: u32, opponent: &str, opponent_score: u32) -> String {
    if team_score > opponent_score {
        format!("{team} win {team_score}:{opponent_score}")
    } else if team_score < opponent_score {
        format!("{opponent} win {opponent_score}:{team_score}")
    } else {
        format!("Tied at {team_score}")
    }
}

fn quarter_of(minute: u32) -> u32 {
    minute.max(1).div_ceil(QUARTER_MINUTES).min(QUARTERS)
}

fn ordinal(quarter: u32) -> &'static str {
    match quarter {
        1 => "1st",
        2 => "2nd",
        3 => "3rd",
        _ => "4th",
    }
}
