use chrono::NaiveDate;

use hoops_terminal::aggregate::aggregate_game;
use hoops_terminal::boxscore::GameId;
use hoops_terminal::rundown::{PlayKind, RundownEvent, render_lines, tally_box_rows, team_score};

fn game() -> GameId {
    GameId::new(
        NaiveDate::from_ymd_opt(2025, 11, 8).expect("valid date"),
        "Harbor Hawks",
    )
}

fn ev(minute: u32, player: &str, kind: PlayKind) -> RundownEvent {
    RundownEvent {
        minute,
        player: player.to_string(),
        kind,
    }
}

fn sample_tape() -> Vec<RundownEvent> {
    vec![
        ev(2, "K. Rook", PlayKind::FieldGoal),
        ev(5, "T. Vale", PlayKind::ThreePointer),
        ev(9, "J. Nox", PlayKind::Foul),
        ev(13, "K. Rook", PlayKind::FreeThrowMade),
        ev(13, "K. Rook", PlayKind::FreeThrowMissed),
        ev(24, "T. Vale", PlayKind::FieldGoal),
        ev(37, "K. Rook", PlayKind::ThreePointer),
    ]
}

#[test]
fn tallied_rows_aggregate_to_the_running_score() {
    let id = game();
    let tape = sample_tape();
    let rows = tally_box_rows(&id, &tape);

    for row in &rows {
        row.check().expect("tallied rows satisfy row invariants");
    }

    let totals = aggregate_game(&rows, &id).expect("rows share the game id");
    assert_eq!(totals.points, team_score(&tape));
    assert_eq!(totals.points, 11);
    assert_eq!(totals.fg_made, 4);
    assert_eq!(totals.three_made, 2);
    assert_eq!(totals.ft_attempted, 2);
    assert_eq!(totals.ft_made, 1);
    assert_eq!(totals.fouls, 1);
}

#[test]
fn rows_come_out_in_first_appearance_order() {
    let rows = tally_box_rows(&game(), &sample_tape());
    let players: Vec<&str> = rows.iter().map(|r| r.player.as_str()).collect();
    assert_eq!(players, ["K. Rook", "T. Vale", "J. Nox"]);
}

#[test]
fn rendered_tape_carries_quarters_result_and_winner() {
    let tape = sample_tape();
    let lines = render_lines("Herons", "Harbor Hawks", 9, &tape);

    // One line per event plus markers and the two closing lines.
    assert!(lines.len() >= tape.len() + 2);
    assert!(lines[0].starts_with("02'"));

    let markers: Vec<&String> = lines.iter().filter(|l| l.contains("End of")).collect();
    assert_eq!(markers.len(), 3, "crossings into Q2, Q3 and Q4");

    let final_line = &lines[lines.len() - 2];
    assert!(final_line.contains("Final score Herons 11 : 9 Harbor Hawks"));
    assert_eq!(lines.last().map(String::as_str), Some("Herons win 11:9"));
}

#[test]
fn empty_tape_still_renders_a_result() {
    let lines = render_lines("Herons", "Harbor Hawks", 2, &[]);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Final score Herons 0 : 2 Harbor Hawks"));
    assert_eq!(lines[1], "Harbor Hawks win 2:0");
}
