use chrono::NaiveDate;

use hoops_terminal::aggregate::{
    self, GameTotals, METRICS, Metric, StatError, aggregate_game, compare_games,
    select_latest_and_previous,
};
use hoops_terminal::boxscore::{BoxScoreRow, GameId};

fn game(day: u32, opponent: &str) -> GameId {
    GameId::new(
        NaiveDate::from_ymd_opt(2025, 11, day).expect("valid date"),
        opponent,
    )
}

#[allow(clippy::too_many_arguments)]
fn row(
    game: &GameId,
    player: &str,
    pts: u32,
    fta: u32,
    ftm: u32,
    fgm: u32,
    tpm: u32,
    pf: u32,
) -> BoxScoreRow {
    BoxScoreRow {
        game: game.clone(),
        player: player.to_string(),
        points: pts,
        ft_attempted: fta,
        ft_made: ftm,
        fg_made: fgm,
        three_made: tpm,
        fouls: pf,
    }
}

#[test]
fn aggregate_sums_every_metric_across_rows() {
    let id = game(1, "Dockside Owls");
    let rows = vec![
        row(&id, "A", 10, 0, 0, 5, 0, 1),
        row(&id, "B", 8, 0, 0, 4, 0, 2),
        row(&id, "C", 6, 0, 0, 3, 0, 0),
    ];
    let totals = aggregate_game(&rows, &id).expect("homogeneous rows");
    assert_eq!(totals.points, 24);
    assert_eq!(totals.fg_made, 12);
    assert_eq!(totals.fouls, 3);
    assert_eq!(totals.ft_attempted, 0);
    assert_eq!(totals.ft_pct, 0.0, "no attempts means 0, not NaN");
}

#[test]
fn aggregate_matches_worked_example() {
    let id = game(1, "Dockside Owls");
    let rows = vec![
        row(&id, "K. Rook", 10, 4, 3, 3, 1, 2),
        row(&id, "J. Nox", 8, 2, 2, 3, 0, 1),
    ];
    let totals = aggregate_game(&rows, &id).expect("homogeneous rows");

    assert_eq!(totals.points, 18);
    assert_eq!(totals.ft_attempted, 6);
    assert_eq!(totals.ft_made, 5);
    assert!((totals.ft_pct - 5.0 / 6.0).abs() < 1e-9);
    assert_eq!(totals.fg_made, 6);
    assert_eq!(totals.three_made, 1);
    assert_eq!(totals.fouls, 3);
}

#[test]
fn aggregate_rejects_empty_and_mixed_input() {
    let id = game(1, "Dockside Owls");
    let err = aggregate_game(&[], &id).expect_err("empty input");
    assert!(matches!(err, StatError::Validation(_)));

    let other = game(8, "Harbor Hawks");
    let rows = vec![row(&id, "A", 4, 0, 0, 2, 0, 0), row(&other, "B", 2, 0, 0, 1, 0, 0)];
    let err = aggregate_game(&rows, &id).expect_err("mixed game ids");
    assert!(matches!(err, StatError::Validation(_)));
}

#[test]
fn free_throw_percentage_examples() {
    let id = game(1, "Dockside Owls");
    let rows = vec![row(&id, "A", 7, 10, 7, 0, 0, 0)];
    let totals = aggregate_game(&rows, &id).expect("homogeneous rows");
    assert_eq!(totals.ft_pct, 0.7);
}

fn totals(day: u32, opponent: &str, pts: u32, fta: u32, ftm: u32, fgm: u32, tpm: u32, pf: u32) -> GameTotals {
    GameTotals {
        game: game(day, opponent),
        points: pts,
        ft_attempted: fta,
        ft_made: ftm,
        ft_pct: aggregate::ft_percentage(ftm, fta),
        fg_made: fgm,
        three_made: tpm,
        fouls: pf,
    }
}

#[test]
fn compare_matches_worked_example() {
    let previous = totals(1, "Dockside Owls", 18, 6, 5, 6, 1, 3);
    let current = totals(8, "Harbor Hawks", 24, 6, 5, 8, 2, 4);
    let comparison = compare_games(&previous, &current).expect("distinct games");

    assert_eq!(comparison.delta(Metric::Points), 6.0);
    assert_eq!(comparison.delta(Metric::FreethrowsAttempted), 0.0);
    assert_eq!(comparison.delta(Metric::FreethrowsMade), 0.0);
    assert_eq!(comparison.delta(Metric::FreethrowPercentage), 0.0);
    assert_eq!(comparison.delta(Metric::FieldGoalsMade), 2.0);
    assert_eq!(comparison.delta(Metric::ThreePointersMade), 1.0);
    assert_eq!(comparison.delta(Metric::PersonalFouls), 1.0);
}

#[test]
fn compare_is_anti_symmetric() {
    let a = totals(1, "Dockside Owls", 44, 10, 6, 16, 3, 9);
    let b = totals(8, "Harbor Hawks", 51, 4, 4, 20, 5, 7);
    let forward = compare_games(&a, &b).expect("distinct games");
    let backward = compare_games(&b, &a).expect("distinct games");

    for metric in METRICS {
        assert_eq!(
            forward.delta(metric),
            -backward.delta(metric),
            "{} should flip sign",
            metric.abbr()
        );
    }
}

#[test]
fn compare_rejects_a_game_against_itself() {
    let a = totals(1, "Dockside Owls", 44, 10, 6, 16, 3, 9);
    let err = compare_games(&a, &a).expect_err("same game twice");
    assert!(matches!(err, StatError::Validation(_)));
}

#[test]
fn latest_and_previous_need_two_games() {
    let single = vec![totals(1, "Dockside Owls", 44, 10, 6, 16, 3, 9)];
    let err = select_latest_and_previous(&single).expect_err("one game only");
    assert!(matches!(err, StatError::InsufficientData(_)));
    assert!(matches!(
        select_latest_and_previous(&[]),
        Err(StatError::InsufficientData(_))
    ));
}

#[test]
fn latest_and_previous_return_the_tail_in_order() {
    let season = vec![
        totals(1, "Dockside Owls", 40, 2, 1, 18, 1, 5),
        totals(8, "Harbor Hawks", 44, 4, 2, 19, 2, 6),
        totals(15, "Alley Cats", 51, 6, 5, 21, 3, 4),
    ];
    let (previous, current) = select_latest_and_previous(&season).expect("three games");
    assert_eq!(previous.game, season[1].game);
    assert_eq!(current.game, season[2].game);
}
