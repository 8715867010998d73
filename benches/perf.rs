use std::hint::black_box;

use chrono::NaiveDate;
use criterion::{Criterion, criterion_group, criterion_main};

use hoops_terminal::aggregate::aggregate_game;
use hoops_terminal::boxscore::{BoxScoreRow, GameId};
use hoops_terminal::game_file::LoadedGame;
use hoops_terminal::rundown::{PlayKind, RundownEvent, tally_box_rows};
use hoops_terminal::season;

fn game_id(day_offset: u32) -> GameId {
    let opener = NaiveDate::from_ymd_opt(2025, 11, 1).expect("valid date");
    GameId::new(
        opener + chrono::Duration::days(i64::from(day_offset)),
        format!("Opponent {day_offset}"),
    )
}

fn sample_rows(id: &GameId, count: usize) -> Vec<BoxScoreRow> {
    (0..count as u32)
        .map(|i| BoxScoreRow {
            game: id.clone(),
            player: format!("P{i}"),
            points: 2 + i % 7,
            ft_attempted: 1 + i % 4,
            ft_made: i % 4,
            fg_made: 2 + i % 3,
            three_made: i % 3,
            fouls: i % 5,
        })
        .collect()
}

fn sample_tape(events: usize) -> Vec<RundownEvent> {
    const KINDS: [PlayKind; 5] = [
        PlayKind::FieldGoal,
        PlayKind::ThreePointer,
        PlayKind::FreeThrowMade,
        PlayKind::FreeThrowMissed,
        PlayKind::Foul,
    ];
    (0..events)
        .map(|i| RundownEvent {
            minute: 1 + (i * 39 / events.max(1)) as u32,
            player: format!("P{}", i % 9),
            kind: KINDS[i % KINDS.len()],
        })
        .collect()
}

fn sample_season(games: usize, rows_per_game: usize) -> Vec<LoadedGame> {
    (0..games)
        .map(|g| {
            let id = game_id(g as u32 * 7);
            let rows = sample_rows(&id, rows_per_game);
            let team_score = rows.iter().map(|r| r.points).sum();
            LoadedGame {
                id,
                team_score,
                opponent_score: 40,
                rows,
                rundown: Vec::new(),
            }
        })
        .collect()
}

fn bench_aggregate_game(c: &mut Criterion) {
    let id = game_id(0);
    let rows = sample_rows(&id, 500);
    c.bench_function("aggregate_game_500_rows", |b| {
        b.iter(|| {
            let totals = aggregate_game(black_box(&rows), black_box(&id)).unwrap();
            black_box(totals.points);
        })
    });
}

fn bench_tally_box_rows(c: &mut Criterion) {
    let id = game_id(0);
    let tape = sample_tape(4000);
    c.bench_function("tally_box_rows_4000_events", |b| {
        b.iter(|| {
            let rows = tally_box_rows(black_box(&id), black_box(&tape));
            black_box(rows.len());
        })
    });
}

fn bench_season_summary(c: &mut Criterion) {
    let games = sample_season(30, 12);
    c.bench_function("season_summary_30_games", |b| {
        b.iter(|| {
            let totals = season::totals_per_game(black_box(&games)).unwrap();
            let summary = season::season_summary(&games, &totals).unwrap();
            black_box(summary.points_per_game);
        })
    });
}

criterion_group!(
    benches,
    bench_aggregate_game,
    bench_tally_box_rows,
    bench_season_summary
);
criterion_main!(benches);
