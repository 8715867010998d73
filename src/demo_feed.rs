use std::env;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use rand::Rng;

use crate::boxscore::GameId;
use crate::data_feed;
use crate::game_file::{LoadedGame, RosterPlayer};
use crate::rundown::{PlayKind, RundownEvent, tally_box_rows, team_score};
use crate::state::{Delta, ProviderCommand};

const DEMO_ROSTER: [(u32, &str); 8] = [
    (4, "A. Stone"),
    (7, "R. Vega"),
    (9, "K. Rook"),
    (11, "J. Nox"),
    (13, "T. Vale"),
    (21, "L. Park"),
    (23, "D. Moss"),
    (32, "E. Pike"),
];

const DEMO_OPPONENTS: [&str; 9] = [
    "Dockside Owls",
    "Harbor Hawks",
    "Alley Cats",
    "Granite Bears",
    "Northside Foxes",
    "Pier Six Pelicans",
    "Old Town Otters",
    "Millrace Moose",
    "Quarry Rams",
];

/// Stand-in provider for when no season database exists yet: fabricates
/// a season of weekly games so every screen has something to show.
pub fn spawn_demo_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let mut rng = rand::thread_rng();
        let game_count = env::var("HOOPS_DEMO_GAMES")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(9)
            .clamp(2, DEMO_OPPONENTS.len());

        send_season(&tx, &mut rng, game_count);
        let roster = DEMO_ROSTER
            .iter()
            .map(|(number, name)| RosterPlayer {
                number: *number,
                name: (*name).to_string(),
                position: None,
            })
            .collect();
        let _ = tx.send(Delta::SetRoster(roster));
        let _ = tx.send(Delta::Log(
            "[INFO] Demo season (no database found); run the ingest bin to load real games"
                .to_string(),
        ));

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::Reload => {
                    send_season(&tx, &mut rng, game_count);
                    let _ = tx.send(Delta::Log("[INFO] Demo season regenerated".to_string()));
                }
                ProviderCommand::Export { .. } => {
                    let _ = tx.send(Delta::Log(
                        "[INFO] Export is unavailable for the demo season".to_string(),
                    ));
                }
            }
        }
    });
}

fn send_season(tx: &Sender<Delta>, rng: &mut impl Rng, game_count: usize) {
    let today = Utc::now().date_naive();
    let mut games = Vec::with_capacity(game_count);
    for idx in 0..game_count {
        let weeks_back = (game_count - idx) as i64;
        let date = today - ChronoDuration::weeks(weeks_back);
        games.push(demo_game(rng, date, DEMO_OPPONENTS[idx]));
    }

    match data_feed::build_season_delta(games) {
        Ok(delta) => {
            let _ = tx.send(delta);
        }
        Err(err) => {
            let _ = tx.send(Delta::DataError(format!("{err:#}")));
        }
    }
}

fn demo_game(rng: &mut impl Rng, date: NaiveDate, opponent: &str) -> LoadedGame {
    let mut events = Vec::new();
    for minute in 1..=40u32 {
        for _ in 0..rng.gen_range(0..=2) {
            let (_, player) = DEMO_ROSTER[rng.gen_range(0..DEMO_ROSTER.len())];
            let kind = match rng.gen_range(0..10) {
                0..=3 => PlayKind::FieldGoal,
                4 | 5 => PlayKind::ThreePointer,
                6 => PlayKind::FreeThrowMade,
                7 => PlayKind::FreeThrowMissed,
                _ => PlayKind::Foul,
            };
            events.push(RundownEvent {
                minute,
                player: player.to_string(),
                kind,
            });
        }
    }

    let id = GameId::new(date, opponent);
    let rows = tally_box_rows(&id, &events);
    let score = team_score(&events);
    let swing = rng.gen_range(-12i64..=12);
    let opponent_score = (i64::from(score) + swing).max(0) as u32;

    LoadedGame {
        id,
        team_score: score,
        opponent_score,
        rows,
        rundown: events,
    }
}
