use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use anyhow::{Context, Result};

use crate::dataset;
use crate::export::{self, ExportReport};
use crate::game_file::{self, LoadedGame};
use crate::season;
use crate::state::{Delta, ProviderCommand};

/// SQLite-backed provider. Loads the season once on startup and then
/// answers reload/export commands until the UI hangs up.
pub fn spawn_db_provider(
    db_path: PathBuf,
    roster_path: Option<PathBuf>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) {
    thread::spawn(move || {
        send_season(&db_path, &tx);
        send_roster(roster_path.as_deref(), &tx);

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::Reload => {
                    send_season(&db_path, &tx);
                    send_roster(roster_path.as_deref(), &tx);
                    let _ = tx.send(Delta::Log("[INFO] Season reloaded".to_string()));
                }
                ProviderCommand::Export { path } => match run_export(&db_path, &path) {
                    Ok(report) => {
                        let _ = tx.send(Delta::ExportFinished {
                            path,
                            games: report.games,
                            players: report.players,
                            events: report.events,
                            errors: report.errors.len(),
                        });
                    }
                    Err(err) => {
                        let _ = tx.send(Delta::Log(format!("[WARN] Export failed: {err:#}")));
                    }
                },
            }
        }
    });
}

/// Turn loaded games into the one delta the UI needs. Shared with the
/// demo provider.
pub fn build_season_delta(games: Vec<LoadedGame>) -> Result<Delta> {
    let totals = season::totals_per_game(&games).context("aggregate season")?;
    let summary = season::season_summary(&games, &totals).context("summarize season")?;
    let player_lines = season::player_season_lines(&games);
    Ok(Delta::SetSeason {
        games,
        totals,
        summary,
        player_lines,
    })
}

fn send_season(db_path: &Path, tx: &Sender<Delta>) {
    let delta = load_games(db_path).and_then(build_season_delta);
    match delta {
        Ok(delta) => {
            let _ = tx.send(delta);
        }
        Err(err) => {
            let _ = tx.send(Delta::DataError(format!("{err:#}")));
        }
    }
}

fn load_games(db_path: &Path) -> Result<Vec<LoadedGame>> {
    let conn = dataset::open_db(db_path)?;
    dataset::load_games(&conn)
}

fn send_roster(path: Option<&Path>, tx: &Sender<Delta>) {
    let Some(path) = path else {
        return;
    };
    if !path.exists() {
        return;
    }
    match game_file::load_roster(path) {
        Ok(roster) => {
            let _ = tx.send(Delta::SetRoster(roster));
        }
        Err(err) => {
            let _ = tx.send(Delta::Log(format!("[WARN] Roster load failed: {err:#}")));
        }
    }
}

fn run_export(db_path: &Path, out: &str) -> Result<ExportReport> {
    let games = load_games(db_path)?;
    export::export_season(Path::new(out), &games)
}
