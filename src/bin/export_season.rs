use std::path::PathBuf;

use anyhow::{Context, Result};

use hoops_terminal::{dataset, export};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let db_path = parse_path_arg("--db")
        .or_else(|| env_path("HOOPS_DB"))
        .or_else(dataset::default_db_path)
        .context("unable to resolve sqlite path")?;
    let out_path = parse_path_arg("--out")
        .or_else(|| env_path("HOOPS_EXPORT"))
        .unwrap_or_else(|| PathBuf::from("season_export.xlsx"));

    let conn = dataset::open_db(&db_path)?;
    let games = dataset::load_games(&conn)?;
    let report = export::export_season(&out_path, &games)?;

    println!("Season export complete");
    println!("Workbook: {}", report.path.display());
    println!("Games: {}", report.games);
    println!("Players: {}", report.players);
    println!("Rundown events: {}", report.events);
    if !report.errors.is_empty() {
        println!("Errors: {}", report.errors.len());
        for err in report.errors.iter().take(8) {
            println!(" - {err}");
        }
    }

    Ok(())
}

fn env_path(name: &str) -> Option<PathBuf> {
    let raw = std::env::var(name).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}

fn parse_path_arg(flag: &str) -> Option<PathBuf> {
    let prefix = format!("{flag}=");
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix(&prefix) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}
