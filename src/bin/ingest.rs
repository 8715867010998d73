use std::path::PathBuf;

use anyhow::{Context, Result};

use hoops_terminal::dataset;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let data_dir = parse_path_arg("--data")
        .or_else(|| env_path("HOOPS_DATA_DIR"))
        .unwrap_or_else(|| PathBuf::from("data"));
    let db_path = parse_path_arg("--db")
        .or_else(|| env_path("HOOPS_DB"))
        .or_else(dataset::default_db_path)
        .context("unable to resolve sqlite path")?;

    let mut conn = dataset::open_db(&db_path)?;
    let summary = dataset::ingest_dir(&mut conn, db_path, &data_dir)?;

    println!("Season ingest complete");
    println!("DB: {}", summary.db_path.display());
    println!("Game files seen: {}", summary.files_seen);
    println!("Games upserted: {}", summary.games_upserted);
    if let Some(latest) = summary.latest_game {
        println!("Latest game: {latest}");
    }
    if !summary.errors.is_empty() {
        println!("Errors: {}", summary.errors.len());
        for err in summary.errors.iter().take(8) {
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
