mod input;
mod models;
mod run;
mod store;
mod tracker;
mod ui;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let data_dir = match get_data_dir() {
        Ok(dir) => Some(dir),
        Err(e) => {
            eprintln!("Warning: {e:#}. Changes will not be saved.");
            None
        }
    };
    if let Some(dir) = &data_dir {
        init_logging(dir);
    }

    let store = match &data_dir {
        Some(dir) => store::Store::open(&dir.join("spendtui.db")),
        None => store::Store::detached(),
    };
    let mut tracker = tracker::ExpenseTracker::load(store);

    match args.len() {
        1 => run::as_tui(&mut tracker),
        2.. => run::as_cli(&args, &mut tracker),
        _ => {
            eprintln!("Usage: spendtui [command]");
            Ok(())
        }
    }
}

/// Log to a file in the data directory; the terminal belongs to the TUI.
/// `SPENDTUI_LOG` overrides the default filter.
fn init_logging(data_dir: &Path) {
    let path = data_dir.join("spendtui.log");
    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: logging disabled, cannot open {}: {e}", path.display());
            return;
        }
    };

    let filter =
        EnvFilter::try_from_env("SPENDTUI_LOG").unwrap_or_else(|_| EnvFilter::new("spendtui=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn get_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "spendtui", "SpendTUI")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.to_path_buf())
}
