#![deny(warnings)]

//! Headless admin CLI: validate pasted event JSON, import it into a local
//! store snapshot, or export an industry's events back out.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use content_core::IndustryId;
use content_schema::{export_events, import_events, ImportError};
use content_store::{EventStore, MemoryStore};

/// Optional defaults read from `studio.yaml` next to the working directory.
#[derive(Debug, Default, Deserialize)]
struct Config {
    #[serde(default)]
    industry: Option<String>,
    #[serde(default)]
    store_path: Option<PathBuf>,
}

fn load_config() -> Config {
    match std::fs::read_to_string("studio.yaml") {
        Ok(text) => serde_yaml::from_str(&text).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

struct Args {
    command: String,
    file: Option<PathBuf>,
    industry: Option<String>,
    store_path: Option<PathBuf>,
}

fn parse_args() -> Args {
    let mut command = String::new();
    let mut file = None;
    let mut industry = None;
    let mut store_path = None;
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--industry" => industry = it.next(),
            "--store" => store_path = it.next().map(PathBuf::from),
            _ if command.is_empty() => command = arg,
            _ if file.is_none() => file = Some(PathBuf::from(arg)),
            _ => {}
        }
    }
    Args {
        command,
        file,
        industry,
        store_path,
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let config = load_config();
    let args = parse_args();
    let industry = args
        .industry
        .or(config.industry)
        .map(IndustryId)
        .unwrap_or_else(|| IndustryId(String::new()));
    let store_path = args
        .store_path
        .or(config.store_path)
        .unwrap_or_else(|| PathBuf::from("content.json"));

    match args.command.as_str() {
        "validate" => validate(args.file),
        "import" => import(args.file, &industry, &store_path),
        "export" => export(&industry, &store_path),
        other => {
            bail!("unknown command {other:?}; expected validate, import or export")
        }
    }
}

fn read_file(file: Option<PathBuf>) -> Result<String> {
    let path = file.context("missing <file> argument")?;
    std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
}

fn validate(file: Option<PathBuf>) -> Result<()> {
    let text = read_file(file)?;
    match import_events(&text) {
        Ok(events) => {
            println!("OK | {} event(s) pass validation", events.len());
            Ok(())
        }
        Err(ImportError::Parse(message)) => bail!("invalid JSON: {message}"),
        Err(ImportError::Schema(errors)) => {
            for error in &errors {
                eprintln!("{error}");
            }
            bail!("{} schema violation(s)", errors.len())
        }
        Err(other) => bail!(other),
    }
}

fn import(file: Option<PathBuf>, industry: &IndustryId, store_path: &Path) -> Result<()> {
    if industry.0.trim().is_empty() {
        bail!("import needs --industry (or an `industry` entry in studio.yaml)");
    }
    let text = read_file(file)?;
    let events = match import_events(&text) {
        Ok(events) => events,
        Err(ImportError::Schema(errors)) => {
            for error in &errors {
                eprintln!("{error}");
            }
            bail!("batch rejected: {} schema violation(s)", errors.len())
        }
        Err(e) => bail!(e),
    };

    let mut store = MemoryStore::load(store_path)?;
    let count = events.len();
    for event in &events {
        store.upsert_event(industry, event)?;
    }
    store.save(store_path)?;
    info!(industry = %industry, count, "import complete");
    println!(
        "Imported {count} event(s) into {} | store: {}",
        industry,
        store_path.display()
    );
    Ok(())
}

fn export(industry: &IndustryId, store_path: &Path) -> Result<()> {
    if industry.0.trim().is_empty() {
        bail!("export needs --industry (or an `industry` entry in studio.yaml)");
    }
    let store = MemoryStore::load(store_path)?;
    let events = store.fetch_events(industry)?;
    println!("{}", export_events(&events)?);
    Ok(())
}
