mod actor;
mod ai;
mod app;
mod compose;
mod config;
mod constants;
mod input;
mod mail;
mod ui;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::Path;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::compose::{DraftSeed, SeedId};
use crate::config::Config;

fn setup_logging() {
    use std::fs::OpenOptions;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,posta=debug"));

    // The terminal belongs to the UI, so log to a file in the config directory
    let log_file = Config::config_dir()
        .ok()
        .and_then(|dir| std::fs::create_dir_all(&dir).ok().map(|_| dir))
        .map(|dir| dir.join("posta.log"))
        .and_then(|path| {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .ok()
        });

    if let Some(file) = log_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_usage() {
    eprintln!(
        r#"posta - Terminal message composer

Usage: posta [command]

Commands:
    (none)              Open a blank draft
    compose <file>      Open a draft pre-filled from a TOML file
                        (keys: to, subject, body)
    help                Show this help message

Configuration file: ~/.config/posta/config.toml
Sent messages are written as .eml files to the outbox directory.
"#
    );
}

/// On-disk shape of a draft seed
#[derive(Debug, Default, Deserialize)]
struct SeedFile {
    #[serde(default)]
    to: String,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    body: String,
}

fn load_seed(path: &Path) -> Result<DraftSeed> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read draft file: {}", path.display()))?;
    let file: SeedFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse draft file: {}", path.display()))?;

    // Every load is a new seed, even for the same file
    let id = SeedId(chrono::Utc::now().timestamp_millis().unsigned_abs());

    Ok(DraftSeed {
        id,
        to: file.to,
        subject: file.subject,
        body: file.body,
    })
}

async fn run_composer(seed: Option<DraftSeed>) -> Result<()> {
    setup_logging();

    let config = Config::load()?;
    config.ensure_dirs()?;

    crate::ui::theme::init_theme(config.ui.theme);

    let mut app = App::new(config, seed)?;
    app.run().await
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("help") | Some("--help") | Some("-h") => {
            print_usage();
            Ok(())
        }
        Some("compose") => {
            let Some(path) = args.get(2) else {
                eprintln!("compose needs a draft file");
                print_usage();
                std::process::exit(1);
            };
            let seed = load_seed(Path::new(path))?;
            run_composer(Some(seed)).await
        }
        Some(cmd) => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            std::process::exit(1);
        }
        None => run_composer(None).await,
    }
}
