//! Hegemon -- a Warlight bot speaking the line-oriented bot protocol.
//!
//! Reads server commands from stdin and writes moves to stdout. Logs go to
//! stderr; verbosity follows `RUST_LOG` (default `info`).
//!
//! Usage:
//!   hegemon [--config FILE]
//!
//! Without `--config`, the file named by `HEGEMON_CONFIG` is used if set,
//! and the built-in defaults otherwise.

use std::env;
use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{bail, Context};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hegemon::config::{EngineConfig, CONFIG_ENV};
use hegemon::engine::Engine;

/// Returns the config path from the command line or the environment.
fn config_path() -> anyhow::Result<Option<PathBuf>> {
    let args: Vec<String> = env::args().collect();
    let mut path = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let Some(p) = args.get(i) else {
                    bail!("--config needs a file path");
                };
                path = Some(PathBuf::from(p));
            }
            other => bail!("unknown argument: {}", other),
        }
        i += 1;
    }

    Ok(path.or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from)))
}

/// Runs the protocol loop until stdin closes.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = match config_path()? {
        Some(path) => EngineConfig::load(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    info!(version = env!("CARGO_PKG_VERSION"), "bot started");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut engine = Engine::new(config);

    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        engine.handle_line(&line, &mut out).context("writing stdout")?;
    }

    info!("input closed, shutting down");
    Ok(())
}
