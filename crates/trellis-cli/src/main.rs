//! `trellis` — admin CLI for a Trellis graph store.
//!
//! # Usage
//!
//! ```
//! trellis --db graph.db init
//! trellis node add --value '{"label":"a"}'
//! trellis edge add <SOURCE> <TARGET>
//! trellis node update <NODE> --value '{"label":"b"}'
//! trellis instance record <NODE> --type updated --value '{"label":"c"}'
//! trellis --config ~/.config/trellis/trellis.toml edge from <NODE> --live-endpoints
//! ```
//!
//! Results are printed to stdout as JSON; logs go to stderr.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use trellis_store_sqlite::SqliteStore;

use crate::{commands::Command, config::CliConfig};

#[derive(Parser, Debug)]
#[command(name = "trellis", author, version, about = "Soft-delete graph store")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "trellis.toml", value_name = "FILE")]
  config: PathBuf,

  /// Store file; overrides the config file and `TRELLIS_STORE_PATH`.
  #[arg(long, value_name = "FILE")]
  db: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = CliConfig::load(&cli.config, cli.db)?;

  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;
  tracing::debug!(path = ?cfg.store_path, "store opened");

  let out = commands::execute(&store, cli.command).await?;
  println!("{}", serde_json::to_string_pretty(&out)?);
  Ok(())
}
