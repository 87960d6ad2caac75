//! Runtime configuration for the `trellis` binary.
//!
//! Sources, lowest precedence first: built-in defaults, the TOML file named
//! by `--config`, `TRELLIS_*` environment variables, and finally `--db`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Store path used when nothing else names one.
pub const DEFAULT_STORE_PATH: &str = "trellis.db";

#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
  pub store_path: PathBuf,
}

impl CliConfig {
  /// Layer the config file (optional) and `TRELLIS_*` environment variables
  /// over the defaults, then apply an explicit override.
  pub fn load(file: &Path, store_override: Option<PathBuf>) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("store_path", DEFAULT_STORE_PATH)?
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("TRELLIS"))
      .build()
      .with_context(|| format!("failed to read config file {}", file.display()))?;

    let mut cfg: CliConfig = settings
      .try_deserialize()
      .context("failed to deserialise CliConfig")?;

    if let Some(path) = store_override {
      cfg.store_path = path;
    }
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
