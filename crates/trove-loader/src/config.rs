//! Loader configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use trove_store_sqlite::StoreConfig;

/// Settings read from `trove.toml` and `TROVE_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct LoaderConfig {
  /// Warehouse file; a leading `~/` is expanded.
  #[serde(default = "default_store_path")]
  pub store_path:      PathBuf,
  #[serde(default = "default_busy_timeout_ms")]
  pub busy_timeout_ms: u64,
}

fn default_store_path() -> PathBuf { PathBuf::from("trove.db") }

fn default_busy_timeout_ms() -> u64 { StoreConfig::default().busy_timeout_ms }

impl Default for LoaderConfig {
  fn default() -> Self {
    Self {
      store_path:      default_store_path(),
      busy_timeout_ms: default_busy_timeout_ms(),
    }
  }
}

impl LoaderConfig {
  pub fn store(&self) -> StoreConfig {
    StoreConfig { busy_timeout_ms: self.busy_timeout_ms }
  }

  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
