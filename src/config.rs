use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Client-side tunables. Everything that is a per-user *setting* lives in
/// the `Profile` entity and syncs like any other record; this file only
/// carries knobs local to the device.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub account: AccountConfig,
  #[serde(default)]
  pub sync: SyncConfig,
  #[serde(default)]
  pub fuel: FuelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
  pub user_id: String,
  pub family_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
  /// Quiet period before a reorder batch commits, in milliseconds.
  #[serde(default = "default_debounce_ms")]
  pub reorder_debounce_ms: u64,
  /// Reentrancy-guard cap measured from timer-fire, in milliseconds.
  #[serde(default = "default_settle_ms")]
  pub reorder_settle_ms: u64,
}

fn default_debounce_ms() -> u64 {
  800
}

fn default_settle_ms() -> u64 {
  1500
}

impl Default for SyncConfig {
  fn default() -> Self {
    Self {
      reorder_debounce_ms: default_debounce_ms(),
      reorder_settle_ms: default_settle_ms(),
    }
  }
}

impl SyncConfig {
  pub fn debounce(&self) -> Duration {
    Duration::from_millis(self.reorder_debounce_ms)
  }

  pub fn settle(&self) -> Duration {
    Duration::from_millis(self.reorder_settle_ms)
  }
}

/// Fallbacks used before the profile has synced.
#[derive(Debug, Clone, Deserialize)]
pub struct FuelConfig {
  /// Price per gallon assumed when the profile has none yet.
  #[serde(default = "default_fuel_price")]
  pub default_price: f64,
}

fn default_fuel_price() -> f64 {
  3.50
}

impl Default for FuelConfig {
  fn default() -> Self {
    Self {
      default_price: default_fuel_price(),
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./larder.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/larder/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Err(eyre!(
        "No configuration file found. Create one at ~/.config/larder/config.yaml"
      )),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("larder.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("larder").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn minimal_config_gets_defaults() {
    let config: Config = serde_yaml::from_str(
      "account:\n  user_id: user-1\n  family_id: null\n",
    )
    .unwrap();

    assert_eq!(config.sync.debounce(), Duration::from_millis(800));
    assert_eq!(config.sync.settle(), Duration::from_millis(1500));
    assert_eq!(config.fuel.default_price, 3.50);
  }

  #[test]
  fn sync_windows_are_overridable() {
    let config: Config = serde_yaml::from_str(
      "account:\n  user_id: user-1\nsync:\n  reorder_debounce_ms: 100\n",
    )
    .unwrap();

    assert_eq!(config.sync.debounce(), Duration::from_millis(100));
    assert_eq!(config.sync.settle(), Duration::from_millis(1500));
  }
}
