use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

fn default_id_field() -> String {
  "_id".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub backend: BackendConfig,
  /// Resource used when a command omits one (e.g., "products")
  pub default_resource: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
  /// Base URL of the storefront REST backend. An empty string means the
  /// backend is not configured and no requests may be issued.
  #[serde(default)]
  pub url: String,
  /// Name of the field holding a record's identifier within a collection
  #[serde(default = "default_id_field")]
  pub id_field: String,
}

impl BackendConfig {
  /// Whether a backend URL has been provided at all.
  pub fn is_configured(&self) -> bool {
    !self.url.trim().is_empty()
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./shopfront.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/shopfront/config.yaml
  /// 4. ~/.config/shopfront/config.yaml
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
        "No configuration file found. Create one at ~/.config/shopfront/config.yaml\n\
                 with a `backend.url` entry pointing at the storefront API."
      )),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("shopfront.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("shopfront").join("config.yaml");
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

  /// Get the backend API key from environment variables.
  ///
  /// Checks SHOPFRONT_API_KEY first, then STORE_API_KEY as fallback.
  /// Returns None when neither is set; the x-api-key header is then omitted.
  pub fn get_api_key() -> Option<String> {
    std::env::var("SHOPFRONT_API_KEY")
      .or_else(|_| std::env::var("STORE_API_KEY"))
      .ok()
      .filter(|k| !k.is_empty())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_minimal_config() {
    let config: Config = serde_yaml::from_str(
      "backend:\n  url: https://api.example.com\ndefault_resource: products\n",
    )
    .unwrap();

    assert_eq!(config.backend.url, "https://api.example.com");
    assert_eq!(config.backend.id_field, "_id");
    assert_eq!(config.default_resource.as_deref(), Some("products"));
    assert!(config.backend.is_configured());
  }

  #[test]
  fn empty_url_means_unconfigured() {
    let config: Config = serde_yaml::from_str("backend:\n  url: \"\"\n").unwrap();

    assert!(!config.backend.is_configured());
    assert!(config.default_resource.is_none());
  }

  #[test]
  fn custom_id_field_overrides_default() {
    let config: Config =
      serde_yaml::from_str("backend:\n  url: https://api.example.com\n  id_field: slug\n").unwrap();

    assert_eq!(config.backend.id_field, "slug");
  }
}
