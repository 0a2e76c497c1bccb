//! CLI configuration utilities

use anyhow::{Context, Result};
use inkpost_session::ClientConfig;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory
pub const STATE_DIR_ENV: &str = "INKPOST_STATE_DIR";

/// Resolve the data directory: flag, then environment, then the platform default
pub fn data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| {
        std::env::var_os(STATE_DIR_ENV).map_or_else(
            || {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("inkpost")
            },
            PathBuf::from,
        )
    })
}

/// Load client configuration from an optional file plus the environment
pub fn load_client_config(path: Option<&Path>) -> Result<ClientConfig> {
    ClientConfig::load(path).with_context(|| match path {
        Some(path) => format!("loading configuration from {}", path.display()),
        None => "loading configuration".to_string(),
    })
}

/// Write the default configuration as JSON
pub fn generate_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(&ClientConfig::default())?;
    std::fs::write(path, content)?;
    Ok(())
}
