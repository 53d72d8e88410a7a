mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./prores-dater.toml", "~/.config/prores-dater/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.output.dir_name.trim().is_empty() {
        anyhow::bail!("output.dir_name cannot be empty");
    }

    if config.naming.dated_name.trim().is_empty() {
        anyhow::bail!("naming.dated_name cannot be empty");
    }
    if config.naming.undated_name.trim().is_empty() {
        anyhow::bail!("naming.undated_name cannot be empty");
    }

    crate::naming::check_date_format(&config.naming.date_format).map_err(|e| {
        anyhow::anyhow!(
            "Invalid naming.date_format {:?}: {}",
            config.naming.date_format,
            e
        )
    })?;

    for (name, path) in [
        ("ffmpeg", &config.tools.ffmpeg_path),
        ("ffprobe", &config.tools.ffprobe_path),
    ] {
        if let Some(path) = path {
            if !path.exists() {
                tracing::warn!("Configured {} path does not exist: {:?}", name, path);
            }
        }
    }

    Ok(())
}
