pub mod builder;
pub mod defaults;
pub mod merge;
pub mod types;


pub use builder::ConfigBuilder;
pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Main configuration loading function
///
/// Returns the parsed file (or an empty input when the file does not exist)
/// and the directory relative paths in the configuration are resolved against.
pub fn load_config(config_file: &str) -> Result<(ConfigInput, PathBuf)> {
    let config_dir = match Path::new(config_file).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let config_input = if Path::new(config_file).exists() {
        let contents = std::fs::read_to_string(config_file)
            .with_context(|| format!("Failed to read config file: {}", config_file))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Invalid config file: {}", config_file))?
    } else {
        ConfigInput::default()
    };

    let root_dir = std::path::absolute(&config_dir)
        .with_context(|| format!("Failed to resolve {}", config_dir.display()))?;

    Ok((config_input, root_dir))
}
