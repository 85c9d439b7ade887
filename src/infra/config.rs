//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/dev.toml

use crate::services::csv_export::CsvFieldConfig;
use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SiteConfig {
    /// Site identifier used in logs (e.g., "coastal-realty")
    #[serde(default = "default_site_id")]
    pub id: String,
}

fn default_site_id() -> String {
    "openhouse".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Directory export files are written into
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// CSV column toggles; unset columns default to enabled
    #[serde(default)]
    pub csv_fields: CsvFieldConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { output_dir: default_output_dir(), csv_fields: CsvFieldConfig::default() }
    }
}

fn default_output_dir() -> String {
    "exports".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SequenceConfig {
    /// Timeout for a single touchpoint execution
    #[serde(default = "default_touchpoint_timeout_ms")]
    pub touchpoint_timeout_ms: u64,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self { touchpoint_timeout_ms: default_touchpoint_timeout_ms() }
    }
}

fn default_touchpoint_timeout_ms() -> u64 {
    30_000
}

#[derive(Debug, Clone, Deserialize, Default)]
struct TomlConfig {
    #[serde(default)]
    site: SiteConfig,
    #[serde(default)]
    export: ExportConfig,
    #[serde(default)]
    sequence: SequenceConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    site_id: String,
    output_dir: String,
    csv_fields: CsvFieldConfig,
    touchpoint_timeout_ms: u64,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_id: default_site_id(),
            output_dir: default_output_dir(),
            csv_fields: CsvFieldConfig::default(),
            touchpoint_timeout_ms: default_touchpoint_timeout_ms(),
            config_file: "default".to_string(),
        }
    }
}

impl Config {
    /// Determine config file path from args or environment
    pub fn resolve_config_path(args: &[String]) -> String {
        for (i, arg) in args.iter().enumerate() {
            if arg == "--config" {
                if let Some(path) = args.get(i + 1) {
                    return path.clone();
                }
            }
            if let Some(path) = arg.strip_prefix("--config=") {
                return path.to_string();
            }
        }

        if let Ok(path) = env::var("CONFIG_FILE") {
            return path;
        }

        "config/dev.toml".to_string()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self {
            site_id: toml_config.site.id,
            output_dir: toml_config.export.output_dir,
            csv_fields: toml_config.export.csv_fields,
            touchpoint_timeout_ms: toml_config.sequence.touchpoint_timeout_ms,
            config_file: path.display().to_string(),
        })
    }

    /// Load configuration - tries the TOML file first, falls back to defaults
    pub fn load_from_path(path: &str) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    pub fn output_dir(&self) -> &str {
        &self.output_dir
    }

    pub fn csv_fields(&self) -> &CsvFieldConfig {
        &self.csv_fields
    }

    pub fn touchpoint_timeout_ms(&self) -> u64 {
        self.touchpoint_timeout_ms
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.site_id(), "openhouse");
        assert_eq!(config.output_dir(), "exports");
        assert_eq!(config.touchpoint_timeout_ms(), 30_000);
        assert!(config.csv_fields().phone);
    }

    #[test]
    fn test_resolve_config_path_default() {
        let args: Vec<String> = vec!["openhouse-core".to_string()];
        assert_eq!(Config::resolve_config_path(&args), "config/dev.toml");
    }

    #[test]
    fn test_resolve_config_path_from_arg() {
        let args: Vec<String> = vec![
            "openhouse-core".to_string(),
            "--config".to_string(),
            "config/prod.toml".to_string(),
        ];
        assert_eq!(Config::resolve_config_path(&args), "config/prod.toml");
    }

    #[test]
    fn test_resolve_config_path_from_arg_equals() {
        let args: Vec<String> =
            vec!["openhouse-core".to_string(), "--config=config/site.toml".to_string()];
        assert_eq!(Config::resolve_config_path(&args), "config/site.toml");
    }
}
