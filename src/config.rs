use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use crate::error::DashboardError;

/// Environment variable overriding the data file path.
pub const DATA_ENV: &str = "SUPERSTORE_DATA";

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

/// Superstore campaign dashboard
#[derive(Parser, Debug, Default)]
#[command(name = "superstore-dashboard")]
#[command(about = "Explore customer data and campaign performance")]
pub struct Args {
    /// Customer data file (.csv, .parquet or .json)
    pub data: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Dataset loaded at startup.
    pub data_path: PathBuf,
    pub window_width: f32,
    pub window_height: f32,
    /// Height of every chart.
    pub plot_height: f32,
    /// Rows shown in the data preview table.
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("superstorecampaign_data.csv"),
            window_width: 1280.0,
            window_height: 900.0,
            plot_height: 260.0,
            preview_rows: 50,
        }
    }
}

impl DashboardConfig {
    /// Resolve the configuration: defaults, then the JSON config file, then
    /// `SUPERSTORE_DATA`, then the positional data path.
    pub fn resolve(args: &Args) -> Result<Self> {
        Self::resolve_with(args, std::env::var_os(DATA_ENV))
    }

    fn resolve_with(args: &Args, env_data: Option<OsString>) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_json_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_json_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        if let Some(path) = env_data.filter(|p| !p.is_empty()) {
            config.data_path = PathBuf::from(path);
        }
        if let Some(path) = &args.data {
            config.data_path = path.clone();
        }

        config.validate()?;
        log::info!("data file: {}", config.data_path.display());
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<(), DashboardError> {
        if self.window_width <= 0.0 || self.window_height <= 0.0 {
            return Err(DashboardError::Config(format!(
                "window size must be positive, got {}x{}",
                self.window_width, self.window_height
            )));
        }
        if self.plot_height <= 0.0 {
            return Err(DashboardError::Config(format!(
                "plot_height must be positive, got {}",
                self.plot_height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_defaults() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("dash.json");
        std::fs::write(&path, r#"{ "preview_rows": 10, "data_path": "a.csv" }"#).unwrap();

        let args = Args {
            data: None,
            config: Some(path),
        };
        let config = DashboardConfig::resolve_with(&args, None).unwrap();
        assert_eq!(config.preview_rows, 10);
        assert_eq!(config.data_path, PathBuf::from("a.csv"));
        assert_eq!(config.plot_height, DashboardConfig::default().plot_height);
    }

    #[test]
    fn cli_path_beats_env_beats_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("dash.json");
        std::fs::write(&path, r#"{ "data_path": "file.csv" }"#).unwrap();

        let mut args = Args {
            data: None,
            config: Some(path),
        };
        let from_env =
            DashboardConfig::resolve_with(&args, Some(OsString::from("env.csv"))).unwrap();
        assert_eq!(from_env.data_path, PathBuf::from("env.csv"));

        args.data = Some(PathBuf::from("cli.parquet"));
        let from_cli =
            DashboardConfig::resolve_with(&args, Some(OsString::from("env.csv"))).unwrap();
        assert_eq!(from_cli.data_path, PathBuf::from("cli.parquet"));
    }

    #[test]
    fn rejects_non_positive_sizes() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("dash.json");
        std::fs::write(&path, r#"{ "plot_height": 0 }"#).unwrap();

        let args = Args {
            data: None,
            config: Some(path),
        };
        let err = DashboardConfig::resolve_with(&args, None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DashboardError>(),
            Some(DashboardError::Config(_))
        ));
    }

    #[test]
    fn unreadable_config_is_an_error() {
        let args = Args {
            data: None,
            config: Some(PathBuf::from("/definitely/not/here.json")),
        };
        assert!(DashboardConfig::resolve_with(&args, None).is_err());
    }
}
