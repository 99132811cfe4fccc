//! Dashboard configuration, read from an optional JSON file.

use crate::data::SAFE_EXPORT_FILE_NAME;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "dashboard.json";
/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "DASHBOARD_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Personnel CSV export to load.
    pub csv_path: PathBuf,
    /// File name suggested by the download dialog.
    pub export_file_name: String,
    /// Categories kept in top-N charts.
    pub top_n: usize,
    /// Rows shown in the data preview.
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("activos_feb_24.csv"),
            export_file_name: SAFE_EXPORT_FILE_NAME.to_string(),
            top_n: 10,
            preview_rows: 50,
        }
    }
}

impl DashboardConfig {
    /// Parse a config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Resolve the config for this run.
    ///
    /// `DASHBOARD_CONFIG` wins over `dashboard.json`; with neither present the
    /// defaults are used. A CSV path given on the command line overrides both.
    pub fn load(cli_csv: Option<PathBuf>) -> Result<Self> {
        let explicit = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(CONFIG_FILE_NAME).is_file() => {
                Self::from_file(Path::new(CONFIG_FILE_NAME))?
            }
            None => Self::default(),
        };

        if let Some(csv) = cli_csv {
            config.csv_path = csv;
        }
        if config.top_n == 0 {
            log::warn!("top_n of 0 would hide every category; using 10");
            config.top_n = 10;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{ "csv_path": "data/activos.csv", "top_n": 5 }}"#).unwrap();
        drop(file);

        let config = DashboardConfig::from_file(&path).unwrap();

        assert_eq!(config.csv_path, PathBuf::from("data/activos.csv"));
        assert_eq!(config.top_n, 5);
        assert_eq!(config.preview_rows, 50);
        assert_eq!(config.export_file_name, SAFE_EXPORT_FILE_NAME);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "not json").unwrap();

        let err = DashboardConfig::from_file(&path).unwrap_err();

        assert!(format!("{:#}", err).contains("parsing config"));
    }
}
