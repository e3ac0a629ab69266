//! Application configuration, loaded from an optional TOML file.

use crate::charts::ChartVariant;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "forest_dash.toml";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub server: ServerConfig,
    pub chart: ChartConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DataConfig {
    pub path: PathBuf,
    /// Which table row to chart (0 is the first data row).
    pub row: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("static/data/LandUseChange_Forest_1990_2016.csv"),
            row: 0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8050,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChartConfig {
    pub variant: String,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            variant: ChartVariant::default().name().to_string(),
            width: 900,
            height: 700,
        }
    }
}

impl ChartConfig {
    pub fn variant(&self) -> Result<ChartVariant> {
        ChartVariant::from_name(&self.variant).context("Invalid [chart] variant in configuration")
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }

    /// Load `path` if given, else the default file if present, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::load_from_file(default_path)
                } else {
                    tracing::debug!("no {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_dashboard() {
        let config = AppConfig::default();
        assert_eq!(
            config.data.path,
            PathBuf::from("static/data/LandUseChange_Forest_1990_2016.csv")
        );
        assert_eq!(config.data.row, 0);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8050);
        assert_eq!(config.chart.variant().unwrap(), ChartVariant::Forest);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 9000\n\n[chart]\nvariant = \"pastel\"").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.chart.variant().unwrap(), ChartVariant::Pastel);
        assert_eq!(config.chart.width, 900);
    }

    #[test]
    fn bad_variant_is_an_error() {
        let config = AppConfig {
            chart: ChartConfig {
                variant: "neon".to_string(),
                ..ChartConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.chart.variant().is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        assert!(AppConfig::load(Some(Path::new("no/such/forest_dash.toml"))).is_err());
    }
}
