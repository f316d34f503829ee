use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::repository::FileDataSource;
use crate::service::aggregator::AreaKeyPolicy;

const APP_DIR_NAME: &str = ".kpi-dashboard";
const CONFIG_FILE_NAME: &str = "config.json";

/// `~/.kpi-dashboard`
pub fn default_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home_dir.join(APP_DIR_NAME))
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Data file to read; `~/.kpi-dashboard/data.json` when unset.
    pub data_file: Option<PathBuf>,
    pub area_keys: AreaKeyPolicy,
}

impl DashboardConfig {
    /// Loads `path`, or `~/.kpi-dashboard/config.json` when `None`. A missing
    /// file gives the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_dir()?.join(CONFIG_FILE_NAME),
        };
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        match &self.data_file {
            Some(p) => Ok(p.clone()),
            None => FileDataSource::default_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_load_missing_gives_defaults() {
        let path = std::env::temp_dir().join(format!("kpi-config-{}.json", Uuid::new_v4()));
        let config = DashboardConfig::load(Some(&path)).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.area_keys, AreaKeyPolicy::WindowUnion);
    }

    #[test]
    fn test_load_partial_file() {
        let path = std::env::temp_dir().join(format!("kpi-config-{}.json", Uuid::new_v4()));
        fs::write(&path, r#"{"area_keys": "first-record"}"#).unwrap();
        let config = DashboardConfig::load(Some(&path)).unwrap();
        assert_eq!(config.area_keys, AreaKeyPolicy::FirstRecord);
        assert!(config.data_file.is_none());
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_data_path_override() {
        let config = DashboardConfig {
            data_file: Some(PathBuf::from("/tmp/kpi.json")),
            ..Default::default()
        };
        assert_eq!(config.data_path().unwrap(), PathBuf::from("/tmp/kpi.json"));
    }
}
