//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default table style for `geoips list ...`
pub const DEFAULT_TABLE_STYLE: &str = "fancy";

/// Default log filter when neither config nor `GEOIPS_LOG` says otherwise
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// GeoIPS CLI configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log filter directive (`warn`, `debug`, `geoips=trace`, ...)
    pub log_level: Option<String>,

    /// Default table style for list commands
    pub table_style: Option<String>,

    /// Root that plugin and package paths are reported relative to
    pub install_root: Option<PathBuf>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/geoips/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read(&global_path) {
                config.merge(global);
            }
        }

        // 3. Explicit config file
        if let Ok(path) = std::env::var("GEOIPS_CONFIG") {
            if let Some(explicit) = Self::read(Path::new(&path)) {
                config.merge(explicit);
            }
        }

        // 4. Environment variables
        config.merge(Self::from_env(|key| std::env::var(key).ok()));

        config
    }

    /// Read one config file; missing or malformed files are skipped
    pub fn read(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "ignoring malformed config file");
                None
            }
        }
    }

    /// Config layer built from `GEOIPS_*` variables looked up through `var`
    fn from_env(var: impl Fn(&str) -> Option<String>) -> Self {
        Config {
            log_level: var("GEOIPS_LOG_LEVEL"),
            table_style: var("GEOIPS_TABLE_STYLE"),
            install_root: var("GEOIPS_INSTALL_ROOT").map(PathBuf::from),
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "geoips")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
        if other.table_style.is_some() {
            self.table_style = other.table_style;
        }
        if other.install_root.is_some() {
            self.install_root = other.install_root;
        }
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn table_style(&self) -> &str {
        self.table_style.as_deref().unwrap_or(DEFAULT_TABLE_STYLE)
    }

    /// Install root, falling back to the directory holding the executable
    pub fn install_root(&self) -> PathBuf {
        if let Some(root) = &self.install_root {
            return root.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.log_level(), "warn");
        assert_eq!(config.table_style(), "fancy");
    }

    #[test]
    fn test_read_yaml_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "table_style: markdown\ninstall_root: /opt/geoips\n").unwrap();

        let config = Config::read(&path).unwrap();
        assert_eq!(config.table_style(), "markdown");
        assert_eq!(config.install_root(), PathBuf::from("/opt/geoips"));
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn test_malformed_and_missing_files_skipped() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "table_style: [unclosed\n").unwrap();

        assert!(Config::read(&path).is_none());
        assert!(Config::read(&tmp.path().join("missing.yaml")).is_none());
    }

    #[test]
    fn test_env_layer_overrides_file() {
        let mut config = Config {
            log_level: Some("info".to_string()),
            table_style: Some("markdown".to_string()),
            install_root: None,
        };
        let env: HashMap<&str, &str> = [("GEOIPS_TABLE_STYLE", "plain")].into_iter().collect();
        config.merge(Config::from_env(|key| env.get(key).map(|v| v.to_string())));

        assert_eq!(config.table_style(), "plain");
        assert_eq!(config.log_level(), "info");
    }
}
