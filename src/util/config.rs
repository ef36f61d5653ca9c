//! Configuration file support for chainfind.
//!
//! chainfind supports two configuration file locations:
//! - Global: `~/.chainfind/config.toml` - User-wide defaults
//! - Project: `.chainfind/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Probe timeout used when no config sets one.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 30;

/// Family order used by `choose` when no config sets one.
pub const DEFAULT_PREFERENCE: &[&str] = &["gcc", "clang", "msvc"];

/// chainfind configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Discovery settings
    pub discovery: DiscoverySettings,
}

/// Settings that steer toolchain discovery.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DiscoverySettings {
    /// Seconds a single compiler invocation may run before it is killed
    pub probe_timeout_secs: Option<u64>,

    /// Families to probe (`gcc`, `clang`, `msvc`); empty means all
    pub types: Vec<String>,

    /// Family order used when picking a toolchain
    pub preference: Vec<String>,

    /// Directories scanned in addition to `PATH`
    pub extra_search_paths: Vec<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        let other = other.discovery;
        if other.probe_timeout_secs.is_some() {
            self.discovery.probe_timeout_secs = other.probe_timeout_secs;
        }
        if !other.types.is_empty() {
            self.discovery.types = other.types;
        }
        if !other.preference.is_empty() {
            self.discovery.preference = other.preference;
        }
        if !other.extra_search_paths.is_empty() {
            self.discovery.extra_search_paths = other.extra_search_paths;
        }
    }

    /// Effective probe timeout.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(
            self.discovery
                .probe_timeout_secs
                .unwrap_or(DEFAULT_PROBE_TIMEOUT_SECS),
        )
    }

    /// Effective family preference order.
    pub fn preference(&self) -> Vec<String> {
        if self.discovery.preference.is_empty() {
            DEFAULT_PREFERENCE.iter().map(|s| s.to_string()).collect()
        } else {
            self.discovery.preference.clone()
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.chainfind/config.toml)
/// 2. Global config (~/.chainfind/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global chainfind config directory (~/.chainfind).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".chainfind"))
}

/// Get the global config path (~/.chainfind/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.chainfind/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".chainfind").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.discovery.types.is_empty());
        assert_eq!(config.probe_timeout(), Duration::from_secs(30));
        assert_eq!(config.preference(), vec!["gcc", "clang", "msvc"]);
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[discovery]
probe-timeout-secs = 5
types = ["clang"]
preference = ["clang", "gcc"]
extra-search-paths = ["/opt/cross/bin"]
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.probe_timeout(), Duration::from_secs(5));
        assert_eq!(config.discovery.types, vec!["clang"]);
        assert_eq!(config.preference(), vec!["clang", "gcc"]);
        assert_eq!(
            config.discovery.extra_search_paths,
            vec![PathBuf::from("/opt/cross/bin")]
        );
    }

    #[test]
    fn test_malformed_config_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "[discovery\nprobe-timeout-secs = ").unwrap();

        assert!(Config::load(&config_path).is_err());
        let config = Config::load_or_default(&config_path);
        assert!(config.discovery.probe_timeout_secs.is_none());
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &global_path,
            r#"
[discovery]
probe-timeout-secs = 10
types = ["gcc"]
"#,
        )
        .unwrap();

        std::fs::write(
            &project_path,
            r#"
[discovery]
types = ["msvc", "clang"]
"#,
        )
        .unwrap();

        let config = load_config(Some(&global_path), &project_path);

        // Project types win, global timeout survives
        assert_eq!(config.discovery.types, vec!["msvc", "clang"]);
        assert_eq!(config.probe_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_load_config_missing_files() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(None, &project_config_path(tmp.path()));
        assert!(config.discovery.probe_timeout_secs.is_none());
    }
}
