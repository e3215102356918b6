//! `chron.toml` configuration.
//!
//! Lookup order: the `--config` path if given (must exist), then
//! `./chron.toml`, then `<config dir>/chron/config.toml`, else defaults.
//! Command-line flags override whatever the file sets.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chron_sim::GenerateConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const PROJECT_CONFIG_FILE: &str = "chron.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChronConfig {
    #[serde(default)]
    pub generate: GenerateSection,
    #[serde(default)]
    pub network: NetworkSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateSection {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_count")]
    pub count: usize,
}

impl Default for GenerateSection {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            count: default_count(),
        }
    }
}

impl GenerateSection {
    /// Apply flag overrides on top of the file values.
    pub fn resolve(&self, seed: Option<u64>, count: Option<usize>) -> GenerateConfig {
        GenerateConfig {
            seed: seed.unwrap_or(self.seed),
            count: count.unwrap_or(self.count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkSection {
    /// How many predecessors each frame is joined to.
    #[serde(default = "default_memory_time")]
    pub memory_time: usize,
    /// Minimum arrow frequency for the high-frequency DAG.
    #[serde(default = "default_min_arrow_freq")]
    pub min_arrow_freq: usize,
}

impl Default for NetworkSection {
    fn default() -> Self {
        Self {
            memory_time: default_memory_time(),
            min_arrow_freq: default_min_arrow_freq(),
        }
    }
}

const fn default_seed() -> u64 {
    GenerateConfig::DEFAULT_SEED
}

const fn default_count() -> usize {
    GenerateConfig::DEFAULT_COUNT
}

const fn default_memory_time() -> usize {
    2
}

const fn default_min_arrow_freq() -> usize {
    2
}

impl ChronConfig {
    /// Parse and validate a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML for
    /// this schema, or sets an out-of-range value.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Validate value ranges.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero game count or a zero arrow threshold.
    pub fn validate(&self) -> Result<()> {
        if self.generate.count == 0 {
            bail!("generate.count must be > 0");
        }
        if self.network.min_arrow_freq == 0 {
            bail!("network.min_arrow_freq must be > 0");
        }
        Ok(())
    }
}

/// Candidate config files in lookup order, skipping the explicit path.
fn discovered_paths(project_root: &Path) -> Vec<PathBuf> {
    let mut paths = vec![project_root.join(PROJECT_CONFIG_FILE)];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("chron").join("config.toml"));
    }
    paths
}

/// Resolve the effective configuration.
///
/// # Errors
///
/// Returns an error if an explicit path does not exist, or if the selected
/// file fails to parse or validate.
pub fn load(explicit: Option<&Path>, project_root: &Path) -> Result<ChronConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            bail!("config file {} does not exist", path.display());
        }
        debug!(path = %path.display(), "loading config");
        return ChronConfig::from_path(path);
    }

    for path in discovered_paths(project_root) {
        if path.exists() {
            debug!(path = %path.display(), "loading config");
            return ChronConfig::from_path(&path);
        }
    }

    Ok(ChronConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_valid() {
        let config = ChronConfig::default();
        assert_eq!(config.network.memory_time, 2);
        assert_eq!(config.network.min_arrow_freq, 2);
        assert_eq!(config.generate.count, GenerateConfig::DEFAULT_COUNT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let dir = TempDir::new().expect("tempdir");
        let explicit = dir.path().join("absent.toml");
        let err = load(Some(&explicit), dir.path()).expect_err("absent");
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn project_file_is_discovered() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(
            dir.path().join(PROJECT_CONFIG_FILE),
            "[generate]\nseed = 7\n\n[network]\nmemory_time = 3\n",
        )
        .expect("write config");

        let config = load(None, dir.path()).expect("load");
        assert_eq!(config.generate.seed, 7);
        assert_eq!(config.generate.count, GenerateConfig::DEFAULT_COUNT);
        assert_eq!(config.network.memory_time, 3);
        assert_eq!(config.network.min_arrow_freq, 2);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[generate]\nsead = 7\n").expect("write config");
        let err = load(Some(&path), dir.path()).expect_err("typo");
        assert!(format!("{err:#}").contains("Failed to parse"));
    }

    #[test]
    fn zero_threshold_is_invalid() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[network]\nmin_arrow_freq = 0\n").expect("write config");
        let err = load(Some(&path), dir.path()).expect_err("zero threshold");
        assert!(format!("{err:#}").contains("min_arrow_freq"));
    }

    #[test]
    fn flags_override_file_values() {
        let section = GenerateSection { seed: 1, count: 10 };
        let resolved = section.resolve(Some(99), None);
        assert_eq!(resolved, GenerateConfig { seed: 99, count: 10 });
    }
}
