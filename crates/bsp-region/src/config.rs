//! Build parameters, loadable from a `toml` file.

use std::{fmt::Debug, fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use crate::MAX_TREE_DEPTH;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("leaf_capacity must be at least 1")]
    ZeroLeafCapacity,
    #[error("max_depth {max_depth} exceeds the supported limit of {limit}")]
    DepthTooLarge { max_depth: usize, limit: usize },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// A node holding this many boxes or fewer becomes a leaf.
    pub leaf_capacity: usize,
    /// Nodes at this depth become leaves regardless of their size.
    pub max_depth: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            leaf_capacity: 16,
            max_depth: 32,
        }
    }
}

impl BuildConfig {
    #[must_use]
    pub const fn new(leaf_capacity: usize, max_depth: usize) -> Self {
        Self {
            leaf_capacity,
            max_depth,
        }
    }

    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.leaf_capacity == 0 {
            return Err(ConfigError::ZeroLeafCapacity);
        }

        if self.max_depth > MAX_TREE_DEPTH {
            return Err(ConfigError::DepthTooLarge {
                max_depth: self.max_depth,
                limit: MAX_TREE_DEPTH,
            });
        }

        Ok(())
    }

    /// Reads `path`, falling back to defaults when the file does not exist.
    #[instrument]
    pub fn load<P: AsRef<Path> + Debug>(path: P) -> anyhow::Result<Self> {
        info!("loading build configuration");

        let config = if path.as_ref().exists() {
            let contents = fs::read_to_string(&path)?;
            toml::from_str::<Self>(&contents)?
        } else {
            info!("configuration file not found, using defaults");
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(BuildConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_capacity() {
        let config = BuildConfig::new(0, 8);
        assert_eq!(config.validate(), Err(ConfigError::ZeroLeafCapacity));
    }

    #[test]
    fn rejects_excessive_depth() {
        let config = BuildConfig::new(4, MAX_TREE_DEPTH + 1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DepthTooLarge { .. })
        ));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: BuildConfig = toml::from_str("leaf_capacity = 4").unwrap();
        assert_eq!(config.leaf_capacity, 4);
        assert_eq!(config.max_depth, BuildConfig::default().max_depth);
    }

    #[test]
    fn load_reads_file_and_falls_back() {
        let dir = tempfile::tempdir().unwrap();

        let missing = BuildConfig::load(dir.path().join("missing.toml")).unwrap();
        assert_eq!(missing, BuildConfig::default());

        let path = dir.path().join("bsp.toml");
        fs::write(&path, "leaf_capacity = 2\nmax_depth = 10\n").unwrap();
        assert_eq!(BuildConfig::load(&path).unwrap(), BuildConfig::new(2, 10));

        fs::write(&path, "leaf_capacity = 0\n").unwrap();
        assert!(BuildConfig::load(&path).is_err());
    }
}
