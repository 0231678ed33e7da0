//! Index configuration with TOML persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::MediaResult;

/// What `add_new` does to a list whose total is not known yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownTotalPolicy {
    /// The total stays unknown until an authoritative count arrives.
    #[default]
    StayUnknown,
    /// The increment becomes the first known total.
    StartAtIncrement,
}

/// Tunables for every list owned by a [`crate::SharedMedia`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Incrementing an unknown total.
    #[serde(default)]
    pub increment_unknown_total: UnknownTotalPolicy,

    /// Fill in the unknown side of a query result from the total when the
    /// other side is known.
    #[serde(default)]
    pub derive_skipped_from_total: bool,

    /// A list holding one slice over the whole history takes that slice's
    /// size as its total.
    #[serde(default)]
    pub infer_total_from_full_slice: bool,

    /// Window size before the anchor used by the CLI when none is given.
    #[serde(default = "default_limit")]
    pub default_limit_before: usize,

    /// Window size after the anchor used by the CLI when none is given.
    #[serde(default = "default_limit")]
    pub default_limit_after: usize,
}

fn default_limit() -> usize {
    20
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            increment_unknown_total: UnknownTotalPolicy::default(),
            derive_skipped_from_total: false,
            infer_total_from_full_slice: false,
            default_limit_before: default_limit(),
            default_limit_after: default_limit(),
        }
    }
}

impl MediaConfig {
    /// Parse from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> MediaResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> MediaResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Serialize to TOML text.
    pub fn to_toml_string(&self) -> MediaResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> MediaResult<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = MediaConfig::from_toml_str("").unwrap();
        assert_eq!(config, MediaConfig::default());
        assert_eq!(config.increment_unknown_total, UnknownTotalPolicy::StayUnknown);
        assert_eq!(config.default_limit_before, 20);
    }

    #[test]
    fn partial_toml_overrides() {
        let config = MediaConfig::from_toml_str(
            "increment_unknown_total = \"start_at_increment\"\nderive_skipped_from_total = true\n",
        )
        .unwrap();
        assert_eq!(
            config.increment_unknown_total,
            UnknownTotalPolicy::StartAtIncrement
        );
        assert!(config.derive_skipped_from_total);
        assert!(!config.infer_total_from_full_slice);
        assert_eq!(config.default_limit_after, 20);
    }

    #[test]
    fn bad_toml_is_config_error() {
        let err = MediaConfig::from_toml_str("derive_skipped_from_total = 3").unwrap_err();
        assert!(matches!(err, crate::types::MediaError::Config(_)));
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("media.toml");
        let config = MediaConfig {
            infer_total_from_full_slice: true,
            default_limit_before: 5,
            ..MediaConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(MediaConfig::load(&path).unwrap(), config);
    }
}
