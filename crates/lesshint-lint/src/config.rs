// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `.lesshintrc` configuration.
//!
//! ```json
//! { "ignore": ["third_party"], "reporter": "text", "rules": [], "exclude": [] }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::LintOptions;

pub const CONFIG_FILE_NAME: &str = ".lesshintrc";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LintConfig {
    /// Directory names whose files never contribute color variables.
    pub ignore: Vec<String>,
    /// Reporter name; see `lesshint_diagnostics::REPORTER_NAMES`.
    pub reporter: Option<String>,
    pub rules: Vec<String>,
    pub exclude: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl LintConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `.lesshintrc` from `dir` if there is one.
    pub fn discover(dir: &Path) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        let config = Self::load(&path)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(Some((path, config)))
    }

    pub fn options(&self) -> LintOptions {
        LintOptions {
            ignore: self.ignore.clone(),
            rules: self.rules.clone(),
            excludes: self.exclude.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{ "ignore": ["third_party"], "exclude": ["E02"] }"#).unwrap();

        let (found, config) = LintConfig::discover(dir.path()).unwrap().unwrap();
        assert_eq!(found, path);
        assert_eq!(config.reporter, None);
        let options = config.options();
        assert_eq!(options.ignore, vec!["third_party"]);
        assert_eq!(options.excludes, vec!["E02"]);
        assert!(options.rules.is_empty());
    }

    #[test]
    fn missing_config_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LintConfig::discover(dir.path()).unwrap().is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(&path, r#"{ "ignroe": [] }"#).unwrap();
        let err = LintConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("custom.json"));
    }
}
