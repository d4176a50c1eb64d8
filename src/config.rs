use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::exclude::ExclusionFilter;
use crate::score::VisitWeighted;
use crate::store::AgingPolicy;

/// Settings recognized by the ranking engine.
///
/// Every key is optional; missing keys take their default value. In TOML:
///
/// ```toml
/// history_location = "/home/me/.local/share/frecent/history.json"
/// exclude_patterns = ["COMMIT_EDITMSG$", "^/tmp/"]
/// aging_threshold = 9000.0
/// aging_multiplier = 0.99
/// access_weight = 1.0
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where the ranking store is persisted.
    pub history_location: PathBuf,
    /// Regular expressions naming resources that are never ranked.
    pub exclude_patterns: Vec<String>,
    /// Total rank mass above which the store ages.
    pub aging_threshold: f64,
    /// Factor applied to every rank when aging. Must lie in `(0, 1)`.
    pub aging_multiplier: f64,
    /// Rank added by a single access.
    pub access_weight: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_location: default_history_location(),
            exclude_patterns: Vec::new(),
            aging_threshold: AgingPolicy::DEFAULT_THRESHOLD,
            aging_multiplier: AgingPolicy::DEFAULT_MULTIPLIER,
            access_weight: VisitWeighted::DEFAULT_WEIGHT,
        }
    }
}

impl Config {
    /// Parses a configuration from TOML text and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the text is not valid TOML, names
    /// an unknown key, or holds an out-of-range value.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| Error::InvalidConfig {
            field: "document",
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the file cannot be read or fails
    /// to parse or validate.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::InvalidConfig {
            field: "document",
            reason: format!("failed to read {}: {e}", path.display()),
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks that every numeric setting is in range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        self.aging_policy()?;
        self.scorer()?;
        Ok(())
    }

    /// The aging policy described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the threshold or multiplier is out
    /// of range.
    pub fn aging_policy(&self) -> Result<AgingPolicy> {
        if !(self.aging_threshold.is_finite() && self.aging_threshold > 0.0) {
            return Err(Error::InvalidConfig {
                field: "aging_threshold",
                reason: format!("expected a positive number, got {}", self.aging_threshold),
            });
        }

        AgingPolicy::new(self.aging_threshold, self.aging_multiplier).ok_or_else(|| {
            Error::InvalidConfig {
                field: "aging_multiplier",
                reason: format!(
                    "expected a number between 0 and 1, got {}",
                    self.aging_multiplier
                ),
            }
        })
    }

    /// The scorer described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the access weight is not a
    /// positive number.
    pub fn scorer(&self) -> Result<VisitWeighted> {
        VisitWeighted::with_weight(self.access_weight).ok_or_else(|| Error::InvalidConfig {
            field: "access_weight",
            reason: format!("expected a positive number, got {}", self.access_weight),
        })
    }

    /// Compiles the exclusion patterns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if a pattern does not compile.
    pub fn exclusion_filter(&self) -> Result<ExclusionFilter> {
        ExclusionFilter::new(&self.exclude_patterns)
    }
}

fn default_history_location() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from("frecent-history.json"),
        |dir| dir.join("frecent").join("history.json"),
    )
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::Config;
    use crate::{AgingPolicy, Error};

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.aging_policy().unwrap(), AgingPolicy::default());
        assert_eq!(
            config.history_location.extension().and_then(|ext| ext.to_str()),
            Some("json")
        );
    }

    #[test]
    fn all_keys() {
        let config = Config::from_toml_str(
            r#"
            history_location = "/var/lib/frecent/history.json"
            exclude_patterns = ["^/tmp/", "COMMIT_EDITMSG$"]
            aging_threshold = 500.0
            aging_multiplier = 0.5
            access_weight = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(
            config.history_location,
            PathBuf::from("/var/lib/frecent/history.json")
        );
        assert_eq!(config.exclude_patterns, ["^/tmp/", "COMMIT_EDITMSG$"]);
        assert_eq!(config.aging_policy().unwrap().threshold(), 500.0);
        assert_eq!(config.aging_policy().unwrap().multiplier(), 0.5);
        assert_eq!(config.scorer().unwrap().weight(), 2.0);
        assert!(config
            .exclusion_filter()
            .unwrap()
            .is_excluded("/tmp/scratch"));
    }

    fn invalid_field(text: &str) -> &'static str {
        match Config::from_toml_str(text) {
            Err(Error::InvalidConfig { field, .. }) => field,
            other => panic!("expected invalid config, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert_eq!(invalid_field("aging_threshold = 0.0"), "aging_threshold");
        assert_eq!(invalid_field("aging_threshold = -5.0"), "aging_threshold");
        assert_eq!(invalid_field("aging_multiplier = 1.0"), "aging_multiplier");
        assert_eq!(invalid_field("aging_multiplier = 0.0"), "aging_multiplier");
        assert_eq!(invalid_field("access_weight = 0.0"), "access_weight");
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert_eq!(invalid_field("aging_threshold = \"lots\""), "document");
        assert_eq!(invalid_field("unknown_key = 1"), "document");
        assert_eq!(invalid_field("not toml at all ["), "document");
    }

    #[test]
    fn bad_pattern_surfaces_at_filter_construction() {
        let config = Config::from_toml_str(r#"exclude_patterns = ["("]"#).unwrap();
        assert!(matches!(
            config.exclusion_filter(),
            Err(Error::InvalidPattern { .. })
        ));
    }
}
