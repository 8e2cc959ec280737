//! Analysis configuration file support.
//!
//! Settings are read from a TOML file (`dialer.toml` by default). Every
//! section and field is optional and falls back to the built-in defaults.
//!
//! ```toml
//! [matching]
//! mode = "fuzzy_fallback"
//! low_match_warning_ratio = 0.5
//!
//! [intervals]
//! first_cutoff_hour = 8
//! last_cutoff_hour = 17
//!
//! [gaps]
//! threshold_secs = 60
//!
//! [cache]
//! max_entries = 4
//! ttl_secs = 3600
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{DialerError, DialerResult};
use crate::preprocessing::matcher::MatchMode;
use crate::time::intervals::IntervalScheme;

/// Configuration for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub intervals: IntervalSettings,
    #[serde(default)]
    pub gaps: GapSettings,
    #[serde(default)]
    pub cache: CacheSettings,
}

/// Agent matching settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingSettings {
    #[serde(default)]
    pub mode: MatchMode,
    /// Exact-match share below which the run carries a warning.
    #[serde(default = "default_low_match_warning_ratio")]
    pub low_match_warning_ratio: f64,
}

/// Interval bucket cutoffs, as hours of day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalSettings {
    #[serde(default = "default_first_cutoff_hour")]
    pub first_cutoff_hour: u32,
    #[serde(default = "default_last_cutoff_hour")]
    pub last_cutoff_hour: u32,
}

/// Gap flagging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapSettings {
    #[serde(default = "default_gap_threshold_secs")]
    pub threshold_secs: u64,
}

/// Result cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: u64,
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_low_match_warning_ratio() -> f64 {
    0.5
}

fn default_first_cutoff_hour() -> u32 {
    IntervalScheme::DEFAULT_FIRST_CUTOFF
}

fn default_last_cutoff_hour() -> u32 {
    IntervalScheme::DEFAULT_LAST_CUTOFF
}

fn default_gap_threshold_secs() -> u64 {
    crate::algorithms::gaps::DEFAULT_GAP_THRESHOLD_SECS
}

fn default_cache_max_entries() -> u64 {
    4
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

/// Longest accepted cache time-to-live (one year).
pub const MAX_CACHE_TTL_SECS: u64 = 365 * 24 * 3600;

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            mode: MatchMode::default(),
            low_match_warning_ratio: default_low_match_warning_ratio(),
        }
    }
}

impl Default for IntervalSettings {
    fn default() -> Self {
        Self {
            first_cutoff_hour: default_first_cutoff_hour(),
            last_cutoff_hour: default_last_cutoff_hour(),
        }
    }
}

impl Default for GapSettings {
    fn default() -> Self {
        Self {
            threshold_secs: default_gap_threshold_secs(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_entries: default_cache_max_entries(),
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl AnalysisConfig {
    /// Load and validate configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> DialerResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            DialerError::ConfigurationError(format!("Failed to read config file: {}", e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> DialerResult<Self> {
        let config: AnalysisConfig = toml::from_str(content).map_err(|e| {
            DialerError::ConfigurationError(format!("Failed to parse config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `dialer.toml` in the current directory, then in
    /// `rust_backend/`, then in the parent directory.
    pub fn from_default_location() -> DialerResult<Self> {
        let search_paths = [
            PathBuf::from("dialer.toml"),
            PathBuf::from("rust_backend/dialer.toml"),
            PathBuf::from("../dialer.toml"),
        ];

        for path in &search_paths {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Err(DialerError::ConfigurationError(
            "No dialer.toml found in standard locations".to_string(),
        ))
    }

    pub fn validate(&self) -> DialerResult<()> {
        self.interval_scheme()?;

        let ratio = self.matching.low_match_warning_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(DialerError::ConfigurationError(format!(
                "low_match_warning_ratio must be within 0..=1, got {}",
                ratio
            )));
        }
        if self.cache.max_entries == 0 {
            return Err(DialerError::ConfigurationError(
                "cache.max_entries must be at least 1".to_string(),
            ));
        }
        if !(1..=MAX_CACHE_TTL_SECS).contains(&self.cache.ttl_secs) {
            return Err(DialerError::ConfigurationError(format!(
                "cache.ttl_secs must be within 1..={}, got {}",
                MAX_CACHE_TTL_SECS, self.cache.ttl_secs
            )));
        }
        Ok(())
    }

    pub fn interval_scheme(&self) -> DialerResult<IntervalScheme> {
        IntervalScheme::new(
            self.intervals.first_cutoff_hour,
            self.intervals.last_cutoff_hour,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AnalysisConfig::from_toml_str("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.matching.mode, MatchMode::Exact);
        assert_eq!(config.gaps.threshold_secs, 60);
        assert_eq!(config.intervals.first_cutoff_hour, 8);
        assert_eq!(config.intervals.last_cutoff_hour, 17);
        assert_eq!(config.cache.max_entries, 4);
    }

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [matching]
            mode = "fuzzy_fallback"
            low_match_warning_ratio = 0.8

            [intervals]
            first_cutoff_hour = 9
            last_cutoff_hour = 18

            [gaps]
            threshold_secs = 120

            [cache]
            max_entries = 2
            ttl_secs = 60
        "#;

        let config = AnalysisConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.matching.mode, MatchMode::FuzzyFallback);
        assert_eq!(config.matching.low_match_warning_ratio, 0.8);
        assert_eq!(config.gaps.threshold_secs, 120);
        assert_eq!(config.cache.ttl_secs, 60);

        let scheme = config.interval_scheme().unwrap();
        assert_eq!(scheme.first_cutoff(), 9);
        assert_eq!(scheme.last_cutoff(), 18);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = AnalysisConfig::from_toml_str("[gaps]\nthreshold_secs = 30\n").unwrap();
        assert_eq!(config.gaps.threshold_secs, 30);
        assert_eq!(config.matching, MatchingSettings::default());
    }

    #[test]
    fn test_invalid_cutoffs_rejected() {
        let result = AnalysisConfig::from_toml_str(
            "[intervals]\nfirst_cutoff_hour = 18\nlast_cutoff_hour = 9\n",
        );
        assert!(matches!(result, Err(DialerError::ConfigurationError(_))));
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let result = AnalysisConfig::from_toml_str("[matching]\nmode = \"sounds_like\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_ratio_out_of_range_rejected() {
        let result = AnalysisConfig::from_toml_str("[matching]\nlow_match_warning_ratio = 1.5\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_cache_capacity_rejected() {
        let result = AnalysisConfig::from_toml_str("[cache]\nmax_entries = 0\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_cache_ttl_bounds() {
        let result = AnalysisConfig::from_toml_str("[cache]\nttl_secs = 99999999999999\n");
        assert!(matches!(result, Err(DialerError::ConfigurationError(_))));

        let result = AnalysisConfig::from_toml_str("[cache]\nttl_secs = 0\n");
        assert!(matches!(result, Err(DialerError::ConfigurationError(_))));

        let config = AnalysisConfig::from_toml_str(&format!(
            "[cache]\nttl_secs = {}\n",
            MAX_CACHE_TTL_SECS
        ))
        .unwrap();
        assert_eq!(config.cache.ttl_secs, MAX_CACHE_TTL_SECS);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[gaps]\nthreshold_secs = 90").unwrap();

        let config = AnalysisConfig::from_file(file.path()).unwrap();
        assert_eq!(config.gaps.threshold_secs, 90);
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let result = AnalysisConfig::from_file("/nonexistent/dialer.toml");
        assert!(matches!(result, Err(DialerError::ConfigurationError(_))));
    }
}
