// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime configuration.
//!
//! Every knob has a default that matches the production viewer, so an empty
//! `{}` file (or no file at all) gives you the stock behavior. Field names are
//! camelCase because the same JSON is shared with the browser host.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable naming a config file when no path is passed explicitly.
pub const CONFIG_ENV: &str = "CHRONICLE_CONFIG";

/// Fuzzy matching options for [`crate::FuzzyIndex`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchOptions {
    /// Normalized edit-distance ceiling (0 = exact only, 1 = anything).
    pub threshold: f64,
    /// Shortest run of consecutive matched characters that counts as a hit.
    pub min_match_char_length: usize,
    /// Weight of the `norm` field.
    pub norm_weight: f64,
    /// Weight of the original-case `text` field.
    pub text_weight: f64,
    /// Skip the 1/sqrt(token count) field-length norm.
    pub ignore_field_norm: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threshold: 0.28,
            min_match_char_length: 2,
            norm_weight: 0.75,
            text_weight: 0.25,
            ignore_field_norm: false,
        }
    }
}

impl SearchOptions {
    /// Field weights scaled to sum to 1.
    pub fn normalized_weights(&self) -> (f64, f64) {
        let total = self.norm_weight + self.text_weight;
        if total <= 0.0 {
            return (0.5, 0.5);
        }
        (self.norm_weight / total, self.text_weight / total)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::Invalid(format!(
                "search.threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        if self.norm_weight < 0.0 || self.text_weight < 0.0 {
            return Err(ConfigError::Invalid(
                "search weights must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Session controller options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionOptions {
    /// Suggestions shown in the dropdown (arrow keys cycle within these).
    pub max_suggestions: usize,
    /// Character budget for a suggestion's context snippet.
    pub snippet_budget: usize,
    /// Normalized query length that triggers the lazy word tier.
    pub lazy_tier_min_chars: usize,
    /// Cap on ids requested from the index. `None` requests the whole corpus.
    pub match_limit: Option<usize>,
    /// Auto-clear the highlight after this many milliseconds.
    pub highlight_ttl_ms: Option<u64>,
    /// Animate viewport fits instead of jumping.
    pub smooth_fit: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            max_suggestions: 10,
            snippet_budget: 78,
            lazy_tier_min_chars: 2,
            match_limit: None,
            highlight_ttl_ms: None,
            smooth_fit: true,
        }
    }
}

impl SessionOptions {
    pub fn highlight_ttl(&self) -> Option<Duration> {
        self.highlight_ttl_ms.map(Duration::from_millis)
    }
}

/// Corpus endpoint paths, relative to the corpus root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Endpoints {
    pub lines: String,
    pub words: String,
    pub legacy: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            lines: "/ocr/lines.json".to_string(),
            words: "/ocr/words.json".to_string(),
            legacy: "/ocr/entries.json".to_string(),
        }
    }
}

/// First-visit keyboard hint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HintOptions {
    pub storage_key: String,
    pub timeout_ms: u64,
}

impl Default for HintOptions {
    fn default() -> Self {
        Self {
            storage_key: "chronicle.viewer.hint.dismissed.v1".to_string(),
            timeout_ms: 8000,
        }
    }
}

impl HintOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChronicleConfig {
    pub search: SearchOptions,
    pub session: SessionOptions,
    pub endpoints: Endpoints,
    pub hint: HintOptions,
}

impl ChronicleConfig {
    /// Load from `path`, or from `$CHRONICLE_CONFIG`, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var_os(CONFIG_ENV);
        let path = match (path, env_path.as_deref()) {
            (Some(p), _) => p,
            (None, Some(p)) => Path::new(p),
            (None, None) => return Ok(Self::default()),
        };

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: ChronicleConfig =
            serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
                path: "<inline>".to_string(),
                source,
            })?;
        config.search.validate()?;
        if config.session.max_suggestions == 0 {
            return Err(ConfigError::Invalid(
                "session.maxSuggestions must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }
}
