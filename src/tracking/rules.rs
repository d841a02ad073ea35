//! Request filtering rules.
//!
//! # Responsibilities
//! - Exact route exclusion
//! - Method allow/deny sets (deny wins)
//! - Regex exclusion of route patterns and User-Agent values
//!
//! # Design Decisions
//! - Patterns are compiled once at construction
//! - Patterns are anchored at the start only: `"/api"` also ignores `"/api/v1"`
//! - Checks run cheapest first and short-circuit

use std::collections::HashSet;

use regex::Regex;

use crate::config::MatomoConfig;
use crate::error::{ConfigError, ConfigResult};

/// A regex that must match at the start of the input.
#[derive(Debug, Clone)]
pub struct PrefixPattern {
    source: String,
    regex: Regex,
}

impl PrefixPattern {
    /// Compile `pattern` anchored at the start of the input.
    pub fn new(pattern: &str) -> ConfigResult<Self> {
        let regex = Regex::new(&format!("^(?:{})", pattern)).map_err(|source| {
            ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Returns true if the pattern matches a prefix of `input`.
    pub fn matches(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }

    /// The pattern as configured.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Compiled filtering rules deciding which requests are skipped.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    ignored_routes: HashSet<String>,
    allowed_methods: HashSet<String>,
    ignored_methods: HashSet<String>,
    ignored_ua_patterns: Vec<PrefixPattern>,
    ignored_patterns: Vec<PrefixPattern>,
}

impl IgnoreRules {
    /// Build the rules from configuration, compiling every pattern.
    pub fn from_config(config: &MatomoConfig) -> ConfigResult<Self> {
        let ignored_ua_patterns = config
            .ignored_ua_patterns
            .iter()
            .map(|p| PrefixPattern::new(p))
            .collect::<ConfigResult<Vec<_>>>()?;
        let ignored_patterns = config
            .ignored_patterns
            .iter()
            .map(|p| PrefixPattern::new(p))
            .collect::<ConfigResult<Vec<_>>>()?;

        Ok(Self {
            ignored_routes: config.ignored_routes.iter().cloned().collect(),
            allowed_methods: config.allowed_methods.to_method_set().into_iter().collect(),
            ignored_methods: config
                .ignored_methods
                .iter()
                .map(|m| m.to_uppercase())
                .collect(),
            ignored_ua_patterns,
            ignored_patterns,
        })
    }

    /// Returns true if a request with these attributes must not be tracked.
    pub fn should_ignore(&self, url_rule: &str, method: &str, user_agent: &str) -> bool {
        if self.ignored_routes.contains(url_rule) {
            return true;
        }
        if self.ignored_methods.contains(method) || !self.allowed_methods.contains(method) {
            return true;
        }
        if self.ignored_ua_patterns.iter().any(|p| p.matches(user_agent)) {
            return true;
        }
        self.ignored_patterns.iter().any(|p| p.matches(url_rule))
    }
}
