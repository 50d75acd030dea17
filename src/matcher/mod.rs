//! Key exclusion matchers.

use crate::config::{ExcludeConfig, PatternType};
use regex::Regex;

/// Compiled exclusion rule tested against object keys.
#[derive(Debug, Clone)]
pub enum KeyMatcher {
    /// Exact string match
    Exact(String),
    /// Regex pattern match
    Pattern(Regex),
}

impl KeyMatcher {
    /// Match a key by exact equality.
    pub fn exact(key: impl Into<String>) -> Self {
        Self::Exact(key.into())
    }

    /// Compile a regex pattern matcher.
    pub fn pattern(pattern: &str) -> Result<Self, MatcherError> {
        Ok(Self::Pattern(Regex::new(pattern)?))
    }

    /// Compile a matcher from configuration.
    pub fn compile(config: &ExcludeConfig) -> Result<Self, MatcherError> {
        match config {
            ExcludeConfig::Key(key) => Ok(Self::exact(key.as_str())),
            ExcludeConfig::Pattern {
                pattern,
                pattern_type: PatternType::Exact,
            } => Ok(Self::exact(pattern.as_str())),
            ExcludeConfig::Pattern {
                pattern,
                pattern_type: PatternType::Regex,
            } => Self::pattern(pattern),
        }
    }

    /// Check whether `key` is excluded by this rule.
    ///
    /// Patterns are unanchored, so `exclude$` matches any key ending in
    /// `exclude`.
    pub fn matches(&self, key: &str) -> bool {
        match self {
            Self::Exact(expected) => expected == key,
            Self::Pattern(regex) => regex.is_match(key),
        }
    }
}

impl From<Regex> for KeyMatcher {
    fn from(regex: Regex) -> Self {
        Self::Pattern(regex)
    }
}

impl From<&str> for KeyMatcher {
    fn from(key: &str) -> Self {
        Self::exact(key)
    }
}

impl From<String> for KeyMatcher {
    fn from(key: String) -> Self {
        Self::Exact(key)
    }
}

/// Immutable set of exclusion rules for one conversion direction.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    rules: Vec<KeyMatcher>,
}

impl ExclusionSet {
    /// Create an empty set; nothing is excluded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a set from configuration entries.
    pub fn compile(configs: &[ExcludeConfig]) -> Result<Self, MatcherError> {
        let rules = configs
            .iter()
            .map(KeyMatcher::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// True if any rule matches `key`.
    pub fn matches(&self, key: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(key))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<M: Into<KeyMatcher>> FromIterator<M> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = M>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Errors that can occur during matcher compilation.
#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("Invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),
}
