#![forbid(unsafe_code)]

//! Queue configuration.
//!
//! Sources, in the order hosts usually layer them:
//!
//! 1. [`QueueConfig::default`]: priority `0`, non-stackable, logical clock.
//! 2. [`QueueConfig::from_env`]: `MODALQ_DEFAULT_PRIORITY`,
//!    `MODALQ_DEFAULT_STACKABLE`, `MODALQ_CLOCK`.
//! 3. [`QueueConfig::from_toml_str`] (feature `policy-config`).
//!
//! Unset keys keep their defaults. Malformed values are errors; callers that
//! prefer to keep running fall back to the default config themselves.

use std::fmt;
use std::str::FromStr;

use crate::entry::{DEFAULT_PRIORITY, DEFAULT_STACKABLE};

pub const ENV_DEFAULT_PRIORITY: &str = "MODALQ_DEFAULT_PRIORITY";
pub const ENV_DEFAULT_STACKABLE: &str = "MODALQ_DEFAULT_STACKABLE";
pub const ENV_CLOCK: &str = "MODALQ_CLOCK";

/// Errors from configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A key had a value that could not be interpreted.
    InvalidValue { key: String, value: String },
    /// A config document could not be parsed.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { key, value } => {
                write!(f, "invalid value '{value}' for '{key}'")
            }
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Which clock stamps `opened_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ClockKind {
    /// Strictly increasing counter.
    #[default]
    Logical,
    /// Milliseconds since queue creation.
    Wall,
}

impl FromStr for ClockKind {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("logical") {
            Ok(Self::Logical)
        } else if trimmed.eq_ignore_ascii_case("wall") {
            Ok(Self::Wall)
        } else {
            Err(ConfigError::InvalidValue {
                key: ENV_CLOCK.to_string(),
                value: raw.to_string(),
            })
        }
    }
}

impl fmt::Display for ClockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Logical => f.write_str("logical"),
            Self::Wall => f.write_str("wall"),
        }
    }
}

/// Defaults and clock selection for a modal queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QueueConfig {
    /// Priority bindings pass when the caller leaves it unspecified.
    pub default_priority: i32,
    /// Stackable flag bindings pass when the caller leaves it unspecified.
    pub default_stackable: bool,
    pub clock: ClockKind,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            default_priority: DEFAULT_PRIORITY,
            default_stackable: DEFAULT_STACKABLE,
            clock: ClockKind::Logical,
        }
    }
}

impl QueueConfig {
    #[must_use]
    pub fn with_default_priority(mut self, priority: i32) -> Self {
        self.default_priority = priority;
        self
    }

    #[must_use]
    pub fn with_default_stackable(mut self, stackable: bool) -> Self {
        self.default_stackable = stackable;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: ClockKind) -> Self {
        self.clock = clock;
        self
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(raw) = get(ENV_DEFAULT_PRIORITY) {
            config.default_priority =
                raw.trim()
                    .parse::<i32>()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: ENV_DEFAULT_PRIORITY.to_string(),
                        value: raw.clone(),
                    })?;
        }
        if let Some(raw) = get(ENV_DEFAULT_STACKABLE) {
            config.default_stackable =
                parse_flag(&raw).ok_or_else(|| ConfigError::InvalidValue {
                    key: ENV_DEFAULT_STACKABLE.to_string(),
                    value: raw.clone(),
                })?;
        }
        if let Some(raw) = get(ENV_CLOCK) {
            config.clock = raw.parse()?;
        }
        Ok(config)
    }

    /// Parse configuration from a TOML document.
    ///
    /// ```toml
    /// default_priority = 0
    /// default_stackable = false
    /// clock = "logical"
    /// ```
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(doc: &str) -> Result<Self, ConfigError> {
        toml::from_str(doc).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    let v = raw.trim();
    if v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes") {
        Some(true)
    } else if v == "0" || v.eq_ignore_ascii_case("false") || v.eq_ignore_ascii_case("no") {
        Some(false)
    } else {
        None
    }
}
