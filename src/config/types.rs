//! Configuration types.
//!
//! This module defines the logging enums shared with the CLI, the resolver
//! policy settings, and the library `Config` with its validation.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use clap::ValueEnum;

use crate::config::constants::*;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// A click sequence that reveals a contact form hidden behind a JS modal.
///
/// The trigger is clicked first; if it exists, the option (typically a
/// department or category chooser inside the modal) is clicked next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalProbe {
    /// Selector of the link or button that opens the modal
    pub trigger_selector: String,
    /// Selector of the category option inside the modal
    pub option_selector: String,
}

impl ModalProbe {
    /// Creates a probe from a trigger and an option selector.
    pub fn new(trigger_selector: impl Into<String>, option_selector: impl Into<String>) -> Self {
        Self {
            trigger_selector: trigger_selector.into(),
            option_selector: option_selector.into(),
        }
    }
}

/// Policy knobs for [`ContactPageResolver`](crate::ContactPageResolver).
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    /// Minimum acceptable relevance score (inclusive)
    pub min_score: f64,
    /// Age in days after which a cached record is considered due for refresh
    pub refresh_days: i64,
    /// Upper bound on contact-like links visited during discovery
    pub max_contact_links: usize,
    /// Days a `no_form` record blocks resolution before discovery is retried
    pub no_form_retry_days: i64,
    /// Cache re-verification failures tolerated before eviction
    pub validation_failure_tolerance: u32,
    /// Timeout applied to each navigation
    pub navigation_timeout: Duration,
    /// Timeout applied to each detector invocation
    pub detection_timeout: Duration,
    /// Modal click sequences tried when a candidate page shows no forms at all
    pub modal_probes: Vec<ModalProbe>,
}

impl ResolverSettings {
    /// Maximum age of a cached record before it is due for refresh.
    pub fn refresh_interval(&self) -> ChronoDuration {
        ChronoDuration::days(self.refresh_days)
    }

    /// How long a `no_form` verdict blocks new attempts.
    pub fn no_form_retry_interval(&self) -> ChronoDuration {
        ChronoDuration::days(self.no_form_retry_days)
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            refresh_days: DEFAULT_REFRESH_DAYS,
            max_contact_links: DEFAULT_MAX_CONTACT_LINKS,
            no_form_retry_days: DEFAULT_NO_FORM_RETRY_DAYS,
            validation_failure_tolerance: DEFAULT_VALIDATION_FAILURE_TOLERANCE,
            navigation_timeout: Duration::from_secs(NAVIGATION_TIMEOUT_SECS),
            detection_timeout: Duration::from_secs(DETECTION_TIMEOUT_SECS),
            modal_probes: vec![ModalProbe::new(
                "a[href*='#contact'], a[data-toggle='modal'][href*='contact'], button[data-target*='contact']",
                "[data-department='sales'], [data-category='sales'], button[value='sales']",
            )],
        }
    }
}

/// A configuration value that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Name of the offending field
    pub field: &'static str,
    /// What is wrong and what range is accepted
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigValidationError {}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use dealer_contact::Config;
/// use std::path::PathBuf;
///
/// let mut config = Config {
///     contact_cache_path: PathBuf::from("cache/contacts.json"),
///     ..Default::default()
/// };
/// config.resolver.max_contact_links = 5;
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Contact-page cache file
    pub contact_cache_path: PathBuf,

    /// Submission history file
    pub submission_history_path: PathBuf,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Resolver policy
    pub resolver: ResolverSettings,

    /// Submission cooldown in hours
    pub submission_cooldown_hours: i64,

    /// User-Agent used by the HTTP-backed browser
    pub user_agent: String,

    /// Per-request timeout of the HTTP-backed browser, in seconds
    pub http_timeout_seconds: u64,

    /// Host signatures that need the warm-up navigation bypass
    pub bypass_hosts: Vec<String>,
}

impl Config {
    /// Checks that every value is inside its accepted range.
    ///
    /// # Errors
    ///
    /// Returns the first field found out of range.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let r = &self.resolver;
        if !r.min_score.is_finite() || !(0.0..=100.0).contains(&r.min_score) {
            return Err(ConfigValidationError {
                field: "min_score",
                message: format!("must be between 0 and 100, got {}", r.min_score),
            });
        }
        if r.refresh_days <= 0 {
            return Err(ConfigValidationError {
                field: "refresh_days",
                message: format!("must be greater than 0, got {}", r.refresh_days),
            });
        }
        if r.no_form_retry_days < 0 {
            return Err(ConfigValidationError {
                field: "no_form_retry_days",
                message: format!("must not be negative, got {}", r.no_form_retry_days),
            });
        }
        if r.navigation_timeout.is_zero() {
            return Err(ConfigValidationError {
                field: "navigation_timeout",
                message: "must be greater than 0".to_string(),
            });
        }
        if r.detection_timeout.is_zero() {
            return Err(ConfigValidationError {
                field: "detection_timeout",
                message: "must be greater than 0".to_string(),
            });
        }
        if self.submission_cooldown_hours < 0 {
            return Err(ConfigValidationError {
                field: "submission_cooldown_hours",
                message: format!(
                    "must not be negative, got {}",
                    self.submission_cooldown_hours
                ),
            });
        }
        if self.http_timeout_seconds == 0 {
            return Err(ConfigValidationError {
                field: "http_timeout_seconds",
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Submission cooldown as a chrono duration.
    pub fn submission_cooldown(&self) -> ChronoDuration {
        ChronoDuration::hours(self.submission_cooldown_hours)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            contact_cache_path: PathBuf::from(CONTACT_CACHE_PATH),
            submission_history_path: PathBuf::from(SUBMISSION_HISTORY_PATH),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            resolver: ResolverSettings::default(),
            submission_cooldown_hours: DEFAULT_SUBMISSION_COOLDOWN_HOURS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http_timeout_seconds: HTTP_TIMEOUT_SECS,
            bypass_hosts: Vec::new(),
        }
    }
}
