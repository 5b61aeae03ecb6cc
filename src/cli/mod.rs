//! Command-line interface.
//!
//! Global flags map onto [`Config`]; every flag also reads a
//! `DEALER_CONTACT_*` environment variable so settings can live in `.env`.

mod commands;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::config::{
    Config, LogFormat, LogLevel, ResolverSettings, CONTACT_CACHE_PATH, DEFAULT_MAX_CONTACT_LINKS,
    DEFAULT_MIN_SCORE, DEFAULT_NO_FORM_RETRY_DAYS, DEFAULT_REFRESH_DAYS,
    DEFAULT_SUBMISSION_COOLDOWN_HOURS, DEFAULT_USER_AGENT, HTTP_TIMEOUT_SECS,
    NAVIGATION_TIMEOUT_SECS, SUBMISSION_HISTORY_PATH,
};

pub use commands::run;

/// Finds and caches dealership contact forms.
#[derive(Debug, Parser)]
#[command(name = "dealer_contact", version, about)]
pub struct Cli {
    /// Log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info, env = "DEALER_CONTACT_LOG_LEVEL")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain, env = "DEALER_CONTACT_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Contact-page cache file
    #[arg(long, global = true, default_value = CONTACT_CACHE_PATH, env = "DEALER_CONTACT_CACHE_PATH")]
    pub cache_path: PathBuf,

    /// Submission history file
    #[arg(long, global = true, default_value = SUBMISSION_HISTORY_PATH, env = "DEALER_CONTACT_HISTORY_PATH")]
    pub history_path: PathBuf,

    /// Minimum relevance score (0-100) a form needs to count as found
    #[arg(long, global = true, default_value_t = DEFAULT_MIN_SCORE, env = "DEALER_CONTACT_MIN_SCORE")]
    pub min_score: f64,

    /// Days before a cached contact page is due for refresh
    #[arg(long, global = true, default_value_t = DEFAULT_REFRESH_DAYS, env = "DEALER_CONTACT_REFRESH_DAYS")]
    pub refresh_days: i64,

    /// Contact-like links visited per dealer during discovery
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_CONTACT_LINKS, env = "DEALER_CONTACT_MAX_LINKS")]
    pub max_contact_links: usize,

    /// Days a dealer without a usable form is left alone
    #[arg(long, global = true, default_value_t = DEFAULT_NO_FORM_RETRY_DAYS, env = "DEALER_CONTACT_NO_FORM_RETRY_DAYS")]
    pub no_form_retry_days: i64,

    /// Hours between submission attempts against the same dealer
    #[arg(long, global = true, default_value_t = DEFAULT_SUBMISSION_COOLDOWN_HOURS, env = "DEALER_CONTACT_COOLDOWN_HOURS")]
    pub cooldown_hours: i64,

    /// Per-navigation timeout in seconds
    #[arg(long, global = true, default_value_t = NAVIGATION_TIMEOUT_SECS, env = "DEALER_CONTACT_NAVIGATION_TIMEOUT")]
    pub navigation_timeout: u64,

    /// HTTP request timeout in seconds
    #[arg(long, global = true, default_value_t = HTTP_TIMEOUT_SECS, env = "DEALER_CONTACT_TIMEOUT_SECONDS")]
    pub timeout_seconds: u64,

    /// User-Agent for page fetches
    #[arg(long, global = true, default_value = DEFAULT_USER_AGENT, env = "DEALER_CONTACT_USER_AGENT")]
    pub user_agent: String,

    /// Host signature that needs a warm-up visit before navigation (repeatable)
    #[arg(long = "bypass-host", global = true, value_delimiter = ',', env = "DEALER_CONTACT_BYPASS_HOSTS")]
    pub bypass_hosts: Vec<String>,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve the contact page of one dealer
    Resolve {
        /// Dealer id (store key)
        dealer_id: String,
        /// Dealer homepage
        homepage: String,
        /// Display name (defaults to the id)
        #[arg(long)]
        name: Option<String>,
        /// Known contact URL to try first
        #[arg(long)]
        contact_url: Option<String>,
        /// Print the resolution as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve every dealer in a `dealer_id,dealer_name,homepage[,contact_url]` file
    Batch {
        /// Input file
        file: PathBuf,
        /// Skip dealers inside their submission cooldown
        #[arg(long)]
        respect_cooldown: bool,
    },
    /// Print the cached record of a dealer
    Show {
        /// Dealer id
        dealer_id: String,
    },
    /// List cached records
    List {
        /// Only active records due for refresh
        #[arg(long)]
        due: bool,
    },
    /// Mark a dealer as having no usable form
    MarkNoForm {
        /// Dealer id
        dealer_id: String,
        /// Why
        #[arg(long)]
        reason: String,
    },
    /// Record a submission attempt, starting the cooldown
    Cooldown {
        /// Dealer slug
        slug: String,
        /// Outcome of the attempt
        #[arg(long, default_value = "manual")]
        status: String,
    },
    /// Remove the submission cooldown of a dealer
    ClearCooldown {
        /// Dealer slug
        slug: String,
    },
}

impl Cli {
    /// Library configuration described by the global flags.
    pub fn to_config(&self) -> Config {
        Config {
            contact_cache_path: self.cache_path.clone(),
            submission_history_path: self.history_path.clone(),
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
            resolver: ResolverSettings {
                min_score: self.min_score,
                refresh_days: self.refresh_days,
                max_contact_links: self.max_contact_links,
                no_form_retry_days: self.no_form_retry_days,
                navigation_timeout: Duration::from_secs(self.navigation_timeout),
                ..Default::default()
            },
            submission_cooldown_hours: self.cooldown_hours,
            user_agent: self.user_agent.clone(),
            http_timeout_seconds: self.timeout_seconds,
            bypass_hosts: self
                .bypass_hosts
                .iter()
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }
}
