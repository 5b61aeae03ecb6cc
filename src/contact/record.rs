//! Cached contact-page records.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Retry eligibility of a cached record.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecordStatus {
    /// The cached URL was verified and is tried before discovery.
    #[default]
    Active,
    /// The cached URL stopped verifying; the record is kept as an audit trail.
    Stale,
    /// The site had no usable form; resolution is refused until the retry window passes.
    NoForm,
}

/// One entry of a record's append-only history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// When the entry was written
    pub timestamp: DateTime<Utc>,
    /// Who wrote it ("resolver", "inactive", "validation_failure", "no_form")
    pub source: String,
    /// Human-readable description of the change
    pub message: String,
}

impl HistoryEntry {
    /// Creates an entry stamped with `timestamp`.
    pub fn new(timestamp: DateTime<Utc>, source: &str, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            source: source.to_string(),
            message: message.into(),
        }
    }
}

/// The best known contact page of one dealer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactPageRecord {
    /// Store key (normalized on upsert)
    pub dealer_id: String,
    /// Display name
    pub dealer_name: String,
    /// Homepage URL
    pub website: String,
    /// Best known form-bearing URL
    pub contact_url: String,
    /// Last time the URL was verified (or found to have no form)
    pub last_verified_at: DateTime<Utc>,
    /// Relevance score of the best form at verification time
    pub contact_score: f64,
    /// Form classification
    pub form_type: String,
    /// Inputs on the best form
    pub total_inputs: u32,
    /// Retry eligibility
    #[serde(default)]
    pub status: RecordStatus,
    /// Why the record is not active
    #[serde(default)]
    pub notes: Option<String>,
    /// Append-only change log
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    /// Consecutive failed re-verifications of `contact_url`
    #[serde(default)]
    pub validation_failures: u32,
}

impl ContactPageRecord {
    /// Time elapsed since the last verification.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.last_verified_at
    }

    /// Whether the record was verified less than `refresh_interval` ago.
    pub fn is_fresh(&self, now: DateTime<Utc>, refresh_interval: Duration) -> bool {
        self.age(now) < refresh_interval
    }

    /// Whether the cached URL should be tried before discovery.
    pub fn is_active(&self) -> bool {
        self.status == RecordStatus::Active
    }

    /// Appends a history entry.
    pub fn push_history(&mut self, timestamp: DateTime<Utc>, source: &str, message: impl Into<String>) {
        self.history.push(HistoryEntry::new(timestamp, source, message));
    }
}
