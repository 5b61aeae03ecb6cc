//! Per-dealer last submission attempt.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_SUBMISSION_COOLDOWN_HOURS;
use crate::error_handling::StoreError;
use crate::storage::{load_records, normalize_key, write_records};

/// Last attempt against one dealer. Overwritten on every attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    /// Dealer slug
    pub slug: String,
    /// Free-form outcome of the last attempt ("submitted", "captcha", ...)
    pub last_status: String,
    /// When the last attempt happened
    pub last_attempt: DateTime<Utc>,
}

/// JSON-backed cooldown store, saved after every change.
#[derive(Debug)]
pub struct SubmissionHistory {
    path: Option<PathBuf>,
    cooldown: Duration,
    records: BTreeMap<String, SubmissionRecord>,
}

impl Default for SubmissionHistory {
    fn default() -> Self {
        Self {
            path: None,
            cooldown: Duration::hours(DEFAULT_SUBMISSION_COOLDOWN_HOURS),
            records: BTreeMap::new(),
        }
    }
}

impl SubmissionHistory {
    /// Loads the history backed by `path`. A missing or corrupt file yields
    /// an empty history.
    pub fn load(path: impl Into<PathBuf>, cooldown: Duration) -> Self {
        let path = path.into();
        let records = load_records::<SubmissionRecord>(&path)
            .into_iter()
            .map(|r| (normalize_key(&r.slug), r))
            .collect();
        Self {
            path: Some(path),
            cooldown,
            records,
        }
    }

    /// History that never touches the disk.
    pub fn in_memory(cooldown: Duration) -> Self {
        Self {
            cooldown,
            ..Default::default()
        }
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Configured cooldown.
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Last attempt for `slug`.
    pub fn get(&self, slug: &str) -> Option<&SubmissionRecord> {
        self.records.get(&normalize_key(slug))
    }

    /// All records, sorted by slug.
    pub fn records(&self) -> impl Iterator<Item = &SubmissionRecord> {
        self.records.values()
    }

    /// Whether `slug` was attempted less than the cooldown ago.
    ///
    /// `now` defaults to the current time.
    pub fn should_skip(&self, slug: &str, now: Option<DateTime<Utc>>) -> bool {
        let now = now.unwrap_or_else(Utc::now);
        self.get(slug)
            .is_some_and(|r| now - r.last_attempt < self.cooldown)
    }

    /// Time left in the cooldown for `slug`, if it is cooling down.
    pub fn remaining(&self, slug: &str, now: Option<DateTime<Utc>>) -> Option<Duration> {
        let now = now.unwrap_or_else(Utc::now);
        let record = self.get(slug)?;
        let remaining = self.cooldown - (now - record.last_attempt);
        (remaining > Duration::zero()).then_some(remaining)
    }

    /// Overwrites the record for `slug` and saves.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be written; the in-memory
    /// record is updated regardless.
    pub fn record(
        &mut self,
        slug: &str,
        status: &str,
        now: Option<DateTime<Utc>>,
    ) -> Result<(), StoreError> {
        let key = normalize_key(slug);
        let record = SubmissionRecord {
            slug: key.clone(),
            last_status: status.to_string(),
            last_attempt: now.unwrap_or_else(Utc::now),
        };
        log::debug!("Recording submission attempt for {}: {}", key, status);
        self.records.insert(key, record);
        self.save()
    }

    /// Removes any cooldown for `slug` and saves.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be written.
    pub fn clear(&mut self, slug: &str) -> Result<(), StoreError> {
        let key = normalize_key(slug);
        if self.records.remove(&key).is_some() {
            log::info!("Cleared submission cooldown for {}", key);
        }
        self.save()
    }

    fn save(&self) -> Result<(), StoreError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        let records: Vec<&SubmissionRecord> = self.records.values().collect();
        write_records(path, &records)
    }
}
