//! JSON-backed contact-page cache.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};

use super::record::{ContactPageRecord, RecordStatus};
use crate::config::{HISTORY_SOURCE_INACTIVE, HISTORY_SOURCE_NO_FORM, HISTORY_SOURCE_VALIDATION_FAILURE};
use crate::error_handling::StoreError;
use crate::storage::{load_records, normalize_key, write_records};

/// Durable map from dealer id to [`ContactPageRecord`].
///
/// Records live in memory; [`save`](Self::save) rewrites the backing file.
/// Mutations never touch the disk on their own, so callers choose the write
/// cadence. The file is read once, at construction.
///
/// Concurrent writers to the same file are not coordinated; run one process
/// per store file.
#[derive(Debug, Default)]
pub struct ContactPageStore {
    path: Option<PathBuf>,
    records: BTreeMap<String, ContactPageRecord>,
    save_count: usize,
}

impl ContactPageStore {
    /// Loads the store backed by `path`.
    ///
    /// A missing or corrupt file yields an empty store; the cache is an
    /// optimization, so availability wins over strictness here.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut store = Self {
            path: Some(path.clone()),
            ..Default::default()
        };
        for record in load_records::<ContactPageRecord>(&path) {
            store.upsert(record);
        }
        log::debug!(
            "Loaded {} contact page records from {}",
            store.records.len(),
            path.display()
        );
        store
    }

    /// Creates a store that never touches the disk.
    ///
    /// `save` still succeeds and is counted, which keeps write-cadence
    /// behaviour observable in tests.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Looks up a record (case- and whitespace-insensitive).
    pub fn get(&self, dealer_id: &str) -> Option<&ContactPageRecord> {
        self.records.get(&normalize_key(dealer_id))
    }

    pub(crate) fn get_mut(&mut self, dealer_id: &str) -> Option<&mut ContactPageRecord> {
        self.records.get_mut(&normalize_key(dealer_id))
    }

    /// Inserts `record`, replacing any record with the same normalized id.
    ///
    /// Non-active records must explain themselves: a missing `notes` is filled
    /// in with a generic reason.
    pub fn upsert(&mut self, mut record: ContactPageRecord) {
        let key = normalize_key(&record.dealer_id);
        record.dealer_id = key.clone();
        if record.status != RecordStatus::Active && record.notes.is_none() {
            log::warn!(
                "Record for {} is {} without notes; adding a placeholder reason",
                key,
                record.status
            );
            record.notes = Some(format!("marked {} without a recorded reason", record.status));
        }
        self.records.insert(key, record);
    }

    /// Marks a record stale with `reason`, stamping the history entry with
    /// `now`. No-op when the dealer is unknown.
    ///
    /// Returns whether a record was updated.
    pub fn mark_inactive(&mut self, dealer_id: &str, reason: &str, now: DateTime<Utc>) -> bool {
        let Some(record) = self.get_mut(dealer_id) else {
            return false;
        };
        record.status = RecordStatus::Stale;
        record.notes = Some(reason.to_string());
        record.push_history(now, HISTORY_SOURCE_INACTIVE, reason);
        log::info!("Marked contact page for {} inactive: {}", record.dealer_id, reason);
        true
    }

    /// Marks a record as having no usable form, starting its retry window at `now`.
    /// No-op when the dealer is unknown.
    ///
    /// Returns whether a record was updated.
    pub fn mark_no_form(&mut self, dealer_id: &str, reason: &str, now: DateTime<Utc>) -> bool {
        let Some(record) = self.get_mut(dealer_id) else {
            return false;
        };
        record.status = RecordStatus::NoForm;
        record.notes = Some(reason.to_string());
        record.last_verified_at = now;
        record.push_history(now, HISTORY_SOURCE_NO_FORM, reason);
        log::info!("Marked {} as having no usable form: {}", record.dealer_id, reason);
        true
    }

    /// Counts a failed re-verification of the cached URL.
    ///
    /// Appends a `validation_failure` history entry and returns the number of
    /// failures recorded before this one, or `None` when the dealer is unknown.
    pub fn record_validation_failure(
        &mut self,
        dealer_id: &str,
        message: &str,
        now: DateTime<Utc>,
    ) -> Option<u32> {
        let record = self.get_mut(dealer_id)?;
        let prior = record.validation_failures;
        record.validation_failures = prior.saturating_add(1);
        record.push_history(now, HISTORY_SOURCE_VALIDATION_FAILURE, message);
        Some(prior)
    }

    /// Writes every record to the backing file, sorted by dealer id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be serialized or written.
    pub fn save(&mut self) -> Result<(), StoreError> {
        self.save_count += 1;
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        let records: Vec<&ContactPageRecord> = self.records.values().collect();
        write_records(path, &records)?;
        log::debug!("Saved {} contact page records to {}", records.len(), path.display());
        Ok(())
    }

    /// Number of `save` calls so far.
    pub fn save_count(&self) -> usize {
        self.save_count
    }

    /// All records, sorted by dealer id.
    pub fn records(&self) -> impl Iterator<Item = &ContactPageRecord> {
        self.records.values()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Active records verified `refresh_interval` or longer ago.
    pub fn records_due_for_refresh(
        &self,
        now: DateTime<Utc>,
        refresh_interval: Duration,
    ) -> Vec<&ContactPageRecord> {
        self.records
            .values()
            .filter(|r| r.is_active() && !r.is_fresh(now, refresh_interval))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(dealer_id: &str, verified: DateTime<Utc>) -> ContactPageRecord {
        ContactPageRecord {
            dealer_id: dealer_id.to_string(),
            dealer_name: "Acme Motors".to_string(),
            website: "https://acmemotors.example/".to_string(),
            contact_url: "https://acmemotors.example/contact-us/".to_string(),
            last_verified_at: verified,
            contact_score: 65.0,
            form_type: "generic".to_string(),
            total_inputs: 5,
            status: RecordStatus::Active,
            notes: None,
            history: Vec::new(),
            validation_failures: 0,
        }
    }

    #[test]
    fn test_get_is_case_and_whitespace_insensitive() {
        let mut store = ContactPageStore::in_memory();
        store.upsert(record(" Acme-Motors ", Utc::now()));
        assert_eq!(store.len(), 1);
        assert!(store.get("acme-motors").is_some());
        assert!(store.get("ACME-MOTORS").is_some());
        assert_eq!(store.get("acme-motors").unwrap().dealer_id, "acme-motors");
    }

    #[test]
    fn test_upsert_replaces_same_key() {
        let mut store = ContactPageStore::in_memory();
        store.upsert(record("acme-motors", Utc::now()));
        let mut replacement = record("ACME-MOTORS", Utc::now());
        replacement.contact_score = 80.0;
        store.upsert(replacement);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("acme-motors").unwrap().contact_score, 80.0);
    }

    #[test]
    fn test_upsert_fills_missing_notes_for_inactive_records() {
        let mut store = ContactPageStore::in_memory();
        let mut stale = record("acme-motors", Utc::now());
        stale.status = RecordStatus::Stale;
        store.upsert(stale);
        assert!(store.get("acme-motors").unwrap().notes.is_some());
    }

    #[test]
    fn test_mark_inactive_unknown_dealer_is_noop() {
        let mut store = ContactPageStore::in_memory();
        assert!(!store.mark_inactive("nobody", "gone", Utc::now()));
        assert!(store.is_empty());
    }

    #[test]
    fn test_mark_inactive_sets_status_notes_and_history() {
        let mut store = ContactPageStore::in_memory();
        store.upsert(record("acme-motors", Utc::now()));
        let now = Utc::now() - Duration::minutes(5);
        assert!(store.mark_inactive("acme-motors", "form removed", now));

        let r = store.get("acme-motors").unwrap();
        assert_eq!(r.status, RecordStatus::Stale);
        assert_eq!(r.notes.as_deref(), Some("form removed"));
        assert_eq!(r.history.len(), 1);
        assert_eq!(r.history[0].source, "inactive");
        assert_eq!(r.history[0].timestamp, now);
        assert_eq!(store.save_count(), 0, "mutations must not save implicitly");
    }

    #[test]
    fn test_mark_no_form_restarts_retry_window() {
        let mut store = ContactPageStore::in_memory();
        let old = Utc::now() - Duration::days(40);
        store.upsert(record("acme-motors", old));
        let now = Utc::now();
        assert!(store.mark_no_form("acme-motors", "checked by hand", now));

        let r = store.get("acme-motors").unwrap();
        assert_eq!(r.status, RecordStatus::NoForm);
        assert_eq!(r.last_verified_at, now);
        assert_eq!(r.history.last().unwrap().source, "no_form");
    }

    #[test]
    fn test_record_validation_failure_counts() {
        let mut store = ContactPageStore::in_memory();
        store.upsert(record("acme-motors", Utc::now()));
        let now = Utc::now();
        assert_eq!(store.record_validation_failure("acme-motors", "timeout", now), Some(0));
        assert_eq!(store.record_validation_failure("acme-motors", "timeout", now), Some(1));
        assert_eq!(store.record_validation_failure("nobody", "timeout", now), None);

        let r = store.get("acme-motors").unwrap();
        assert_eq!(r.validation_failures, 2);
        assert_eq!(r.history.len(), 2);
        assert!(r.history.iter().all(|h| h.source == "validation_failure"));
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("contact_page_cache.json");

        let mut store = ContactPageStore::load(&path);
        assert!(store.is_empty());
        store.upsert(record("zeta-auto", Utc::now()));
        store.upsert(record("acme-motors", Utc::now()));
        store.save().unwrap();
        assert_eq!(store.save_count(), 1);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.find("acme-motors").unwrap() < content.find("zeta-auto").unwrap());

        let reloaded = ContactPageStore::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get("acme-motors"), store.get("acme-motors"));
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("contact_page_cache.json");
        std::fs::write(&path, "[{\"dealer_id\": 12").unwrap();
        let store = ContactPageStore::load(&path);
        assert!(store.is_empty());
        assert_eq!(store.path(), Some(path.as_path()));
    }

    #[test]
    fn test_records_due_for_refresh() {
        let now = Utc::now();
        let mut store = ContactPageStore::in_memory();
        store.upsert(record("fresh", now - Duration::days(2)));
        store.upsert(record("old", now - Duration::days(45)));
        let mut stale = record("old-stale", now - Duration::days(45));
        stale.status = RecordStatus::Stale;
        stale.notes = Some("gone".to_string());
        store.upsert(stale);

        let due: Vec<&str> = store
            .records_due_for_refresh(now, Duration::days(30))
            .into_iter()
            .map(|r| r.dealer_id.as_str())
            .collect();
        assert_eq!(due, vec!["old"]);
    }
}
