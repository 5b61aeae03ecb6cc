//! Writing resolver outcomes back into the contact-page store.

use chrono::{DateTime, Utc};

use crate::config::{DISCOVERY_EXHAUSTED_REASON, HISTORY_SOURCE_RESOLVER};
use crate::contact::{ContactPageRecord, RecordStatus};

use super::{CandidateOutcome, ContactPageResolution, ContactPageResolver, ResolutionSource};

impl ContactPageResolver {
    /// Creates or updates the dealer's record from a successful resolution.
    ///
    /// Saves unless the resolution was a clean cache hit: same URL and score
    /// on a fresh record with no pending validation failures.
    pub(super) fn persist_resolution(&mut self, resolution: &ContactPageResolution, now: DateTime<Utc>) {
        let dealer_id = resolution.dealer_id.as_str();

        let Some(mut record) = self.store.get(dealer_id).cloned() else {
            let mut record = ContactPageRecord {
                dealer_id: dealer_id.to_string(),
                dealer_name: resolution.dealer_name.clone(),
                website: resolution.homepage_url.clone(),
                contact_url: resolution.contact_url.clone(),
                last_verified_at: now,
                contact_score: resolution.contact_score,
                form_type: resolution.form_type.clone(),
                total_inputs: resolution.total_inputs,
                status: RecordStatus::Active,
                notes: None,
                history: Vec::new(),
                validation_failures: 0,
            };
            record.push_history(
                now,
                HISTORY_SOURCE_RESOLVER,
                format!(
                    "contact page found via {} with score {:.1}",
                    resolution.source, resolution.contact_score
                ),
            );
            log::info!(
                "Caching new contact page for {}: {}",
                dealer_id,
                resolution.contact_url
            );
            self.store.upsert(record);
            self.save_store(dealer_id);
            return;
        };

        let url_changed = record.contact_url != resolution.contact_url;
        let score_changed = (record.contact_score - resolution.contact_score).abs() > f64::EPSILON;
        if url_changed || score_changed {
            record.push_history(
                now,
                HISTORY_SOURCE_RESOLVER,
                format!(
                    "updated via {}: {} ({:.1}) -> {} ({:.1})",
                    resolution.source,
                    record.contact_url,
                    record.contact_score,
                    resolution.contact_url,
                    resolution.contact_score
                ),
            );
        }

        let clean_cache_hit = resolution.source == ResolutionSource::Cache
            && !url_changed
            && !score_changed
            && record.is_active()
            && record.validation_failures == 0
            && record.is_fresh(now, self.settings.refresh_interval());

        record.dealer_name = resolution.dealer_name.clone();
        record.website = resolution.homepage_url.clone();
        record.contact_url = resolution.contact_url.clone();
        record.last_verified_at = now;
        record.contact_score = resolution.contact_score;
        record.form_type = resolution.form_type.clone();
        record.total_inputs = resolution.total_inputs;
        record.status = RecordStatus::Active;
        record.notes = None;
        record.validation_failures = 0;
        self.store.upsert(record);

        if clean_cache_hit {
            log::debug!("Cache hit for {} unchanged; deferring save", dealer_id);
        } else {
            self.save_store(dealer_id);
        }
    }

    /// Counts a failed re-verification of the cached URL and evicts the entry
    /// once the tolerance is used up.
    ///
    /// Returns `true` when the entry was evicted.
    pub(super) fn record_cache_failure(
        &mut self,
        dealer_id: &str,
        url: &str,
        outcome: &CandidateOutcome,
        now: DateTime<Utc>,
    ) -> bool {
        let message = format!("cached URL {url} failed verification: {outcome}");
        let Some(prior) = self.store.record_validation_failure(dealer_id, &message, now) else {
            return false;
        };

        let tolerance = self.settings.validation_failure_tolerance;
        if prior < tolerance {
            log::info!(
                "Cached contact page for {} failed verification ({} of {} tolerated)",
                dealer_id,
                prior + 1,
                tolerance
            );
            return false;
        }

        let reason = format!("cached contact page failed verification {} times", prior + 1);
        self.store.mark_inactive(dealer_id, &reason, now);
        self.save_store(dealer_id);
        log::warn!("Evicted cached contact page for {}: {}", dealer_id, reason);
        true
    }

    /// Records that every tier came up empty.
    ///
    /// A record still inside its cache-failure tolerance stays active. A
    /// record that was already stale or `no_form` moves to `no_form`, which
    /// starts the retry window. Anything else is marked inactive.
    pub(super) fn record_exhaustion(
        &mut self,
        dealer_id: &str,
        prior_status: Option<RecordStatus>,
        cache_within_tolerance: bool,
        now: DateTime<Utc>,
    ) {
        match prior_status {
            Some(RecordStatus::Stale | RecordStatus::NoForm) => {
                self.store.mark_no_form(dealer_id, DISCOVERY_EXHAUSTED_REASON, now);
            }
            Some(RecordStatus::Active) if cache_within_tolerance => {
                log::info!(
                    "Keeping cached contact page for {} active until it exhausts its failure tolerance",
                    dealer_id
                );
            }
            _ => {
                self.store.mark_inactive(dealer_id, DISCOVERY_EXHAUSTED_REASON, now);
            }
        }
        self.save_store(dealer_id);
    }

    /// Saves the store, logging instead of failing: the cache is an
    /// optimization and a failed write must not fail the resolution.
    pub(super) fn save_store(&mut self, dealer_id: &str) {
        if let Err(e) = self.store.save() {
            log::warn!("Failed to save contact page cache after resolving {}: {}", dealer_id, e);
        }
    }
}
