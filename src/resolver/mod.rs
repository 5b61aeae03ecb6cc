//! Contact-page resolution.
//!
//! For one dealer, finds a page whose best form clears the minimum relevance
//! score, trying the cheapest evidence first:
//!
//! 1. the caller's preferred URL
//! 2. the URL cached from an earlier resolution (active records only)
//! 3. the homepage itself
//! 4. up to `max_contact_links` contact-like links found on the homepage
//!
//! Results are written back into the owned [`ContactPageStore`]. Cached URLs
//! that keep failing are evicted after a tolerance, and dealers whose sites
//! had no usable form are not probed again until their retry window passes.

mod candidate;
mod persist;
mod types;


use chrono::{DateTime, Utc};
use url::Url;

use crate::browser::{BrowserContext, BypassRegistry, Page};
use crate::config::ResolverSettings;
use crate::contact::{ContactPageStore, RecordStatus};
use crate::detection::{best_form, resolve_contact_links, FormDetector, FormSummary};
use crate::error_handling::LookupError;
use crate::storage::normalize_key;

pub use types::{
    CandidateAttempt, CandidateOutcome, ContactPageResolution, DealerRequest, ResolutionMetadata,
    ResolutionSource,
};

/// Resolves and caches dealer contact pages.
pub struct ContactPageResolver {
    store: ContactPageStore,
    detector: Box<dyn FormDetector>,
    settings: ResolverSettings,
    bypasses: BypassRegistry,
}

impl ContactPageResolver {
    /// Creates a resolver owning `store`, with no navigation bypasses.
    pub fn new(
        store: ContactPageStore,
        detector: Box<dyn FormDetector>,
        settings: ResolverSettings,
    ) -> Self {
        Self {
            store,
            detector,
            settings,
            bypasses: BypassRegistry::new(),
        }
    }

    /// Replaces the navigation bypasses.
    pub fn with_bypasses(mut self, bypasses: BypassRegistry) -> Self {
        self.bypasses = bypasses;
        self
    }

    /// The contact-page store.
    pub fn store(&self) -> &ContactPageStore {
        &self.store
    }

    /// Mutable access to the contact-page store.
    pub fn store_mut(&mut self) -> &mut ContactPageStore {
        &mut self.store
    }

    /// Consumes the resolver, returning its store.
    pub fn into_store(self) -> ContactPageStore {
        self.store
    }

    /// Finds a verified contact page for `request`.
    ///
    /// Navigation and detection failures only fail the candidate they
    /// happened on; resolution moves on to the next tier.
    ///
    /// # Errors
    ///
    /// - `LookupError::CoolingDown` when the dealer is inside its `no_form`
    ///   retry window (no navigation happens)
    /// - `LookupError::BrowserUnavailable` when `ctx` cannot open a page
    /// - `LookupError::NoUsableForm` when every tier came up empty
    pub async fn resolve(
        &mut self,
        ctx: &dyn BrowserContext,
        request: &DealerRequest,
    ) -> Result<ContactPageResolution, LookupError> {
        let now = Utc::now();
        let dealer_id = normalize_key(&request.dealer_id);
        let existing = self.store.get(&dealer_id).cloned();
        let prior_status = existing.as_ref().map(|r| r.status);

        if let Some(record) = existing.as_ref().filter(|r| r.status == RecordStatus::NoForm) {
            let retry = self.settings.no_form_retry_interval();
            let age = record.age(now);
            if age < retry {
                let remaining_days = (retry - age).num_milliseconds() as f64 / 86_400_000.0;
                log::info!(
                    "Skipping {}: no usable form found recently, retry in {:.1} days",
                    dealer_id,
                    remaining_days
                );
                return Err(LookupError::CoolingDown {
                    dealer_id,
                    remaining_days,
                });
            }
            log::info!("Retry window for {} has passed; rediscovering", dealer_id);
        }

        let mut page = ctx
            .new_page()
            .await
            .map_err(|e| LookupError::BrowserUnavailable {
                dealer_id: dealer_id.clone(),
                reason: e.to_string(),
            })?;

        let mut metadata = ResolutionMetadata::default();
        let mut candidates = Vec::with_capacity(2);
        if let Some(url) = request
            .preferred_contact_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
        {
            candidates.push((ResolutionSource::Preferred, url.to_string()));
        }
        if let Some(record) = existing.as_ref().filter(|r| r.is_active()) {
            candidates.push((ResolutionSource::Cache, record.contact_url.clone()));
        }

        let mut cache_within_tolerance = false;
        for (source, url) in candidates {
            let label: &str = source.as_ref();
            let evaluation = self
                .evaluate_candidate(page.as_mut(), &dealer_id, label, &url)
                .await;
            metadata.attempts.push(CandidateAttempt {
                label: label.to_string(),
                url: url.clone(),
                outcome: evaluation.outcome.clone(),
            });

            if evaluation.outcome.is_found() {
                metadata.candidate_forms = evaluation.forms;
                return Ok(self.finish(request, dealer_id, source, metadata, now));
            }
            log::debug!("{} candidate for {} rejected: {}", label, dealer_id, evaluation.outcome);

            if source == ResolutionSource::Cache {
                let evicted = self.record_cache_failure(&dealer_id, &url, &evaluation.outcome, now);
                cache_within_tolerance = !evicted;
            }
        }

        if let Some(source_forms) = self
            .discover(page.as_mut(), &dealer_id, &request.homepage_url, &mut metadata)
            .await
        {
            metadata.candidate_forms = source_forms;
            return Ok(self.finish(request, dealer_id, ResolutionSource::Discovery, metadata, now));
        }

        log::info!(
            "No usable contact form for {} after checking {} page(s)",
            dealer_id,
            metadata.attempts.len()
        );
        self.record_exhaustion(&dealer_id, prior_status, cache_within_tolerance, now);
        Err(LookupError::NoUsableForm { dealer_id })
    }

    /// Homepage scan, then the contact-link crawl.
    ///
    /// Returns every form seen once the best of them clears the minimum score.
    async fn discover(
        &self,
        page: &mut dyn Page,
        dealer_id: &str,
        homepage_url: &str,
        metadata: &mut ResolutionMetadata,
    ) -> Option<Vec<FormSummary>> {
        let homepage_url = homepage_url.trim();
        if let Err(e) = self.navigate(page, homepage_url).await {
            log::info!("Could not load homepage for {}: {}", dealer_id, e);
            metadata.attempts.push(CandidateAttempt {
                label: "homepage".to_string(),
                url: homepage_url.to_string(),
                outcome: CandidateOutcome::NavigationFailed {
                    error: e.to_string(),
                },
            });
            return None;
        }

        let mut forms = Vec::new();
        let outcome = match self.detect(page, "homepage", homepage_url).await {
            Ok(found) => {
                forms.extend(found);
                self.judge(&forms)
            }
            Err(e) => CandidateOutcome::DetectionFailed {
                error: e.to_string(),
            },
        };
        let found = outcome.is_found();
        metadata.attempts.push(CandidateAttempt {
            label: "homepage".to_string(),
            url: homepage_url.to_string(),
            outcome,
        });
        if found {
            return Some(forms);
        }

        // Relative hrefs belong to the document actually loaded, which differs
        // from the requested URL after a redirect.
        let base_url = page
            .current_url()
            .unwrap_or_else(|| homepage_url.to_string());
        let links = self.contact_links(page, dealer_id).await;
        let urls = match Url::parse(&base_url) {
            Ok(base) => resolve_contact_links(&links, &base),
            Err(e) => {
                log::debug!("Homepage URL for {} does not parse ({}); skipping links", dealer_id, e);
                Vec::new()
            }
        };
        log::debug!(
            "Found {} contact-like link(s) for {}, checking up to {}",
            urls.len(),
            dealer_id,
            self.settings.max_contact_links
        );

        for (index, url) in urls
            .into_iter()
            .take(self.settings.max_contact_links)
            .enumerate()
        {
            let label = format!("contact_link_{}", index + 1);
            metadata.contact_links_checked.push(url.clone());

            let outcome = match self.navigate(page, &url).await {
                Err(e) => CandidateOutcome::NavigationFailed {
                    error: e.to_string(),
                },
                Ok(()) => match self.detect(page, &label, &url).await {
                    Ok(found) => {
                        forms.extend(found);
                        self.judge(&forms)
                    }
                    Err(e) => CandidateOutcome::DetectionFailed {
                        error: e.to_string(),
                    },
                },
            };
            let found = outcome.is_found();
            metadata.attempts.push(CandidateAttempt { label, url, outcome });
            if found {
                return Some(forms);
            }
        }
        None
    }

    /// Builds the resolution from the best candidate form and persists it.
    fn finish(
        &mut self,
        request: &DealerRequest,
        dealer_id: String,
        source: ResolutionSource,
        metadata: ResolutionMetadata,
        now: DateTime<Utc>,
    ) -> ContactPageResolution {
        let best = best_form(&metadata.candidate_forms)
            .cloned()
            .unwrap_or_default();
        let resolution = ContactPageResolution {
            dealer_id,
            dealer_name: request.dealer_name.clone(),
            contact_url: best.page_url.clone(),
            source,
            contact_score: best.relevance_score,
            form_type: best.form_type.clone(),
            total_inputs: best.total_inputs,
            verified_at: now,
            homepage_url: request.homepage_url.trim().to_string(),
            best_form: best,
            metadata,
        };
        log::info!(
            "Resolved contact page for {} via {}: {} (score {:.1})",
            resolution.dealer_id,
            resolution.source,
            resolution.contact_url,
            resolution.contact_score
        );
        self.persist_resolution(&resolution, now);
        resolution
    }
}
