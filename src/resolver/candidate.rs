//! Navigation and detection for a single candidate page.

use crate::browser::Page;
use crate::config::MODAL_CLICK_TIMEOUT;
use crate::detection::{best_form, ContactLink, FormSummary};
use crate::error_handling::{DetectionError, NavigationError};

use super::{CandidateOutcome, ContactPageResolver};

/// Forms seen on one candidate page and the verdict on them.
#[derive(Debug, Clone)]
pub(super) struct CandidateEvaluation {
    pub(super) outcome: CandidateOutcome,
    pub(super) forms: Vec<FormSummary>,
}

impl ContactPageResolver {
    /// Navigates `page` to `url` through the bypass registry, bounded by the
    /// navigation timeout.
    pub(super) async fn navigate(&self, page: &mut dyn Page, url: &str) -> Result<(), NavigationError> {
        let limit = self.settings.navigation_timeout;
        match tokio::time::timeout(limit, self.bypasses.navigate(page, url, limit)).await {
            Ok(result) => result,
            Err(_) => Err(NavigationError::Timeout {
                url: url.to_string(),
                seconds: limit.as_secs(),
            }),
        }
    }

    /// Runs the detector on the loaded page, bounded by the detection timeout.
    ///
    /// Scores are clamped and forms missing a page URL or name are stamped
    /// with the candidate's.
    pub(super) async fn detect(
        &self,
        page: &dyn Page,
        label: &str,
        url: &str,
    ) -> Result<Vec<FormSummary>, DetectionError> {
        let limit = self.settings.detection_timeout;
        let forms = tokio::time::timeout(limit, self.detector.detect_forms_on_page(page, label, url))
            .await
            .map_err(|_| DetectionError::Timeout {
                url: url.to_string(),
                seconds: limit.as_secs(),
            })??;

        Ok(forms
            .into_iter()
            .map(|form| {
                let mut form = form.sanitized();
                if form.page_url.is_empty() {
                    form.page_url = url.to_string();
                }
                if form.page_name.is_empty() {
                    form.page_name = label.to_string();
                }
                form
            })
            .collect())
    }

    /// Contact-like anchors on the loaded page. Failures yield no links.
    pub(super) async fn contact_links(&self, page: &dyn Page, dealer_id: &str) -> Vec<ContactLink> {
        let limit = self.settings.detection_timeout;
        match tokio::time::timeout(limit, self.detector.find_contact_links(page)).await {
            Ok(Ok(links)) => links,
            Ok(Err(e)) => {
                log::debug!("Contact link lookup failed for {}: {}", dealer_id, e);
                Vec::new()
            }
            Err(_) => {
                log::debug!(
                    "Contact link lookup for {} timed out after {}s",
                    dealer_id,
                    limit.as_secs()
                );
                Vec::new()
            }
        }
    }

    /// Checks a preferred or cached URL: navigate, detect, fall back to the
    /// modal probes when the page shows no forms at all.
    pub(super) async fn evaluate_candidate(
        &self,
        page: &mut dyn Page,
        dealer_id: &str,
        label: &str,
        url: &str,
    ) -> CandidateEvaluation {
        if let Err(e) = self.navigate(page, url).await {
            log::info!("Could not load {} candidate for {}: {}", label, dealer_id, e);
            return CandidateEvaluation {
                outcome: CandidateOutcome::NavigationFailed {
                    error: e.to_string(),
                },
                forms: Vec::new(),
            };
        }

        let mut forms = match self.detect(page, label, url).await {
            Ok(forms) => forms,
            Err(e) => {
                log::info!("Form detection failed on {} candidate for {}: {}", label, dealer_id, e);
                return CandidateEvaluation {
                    outcome: CandidateOutcome::DetectionFailed {
                        error: e.to_string(),
                    },
                    forms: Vec::new(),
                };
            }
        };

        if forms.is_empty() && !self.settings.modal_probes.is_empty() {
            forms = self.probe_modals(page, dealer_id, label, url).await;
        }

        CandidateEvaluation {
            outcome: self.judge(&forms),
            forms,
        }
    }

    /// Verdict on a set of forms under the configured minimum score.
    pub(super) fn judge(&self, forms: &[FormSummary]) -> CandidateOutcome {
        match best_form(forms) {
            Some(best) if best.clears(self.settings.min_score) => CandidateOutcome::Found {
                score: best.relevance_score,
            },
            best => CandidateOutcome::BelowThreshold {
                best_score: best.map(|f| f.relevance_score),
            },
        }
    }

    /// Tries each modal click sequence in turn and re-runs detection after
    /// every trigger that exists. Returns the first non-empty form list.
    async fn probe_modals(
        &self,
        page: &mut dyn Page,
        dealer_id: &str,
        label: &str,
        url: &str,
    ) -> Vec<FormSummary> {
        for probe in &self.settings.modal_probes {
            match page.click(&probe.trigger_selector, MODAL_CLICK_TIMEOUT).await {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    log::debug!("Modal trigger click failed for {}: {}", dealer_id, e);
                    continue;
                }
            }
            if let Err(e) = page.click(&probe.option_selector, MODAL_CLICK_TIMEOUT).await {
                log::debug!("Modal option click failed for {}: {}", dealer_id, e);
            }

            match self.detect(page, label, url).await {
                Ok(forms) if !forms.is_empty() => {
                    log::debug!(
                        "Modal probe '{}' revealed {} form(s) for {}",
                        probe.trigger_selector,
                        forms.len(),
                        dealer_id
                    );
                    return forms;
                }
                Ok(_) => {}
                Err(e) => log::debug!("Detection after modal probe failed for {}: {}", dealer_id, e),
            }
        }
        Vec::new()
    }
}
