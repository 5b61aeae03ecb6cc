//! Resolver input and output types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::detection::FormSummary;

/// One dealer to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DealerRequest {
    /// Store key (normalized before use)
    pub dealer_id: String,
    /// Display name
    pub dealer_name: String,
    /// Dealer homepage; discovery starts here
    pub homepage_url: String,
    /// Contact URL the caller already knows about, tried first
    #[serde(default)]
    pub preferred_contact_url: Option<String>,
}

impl DealerRequest {
    /// Creates a request without a preferred URL.
    pub fn new(
        dealer_id: impl Into<String>,
        dealer_name: impl Into<String>,
        homepage_url: impl Into<String>,
    ) -> Self {
        Self {
            dealer_id: dealer_id.into(),
            dealer_name: dealer_name.into(),
            homepage_url: homepage_url.into(),
            preferred_contact_url: None,
        }
    }

    /// Sets the preferred contact URL.
    pub fn with_preferred(mut self, url: impl Into<String>) -> Self {
        self.preferred_contact_url = Some(url.into());
        self
    }
}

/// Which tier produced a resolution.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResolutionSource {
    /// The caller-supplied contact URL
    Preferred,
    /// The URL cached from an earlier resolution
    Cache,
    /// Homepage scan or contact-link crawl
    Discovery,
}

/// Result of checking one candidate page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CandidateOutcome {
    /// A form cleared the minimum score.
    Found {
        /// Score of the winning form
        score: f64,
    },
    /// Forms were detected but none cleared the minimum score.
    BelowThreshold {
        /// Best score seen, if any form was found
        best_score: Option<f64>,
    },
    /// The page could not be loaded.
    NavigationFailed {
        /// Driver error text
        error: String,
    },
    /// The detector failed on the loaded page.
    DetectionFailed {
        /// Detector error text
        error: String,
    },
}

impl CandidateOutcome {
    /// Whether the candidate produced a usable form.
    pub fn is_found(&self) -> bool {
        matches!(self, CandidateOutcome::Found { .. })
    }
}

impl fmt::Display for CandidateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateOutcome::Found { score } => write!(f, "form found (score {score:.1})"),
            CandidateOutcome::BelowThreshold {
                best_score: Some(score),
            } => write!(f, "best form scored {score:.1}, below threshold"),
            CandidateOutcome::BelowThreshold { best_score: None } => write!(f, "no forms detected"),
            CandidateOutcome::NavigationFailed { error } => write!(f, "navigation failed: {error}"),
            CandidateOutcome::DetectionFailed { error } => write!(f, "detection failed: {error}"),
        }
    }
}

/// One page the resolver looked at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateAttempt {
    /// Page label ("preferred", "cache", "homepage", "contact_link_N")
    pub label: String,
    /// URL that was navigated to
    pub url: String,
    /// What happened
    pub outcome: CandidateOutcome,
}

/// Discovery trail attached to a resolution.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ResolutionMetadata {
    /// Every form seen by the winning tier (all visited pages for discovery)
    pub candidate_forms: Vec<FormSummary>,
    /// Contact-like links actually visited, in order
    pub contact_links_checked: Vec<String>,
    /// Every page checked, in order
    pub attempts: Vec<CandidateAttempt>,
}

/// A verified contact page for one dealer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactPageResolution {
    /// Normalized dealer id
    pub dealer_id: String,
    /// Display name
    pub dealer_name: String,
    /// Page hosting the best form
    pub contact_url: String,
    /// Tier that produced the result
    pub source: ResolutionSource,
    /// Relevance score of the best form
    pub contact_score: f64,
    /// Form classification of the best form
    pub form_type: String,
    /// Inputs on the best form
    pub total_inputs: u32,
    /// When the page was verified
    pub verified_at: DateTime<Utc>,
    /// Dealer homepage
    pub homepage_url: String,
    /// The winning form
    pub best_form: FormSummary,
    /// Discovery trail
    pub metadata: ResolutionMetadata,
}
