//! Configuration constants.
//!
//! This module defines the policy defaults used throughout the crate: score
//! thresholds, cache ages, cooldowns, timeouts, and default file locations.

use std::time::Duration;

// Resolution policy
/// Minimum relevance score (inclusive) for a form to count as a usable contact form.
/// Detector scores live on a 0-100 scale; forms below this are treated as noise
/// (newsletter signups, search boxes, login widgets).
pub const DEFAULT_MIN_SCORE: f64 = 40.0;
/// Age in days after which a cached contact page is due for re-verification pressure.
pub const DEFAULT_REFRESH_DAYS: i64 = 30;
/// Maximum number of discovered contact-like links to visit during the crawl fallback.
pub const DEFAULT_MAX_CONTACT_LINKS: usize = 3;
/// Days a `no_form` record blocks new resolution attempts before discovery is retried.
pub const DEFAULT_NO_FORM_RETRY_DAYS: i64 = 7;
/// Number of cache re-verification failures tolerated before the entry is evicted.
/// With the default of 2, the third consecutive failure marks the record stale.
pub const DEFAULT_VALIDATION_FAILURE_TOLERANCE: u32 = 2;

// Submission cooldown
/// Hours during which a dealer is not submitted to again after an attempt.
pub const DEFAULT_SUBMISSION_COOLDOWN_HOURS: i64 = 12;

// Collaborator timeouts
/// Per-navigation timeout in seconds
pub const NAVIGATION_TIMEOUT_SECS: u64 = 30;
/// Per-detector-invocation timeout in seconds
pub const DETECTION_TIMEOUT_SECS: u64 = 20;
/// Timeout for a single click during a modal probe
pub const MODAL_CLICK_TIMEOUT: Duration = Duration::from_secs(5);
/// Settle time between the origin warm-up visit and the target navigation
pub const BYPASS_SETTLE_DELAY: Duration = Duration::from_millis(1500);

// HTTP page fetching
/// Per-request timeout for the HTTP-backed browser, in seconds
pub const HTTP_TIMEOUT_SECS: u64 = 20;
/// Maximum number of redirect hops to follow
pub const MAX_REDIRECT_HOPS: usize = 10;
/// Maximum response body size in bytes (2MB)
/// Responses larger than this are truncated to prevent memory exhaustion
pub const MAX_RESPONSE_BODY_SIZE: usize = 2 * 1024 * 1024;

/// Default User-Agent string for page fetches.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Persisted state
/// Default location of the contact-page cache
pub const CONTACT_CACHE_PATH: &str = "data/contact_page_cache.json";
/// Default location of the submission history
pub const SUBMISSION_HISTORY_PATH: &str = "data/submission_history.json";

// Discovery
/// Keywords that mark an anchor as contact-like (matched against text and href).
pub const CONTACT_LINK_KEYWORDS: &[&str] = &[
    "contact", "quote", "sales", "inquiry", "enquiry", "get-in-touch", "reach-us",
];

// Persisted note / history wording
/// Reason recorded when discovery exhausts every candidate.
pub const DISCOVERY_EXHAUSTED_REASON: &str = "contact form not detected during discovery";
/// History source for entries written by the resolver
pub const HISTORY_SOURCE_RESOLVER: &str = "resolver";
/// History source for inactive markings
pub const HISTORY_SOURCE_INACTIVE: &str = "inactive";
/// History source for failed cache re-verifications
pub const HISTORY_SOURCE_VALIDATION_FAILURE: &str = "validation_failure";
/// History source for no-form markings
pub const HISTORY_SOURCE_NO_FORM: &str = "no_form";
