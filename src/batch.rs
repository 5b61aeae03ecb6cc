//! Sequential batch driver over many dealers.
//!
//! Input is a line file: `dealer_id,dealer_name,homepage[,contact_url]`, one
//! dealer per line, `#` starting a comment. A `LookupError` for one dealer is
//! recorded and the batch moves on.

use std::fmt;
use std::time::{Duration, Instant};

use log::warn;

use crate::browser::BrowserContext;
use crate::error_handling::LookupError;
use crate::resolver::{ContactPageResolution, ContactPageResolver, DealerRequest};
use crate::submission::SubmissionHistory;

/// Maximum URL length accepted from input files.
const MAX_URL_LENGTH: usize = 2048;

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Dealers with a verified contact page
    pub resolved: Vec<ContactPageResolution>,
    /// Dealers where every tier came up empty or no page could be opened
    pub unresolved: Vec<LookupError>,
    /// Dealers refused because of a recent `no_form` verdict
    pub cooling_down: Vec<LookupError>,
    /// Dealers skipped because of their submission cooldown
    pub skipped: Vec<String>,
    /// Wall time of the run
    pub elapsed: Duration,
}

impl BatchReport {
    /// Number of dealers the batch looked at.
    pub fn total(&self) -> usize {
        self.resolved.len() + self.unresolved.len() + self.cooling_down.len() + self.skipped.len()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} dealers in {:.1}s: {} resolved, {} unresolved, {} cooling down, {} skipped",
            self.total(),
            self.elapsed.as_secs_f64(),
            self.resolved.len(),
            self.unresolved.len(),
            self.cooling_down.len(),
            self.skipped.len()
        )
    }
}

/// Resolves `requests` one after another.
///
/// When `history` is given, dealers inside their submission cooldown are
/// skipped without touching the browser. The contact-page store is saved
/// once at the end so deferred cache-hit updates reach the disk.
pub async fn resolve_batch(
    resolver: &mut ContactPageResolver,
    ctx: &dyn BrowserContext,
    requests: &[DealerRequest],
    history: Option<&SubmissionHistory>,
) -> BatchReport {
    let start = Instant::now();
    let mut report = BatchReport::default();

    for (index, request) in requests.iter().enumerate() {
        if history.is_some_and(|h| h.should_skip(&request.dealer_id, None)) {
            log::info!(
                "Skipping {}: inside submission cooldown",
                request.dealer_id
            );
            report.skipped.push(request.dealer_id.clone());
            continue;
        }

        log::debug!(
            "Resolving {} ({}/{})",
            request.dealer_id,
            index + 1,
            requests.len()
        );
        match resolver.resolve(ctx, request).await {
            Ok(resolution) => report.resolved.push(resolution),
            Err(e) if e.is_cooling_down() => report.cooling_down.push(e),
            Err(e) => {
                warn!("{}", e);
                report.unresolved.push(e);
            }
        }
    }

    if let Err(e) = resolver.store_mut().save() {
        warn!("Failed to save contact page cache after batch: {}", e);
    }
    report.elapsed = start.elapsed();
    log::info!("{}", report);
    report
}

/// Parses one input line into a request.
///
/// Returns `None` for blank lines, comments and malformed lines (the latter
/// are logged). The homepage gets an `https://` prefix when it has no scheme.
pub fn parse_dealer_line(line: &str) -> Option<DealerRequest> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 3 || fields.len() > 4 {
        warn!("Skipping malformed dealer line (expected 3 or 4 fields): {line}");
        return None;
    }
    if fields[0].is_empty() {
        warn!("Skipping dealer line without an id: {line}");
        return None;
    }

    let homepage = normalize_url(fields[2])?;
    let preferred = match fields.get(3).filter(|f| !f.is_empty()) {
        Some(url) => Some(normalize_url(url)?),
        None => None,
    };

    Some(DealerRequest {
        dealer_id: fields[0].to_string(),
        dealer_name: fields[1].to_string(),
        homepage_url: homepage,
        preferred_contact_url: preferred,
    })
}

/// Adds an `https://` prefix when missing and checks the result is an
/// http(s) URL of sane length.
///
/// Logs a warning and returns `None` otherwise.
pub fn normalize_url(url: &str) -> Option<String> {
    let url = url.trim();
    let normalized = if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else if url.contains("://") {
        warn!("Skipping unsupported scheme for URL: {url}");
        return None;
    } else {
        format!("https://{url}")
    };

    if normalized.len() > MAX_URL_LENGTH {
        warn!(
            "Skipping URL exceeding maximum length ({} > {})",
            normalized.len(),
            MAX_URL_LENGTH
        );
        return None;
    }

    match url::Url::parse(&normalized) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some() => {
            Some(normalized)
        }
        _ => {
            warn!("Skipping invalid URL: {url}");
            None
        }
    }
}
