//! Host-specific navigation bypasses.
//!
//! Some dealer platforms answer a cold deep-link with a challenge page but let
//! through a visitor who arrived at the site root first. A bypass replaces the
//! plain `goto` for hosts matching its signatures and must leave the page on
//! the requested document so detection works afterwards.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use super::{Page, WaitUntil};
use crate::config::BYPASS_SETTLE_DELAY;
use crate::error_handling::NavigationError;

/// An alternate navigation sequence for hostile hosts.
#[async_trait]
pub trait NavigationBypass: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Whether this bypass handles `url`.
    fn matches(&self, url: &Url) -> bool;

    /// Navigates `page` to `url`.
    async fn navigate(
        &self,
        page: &mut dyn Page,
        url: &str,
        timeout: Duration,
    ) -> Result<(), NavigationError>;
}

/// Whether `host` carries one of `signatures` (case-insensitive substring).
pub fn host_matches(host: &str, signatures: &[String]) -> bool {
    let host = host.to_lowercase();
    signatures
        .iter()
        .map(|s| s.trim().to_lowercase())
        .any(|s| !s.is_empty() && host.contains(&s))
}

/// Visits the site origin, waits for challenge scripts to settle, then
/// navigates to the target.
#[derive(Debug, Clone)]
pub struct WarmupBypass {
    host_signatures: Vec<String>,
    settle: Duration,
}

impl WarmupBypass {
    /// Creates a bypass for hosts containing any of `host_signatures`.
    pub fn new(host_signatures: Vec<String>) -> Self {
        Self {
            host_signatures,
            settle: BYPASS_SETTLE_DELAY,
        }
    }

    /// Overrides the settle delay between the warm-up visit and the target.
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }
}

#[async_trait]
impl NavigationBypass for WarmupBypass {
    fn name(&self) -> &str {
        "warmup"
    }

    fn matches(&self, url: &Url) -> bool {
        url.host_str()
            .map(|host| host_matches(host, &self.host_signatures))
            .unwrap_or(false)
    }

    async fn navigate(
        &self,
        page: &mut dyn Page,
        url: &str,
        timeout: Duration,
    ) -> Result<(), NavigationError> {
        let target = Url::parse(url).map_err(|_| NavigationError::InvalidUrl(url.to_string()))?;
        let origin = format!("{}/", target.origin().ascii_serialization());

        if origin != target.as_str() {
            page.goto(&origin, WaitUntil::Load, timeout).await?;
            if !self.settle.is_zero() {
                tokio::time::sleep(self.settle).await;
            }
        }
        page.goto(url, WaitUntil::NetworkIdle, timeout).await
    }
}

/// The set of bypasses consulted before every resolver navigation.
#[derive(Default)]
pub struct BypassRegistry {
    bypasses: Vec<Box<dyn NavigationBypass>>,
}

impl BypassRegistry {
    /// Creates an empty registry (every navigation is a plain `goto`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a bypass; earlier registrations win when several match.
    pub fn register(&mut self, bypass: Box<dyn NavigationBypass>) {
        self.bypasses.push(bypass);
    }

    /// Number of registered bypasses.
    pub fn len(&self) -> usize {
        self.bypasses.len()
    }

    /// True when no bypass is registered.
    pub fn is_empty(&self) -> bool {
        self.bypasses.is_empty()
    }

    /// The first bypass matching `url`, if any.
    pub fn find(&self, url: &str) -> Option<&dyn NavigationBypass> {
        let parsed = Url::parse(url).ok()?;
        self.bypasses
            .iter()
            .find(|b| b.matches(&parsed))
            .map(|b| b.as_ref())
    }

    /// Navigates through a matching bypass, or with a plain `goto` otherwise.
    pub async fn navigate(
        &self,
        page: &mut dyn Page,
        url: &str,
        timeout: Duration,
    ) -> Result<(), NavigationError> {
        match self.find(url) {
            Some(bypass) => {
                log::debug!("Using {} bypass for {}", bypass.name(), url);
                bypass.navigate(page, url, timeout).await
            }
            None => page.goto(url, WaitUntil::DomContentLoaded, timeout).await,
        }
    }
}
