//! Browser collaborator contracts.
//!
//! The resolver treats the browser as an opaque capability: open a page, point
//! it at a URL, read it back. Stealth setup and anti-bot evasion live behind
//! these traits. This module also ships:
//! - an HTTP-backed implementation for sites that render their forms server-side
//! - a warm-up navigation bypass for hosts that challenge cold visits

pub mod bypass;
pub mod http;

use std::time::Duration;

use async_trait::async_trait;

use crate::error_handling::NavigationError;

pub use bypass::{BypassRegistry, NavigationBypass, WarmupBypass};
pub use http::HttpBrowser;

/// Load state a navigation waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitUntil {
    /// DOMContentLoaded fired
    #[default]
    DomContentLoaded,
    /// The load event fired
    Load,
    /// No network activity for a short while
    NetworkIdle,
}

/// A single browser tab.
#[async_trait]
pub trait Page: Send + Sync {
    /// Navigates to `url`, waiting for `wait_until` at most `timeout`.
    async fn goto(
        &mut self,
        url: &str,
        wait_until: WaitUntil,
        timeout: Duration,
    ) -> Result<(), NavigationError>;

    /// URL of the currently loaded document, after redirects.
    fn current_url(&self) -> Option<String>;

    /// Serialized HTML of the currently loaded document.
    async fn content(&self) -> Result<String, NavigationError>;

    /// Clicks the first element matching `selector`.
    ///
    /// Returns `Ok(false)` when nothing matches.
    async fn click(&mut self, selector: &str, timeout: Duration) -> Result<bool, NavigationError>;
}

/// An isolated browsing context (cookies, storage) that hands out pages.
#[async_trait]
pub trait BrowserContext: Send + Sync {
    /// Opens a new page in this context.
    async fn new_page(&self) -> Result<Box<dyn Page>, NavigationError>;
}

/// Launches browsing contexts.
#[async_trait]
pub trait BrowserManager: Send + Sync {
    /// Opens a fresh context.
    async fn open_context(&self) -> Result<Box<dyn BrowserContext>, NavigationError>;
}
