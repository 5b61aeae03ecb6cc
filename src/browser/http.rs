//! HTTP-backed browser.
//!
//! Fetches documents with `reqwest` and exposes them through the [`Page`]
//! contract. No JavaScript runs, so forms injected client-side and modal
//! probes are out of reach; server-rendered contact forms (most WordPress form
//! builders) are detected fine.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::{BrowserContext, BrowserManager, Page, WaitUntil};
use crate::config::MAX_RESPONSE_BODY_SIZE;
use crate::error_handling::NavigationError;

/// A browser whose pages are plain HTTP fetches.
#[derive(Clone)]
pub struct HttpBrowser {
    client: Arc<reqwest::Client>,
}

impl HttpBrowser {
    /// Wraps a configured client (see [`init_client`](crate::initialization::init_client)).
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BrowserManager for HttpBrowser {
    async fn open_context(&self) -> Result<Box<dyn BrowserContext>, NavigationError> {
        Ok(Box::new(self.clone()))
    }
}

#[async_trait]
impl BrowserContext for HttpBrowser {
    async fn new_page(&self) -> Result<Box<dyn Page>, NavigationError> {
        Ok(Box::new(HttpPage {
            client: Arc::clone(&self.client),
            current_url: None,
            body: None,
        }))
    }
}

/// A page holding the last fetched document.
pub struct HttpPage {
    client: Arc<reqwest::Client>,
    current_url: Option<String>,
    body: Option<String>,
}

#[async_trait]
impl Page for HttpPage {
    async fn goto(
        &mut self,
        url: &str,
        _wait_until: WaitUntil,
        timeout: Duration,
    ) -> Result<(), NavigationError> {
        // A failed navigation must not leave the previous document readable.
        self.current_url = None;
        self.body = None;

        let parsed =
            url::Url::parse(url).map_err(|_| NavigationError::InvalidUrl(url.to_string()))?;

        let response = tokio::time::timeout(timeout, self.client.get(parsed).send())
            .await
            .map_err(|_| NavigationError::Timeout {
                url: url.to_string(),
                seconds: timeout.as_secs(),
            })?
            .map_err(|e| NavigationError::Driver(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NavigationError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| NavigationError::Driver(e.to_string()))?;

        self.current_url = Some(final_url);
        self.body = Some(truncate_body(body));
        Ok(())
    }

    fn current_url(&self) -> Option<String> {
        self.current_url.clone()
    }

    async fn content(&self) -> Result<String, NavigationError> {
        self.body.clone().ok_or(NavigationError::NoPage)
    }

    async fn click(&mut self, _selector: &str, _timeout: Duration) -> Result<bool, NavigationError> {
        // Static documents have nothing to click.
        Ok(false)
    }
}

fn truncate_body(mut body: String) -> String {
    if body.len() > MAX_RESPONSE_BODY_SIZE {
        let mut cut = MAX_RESPONSE_BODY_SIZE;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        log::debug!(
            "Truncating {} byte document to {} bytes",
            body.len(),
            cut
        );
        body.truncate(cut);
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> HttpPage {
        HttpPage {
            client: Arc::new(reqwest::Client::new()),
            current_url: None,
            body: None,
        }
    }

    #[tokio::test]
    async fn test_content_before_navigation_is_an_error() {
        let page = page();
        assert_eq!(page.content().await, Err(NavigationError::NoPage));
        assert!(page.current_url().is_none());
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected_without_request() {
        let mut page = page();
        let err = page
            .goto("not a url", WaitUntil::Load, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(err, NavigationError::InvalidUrl("not a url".to_string()));
    }

    #[tokio::test]
    async fn test_failed_navigation_drops_previous_document() {
        let mut page = page();
        page.current_url = Some("https://acmemotors.example/contact-us/".to_string());
        page.body = Some("<form></form>".to_string());

        assert!(page
            .goto("not a url", WaitUntil::Load, Duration::from_secs(1))
            .await
            .is_err());

        assert_eq!(page.content().await, Err(NavigationError::NoPage));
        assert!(page.current_url().is_none());
    }

    #[tokio::test]
    async fn test_click_finds_nothing() {
        let mut page = page();
        assert!(!page.click("a", Duration::from_secs(1)).await.unwrap());
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        let body = "é".repeat(MAX_RESPONSE_BODY_SIZE);
        let truncated = truncate_body(body);
        assert!(truncated.len() <= MAX_RESPONSE_BODY_SIZE);
        assert!(truncated.chars().all(|c| c == 'é'));

        assert_eq!(truncate_body("short".to_string()), "short");
    }

    #[tokio::test]
    async fn test_http_browser_hands_out_pages() {
        let browser = HttpBrowser::new(Arc::new(reqwest::Client::new()));
        let context = browser.open_context().await.unwrap();
        let page = context.new_page().await.unwrap();
        assert!(page.current_url().is_none());
    }
}
