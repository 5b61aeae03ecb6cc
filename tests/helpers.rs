// Shared test helpers: an in-memory "web" of HTML pages behind the browser traits.
//
// Pages are served to the real `HtmlFormDetector`, so tests exercise the whole
// resolution pipeline without network access.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dealer_contact::browser::{BrowserContext, BrowserManager, Page, WaitUntil};
use dealer_contact::NavigationError;

/// A full sales-contact form (scores well above the default threshold).
#[allow(dead_code)] // Used by other test files
pub const CONTACT_FORM: &str = r#"
<html><body>
  <h1>Contact Us</h1>
  <form class="wpcf7-form" action="/contact-us/#wpcf7">
    <input type="text" name="your-name" placeholder="Your Name">
    <input type="email" name="your-email">
    <input type="tel" name="your-phone">
    <textarea name="your-message"></textarea>
    <input type="submit" value="Send">
  </form>
</body></html>"#;

/// A newsletter box (scores below the default threshold).
#[allow(dead_code)] // Used by other test files
pub const NEWSLETTER_ONLY: &str = r#"
<html><body>
  <form class="newsletter"><input type="email" name="email"><button>Subscribe</button></form>
</body></html>"#;

/// A homepage with no forms linking to `href` with anchor text "Contact Us".
#[allow(dead_code)] // Used by other test files
pub fn homepage_linking_to(href: &str) -> String {
    format!(
        r#"<html><body>
             <nav><a href="/inventory/">Inventory</a><a href="{href}">Contact Us</a></nav>
             <p>Family owned since 1962.</p>
           </body></html>"#
    )
}

/// URL -> HTML map plus a log of every navigation.
#[derive(Clone, Default)]
pub struct FakeWeb {
    pages: Arc<Mutex<HashMap<String, String>>>,
    visits: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)] // Used by other test files
impl FakeWeb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `html` at `url`; unknown URLs answer 404.
    pub fn serve(&self, url: &str, html: impl Into<String>) -> &Self {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), html.into());
        self
    }

    /// Stops serving `url`.
    pub fn take_down(&self, url: &str) {
        self.pages.lock().unwrap().remove(url);
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }

    pub fn clear_visits(&self) {
        self.visits.lock().unwrap().clear();
    }
}

#[async_trait]
impl BrowserManager for FakeWeb {
    async fn open_context(&self) -> Result<Box<dyn BrowserContext>, NavigationError> {
        Ok(Box::new(self.clone()))
    }
}

#[async_trait]
impl BrowserContext for FakeWeb {
    async fn new_page(&self) -> Result<Box<dyn Page>, NavigationError> {
        Ok(Box::new(FakePage {
            web: self.clone(),
            current: None,
        }))
    }
}

pub struct FakePage {
    web: FakeWeb,
    current: Option<(String, String)>,
}

#[async_trait]
impl Page for FakePage {
    async fn goto(&mut self, url: &str, _: WaitUntil, _: Duration) -> Result<(), NavigationError> {
        self.web.visits.lock().unwrap().push(url.to_string());
        let html = self.web.pages.lock().unwrap().get(url).cloned();
        match html {
            Some(html) => {
                self.current = Some((url.to_string(), html));
                Ok(())
            }
            None => Err(NavigationError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }

    fn current_url(&self) -> Option<String> {
        self.current.as_ref().map(|(url, _)| url.clone())
    }

    async fn content(&self) -> Result<String, NavigationError> {
        self.current
            .as_ref()
            .map(|(_, html)| html.clone())
            .ok_or(NavigationError::NoPage)
    }

    async fn click(&mut self, _: &str, _: Duration) -> Result<bool, NavigationError> {
        Ok(false)
    }
}
