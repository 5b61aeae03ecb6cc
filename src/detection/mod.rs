//! Form detection contract and the scraper-based detector.
//!
//! The resolver never looks inside a scoring formula. It only needs candidate
//! forms with a 0-100 `relevance_score` that is comparable across pages, plus a
//! way to enumerate contact-like links.

mod form;
pub mod html;
mod json;
mod links;

use async_trait::async_trait;

use crate::browser::Page;
use crate::error_handling::DetectionError;

pub use form::{best_form, FormSummary, MAX_RELEVANCE_SCORE};
pub use html::HtmlFormDetector;
pub use json::{JsonFormDetector, RawFormDetector};
pub use links::{is_contact_like, resolve_contact_links, ContactLink};

/// Finds and scores candidate contact forms on a loaded page.
#[async_trait]
pub trait FormDetector: Send + Sync {
    /// Returns every candidate form on `page`, scored.
    ///
    /// `page_label` names the context ("preferred", "cache", "homepage",
    /// "contact_link_N") and `page_url` the document the page was pointed at.
    async fn detect_forms_on_page(
        &self,
        page: &dyn Page,
        page_label: &str,
        page_url: &str,
    ) -> Result<Vec<FormSummary>, DetectionError>;

    /// Returns anchors on `page` that look like they lead to a contact page.
    async fn find_contact_links(&self, page: &dyn Page) -> Result<Vec<ContactLink>, DetectionError>;
}
