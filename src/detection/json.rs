//! Adapter for detectors that report loosely typed JSON.
//!
//! Detection scripts evaluated inside a real browser hand back plain objects.
//! [`JsonFormDetector`] converts them into [`FormSummary`] and [`ContactLink`]
//! on receipt, so nothing past this point sees untyped values.

use async_trait::async_trait;
use serde_json::Value;

use super::{ContactLink, FormDetector, FormSummary};
use crate::browser::Page;
use crate::error_handling::DetectionError;

/// A detector whose output has not been validated yet.
#[async_trait]
pub trait RawFormDetector: Send + Sync {
    /// One JSON object per candidate form on `page`.
    async fn raw_forms(
        &self,
        page: &dyn Page,
        page_label: &str,
        page_url: &str,
    ) -> Result<Vec<Value>, DetectionError>;

    /// One JSON object (`{"href": ..., "text": ...}`) per contact-like anchor.
    async fn raw_contact_links(&self, page: &dyn Page) -> Result<Vec<Value>, DetectionError>;
}

/// Wraps a [`RawFormDetector`], dropping entries that do not fit the contract.
pub struct JsonFormDetector<R> {
    raw: R,
}

impl<R: RawFormDetector> JsonFormDetector<R> {
    /// Wraps `raw`.
    pub fn new(raw: R) -> Self {
        Self { raw }
    }
}

#[async_trait]
impl<R: RawFormDetector> FormDetector for JsonFormDetector<R> {
    async fn detect_forms_on_page(
        &self,
        page: &dyn Page,
        page_label: &str,
        page_url: &str,
    ) -> Result<Vec<FormSummary>, DetectionError> {
        let values = self.raw.raw_forms(page, page_label, page_url).await?;
        Ok(FormSummary::from_json_list(&values))
    }

    async fn find_contact_links(&self, page: &dyn Page) -> Result<Vec<ContactLink>, DetectionError> {
        let values = self.raw.raw_contact_links(page).await?;
        Ok(values
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<ContactLink>(value) {
                Ok(link) => Some(link),
                Err(e) => {
                    log::debug!("Dropping contact link entry: {}", e);
                    None
                }
            })
            .collect())
    }
}
