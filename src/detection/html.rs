//! Scraper-based form detector.
//!
//! Scores each `<form>` in the loaded document by the lead fields it carries.
//! Works on whatever HTML the page reports, so it pairs with the HTTP-backed
//! browser as well as with a real browser's serialized DOM.

use std::sync::LazyLock;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

use super::{is_contact_like, ContactLink, FormDetector, FormSummary, MAX_RELEVANCE_SCORE};
use crate::browser::Page;
use crate::error_handling::DetectionError;
use crate::utils::parse_selector_with_fallback;

static FORM_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("form", "form detection"));
static FIELD_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("input, select, textarea", "form detection"));
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("a[href]", "contact link discovery"));

/// Input types that are not user-fillable lead fields.
const NON_FIELD_INPUT_TYPES: &[&str] = &["hidden", "submit", "button", "image", "reset"];

// Score contributions
const EMAIL_WEIGHT: f64 = 30.0;
const NAME_WEIGHT: f64 = 20.0;
const PHONE_WEIGHT: f64 = 15.0;
const MESSAGE_WEIGHT: f64 = 20.0;
const FIELD_COUNT_WEIGHT: f64 = 10.0;
const CONTACT_PAGE_WEIGHT: f64 = 5.0;
/// Single-field forms (newsletter boxes) never score above this.
const SINGLE_FIELD_CAP: f64 = 15.0;

/// Per-form field tallies.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct FieldCounts {
    total: u32,
    email: u32,
    name: u32,
    phone: u32,
    textareas: u32,
    password: bool,
    search: bool,
}

/// Detects lead forms in HTML with `scraper`.
#[derive(Debug, Default, Clone)]
pub struct HtmlFormDetector;

impl HtmlFormDetector {
    /// Creates a detector.
    pub fn new() -> Self {
        Self
    }

    /// Scores every form in `html`.
    pub fn detect_in_html(&self, html: &str, page_label: &str, page_url: &str) -> Vec<FormSummary> {
        let document = Html::parse_document(html);
        // The bonus depends on the URL only so a page scores the same under
        // any label.
        let contact_page = is_contact_like(page_url, "");

        document
            .select(&FORM_SELECTOR)
            .map(|form| {
                let counts = count_fields(form);
                FormSummary {
                    relevance_score: score(&counts, contact_page),
                    total_inputs: counts.total,
                    email_inputs: counts.email,
                    name_inputs: counts.name,
                    phone_inputs: counts.phone,
                    textareas: counts.textareas,
                    page_url: page_url.to_string(),
                    page_name: page_label.to_string(),
                    form_type: classify_form(form).to_string(),
                }
            })
            .collect()
    }

    /// Contact-like anchors in `html`, in document order.
    pub fn links_in_html(&self, html: &str) -> Vec<ContactLink> {
        let document = Html::parse_document(html);
        document
            .select(&ANCHOR_SELECTOR)
            .filter_map(|anchor| {
                let href = anchor.value().attr("href")?.trim();
                let text = anchor.text().collect::<Vec<_>>().join(" ");
                let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
                is_contact_like(href, &text).then(|| ContactLink::new(href, text))
            })
            .collect()
    }
}

#[async_trait]
impl FormDetector for HtmlFormDetector {
    async fn detect_forms_on_page(
        &self,
        page: &dyn Page,
        page_label: &str,
        page_url: &str,
    ) -> Result<Vec<FormSummary>, DetectionError> {
        let html = page.content().await?;
        let url = page.current_url().unwrap_or_else(|| page_url.to_string());
        Ok(self.detect_in_html(&html, page_label, &url))
    }

    async fn find_contact_links(&self, page: &dyn Page) -> Result<Vec<ContactLink>, DetectionError> {
        let html = page.content().await?;
        Ok(self.links_in_html(&html))
    }
}

fn count_fields(form: ElementRef<'_>) -> FieldCounts {
    let mut counts = FieldCounts::default();
    if attr_haystack(form).contains("search") || form.value().attr("role") == Some("search") {
        counts.search = true;
    }

    for field in form.select(&FIELD_SELECTOR) {
        let tag = field.value().name();
        let input_type = field
            .value()
            .attr("type")
            .unwrap_or("text")
            .to_lowercase();

        if tag == "input" && NON_FIELD_INPUT_TYPES.contains(&input_type.as_str()) {
            continue;
        }
        counts.total += 1;

        if tag == "textarea" {
            counts.textareas += 1;
            continue;
        }

        let haystack = attr_haystack(field);
        match input_type.as_str() {
            "password" => counts.password = true,
            "search" => counts.search = true,
            _ => {}
        }
        if input_type == "email" || haystack.contains("email") || haystack.contains("e-mail") {
            counts.email += 1;
        } else if input_type == "tel" || haystack.contains("phone") || haystack.contains("tel") {
            counts.phone += 1;
        } else if haystack.contains("name")
            && !["user", "company", "business", "dealer"]
                .iter()
                .any(|skip| haystack.contains(skip))
        {
            counts.name += 1;
        }
    }
    counts
}

/// Lowercased id/name/class/placeholder/autocomplete/aria-label/action text.
fn attr_haystack(element: ElementRef<'_>) -> String {
    ["id", "name", "class", "placeholder", "autocomplete", "aria-label", "action"]
        .iter()
        .filter_map(|attr| element.value().attr(attr))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn score(counts: &FieldCounts, contact_page: bool) -> f64 {
    if counts.password {
        return 0.0;
    }

    let mut score = 0.0;
    if counts.email > 0 {
        score += EMAIL_WEIGHT;
    }
    if counts.name > 0 {
        score += NAME_WEIGHT;
    }
    if counts.phone > 0 {
        score += PHONE_WEIGHT;
    }
    if counts.textareas > 0 {
        score += MESSAGE_WEIGHT;
    }
    if counts.total >= 3 {
        score += FIELD_COUNT_WEIGHT;
    }
    if contact_page && score > 0.0 {
        score += CONTACT_PAGE_WEIGHT;
    }
    if counts.total <= 1 {
        score = score.min(SINGLE_FIELD_CAP);
    }
    if counts.search {
        score *= 0.2;
    }
    score.min(MAX_RELEVANCE_SCORE)
}

fn classify_form(form: ElementRef<'_>) -> &'static str {
    let haystack = attr_haystack(form);
    if haystack.contains("gform") {
        "gravity_forms"
    } else if haystack.contains("wpcf7") {
        "contact_form_7"
    } else if haystack.contains("nf-form") || haystack.contains("ninja") {
        "ninja_forms"
    } else if haystack.contains("hs-form") || haystack.contains("hbspt") {
        "hubspot"
    } else {
        "generic"
    }
}
