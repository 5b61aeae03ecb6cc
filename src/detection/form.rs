//! Typed form summaries at the detector boundary.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error_handling::DetectionError;

/// Upper bound of the detector score scale.
pub const MAX_RELEVANCE_SCORE: f64 = 100.0;

/// One candidate form found on a page, as scored by a [`FormDetector`](super::FormDetector).
///
/// The resolver only relies on `relevance_score` being comparable across calls
/// (higher is better); the counts are informational.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSummary {
    /// Relevance score on a 0-100 scale
    pub relevance_score: f64,
    /// Number of user-fillable inputs on the form
    #[serde(default)]
    pub total_inputs: u32,
    /// Email inputs
    #[serde(default)]
    pub email_inputs: u32,
    /// Name inputs (first, last, or full name)
    #[serde(default)]
    pub name_inputs: u32,
    /// Phone inputs
    #[serde(default)]
    pub phone_inputs: u32,
    /// Textareas (message bodies)
    #[serde(default)]
    pub textareas: u32,
    /// URL of the page the form was found on
    #[serde(default)]
    pub page_url: String,
    /// Label of the page context ("preferred", "homepage", "contact_link_1", ...)
    #[serde(default)]
    pub page_name: String,
    /// Form builder classification ("gravity_forms", "generic", ...)
    #[serde(default)]
    pub form_type: String,
}

impl FormSummary {
    /// Converts loosely-typed detector output into a `FormSummary`.
    ///
    /// Accepts any JSON object carrying a numeric `relevance_score`. Counts may
    /// be integers or floats (floats are truncated, negatives become 0) and
    /// default to 0 when absent; string fields default to empty. The result is
    /// [sanitized](Self::sanitized).
    ///
    /// # Errors
    ///
    /// Returns `DetectionError::Malformed` if the value is not an object or the
    /// score is missing or not a number.
    pub fn from_json(value: &Value) -> Result<Self, DetectionError> {
        let obj = value
            .as_object()
            .ok_or_else(|| DetectionError::Malformed(format!("expected object, got {value}")))?;

        let relevance_score = obj
            .get("relevance_score")
            .and_then(Value::as_f64)
            .ok_or_else(|| {
                DetectionError::Malformed("missing numeric relevance_score".to_string())
            })?;

        Ok(FormSummary {
            relevance_score,
            total_inputs: count_field(obj, "total_inputs"),
            email_inputs: count_field(obj, "email_inputs"),
            name_inputs: count_field(obj, "name_inputs"),
            phone_inputs: count_field(obj, "phone_inputs"),
            textareas: count_field(obj, "textareas"),
            page_url: string_field(obj, "page_url"),
            page_name: string_field(obj, "page_name"),
            form_type: string_field(obj, "form_type"),
        }
        .sanitized())
    }

    /// Converts a list of loosely-typed detector outputs, skipping malformed entries.
    pub fn from_json_list(values: &[Value]) -> Vec<Self> {
        values
            .iter()
            .filter_map(|value| match Self::from_json(value) {
                Ok(form) => Some(form),
                Err(e) => {
                    log::debug!("Dropping detector entry: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Clamps the score into 0-100 (NaN becomes 0).
    pub fn sanitized(mut self) -> Self {
        self.relevance_score = if self.relevance_score.is_nan() {
            0.0
        } else {
            self.relevance_score.clamp(0.0, MAX_RELEVANCE_SCORE)
        };
        self
    }

    /// Whether the form is usable under `min_score` (inclusive).
    pub fn clears(&self, min_score: f64) -> bool {
        self.relevance_score >= min_score
    }
}

/// Returns the highest-scoring form; on ties the earliest one wins.
pub fn best_form(forms: &[FormSummary]) -> Option<&FormSummary> {
    forms.iter().fold(None, |best: Option<&FormSummary>, form| match best {
        Some(current) if current.relevance_score >= form.relevance_score => Some(current),
        _ => Some(form),
    })
}

fn count_field(obj: &Map<String, Value>, key: &str) -> u32 {
    match obj.get(key) {
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_u64() {
                u32::try_from(v).unwrap_or(u32::MAX)
            } else {
                n.as_f64()
                    .filter(|v| v.is_finite() && *v > 0.0)
                    .map(|v| v.min(u32::MAX as f64) as u32)
                    .unwrap_or(0)
            }
        }
        _ => 0,
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
