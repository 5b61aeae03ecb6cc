//! Error type definitions.
//!
//! This module defines all error types used throughout the crate.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for the JSON-backed stores.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("Store I/O error at {path}: {source}")]
    Io {
        /// File being read or written
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Records could not be serialized.
    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A page could not be opened or navigated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// The navigation did not finish inside its timeout.
    #[error("navigation to {url} timed out after {seconds}s")]
    Timeout {
        /// Target URL
        url: String,
        /// Timeout that elapsed
        seconds: u64,
    },

    /// The target answered with a non-success HTTP status.
    #[error("{url} answered with HTTP {status}")]
    Status {
        /// Target URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The URL could not be parsed.
    #[error("invalid URL {0}")]
    InvalidUrl(String),

    /// No page has been loaded yet.
    #[error("no page loaded")]
    NoPage,

    /// Any other driver failure (DNS, connection reset, browser crash).
    #[error("navigation failed: {0}")]
    Driver(String),
}

/// The form detector failed on a page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectionError {
    /// Detection did not finish inside its timeout.
    #[error("form detection on {url} timed out after {seconds}s")]
    Timeout {
        /// Page URL
        url: String,
        /// Timeout that elapsed
        seconds: u64,
    },

    /// The page content could not be read.
    #[error("could not read page content: {0}")]
    Page(#[from] NavigationError),

    /// Detector output did not match the form-summary contract.
    #[error("malformed detector output: {0}")]
    Malformed(String),
}

/// Resolution for a dealer found no usable contact form.
///
/// This is the only error `ContactPageResolver::resolve` returns. Batch drivers
/// are expected to treat it as a per-dealer outcome and move on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    /// Every tier was tried and no form cleared the minimum score.
    #[error("no usable contact form found for dealer {dealer_id}")]
    NoUsableForm {
        /// Dealer that was resolved
        dealer_id: String,
    },

    /// The dealer recently had no usable form and is still inside its retry window.
    #[error(
        "dealer {dealer_id} had no usable contact form recently; retry in {remaining_days:.1} days"
    )]
    CoolingDown {
        /// Dealer that was resolved
        dealer_id: String,
        /// Days left before discovery is attempted again
        remaining_days: f64,
    },

    /// The browser context could not provide a page.
    #[error("no browser page available for dealer {dealer_id}: {reason}")]
    BrowserUnavailable {
        /// Dealer that was resolved
        dealer_id: String,
        /// Driver error text
        reason: String,
    },
}

impl LookupError {
    /// Dealer the lookup was for.
    pub fn dealer_id(&self) -> &str {
        match self {
            LookupError::NoUsableForm { dealer_id }
            | LookupError::CoolingDown { dealer_id, .. }
            | LookupError::BrowserUnavailable { dealer_id, .. } => dealer_id,
        }
    }

    /// True when the lookup was refused because of the `no_form` retry window.
    pub fn is_cooling_down(&self) -> bool {
        matches!(self, LookupError::CoolingDown { .. })
    }
}
