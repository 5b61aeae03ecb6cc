//! dealer_contact library: dealership contact-form discovery and caching
//!
//! Given a dealership homepage, finds the page that hosts its sales-contact
//! form, trying the cheapest evidence first (a known URL, then the cached
//! URL, then the homepage, then a bounded crawl of contact-like links) and
//! caching what it finds in a JSON file. A separate store throttles repeat
//! submission attempts per dealer.
//!
//! # Example
//!
//! ```no_run
//! use dealer_contact::browser::{BrowserManager, HttpBrowser};
//! use dealer_contact::initialization::init_client;
//! use dealer_contact::{Config, ContactPageResolver, ContactPageStore, DealerRequest, HtmlFormDetector};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let store = ContactPageStore::load(&config.contact_cache_path);
//! let mut resolver = ContactPageResolver::new(
//!     store,
//!     Box::new(HtmlFormDetector::new()),
//!     config.resolver.clone(),
//! );
//!
//! let browser = HttpBrowser::new(init_client(&config)?);
//! let ctx = browser.open_context().await?;
//! let request = DealerRequest::new("acme-motors", "Acme Motors", "https://acmemotors.example/");
//! match resolver.resolve(ctx.as_ref(), &request).await {
//!     Ok(found) => println!("{} (score {:.1})", found.contact_url, found.contact_score),
//!     Err(e) => println!("{e}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! Resolution is async and needs a Tokio runtime.

#![warn(missing_docs)]

pub mod batch;
pub mod browser;
pub mod cli;
pub mod config;
pub mod contact;
pub mod detection;
mod error_handling;
pub mod initialization;
pub mod resolver;
mod storage;
pub mod submission;
mod utils;

// Re-export public API
pub use batch::{parse_dealer_line, resolve_batch, BatchReport};
pub use config::{Config, ConfigValidationError, LogFormat, LogLevel, ResolverSettings};
pub use contact::{ContactPageRecord, ContactPageStore, HistoryEntry, RecordStatus};
pub use detection::{FormDetector, FormSummary, HtmlFormDetector};
pub use error_handling::{
    DetectionError, InitializationError, LookupError, NavigationError, StoreError,
};
pub use resolver::{
    CandidateOutcome, ContactPageResolution, ContactPageResolver, DealerRequest,
    ResolutionMetadata, ResolutionSource,
};
pub use storage::normalize_key;
pub use submission::{SubmissionHistory, SubmissionRecord};
