//! Contact-page cache.
//!
//! This module provides:
//! - `ContactPageRecord`, the persisted shape of one dealer's best contact page
//! - `ContactPageStore`, the JSON-backed map the resolver reads and writes

mod record;
mod store;

pub use record::{ContactPageRecord, HistoryEntry, RecordStatus};
pub use store::ContactPageStore;
