//! Submission cooldown gate.
//!
//! Kept apart from the contact-page cache: a contact page can stay valid for
//! months while attempts against it are still throttled, and the other way
//! round.

mod history;

pub use history::{SubmissionHistory, SubmissionRecord};
