//! Cache and cooldown files across process restarts.

mod helpers;

use chrono::Duration;
use dealer_contact::{
    ContactPageResolver, ContactPageStore, DealerRequest, HtmlFormDetector, RecordStatus,
    ResolverSettings, SubmissionHistory,
};
use helpers::{homepage_linking_to, FakeWeb, CONTACT_FORM, NEWSLETTER_ONLY};
use tempfile::TempDir;

const HOMEPAGE: &str = "https://acmemotors.example/";
const CONTACT: &str = "https://acmemotors.example/contact-us/";

async fn resolve_once(path: &std::path::Path, web: &FakeWeb) -> bool {
    let mut resolver = ContactPageResolver::new(
        ContactPageStore::load(path),
        Box::new(HtmlFormDetector::new()),
        ResolverSettings::default(),
    );
    let request = DealerRequest::new("acme-motors", "Acme Motors", HOMEPAGE);
    resolver.resolve(web, &request).await.is_ok()
}

#[tokio::test]
async fn test_resolution_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data").join("contact_page_cache.json");
    let web = FakeWeb::new();
    web.serve(HOMEPAGE, homepage_linking_to("/contact-us/"))
        .serve(CONTACT, CONTACT_FORM);

    assert!(resolve_once(&path, &web).await);
    assert!(path.exists(), "new records are saved immediately");

    let store = ContactPageStore::load(&path);
    let record = store.get("acme-motors").unwrap();
    assert_eq!(record.contact_url, CONTACT);
    assert_eq!(record.status, RecordStatus::Active);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let keys: Vec<&String> = json[0].as_object().unwrap().keys().collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted, "object keys are written sorted");
}

#[tokio::test]
async fn test_failure_count_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("contact_page_cache.json");
    let web = FakeWeb::new();
    web.serve(HOMEPAGE, homepage_linking_to("/contact-us/"))
        .serve(CONTACT, CONTACT_FORM);
    assert!(resolve_once(&path, &web).await);

    // The contact page disappears; every run is a fresh process.
    web.take_down(CONTACT);
    web.serve(HOMEPAGE, NEWSLETTER_ONLY);
    for expected in 1..=2 {
        assert!(!resolve_once(&path, &web).await);
        let store = ContactPageStore::load(&path);
        let record = store.get("acme-motors").unwrap();
        assert_eq!(record.status, RecordStatus::Active);
        assert_eq!(record.validation_failures, expected);
    }

    assert!(!resolve_once(&path, &web).await);
    let store = ContactPageStore::load(&path);
    let record = store.get("acme-motors").unwrap();
    assert_eq!(record.status, RecordStatus::Stale);
    assert!(record.notes.is_some());
    assert!(record.history.iter().any(|e| e.source == "inactive"));
}

#[test]
fn test_submission_cooldown_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("submission_history.json");

    let mut history = SubmissionHistory::load(&path, Duration::hours(12));
    history.record("acme-motors", "submitted", None).unwrap();

    let reloaded = SubmissionHistory::load(&path, Duration::hours(12));
    assert!(reloaded.should_skip("acme-motors", None));

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("\"last_status\": \"submitted\""));
}
