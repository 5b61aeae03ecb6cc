//! Batch resolution over several dealers.

mod helpers;

use chrono::Duration;
use dealer_contact::{
    parse_dealer_line, resolve_batch, ContactPageResolver, ContactPageStore, HtmlFormDetector,
    ResolverSettings, SubmissionHistory,
};
use helpers::{homepage_linking_to, FakeWeb, CONTACT_FORM, NEWSLETTER_ONLY};

const INPUT: &str = "\
# dealer_id,dealer_name,homepage[,contact_url]
acme-motors,Acme Motors,https://acmemotors.example/
bayside-auto,Bayside Auto,https://baysideauto.example/

not a dealer line
coastal-cars,Coastal Cars,https://coastalcars.example/,https://coastalcars.example/quote/
";

fn web() -> FakeWeb {
    let web = FakeWeb::new();
    web.serve(
        "https://acmemotors.example/",
        homepage_linking_to("/contact-us/"),
    )
    .serve("https://acmemotors.example/contact-us/", CONTACT_FORM)
    .serve("https://baysideauto.example/", NEWSLETTER_ONLY)
    .serve("https://coastalcars.example/quote/", CONTACT_FORM);
    web
}

fn resolver() -> ContactPageResolver {
    ContactPageResolver::new(
        ContactPageStore::in_memory(),
        Box::new(HtmlFormDetector::new()),
        ResolverSettings::default(),
    )
}

#[tokio::test]
async fn test_failing_dealer_does_not_stop_the_batch() {
    let requests: Vec<_> = INPUT.lines().filter_map(parse_dealer_line).collect();
    assert_eq!(requests.len(), 3);
    let web = web();
    let mut resolver = resolver();

    let report = resolve_batch(&mut resolver, &web, &requests, None).await;

    let resolved: Vec<&str> = report
        .resolved
        .iter()
        .map(|r| r.dealer_id.as_str())
        .collect();
    assert_eq!(resolved, vec!["acme-motors", "coastal-cars"]);
    assert_eq!(report.unresolved.len(), 1);
    assert_eq!(report.unresolved[0].dealer_id(), "bayside-auto");
    assert_eq!(report.total(), 3);
    assert_eq!(resolver.store().len(), 2);
}

#[tokio::test]
async fn test_dealers_in_submission_cooldown_are_skipped() {
    let requests: Vec<_> = INPUT.lines().filter_map(parse_dealer_line).collect();
    let web = web();
    let mut resolver = resolver();
    let mut history = SubmissionHistory::in_memory(Duration::hours(12));
    history.record("acme-motors", "submitted", None).unwrap();

    let report = resolve_batch(&mut resolver, &web, &requests, Some(&history)).await;

    assert_eq!(report.skipped, vec!["acme-motors"]);
    assert!(web
        .visits()
        .iter()
        .all(|url| !url.contains("acmemotors.example")));
    assert_eq!(report.resolved.len(), 1);
}

#[tokio::test]
async fn test_batch_flushes_deferred_cache_hits() {
    let requests: Vec<_> = INPUT.lines().take(2).filter_map(parse_dealer_line).collect();
    assert_eq!(requests.len(), 1);
    let web = web();
    let mut resolver = resolver();
    resolve_batch(&mut resolver, &web, &requests, None).await;
    let saves = resolver.store().save_count();

    // Second pass is a clean cache hit; only the end-of-batch save runs.
    let report = resolve_batch(&mut resolver, &web, &requests, None).await;

    assert_eq!(report.resolved.len(), 1);
    assert_eq!(resolver.store().save_count(), saves + 1);
}
