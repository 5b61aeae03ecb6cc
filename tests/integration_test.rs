//! Integration tests for the HTTP-backed browser.
//!
//! These run the full pipeline (reqwest client, `HttpBrowser`,
//! `HtmlFormDetector`, resolver, JSON store) against a local `httptest`
//! server, so no real network access is needed.

#[cfg(test)]
mod tests {
    use dealer_contact::browser::{BrowserContext, BrowserManager, HttpBrowser, Page, WaitUntil};
    use dealer_contact::initialization::init_client;
    use dealer_contact::{
        Config, ContactPageResolver, ContactPageStore, DealerRequest, HtmlFormDetector,
        NavigationError, ResolutionSource,
    };
    use httptest::{matchers::*, responders::*, Expectation, Server};
    use std::time::Duration;
    use tempfile::TempDir;

    const CONTACT_PAGE: &str = r#"<html><body>
        <form id="gform_1" class="gform_wrapper">
          <input type="text" name="input_1" placeholder="Full Name">
          <input type="email" name="input_2">
          <input type="tel" name="input_3">
          <textarea name="input_4"></textarea>
        </form></body></html>"#;

    fn browser() -> HttpBrowser {
        HttpBrowser::new(init_client(&Config::default()).expect("client builds"))
    }

    #[tokio::test]
    async fn test_page_follows_redirects() {
        let server = Server::run();
        let final_url = format!("http://{}/contact-us/", server.addr());
        server.expect(
            Expectation::matching(request::method_path("GET", "/contact"))
                .respond_with(status_code(301).append_header("Location", final_url.as_str())),
        );
        server.expect(
            Expectation::matching(request::method_path("GET", "/contact-us/"))
                .respond_with(status_code(200).body(CONTACT_PAGE)),
        );

        let ctx = browser().open_context().await.unwrap();
        let mut page = ctx.new_page().await.unwrap();
        page.goto(
            &format!("http://{}/contact", server.addr()),
            WaitUntil::DomContentLoaded,
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        assert_eq!(page.current_url().as_deref(), Some(final_url.as_str()));
        assert!(page.content().await.unwrap().contains("gform_1"));
    }

    #[tokio::test]
    async fn test_error_status_fails_navigation() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/gone"))
                .respond_with(status_code(404).body("Not Found")),
        );

        server.expect(
            Expectation::matching(request::method_path("GET", "/contact-us/"))
                .respond_with(status_code(200).body(CONTACT_PAGE)),
        );

        let mut page = browser().new_page().await.unwrap();
        page.goto(
            &format!("http://{}/contact-us/", server.addr()),
            WaitUntil::DomContentLoaded,
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        let url = format!("http://{}/gone", server.addr());
        let err = page
            .goto(&url, WaitUntil::DomContentLoaded, Duration::from_secs(5))
            .await
            .unwrap_err();

        assert_eq!(err, NavigationError::Status { url, status: 404 });
        assert_eq!(page.content().await, Err(NavigationError::NoPage));
        assert!(page.current_url().is_none());
    }

    #[tokio::test]
    async fn test_resolve_over_http_and_persist() {
        let server = Server::run();
        let homepage = format!("http://{}/", server.addr());
        server.expect(
            Expectation::matching(request::method_path("GET", "/"))
                .times(1..)
                .respond_with(status_code(200).body(
                    r#"<html><body><a href="/contact-us/">Contact Us</a></body></html>"#,
                )),
        );
        server.expect(
            Expectation::matching(request::method_path("GET", "/contact-us/"))
                .times(1..)
                .respond_with(status_code(200).body(CONTACT_PAGE)),
        );

        let dir = TempDir::new().unwrap();
        let cache_path = dir.path().join("contact_page_cache.json");
        let mut resolver = ContactPageResolver::new(
            ContactPageStore::load(&cache_path),
            Box::new(HtmlFormDetector::new()),
            Config::default().resolver,
        );
        let ctx = browser().open_context().await.unwrap();
        let request = DealerRequest::new("acme-motors", "Acme Motors", homepage.as_str());

        let first = resolver.resolve(ctx.as_ref(), &request).await.unwrap();
        assert_eq!(first.source, ResolutionSource::Discovery);
        assert_eq!(first.contact_url, format!("{homepage}contact-us/"));
        assert_eq!(first.form_type, "gravity_forms");

        let second = resolver.resolve(ctx.as_ref(), &request).await.unwrap();
        assert_eq!(second.source, ResolutionSource::Cache);

        let reloaded = ContactPageStore::load(&cache_path);
        assert_eq!(
            reloaded.get("acme-motors").unwrap().contact_url,
            first.contact_url
        );
    }

    #[tokio::test]
    async fn test_relative_links_follow_homepage_redirect() {
        let server = Server::run();
        let homepage = format!("http://{}/", server.addr());
        let localized = format!("http://{}/en/", server.addr());
        server.expect(
            Expectation::matching(request::method_path("GET", "/"))
                .respond_with(status_code(302).append_header("Location", localized.as_str())),
        );
        server.expect(
            Expectation::matching(request::method_path("GET", "/en/")).respond_with(
                status_code(200)
                    .body(r#"<html><body><a href="contact-us/">Contact Us</a></body></html>"#),
            ),
        );
        server.expect(
            Expectation::matching(request::method_path("GET", "/en/contact-us/"))
                .respond_with(status_code(200).body(CONTACT_PAGE)),
        );

        let mut resolver = ContactPageResolver::new(
            ContactPageStore::in_memory(),
            Box::new(HtmlFormDetector::new()),
            Config::default().resolver,
        );
        let ctx = browser().open_context().await.unwrap();
        let request = DealerRequest::new("acme-motors", "Acme Motors", homepage.as_str());

        let resolution = resolver.resolve(ctx.as_ref(), &request).await.unwrap();

        assert_eq!(resolution.source, ResolutionSource::Discovery);
        assert_eq!(resolution.contact_url, format!("{localized}contact-us/"));
    }
}
