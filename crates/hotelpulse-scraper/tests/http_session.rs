//! Integration tests for the HTTP-backed browser session.
//!
//! A `wiremock` server stands in for the listing service so the full
//! navigate, locate, validate path runs without real network traffic.

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hotelpulse_core::HotelTarget;
use hotelpulse_scraper::{
    BrowserSession, ExtractionError, FailureKind, HttpSessionFactory, Outcome, PageLocator,
    RecordValidator, RetrievalWorker, SessionError, SessionFactory, SessionPool,
};

const ARIA_PANEL: &str = r#"<html><body>
  <div class="F7nice">
    <span aria-label="4.6 stars"><span aria-hidden="true">4.6</span></span>
    <span aria-label="2,345 reviews">(2,345)</span>
  </div>
</body></html>"#;

const MICRODATA_PANEL: &str = r#"<html><head>
  <meta itemprop="ratingValue" content="4,2">
  <meta itemprop="reviewCount" content="1.2K">
</head><body><p>Listing</p></body></html>"#;

fn factory(server: &MockServer, max_retries: u32) -> HttpSessionFactory {
    HttpSessionFactory::new(
        &format!("{}/maps/search/", server.uri()),
        5,
        "hotelpulse-test/0.1",
        max_retries,
        1,
    )
    .expect("failed to build test session factory")
}

fn locator() -> PageLocator {
    PageLocator::with_default_strategies(Duration::from_secs(2))
}

#[tokio::test]
async fn locates_panel_through_aria_labels() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/maps/search/Hotel+X+hotel+reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARIA_PANEL))
        .mount(&server)
        .await;

    let mut session = factory(&server, 0).session();
    let raw = locator()
        .locate(&HotelTarget::new("Hotel X"), &mut session)
        .await
        .expect("panel should be located");

    assert_eq!(raw.strategy, "aria_label");
    assert_eq!(raw.rating_text, "4.6 stars");
    assert_eq!(raw.count_text, "2,345 reviews");
}

#[tokio::test]
async fn falls_back_to_microdata_when_panel_is_missing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/maps/search/Hotel+Y+hotel+reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MICRODATA_PANEL))
        .mount(&server)
        .await;

    let mut session = factory(&server, 0).session();
    let raw = locator()
        .locate(&HotelTarget::new("Hotel Y"), &mut session)
        .await
        .expect("microdata should be located");

    assert_eq!(raw.strategy, "microdata");
    let fields = RecordValidator::default().validate(&raw).unwrap();
    assert!((fields.rating - 4.2).abs() < f64::EPSILON);
    assert_eq!(fields.review_count, 1200);
}

#[tokio::test]
async fn page_without_panel_exhausts_every_strategy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&server)
        .await;

    let mut session = factory(&server, 0).session();
    let err = locator()
        .locate(&HotelTarget::new("Hotel Z"), &mut session)
        .await
        .unwrap_err();

    let ExtractionError::Exhausted { tried, .. } = err else {
        panic!("expected Exhausted, got {err:?}");
    };
    assert_eq!(tried.len(), 3);
    assert!(session.page_source().is_some());
}

#[tokio::test]
async fn transient_server_errors_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARIA_PANEL))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = factory(&server, 2).session();
    session
        .navigate("Hotel X hotel reviews")
        .await
        .expect("second attempt should succeed");
    assert!(session.find("div.F7nice").await.unwrap().is_some());
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = factory(&server, 3).session();
    let err = session.navigate("Hotel X hotel reviews").await.unwrap_err();
    assert!(matches!(err, SessionError::UnexpectedStatus { status: 404, .. }));
}

#[tokio::test]
async fn reset_invalidates_found_elements() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARIA_PANEL))
        .mount(&server)
        .await;

    let mut session = factory(&server, 0).session();
    session.navigate("Hotel X hotel reviews").await.unwrap();
    let handle = session.find("div.F7nice").await.unwrap().unwrap();
    session.reset().await.unwrap();

    assert!(matches!(
        session.read_text(&handle).await,
        Err(SessionError::StaleElement)
    ));
    assert!(session.page_source().is_none());
}

#[tokio::test]
async fn worker_over_http_produces_validated_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/maps/search/The+Savoy+Strand+London+hotel+reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARIA_PANEL))
        .mount(&server)
        .await;

    let pool = Arc::new(SessionPool::new(
        Arc::new(factory(&server, 0)) as Arc<dyn SessionFactory>,
        1,
    ));
    let worker = RetrievalWorker::new(
        Arc::new(locator()),
        Arc::new(RecordValidator::default()),
        pool,
    );
    let target = HotelTarget::new("Savoy London").with_query("The Savoy Strand London hotel reviews");

    match worker.run(target).await {
        Outcome::Ok(record) => {
            assert_eq!(record.hotel, "savoy-london");
            assert!((record.rating - 4.6).abs() < f64::EPSILON);
            assert_eq!(record.review_count, 2345);
        }
        Outcome::Failed(failure) => panic!("unexpected failure: {failure:?}"),
    }
}

#[tokio::test]
async fn unreachable_listing_is_a_session_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let pool = Arc::new(SessionPool::new(
        Arc::new(factory(&server, 1)) as Arc<dyn SessionFactory>,
        1,
    ));
    let worker = RetrievalWorker::new(
        Arc::new(locator()),
        Arc::new(RecordValidator::default()),
        pool,
    );

    let Outcome::Failed(failure) = worker.run(HotelTarget::new("Hotel X")).await else {
        panic!("expected failure");
    };
    assert_eq!(failure.kind, FailureKind::SessionFailure);
}
