use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header::CONTENT_TYPE};
use http_body_util::BodyExt;
use tower::ServiceExt;

use koborin::application::clock::{Clock, FixedClock};
use koborin::application::error::ErrorReport;
use koborin::application::llms::LlmsService;
use koborin::application::navigation::NavigationService;
use koborin::application::repos::{ContentRepo, RepoError};
use koborin::application::site::SiteProfile;
use koborin::application::syndication::SyndicationService;
use koborin::domain::content::Document;
use koborin::infra::content::SnapshotRepo;
use koborin::infra::http::{HttpState, build_router};
use time::macros::datetime;

fn router_with(content: Arc<dyn ContentRepo>) -> Router {
    let site = Arc::new(SiteProfile::default());
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(datetime!(2026-03-01 12:00 UTC)));
    build_router(HttpState {
        syndication: Arc::new(SyndicationService::new(
            Arc::clone(&content),
            Arc::clone(&site),
            Arc::clone(&clock),
        )),
        llms: Arc::new(LlmsService::new(Arc::clone(&content), site, clock)),
        navigation: Arc::new(NavigationService::new(content)),
    })
}

fn router() -> Router {
    router_with(Arc::new(SnapshotRepo::new(vec![
        Document::new("tech/a.mdx", "A", "alpha").with_published_at(datetime!(2024-01-01 0:00 UTC)),
        Document::new("ja/life/x.mdx", "X", "ekkusu"),
        Document::new("about-me/overview.mdx", "Overview", "me"),
    ])))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");

    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    (status, content_type, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn rss_routes_serve_xml_per_language() {
    let app = router();

    let (status, content_type, body) = get(&app, "/rss.xml").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/xml"));
    assert!(body.contains("<title>A</title>"));
    assert!(!body.contains("<title>X</title>"));
    assert!(!body.contains("<title>Overview</title>"));

    let (status, _, body) = get(&app, "/ja/rss.xml").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<title>X</title>"));
    assert!(body.contains("Personal site + technical garden (日本語)"));
}

#[tokio::test]
async fn every_llms_feed_is_routed() {
    let app = router();

    for stem in ["tech", "life", "about-me", "full"] {
        for prefix in ["llms-", "llms-ja-"] {
            let uri = format!("/{prefix}{stem}.txt");
            let (status, content_type, body) = get(&app, &uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(
                content_type.as_deref(),
                Some("text/plain; charset=utf-8"),
                "{uri}"
            );
            assert!(body.starts_with("# koborin.ai - "), "{uri}");
        }
    }

    let (_, _, body) = get(&app, "/llms-tech.txt").await;
    assert!(body.contains("## A\nURL: https://koborin.ai/tech/a/\n\nalpha"));
    let (_, _, body) = get(&app, "/llms-ja-life.txt").await;
    assert!(body.starts_with("# koborin.ai - JA / life\n"));
    assert!(body.ends_with("ekkusu"));
}

#[tokio::test]
async fn llms_index_lists_feeds() {
    let (status, content_type, body) = get(&router(), "/llms.txt").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/plain; charset=utf-8"));
    assert!(body.contains("- https://koborin.ai/llms-full.txt\n"));
    assert!(body.contains("- https://koborin.ai/llms-ja-about-me.txt\n"));
    assert!(body.contains("> Last updated: 2026-03-01\n"));
}

#[tokio::test]
async fn sidebar_is_served_as_json() {
    let (status, content_type, body) = get(&router(), "/ja/sidebar.json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let json: serde_json::Value = serde_json::from_str(&body).expect("valid json");
    let labels: Vec<&str> = json["groups"]
        .as_array()
        .expect("groups array")
        .iter()
        .filter_map(|group| group["label"].as_str())
        .collect();
    assert_eq!(labels, ["About Me", "Tech", "Life"]);
    assert_eq!(json["groups"][2]["items"][0]["slug"], "ja/life/x");
}

#[tokio::test]
async fn health_and_unknown_routes() {
    let app = router();

    let (status, _, body) = get(&app, "/_health").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    for uri in ["/", "/llms-fr.txt", "/ja/llms.txt", "/rss"] {
        let (status, _, _) = get(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn every_response_carries_a_request_id() {
    let app = router();
    let mut seen = Vec::new();

    for uri in ["/rss.xml", "/rss.xml", "/missing"] {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request should build");
        let response = app
            .clone()
            .oneshot(request)
            .await
            .expect("router should respond");

        let id = response
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok())
            .expect("request id header");
        let id = uuid::Uuid::parse_str(id).expect("request id is a uuid");
        assert!(!seen.contains(&id), "request ids repeat");
        seen.push(id);
    }
}

struct OfflineRepo;

#[async_trait]
impl ContentRepo for OfflineRepo {
    async fn list_documents(&self) -> Result<Arc<[Document]>, RepoError> {
        Err(RepoError::unavailable("bucket offline"))
    }
}

#[tokio::test]
async fn repository_failure_is_a_generic_500() {
    let app = router_with(Arc::new(OfflineRepo));
    let request = Request::builder()
        .uri("/rss.xml")
        .body(Body::empty())
        .expect("request should build");

    let response = app.oneshot(request).await.expect("router should respond");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    // The logging middleware consumes the report.
    assert!(response.extensions().get::<ErrorReport>().is_none());

    let body = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    assert_eq!(&body[..], b"Failed to generate RSS feed");
}

#[tokio::test]
async fn sidebar_failure_uses_application_error_mapping() {
    let app = router_with(Arc::new(OfflineRepo));

    let (status, _, body) = get(&app, "/ja/sidebar.json").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Content store unavailable");
}
