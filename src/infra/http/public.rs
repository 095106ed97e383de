use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode, header::CONTENT_TYPE},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use metrics::counter;

use crate::{
    application::{
        error::{AppError, HttpError},
        llms::{LlmsService, llms_file_name},
        navigation::NavigationService,
        selection::FeedQuery,
        syndication::SyndicationService,
    },
    domain::{
        content::{CategoryScope, Language},
        navigation::Sidebar,
    },
    infra::telemetry::FEED_RENDER_TOTAL,
};

use super::middleware::{log_responses, set_request_context};

#[derive(Clone)]
pub struct HttpState {
    pub syndication: Arc<SyndicationService>,
    pub llms: Arc<LlmsService>,
    pub navigation: Arc<NavigationService>,
}

pub fn build_router(state: HttpState) -> Router {
    let mut router = Router::new()
        .route("/llms.txt", get(llms_index))
        .route("/_health", get(health));

    for language in Language::ALL {
        let prefix = language.path_prefix();

        router = router
            .route(
                &format!("/{prefix}rss.xml"),
                get(move |State(state): State<HttpState>| rss_feed(state, language)),
            )
            .route(
                &format!("/{prefix}sidebar.json"),
                get(move |State(state): State<HttpState>| sidebar(state, language)),
            );

        for scope in CategoryScope::ALL {
            let query = FeedQuery::new(language, scope);
            router = router.route(
                &format!("/{}", llms_file_name(language, scope)),
                get(move |State(state): State<HttpState>| llms_feed(state, query)),
            );
        }
    }

    router
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn rss_feed(state: HttpState, language: Language) -> Response {
    match state.syndication.rss_feed(language).await {
        Ok(body) => {
            counter!(FEED_RENDER_TOTAL, "feed" => "rss", "lang" => language.as_str()).increment(1);
            xml_response(body)
        }
        Err(err) => HttpError::from(err).into_response(),
    }
}

async fn llms_feed(state: HttpState, query: FeedQuery) -> Response {
    match state.llms.feed(query).await {
        Ok(body) => {
            counter!(
                FEED_RENDER_TOTAL,
                "feed" => "llms",
                "lang" => query.language.as_str(),
                "scope" => query.category.file_stem()
            )
            .increment(1);
            plain_response(body)
        }
        Err(err) => HttpError::from(err).into_response(),
    }
}

async fn llms_index(State(state): State<HttpState>) -> Response {
    counter!(FEED_RENDER_TOTAL, "feed" => "llms-index").increment(1);
    plain_response(state.llms.index())
}

async fn sidebar(state: HttpState, language: Language) -> Result<Json<Sidebar>, AppError> {
    Ok(Json(state.navigation.sidebar(language).await?))
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn not_found(request: Request<Body>) -> HttpError {
    HttpError::new(
        "infra::http::public::not_found",
        StatusCode::NOT_FOUND,
        "Not found",
        format!("no route for `{}`", request.uri().path()),
    )
}

fn xml_response(body: String) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/xml")
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

fn plain_response(body: String) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
