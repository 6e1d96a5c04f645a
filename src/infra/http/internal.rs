//! Operator endpoints, bound to the internal listener only.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header::ETAG},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;

use crate::application::{content::ServedContent, error::HttpError};

use super::{
    HttpState, db_health_response, entity_tag,
    middleware::{log_responses, set_request_context},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecompiledBody {
    slug: String,
    content_hash: String,
    source: &'static str,
}

pub fn build_internal_router(state: HttpState) -> Router {
    Router::new()
        .route("/internal/invitations/{slug}/compile", post(compile))
        .route("/internal/invitations/{slug}/invalidate", post(invalidate))
        .route("/_health/db", get(internal_health))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn compile(State(state): State<HttpState>, Path(slug): Path<String>) -> Response {
    match state.content.compile_and_cache(&slug).await {
        Ok(served) => recompiled_response(served),
        Err(err) => HttpError::from(err).into_response(),
    }
}

async fn invalidate(State(state): State<HttpState>, Path(slug): Path<String>) -> StatusCode {
    state.invalidation.invalidate(&slug).await;
    StatusCode::NO_CONTENT
}

fn recompiled_response(served: ServedContent) -> Response {
    let etag = entity_tag(&served.content_hash);
    let body = RecompiledBody {
        slug: served.content.slug().to_string(),
        content_hash: served.content_hash,
        source: served.source.as_str(),
    };

    let mut response = Json(body).into_response();
    if let Ok(value) = HeaderValue::from_str(&etag) {
        response.headers_mut().insert(ETAG, value);
    }
    response
}

async fn internal_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.health.ping().await)
}
