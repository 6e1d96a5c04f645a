use axum::{
    Json, Router,
    extract::{Path, State},
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{CACHE_CONTROL, ETAG, IF_NONE_MATCH},
    },
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::application::{content::ServedContent, error::HttpError};

use super::{
    CONTENT_SOURCE_HEADER, HttpState, db_health_response, entity_tag,
    middleware::{log_responses, set_request_context},
};

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/invitations/{slug}/content", get(invitation_content))
        .route("/_health/db", get(public_health))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn invitation_content(
    State(state): State<HttpState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Response {
    match state.content.fetch_content(&slug).await {
        Ok(served) => content_response(served, &headers),
        Err(err) => HttpError::from(err).into_response(),
    }
}

fn content_response(served: ServedContent, headers: &HeaderMap) -> Response {
    let etag = entity_tag(&served.content_hash);
    let not_modified = headers
        .get(IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|candidates| {
            candidates
                .split(',')
                .map(str::trim)
                .any(|candidate| candidate == etag || candidate == "*")
        });

    let mut response = if not_modified {
        StatusCode::NOT_MODIFIED.into_response()
    } else {
        Json(served.content).into_response()
    };

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&etag) {
        headers.insert(ETAG, value);
    }
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(
        CONTENT_SOURCE_HEADER,
        HeaderValue::from_static(served.source.as_str()),
    );
    response
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.health.ping().await)
}
