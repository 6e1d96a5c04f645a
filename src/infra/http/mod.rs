mod internal;
mod middleware;
mod public;

pub use internal::build_internal_router;
pub use public::build_router;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::{
    content::ContentService,
    error::ErrorReport,
    invalidation::InvalidationTrigger,
    repos::{HealthProbe, RepoError},
};

pub(crate) const CONTENT_SOURCE_HEADER: &str = "x-content-source";

/// Services shared by the public and internal routers.
#[derive(Clone)]
pub struct HttpState {
    pub content: ContentService,
    pub invalidation: InvalidationTrigger,
    pub health: Arc<dyn HealthProbe>,
}

fn db_health_response(result: Result<(), RepoError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

/// Strong entity tag for a content hash.
fn entity_tag(content_hash: &str) -> String {
    format!("\"{content_hash}\"")
}
