//! Recompiles cached content after writes to its sources.

use metrics::counter;
use tracing::{debug, warn};

use crate::application::content::ContentService;
use crate::domain::types::SectionKind;

pub const METRIC_INVALIDATION_FAILURE: &str = "undangan_invalidation_failure_total";

/// Called after every successful section or registration write.
///
/// Failures are logged and counted; they never reach the writer.
#[derive(Clone)]
pub struct InvalidationTrigger {
    content: ContentService,
}

impl InvalidationTrigger {
    pub fn new(content: ContentService) -> Self {
        Self { content }
    }

    pub async fn section_changed(&self, slug: &str, section: SectionKind) {
        self.recompile(slug, section.as_str()).await;
    }

    /// Manual refresh used by the internal API. Best-effort like the
    /// write-path refresh; callers that need the document use
    /// `ContentService::compile_and_cache`.
    pub async fn invalidate(&self, slug: &str) {
        self.recompile(slug, "manual").await;
    }

    async fn recompile(&self, slug: &str, section: &'static str) {
        match self.content.compile_and_cache(slug).await {
            Ok(_) => debug!(slug, section, "compiled content refreshed"),
            Err(err) => {
                counter!(METRIC_INVALIDATION_FAILURE, "section" => section).increment(1);
                warn!(slug, section, error = %err, "failed to refresh compiled content");
            }
        }
    }
}
