//! Read path for compiled invitation content: cache first, compile on demand.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use metrics::counter;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, error, info, instrument, warn};

use crate::application::compiler::{CompileError, ContentCompiler, RegistrationKey};
use crate::application::repos::{
    CompiledContentEntry, CompiledContentRepo, RegistrationsRepo, RepoError, SaveOutcome,
};
use crate::domain::content::CompiledContent;
use crate::domain::legacy::decode_document;

pub const METRIC_CACHE_HIT: &str = "undangan_content_cache_hit_total";
pub const METRIC_CACHE_MISS: &str = "undangan_content_cache_miss_total";
pub const METRIC_SHAPE_MISMATCH: &str = "undangan_content_shape_mismatch_total";
pub const METRIC_CACHE_WRITE_FAILURE: &str = "undangan_content_cache_write_failure_total";
pub const METRIC_STALE_SERVED: &str = "undangan_content_stale_served_total";

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("invitation not found")]
    NotFound,
    #[error("failed to read section data: {0}")]
    SourceRead(#[source] RepoError),
    #[error("compile did not finish within {0:?}")]
    Timeout(Duration),
    #[error("failed to encode compiled content: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<CompileError> for ContentError {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::NotFound => Self::NotFound,
            CompileError::SourceRead(err) => Self::SourceRead(err),
            CompileError::Timeout(limit) => Self::Timeout(limit),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    Cache,
    Compiled,
    /// Upgraded from an older cached row after a failed compile.
    Stale,
}

impl ContentSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentSource::Cache => "cache",
            ContentSource::Compiled => "compiled",
            ContentSource::Stale => "stale",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServedContent {
    pub content: CompiledContent,
    pub content_hash: String,
    pub source: ContentSource,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecompileReport {
    pub compiled: usize,
    pub missing: usize,
    pub failed: Vec<String>,
}

#[derive(Clone)]
pub struct ContentService {
    compiler: ContentCompiler,
    cache: Arc<dyn CompiledContentRepo>,
    registrations: Arc<dyn RegistrationsRepo>,
}

impl ContentService {
    pub fn new(
        compiler: ContentCompiler,
        cache: Arc<dyn CompiledContentRepo>,
        registrations: Arc<dyn RegistrationsRepo>,
    ) -> Self {
        Self {
            compiler,
            cache,
            registrations,
        }
    }

    /// Serves the cached document for `slug`, compiling and caching it when
    /// the row is absent or stored in an outdated shape.
    #[instrument(skip(self))]
    pub async fn fetch_content(&self, slug: &str) -> Result<ServedContent, ContentError> {
        let cached = match self.cache.load_compiled(slug).await {
            Ok(row) => row,
            Err(err) => {
                warn!(slug, error = %err, "cache read failed, treating as miss");
                None
            }
        };

        let mut stale = None;
        match cached {
            Some(row) => match decode_document(row.document) {
                Ok(content) => {
                    counter!(METRIC_CACHE_HIT).increment(1);
                    let content_hash = match row.content_hash {
                        Some(hash) => hash,
                        None => content.content_hash()?,
                    };
                    return Ok(ServedContent {
                        content,
                        content_hash,
                        source: ContentSource::Cache,
                    });
                }
                Err(mismatch) => {
                    counter!(METRIC_SHAPE_MISMATCH, "shape" => mismatch.shape.as_str())
                        .increment(1);
                    info!(
                        slug,
                        shape = mismatch.shape.as_str(),
                        reason = %mismatch.reason,
                        "cached content has outdated shape, recompiling"
                    );
                    stale = mismatch.upgraded;
                }
            },
            None => {
                counter!(METRIC_CACHE_MISS).increment(1);
                debug!(slug, "content cache miss");
            }
        }

        match self.compile_and_cache(slug).await {
            Ok(served) => Ok(served),
            Err(ContentError::NotFound) => Err(ContentError::NotFound),
            Err(err) => {
                let Some(content) = stale else {
                    return Err(err);
                };
                counter!(METRIC_STALE_SERVED).increment(1);
                error!(slug, error = %err, "compile failed, serving upgraded cached content");
                let content_hash = content.content_hash()?;
                Ok(ServedContent {
                    content: *content,
                    content_hash,
                    source: ContentSource::Stale,
                })
            }
        }
    }

    /// Compiles `slug` and stores the result. A failed store is logged and the
    /// fresh document is still returned.
    #[instrument(skip(self))]
    pub async fn compile_and_cache(&self, slug: &str) -> Result<ServedContent, ContentError> {
        let compile_started_at = OffsetDateTime::now_utc();
        let content = self.compiler.compile(&RegistrationKey::slug(slug)).await?;
        let content_hash = content.content_hash()?;

        let entry = CompiledContentEntry {
            slug: content.slug().to_string(),
            theme_key: content.theme_key().to_string(),
            content,
            content_hash,
            compile_started_at,
        };

        match self.cache.save_compiled(&entry).await {
            Ok(SaveOutcome::Stored) => debug!(slug, "compiled content cached"),
            Ok(SaveOutcome::SkippedStale) => {
                debug!(slug, "newer compile already cached, keeping stored row");
            }
            Err(err) => {
                counter!(METRIC_CACHE_WRITE_FAILURE).increment(1);
                warn!(slug, error = %err, "failed to cache compiled content");
            }
        }

        Ok(ServedContent {
            content: entry.content,
            content_hash: entry.content_hash,
            source: ContentSource::Compiled,
        })
    }

    /// Recompiles every registration, `concurrency` at a time.
    pub async fn recompile_all(&self, concurrency: usize) -> Result<RecompileReport, RepoError> {
        let slugs = self.registrations.list_slugs().await?;
        let total = slugs.len();

        let results: Vec<(String, Result<ServedContent, ContentError>)> = stream::iter(slugs)
            .map(|slug| async move {
                let result = self.compile_and_cache(&slug).await;
                (slug, result)
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;

        let mut report = RecompileReport::default();
        for (slug, result) in results {
            match result {
                Ok(_) => report.compiled += 1,
                Err(ContentError::NotFound) => report.missing += 1,
                Err(err) => {
                    warn!(slug = %slug, error = %err, "recompile failed");
                    report.failed.push(slug);
                }
            }
        }
        report.failed.sort();

        info!(
            total,
            compiled = report.compiled,
            failed = report.failed.len(),
            "recompile sweep finished"
        );
        Ok(report)
    }
}
