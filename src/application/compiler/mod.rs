//! Assembles the compiled invitation document from the section repositories.

pub mod sections;

use std::time::{Duration, Instant};

use metrics::histogram;
use thiserror::Error;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::application::repos::{RepoError, SectionRepos};
use crate::domain::content::CompiledContent;
use crate::domain::types::Locale;

use self::sections::SectionSources;

pub const METRIC_COMPILE_MS: &str = "undangan_content_compile_ms";

pub const DEFAULT_COMPILE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy)]
pub struct CompileOptions {
    /// Upper bound on one compile, source reads included.
    pub timeout: Duration,
    /// Locale used when the theme carries no override.
    pub default_locale: Locale,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_COMPILE_TIMEOUT,
            default_locale: Locale::default(),
        }
    }
}

/// Either identifier resolves the same registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationKey {
    Id(Uuid),
    Slug(String),
}

impl RegistrationKey {
    pub fn slug(slug: impl Into<String>) -> Self {
        Self::Slug(slug.into())
    }
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("registration not found")]
    NotFound,
    #[error("failed to read section data: {0}")]
    SourceRead(#[from] RepoError),
    #[error("compile did not finish within {0:?}")]
    Timeout(Duration),
}

#[derive(Clone)]
pub struct ContentCompiler {
    repos: SectionRepos,
    options: CompileOptions,
}

impl ContentCompiler {
    pub fn new(repos: SectionRepos, options: CompileOptions) -> Self {
        Self { repos, options }
    }

    #[instrument(skip(self))]
    pub async fn compile(&self, key: &RegistrationKey) -> Result<CompiledContent, CompileError> {
        let started_at = Instant::now();
        let result = tokio::time::timeout(self.options.timeout, self.compile_unbounded(key))
            .await
            .unwrap_or(Err(CompileError::Timeout(self.options.timeout)));

        let outcome = match &result {
            Ok(_) => "ok",
            Err(CompileError::NotFound) => "not_found",
            Err(CompileError::SourceRead(_)) => "source_read",
            Err(CompileError::Timeout(_)) => "timeout",
        };
        let elapsed_ms = started_at.elapsed().as_secs_f64() * 1000.0;
        histogram!(METRIC_COMPILE_MS, "outcome" => outcome).record(elapsed_ms);
        debug!(outcome, elapsed_ms, "content compile finished");

        result
    }

    async fn compile_unbounded(
        &self,
        key: &RegistrationKey,
    ) -> Result<CompiledContent, CompileError> {
        let registration = match key {
            RegistrationKey::Id(id) => self.repos.registrations.find_by_id(*id).await?,
            RegistrationKey::Slug(slug) => self.repos.registrations.find_by_slug(slug).await?,
        }
        .ok_or(CompileError::NotFound)?;

        let id = registration.id;
        let (
            theme,
            greetings,
            love_story,
            love_story_blocks,
            gallery,
            gallery_images,
            wedding_gift,
            bank_accounts,
            closing,
            music,
        ) = tokio::try_join!(
            self.repos.theme.get_settings(id),
            self.repos.greetings.get_settings(id),
            self.repos.love_story.get_settings(id),
            self.repos.love_story.list_blocks(id),
            self.repos.gallery.get_settings(id),
            self.repos.gallery.list_images(id),
            self.repos.wedding_gift.get_settings(id),
            self.repos.wedding_gift.list_accounts(id),
            self.repos.closing.get_settings(id),
            self.repos.music.get_settings(id),
        )?;

        let sources = SectionSources {
            registration,
            theme,
            greetings,
            love_story,
            love_story_blocks,
            gallery,
            gallery_images,
            wedding_gift,
            bank_accounts,
            closing,
            music,
        };
        Ok(sections::assemble(sources, self.options.default_locale))
    }
}
