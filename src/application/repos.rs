//! Repository traits describing persistence adapters.

use std::sync::Arc;

use async_trait::async_trait;
use chrono_tz::Tz;
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::content::CompiledContent;
use crate::domain::entities::{
    BankAccountRecord, CeremonyRecord, ClosingSettingsRecord, GalleryImageRecord,
    GallerySettingsRecord, GreetingSettingsRecord, LoveStoryBlockRecord, LoveStorySettingsRecord,
    MusicSettingsRecord, PersonRecord, RegistrationRecord, SecondCeremonyRecord,
    ThemeSettingsRecord, WeddingGiftSettingsRecord,
};
use crate::domain::error::DomainError;
use crate::domain::types::EventType;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<DomainError> for RepoError {
    fn from(err: DomainError) -> Self {
        Self::InvalidInput {
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdateRegistrationParams {
    pub id: Uuid,
    pub event_type: EventType,
    pub custom_event1_label: Option<String>,
    pub custom_event2_label: Option<String>,
    pub timezone: Tz,
    pub cover_image_url: Option<String>,
    pub bride: PersonRecord,
    pub groom: PersonRecord,
    pub event1: CeremonyRecord,
    pub event2: SecondCeremonyRecord,
}

#[async_trait]
pub trait RegistrationsRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RegistrationRecord>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<RegistrationRecord>, RepoError>;

    async fn list_slugs(&self) -> Result<Vec<String>, RepoError>;

    /// Replaces every editable field. The slug is immutable.
    async fn update_registration(
        &self,
        params: UpdateRegistrationParams,
    ) -> Result<RegistrationRecord, RepoError>;
}

#[derive(Debug, Clone)]
pub struct UpsertGreetingParams {
    pub is_enabled: bool,
    pub title: Option<String>,
    pub message: Option<String>,
    pub quote_text: Option<String>,
    pub quote_source: Option<String>,
}

#[async_trait]
pub trait GreetingsRepo: Send + Sync {
    async fn get_settings(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<GreetingSettingsRecord>, RepoError>;

    async fn upsert_settings(
        &self,
        registration_id: Uuid,
        params: UpsertGreetingParams,
    ) -> Result<GreetingSettingsRecord, RepoError>;
}

#[derive(Debug, Clone)]
pub struct UpsertLoveStoryParams {
    pub is_enabled: bool,
    pub main_title: Option<String>,
    pub background_image_url: Option<String>,
    pub overlay_opacity: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoveStoryBlockParams {
    pub title: String,
    pub date_label: Option<String>,
    pub body: String,
    pub image_url: Option<String>,
}

#[async_trait]
pub trait LoveStoryRepo: Send + Sync {
    async fn get_settings(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<LoveStorySettingsRecord>, RepoError>;

    async fn upsert_settings(
        &self,
        registration_id: Uuid,
        params: UpsertLoveStoryParams,
    ) -> Result<LoveStorySettingsRecord, RepoError>;

    /// Blocks ordered by `display_order`.
    async fn list_blocks(
        &self,
        registration_id: Uuid,
    ) -> Result<Vec<LoveStoryBlockRecord>, RepoError>;

    async fn create_block(
        &self,
        registration_id: Uuid,
        params: LoveStoryBlockParams,
    ) -> Result<LoveStoryBlockRecord, RepoError>;

    async fn update_block(
        &self,
        registration_id: Uuid,
        block_id: Uuid,
        params: LoveStoryBlockParams,
    ) -> Result<LoveStoryBlockRecord, RepoError>;

    async fn delete_block(&self, registration_id: Uuid, block_id: Uuid) -> Result<(), RepoError>;

    async fn reorder_blocks(
        &self,
        registration_id: Uuid,
        ordered_ids: &[Uuid],
    ) -> Result<Vec<LoveStoryBlockRecord>, RepoError>;
}

#[derive(Debug, Clone)]
pub struct UpsertGalleryParams {
    pub is_enabled: bool,
    pub title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GalleryImageParams {
    pub image_url: String,
    pub caption: Option<String>,
}

#[async_trait]
pub trait GalleryRepo: Send + Sync {
    async fn get_settings(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<GallerySettingsRecord>, RepoError>;

    async fn upsert_settings(
        &self,
        registration_id: Uuid,
        params: UpsertGalleryParams,
    ) -> Result<GallerySettingsRecord, RepoError>;

    async fn list_images(&self, registration_id: Uuid)
    -> Result<Vec<GalleryImageRecord>, RepoError>;

    async fn create_image(
        &self,
        registration_id: Uuid,
        params: GalleryImageParams,
    ) -> Result<GalleryImageRecord, RepoError>;

    async fn update_image(
        &self,
        registration_id: Uuid,
        image_id: Uuid,
        params: GalleryImageParams,
    ) -> Result<GalleryImageRecord, RepoError>;

    async fn delete_image(&self, registration_id: Uuid, image_id: Uuid) -> Result<(), RepoError>;

    async fn reorder_images(
        &self,
        registration_id: Uuid,
        ordered_ids: &[Uuid],
    ) -> Result<Vec<GalleryImageRecord>, RepoError>;
}

#[derive(Debug, Clone)]
pub struct UpsertWeddingGiftParams {
    pub is_enabled: bool,
    pub title: Option<String>,
    pub description: Option<String>,
    pub recipient_name: Option<String>,
    pub recipient_address: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BankAccountParams {
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
}

#[async_trait]
pub trait WeddingGiftRepo: Send + Sync {
    async fn get_settings(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<WeddingGiftSettingsRecord>, RepoError>;

    async fn upsert_settings(
        &self,
        registration_id: Uuid,
        params: UpsertWeddingGiftParams,
    ) -> Result<WeddingGiftSettingsRecord, RepoError>;

    async fn list_accounts(
        &self,
        registration_id: Uuid,
    ) -> Result<Vec<BankAccountRecord>, RepoError>;

    async fn create_account(
        &self,
        registration_id: Uuid,
        params: BankAccountParams,
    ) -> Result<BankAccountRecord, RepoError>;

    async fn update_account(
        &self,
        registration_id: Uuid,
        account_id: Uuid,
        params: BankAccountParams,
    ) -> Result<BankAccountRecord, RepoError>;

    async fn delete_account(
        &self,
        registration_id: Uuid,
        account_id: Uuid,
    ) -> Result<(), RepoError>;

    async fn reorder_accounts(
        &self,
        registration_id: Uuid,
        ordered_ids: &[Uuid],
    ) -> Result<Vec<BankAccountRecord>, RepoError>;
}

#[derive(Debug, Clone)]
pub struct UpsertClosingParams {
    pub is_enabled: bool,
    pub title: Option<String>,
    pub message: Option<String>,
    pub background_image_url: Option<String>,
    pub overlay_opacity: Option<String>,
}

#[async_trait]
pub trait ClosingRepo: Send + Sync {
    async fn get_settings(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<ClosingSettingsRecord>, RepoError>;

    async fn upsert_settings(
        &self,
        registration_id: Uuid,
        params: UpsertClosingParams,
    ) -> Result<ClosingSettingsRecord, RepoError>;
}

#[derive(Debug, Clone)]
pub struct UpsertMusicParams {
    pub is_enabled: bool,
    pub audio_url: Option<String>,
    pub title: Option<String>,
    pub autoplay: bool,
    pub loop_playback: bool,
}

#[async_trait]
pub trait MusicRepo: Send + Sync {
    async fn get_settings(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<MusicSettingsRecord>, RepoError>;

    async fn upsert_settings(
        &self,
        registration_id: Uuid,
        params: UpsertMusicParams,
    ) -> Result<MusicSettingsRecord, RepoError>;
}

#[derive(Debug, Clone)]
pub struct UpsertThemeParams {
    pub theme_key: String,
    pub locale: Option<String>,
    pub countdown_enabled: bool,
    pub rsvp_enabled: bool,
    pub guestbook_enabled: bool,
}

#[async_trait]
pub trait ThemeRepo: Send + Sync {
    async fn get_settings(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<ThemeSettingsRecord>, RepoError>;

    async fn upsert_settings(
        &self,
        registration_id: Uuid,
        params: UpsertThemeParams,
    ) -> Result<ThemeSettingsRecord, RepoError>;
}

/// A freshly compiled document ready to be cached.
#[derive(Debug, Clone)]
pub struct CompiledContentEntry {
    pub slug: String,
    pub theme_key: String,
    pub content: CompiledContent,
    pub content_hash: String,
    /// When the compile that produced `content` began reading sources.
    pub compile_started_at: OffsetDateTime,
}

/// A cached row as stored. `document` holds whatever keys the row carries,
/// current or legacy; decoding happens in the fetch path.
#[derive(Debug, Clone)]
pub struct CachedContentRow {
    pub slug: String,
    pub theme_key: String,
    pub document: Value,
    pub content_hash: Option<String>,
    pub compile_started_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Stored,
    /// The stored row came from a compile that started later.
    SkippedStale,
}

#[async_trait]
pub trait CompiledContentRepo: Send + Sync {
    async fn load_compiled(&self, slug: &str) -> Result<Option<CachedContentRow>, RepoError>;

    async fn save_compiled(&self, entry: &CompiledContentEntry) -> Result<SaveOutcome, RepoError>;
}

/// Handles to every section source, shared by the compiler and the section
/// service.
#[derive(Clone)]
pub struct SectionRepos {
    pub registrations: Arc<dyn RegistrationsRepo>,
    pub greetings: Arc<dyn GreetingsRepo>,
    pub love_story: Arc<dyn LoveStoryRepo>,
    pub gallery: Arc<dyn GalleryRepo>,
    pub wedding_gift: Arc<dyn WeddingGiftRepo>,
    pub closing: Arc<dyn ClosingRepo>,
    pub music: Arc<dyn MusicRepo>,
    pub theme: Arc<dyn ThemeRepo>,
}

impl SectionRepos {
    /// Uses one backend for every section.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: RegistrationsRepo
            + GreetingsRepo
            + LoveStoryRepo
            + GalleryRepo
            + WeddingGiftRepo
            + ClosingRepo
            + MusicRepo
            + ThemeRepo
            + 'static,
    {
        Self {
            registrations: backend.clone(),
            greetings: backend.clone(),
            love_story: backend.clone(),
            gallery: backend.clone(),
            wedding_gift: backend.clone(),
            closing: backend.clone(),
            music: backend.clone(),
            theme: backend,
        }
    }
}

/// Liveness check for the backing store, used by the health endpoint.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}
