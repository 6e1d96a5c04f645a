//! Write path for invitation sections. Every successful write refreshes the
//! compiled content of the owning slug.

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::application::invalidation::InvalidationTrigger;
use crate::application::repos::{
    BankAccountParams, GalleryImageParams, LoveStoryBlockParams, RepoError, SectionRepos,
    UpdateRegistrationParams, UpsertClosingParams, UpsertGalleryParams, UpsertGreetingParams,
    UpsertLoveStoryParams, UpsertMusicParams, UpsertThemeParams, UpsertWeddingGiftParams,
};
use crate::domain::entities::{
    BankAccountRecord, ClosingSettingsRecord, GalleryImageRecord, GallerySettingsRecord,
    GreetingSettingsRecord, LoveStoryBlockRecord, LoveStorySettingsRecord, MusicSettingsRecord,
    RegistrationRecord, ThemeSettingsRecord, WeddingGiftSettingsRecord,
};
use crate::domain::error::DomainError;
use crate::domain::types::SectionKind;
use crate::domain::validate::require_non_blank;

#[derive(Debug, Error)]
pub enum SectionError {
    #[error("registration or section item not found")]
    NotFound,
    #[error("registration belongs to another client")]
    Forbidden,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Repo(RepoError),
}

impl From<DomainError> for SectionError {
    fn from(err: DomainError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<RepoError> for SectionError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => Self::NotFound,
            RepoError::InvalidInput { message } => Self::InvalidInput(message),
            other => Self::Repo(other),
        }
    }
}

#[derive(Clone)]
pub struct SectionService {
    repos: SectionRepos,
    trigger: InvalidationTrigger,
}

impl SectionService {
    pub fn new(repos: SectionRepos, trigger: InvalidationTrigger) -> Self {
        Self { repos, trigger }
    }

    async fn authorize(
        &self,
        client_id: Uuid,
        registration_id: Uuid,
    ) -> Result<RegistrationRecord, SectionError> {
        let registration = self
            .repos
            .registrations
            .find_by_id(registration_id)
            .await?
            .ok_or(SectionError::NotFound)?;

        if registration.client_id != client_id {
            return Err(SectionError::Forbidden);
        }
        Ok(registration)
    }

    async fn written(&self, registration: &RegistrationRecord, section: SectionKind) {
        info!(
            registration_id = %registration.id,
            slug = %registration.slug,
            section = section.as_str(),
            "section updated"
        );
        self.trigger
            .section_changed(&registration.slug, section)
            .await;
    }

    pub async fn update_registration(
        &self,
        client_id: Uuid,
        params: UpdateRegistrationParams,
    ) -> Result<RegistrationRecord, SectionError> {
        self.authorize(client_id, params.id).await?;
        require_non_blank(&params.bride.full_name, "bride.full_name")?;
        require_non_blank(&params.bride.nickname, "bride.nickname")?;
        require_non_blank(&params.groom.full_name, "groom.full_name")?;
        require_non_blank(&params.groom.nickname, "groom.nickname")?;
        require_non_blank(&params.event1.venue_name, "event1.venue_name")?;

        let updated = self.repos.registrations.update_registration(params).await?;
        self.written(&updated, SectionKind::Registration).await;
        Ok(updated)
    }

    pub async fn upsert_greetings(
        &self,
        client_id: Uuid,
        registration_id: Uuid,
        params: UpsertGreetingParams,
    ) -> Result<GreetingSettingsRecord, SectionError> {
        let registration = self.authorize(client_id, registration_id).await?;
        let record = self
            .repos
            .greetings
            .upsert_settings(registration_id, params)
            .await?;
        self.written(&registration, SectionKind::Greetings).await;
        Ok(record)
    }

    pub async fn upsert_love_story(
        &self,
        client_id: Uuid,
        registration_id: Uuid,
        params: UpsertLoveStoryParams,
    ) -> Result<LoveStorySettingsRecord, SectionError> {
        let registration = self.authorize(client_id, registration_id).await?;
        let record = self
            .repos
            .love_story
            .upsert_settings(registration_id, params)
            .await?;
        self.written(&registration, SectionKind::LoveStory).await;
        Ok(record)
    }

    pub async fn create_love_story_block(
        &self,
        client_id: Uuid,
        registration_id: Uuid,
        params: LoveStoryBlockParams,
    ) -> Result<LoveStoryBlockRecord, SectionError> {
        let registration = self.authorize(client_id, registration_id).await?;
        validate_block(&params)?;
        let record = self
            .repos
            .love_story
            .create_block(registration_id, params)
            .await?;
        self.written(&registration, SectionKind::LoveStory).await;
        Ok(record)
    }

    pub async fn update_love_story_block(
        &self,
        client_id: Uuid,
        registration_id: Uuid,
        block_id: Uuid,
        params: LoveStoryBlockParams,
    ) -> Result<LoveStoryBlockRecord, SectionError> {
        let registration = self.authorize(client_id, registration_id).await?;
        validate_block(&params)?;
        let record = self
            .repos
            .love_story
            .update_block(registration_id, block_id, params)
            .await?;
        self.written(&registration, SectionKind::LoveStory).await;
        Ok(record)
    }

    pub async fn delete_love_story_block(
        &self,
        client_id: Uuid,
        registration_id: Uuid,
        block_id: Uuid,
    ) -> Result<(), SectionError> {
        let registration = self.authorize(client_id, registration_id).await?;
        self.repos
            .love_story
            .delete_block(registration_id, block_id)
            .await?;
        self.written(&registration, SectionKind::LoveStory).await;
        Ok(())
    }

    pub async fn reorder_love_story_blocks(
        &self,
        client_id: Uuid,
        registration_id: Uuid,
        ordered_ids: &[Uuid],
    ) -> Result<Vec<LoveStoryBlockRecord>, SectionError> {
        let registration = self.authorize(client_id, registration_id).await?;
        let records = self
            .repos
            .love_story
            .reorder_blocks(registration_id, ordered_ids)
            .await?;
        self.written(&registration, SectionKind::LoveStory).await;
        Ok(records)
    }

    pub async fn upsert_gallery(
        &self,
        client_id: Uuid,
        registration_id: Uuid,
        params: UpsertGalleryParams,
    ) -> Result<GallerySettingsRecord, SectionError> {
        let registration = self.authorize(client_id, registration_id).await?;
        let record = self
            .repos
            .gallery
            .upsert_settings(registration_id, params)
            .await?;
        self.written(&registration, SectionKind::Gallery).await;
        Ok(record)
    }

    pub async fn create_gallery_image(
        &self,
        client_id: Uuid,
        registration_id: Uuid,
        params: GalleryImageParams,
    ) -> Result<GalleryImageRecord, SectionError> {
        let registration = self.authorize(client_id, registration_id).await?;
        require_non_blank(&params.image_url, "image_url")?;
        let record = self
            .repos
            .gallery
            .create_image(registration_id, params)
            .await?;
        self.written(&registration, SectionKind::Gallery).await;
        Ok(record)
    }

    pub async fn update_gallery_image(
        &self,
        client_id: Uuid,
        registration_id: Uuid,
        image_id: Uuid,
        params: GalleryImageParams,
    ) -> Result<GalleryImageRecord, SectionError> {
        let registration = self.authorize(client_id, registration_id).await?;
        require_non_blank(&params.image_url, "image_url")?;
        let record = self
            .repos
            .gallery
            .update_image(registration_id, image_id, params)
            .await?;
        self.written(&registration, SectionKind::Gallery).await;
        Ok(record)
    }

    pub async fn delete_gallery_image(
        &self,
        client_id: Uuid,
        registration_id: Uuid,
        image_id: Uuid,
    ) -> Result<(), SectionError> {
        let registration = self.authorize(client_id, registration_id).await?;
        self.repos
            .gallery
            .delete_image(registration_id, image_id)
            .await?;
        self.written(&registration, SectionKind::Gallery).await;
        Ok(())
    }

    pub async fn reorder_gallery_images(
        &self,
        client_id: Uuid,
        registration_id: Uuid,
        ordered_ids: &[Uuid],
    ) -> Result<Vec<GalleryImageRecord>, SectionError> {
        let registration = self.authorize(client_id, registration_id).await?;
        let records = self
            .repos
            .gallery
            .reorder_images(registration_id, ordered_ids)
            .await?;
        self.written(&registration, SectionKind::Gallery).await;
        Ok(records)
    }

    pub async fn upsert_wedding_gift(
        &self,
        client_id: Uuid,
        registration_id: Uuid,
        params: UpsertWeddingGiftParams,
    ) -> Result<WeddingGiftSettingsRecord, SectionError> {
        let registration = self.authorize(client_id, registration_id).await?;
        let record = self
            .repos
            .wedding_gift
            .upsert_settings(registration_id, params)
            .await?;
        self.written(&registration, SectionKind::WeddingGift).await;
        Ok(record)
    }

    pub async fn create_bank_account(
        &self,
        client_id: Uuid,
        registration_id: Uuid,
        params: BankAccountParams,
    ) -> Result<BankAccountRecord, SectionError> {
        let registration = self.authorize(client_id, registration_id).await?;
        validate_account(&params)?;
        let record = self
            .repos
            .wedding_gift
            .create_account(registration_id, params)
            .await?;
        self.written(&registration, SectionKind::WeddingGift).await;
        Ok(record)
    }

    pub async fn update_bank_account(
        &self,
        client_id: Uuid,
        registration_id: Uuid,
        account_id: Uuid,
        params: BankAccountParams,
    ) -> Result<BankAccountRecord, SectionError> {
        let registration = self.authorize(client_id, registration_id).await?;
        validate_account(&params)?;
        let record = self
            .repos
            .wedding_gift
            .update_account(registration_id, account_id, params)
            .await?;
        self.written(&registration, SectionKind::WeddingGift).await;
        Ok(record)
    }

    pub async fn delete_bank_account(
        &self,
        client_id: Uuid,
        registration_id: Uuid,
        account_id: Uuid,
    ) -> Result<(), SectionError> {
        let registration = self.authorize(client_id, registration_id).await?;
        self.repos
            .wedding_gift
            .delete_account(registration_id, account_id)
            .await?;
        self.written(&registration, SectionKind::WeddingGift).await;
        Ok(())
    }

    pub async fn reorder_bank_accounts(
        &self,
        client_id: Uuid,
        registration_id: Uuid,
        ordered_ids: &[Uuid],
    ) -> Result<Vec<BankAccountRecord>, SectionError> {
        let registration = self.authorize(client_id, registration_id).await?;
        let records = self
            .repos
            .wedding_gift
            .reorder_accounts(registration_id, ordered_ids)
            .await?;
        self.written(&registration, SectionKind::WeddingGift).await;
        Ok(records)
    }

    pub async fn upsert_closing(
        &self,
        client_id: Uuid,
        registration_id: Uuid,
        params: UpsertClosingParams,
    ) -> Result<ClosingSettingsRecord, SectionError> {
        let registration = self.authorize(client_id, registration_id).await?;
        let record = self
            .repos
            .closing
            .upsert_settings(registration_id, params)
            .await?;
        self.written(&registration, SectionKind::Closing).await;
        Ok(record)
    }

    pub async fn upsert_music(
        &self,
        client_id: Uuid,
        registration_id: Uuid,
        params: UpsertMusicParams,
    ) -> Result<MusicSettingsRecord, SectionError> {
        let registration = self.authorize(client_id, registration_id).await?;
        let record = self
            .repos
            .music
            .upsert_settings(registration_id, params)
            .await?;
        self.written(&registration, SectionKind::Music).await;
        Ok(record)
    }

    pub async fn upsert_theme(
        &self,
        client_id: Uuid,
        registration_id: Uuid,
        params: UpsertThemeParams,
    ) -> Result<ThemeSettingsRecord, SectionError> {
        let registration = self.authorize(client_id, registration_id).await?;
        require_non_blank(&params.theme_key, "theme_key")?;
        let record = self
            .repos
            .theme
            .upsert_settings(registration_id, params)
            .await?;
        self.written(&registration, SectionKind::Theme).await;
        Ok(record)
    }
}

fn validate_block(params: &LoveStoryBlockParams) -> Result<(), DomainError> {
    require_non_blank(&params.title, "title")?;
    require_non_blank(&params.body, "body")
}

fn validate_account(params: &BankAccountParams) -> Result<(), DomainError> {
    require_non_blank(&params.bank_name, "bank_name")?;
    require_non_blank(&params.account_number, "account_number")?;
    require_non_blank(&params.account_holder, "account_holder")
}
