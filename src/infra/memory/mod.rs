//! In-memory repository backend used as the injected test double.
//!
//! Mirrors the Postgres adapters' observable behavior, including dense child
//! ordering and the stale-write guard on compiled content. Failure switches
//! let callers simulate outages of individual stores.

mod lock;

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    BankAccountParams, CachedContentRow, ClosingRepo, CompiledContentEntry, CompiledContentRepo,
    GalleryImageParams, GalleryRepo, GreetingsRepo, HealthProbe, LoveStoryBlockParams,
    LoveStoryRepo, MusicRepo, RegistrationsRepo, RepoError, SaveOutcome, ThemeRepo,
    UpdateRegistrationParams, UpsertClosingParams, UpsertGalleryParams, UpsertGreetingParams,
    UpsertLoveStoryParams, UpsertMusicParams, UpsertThemeParams, UpsertWeddingGiftParams,
    WeddingGiftRepo,
};
use crate::domain::entities::{
    BankAccountRecord, ClosingSettingsRecord, GalleryImageRecord, GallerySettingsRecord,
    GreetingSettingsRecord, LoveStoryBlockRecord, LoveStorySettingsRecord, MusicSettingsRecord,
    RegistrationRecord, ThemeSettingsRecord, WeddingGiftSettingsRecord,
};
use crate::domain::validate::{display_order_for, validate_reorder};

use self::lock::{rw_read, rw_write};

#[derive(Default)]
struct MemoryState {
    registrations: HashMap<Uuid, RegistrationRecord>,
    greetings: HashMap<Uuid, GreetingSettingsRecord>,
    love_story: HashMap<Uuid, LoveStorySettingsRecord>,
    love_story_blocks: HashMap<Uuid, Vec<LoveStoryBlockRecord>>,
    gallery: HashMap<Uuid, GallerySettingsRecord>,
    gallery_images: HashMap<Uuid, Vec<GalleryImageRecord>>,
    wedding_gift: HashMap<Uuid, WeddingGiftSettingsRecord>,
    bank_accounts: HashMap<Uuid, Vec<BankAccountRecord>>,
    closing: HashMap<Uuid, ClosingSettingsRecord>,
    music: HashMap<Uuid, MusicSettingsRecord>,
    theme: HashMap<Uuid, ThemeSettingsRecord>,
    compiled: HashMap<String, CachedContentRow>,
}

impl MemoryState {
    fn require_registration(&self, registration_id: Uuid) -> Result<(), RepoError> {
        if self.registrations.contains_key(&registration_id) {
            Ok(())
        } else {
            Err(RepoError::InvalidInput {
                message: format!("registration `{registration_id}` does not exist"),
            })
        }
    }
}

#[derive(Default)]
pub struct InMemoryRepositories {
    state: RwLock<MemoryState>,
    fail_section_reads: AtomicBool,
    fail_cache_reads: AtomicBool,
    fail_cache_writes: AtomicBool,
    section_read_delay_ms: AtomicU64,
    registration_lookups: AtomicUsize,
}

impl InMemoryRepositories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_registration(&self, record: RegistrationRecord) {
        let mut state = rw_write(&self.state, "insert_registration");
        state.registrations.insert(record.id, record);
    }

    /// Stores a raw cache row, bypassing the stale-write guard.
    pub fn insert_compiled_document(
        &self,
        slug: &str,
        theme_key: &str,
        document: Value,
        compile_started_at: OffsetDateTime,
    ) {
        let mut state = rw_write(&self.state, "insert_compiled_document");
        state.compiled.insert(
            slug.to_string(),
            CachedContentRow {
                slug: slug.to_string(),
                theme_key: theme_key.to_string(),
                document,
                content_hash: None,
                compile_started_at,
                updated_at: OffsetDateTime::now_utc(),
            },
        );
    }

    pub fn compiled_row(&self, slug: &str) -> Option<CachedContentRow> {
        rw_read(&self.state, "compiled_row").compiled.get(slug).cloned()
    }

    pub fn set_fail_section_reads(&self, fail: bool) {
        self.fail_section_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_cache_reads(&self, fail: bool) {
        self.fail_cache_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_cache_writes(&self, fail: bool) {
        self.fail_cache_writes.store(fail, Ordering::SeqCst);
    }

    /// Delays every section read, to exercise compile timeouts.
    pub fn set_section_read_delay(&self, delay: Duration) {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.section_read_delay_ms.store(millis, Ordering::SeqCst);
    }

    /// Number of registration lookups served so far; each compile performs one.
    pub fn registration_lookups(&self) -> usize {
        self.registration_lookups.load(Ordering::SeqCst)
    }

    async fn section_read(&self) -> Result<(), RepoError> {
        let delay = self.section_read_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_section_reads.load(Ordering::SeqCst) {
            return Err(RepoError::Persistence(
                "section store unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl HealthProbe for InMemoryRepositories {
    async fn ping(&self) -> Result<(), RepoError> {
        self.section_read().await
    }
}

trait OrderedChild: Clone {
    fn id(&self) -> Uuid;
    fn set_display_order(&mut self, order: i32);
}

impl OrderedChild for LoveStoryBlockRecord {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_display_order(&mut self, order: i32) {
        self.display_order = order;
    }
}

impl OrderedChild for GalleryImageRecord {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_display_order(&mut self, order: i32) {
        self.display_order = order;
    }
}

impl OrderedChild for BankAccountRecord {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_display_order(&mut self, order: i32) {
        self.display_order = order;
    }
}

fn renumber<T: OrderedChild>(children: &mut [T]) {
    for (index, child) in children.iter_mut().enumerate() {
        child.set_display_order(display_order_for(index));
    }
}

fn update_child<T: OrderedChild>(
    children: Option<&mut Vec<T>>,
    child_id: Uuid,
    apply: impl FnOnce(&mut T),
) -> Result<T, RepoError> {
    let child = children
        .and_then(|children| children.iter_mut().find(|child| child.id() == child_id))
        .ok_or(RepoError::NotFound)?;
    apply(child);
    Ok(child.clone())
}

fn remove_child<T: OrderedChild>(
    children: Option<&mut Vec<T>>,
    child_id: Uuid,
) -> Result<(), RepoError> {
    let children = children.ok_or(RepoError::NotFound)?;
    let position = children
        .iter()
        .position(|child| child.id() == child_id)
        .ok_or(RepoError::NotFound)?;
    children.remove(position);
    renumber(children);
    Ok(())
}

fn reorder_children<T: OrderedChild>(
    children: &mut Vec<T>,
    ordered_ids: &[Uuid],
    entity: &'static str,
) -> Result<Vec<T>, RepoError> {
    let current: Vec<Uuid> = children.iter().map(OrderedChild::id).collect();
    validate_reorder(&current, ordered_ids, entity)?;

    let mut reordered = Vec::with_capacity(children.len());
    for id in ordered_ids {
        if let Some(child) = children.iter().find(|child| child.id() == *id) {
            reordered.push(child.clone());
        }
    }
    renumber(&mut reordered);
    *children = reordered;
    Ok(children.clone())
}

fn next_order<T>(children: &[T]) -> i32 {
    display_order_for(children.len())
}

#[async_trait]
impl RegistrationsRepo for InMemoryRepositories {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RegistrationRecord>, RepoError> {
        self.registration_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(rw_read(&self.state, "find_by_id")
            .registrations
            .get(&id)
            .cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<RegistrationRecord>, RepoError> {
        self.registration_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(rw_read(&self.state, "find_by_slug")
            .registrations
            .values()
            .find(|registration| registration.slug == slug)
            .cloned())
    }

    async fn list_slugs(&self) -> Result<Vec<String>, RepoError> {
        let mut slugs: Vec<String> = rw_read(&self.state, "list_slugs")
            .registrations
            .values()
            .map(|registration| registration.slug.clone())
            .collect();
        slugs.sort();
        Ok(slugs)
    }

    async fn update_registration(
        &self,
        params: UpdateRegistrationParams,
    ) -> Result<RegistrationRecord, RepoError> {
        let mut state = rw_write(&self.state, "update_registration");
        let registration = state
            .registrations
            .get_mut(&params.id)
            .ok_or(RepoError::NotFound)?;

        registration.event_type = params.event_type;
        registration.custom_event1_label = params.custom_event1_label;
        registration.custom_event2_label = params.custom_event2_label;
        registration.timezone = params.timezone;
        registration.cover_image_url = params.cover_image_url;
        registration.bride = params.bride;
        registration.groom = params.groom;
        registration.event1 = params.event1;
        registration.event2 = params.event2;
        registration.updated_at = OffsetDateTime::now_utc();
        Ok(registration.clone())
    }
}

#[async_trait]
impl GreetingsRepo for InMemoryRepositories {
    async fn get_settings(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<GreetingSettingsRecord>, RepoError> {
        self.section_read().await?;
        Ok(rw_read(&self.state, "greetings.get")
            .greetings
            .get(&registration_id)
            .cloned())
    }

    async fn upsert_settings(
        &self,
        registration_id: Uuid,
        params: UpsertGreetingParams,
    ) -> Result<GreetingSettingsRecord, RepoError> {
        let mut state = rw_write(&self.state, "greetings.upsert");
        state.require_registration(registration_id)?;
        let record = GreetingSettingsRecord {
            registration_id,
            is_enabled: params.is_enabled,
            title: params.title,
            message: params.message,
            quote_text: params.quote_text,
            quote_source: params.quote_source,
            updated_at: OffsetDateTime::now_utc(),
        };
        state.greetings.insert(registration_id, record.clone());
        Ok(record)
    }
}

#[async_trait]
impl LoveStoryRepo for InMemoryRepositories {
    async fn get_settings(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<LoveStorySettingsRecord>, RepoError> {
        self.section_read().await?;
        Ok(rw_read(&self.state, "love_story.get")
            .love_story
            .get(&registration_id)
            .cloned())
    }

    async fn upsert_settings(
        &self,
        registration_id: Uuid,
        params: UpsertLoveStoryParams,
    ) -> Result<LoveStorySettingsRecord, RepoError> {
        let mut state = rw_write(&self.state, "love_story.upsert");
        state.require_registration(registration_id)?;
        let record = LoveStorySettingsRecord {
            registration_id,
            is_enabled: params.is_enabled,
            main_title: params.main_title,
            background_image_url: params.background_image_url,
            overlay_opacity: params.overlay_opacity,
            updated_at: OffsetDateTime::now_utc(),
        };
        state.love_story.insert(registration_id, record.clone());
        Ok(record)
    }

    async fn list_blocks(
        &self,
        registration_id: Uuid,
    ) -> Result<Vec<LoveStoryBlockRecord>, RepoError> {
        self.section_read().await?;
        Ok(rw_read(&self.state, "love_story.list_blocks")
            .love_story_blocks
            .get(&registration_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_block(
        &self,
        registration_id: Uuid,
        params: LoveStoryBlockParams,
    ) -> Result<LoveStoryBlockRecord, RepoError> {
        let mut state = rw_write(&self.state, "love_story.create_block");
        if !state.registrations.contains_key(&registration_id) {
            return Err(RepoError::NotFound);
        }
        let blocks = state.love_story_blocks.entry(registration_id).or_default();
        let record = LoveStoryBlockRecord {
            id: Uuid::new_v4(),
            registration_id,
            title: params.title,
            date_label: params.date_label,
            body: params.body,
            image_url: params.image_url,
            display_order: next_order(blocks),
            created_at: OffsetDateTime::now_utc(),
        };
        blocks.push(record.clone());
        Ok(record)
    }

    async fn update_block(
        &self,
        registration_id: Uuid,
        block_id: Uuid,
        params: LoveStoryBlockParams,
    ) -> Result<LoveStoryBlockRecord, RepoError> {
        let mut state = rw_write(&self.state, "love_story.update_block");
        update_child(
            state.love_story_blocks.get_mut(&registration_id),
            block_id,
            |block| {
                block.title = params.title;
                block.date_label = params.date_label;
                block.body = params.body;
                block.image_url = params.image_url;
            },
        )
    }

    async fn delete_block(&self, registration_id: Uuid, block_id: Uuid) -> Result<(), RepoError> {
        let mut state = rw_write(&self.state, "love_story.delete_block");
        remove_child(state.love_story_blocks.get_mut(&registration_id), block_id)
    }

    async fn reorder_blocks(
        &self,
        registration_id: Uuid,
        ordered_ids: &[Uuid],
    ) -> Result<Vec<LoveStoryBlockRecord>, RepoError> {
        let mut state = rw_write(&self.state, "love_story.reorder_blocks");
        if !state.registrations.contains_key(&registration_id) {
            return Err(RepoError::NotFound);
        }
        let blocks = state.love_story_blocks.entry(registration_id).or_default();
        reorder_children(blocks, ordered_ids, "love story block")
    }
}

#[async_trait]
impl GalleryRepo for InMemoryRepositories {
    async fn get_settings(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<GallerySettingsRecord>, RepoError> {
        self.section_read().await?;
        Ok(rw_read(&self.state, "gallery.get")
            .gallery
            .get(&registration_id)
            .cloned())
    }

    async fn upsert_settings(
        &self,
        registration_id: Uuid,
        params: UpsertGalleryParams,
    ) -> Result<GallerySettingsRecord, RepoError> {
        let mut state = rw_write(&self.state, "gallery.upsert");
        state.require_registration(registration_id)?;
        let record = GallerySettingsRecord {
            registration_id,
            is_enabled: params.is_enabled,
            title: params.title,
            updated_at: OffsetDateTime::now_utc(),
        };
        state.gallery.insert(registration_id, record.clone());
        Ok(record)
    }

    async fn list_images(
        &self,
        registration_id: Uuid,
    ) -> Result<Vec<GalleryImageRecord>, RepoError> {
        self.section_read().await?;
        Ok(rw_read(&self.state, "gallery.list_images")
            .gallery_images
            .get(&registration_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_image(
        &self,
        registration_id: Uuid,
        params: GalleryImageParams,
    ) -> Result<GalleryImageRecord, RepoError> {
        let mut state = rw_write(&self.state, "gallery.create_image");
        if !state.registrations.contains_key(&registration_id) {
            return Err(RepoError::NotFound);
        }
        let images = state.gallery_images.entry(registration_id).or_default();
        let record = GalleryImageRecord {
            id: Uuid::new_v4(),
            registration_id,
            image_url: params.image_url,
            caption: params.caption,
            display_order: next_order(images),
            created_at: OffsetDateTime::now_utc(),
        };
        images.push(record.clone());
        Ok(record)
    }

    async fn update_image(
        &self,
        registration_id: Uuid,
        image_id: Uuid,
        params: GalleryImageParams,
    ) -> Result<GalleryImageRecord, RepoError> {
        let mut state = rw_write(&self.state, "gallery.update_image");
        update_child(
            state.gallery_images.get_mut(&registration_id),
            image_id,
            |image| {
                image.image_url = params.image_url;
                image.caption = params.caption;
            },
        )
    }

    async fn delete_image(&self, registration_id: Uuid, image_id: Uuid) -> Result<(), RepoError> {
        let mut state = rw_write(&self.state, "gallery.delete_image");
        remove_child(state.gallery_images.get_mut(&registration_id), image_id)
    }

    async fn reorder_images(
        &self,
        registration_id: Uuid,
        ordered_ids: &[Uuid],
    ) -> Result<Vec<GalleryImageRecord>, RepoError> {
        let mut state = rw_write(&self.state, "gallery.reorder_images");
        if !state.registrations.contains_key(&registration_id) {
            return Err(RepoError::NotFound);
        }
        let images = state.gallery_images.entry(registration_id).or_default();
        reorder_children(images, ordered_ids, "gallery image")
    }
}

#[async_trait]
impl WeddingGiftRepo for InMemoryRepositories {
    async fn get_settings(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<WeddingGiftSettingsRecord>, RepoError> {
        self.section_read().await?;
        Ok(rw_read(&self.state, "wedding_gift.get")
            .wedding_gift
            .get(&registration_id)
            .cloned())
    }

    async fn upsert_settings(
        &self,
        registration_id: Uuid,
        params: UpsertWeddingGiftParams,
    ) -> Result<WeddingGiftSettingsRecord, RepoError> {
        let mut state = rw_write(&self.state, "wedding_gift.upsert");
        state.require_registration(registration_id)?;
        let record = WeddingGiftSettingsRecord {
            registration_id,
            is_enabled: params.is_enabled,
            title: params.title,
            description: params.description,
            recipient_name: params.recipient_name,
            recipient_address: params.recipient_address,
            updated_at: OffsetDateTime::now_utc(),
        };
        state.wedding_gift.insert(registration_id, record.clone());
        Ok(record)
    }

    async fn list_accounts(
        &self,
        registration_id: Uuid,
    ) -> Result<Vec<BankAccountRecord>, RepoError> {
        self.section_read().await?;
        Ok(rw_read(&self.state, "wedding_gift.list_accounts")
            .bank_accounts
            .get(&registration_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_account(
        &self,
        registration_id: Uuid,
        params: BankAccountParams,
    ) -> Result<BankAccountRecord, RepoError> {
        let mut state = rw_write(&self.state, "wedding_gift.create_account");
        if !state.registrations.contains_key(&registration_id) {
            return Err(RepoError::NotFound);
        }
        let accounts = state.bank_accounts.entry(registration_id).or_default();
        let record = BankAccountRecord {
            id: Uuid::new_v4(),
            registration_id,
            bank_name: params.bank_name,
            account_number: params.account_number,
            account_holder: params.account_holder,
            display_order: next_order(accounts),
            created_at: OffsetDateTime::now_utc(),
        };
        accounts.push(record.clone());
        Ok(record)
    }

    async fn update_account(
        &self,
        registration_id: Uuid,
        account_id: Uuid,
        params: BankAccountParams,
    ) -> Result<BankAccountRecord, RepoError> {
        let mut state = rw_write(&self.state, "wedding_gift.update_account");
        update_child(
            state.bank_accounts.get_mut(&registration_id),
            account_id,
            |account| {
                account.bank_name = params.bank_name;
                account.account_number = params.account_number;
                account.account_holder = params.account_holder;
            },
        )
    }

    async fn delete_account(
        &self,
        registration_id: Uuid,
        account_id: Uuid,
    ) -> Result<(), RepoError> {
        let mut state = rw_write(&self.state, "wedding_gift.delete_account");
        remove_child(state.bank_accounts.get_mut(&registration_id), account_id)
    }

    async fn reorder_accounts(
        &self,
        registration_id: Uuid,
        ordered_ids: &[Uuid],
    ) -> Result<Vec<BankAccountRecord>, RepoError> {
        let mut state = rw_write(&self.state, "wedding_gift.reorder_accounts");
        if !state.registrations.contains_key(&registration_id) {
            return Err(RepoError::NotFound);
        }
        let accounts = state.bank_accounts.entry(registration_id).or_default();
        reorder_children(accounts, ordered_ids, "bank account")
    }
}

#[async_trait]
impl ClosingRepo for InMemoryRepositories {
    async fn get_settings(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<ClosingSettingsRecord>, RepoError> {
        self.section_read().await?;
        Ok(rw_read(&self.state, "closing.get")
            .closing
            .get(&registration_id)
            .cloned())
    }

    async fn upsert_settings(
        &self,
        registration_id: Uuid,
        params: UpsertClosingParams,
    ) -> Result<ClosingSettingsRecord, RepoError> {
        let mut state = rw_write(&self.state, "closing.upsert");
        state.require_registration(registration_id)?;
        let record = ClosingSettingsRecord {
            registration_id,
            is_enabled: params.is_enabled,
            title: params.title,
            message: params.message,
            background_image_url: params.background_image_url,
            overlay_opacity: params.overlay_opacity,
            updated_at: OffsetDateTime::now_utc(),
        };
        state.closing.insert(registration_id, record.clone());
        Ok(record)
    }
}

#[async_trait]
impl MusicRepo for InMemoryRepositories {
    async fn get_settings(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<MusicSettingsRecord>, RepoError> {
        self.section_read().await?;
        Ok(rw_read(&self.state, "music.get")
            .music
            .get(&registration_id)
            .cloned())
    }

    async fn upsert_settings(
        &self,
        registration_id: Uuid,
        params: UpsertMusicParams,
    ) -> Result<MusicSettingsRecord, RepoError> {
        let mut state = rw_write(&self.state, "music.upsert");
        state.require_registration(registration_id)?;
        let record = MusicSettingsRecord {
            registration_id,
            is_enabled: params.is_enabled,
            audio_url: params.audio_url,
            title: params.title,
            autoplay: params.autoplay,
            loop_playback: params.loop_playback,
            updated_at: OffsetDateTime::now_utc(),
        };
        state.music.insert(registration_id, record.clone());
        Ok(record)
    }
}

#[async_trait]
impl ThemeRepo for InMemoryRepositories {
    async fn get_settings(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<ThemeSettingsRecord>, RepoError> {
        self.section_read().await?;
        Ok(rw_read(&self.state, "theme.get")
            .theme
            .get(&registration_id)
            .cloned())
    }

    async fn upsert_settings(
        &self,
        registration_id: Uuid,
        params: UpsertThemeParams,
    ) -> Result<ThemeSettingsRecord, RepoError> {
        let mut state = rw_write(&self.state, "theme.upsert");
        state.require_registration(registration_id)?;
        let record = ThemeSettingsRecord {
            registration_id,
            theme_key: params.theme_key,
            locale: params.locale,
            countdown_enabled: params.countdown_enabled,
            rsvp_enabled: params.rsvp_enabled,
            guestbook_enabled: params.guestbook_enabled,
            updated_at: OffsetDateTime::now_utc(),
        };
        state.theme.insert(registration_id, record.clone());
        Ok(record)
    }
}

#[async_trait]
impl CompiledContentRepo for InMemoryRepositories {
    async fn load_compiled(&self, slug: &str) -> Result<Option<CachedContentRow>, RepoError> {
        if self.fail_cache_reads.load(Ordering::SeqCst) {
            return Err(RepoError::Persistence("cache store unavailable".to_string()));
        }
        Ok(self.compiled_row(slug))
    }

    async fn save_compiled(&self, entry: &CompiledContentEntry) -> Result<SaveOutcome, RepoError> {
        if self.fail_cache_writes.load(Ordering::SeqCst) {
            return Err(RepoError::Persistence("cache store unavailable".to_string()));
        }
        let document = serde_json::to_value(&entry.content).map_err(RepoError::from_persistence)?;

        let mut state = rw_write(&self.state, "save_compiled");
        if let Some(existing) = state.compiled.get(&entry.slug)
            && existing.compile_started_at > entry.compile_started_at
        {
            return Ok(SaveOutcome::SkippedStale);
        }

        state.compiled.insert(
            entry.slug.clone(),
            CachedContentRow {
                slug: entry.slug.clone(),
                theme_key: entry.theme_key.clone(),
                document,
                content_hash: Some(entry.content_hash.clone()),
                compile_started_at: entry.compile_started_at,
                updated_at: OffsetDateTime::now_utc(),
            },
        );
        Ok(SaveOutcome::Stored)
    }
}
