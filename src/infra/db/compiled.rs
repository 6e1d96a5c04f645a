//! Cache rows of compiled content, one per slug.

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::types::Json;
use time::OffsetDateTime;

use crate::application::repos::{
    CachedContentRow, CompiledContentEntry, CompiledContentRepo, RepoError, SaveOutcome,
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct CompiledContentRow {
    slug: String,
    theme_key: String,
    profile: Option<Value>,
    bride: Option<Value>,
    groom: Option<Value>,
    event: Option<Value>,
    greetings: Option<Value>,
    event_details: Option<Value>,
    love_story: Option<Value>,
    gallery: Option<Value>,
    wedding_gift: Option<Value>,
    closing: Option<Value>,
    music_settings: Option<Value>,
    client_profile: Option<Value>,
    clouds: Option<Value>,
    event_cloud: Option<Value>,
    content_hash: Option<String>,
    compile_started_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<CompiledContentRow> for CachedContentRow {
    fn from(row: CompiledContentRow) -> Self {
        let columns = [
            ("profile", row.profile),
            ("bride", row.bride),
            ("groom", row.groom),
            ("event", row.event),
            ("greetings", row.greetings),
            ("eventDetails", row.event_details),
            ("loveStory", row.love_story),
            ("gallery", row.gallery),
            ("weddingGift", row.wedding_gift),
            ("closing", row.closing),
            ("musicSettings", row.music_settings),
            ("clientProfile", row.client_profile),
            ("clouds", row.clouds),
            ("event_cloud", row.event_cloud),
        ];

        let document: Map<String, Value> = columns
            .into_iter()
            .filter_map(|(key, value)| value.map(|value| (key.to_string(), value)))
            .collect();

        Self {
            slug: row.slug,
            theme_key: row.theme_key,
            document: Value::Object(document),
            content_hash: row.content_hash,
            compile_started_at: row.compile_started_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl CompiledContentRepo for PostgresRepositories {
    async fn load_compiled(&self, slug: &str) -> Result<Option<CachedContentRow>, RepoError> {
        let row = sqlx::query_as::<_, CompiledContentRow>(
            r#"
            SELECT slug, theme_key, profile, bride, groom, event, greetings, event_details,
                   love_story, gallery, wedding_gift, closing, music_settings,
                   client_profile, clouds, event_cloud,
                   content_hash, compile_started_at, updated_at
            FROM compiled_content
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(CachedContentRow::from))
    }

    async fn save_compiled(&self, entry: &CompiledContentEntry) -> Result<SaveOutcome, RepoError> {
        let content = &entry.content;
        let result = sqlx::query(
            r#"
            INSERT INTO compiled_content (
                slug, theme_key, profile, bride, groom, event, greetings, event_details,
                love_story, gallery, wedding_gift, closing, music_settings,
                content_hash, compile_started_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, now())
            ON CONFLICT (slug) DO UPDATE SET
                theme_key = EXCLUDED.theme_key,
                profile = EXCLUDED.profile,
                bride = EXCLUDED.bride,
                groom = EXCLUDED.groom,
                event = EXCLUDED.event,
                greetings = EXCLUDED.greetings,
                event_details = EXCLUDED.event_details,
                love_story = EXCLUDED.love_story,
                gallery = EXCLUDED.gallery,
                wedding_gift = EXCLUDED.wedding_gift,
                closing = EXCLUDED.closing,
                music_settings = EXCLUDED.music_settings,
                client_profile = NULL,
                clouds = NULL,
                event_cloud = NULL,
                content_hash = EXCLUDED.content_hash,
                compile_started_at = EXCLUDED.compile_started_at,
                updated_at = now()
            WHERE compiled_content.compile_started_at <= EXCLUDED.compile_started_at
            "#,
        )
        .bind(&entry.slug)
        .bind(&entry.theme_key)
        .bind(Json(&content.profile))
        .bind(Json(&content.bride))
        .bind(Json(&content.groom))
        .bind(Json(&content.event))
        .bind(Json(&content.greetings))
        .bind(Json(&content.event_details))
        .bind(Json(&content.love_story))
        .bind(Json(&content.gallery))
        .bind(Json(&content.wedding_gift))
        .bind(Json(&content.closing))
        .bind(Json(&content.music_settings))
        .bind(&entry.content_hash)
        .bind(entry.compile_started_at)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            Ok(SaveOutcome::SkippedStale)
        } else {
            Ok(SaveOutcome::Stored)
        }
    }
}
