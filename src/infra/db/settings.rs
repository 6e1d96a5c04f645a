//! Single-row section settings keyed by registration.

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{
        ClosingRepo, GreetingsRepo, MusicRepo, RepoError, ThemeRepo, UpsertClosingParams,
        UpsertGreetingParams, UpsertMusicParams, UpsertThemeParams,
    },
    domain::entities::{
        ClosingSettingsRecord, GreetingSettingsRecord, MusicSettingsRecord, ThemeSettingsRecord,
    },
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct GreetingRow {
    registration_id: Uuid,
    is_enabled: bool,
    title: Option<String>,
    message: Option<String>,
    quote_text: Option<String>,
    quote_source: Option<String>,
    updated_at: OffsetDateTime,
}

impl From<GreetingRow> for GreetingSettingsRecord {
    fn from(row: GreetingRow) -> Self {
        Self {
            registration_id: row.registration_id,
            is_enabled: row.is_enabled,
            title: row.title,
            message: row.message,
            quote_text: row.quote_text,
            quote_source: row.quote_source,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl GreetingsRepo for PostgresRepositories {
    async fn get_settings(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<GreetingSettingsRecord>, RepoError> {
        let row = sqlx::query_as::<_, GreetingRow>(
            r#"
            SELECT registration_id, is_enabled, title, message, quote_text, quote_source, updated_at
            FROM greeting_settings
            WHERE registration_id = $1
            "#,
        )
        .bind(registration_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(GreetingSettingsRecord::from))
    }

    async fn upsert_settings(
        &self,
        registration_id: Uuid,
        params: UpsertGreetingParams,
    ) -> Result<GreetingSettingsRecord, RepoError> {
        let row = sqlx::query_as::<_, GreetingRow>(
            r#"
            INSERT INTO greeting_settings
                (registration_id, is_enabled, title, message, quote_text, quote_source)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (registration_id) DO UPDATE SET
                is_enabled = EXCLUDED.is_enabled,
                title = EXCLUDED.title,
                message = EXCLUDED.message,
                quote_text = EXCLUDED.quote_text,
                quote_source = EXCLUDED.quote_source,
                updated_at = now()
            RETURNING registration_id, is_enabled, title, message, quote_text, quote_source, updated_at
            "#,
        )
        .bind(registration_id)
        .bind(params.is_enabled)
        .bind(params.title)
        .bind(params.message)
        .bind(params.quote_text)
        .bind(params.quote_source)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }
}

#[derive(sqlx::FromRow)]
struct ClosingRow {
    registration_id: Uuid,
    is_enabled: bool,
    title: Option<String>,
    message: Option<String>,
    background_image_url: Option<String>,
    overlay_opacity: Option<String>,
    updated_at: OffsetDateTime,
}

impl From<ClosingRow> for ClosingSettingsRecord {
    fn from(row: ClosingRow) -> Self {
        Self {
            registration_id: row.registration_id,
            is_enabled: row.is_enabled,
            title: row.title,
            message: row.message,
            background_image_url: row.background_image_url,
            overlay_opacity: row.overlay_opacity,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ClosingRepo for PostgresRepositories {
    async fn get_settings(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<ClosingSettingsRecord>, RepoError> {
        let row = sqlx::query_as::<_, ClosingRow>(
            r#"
            SELECT registration_id, is_enabled, title, message, background_image_url,
                   overlay_opacity, updated_at
            FROM closing_settings
            WHERE registration_id = $1
            "#,
        )
        .bind(registration_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ClosingSettingsRecord::from))
    }

    async fn upsert_settings(
        &self,
        registration_id: Uuid,
        params: UpsertClosingParams,
    ) -> Result<ClosingSettingsRecord, RepoError> {
        let row = sqlx::query_as::<_, ClosingRow>(
            r#"
            INSERT INTO closing_settings
                (registration_id, is_enabled, title, message, background_image_url, overlay_opacity)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (registration_id) DO UPDATE SET
                is_enabled = EXCLUDED.is_enabled,
                title = EXCLUDED.title,
                message = EXCLUDED.message,
                background_image_url = EXCLUDED.background_image_url,
                overlay_opacity = EXCLUDED.overlay_opacity,
                updated_at = now()
            RETURNING registration_id, is_enabled, title, message, background_image_url,
                      overlay_opacity, updated_at
            "#,
        )
        .bind(registration_id)
        .bind(params.is_enabled)
        .bind(params.title)
        .bind(params.message)
        .bind(params.background_image_url)
        .bind(params.overlay_opacity)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }
}

#[derive(sqlx::FromRow)]
struct MusicRow {
    registration_id: Uuid,
    is_enabled: bool,
    audio_url: Option<String>,
    title: Option<String>,
    autoplay: bool,
    loop_playback: bool,
    updated_at: OffsetDateTime,
}

impl From<MusicRow> for MusicSettingsRecord {
    fn from(row: MusicRow) -> Self {
        Self {
            registration_id: row.registration_id,
            is_enabled: row.is_enabled,
            audio_url: row.audio_url,
            title: row.title,
            autoplay: row.autoplay,
            loop_playback: row.loop_playback,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl MusicRepo for PostgresRepositories {
    async fn get_settings(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<MusicSettingsRecord>, RepoError> {
        let row = sqlx::query_as::<_, MusicRow>(
            r#"
            SELECT registration_id, is_enabled, audio_url, title, autoplay, loop_playback, updated_at
            FROM music_settings
            WHERE registration_id = $1
            "#,
        )
        .bind(registration_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(MusicSettingsRecord::from))
    }

    async fn upsert_settings(
        &self,
        registration_id: Uuid,
        params: UpsertMusicParams,
    ) -> Result<MusicSettingsRecord, RepoError> {
        let row = sqlx::query_as::<_, MusicRow>(
            r#"
            INSERT INTO music_settings
                (registration_id, is_enabled, audio_url, title, autoplay, loop_playback)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (registration_id) DO UPDATE SET
                is_enabled = EXCLUDED.is_enabled,
                audio_url = EXCLUDED.audio_url,
                title = EXCLUDED.title,
                autoplay = EXCLUDED.autoplay,
                loop_playback = EXCLUDED.loop_playback,
                updated_at = now()
            RETURNING registration_id, is_enabled, audio_url, title, autoplay, loop_playback, updated_at
            "#,
        )
        .bind(registration_id)
        .bind(params.is_enabled)
        .bind(params.audio_url)
        .bind(params.title)
        .bind(params.autoplay)
        .bind(params.loop_playback)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }
}

#[derive(sqlx::FromRow)]
struct ThemeRow {
    registration_id: Uuid,
    theme_key: String,
    locale: Option<String>,
    countdown_enabled: bool,
    rsvp_enabled: bool,
    guestbook_enabled: bool,
    updated_at: OffsetDateTime,
}

impl From<ThemeRow> for ThemeSettingsRecord {
    fn from(row: ThemeRow) -> Self {
        Self {
            registration_id: row.registration_id,
            theme_key: row.theme_key,
            locale: row.locale,
            countdown_enabled: row.countdown_enabled,
            rsvp_enabled: row.rsvp_enabled,
            guestbook_enabled: row.guestbook_enabled,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ThemeRepo for PostgresRepositories {
    async fn get_settings(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<ThemeSettingsRecord>, RepoError> {
        let row = sqlx::query_as::<_, ThemeRow>(
            r#"
            SELECT registration_id, theme_key, locale, countdown_enabled, rsvp_enabled,
                   guestbook_enabled, updated_at
            FROM theme_settings
            WHERE registration_id = $1
            "#,
        )
        .bind(registration_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ThemeSettingsRecord::from))
    }

    async fn upsert_settings(
        &self,
        registration_id: Uuid,
        params: UpsertThemeParams,
    ) -> Result<ThemeSettingsRecord, RepoError> {
        let row = sqlx::query_as::<_, ThemeRow>(
            r#"
            INSERT INTO theme_settings
                (registration_id, theme_key, locale, countdown_enabled, rsvp_enabled, guestbook_enabled)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (registration_id) DO UPDATE SET
                theme_key = EXCLUDED.theme_key,
                locale = EXCLUDED.locale,
                countdown_enabled = EXCLUDED.countdown_enabled,
                rsvp_enabled = EXCLUDED.rsvp_enabled,
                guestbook_enabled = EXCLUDED.guestbook_enabled,
                updated_at = now()
            RETURNING registration_id, theme_key, locale, countdown_enabled, rsvp_enabled,
                      guestbook_enabled, updated_at
            "#,
        )
        .bind(registration_id)
        .bind(params.theme_key)
        .bind(params.locale)
        .bind(params.countdown_enabled)
        .bind(params.rsvp_enabled)
        .bind(params.guestbook_enabled)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }
}
