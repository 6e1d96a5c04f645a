use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{LoveStoryBlockParams, LoveStoryRepo, RepoError, UpsertLoveStoryParams},
    domain::entities::{LoveStoryBlockRecord, LoveStorySettingsRecord},
};

use super::{
    PostgresRepositories,
    children::{LOVE_STORY_BLOCKS, apply_order, densify, lock_parent, next_display_order},
    map_sqlx_error,
};

const BLOCK_COLUMNS: &str =
    "id, registration_id, title, date_label, body, image_url, display_order, created_at";

#[derive(sqlx::FromRow)]
struct LoveStorySettingsRow {
    registration_id: Uuid,
    is_enabled: bool,
    main_title: Option<String>,
    background_image_url: Option<String>,
    overlay_opacity: Option<String>,
    updated_at: OffsetDateTime,
}

impl From<LoveStorySettingsRow> for LoveStorySettingsRecord {
    fn from(row: LoveStorySettingsRow) -> Self {
        Self {
            registration_id: row.registration_id,
            is_enabled: row.is_enabled,
            main_title: row.main_title,
            background_image_url: row.background_image_url,
            overlay_opacity: row.overlay_opacity,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct LoveStoryBlockRow {
    id: Uuid,
    registration_id: Uuid,
    title: String,
    date_label: Option<String>,
    body: String,
    image_url: Option<String>,
    display_order: i32,
    created_at: OffsetDateTime,
}

impl From<LoveStoryBlockRow> for LoveStoryBlockRecord {
    fn from(row: LoveStoryBlockRow) -> Self {
        Self {
            id: row.id,
            registration_id: row.registration_id,
            title: row.title,
            date_label: row.date_label,
            body: row.body,
            image_url: row.image_url,
            display_order: row.display_order,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl LoveStoryRepo for PostgresRepositories {
    async fn get_settings(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<LoveStorySettingsRecord>, RepoError> {
        let row = sqlx::query_as::<_, LoveStorySettingsRow>(
            r#"
            SELECT registration_id, is_enabled, main_title, background_image_url,
                   overlay_opacity, updated_at
            FROM love_story_settings
            WHERE registration_id = $1
            "#,
        )
        .bind(registration_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(LoveStorySettingsRecord::from))
    }

    async fn upsert_settings(
        &self,
        registration_id: Uuid,
        params: UpsertLoveStoryParams,
    ) -> Result<LoveStorySettingsRecord, RepoError> {
        let row = sqlx::query_as::<_, LoveStorySettingsRow>(
            r#"
            INSERT INTO love_story_settings
                (registration_id, is_enabled, main_title, background_image_url, overlay_opacity)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (registration_id) DO UPDATE SET
                is_enabled = EXCLUDED.is_enabled,
                main_title = EXCLUDED.main_title,
                background_image_url = EXCLUDED.background_image_url,
                overlay_opacity = EXCLUDED.overlay_opacity,
                updated_at = now()
            RETURNING registration_id, is_enabled, main_title, background_image_url,
                      overlay_opacity, updated_at
            "#,
        )
        .bind(registration_id)
        .bind(params.is_enabled)
        .bind(params.main_title)
        .bind(params.background_image_url)
        .bind(params.overlay_opacity)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn list_blocks(
        &self,
        registration_id: Uuid,
    ) -> Result<Vec<LoveStoryBlockRecord>, RepoError> {
        let sql = format!(
            "SELECT {BLOCK_COLUMNS} FROM love_story_blocks \
             WHERE registration_id = $1 ORDER BY display_order, created_at"
        );
        let rows = sqlx::query_as::<_, LoveStoryBlockRow>(&sql)
            .bind(registration_id)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(LoveStoryBlockRecord::from).collect())
    }

    async fn create_block(
        &self,
        registration_id: Uuid,
        params: LoveStoryBlockParams,
    ) -> Result<LoveStoryBlockRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        lock_parent(&mut tx, registration_id).await?;
        let display_order = next_display_order(&mut tx, LOVE_STORY_BLOCKS, registration_id).await?;

        let sql = format!(
            "INSERT INTO love_story_blocks \
                (id, registration_id, title, date_label, body, image_url, display_order) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {BLOCK_COLUMNS}"
        );
        let row = sqlx::query_as::<_, LoveStoryBlockRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(registration_id)
            .bind(params.title)
            .bind(params.date_label)
            .bind(params.body)
            .bind(params.image_url)
            .bind(display_order)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn update_block(
        &self,
        registration_id: Uuid,
        block_id: Uuid,
        params: LoveStoryBlockParams,
    ) -> Result<LoveStoryBlockRecord, RepoError> {
        let sql = format!(
            "UPDATE love_story_blocks \
             SET title = $3, date_label = $4, body = $5, image_url = $6 \
             WHERE registration_id = $1 AND id = $2 \
             RETURNING {BLOCK_COLUMNS}"
        );
        let row = sqlx::query_as::<_, LoveStoryBlockRow>(&sql)
            .bind(registration_id)
            .bind(block_id)
            .bind(params.title)
            .bind(params.date_label)
            .bind(params.body)
            .bind(params.image_url)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?
            .ok_or(RepoError::NotFound)?;

        Ok(row.into())
    }

    async fn delete_block(&self, registration_id: Uuid, block_id: Uuid) -> Result<(), RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        lock_parent(&mut tx, registration_id).await?;

        let result =
            sqlx::query("DELETE FROM love_story_blocks WHERE registration_id = $1 AND id = $2")
                .bind(registration_id)
                .bind(block_id)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        densify(&mut tx, LOVE_STORY_BLOCKS, registration_id).await?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn reorder_blocks(
        &self,
        registration_id: Uuid,
        ordered_ids: &[Uuid],
    ) -> Result<Vec<LoveStoryBlockRecord>, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        lock_parent(&mut tx, registration_id).await?;
        apply_order(&mut tx, LOVE_STORY_BLOCKS, registration_id, ordered_ids).await?;
        tx.commit().await.map_err(map_sqlx_error)?;

        self.list_blocks(registration_id).await
    }
}
