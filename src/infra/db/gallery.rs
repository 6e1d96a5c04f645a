use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{GalleryImageParams, GalleryRepo, RepoError, UpsertGalleryParams},
    domain::entities::{GalleryImageRecord, GallerySettingsRecord},
};

use super::{
    PostgresRepositories,
    children::{GALLERY_IMAGES, apply_order, densify, lock_parent, next_display_order},
    map_sqlx_error,
};

const IMAGE_COLUMNS: &str = "id, registration_id, image_url, caption, display_order, created_at";

#[derive(sqlx::FromRow)]
struct GallerySettingsRow {
    registration_id: Uuid,
    is_enabled: bool,
    title: Option<String>,
    updated_at: OffsetDateTime,
}

impl From<GallerySettingsRow> for GallerySettingsRecord {
    fn from(row: GallerySettingsRow) -> Self {
        Self {
            registration_id: row.registration_id,
            is_enabled: row.is_enabled,
            title: row.title,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct GalleryImageRow {
    id: Uuid,
    registration_id: Uuid,
    image_url: String,
    caption: Option<String>,
    display_order: i32,
    created_at: OffsetDateTime,
}

impl From<GalleryImageRow> for GalleryImageRecord {
    fn from(row: GalleryImageRow) -> Self {
        Self {
            id: row.id,
            registration_id: row.registration_id,
            image_url: row.image_url,
            caption: row.caption,
            display_order: row.display_order,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl GalleryRepo for PostgresRepositories {
    async fn get_settings(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<GallerySettingsRecord>, RepoError> {
        let row = sqlx::query_as::<_, GallerySettingsRow>(
            r#"
            SELECT registration_id, is_enabled, title, updated_at
            FROM gallery_settings
            WHERE registration_id = $1
            "#,
        )
        .bind(registration_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(GallerySettingsRecord::from))
    }

    async fn upsert_settings(
        &self,
        registration_id: Uuid,
        params: UpsertGalleryParams,
    ) -> Result<GallerySettingsRecord, RepoError> {
        let row = sqlx::query_as::<_, GallerySettingsRow>(
            r#"
            INSERT INTO gallery_settings (registration_id, is_enabled, title)
            VALUES ($1, $2, $3)
            ON CONFLICT (registration_id) DO UPDATE SET
                is_enabled = EXCLUDED.is_enabled,
                title = EXCLUDED.title,
                updated_at = now()
            RETURNING registration_id, is_enabled, title, updated_at
            "#,
        )
        .bind(registration_id)
        .bind(params.is_enabled)
        .bind(params.title)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn list_images(
        &self,
        registration_id: Uuid,
    ) -> Result<Vec<GalleryImageRecord>, RepoError> {
        let sql = format!(
            "SELECT {IMAGE_COLUMNS} FROM gallery_images \
             WHERE registration_id = $1 ORDER BY display_order, created_at"
        );
        let rows = sqlx::query_as::<_, GalleryImageRow>(&sql)
            .bind(registration_id)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(GalleryImageRecord::from).collect())
    }

    async fn create_image(
        &self,
        registration_id: Uuid,
        params: GalleryImageParams,
    ) -> Result<GalleryImageRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        lock_parent(&mut tx, registration_id).await?;
        let display_order = next_display_order(&mut tx, GALLERY_IMAGES, registration_id).await?;

        let sql = format!(
            "INSERT INTO gallery_images (id, registration_id, image_url, caption, display_order) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {IMAGE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, GalleryImageRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(registration_id)
            .bind(params.image_url)
            .bind(params.caption)
            .bind(display_order)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn update_image(
        &self,
        registration_id: Uuid,
        image_id: Uuid,
        params: GalleryImageParams,
    ) -> Result<GalleryImageRecord, RepoError> {
        let sql = format!(
            "UPDATE gallery_images SET image_url = $3, caption = $4 \
             WHERE registration_id = $1 AND id = $2 \
             RETURNING {IMAGE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, GalleryImageRow>(&sql)
            .bind(registration_id)
            .bind(image_id)
            .bind(params.image_url)
            .bind(params.caption)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?
            .ok_or(RepoError::NotFound)?;

        Ok(row.into())
    }

    async fn delete_image(&self, registration_id: Uuid, image_id: Uuid) -> Result<(), RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        lock_parent(&mut tx, registration_id).await?;

        let result = sqlx::query("DELETE FROM gallery_images WHERE registration_id = $1 AND id = $2")
            .bind(registration_id)
            .bind(image_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        densify(&mut tx, GALLERY_IMAGES, registration_id).await?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn reorder_images(
        &self,
        registration_id: Uuid,
        ordered_ids: &[Uuid],
    ) -> Result<Vec<GalleryImageRecord>, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        lock_parent(&mut tx, registration_id).await?;
        apply_order(&mut tx, GALLERY_IMAGES, registration_id, ordered_ids).await?;
        tx.commit().await.map_err(map_sqlx_error)?;

        self.list_images(registration_id).await
    }
}
