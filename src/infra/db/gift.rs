use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{BankAccountParams, RepoError, UpsertWeddingGiftParams, WeddingGiftRepo},
    domain::entities::{BankAccountRecord, WeddingGiftSettingsRecord},
};

use super::{
    PostgresRepositories,
    children::{BANK_ACCOUNTS, apply_order, densify, lock_parent, next_display_order},
    map_sqlx_error,
};

const ACCOUNT_COLUMNS: &str =
    "id, registration_id, bank_name, account_number, account_holder, display_order, created_at";

#[derive(sqlx::FromRow)]
struct WeddingGiftRow {
    registration_id: Uuid,
    is_enabled: bool,
    title: Option<String>,
    description: Option<String>,
    recipient_name: Option<String>,
    recipient_address: Option<String>,
    updated_at: OffsetDateTime,
}

impl From<WeddingGiftRow> for WeddingGiftSettingsRecord {
    fn from(row: WeddingGiftRow) -> Self {
        Self {
            registration_id: row.registration_id,
            is_enabled: row.is_enabled,
            title: row.title,
            description: row.description,
            recipient_name: row.recipient_name,
            recipient_address: row.recipient_address,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct BankAccountRow {
    id: Uuid,
    registration_id: Uuid,
    bank_name: String,
    account_number: String,
    account_holder: String,
    display_order: i32,
    created_at: OffsetDateTime,
}

impl From<BankAccountRow> for BankAccountRecord {
    fn from(row: BankAccountRow) -> Self {
        Self {
            id: row.id,
            registration_id: row.registration_id,
            bank_name: row.bank_name,
            account_number: row.account_number,
            account_holder: row.account_holder,
            display_order: row.display_order,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl WeddingGiftRepo for PostgresRepositories {
    async fn get_settings(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<WeddingGiftSettingsRecord>, RepoError> {
        let row = sqlx::query_as::<_, WeddingGiftRow>(
            r#"
            SELECT registration_id, is_enabled, title, description, recipient_name,
                   recipient_address, updated_at
            FROM wedding_gift_settings
            WHERE registration_id = $1
            "#,
        )
        .bind(registration_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(WeddingGiftSettingsRecord::from))
    }

    async fn upsert_settings(
        &self,
        registration_id: Uuid,
        params: UpsertWeddingGiftParams,
    ) -> Result<WeddingGiftSettingsRecord, RepoError> {
        let row = sqlx::query_as::<_, WeddingGiftRow>(
            r#"
            INSERT INTO wedding_gift_settings
                (registration_id, is_enabled, title, description, recipient_name, recipient_address)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (registration_id) DO UPDATE SET
                is_enabled = EXCLUDED.is_enabled,
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                recipient_name = EXCLUDED.recipient_name,
                recipient_address = EXCLUDED.recipient_address,
                updated_at = now()
            RETURNING registration_id, is_enabled, title, description, recipient_name,
                      recipient_address, updated_at
            "#,
        )
        .bind(registration_id)
        .bind(params.is_enabled)
        .bind(params.title)
        .bind(params.description)
        .bind(params.recipient_name)
        .bind(params.recipient_address)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn list_accounts(
        &self,
        registration_id: Uuid,
    ) -> Result<Vec<BankAccountRecord>, RepoError> {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM bank_accounts \
             WHERE registration_id = $1 ORDER BY display_order, created_at"
        );
        let rows = sqlx::query_as::<_, BankAccountRow>(&sql)
            .bind(registration_id)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(BankAccountRecord::from).collect())
    }

    async fn create_account(
        &self,
        registration_id: Uuid,
        params: BankAccountParams,
    ) -> Result<BankAccountRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        lock_parent(&mut tx, registration_id).await?;
        let display_order = next_display_order(&mut tx, BANK_ACCOUNTS, registration_id).await?;

        let sql = format!(
            "INSERT INTO bank_accounts \
                (id, registration_id, bank_name, account_number, account_holder, display_order) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, BankAccountRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(registration_id)
            .bind(params.bank_name)
            .bind(params.account_number)
            .bind(params.account_holder)
            .bind(display_order)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn update_account(
        &self,
        registration_id: Uuid,
        account_id: Uuid,
        params: BankAccountParams,
    ) -> Result<BankAccountRecord, RepoError> {
        let sql = format!(
            "UPDATE bank_accounts \
             SET bank_name = $3, account_number = $4, account_holder = $5 \
             WHERE registration_id = $1 AND id = $2 \
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, BankAccountRow>(&sql)
            .bind(registration_id)
            .bind(account_id)
            .bind(params.bank_name)
            .bind(params.account_number)
            .bind(params.account_holder)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?
            .ok_or(RepoError::NotFound)?;

        Ok(row.into())
    }

    async fn delete_account(
        &self,
        registration_id: Uuid,
        account_id: Uuid,
    ) -> Result<(), RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        lock_parent(&mut tx, registration_id).await?;

        let result = sqlx::query("DELETE FROM bank_accounts WHERE registration_id = $1 AND id = $2")
            .bind(registration_id)
            .bind(account_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        densify(&mut tx, BANK_ACCOUNTS, registration_id).await?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn reorder_accounts(
        &self,
        registration_id: Uuid,
        ordered_ids: &[Uuid],
    ) -> Result<Vec<BankAccountRecord>, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        lock_parent(&mut tx, registration_id).await?;
        apply_order(&mut tx, BANK_ACCOUNTS, registration_id, ordered_ids).await?;
        tx.commit().await.map_err(map_sqlx_error)?;

        self.list_accounts(registration_id).await
    }
}
