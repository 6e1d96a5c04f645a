//! Ordering helpers shared by the ordered child collections
//! (`love_story_blocks`, `gallery_images`, `bank_accounts`).

use sqlx::PgConnection;
use uuid::Uuid;

use crate::application::repos::RepoError;
use crate::domain::validate::validate_reorder;

use super::map_sqlx_error;

#[derive(Debug, Clone, Copy)]
pub(super) struct ChildTable {
    pub name: &'static str,
    pub entity: &'static str,
}

pub(super) const LOVE_STORY_BLOCKS: ChildTable = ChildTable {
    name: "love_story_blocks",
    entity: "love story block",
};

pub(super) const GALLERY_IMAGES: ChildTable = ChildTable {
    name: "gallery_images",
    entity: "gallery image",
};

pub(super) const BANK_ACCOUNTS: ChildTable = ChildTable {
    name: "bank_accounts",
    entity: "bank account",
};

/// Locks the parent registration row so concurrent child writes serialize.
pub(super) async fn lock_parent(
    conn: &mut PgConnection,
    registration_id: Uuid,
) -> Result<(), RepoError> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM registrations WHERE id = $1 FOR UPDATE")
        .bind(registration_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_sqlx_error)?
        .ok_or(RepoError::NotFound)?;
    Ok(())
}

pub(super) async fn next_display_order(
    conn: &mut PgConnection,
    table: ChildTable,
    registration_id: Uuid,
) -> Result<i32, RepoError> {
    let sql = format!(
        "SELECT COALESCE(MAX(display_order) + 1, 0) FROM {} WHERE registration_id = $1",
        table.name
    );
    sqlx::query_scalar::<_, i32>(&sql)
        .bind(registration_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(map_sqlx_error)
}

/// Rewrites `display_order` as `0..n`, keeping the current relative order.
pub(super) async fn densify(
    conn: &mut PgConnection,
    table: ChildTable,
    registration_id: Uuid,
) -> Result<(), RepoError> {
    let sql = format!(
        r#"
        UPDATE {table} AS child
        SET display_order = (ranked.position - 1)::INTEGER
        FROM (
            SELECT id, ROW_NUMBER() OVER (ORDER BY display_order, created_at, id) AS position
            FROM {table}
            WHERE registration_id = $1
        ) AS ranked
        WHERE child.id = ranked.id
        "#,
        table = table.name
    );
    sqlx::query(&sql)
        .bind(registration_id)
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;
    Ok(())
}

/// Applies `ordered_ids` as the new order after checking it names exactly
/// the current children.
pub(super) async fn apply_order(
    conn: &mut PgConnection,
    table: ChildTable,
    registration_id: Uuid,
    ordered_ids: &[Uuid],
) -> Result<(), RepoError> {
    let sql = format!(
        "SELECT id FROM {} WHERE registration_id = $1 ORDER BY display_order",
        table.name
    );
    let current = sqlx::query_scalar::<_, Uuid>(&sql)
        .bind(registration_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

    validate_reorder(&current, ordered_ids, table.entity)?;

    let sql = format!(
        r#"
        UPDATE {} AS child
        SET display_order = (ordered.position - 1)::INTEGER
        FROM UNNEST($2::UUID[]) WITH ORDINALITY AS ordered(id, position)
        WHERE child.id = ordered.id AND child.registration_id = $1
        "#,
        table.name
    );
    sqlx::query(&sql)
        .bind(registration_id)
        .bind(ordered_ids)
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;
    Ok(())
}
