//! Category Repository

use super::RepoResult;
use shared::models::{Category, CategoryUpdate};
use sqlx::SqliteConnection;

pub async fn insert(conn: &mut SqliteConnection, category: &Category) -> RepoResult<()> {
    sqlx::query("INSERT INTO categories (id, store_id, name, sort_order) VALUES (?, ?, ?, ?)")
        .bind(&category.id)
        .bind(&category.store_id)
        .bind(&category.name)
        .bind(category.sort_order)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn find_by_id(
    conn: &mut SqliteConnection,
    store_id: &str,
    id: &str,
) -> RepoResult<Option<Category>> {
    let category =
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ? AND store_id = ?")
            .bind(id)
            .bind(store_id)
            .fetch_optional(conn)
            .await?;
    Ok(category)
}

/// All categories of a store in menu order (sort_order, then name)
pub async fn find_by_store(
    conn: &mut SqliteConnection,
    store_id: &str,
) -> RepoResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT * FROM categories WHERE store_id = ? ORDER BY sort_order, name",
    )
    .bind(store_id)
    .fetch_all(conn)
    .await?;
    Ok(categories)
}

pub async fn update(
    conn: &mut SqliteConnection,
    store_id: &str,
    id: &str,
    data: &CategoryUpdate,
) -> RepoResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(
        "UPDATE categories SET \
             name = COALESCE(?, name), \
             sort_order = COALESCE(?, sort_order) \
         WHERE id = ? AND store_id = ? RETURNING *",
    )
    .bind(&data.name)
    .bind(data.sort_order)
    .bind(id)
    .bind(store_id)
    .fetch_optional(conn)
    .await?;
    Ok(category)
}

pub async fn delete(conn: &mut SqliteConnection, store_id: &str, id: &str) -> RepoResult<bool> {
    let res = sqlx::query("DELETE FROM categories WHERE id = ? AND store_id = ?")
        .bind(id)
        .bind(store_id)
        .execute(conn)
        .await?;
    Ok(res.rows_affected() > 0)
}
