//! Store Repository

use super::RepoResult;
use shared::models::{Store, StoreUpdate};
use sqlx::SqliteConnection;

/// Insert a store (id comes from the caller, never from the database)
pub async fn insert(conn: &mut SqliteConnection, store: &Store) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO stores (id, name, address, is_open, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&store.id)
    .bind(&store.name)
    .bind(&store.address)
    .bind(store.is_open)
    .bind(&store.created_at)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn find_all(conn: &mut SqliteConnection) -> RepoResult<Vec<Store>> {
    let stores = sqlx::query_as::<_, Store>("SELECT * FROM stores ORDER BY id")
        .fetch_all(conn)
        .await?;
    Ok(stores)
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: &str) -> RepoResult<Option<Store>> {
    let store = sqlx::query_as::<_, Store>("SELECT * FROM stores WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(store)
}

pub async fn find_open(conn: &mut SqliteConnection) -> RepoResult<Vec<Store>> {
    let stores = sqlx::query_as::<_, Store>("SELECT * FROM stores WHERE is_open = 1 ORDER BY name")
        .fetch_all(conn)
        .await?;
    Ok(stores)
}

pub async fn update(
    conn: &mut SqliteConnection,
    id: &str,
    data: &StoreUpdate,
) -> RepoResult<Option<Store>> {
    let store = sqlx::query_as::<_, Store>(
        "UPDATE stores SET \
             name = COALESCE(?, name), \
             address = COALESCE(?, address), \
             is_open = COALESCE(?, is_open) \
         WHERE id = ? RETURNING *",
    )
    .bind(&data.name)
    .bind(&data.address)
    .bind(data.is_open)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(store)
}
