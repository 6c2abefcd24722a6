//! Combo Repository
//!
//! A combo row plus its composition in `combo_items`. Updates that touch
//! the composition replace the whole item set; callers run them inside a
//! transaction.

use super::RepoResult;
use shared::models::{Combo, ComboItem};
use sqlx::SqliteConnection;

/// Combo columns without the composition
#[derive(Debug, sqlx::FromRow)]
struct ComboRow {
    id: String,
    store_id: String,
    name: String,
    description: Option<String>,
    price: i64,
    is_available: bool,
}

impl ComboRow {
    fn into_combo(self, items: Vec<ComboItem>) -> Combo {
        Combo {
            id: self.id,
            store_id: self.store_id,
            name: self.name,
            description: self.description,
            price: self.price,
            is_available: self.is_available,
            items,
        }
    }
}

pub async fn insert(conn: &mut SqliteConnection, combo: &Combo) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO combos (id, store_id, name, description, price, is_available) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&combo.id)
    .bind(&combo.store_id)
    .bind(&combo.name)
    .bind(&combo.description)
    .bind(combo.price)
    .bind(combo.is_available)
    .execute(&mut *conn)
    .await?;

    insert_items(conn, &combo.id, &combo.items).await
}

async fn insert_items(
    conn: &mut SqliteConnection,
    combo_id: &str,
    items: &[ComboItem],
) -> RepoResult<()> {
    for (position, item) in items.iter().enumerate() {
        sqlx::query(
            "INSERT INTO combo_items (combo_id, position, store_product_id, quantity) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(combo_id)
        .bind(position as i64)
        .bind(&item.store_product_id)
        .bind(item.quantity)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn find_items(conn: &mut SqliteConnection, combo_id: &str) -> RepoResult<Vec<ComboItem>> {
    let items = sqlx::query_as::<_, ComboItem>(
        "SELECT store_product_id, quantity FROM combo_items WHERE combo_id = ? ORDER BY position",
    )
    .bind(combo_id)
    .fetch_all(conn)
    .await?;
    Ok(items)
}

pub async fn find_by_id(
    conn: &mut SqliteConnection,
    store_id: &str,
    id: &str,
) -> RepoResult<Option<Combo>> {
    let row = sqlx::query_as::<_, ComboRow>("SELECT * FROM combos WHERE id = ? AND store_id = ?")
        .bind(id)
        .bind(store_id)
        .fetch_optional(&mut *conn)
        .await?;

    match row {
        Some(row) => {
            let items = find_items(conn, &row.id).await?;
            Ok(Some(row.into_combo(items)))
        }
        None => Ok(None),
    }
}

pub async fn find_by_store(conn: &mut SqliteConnection, store_id: &str) -> RepoResult<Vec<Combo>> {
    let rows = sqlx::query_as::<_, ComboRow>("SELECT * FROM combos WHERE store_id = ? ORDER BY name")
        .bind(store_id)
        .fetch_all(&mut *conn)
        .await?;

    let mut combos = Vec::with_capacity(rows.len());
    for row in rows {
        let items = find_items(conn, &row.id).await?;
        combos.push(row.into_combo(items));
    }
    Ok(combos)
}

/// Available combos of a store, for the storefront menu
pub async fn find_available(
    conn: &mut SqliteConnection,
    store_id: &str,
) -> RepoResult<Vec<Combo>> {
    let rows = sqlx::query_as::<_, ComboRow>(
        "SELECT * FROM combos WHERE store_id = ? AND is_available = 1 ORDER BY name",
    )
    .bind(store_id)
    .fetch_all(&mut *conn)
    .await?;

    let mut combos = Vec::with_capacity(rows.len());
    for row in rows {
        let items = find_items(conn, &row.id).await?;
        combos.push(row.into_combo(items));
    }
    Ok(combos)
}

/// Update scalar fields; when `items` is Some the composition is replaced
pub async fn update(
    conn: &mut SqliteConnection,
    store_id: &str,
    id: &str,
    data: &shared::models::ComboUpdate,
) -> RepoResult<Option<Combo>> {
    let row = sqlx::query_as::<_, ComboRow>(
        "UPDATE combos SET \
             name = COALESCE(?, name), \
             description = COALESCE(?, description), \
             price = COALESCE(?, price), \
             is_available = COALESCE(?, is_available) \
         WHERE id = ? AND store_id = ? RETURNING *",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.is_available)
    .bind(id)
    .bind(store_id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    if let Some(items) = &data.items {
        sqlx::query("DELETE FROM combo_items WHERE combo_id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        insert_items(conn, id, items).await?;
    }

    let items = find_items(conn, id).await?;
    Ok(Some(row.into_combo(items)))
}

pub async fn delete(conn: &mut SqliteConnection, store_id: &str, id: &str) -> RepoResult<bool> {
    let res = sqlx::query("DELETE FROM combos WHERE id = ? AND store_id = ?")
        .bind(id)
        .bind(store_id)
        .execute(conn)
        .await?;
    Ok(res.rows_affected() > 0)
}
