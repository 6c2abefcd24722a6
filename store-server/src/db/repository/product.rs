//! Product and StoreProduct Repository
//!
//! Covers the global product catalog, the store-scoped instances orders
//! reference, the category membership join and the directed add-on
//! relation.

use super::RepoResult;
use shared::models::{Product, ProductUpdate, StoreProduct, StoreProductUpdate};
use sqlx::SqliteConnection;

// =============================================================================
// Global products
// =============================================================================

pub async fn insert(conn: &mut SqliteConnection, product: &Product) -> RepoResult<()> {
    sqlx::query("INSERT INTO products (id, name, description, image_url) VALUES (?, ?, ?, ?)")
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.image_url)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn find_all(conn: &mut SqliteConnection) -> RepoResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY name")
        .fetch_all(conn)
        .await?;
    Ok(products)
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: &str) -> RepoResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(product)
}

pub async fn update(
    conn: &mut SqliteConnection,
    id: &str,
    data: &ProductUpdate,
) -> RepoResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        "UPDATE products SET \
             name = COALESCE(?, name), \
             description = COALESCE(?, description), \
             image_url = COALESCE(?, image_url) \
         WHERE id = ? RETURNING *",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.image_url)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(product)
}

// =============================================================================
// Store products
// =============================================================================

pub async fn insert_store_product(
    conn: &mut SqliteConnection,
    sp: &StoreProduct,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO store_products (id, store_id, product_id, name, price, is_available, stock) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&sp.id)
    .bind(&sp.store_id)
    .bind(&sp.product_id)
    .bind(&sp.name)
    .bind(sp.price)
    .bind(sp.is_available)
    .bind(sp.stock)
    .execute(conn)
    .await?;
    Ok(())
}

/// Find a store product scoped to one store; cross-store ids resolve to None
pub async fn find_store_product(
    conn: &mut SqliteConnection,
    store_id: &str,
    id: &str,
) -> RepoResult<Option<StoreProduct>> {
    let sp = sqlx::query_as::<_, StoreProduct>(
        "SELECT * FROM store_products WHERE id = ? AND store_id = ?",
    )
    .bind(id)
    .bind(store_id)
    .fetch_optional(conn)
    .await?;
    Ok(sp)
}

pub async fn find_store_products(
    conn: &mut SqliteConnection,
    store_id: &str,
) -> RepoResult<Vec<StoreProduct>> {
    let sps = sqlx::query_as::<_, StoreProduct>(
        "SELECT * FROM store_products WHERE store_id = ? ORDER BY name",
    )
    .bind(store_id)
    .fetch_all(conn)
    .await?;
    Ok(sps)
}

pub async fn update_store_product(
    conn: &mut SqliteConnection,
    store_id: &str,
    id: &str,
    data: &StoreProductUpdate,
) -> RepoResult<Option<StoreProduct>> {
    // stock is Option<Option<_>>: absent = keep, Some(None) = clear tracking
    let sp = match data.stock {
        None => {
            sqlx::query_as::<_, StoreProduct>(
                "UPDATE store_products SET \
                     name = COALESCE(?, name), \
                     price = COALESCE(?, price), \
                     is_available = COALESCE(?, is_available) \
                 WHERE id = ? AND store_id = ? RETURNING *",
            )
            .bind(&data.name)
            .bind(data.price)
            .bind(data.is_available)
            .bind(id)
            .bind(store_id)
            .fetch_optional(conn)
            .await?
        }
        Some(stock) => {
            sqlx::query_as::<_, StoreProduct>(
                "UPDATE store_products SET \
                     name = COALESCE(?, name), \
                     price = COALESCE(?, price), \
                     is_available = COALESCE(?, is_available), \
                     stock = ? \
                 WHERE id = ? AND store_id = ? RETURNING *",
            )
            .bind(&data.name)
            .bind(data.price)
            .bind(data.is_available)
            .bind(stock)
            .bind(id)
            .bind(store_id)
            .fetch_optional(conn)
            .await?
        }
    };
    Ok(sp)
}

/// Decrement tracked stock after a sale; untracked stock is left alone
/// Take `quantity` units out of stock, guarding against oversell.
///
/// Returns `false` when the product tracks stock and fewer than
/// `quantity` units remain; untracked rows (NULL stock) always succeed
/// and stay untracked. The guard lives in the UPDATE itself so repeated
/// decrements within one transaction see each other's effect.
pub async fn decrement_stock(
    conn: &mut SqliteConnection,
    id: &str,
    quantity: i64,
) -> RepoResult<bool> {
    let result = sqlx::query(
        "UPDATE store_products SET stock = stock - ? \
         WHERE id = ? AND (stock IS NULL OR stock >= ?)",
    )
    .bind(quantity)
    .bind(id)
    .bind(quantity)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Restore tracked stock after a cancellation
pub async fn restore_stock(
    conn: &mut SqliteConnection,
    id: &str,
    quantity: i64,
) -> RepoResult<()> {
    sqlx::query("UPDATE store_products SET stock = stock + ? WHERE id = ? AND stock IS NOT NULL")
        .bind(quantity)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

// =============================================================================
// Add-on relation (parent → child, same store, depth one)
// =============================================================================

pub async fn declare_addon(
    conn: &mut SqliteConnection,
    parent_id: &str,
    child_id: &str,
) -> RepoResult<()> {
    sqlx::query("INSERT INTO product_addons (parent_id, child_id) VALUES (?, ?)")
        .bind(parent_id)
        .bind(child_id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn undeclare_addon(
    conn: &mut SqliteConnection,
    parent_id: &str,
    child_id: &str,
) -> RepoResult<bool> {
    let res = sqlx::query("DELETE FROM product_addons WHERE parent_id = ? AND child_id = ?")
        .bind(parent_id)
        .bind(child_id)
        .execute(conn)
        .await?;
    Ok(res.rows_affected() > 0)
}

/// Whether `child_id` is declared as an add-on of `parent_id`
pub async fn is_declared_addon(
    conn: &mut SqliteConnection,
    parent_id: &str,
    child_id: &str,
) -> RepoResult<bool> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT 1 FROM product_addons WHERE parent_id = ? AND child_id = ?")
            .bind(parent_id)
            .bind(child_id)
            .fetch_optional(conn)
            .await?;
    Ok(row.is_some())
}

/// Declared add-ons of a product, with their current store prices
pub async fn find_addons(
    conn: &mut SqliteConnection,
    parent_id: &str,
) -> RepoResult<Vec<StoreProduct>> {
    let addons = sqlx::query_as::<_, StoreProduct>(
        "SELECT sp.* FROM store_products sp \
         JOIN product_addons pa ON pa.child_id = sp.id \
         WHERE pa.parent_id = ? ORDER BY sp.name",
    )
    .bind(parent_id)
    .fetch_all(conn)
    .await?;
    Ok(addons)
}

// =============================================================================
// Category membership
// =============================================================================

pub async fn assign_category(
    conn: &mut SqliteConnection,
    store_product_id: &str,
    category_id: &str,
) -> RepoResult<()> {
    sqlx::query("INSERT INTO product_categories (store_product_id, category_id) VALUES (?, ?)")
        .bind(store_product_id)
        .bind(category_id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn unassign_category(
    conn: &mut SqliteConnection,
    store_product_id: &str,
    category_id: &str,
) -> RepoResult<bool> {
    let res =
        sqlx::query("DELETE FROM product_categories WHERE store_product_id = ? AND category_id = ?")
            .bind(store_product_id)
            .bind(category_id)
            .execute(conn)
            .await?;
    Ok(res.rows_affected() > 0)
}

/// Available products of one category, menu order
pub async fn find_by_category(
    conn: &mut SqliteConnection,
    category_id: &str,
) -> RepoResult<Vec<StoreProduct>> {
    let sps = sqlx::query_as::<_, StoreProduct>(
        "SELECT sp.* FROM store_products sp \
         JOIN product_categories pc ON pc.store_product_id = sp.id \
         WHERE pc.category_id = ? AND sp.is_available = 1 ORDER BY sp.name",
    )
    .bind(category_id)
    .fetch_all(conn)
    .await?;
    Ok(sps)
}
