//! Catalog service
//!
//! Store-scoped catalog writes with the cross-entity validation the
//! repositories cannot express: same-store checks for add-ons, combo
//! composition checks, and the one-instance-per-(store, product) rule
//! surfaced as AlreadyExists.

use shared::models::{
    Category, CategoryCreate, Combo, ComboCreate, ComboItem, ComboUpdate, StoreProduct,
    StoreProductCreate,
};
use shared::{AppError, AppResult};
use sqlx::{SqliteConnection, SqlitePool};

use crate::db::repository::{
    RepoError, category as category_repo, combo as combo_repo, product as product_repo,
    store as store_repo,
};

async fn require_store(conn: &mut SqliteConnection, store_id: &str) -> AppResult<()> {
    store_repo::find_by_id(conn, store_id)
        .await?
        .ok_or_else(|| AppError::not_found("Store"))?;
    Ok(())
}

/// Instantiate a global product in a store
pub async fn create_store_product(
    pool: &SqlitePool,
    store_id: &str,
    req: &StoreProductCreate,
) -> AppResult<StoreProduct> {
    if req.price < 0 {
        return Err(AppError::validation("Price cannot be negative"));
    }

    let mut conn = pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    require_store(&mut conn, store_id).await?;

    let product = product_repo::find_by_id(&mut conn, &req.product_id)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;

    let sp = StoreProduct {
        id: shared::id::new_id_string(),
        store_id: store_id.to_string(),
        product_id: product.id,
        name: req.name.clone().unwrap_or(product.name),
        price: req.price,
        is_available: true,
        stock: req.stock,
    };

    match product_repo::insert_store_product(&mut conn, &sp).await {
        Ok(()) => Ok(sp),
        Err(RepoError::Duplicate(_)) => {
            Err(AppError::already_exists("Store product for this product"))
        }
        Err(e) => Err(e.into()),
    }
}

/// Declare `child_id` as an add-on of `parent_id`; both must belong to
/// the store
pub async fn declare_addon(
    pool: &SqlitePool,
    store_id: &str,
    parent_id: &str,
    child_id: &str,
) -> AppResult<()> {
    if parent_id == child_id {
        return Err(AppError::validation("A product cannot be its own add-on"));
    }

    let mut conn = pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    product_repo::find_store_product(&mut conn, store_id, parent_id)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    product_repo::find_store_product(&mut conn, store_id, child_id)
        .await?
        .ok_or_else(|| AppError::not_found("Add-on product"))?;

    match product_repo::declare_addon(&mut conn, parent_id, child_id).await {
        Ok(()) => Ok(()),
        Err(RepoError::Duplicate(_)) => Err(AppError::already_exists("Add-on declaration")),
        Err(e) => Err(e.into()),
    }
}

pub async fn create_category(
    pool: &SqlitePool,
    store_id: &str,
    req: &CategoryCreate,
) -> AppResult<Category> {
    if req.name.trim().is_empty() {
        return Err(AppError::validation("Category name cannot be empty"));
    }

    let mut conn = pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    require_store(&mut conn, store_id).await?;

    let category = Category {
        id: shared::id::new_id_string(),
        store_id: store_id.to_string(),
        name: req.name.clone(),
        sort_order: req.sort_order.unwrap_or(0),
    };
    category_repo::insert(&mut conn, &category).await?;
    Ok(category)
}

/// Put a store product into a category of the same store
pub async fn assign_category(
    pool: &SqlitePool,
    store_id: &str,
    store_product_id: &str,
    category_id: &str,
) -> AppResult<()> {
    let mut conn = pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    product_repo::find_store_product(&mut conn, store_id, store_product_id)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    category_repo::find_by_id(&mut conn, store_id, category_id)
        .await?
        .ok_or_else(|| AppError::not_found("Category"))?;

    match product_repo::assign_category(&mut conn, store_product_id, category_id).await {
        Ok(()) => Ok(()),
        Err(RepoError::Duplicate(_)) => Err(AppError::already_exists("Category assignment")),
        Err(e) => Err(e.into()),
    }
}

async fn validate_combo_items(
    conn: &mut SqliteConnection,
    store_id: &str,
    items: &[ComboItem],
) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::validation("A combo needs at least one item"));
    }
    for item in items {
        if item.quantity < 1 {
            return Err(AppError::validation("Combo item quantity must be at least 1"));
        }
        product_repo::find_store_product(&mut *conn, store_id, &item.store_product_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Combo component")
                    .with_detail("store_product_id", item.store_product_id.clone())
            })?;
    }
    Ok(())
}

pub async fn create_combo(
    pool: &SqlitePool,
    store_id: &str,
    req: &ComboCreate,
) -> AppResult<Combo> {
    if req.name.trim().is_empty() {
        return Err(AppError::validation("Combo name cannot be empty"));
    }
    if req.price < 0 {
        return Err(AppError::validation("Price cannot be negative"));
    }

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    require_store(&mut tx, store_id).await?;
    validate_combo_items(&mut tx, store_id, &req.items).await?;

    let combo = Combo {
        id: shared::id::new_id_string(),
        store_id: store_id.to_string(),
        name: req.name.clone(),
        description: req.description.clone(),
        price: req.price,
        is_available: true,
        items: req.items.clone(),
    };
    combo_repo::insert(&mut tx, &combo).await?;

    tx.commit()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(combo)
}

pub async fn update_combo(
    pool: &SqlitePool,
    store_id: &str,
    combo_id: &str,
    req: &ComboUpdate,
) -> AppResult<Combo> {
    if let Some(price) = req.price
        && price < 0
    {
        return Err(AppError::validation("Price cannot be negative"));
    }

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    if let Some(items) = &req.items {
        validate_combo_items(&mut tx, store_id, items).await?;
    }

    let combo = combo_repo::update(&mut tx, store_id, combo_id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Combo"))?;

    tx.commit()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(combo)
}
