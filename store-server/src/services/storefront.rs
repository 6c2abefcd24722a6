//! Storefront service
//!
//! Read-only menu assembly for the customer frontend. No authentication:
//! the storefront only ever sees what the store made available.

use shared::models::{MenuCategory, MenuProduct, StoreMenu, StoreSummary};
use shared::{AppError, AppResult};
use sqlx::SqlitePool;

use crate::db::repository::{
    category as category_repo, combo as combo_repo, product as product_repo, store as store_repo,
};

/// Open stores, for the landing page
pub async fn list_open_stores(pool: &SqlitePool) -> AppResult<Vec<StoreSummary>> {
    let mut conn = pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let stores = store_repo::find_open(&mut conn).await?;
    Ok(stores.into_iter().map(StoreSummary::from).collect())
}

/// Full menu of one store: categories in display order, each with its
/// available products and their declared add-ons, plus available combos
pub async fn store_menu(pool: &SqlitePool, store_id: &str) -> AppResult<StoreMenu> {
    let mut conn = pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let store = store_repo::find_by_id(&mut conn, store_id)
        .await?
        .ok_or_else(|| AppError::not_found("Store"))?;

    let mut categories = Vec::new();
    for category in category_repo::find_by_store(&mut conn, store_id).await? {
        let mut products = Vec::new();
        for sp in product_repo::find_by_category(&mut conn, &category.id).await? {
            let addons = product_repo::find_addons(&mut conn, &sp.id)
                .await?
                .into_iter()
                .filter(|a| a.can_sell(1))
                .collect();
            products.push(MenuProduct {
                sold_out: !sp.can_sell(1),
                product: sp,
                addons,
            });
        }
        categories.push(MenuCategory {
            category_id: category.id,
            name: category.name,
            products,
        });
    }

    let combos = combo_repo::find_available(&mut conn, store_id).await?;

    Ok(StoreMenu {
        store_id: store.id,
        store_name: store.name,
        is_open: store.is_open,
        categories,
        combos,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::store as store_repo;
    use crate::services::catalog;
    use crate::utils::now_rfc3339;
    use shared::models::{CategoryCreate, Product, Store, StoreProductCreate};

    async fn seeded_store(db: &DbService, name: &str, is_open: bool) -> Store {
        let mut conn = db.pool.acquire().await.unwrap();
        let store = Store {
            id: shared::id::new_id_string(),
            name: name.into(),
            address: "somewhere".into(),
            is_open,
            created_at: now_rfc3339(),
        };
        store_repo::insert(&mut conn, &store).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_only_open_stores_listed() {
        let db = DbService::connect("sqlite::memory:").await.unwrap();
        seeded_store(&db, "Open One", true).await;
        seeded_store(&db, "Closed One", false).await;

        let stores = list_open_stores(&db.pool).await.unwrap();
        assert_eq!(stores.len(), 1);
        assert_eq!(stores[0].name, "Open One");
    }

    #[tokio::test]
    async fn test_menu_marks_sold_out_products() {
        let db = DbService::connect("sqlite::memory:").await.unwrap();
        let store = seeded_store(&db, "Downtown", true).await;

        let mut conn = db.pool.acquire().await.unwrap();
        let product = Product {
            id: shared::id::new_id_string(),
            name: "Fries".into(),
            description: None,
            image_url: None,
        };
        crate::db::repository::product::insert(&mut conn, &product)
            .await
            .unwrap();
        drop(conn);

        let sp = catalog::create_store_product(
            &db.pool,
            &store.id,
            &StoreProductCreate {
                product_id: product.id,
                name: None,
                price: 500,
                stock: Some(0),
            },
        )
        .await
        .unwrap();

        let category = catalog::create_category(
            &db.pool,
            &store.id,
            &CategoryCreate {
                name: "Sides".into(),
                sort_order: None,
            },
        )
        .await
        .unwrap();
        catalog::assign_category(&db.pool, &store.id, &sp.id, &category.id)
            .await
            .unwrap();

        let menu = store_menu(&db.pool, &store.id).await.unwrap();
        assert_eq!(menu.categories.len(), 1);
        let item = &menu.categories[0].products[0];
        assert!(item.sold_out);
        assert_eq!(item.product.name, "Fries");
    }

    #[tokio::test]
    async fn test_unknown_store_is_not_found() {
        let db = DbService::connect("sqlite::memory:").await.unwrap();
        let err = store_menu(&db.pool, "nope").await.unwrap_err();
        assert_eq!(err.code, shared::ErrorCode::NotFound);
    }
}
