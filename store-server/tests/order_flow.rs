//! End-to-end order flow
//!
//! Seeds a store through the catalog service, places a mixed basket
//! through the pricing engine, walks the lifecycle, and checks what the
//! storefront shows along the way.

use shared::models::{
    CategoryCreate, ComboCreate, ComboItem, OrderItemRef, OrderLineRequest, OrderStatus,
    PlaceOrderRequest, Product, Store, StoreProductCreate, TransitionRequest,
};
use store_server::db::DbService;
use store_server::db::repository::{order as order_repo, product as product_repo, store as store_repo};
use store_server::services::{catalog, lifecycle, pricing, storefront};
use store_server::utils::now_rfc3339;

struct World {
    db: DbService,
    store_id: String,
    burger: String,
    cheese: String,
    fries: String,
    combo: String,
}

async fn seed() -> World {
    let db = DbService::connect("sqlite::memory:").await.expect("db");

    let store = Store {
        id: shared::id::new_id_string(),
        name: "Praça Central".into(),
        address: "Av. Brasil 100".into(),
        is_open: true,
        created_at: now_rfc3339(),
    };
    {
        let mut conn = db.pool.acquire().await.expect("conn");
        store_repo::insert(&mut conn, &store).await.expect("store");
    }

    let mut sp_ids = Vec::new();
    for (name, price, stock) in [
        ("X-Burger", 2500_i64, None),
        ("Extra Cheese", 300, None),
        ("Fries", 900, Some(20_i64)),
    ] {
        let product = Product {
            id: shared::id::new_id_string(),
            name: name.into(),
            description: None,
            image_url: None,
        };
        {
            let mut conn = db.pool.acquire().await.expect("conn");
            product_repo::insert(&mut conn, &product).await.expect("product");
        }
        let sp = catalog::create_store_product(
            &db.pool,
            &store.id,
            &StoreProductCreate {
                product_id: product.id,
                name: None,
                price,
                stock,
            },
        )
        .await
        .expect("store product");
        sp_ids.push(sp.id);
    }
    let (burger, cheese, fries) = (sp_ids[0].clone(), sp_ids[1].clone(), sp_ids[2].clone());

    catalog::declare_addon(&db.pool, &store.id, &burger, &cheese)
        .await
        .expect("addon");

    let category = catalog::create_category(
        &db.pool,
        &store.id,
        &CategoryCreate {
            name: "Burgers".into(),
            sort_order: Some(1),
        },
    )
    .await
    .expect("category");
    catalog::assign_category(&db.pool, &store.id, &burger, &category.id)
        .await
        .expect("assign");

    let combo = catalog::create_combo(
        &db.pool,
        &store.id,
        &ComboCreate {
            name: "Combo do Dia".into(),
            description: Some("Burger plus fries".into()),
            price: 3000,
            items: vec![
                ComboItem {
                    store_product_id: burger.clone(),
                    quantity: 1,
                },
                ComboItem {
                    store_product_id: fries.clone(),
                    quantity: 1,
                },
            ],
        },
    )
    .await
    .expect("combo");

    World {
        db,
        store_id: store.id,
        burger,
        cheese,
        fries,
        combo: combo.id,
    }
}

fn mixed_basket(w: &World) -> PlaceOrderRequest {
    PlaceOrderRequest {
        store_id: w.store_id.clone(),
        customer_id: Some("customer-77".into()),
        delivery_address_id: None,
        lines: vec![
            OrderLineRequest {
                store_product_id: Some(w.burger.clone()),
                combo_id: None,
                quantity: 1,
                addon_ids: vec![w.cheese.clone()],
            },
            OrderLineRequest {
                store_product_id: None,
                combo_id: Some(w.combo.clone()),
                quantity: 2,
                addon_ids: vec![],
            },
        ],
        payment_method: Some("PIX".into()),
        discount: 800,
        change_for: None,
        notes: Some("no onions".into()),
        is_pickup: true,
        table_number: None,
    }
}

#[tokio::test]
async fn test_place_and_deliver_mixed_order() {
    let w = seed().await;

    let order = pricing::place_order(&w.db.pool, &mixed_basket(&w))
        .await
        .expect("place");

    // (25.00 + 3.00) + 2 × 30.00 - 8.00 = 80.00
    assert_eq!(order.total, 8000);
    assert_eq!(order.discount, 800);
    assert_eq!(order.queue_number, Some(1));
    assert_eq!(order.status, OrderStatus::Created);
    assert_eq!(order.items.len(), 2);
    assert!(matches!(order.items[1].item_ref, OrderItemRef::Combo(_)));

    for status in [
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::ReadyForPickup,
        OrderStatus::Delivered,
    ] {
        let updated = lifecycle::transition_order(
            &w.db.pool,
            &w.store_id,
            &order.id,
            &TransitionRequest {
                status,
                reason: None,
            },
        )
        .await
        .expect("transition");
        assert_eq!(updated.status, status);
    }

    // The stored order still carries the full snapshot
    let mut conn = w.db.pool.acquire().await.unwrap();
    let stored = order_repo::find_by_id(&mut conn, &w.store_id, &order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.items[0].addons[0].name, "Extra Cheese");
    assert_eq!(stored.subtotal(), 8800);
}

#[tokio::test]
async fn test_cancel_restores_only_direct_product_stock() {
    let w = seed().await;

    let req = PlaceOrderRequest {
        store_id: w.store_id.clone(),
        customer_id: None,
        delivery_address_id: None,
        lines: vec![
            OrderLineRequest {
                store_product_id: Some(w.fries.clone()),
                combo_id: None,
                quantity: 5,
                addon_ids: vec![],
            },
            OrderLineRequest {
                store_product_id: None,
                combo_id: Some(w.combo.clone()),
                quantity: 1,
                addon_ids: vec![],
            },
        ],
        payment_method: None,
        discount: 0,
        change_for: None,
        notes: None,
        is_pickup: true,
        table_number: None,
    };
    let order = pricing::place_order(&w.db.pool, &req).await.expect("place");

    let stock_after_sale = {
        let mut conn = w.db.pool.acquire().await.unwrap();
        product_repo::find_store_product(&mut conn, &w.store_id, &w.fries)
            .await
            .unwrap()
            .unwrap()
            .stock
    };
    assert_eq!(stock_after_sale, Some(15));

    lifecycle::transition_order(
        &w.db.pool,
        &w.store_id,
        &order.id,
        &TransitionRequest {
            status: OrderStatus::Cancelled,
            reason: Some("kitchen closed early".into()),
        },
    )
    .await
    .expect("cancel");

    let mut conn = w.db.pool.acquire().await.unwrap();
    let fries = product_repo::find_store_product(&mut conn, &w.store_id, &w.fries)
        .await
        .unwrap()
        .unwrap();
    // The five direct fries come back; the combo's bundled fries never
    // touched stock in the first place
    assert_eq!(fries.stock, Some(20));
}

#[tokio::test]
async fn test_storefront_reflects_catalog_state() {
    let w = seed().await;

    let stores = storefront::list_open_stores(&w.db.pool).await.unwrap();
    assert_eq!(stores.len(), 1);

    let menu = storefront::store_menu(&w.db.pool, &w.store_id).await.unwrap();
    assert_eq!(menu.store_name, "Praça Central");
    assert_eq!(menu.categories.len(), 1);
    assert_eq!(menu.categories[0].name, "Burgers");

    let burger = &menu.categories[0].products[0];
    assert!(!burger.sold_out);
    assert_eq!(burger.addons.len(), 1);
    assert_eq!(burger.addons[0].name, "Extra Cheese");

    assert_eq!(menu.combos.len(), 1);
    assert_eq!(menu.combos[0].price, 3000);
    assert_eq!(menu.combos[0].items.len(), 2);
}

#[tokio::test]
async fn test_orders_survive_reopening_the_database() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("store.db");
    let path = path.to_str().expect("utf-8 path");

    let order_id;
    let store_id;
    {
        let db = DbService::new(path).await.expect("open");
        let store = Store {
            id: shared::id::new_id_string(),
            name: "Persistent".into(),
            address: "".into(),
            is_open: true,
            created_at: now_rfc3339(),
        };
        let mut conn = db.pool.acquire().await.unwrap();
        store_repo::insert(&mut conn, &store).await.unwrap();

        let product = Product {
            id: shared::id::new_id_string(),
            name: "Coffee".into(),
            description: None,
            image_url: None,
        };
        product_repo::insert(&mut conn, &product).await.unwrap();
        drop(conn);

        let sp = catalog::create_store_product(
            &db.pool,
            &store.id,
            &StoreProductCreate {
                product_id: product.id,
                name: None,
                price: 700,
                stock: None,
            },
        )
        .await
        .unwrap();

        let order = pricing::place_order(
            &db.pool,
            &PlaceOrderRequest {
                store_id: store.id.clone(),
                customer_id: None,
                delivery_address_id: None,
                lines: vec![OrderLineRequest {
                    store_product_id: Some(sp.id),
                    combo_id: None,
                    quantity: 3,
                    addon_ids: vec![],
                }],
                payment_method: None,
                discount: 0,
                change_for: None,
                notes: None,
                is_pickup: true,
                table_number: None,
            },
        )
        .await
        .unwrap();

        order_id = order.id;
        store_id = store.id;
        db.pool.close().await;
    }

    let db = DbService::new(path).await.expect("reopen");
    let mut conn = db.pool.acquire().await.unwrap();
    let order = order_repo::find_by_id(&mut conn, &store_id, &order_id)
        .await
        .unwrap()
        .expect("order persisted");
    assert_eq!(order.total, 2100);
    assert_eq!(order.items[0].name, "Coffee");
}

#[tokio::test]
async fn test_status_filter_lists_kitchen_queue() {
    let w = seed().await;

    let first = pricing::place_order(&w.db.pool, &mixed_basket(&w))
        .await
        .expect("first");
    pricing::place_order(&w.db.pool, &mixed_basket(&w))
        .await
        .expect("second");

    for status in [OrderStatus::Confirmed, OrderStatus::Preparing] {
        lifecycle::transition_order(
            &w.db.pool,
            &w.store_id,
            &first.id,
            &TransitionRequest {
                status,
                reason: None,
            },
        )
        .await
        .expect("transition");
    }

    let mut conn = w.db.pool.acquire().await.unwrap();
    let preparing = order_repo::find_by_store(&mut conn, &w.store_id, Some(OrderStatus::Preparing))
        .await
        .unwrap();
    assert_eq!(preparing.len(), 1);
    assert_eq!(preparing[0].id, first.id);

    let all = order_repo::find_by_store(&mut conn, &w.store_id, None)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}
