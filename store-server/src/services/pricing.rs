//! Pricing engine
//!
//! Turns a submitted basket into a priced, persisted order. All prices
//! come from the current catalog rows read inside the same transaction
//! that writes the order; client-supplied prices do not exist in the
//! wire format. Captured names and prices are immutable snapshots.

use shared::models::{
    Order, OrderItem, OrderItemAddon, OrderItemRef, OrderStatus, PlaceOrderRequest,
};
use shared::{AppError, AppResult};
use sqlx::{SqliteConnection, SqlitePool};

use crate::db::repository::{order as order_repo, combo as combo_repo, product as product_repo, store as store_repo};
use crate::utils::now_rfc3339;

/// Price and persist a basket. Runs in a single transaction: either the
/// order, its lines and every stock decrement land together, or nothing
/// does.
pub async fn place_order(pool: &SqlitePool, req: &PlaceOrderRequest) -> AppResult<Order> {
    validate_request(req)?;

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let order = price_and_insert(&mut tx, req).await?;

    tx.commit()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    tracing::info!(
        order_id = %order.id,
        store_id = %order.store_id,
        total = order.total,
        lines = order.items.len(),
        "Order placed"
    );

    Ok(order)
}

/// Upper bound on a single line's quantity. Keeps totals far away from
/// `i64` overflow even with extreme catalog prices.
const MAX_LINE_QUANTITY: i64 = 999;

/// Shape checks that need no catalog access
fn validate_request(req: &PlaceOrderRequest) -> AppResult<()> {
    if req.lines.is_empty() {
        return Err(AppError::validation("Order must contain at least one line"));
    }
    if req.discount < 0 {
        return Err(AppError::invalid_discount("Discount cannot be negative"));
    }
    if !req.is_pickup && req.delivery_address_id.is_none() {
        return Err(AppError::validation(
            "Delivery orders require a delivery address",
        ));
    }

    for (index, line) in req.lines.iter().enumerate() {
        if line.quantity < 1 {
            return Err(
                AppError::validation("Line quantity must be at least 1").with_detail("line", index)
            );
        }
        if line.quantity > MAX_LINE_QUANTITY {
            return Err(AppError::validation(format!(
                "Line quantity cannot exceed {MAX_LINE_QUANTITY}"
            ))
            .with_detail("line", index));
        }
        match (&line.store_product_id, &line.combo_id) {
            (Some(_), Some(_)) => {
                return Err(AppError::validation(
                    "A line references a product or a combo, not both",
                )
                .with_detail("line", index));
            }
            (None, None) => {
                return Err(AppError::validation(
                    "A line must reference a product or a combo",
                )
                .with_detail("line", index));
            }
            (None, Some(_)) if !line.addon_ids.is_empty() => {
                return Err(
                    AppError::validation("Combo lines cannot carry add-ons")
                        .with_detail("line", index),
                );
            }
            _ => {}
        }
    }

    Ok(())
}

async fn price_and_insert(
    conn: &mut SqliteConnection,
    req: &PlaceOrderRequest,
) -> AppResult<Order> {
    let store = store_repo::find_by_id(&mut *conn, &req.store_id)
        .await?
        .ok_or_else(|| AppError::not_found("Store"))?;
    if !store.is_open {
        return Err(AppError::unavailable("Store is closed"));
    }

    // Resolve every line against the catalog, capturing names and prices
    let mut items = Vec::with_capacity(req.lines.len());
    for (index, line) in req.lines.iter().enumerate() {
        let item = match (&line.store_product_id, &line.combo_id) {
            (Some(sp_id), None) => {
                resolve_product_line(&mut *conn, &req.store_id, sp_id, line.quantity, &line.addon_ids)
                    .await
                    .map_err(|e| e.with_detail("line", index))?
            }
            (None, Some(combo_id)) => {
                resolve_combo_line(&mut *conn, &req.store_id, combo_id, line.quantity)
                    .await
                    .map_err(|e| e.with_detail("line", index))?
            }
            // Unreachable after validate_request
            _ => return Err(AppError::validation("Malformed line").with_detail("line", index)),
        };
        items.push(item);
    }

    let mut subtotal: i64 = 0;
    for item in &items {
        subtotal = item
            .checked_subtotal()
            .and_then(|line| subtotal.checked_add(line))
            .ok_or_else(|| AppError::validation("Order total exceeds the representable amount"))?;
    }
    if req.discount > subtotal {
        return Err(AppError::invalid_discount(format!(
            "Discount {} exceeds subtotal {}",
            req.discount, subtotal
        )));
    }
    let total = subtotal - req.discount;

    if let Some(change_for) = req.change_for
        && change_for < total
    {
        return Err(AppError::validation(format!(
            "change_for {change_for} is less than the order total {total}"
        )));
    }

    // Decrement tracked stock for direct product lines. The guarded
    // UPDATE is what enforces the stock bound: several lines naming the
    // same product drain it cumulatively, and the line that would take
    // it below zero fails here even though each passed `can_sell` on
    // its own.
    for item in &items {
        if let OrderItemRef::Product(sp_id) = &item.item_ref
            && !product_repo::decrement_stock(&mut *conn, sp_id, item.quantity).await?
        {
            return Err(
                AppError::unavailable(format!("{} has insufficient stock", item.name))
                    .with_detail("store_product_id", sp_id.clone()),
            );
        }
    }

    let created_at = now_rfc3339();
    let queue_number = if req.is_pickup {
        Some(order_repo::next_queue_number(&mut *conn, &req.store_id, &created_at[..10]).await?)
    } else {
        None
    };

    let order = Order {
        id: shared::id::new_id_string(),
        store_id: req.store_id.clone(),
        queue_number,
        table_number: req.table_number,
        customer_id: req.customer_id.clone(),
        delivery_address_id: req.delivery_address_id.clone(),
        created_at,
        total,
        discount: req.discount,
        status: OrderStatus::Created,
        payment_method: req.payment_method.clone(),
        change_for: req.change_for,
        notes: req.notes.clone(),
        is_pickup: req.is_pickup,
        cancel_reason: None,
        cancelled_at: None,
        items,
    };

    order_repo::insert(conn, &order).await?;

    Ok(order)
}

async fn resolve_product_line(
    conn: &mut SqliteConnection,
    store_id: &str,
    store_product_id: &str,
    quantity: i64,
    addon_ids: &[String],
) -> AppResult<OrderItem> {
    let sp = product_repo::find_store_product(&mut *conn, store_id, store_product_id)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;

    if !sp.can_sell(quantity) {
        return Err(AppError::unavailable(format!("{} is not available", sp.name))
            .with_detail("store_product_id", sp.id.clone()));
    }

    let mut addons = Vec::with_capacity(addon_ids.len());
    for addon_id in addon_ids {
        if !product_repo::is_declared_addon(&mut *conn, &sp.id, addon_id).await? {
            return Err(AppError::invalid_addon(format!(
                "Item is not a declared add-on of {}",
                sp.name
            ))
            .with_detail("addon_id", addon_id.clone()));
        }
        let addon = product_repo::find_store_product(&mut *conn, store_id, addon_id)
            .await?
            .ok_or_else(|| AppError::not_found("Add-on"))?;
        if !addon.can_sell(1) {
            return Err(
                AppError::unavailable(format!("Add-on {} is not available", addon.name))
                    .with_detail("addon_id", addon.id.clone()),
            );
        }
        addons.push(OrderItemAddon {
            store_product_id: addon.id,
            name: addon.name,
            price: addon.price,
        });
    }

    Ok(OrderItem {
        item_ref: OrderItemRef::Product(sp.id),
        name: sp.name,
        price: sp.price,
        quantity,
        addons,
    })
}

async fn resolve_combo_line(
    conn: &mut SqliteConnection,
    store_id: &str,
    combo_id: &str,
    quantity: i64,
) -> AppResult<OrderItem> {
    let combo = combo_repo::find_by_id(conn, store_id, combo_id)
        .await?
        .ok_or_else(|| AppError::not_found("Combo"))?;

    if !combo.is_available {
        return Err(
            AppError::unavailable(format!("{} is not available", combo.name))
                .with_detail("combo_id", combo.id.clone()),
        );
    }

    // The combo's fixed price applies regardless of component prices
    Ok(OrderItem {
        item_ref: OrderItemRef::Combo(combo.id),
        name: combo.name,
        price: combo.price,
        quantity,
        addons: vec![],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::{category as category_repo, combo as combo_repo, product as product_repo, store as store_repo};
    use shared::ErrorCode;
    use shared::models::{Category, Combo, ComboItem, OrderLineRequest, Product, Store, StoreProduct};

    struct Fixture {
        db: DbService,
        store_id: String,
        burger_id: String,
        cheese_id: String,
        fries_id: String,
        combo_id: String,
    }

    async fn fixture() -> Fixture {
        let db = DbService::connect("sqlite::memory:").await.expect("db");
        let mut conn = db.pool.acquire().await.expect("conn");

        let store = Store {
            id: shared::id::new_id_string(),
            name: "Downtown".into(),
            address: "1 Main St".into(),
            is_open: true,
            created_at: now_rfc3339(),
        };
        store_repo::insert(&mut conn, &store).await.expect("store");

        let mut sp_ids = Vec::new();
        for (name, price, stock) in [
            ("Burger", 1000_i64, None),
            ("Cheese", 150, None),
            ("Fries", 500, Some(10_i64)),
        ] {
            let product = Product {
                id: shared::id::new_id_string(),
                name: name.into(),
                description: None,
                image_url: None,
            };
            product_repo::insert(&mut conn, &product).await.expect("product");

            let sp = StoreProduct {
                id: shared::id::new_id_string(),
                store_id: store.id.clone(),
                product_id: product.id.clone(),
                name: name.into(),
                price,
                is_available: true,
                stock,
            };
            product_repo::insert_store_product(&mut conn, &sp)
                .await
                .expect("store product");
            sp_ids.push(sp.id);
        }
        let (burger_id, cheese_id, fries_id) =
            (sp_ids[0].clone(), sp_ids[1].clone(), sp_ids[2].clone());

        product_repo::declare_addon(&mut conn, &burger_id, &cheese_id)
            .await
            .expect("addon");

        let category = Category {
            id: shared::id::new_id_string(),
            store_id: store.id.clone(),
            name: "Mains".into(),
            sort_order: 0,
        };
        category_repo::insert(&mut conn, &category).await.expect("category");
        product_repo::assign_category(&mut conn, &burger_id, &category.id)
            .await
            .expect("assign");

        let combo = Combo {
            id: shared::id::new_id_string(),
            store_id: store.id.clone(),
            name: "Burger Meal".into(),
            description: None,
            price: 3000,
            is_available: true,
            items: vec![
                ComboItem {
                    store_product_id: burger_id.clone(),
                    quantity: 1,
                },
                ComboItem {
                    store_product_id: fries_id.clone(),
                    quantity: 1,
                },
            ],
        };
        combo_repo::insert(&mut conn, &combo).await.expect("combo");

        Fixture {
            store_id: store.id,
            burger_id,
            cheese_id,
            fries_id,
            combo_id: combo.id,
            db,
        }
    }

    fn basket(fx: &Fixture, lines: Vec<OrderLineRequest>) -> PlaceOrderRequest {
        PlaceOrderRequest {
            store_id: fx.store_id.clone(),
            customer_id: None,
            delivery_address_id: None,
            lines,
            payment_method: Some("CASH".into()),
            discount: 0,
            change_for: None,
            notes: None,
            is_pickup: true,
            table_number: None,
        }
    }

    fn product_line(id: &str, quantity: i64, addon_ids: Vec<String>) -> OrderLineRequest {
        OrderLineRequest {
            store_product_id: Some(id.to_string()),
            combo_id: None,
            quantity,
            addon_ids,
        }
    }

    fn combo_line(id: &str, quantity: i64) -> OrderLineRequest {
        OrderLineRequest {
            store_product_id: None,
            combo_id: Some(id.to_string()),
            quantity,
            addon_ids: vec![],
        }
    }

    #[tokio::test]
    async fn test_product_line_with_addon_totals() {
        let fx = fixture().await;
        let req = basket(
            &fx,
            vec![product_line(&fx.burger_id, 2, vec![fx.cheese_id.clone()])],
        );

        let order = place_order(&fx.db.pool, &req).await.expect("order");

        // (10.00 + 1.50) × 2 = 23.00
        assert_eq!(order.total, 2300);
        assert_eq!(order.status, OrderStatus::Created);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].name, "Burger");
        assert_eq!(order.items[0].addons[0].price, 150);
        assert_eq!(order.queue_number, Some(1));
    }

    #[tokio::test]
    async fn test_combo_uses_fixed_price() {
        let fx = fixture().await;
        let req = basket(&fx, vec![combo_line(&fx.combo_id, 1)]);

        let order = place_order(&fx.db.pool, &req).await.expect("order");

        // 30.00 fixed, not the 15.00 the components would sum to
        assert_eq!(order.total, 3000);
        assert_eq!(
            order.items[0].item_ref,
            OrderItemRef::Combo(fx.combo_id.clone())
        );
    }

    #[tokio::test]
    async fn test_captured_price_survives_catalog_change() {
        let fx = fixture().await;
        let req = basket(&fx, vec![product_line(&fx.burger_id, 1, vec![])]);
        let order = place_order(&fx.db.pool, &req).await.expect("order");
        assert_eq!(order.total, 1000);

        // Reprice the product after the sale
        let mut conn = fx.db.pool.acquire().await.unwrap();
        sqlx::query("UPDATE store_products SET price = 9999 WHERE id = ?")
            .bind(&fx.burger_id)
            .execute(&mut *conn)
            .await
            .unwrap();

        let reread = order_repo::find_by_id(&mut conn, &fx.store_id, &order.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reread.items[0].price, 1000);
        assert_eq!(reread.total, 1000);
    }

    #[tokio::test]
    async fn test_undeclared_addon_rejected() {
        let fx = fixture().await;
        // Fries was never declared as an add-on of Burger
        let req = basket(
            &fx,
            vec![product_line(&fx.burger_id, 1, vec![fx.fries_id.clone()])],
        );

        let err = place_order(&fx.db.pool, &req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidAddon);
    }

    #[tokio::test]
    async fn test_unavailable_product_rejected() {
        let fx = fixture().await;
        let mut conn = fx.db.pool.acquire().await.unwrap();
        sqlx::query("UPDATE store_products SET is_available = 0 WHERE id = ?")
            .bind(&fx.burger_id)
            .execute(&mut *conn)
            .await
            .unwrap();
        drop(conn);

        let req = basket(&fx, vec![product_line(&fx.burger_id, 1, vec![])]);
        let err = place_order(&fx.db.pool, &req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductUnavailable);
    }

    #[tokio::test]
    async fn test_insufficient_stock_rejected_and_nothing_persisted() {
        let fx = fixture().await;
        let req = basket(&fx, vec![product_line(&fx.fries_id, 11, vec![])]);

        let err = place_order(&fx.db.pool, &req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductUnavailable);

        let mut conn = fx.db.pool.acquire().await.unwrap();
        let orders = order_repo::find_by_store(&mut conn, &fx.store_id, None)
            .await
            .unwrap();
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_lines_cannot_oversell_stock() {
        let fx = fixture().await;
        // 6 + 6 exceeds the 10 in stock even though each line alone fits
        let req = basket(
            &fx,
            vec![
                product_line(&fx.fries_id, 6, vec![]),
                product_line(&fx.fries_id, 6, vec![]),
            ],
        );

        let err = place_order(&fx.db.pool, &req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductUnavailable);

        let mut conn = fx.db.pool.acquire().await.unwrap();
        let fries = product_repo::find_store_product(&mut conn, &fx.store_id, &fx.fries_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fries.stock, Some(10));
        let orders = order_repo::find_by_store(&mut conn, &fx.store_id, None)
            .await
            .unwrap();
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn test_oversized_quantity_rejected() {
        let fx = fixture().await;
        let req = basket(
            &fx,
            vec![product_line(&fx.burger_id, i64::MAX / 2, vec![])],
        );

        let err = place_order(&fx.db.pool, &req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_stock_decremented_on_sale() {
        let fx = fixture().await;
        let req = basket(&fx, vec![product_line(&fx.fries_id, 4, vec![])]);
        place_order(&fx.db.pool, &req).await.expect("order");

        let mut conn = fx.db.pool.acquire().await.unwrap();
        let fries = product_repo::find_store_product(&mut conn, &fx.store_id, &fx.fries_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fries.stock, Some(6));
    }

    #[tokio::test]
    async fn test_discount_bounds() {
        let fx = fixture().await;

        let mut req = basket(&fx, vec![product_line(&fx.burger_id, 1, vec![])]);
        req.discount = 1001; // subtotal is 1000
        let err = place_order(&fx.db.pool, &req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidDiscount);

        let mut req = basket(&fx, vec![product_line(&fx.burger_id, 1, vec![])]);
        req.discount = 1000;
        let order = place_order(&fx.db.pool, &req).await.expect("order");
        assert_eq!(order.total, 0);
    }

    #[tokio::test]
    async fn test_empty_basket_rejected() {
        let fx = fixture().await;
        let req = basket(&fx, vec![]);
        let err = place_order(&fx.db.pool, &req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_line_with_both_refs_rejected() {
        let fx = fixture().await;
        let req = basket(
            &fx,
            vec![OrderLineRequest {
                store_product_id: Some(fx.burger_id.clone()),
                combo_id: Some(fx.combo_id.clone()),
                quantity: 1,
                addon_ids: vec![],
            }],
        );
        let err = place_order(&fx.db.pool, &req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_cross_store_product_not_found() {
        let fx = fixture().await;
        let mut conn = fx.db.pool.acquire().await.unwrap();
        let other = Store {
            id: shared::id::new_id_string(),
            name: "Uptown".into(),
            address: "2 High St".into(),
            is_open: true,
            created_at: now_rfc3339(),
        };
        store_repo::insert(&mut conn, &other).await.unwrap();
        drop(conn);

        let mut req = basket(&fx, vec![product_line(&fx.burger_id, 1, vec![])]);
        req.store_id = other.id;
        let err = place_order(&fx.db.pool, &req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_delivery_requires_address() {
        let fx = fixture().await;
        let mut req = basket(&fx, vec![product_line(&fx.burger_id, 1, vec![])]);
        req.is_pickup = false;
        let err = place_order(&fx.db.pool, &req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        req.delivery_address_id = Some("addr-1".into());
        let order = place_order(&fx.db.pool, &req).await.expect("order");
        assert_eq!(order.queue_number, None);
    }

    #[tokio::test]
    async fn test_queue_numbers_increment_per_store() {
        let fx = fixture().await;
        let req = basket(&fx, vec![product_line(&fx.burger_id, 1, vec![])]);

        let first = place_order(&fx.db.pool, &req).await.expect("first");
        let second = place_order(&fx.db.pool, &req).await.expect("second");

        assert_eq!(first.queue_number, Some(1));
        assert_eq!(second.queue_number, Some(2));
    }

    #[tokio::test]
    async fn test_closed_store_rejects_orders() {
        let fx = fixture().await;
        let mut conn = fx.db.pool.acquire().await.unwrap();
        sqlx::query("UPDATE stores SET is_open = 0 WHERE id = ?")
            .bind(&fx.store_id)
            .execute(&mut *conn)
            .await
            .unwrap();
        drop(conn);

        let req = basket(&fx, vec![product_line(&fx.burger_id, 1, vec![])]);
        let err = place_order(&fx.db.pool, &req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductUnavailable);
    }
}
