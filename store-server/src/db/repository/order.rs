//! Order Repository
//!
//! Orders span three tables (orders, order_items, order_item_addons).
//! Inserts write all three; reads reassemble them in submission order.
//! Callers wrap multi-statement operations in a transaction.

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderItem, OrderItemAddon, OrderItemRef, OrderStatus};
use sqlx::SqliteConnection;

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    store_id: String,
    queue_number: Option<i64>,
    table_number: Option<i64>,
    customer_id: Option<String>,
    delivery_address_id: Option<String>,
    created_at: String,
    total: i64,
    discount: i64,
    status: OrderStatus,
    payment_method: Option<String>,
    change_for: Option<i64>,
    notes: Option<String>,
    is_pickup: bool,
    cancel_reason: Option<String>,
    cancelled_at: Option<String>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            store_id: self.store_id,
            queue_number: self.queue_number,
            table_number: self.table_number,
            customer_id: self.customer_id,
            delivery_address_id: self.delivery_address_id,
            created_at: self.created_at,
            total: self.total,
            discount: self.discount,
            status: self.status,
            payment_method: self.payment_method,
            change_for: self.change_for,
            notes: self.notes,
            is_pickup: self.is_pickup,
            cancel_reason: self.cancel_reason,
            cancelled_at: self.cancelled_at,
            items,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: String,
    store_product_id: Option<String>,
    combo_id: Option<String>,
    name: String,
    price: i64,
    quantity: i64,
}

impl ItemRow {
    fn into_item(self, addons: Vec<OrderItemAddon>) -> RepoResult<OrderItem> {
        let item_ref = match (self.store_product_id, self.combo_id) {
            (Some(sp), None) => OrderItemRef::Product(sp),
            (None, Some(c)) => OrderItemRef::Combo(c),
            _ => {
                return Err(RepoError::Database(format!(
                    "order item {} violates the product-xor-combo constraint",
                    self.id
                )));
            }
        };
        Ok(OrderItem {
            item_ref,
            name: self.name,
            price: self.price,
            quantity: self.quantity,
            addons,
        })
    }
}

pub async fn insert(conn: &mut SqliteConnection, order: &Order) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO orders (id, store_id, queue_number, table_number, customer_id, \
             delivery_address_id, created_at, total, discount, status, payment_method, \
             change_for, notes, is_pickup, cancel_reason, cancelled_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&order.id)
    .bind(&order.store_id)
    .bind(order.queue_number)
    .bind(order.table_number)
    .bind(&order.customer_id)
    .bind(&order.delivery_address_id)
    .bind(&order.created_at)
    .bind(order.total)
    .bind(order.discount)
    .bind(order.status)
    .bind(&order.payment_method)
    .bind(order.change_for)
    .bind(&order.notes)
    .bind(order.is_pickup)
    .bind(&order.cancel_reason)
    .bind(&order.cancelled_at)
    .execute(&mut *conn)
    .await?;

    for (position, item) in order.items.iter().enumerate() {
        let (store_product_id, combo_id) = match &item.item_ref {
            OrderItemRef::Product(id) => (Some(id.as_str()), None),
            OrderItemRef::Combo(id) => (None, Some(id.as_str())),
        };
        let item_id = shared::id::new_id_string();

        sqlx::query(
            "INSERT INTO order_items (id, order_id, position, store_product_id, combo_id, \
                 name, price, quantity) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&item_id)
        .bind(&order.id)
        .bind(position as i64)
        .bind(store_product_id)
        .bind(combo_id)
        .bind(&item.name)
        .bind(item.price)
        .bind(item.quantity)
        .execute(&mut *conn)
        .await?;

        for (addon_position, addon) in item.addons.iter().enumerate() {
            sqlx::query(
                "INSERT INTO order_item_addons (order_item_id, position, store_product_id, \
                     name, price) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&item_id)
            .bind(addon_position as i64)
            .bind(&addon.store_product_id)
            .bind(&addon.name)
            .bind(addon.price)
            .execute(&mut *conn)
            .await?;
        }
    }

    Ok(())
}

async fn load_items(conn: &mut SqliteConnection, order_id: &str) -> RepoResult<Vec<OrderItem>> {
    let rows = sqlx::query_as::<_, ItemRow>(
        "SELECT id, store_product_id, combo_id, name, price, quantity \
         FROM order_items WHERE order_id = ? ORDER BY position",
    )
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await?;

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        let addons = sqlx::query_as::<_, OrderItemAddon>(
            "SELECT store_product_id, name, price \
             FROM order_item_addons WHERE order_item_id = ? ORDER BY position",
        )
        .bind(&row.id)
        .fetch_all(&mut *conn)
        .await?;
        items.push(row.into_item(addons)?);
    }
    Ok(items)
}

pub async fn find_by_id(
    conn: &mut SqliteConnection,
    store_id: &str,
    id: &str,
) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE id = ? AND store_id = ?")
        .bind(id)
        .bind(store_id)
        .fetch_optional(&mut *conn)
        .await?;

    match row {
        Some(row) => {
            let items = load_items(conn, &row.id).await?;
            Ok(Some(row.into_order(items)))
        }
        None => Ok(None),
    }
}

/// Store owning an order, regardless of the caller's scope
pub async fn find_owner_store(
    conn: &mut SqliteConnection,
    id: &str,
) -> RepoResult<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT store_id FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row.map(|(store_id,)| store_id))
}

/// Orders of a store, newest first, optionally filtered by status
pub async fn find_by_store(
    conn: &mut SqliteConnection,
    store_id: &str,
    status: Option<OrderStatus>,
) -> RepoResult<Vec<Order>> {
    let rows = match status {
        Some(status) => {
            sqlx::query_as::<_, OrderRow>(
                "SELECT * FROM orders WHERE store_id = ? AND status = ? ORDER BY created_at DESC",
            )
            .bind(store_id)
            .bind(status)
            .fetch_all(&mut *conn)
            .await?
        }
        None => {
            sqlx::query_as::<_, OrderRow>(
                "SELECT * FROM orders WHERE store_id = ? ORDER BY created_at DESC",
            )
            .bind(store_id)
            .fetch_all(&mut *conn)
            .await?
        }
    };

    let mut orders = Vec::with_capacity(rows.len());
    for row in rows {
        let items = load_items(conn, &row.id).await?;
        orders.push(row.into_order(items));
    }
    Ok(orders)
}

/// Next queue number for a store: one past today's highest
///
/// `created_at` is RFC 3339 UTC, so the date is its first ten characters.
pub async fn next_queue_number(
    conn: &mut SqliteConnection,
    store_id: &str,
    today: &str,
) -> RepoResult<i64> {
    let (max,): (Option<i64>,) = sqlx::query_as(
        "SELECT MAX(queue_number) FROM orders \
         WHERE store_id = ? AND substr(created_at, 1, 10) = ?",
    )
    .bind(store_id)
    .bind(today)
    .fetch_one(conn)
    .await?;
    Ok(max.unwrap_or(0) + 1)
}

pub async fn update_status(
    conn: &mut SqliteConnection,
    id: &str,
    status: OrderStatus,
) -> RepoResult<()> {
    sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn mark_cancelled(
    conn: &mut SqliteConnection,
    id: &str,
    reason: &str,
    cancelled_at: &str,
) -> RepoResult<()> {
    sqlx::query(
        "UPDATE orders SET status = ?, cancel_reason = ?, cancelled_at = ? WHERE id = ?",
    )
    .bind(OrderStatus::Cancelled)
    .bind(reason)
    .bind(cancelled_at)
    .bind(id)
    .execute(conn)
    .await?;
    Ok(())
}
