//! Order lifecycle
//!
//! Moves orders through their delivery states. Transition legality lives
//! on `OrderStatus`; this module adds persistence, the cancellation
//! record and the stock restore that goes with it.

use shared::models::{Order, OrderItemRef, OrderStatus, TransitionRequest};
use shared::{AppError, AppResult, ErrorCode};
use sqlx::SqlitePool;

use crate::db::repository::{order as order_repo, product as product_repo};
use crate::utils::now_rfc3339;

/// Apply a status transition to an order of the given store.
///
/// Cancellation requires a non-empty reason and puts tracked stock back
/// for direct product lines. Combo components are not restored: the
/// composition may have changed since the sale.
pub async fn transition_order(
    pool: &SqlitePool,
    store_id: &str,
    order_id: &str,
    req: &TransitionRequest,
) -> AppResult<Order> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let order = match order_repo::find_by_id(&mut tx, store_id, order_id).await? {
        Some(order) => order,
        // Mutating another store's order is a permission failure, not a
        // missing resource
        None => match order_repo::find_owner_store(&mut tx, order_id).await? {
            Some(_) => return Err(AppError::forbidden("Order belongs to another store")),
            None => return Err(AppError::not_found("Order")),
        },
    };

    if !order.status.can_transition(req.status) {
        return Err(AppError::invalid_transition(format!(
            "Cannot move order from {:?} to {:?}",
            order.status, req.status
        ))
        .with_detail("from", format!("{:?}", order.status))
        .with_detail("to", format!("{:?}", req.status)));
    }

    if req.status == OrderStatus::Cancelled {
        let reason = req
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| AppError::new(ErrorCode::CancelReasonRequired))?;

        let cancelled_at = now_rfc3339();
        order_repo::mark_cancelled(&mut tx, order_id, reason, &cancelled_at).await?;

        for item in &order.items {
            if let OrderItemRef::Product(sp_id) = &item.item_ref {
                product_repo::restore_stock(&mut tx, sp_id, item.quantity).await?;
            }
        }
    } else {
        order_repo::update_status(&mut tx, order_id, req.status).await?;
    }

    let updated = order_repo::find_by_id(&mut tx, store_id, order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;

    tx.commit()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    tracing::info!(
        order_id = %order_id,
        from = ?order.status,
        to = ?req.status,
        "Order transitioned"
    );

    Ok(updated)
}
