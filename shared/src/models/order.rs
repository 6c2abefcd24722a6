//! Order models
//!
//! An order is an append-only economic record: names and prices are captured
//! at sale time and never change when the catalog does. Line items are
//! immutable after creation; cancellation and re-ordering are the only paths
//! to change a placed basket.

use serde::{Deserialize, Serialize};

/// Delivery-progress state of a placed order
///
/// `Created → Confirmed → Preparing → ReadyForPickup | OutForDelivery →
/// Delivered`, with `Cancelled` reachable from any non-terminal state.
/// Transitions are one-directional and never skip forward past the next
/// stage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderStatus {
    #[default]
    Created,
    Confirmed,
    Preparing,
    ReadyForPickup,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Terminal states accept no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether a transition from `self` to `to` is permitted
    pub fn can_transition(&self, to: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        if to == Self::Cancelled {
            return true;
        }
        matches!(
            (self, to),
            (Self::Created, Self::Confirmed)
                | (Self::Confirmed, Self::Preparing)
                | (Self::Preparing, Self::ReadyForPickup)
                | (Self::Preparing, Self::OutForDelivery)
                | (Self::ReadyForPickup, Self::Delivered)
                | (Self::OutForDelivery, Self::Delivered)
        )
    }
}

/// What an order line references: a store product or a combo, never both
///
/// Modeled as a tagged choice rather than two nullable foreign keys, so the
/// "both set" and "neither set" states are unrepresentable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "id", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderItemRef {
    Product(String),
    Combo(String),
}

/// Add-on attached to an order line, price captured at order time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItemAddon {
    pub store_product_id: String,
    /// Name captured at sale time
    pub name: String,
    /// Price in cents captured at sale time
    pub price: i64,
}

/// One order line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItem {
    #[serde(flatten)]
    pub item_ref: OrderItemRef,
    /// Name captured at sale time (catalog renames never alter history)
    pub name: String,
    /// Unit price in cents captured at sale time
    pub price: i64,
    pub quantity: i64,
    /// Add-ons in submission order
    #[serde(default)]
    pub addons: Vec<OrderItemAddon>,
}

impl OrderItem {
    /// Line subtotal: (own price + sum of add-on prices) × quantity
    ///
    /// Persisted lines always fit in an `i64`: the pricing engine
    /// rejects baskets whose totals overflow before storing them.
    pub fn subtotal(&self) -> i64 {
        self.checked_subtotal().unwrap_or(i64::MAX)
    }

    /// Like [`subtotal`](Self::subtotal), but `None` on overflow
    pub fn checked_subtotal(&self) -> Option<i64> {
        let addons = self
            .addons
            .iter()
            .try_fold(0i64, |acc, a| acc.checked_add(a.price))?;
        self.price.checked_add(addons)?.checked_mul(self.quantity)
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub store_id: String,
    /// Position in the store's pickup queue, assigned at creation
    pub queue_number: Option<i64>,
    pub table_number: Option<i64>,
    pub customer_id: Option<String>,
    /// Null when the order is a pickup
    pub delivery_address_id: Option<String>,
    pub created_at: String,
    /// Total in cents: sum of line subtotals minus discount
    pub total: i64,
    /// Discount in cents, 0 ≤ discount ≤ subtotal
    pub discount: i64,
    pub status: OrderStatus,
    pub payment_method: Option<String>,
    /// Cash orders: amount the customer pays with, for computing change
    pub change_for: Option<i64>,
    pub notes: Option<String>,
    pub is_pickup: bool,
    /// Set only when status is Cancelled
    pub cancel_reason: Option<String>,
    pub cancelled_at: Option<String>,
    /// Lines in submission order
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Subtotal in cents before discount
    pub fn subtotal(&self) -> i64 {
        self.items.iter().map(|i| i.subtotal()).sum()
    }
}

/// Basket submitted by a customer (or staff on the customer's behalf)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    /// May be empty on the staff surface, where the active store applies
    #[serde(default)]
    pub store_id: String,
    pub customer_id: Option<String>,
    pub delivery_address_id: Option<String>,
    pub lines: Vec<OrderLineRequest>,
    pub payment_method: Option<String>,
    /// Discount in cents
    #[serde(default)]
    pub discount: i64,
    pub change_for: Option<i64>,
    pub notes: Option<String>,
    #[serde(default)]
    pub is_pickup: bool,
    pub table_number: Option<i64>,
}

/// One requested basket line: exactly one of `store_product_id` / `combo_id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineRequest {
    pub store_product_id: Option<String>,
    pub combo_id: Option<String>,
    pub quantity: i64,
    /// Requested add-ons (product lines only), by store product id
    #[serde(default)]
    pub addon_ids: Vec<String>,
}

/// Status transition payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub status: OrderStatus,
    /// Required (non-empty) when status is Cancelled
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        use OrderStatus::*;
        assert!(Created.can_transition(Confirmed));
        assert!(Confirmed.can_transition(Preparing));
        assert!(Preparing.can_transition(ReadyForPickup));
        assert!(Preparing.can_transition(OutForDelivery));
        assert!(ReadyForPickup.can_transition(Delivered));
        assert!(OutForDelivery.can_transition(Delivered));
    }

    #[test]
    fn test_no_skipping_or_backward() {
        use OrderStatus::*;
        assert!(!Created.can_transition(Delivered));
        assert!(!Created.can_transition(Preparing));
        assert!(!Confirmed.can_transition(Created));
        assert!(!Preparing.can_transition(Confirmed));
        assert!(!ReadyForPickup.can_transition(OutForDelivery));
    }

    #[test]
    fn test_cancel_from_any_non_terminal() {
        use OrderStatus::*;
        for s in [Created, Confirmed, Preparing, ReadyForPickup, OutForDelivery] {
            assert!(s.can_transition(Cancelled), "{s:?} should allow cancel");
        }
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        use OrderStatus::*;
        for terminal in [Delivered, Cancelled] {
            for to in [
                Created,
                Confirmed,
                Preparing,
                ReadyForPickup,
                OutForDelivery,
                Delivered,
                Cancelled,
            ] {
                assert!(!terminal.can_transition(to));
            }
        }
    }

    #[test]
    fn test_line_subtotal_includes_addons() {
        let item = OrderItem {
            item_ref: OrderItemRef::Product("sp-1".into()),
            name: "Burger".into(),
            price: 1000,
            quantity: 2,
            addons: vec![OrderItemAddon {
                store_product_id: "sp-2".into(),
                name: "Cheese".into(),
                price: 150,
            }],
        };
        // (10.00 + 1.50) × 2 = 23.00
        assert_eq!(item.subtotal(), 2300);
    }

    #[test]
    fn test_subtotal_does_not_overflow() {
        let item = OrderItem {
            item_ref: OrderItemRef::Product("sp-1".into()),
            name: "Burger".into(),
            price: 1000,
            quantity: i64::MAX / 2,
            addons: vec![],
        };
        assert_eq!(item.checked_subtotal(), None);
        assert_eq!(item.subtotal(), i64::MAX);
    }

    #[test]
    fn test_item_ref_wire_format() {
        let item = OrderItemRef::Combo("combo-9".into());
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, r#"{"kind":"COMBO","id":"combo-9"}"#);

        let back: OrderItemRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&OrderStatus::ReadyForPickup).unwrap();
        assert_eq!(json, "\"READY_FOR_PICKUP\"");
    }
}
