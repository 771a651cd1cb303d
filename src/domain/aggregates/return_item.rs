//! Return Item Draft

use rust_decimal::Decimal;
use serde::Serialize;
use crate::domain::value_objects::{compute_refund, per_unit_discount, ReturnQuantity};
use crate::OrderItemInfo;

/// Editable staging record for one order line being returned.
///
/// Serializes to the body the return-item endpoint expects. The purchased
/// quantity is client state and stays off the wire.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnItemDraft {
    order_item_id: Option<i64>,
    product_id: i64,
    product_name: String,
    old_unit_price: Decimal,
    #[serde(skip)]
    purchased_quantity: u32,
    quantity: ReturnQuantity,
    discount_amount_per_item: Decimal,
    refund_total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_request_id: Option<i64>,
}

impl ReturnItemDraft {
    /// Draft pre-filled with the full purchased quantity.
    pub fn from_order_item(item: &OrderItemInfo) -> Self {
        let discount_amount_per_item = per_unit_discount(item.discount_amount, item.quantity);
        let (quantity, _) = ReturnQuantity::clamped(item.quantity, item.quantity);
        Self {
            order_item_id: item.order_item_id,
            product_id: item.product_id,
            product_name: item.product_name.clone(),
            old_unit_price: item.product_price,
            purchased_quantity: item.quantity,
            quantity,
            discount_amount_per_item,
            refund_total: compute_refund(item.product_price, discount_amount_per_item, item.quantity),
            return_request_id: None,
        }
    }

    pub fn order_item_id(&self) -> Option<i64> { self.order_item_id }
    pub fn product_id(&self) -> i64 { self.product_id }
    pub fn product_name(&self) -> &str { &self.product_name }
    pub fn old_unit_price(&self) -> Decimal { self.old_unit_price }
    pub fn purchased_quantity(&self) -> u32 { self.purchased_quantity }
    pub fn quantity(&self) -> u32 { self.quantity.value() }
    pub fn discount_amount_per_item(&self) -> Decimal { self.discount_amount_per_item }
    pub fn refund_total(&self) -> Decimal { self.refund_total }
    pub fn return_request_id(&self) -> Option<i64> { self.return_request_id }

    /// Applies an operator edit. Values above the purchased quantity are clamped;
    /// returns the applied quantity and whether clamping happened.
    pub fn set_quantity(&mut self, requested: u32) -> (u32, bool) {
        let (quantity, clamped) = ReturnQuantity::clamped(requested, self.purchased_quantity);
        self.quantity = quantity;
        self.recalculate();
        (quantity.value(), clamped)
    }

    pub fn stamp(&mut self, return_request_id: i64) {
        self.return_request_id = Some(return_request_id);
    }

    fn recalculate(&mut self) {
        self.refund_total = compute_refund(self.old_unit_price, self.discount_amount_per_item, self.quantity.value());
    }
}
