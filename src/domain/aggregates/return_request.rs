//! Return Request Aggregate

use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use crate::domain::aggregates::ReturnItemDraft;
use crate::domain::events::{DomainEvent, RequestEvent};
use crate::domain::value_objects::{is_known_reason, RequestAction};

/// Free-form fields the operator fills in on the return form.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequestFields {
    pub customer_id: i64,
    pub order_id: i64,
    #[serde(default)]
    pub reason_for_return: String,
    #[serde(default)]
    pub request_action: RequestAction,
    #[serde(default)]
    pub customer_comments: String,
    #[serde(default)]
    pub staff_notes: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequestDraft {
    customer_id: i64,
    order_id: i64,
    #[validate(custom = "validate_reason")]
    reason_for_return: String,
    request_action: RequestAction,
    total_return_quantity: u32,
    #[validate(length(max = 2000))]
    customer_comments: String,
    #[validate(length(max = 2000))]
    staff_notes: String,
    return_request_status_id: i64,
    #[serde(skip)]
    events: Vec<DomainEvent>,
}

fn validate_reason(reason: &str) -> Result<(), ValidationError> {
    if is_known_reason(reason) { Ok(()) } else { Err(ValidationError::new("unknown_return_reason")) }
}

/// Sum of all draft quantities, zero rows included.
pub fn total_return_quantity(items: &[ReturnItemDraft]) -> u32 {
    items.iter().fold(0u32, |acc, i| acc.saturating_add(i.quantity()))
}

impl ReturnRequestDraft {
    /// Builds the request body from the form fields and the edited drafts.
    /// No validation happens here; see [`Validate::validate`].
    pub fn aggregate(fields: ReturnRequestFields, items: &[ReturnItemDraft], status_id: i64) -> Self {
        let total = total_return_quantity(items);
        let mut draft = Self {
            customer_id: fields.customer_id,
            order_id: fields.order_id,
            reason_for_return: fields.reason_for_return,
            request_action: fields.request_action,
            total_return_quantity: total,
            customer_comments: fields.customer_comments,
            staff_notes: fields.staff_notes,
            return_request_status_id: status_id,
            events: vec![],
        };
        draft.raise_event(DomainEvent::Request(RequestEvent::Aggregated {
            order_id: draft.order_id, total_return_quantity: total, at: Utc::now(),
        }));
        draft
    }

    pub fn customer_id(&self) -> i64 { self.customer_id }
    pub fn order_id(&self) -> i64 { self.order_id }
    pub fn reason_for_return(&self) -> &str { &self.reason_for_return }
    pub fn request_action(&self) -> RequestAction { self.request_action }
    pub fn total_return_quantity(&self) -> u32 { self.total_return_quantity }
    pub fn customer_comments(&self) -> &str { &self.customer_comments }
    pub fn staff_notes(&self) -> &str { &self.staff_notes }
    pub fn return_request_status_id(&self) -> i64 { self.return_request_status_id }

    /// True when the stored total still matches `items`.
    pub fn matches(&self, items: &[ReturnItemDraft]) -> bool {
        self.total_return_quantity == total_return_quantity(items)
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use crate::OrderItemInfo;

    fn draft(product_id: i64, purchased: u32, quantity: u32) -> ReturnItemDraft {
        let mut d = ReturnItemDraft::from_order_item(&OrderItemInfo {
            order_item_id: None, product_id, product_name: format!("P{product_id}"),
            quantity: purchased, product_price: Decimal::new(50, 0), discount_amount: Decimal::ZERO,
        });
        d.set_quantity(quantity);
        d
    }

    fn fields() -> ReturnRequestFields {
        ReturnRequestFields {
            customer_id: 7, order_id: 1001, reason_for_return: "Wrong size".into(),
            request_action: RequestAction::Exchange, ..Default::default()
        }
    }

    #[test]
    fn test_total_includes_zero_rows() {
        let items = vec![draft(1, 3, 2), draft(2, 4, 0)];
        let request = ReturnRequestDraft::aggregate(fields(), &items, 4);
        assert_eq!(request.total_return_quantity(), 2);
        assert!(request.matches(&items));
        assert!(!request.matches(&[draft(1, 3, 3)]));
    }

    #[test]
    fn test_aggregate_raises_event() {
        let mut request = ReturnRequestDraft::aggregate(fields(), &[draft(1, 2, 2)], 4);
        let events = request.take_events();
        assert!(matches!(events.as_slice(), [DomainEvent::Request(RequestEvent::Aggregated { order_id: 1001, total_return_quantity: 2, .. })]));
        assert!(request.take_events().is_empty());
    }

    #[test]
    fn test_validation() {
        let request = ReturnRequestDraft::aggregate(fields(), &[draft(1, 1, 1)], 4);
        assert!(request.validate().is_ok());

        let empty_reason = ReturnRequestDraft::aggregate(
            ReturnRequestFields { reason_for_return: String::new(), ..fields() }, &[draft(1, 1, 1)], 4);
        assert!(empty_reason.validate().is_err());

        let long_notes = ReturnRequestDraft::aggregate(
            ReturnRequestFields { staff_notes: "x".repeat(2001), ..fields() }, &[draft(1, 1, 1)], 4);
        assert!(long_notes.validate().is_err());
    }

    #[test]
    fn test_wire_shape() {
        let request = ReturnRequestDraft::aggregate(fields(), &[draft(1, 3, 3)], 4);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["requestAction"], "EXCHANGE");
        assert_eq!(body["totalReturnQuantity"], 3);
        assert_eq!(body["returnRequestStatusId"], 4);
        assert!(body.get("events").is_none());
    }
}
