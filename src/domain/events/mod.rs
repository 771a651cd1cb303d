//! Domain events
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

#[derive(Clone, Debug, PartialEq)]
pub enum DomainEvent {
    Selection(SelectionEvent),
    Request(RequestEvent),
}

#[derive(Clone, Debug, PartialEq)]
pub enum SelectionEvent {
    DraftCreated { product_id: i64, quantity: u32, refund_total: Decimal },
    Selected { product_id: i64 },
    Deselected { product_id: i64 },
    QuantityChanged { product_id: i64, quantity: u32, refund_total: Decimal },
    QuantityClamped { product_id: i64, requested: u32, applied: u32 },
}

#[derive(Clone, Debug, PartialEq)]
pub enum RequestEvent {
    Aggregated { order_id: i64, total_return_quantity: u32, at: DateTime<Utc> },
}
