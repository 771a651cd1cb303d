//! Aggregates module
pub mod return_item;
pub mod return_request;
pub mod selector;

pub use return_item::ReturnItemDraft;
pub use return_request::{total_return_quantity, ReturnRequestDraft, ReturnRequestFields};
pub use selector::{ReturnSelector, SelectorError};
