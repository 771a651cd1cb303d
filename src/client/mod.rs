//! Admin REST API client

pub mod http;

use async_trait::async_trait;
use crate::domain::aggregates::{ReturnItemDraft, ReturnRequestDraft};
use crate::evidence::EvidenceImage;
use crate::filter::ListFilter;
use crate::{OrderItemInfo, Result, ReturnInvoice, ReturnItemRecord, ReturnRequestSummary};

pub use http::HttpAdminApi;

pub const ORDER_ITEMS_SUMMARY_PATH: &str = "/api/admin/orders/{orderId}/order-items-summary";
pub const RETURN_REQUEST_PATH: &str = "/api/admin/return-request";
pub const RETURN_ITEM_PATH: &str = "/api/admin/return-item";
pub const RETURN_INVOICE_PATH: &str = "/api/admin/return-invoice";
pub const RETURN_PICTURE_PATH: &str = "/admin/picture-return-product";

/// Endpoints the returns workflow talks to.
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn order_items_summary(&self, order_id: i64) -> Result<Vec<OrderItemInfo>>;

    /// Creates the request and returns the id the backend assigned.
    async fn create_return_request(&self, request: &ReturnRequestDraft) -> Result<i64>;

    async fn delete_return_request(&self, return_request_id: i64) -> Result<()>;

    async fn create_return_items(&self, items: &[ReturnItemDraft]) -> Result<Vec<ReturnItemRecord>>;

    async fn upload_return_picture(&self, return_item_id: i64, image: &EvidenceImage) -> Result<()>;

    async fn list_return_requests(&self, filters: &[ListFilter]) -> Result<Vec<ReturnRequestSummary>>;

    async fn list_return_items(&self, return_request_id: i64) -> Result<Vec<ReturnItemRecord>>;

    async fn list_return_invoices(&self) -> Result<Vec<ReturnInvoice>>;
}
