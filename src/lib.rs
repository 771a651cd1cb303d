//! OpenSASE Back-office Returns
//!
//! Product return workflow for the OpenSASE admin back-office.
//!
//! ## Features
//! - Order item selection with clamped return quantities
//! - Per-item refund calculation
//! - Return request aggregation
//! - Sequential submission to the admin REST API with compensation
//! - Evidence photo staging and upload

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod client;
pub mod config;
pub mod domain;
pub mod evidence;
pub mod filter;
pub mod submission;

pub use client::{AdminApi, HttpAdminApi};
pub use config::{AdminConfig, SubmissionOptions};
pub use domain::aggregates::{ReturnItemDraft, ReturnRequestDraft, ReturnRequestFields, ReturnSelector};
pub use evidence::{EvidenceImage, EvidenceStaging};
pub use submission::{EvidenceOutcome, ReturnSubmission, SubmissionReceipt};

// =============================================================================
// Core Types
// =============================================================================

/// Line item of a placed order, as summarised by the admin API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInfo {
    #[serde(default)]
    pub order_item_id: Option<i64>,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: u32,
    pub product_price: Decimal,
    #[serde(default)]
    pub discount_amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedReturnRequest {
    pub id: i64,
}

/// Return item as persisted by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnItemRecord {
    pub id: i64,
    pub product_id: i64,
    pub return_request_id: i64,
    #[serde(default)]
    pub order_item_id: Option<i64>,
    pub quantity: u32,
    #[serde(default)]
    pub refund_total: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequestSummary {
    pub id: i64,
    pub order_id: i64,
    pub customer_id: i64,
    #[serde(default)]
    pub reason_for_return: String,
    #[serde(default)]
    pub request_action: String,
    #[serde(default)]
    pub total_return_quantity: u32,
    #[serde(default)]
    pub return_request_status_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnInvoice {
    pub id: i64,
    pub return_request_id: i64,
    #[serde(default)]
    pub total_refund: Decimal,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Every admin API response is wrapped as `{ "data": ... }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,
}

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum ReturnsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend responded {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Selector(#[from] domain::aggregates::SelectorError),

    #[error("Evidence error: {0}")]
    Evidence(String),

    #[error("Submission cancelled")]
    Cancelled,

    #[error("Return request {return_request_id} left orphaned: {cause}")]
    Orphaned { return_request_id: i64, cause: String },
}

pub type Result<T> = std::result::Result<T, ReturnsError>;
