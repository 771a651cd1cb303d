//! Return submission
//!
//! Persists a return as a short saga against the admin API:
//!
//! 1. create the return request and obtain its id;
//! 2. stamp every item draft with that id and create them in one batch,
//!    deleting the request again if this step fails or the caller cancels;
//! 3. upload staged evidence, one call per image, with bounded retries.
//!
//! Evidence failures never fail the submission; they are reported in the
//! receipt. Staged evidence is cleared however the submission ends.

use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use validator::Validate;
use crate::client::AdminApi;
use crate::config::SubmissionOptions;
use crate::domain::aggregates::{total_return_quantity, ReturnItemDraft, ReturnRequestDraft};
use crate::evidence::{EvidenceImage, EvidenceStaging};
use crate::{Result, ReturnItemRecord, ReturnsError};

#[derive(Clone, Debug, PartialEq)]
pub enum EvidenceOutcome {
    Uploaded { product_id: i64, return_item_id: i64, attempts: u32 },
    Failed { product_id: i64, return_item_id: Option<i64>, attempts: u32, error: String },
    Skipped { product_id: i64 },
}

impl EvidenceOutcome {
    pub fn product_id(&self) -> i64 {
        match self {
            Self::Uploaded { product_id, .. } | Self::Failed { product_id, .. } | Self::Skipped { product_id } => *product_id,
        }
    }

    pub fn is_uploaded(&self) -> bool { matches!(self, Self::Uploaded { .. }) }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubmissionReceipt {
    pub return_request_id: i64,
    pub items: Vec<ReturnItemRecord>,
    pub total_return_quantity: u32,
    pub total_refund: Decimal,
    pub evidence: Vec<EvidenceOutcome>,
}

pub struct ReturnSubmission<A> {
    api: A,
    options: SubmissionOptions,
}

impl<A: AdminApi> ReturnSubmission<A> {
    pub fn new(api: A, options: SubmissionOptions) -> Self {
        Self { api, options }
    }

    pub fn api(&self) -> &A { &self.api }

    pub async fn submit(
        &self,
        items: Vec<ReturnItemDraft>,
        request: ReturnRequestDraft,
        evidence: &mut EvidenceStaging,
        cancel: &CancellationToken,
    ) -> Result<SubmissionReceipt> {
        let result = self.run(items, &request, evidence, cancel).await;
        evidence.clear();
        match &result {
            Ok(receipt) => info!(
                return_request_id = receipt.return_request_id,
                items = receipt.items.len(),
                total_refund = %receipt.total_refund,
                "Return submitted"
            ),
            Err(e) => error!(order_id = request.order_id(), error = %e, "Return submission failed"),
        }
        result
    }

    async fn run(
        &self,
        mut items: Vec<ReturnItemDraft>,
        request: &ReturnRequestDraft,
        evidence: &EvidenceStaging,
        cancel: &CancellationToken,
    ) -> Result<SubmissionReceipt> {
        if items.is_empty() {
            return Err(ReturnsError::Validation("at least one return item is required".into()));
        }
        request.validate().map_err(|e| ReturnsError::Validation(e.to_string()))?;
        if !request.matches(&items) {
            return Err(ReturnsError::Validation(format!(
                "total return quantity {} does not match items ({})",
                request.total_return_quantity(),
                total_return_quantity(&items)
            )));
        }
        if cancel.is_cancelled() {
            return Err(ReturnsError::Cancelled);
        }

        let return_request_id = self.api.create_return_request(request).await?;
        if cancel.is_cancelled() {
            return Err(self.compensate(return_request_id, ReturnsError::Cancelled).await);
        }

        for item in items.iter_mut() {
            item.stamp(return_request_id);
        }
        let records = match self.api.create_return_items(&items).await {
            Ok(records) => records,
            Err(e) => return Err(self.compensate(return_request_id, e).await),
        };

        let mut outcomes = Vec::new();
        for item in &items {
            let Some(image) = evidence.get(item.product_id()) else { continue };
            let outcome = match records.iter().find(|r| r.product_id == item.product_id()) {
                _ if cancel.is_cancelled() => EvidenceOutcome::Skipped { product_id: item.product_id() },
                Some(record) => self.upload_with_retry(record.id, image, cancel).await,
                None => EvidenceOutcome::Failed {
                    product_id: item.product_id(),
                    return_item_id: None,
                    attempts: 0,
                    error: "backend returned no return item for this product".into(),
                },
            };
            outcomes.push(outcome);
        }
        for product_id in evidence.product_ids() {
            if !items.iter().any(|i| i.product_id() == product_id) {
                debug!(product_id, "Evidence staged for a product not being returned");
                outcomes.push(EvidenceOutcome::Skipped { product_id });
            }
        }

        Ok(SubmissionReceipt {
            return_request_id,
            total_return_quantity: request.total_return_quantity(),
            total_refund: items.iter().fold(Decimal::ZERO, |acc, i| acc + i.refund_total()),
            items: records,
            evidence: outcomes,
        })
    }

    /// Deletes a request whose items never made it. Returns the error to surface.
    async fn compensate(&self, return_request_id: i64, cause: ReturnsError) -> ReturnsError {
        warn!(return_request_id, cause = %cause, "Rolling back return request");
        match self.api.delete_return_request(return_request_id).await {
            Ok(()) => cause,
            Err(e) => {
                error!(return_request_id, error = %e, "Rollback failed");
                ReturnsError::Orphaned { return_request_id, cause: cause.to_string() }
            }
        }
    }

    async fn upload_with_retry(&self, return_item_id: i64, image: &EvidenceImage, cancel: &CancellationToken) -> EvidenceOutcome {
        let product_id = image.product_id;
        let max_attempts = self.options.evidence_max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.api.upload_return_picture(return_item_id, image).await {
                Ok(()) => return EvidenceOutcome::Uploaded { product_id, return_item_id, attempts: attempt },
                Err(e) if attempt >= max_attempts => {
                    warn!(product_id, return_item_id, attempts = attempt, error = %e, "Evidence upload gave up");
                    return EvidenceOutcome::Failed { product_id, return_item_id: Some(return_item_id), attempts: attempt, error: e.to_string() };
                }
                Err(e) => debug!(product_id, attempt, error = %e, "Evidence upload failed, retrying"),
            }
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return EvidenceOutcome::Skipped { product_id },
                _ = tokio::time::sleep(self.options.evidence_retry_delay) => {}
            }
        }
    }
}
