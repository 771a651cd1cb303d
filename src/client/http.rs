//! HTTP implementation of [`AdminApi`] over reqwest

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use super::{AdminApi, ORDER_ITEMS_SUMMARY_PATH, RETURN_INVOICE_PATH, RETURN_ITEM_PATH, RETURN_PICTURE_PATH, RETURN_REQUEST_PATH};
use crate::config::AdminConfig;
use crate::domain::aggregates::{ReturnItemDraft, ReturnRequestDraft};
use crate::evidence::EvidenceImage;
use crate::filter::{to_query_pairs, ListFilter};
use crate::{
    ApiEnvelope, CreatedReturnRequest, OrderItemInfo, Result, ReturnInvoice, ReturnItemRecord,
    ReturnRequestSummary, ReturnsError,
};

#[derive(Debug, Clone)]
pub struct HttpAdminApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpAdminApi {
    pub fn new(config: &AdminConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> Result<reqwest::Response> {
        let response = self.authorize(req).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %body, "Admin API request failed");
            return Err(ReturnsError::Status { status: status.as_u16(), body });
        }
        Ok(response)
    }

    /// Sends the request and unwraps the `{ data }` envelope.
    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let response = self.send(req).await?;
        let text = response.text().await?;
        let envelope: ApiEnvelope<T> = serde_json::from_str(&text)
            .map_err(|e| ReturnsError::InvalidResponse(format!("{e}: {text}")))?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl AdminApi for HttpAdminApi {
    async fn order_items_summary(&self, order_id: i64) -> Result<Vec<OrderItemInfo>> {
        let path = ORDER_ITEMS_SUMMARY_PATH.replace("{orderId}", &order_id.to_string());
        self.fetch(self.client.get(self.url(&path))).await
    }

    async fn create_return_request(&self, request: &ReturnRequestDraft) -> Result<i64> {
        let created: CreatedReturnRequest = self.fetch(self.client.post(self.url(RETURN_REQUEST_PATH)).json(request)).await?;
        tracing::info!(return_request_id = created.id, order_id = request.order_id(), "Return request created");
        Ok(created.id)
    }

    async fn delete_return_request(&self, return_request_id: i64) -> Result<()> {
        let url = format!("{}/{}", self.url(RETURN_REQUEST_PATH), return_request_id);
        self.send(self.client.delete(url)).await?;
        tracing::info!(return_request_id, "Return request deleted");
        Ok(())
    }

    async fn create_return_items(&self, items: &[ReturnItemDraft]) -> Result<Vec<ReturnItemRecord>> {
        let records: Vec<ReturnItemRecord> = self.fetch(self.client.post(self.url(RETURN_ITEM_PATH)).json(items)).await?;
        tracing::info!(count = records.len(), "Return items created");
        Ok(records)
    }

    async fn upload_return_picture(&self, return_item_id: i64, image: &EvidenceImage) -> Result<()> {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)?;
        let form = Form::new()
            .text("returnItemId", return_item_id.to_string())
            .part("images", part);
        self.send(self.client.post(self.url(RETURN_PICTURE_PATH)).multipart(form)).await?;
        tracing::info!(return_item_id, size = image.bytes.len(), "Evidence uploaded");
        Ok(())
    }

    async fn list_return_requests(&self, filters: &[ListFilter]) -> Result<Vec<ReturnRequestSummary>> {
        let query = to_query_pairs(filters);
        self.fetch(self.client.get(self.url(RETURN_REQUEST_PATH)).query(&query)).await
    }

    async fn list_return_items(&self, return_request_id: i64) -> Result<Vec<ReturnItemRecord>> {
        self.fetch(self.client.get(self.url(RETURN_ITEM_PATH)).query(&[("returnRequestId", return_request_id)])).await
    }

    async fn list_return_invoices(&self) -> Result<Vec<ReturnInvoice>> {
        self.fetch(self.client.get(self.url(RETURN_INVOICE_PATH))).await
    }
}
