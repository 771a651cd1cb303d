//! OpenSASE Returns - files a product return through the admin API

use anyhow::{bail, Context, Result};
use clap::Parser;
use opensase_returns::{
    AdminApi, AdminConfig, EvidenceStaging, HttpAdminApi, ReturnRequestDraft, ReturnRequestFields,
    ReturnSelector, ReturnSubmission,
};
use serde::Deserialize;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "opensase-returns", about = "File a product return for an order")]
struct Cli {
    /// Path to the return form (JSON)
    form: PathBuf,
    /// Print the computed drafts without submitting
    #[arg(long)]
    dry_run: bool,
    /// Overrides ADMIN_API_BASE_URL
    #[arg(long, env = "ADMIN_API_BASE_URL")]
    base_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReturnForm {
    #[serde(flatten)]
    fields: ReturnRequestFields,
    items: Vec<ReturnFormItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReturnFormItem {
    product_id: i64,
    quantity: Option<u32>,
    evidence_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let cli = Cli::parse();
    let mut config = AdminConfig::from_env();
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    let raw = tokio::fs::read_to_string(&cli.form).await.with_context(|| format!("reading {}", cli.form.display()))?;
    let form: ReturnForm = serde_json::from_str(&raw).context("parsing return form")?;
    if form.items.is_empty() {
        bail!("return form lists no items");
    }

    let api = HttpAdminApi::new(&config)?;
    let order_items = api.order_items_summary(form.fields.order_id).await?;
    tracing::info!(order_id = form.fields.order_id, lines = order_items.len(), "Loaded order items");

    let mut selector = ReturnSelector::from_order_items(&order_items);
    let mut evidence = EvidenceStaging::new();
    for item in &form.items {
        selector.select(item.product_id)?;
        if let Some(quantity) = item.quantity {
            selector.set_quantity(item.product_id, quantity)?;
        }
        if let Some(path) = &item.evidence_path {
            evidence.stage_file(item.product_id, path).await?;
        }
    }
    for event in selector.take_events() {
        tracing::debug!(?event, "Selection");
    }

    let items = selector.selected_drafts();
    let mut request = ReturnRequestDraft::aggregate(form.fields, &items, config.default_status_id);
    for event in request.take_events() {
        tracing::debug!(?event, "Request");
    }

    if cli.dry_run {
        println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "request": request, "items": items }))?);
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling submission");
            on_signal.cancel();
        }
    });

    let submission = ReturnSubmission::new(api, config.submission.clone());
    let receipt = submission.submit(items, request, &mut evidence, &cancel).await?;

    println!("Return request #{} filed: {} item(s), {} unit(s), refund {}", receipt.return_request_id, receipt.items.len(), receipt.total_return_quantity, receipt.total_refund);
    for outcome in receipt.evidence.iter().filter(|o| !o.is_uploaded()) {
        println!("  evidence for product {} not uploaded: {:?}", outcome.product_id(), outcome);
    }
    Ok(())
}
