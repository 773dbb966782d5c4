//! Atomic CRM - seeds a session and reports the pipeline.
//!
//! Configuration comes from `ATOMIC_CRM__*` environment variables (and
//! `.env`). With an API key configured, one deal analysis is requested to
//! exercise the assistant.

use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use atomic_crm::adapters::ai::{GeminiConfig, GeminiProvider};
use atomic_crm::application::CrmSession;
use atomic_crm::config::{AiConfig, AppConfig, LogFormat, LoggingConfig};
use atomic_crm::domain::assistant::AssistantContext;
use atomic_crm::domain::deal::{group_by_stage, DealStage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // Initialize tracing/logging
    init_tracing(&config.logging);

    config.validate()?;
    if !config.ai.has_api_key() {
        warn!("ATOMIC_CRM__AI__API_KEY is not set; assistant requests will return fallback text");
    }

    let provider = GeminiProvider::new(gemini_config(&config.ai))?;
    let session = CrmSession::seeded(Arc::new(provider))?;

    let deals = session.store().deals();
    let board = group_by_stage(&deals);
    for column in board.columns() {
        info!(
            stage = %column.stage,
            label = column.label,
            deals = column.len(),
            value = %column.total_value,
            "Pipeline column"
        );
    }

    let stats = session.stats();
    info!(
        total_pipeline = %stats.total_pipeline,
        active_deals = stats.active_deals,
        total_contacts = stats.total_contacts,
        won_deals = stats.won_deals,
        "Dashboard"
    );

    if config.ai.has_api_key() {
        let target = deals
            .iter()
            .find(|d| d.stage() == DealStage::Negotiation)
            .or_else(|| deals.first());

        if let Some(deal) = target {
            let tip = session
                .request_draft(&AssistantContext::for_deal(deal))
                .await;
            info!(deal_id = %deal.id(), contact = %session.store().contact_name(deal.contact_id()), %tip, "Deal insight");
        }
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(logging.env_filter());
    match logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn gemini_config(ai: &AiConfig) -> GeminiConfig {
    GeminiConfig::new(ai.api_key.clone().unwrap_or_default())
        .with_model(&ai.model)
        .with_base_url(&ai.base_url)
        .with_timeout(ai.timeout())
        .with_max_retries(ai.max_retries)
}
