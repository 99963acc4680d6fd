use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use sluice::prelude::*;
use sluice_example::{logging::init_logging, Settings};

/// Any event carrying the standard metadata block
#[derive(Debug, Deserialize)]
struct AnyEvent {
    metadata: EventMetadata,
    #[serde(flatten)]
    body: Value,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load().context("Failed to load configuration")?;
    init_logging(&settings.logging);

    let strategy = settings.stream.commit_strategy()?;
    tracing::info!(
        base_url = %settings.client.base_url,
        subscription_id = %settings.stream.subscription_id,
        ?strategy,
        "Starting consumer"
    );

    let sluice = SluiceBuilder::new()
        .client_config(settings.client.clone())
        .consumer_config(settings.consumer.clone())
        .build()?;

    let subscription_id = SubscriptionId::new(settings.stream.subscription_id.clone());
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Ctrl-C received, stopping");
    };

    sluice
        .consume_until(
            &subscription_id,
            &settings.stream.parameters(),
            strategy,
            |batch: EventStreamBatch<AnyEvent>| async move {
                for event in &batch.events {
                    let lag_ms = (Utc::now() - event.metadata.occurred_at).num_milliseconds();
                    tracing::info!(
                        eid = %event.metadata.eid,
                        partition = %batch.cursor.partition,
                        lag_ms,
                        fields = event.body.as_object().map_or(0, |o| o.len()),
                        "Event received"
                    );
                }
                Ok(batch)
            },
            shutdown,
        )
        .await?;

    Ok(())
}
