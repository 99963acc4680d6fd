use anyhow::{Context, Result};
use sluice::prelude::*;
use sluice_example::{logging::init_logging, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load().context("Failed to load configuration")?;
    init_logging(&settings.logging);

    let shift_by: u64 = std::env::args()
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()
        .context("Shift must be a non-negative integer")?
        .unwrap_or(0);

    let sluice = SluiceBuilder::new()
        .client_config(settings.client.clone())
        .build()?;
    let event_type = EventTypeName::new(settings.cursors.event_type.clone());

    let partitions = {
        use sluice::client::PartitionApi;
        sluice.client().partitions(&event_type).await?
    };

    for partition in &partitions {
        let oldest = partition.oldest_cursor();
        let newest = partition.newest_cursor();
        let retained = sluice.distance(&event_type, &oldest, &newest).await?;

        tracing::info!(
            partition = %partition.partition,
            oldest = %oldest.offset,
            newest = %newest.offset,
            retained,
            "Partition"
        );

        match sluice.shift(&event_type, &[oldest], shift_by).await {
            Ok(shifted) => tracing::info!(
                partition = %partition.partition,
                shift_by,
                offset = %shifted[0].offset,
                "Shifted oldest cursor"
            ),
            Err(e) => tracing::warn!(partition = %partition.partition, "Shift failed: {}", e),
        }
    }

    Ok(())
}
