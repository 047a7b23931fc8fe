use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use politograph_common::Config;
use politograph_pipeline::pipeline::Pipeline;

/// Classify crawled news titles and append the outcomes to the ledger.
#[derive(Parser, Debug)]
#[command(name = "politograph-pipeline")]
struct Args {
    /// Directory of tab-separated partition files (overrides PARTITIONS_DIR).
    #[arg(long)]
    partitions: Option<PathBuf>,

    /// Ledger of processed titles (overrides LEDGER_PATH).
    #[arg(long)]
    ledger: Option<PathBuf>,

    /// Max classification calls in flight (overrides PIPELINE_CONCURRENCY).
    #[arg(long)]
    concurrency: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("politograph_pipeline=info".parse()?)
                .add_directive("classifier_client=info".parse()?),
        )
        .init();

    info!("Politograph pipeline starting...");

    let args = Args::parse();
    let mut config = Config::from_env();
    if let Some(partitions) = args.partitions {
        config.partitions_dir = partitions;
    }
    if let Some(ledger) = args.ledger {
        config.ledger_path = ledger;
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }

    let mut pipeline = Pipeline::from_config(&config)?;
    let stats = pipeline.run().await?;
    info!("Pipeline run complete. {stats}");

    Ok(())
}
