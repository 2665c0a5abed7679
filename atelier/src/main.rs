mod manifest;

use std::path::PathBuf;

use anyhow::anyhow;
use atelier_assets::HttpFetcher;
use atelier_engine::{BatchOutcome, Orchestrator};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::manifest::Manifest;

/// Download the asset batches of a manifest and assemble them into a scene
#[derive(Debug, Parser)]
#[command(name = "atelier", version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
    /// TOML manifest listing the pipeline settings, anchors and batches
    manifest: PathBuf,
    #[arg(long, default_value = "info")]
    log_level: Level,
    /// Overrides `pipeline.tick_ms` from the manifest
    #[arg(long)]
    tick_ms: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut manifest = Manifest::load(&args.manifest)?;
    if let Some(tick_ms) = args.tick_ms {
        manifest.pipeline.tick_ms = tick_ms;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(manifest))
}

async fn run(manifest: Manifest) -> anyhow::Result<()> {
    let Manifest {
        pipeline,
        anchors,
        batches,
    } = manifest;
    let fetcher = HttpFetcher::new(pipeline.request_timeout())?;
    let orchestrator = Orchestrator::new(fetcher, pipeline);
    {
        let mut scene = orchestrator
            .scene()
            .lock()
            .map_err(|_| anyhow!("scene lock poisoned"))?;
        for anchor in &anchors {
            scene.add_anchor(&anchor.name);
        }
    }

    let handles: Vec<_> = batches
        .into_iter()
        .map(|batch| orchestrator.enqueue(batch))
        .collect();
    let mut missing = 0;
    for outcome in futures::future::join_all(handles).await {
        match outcome? {
            BatchOutcome::Assembled(report) => tracing::info!(
                root = ?report.root,
                nodes = report.nodes,
                bound = ?report.bound_sub_assets,
                skipped_channels = report.skipped_channels,
                volume = report.volume.volume,
                mass = report.volume.mass,
                "assembled"
            ),
            BatchOutcome::ObjectMissing => missing += 1,
        }
    }

    let nodes = orchestrator
        .scene()
        .lock()
        .map_err(|_| anyhow!("scene lock poisoned"))?
        .node_count();
    tracing::info!(nodes, missing, "pipeline finished");
    Ok(())
}
