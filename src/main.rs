use anyhow::{Context, Result};
use std::{env, path::PathBuf};
use taxi_ingest::{ingest, sink, IngestConfig};
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) read execution context ───────────────────────────────────
    let config = IngestConfig::from_env().context("reading BRUIN_* parameters")?;
    let out_dir = PathBuf::from(env::var("TAXI_OUTPUT_DIR").unwrap_or_else(|_| "parquet".into()));
    info!(
        start = %config.start_date,
        end = %config.end_date,
        taxi_types = ?config.taxi_types,
        out_dir = %out_dir.display(),
        "configured"
    );

    // ─── 3) fetch + normalize every month/type ───────────────────────
    let output = ingest::run(&config).await.context("ingesting trip files")?;
    for src in &output.skipped {
        info!(file = %src.file_name, "skipped (not published)");
    }

    // ─── 4) append to the output table ───────────────────────────────
    let table = sink::conform(&output.table).context("conforming to output schema")?;
    match sink::append_parquet(&out_dir, &table, &output.extracted_at)
        .context("writing output parquet")?
    {
        Some(path) => info!(rows = table.num_rows(), path = %path.display(), "appended"),
        None => info!("no rows ingested"),
    }

    info!("all done");
    Ok(())
}
