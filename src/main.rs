// =============================================================================
// Aurora Analytics — Batch Runner
// =============================================================================
//
// Reads a JSON array of named series, runs every indicator over each series
// in parallel and writes one JSON report to stdout.  Logs go to stderr so the
// report can be piped.
//
//   ANALYTICS_CONFIG  config path   (default: analytics_config.json)
//   ANALYTICS_INPUT   input path    (or the first command-line argument)
//   RUST_LOG          log filter    (default: info)
// =============================================================================

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use aurora_analytics::report::{analyse_batch, load_inputs};
use aurora_analytics::AnalyticsConfig;

const DEFAULT_CONFIG_PATH: &str = "analytics_config.json";

fn main() -> Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path =
        std::env::var("ANALYTICS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = AnalyticsConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AnalyticsConfig::default()
    });

    let input_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("ANALYTICS_INPUT").ok())
        .context("no input file: pass a path or set ANALYTICS_INPUT")?;

    // ── 2. Analyse ───────────────────────────────────────────────────────
    let inputs = load_inputs(&input_path)?;
    info!(series = inputs.len(), threads = rayon::current_num_threads(), "Analysing");
    let batch = analyse_batch(&inputs, &config);

    // ── 3. Emit ──────────────────────────────────────────────────────────
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &batch).context("failed to write report")?;
    writeln!(out).context("failed to write report")?;

    if !batch.failures.is_empty() {
        warn!(failed = batch.failures.len(), "Some series could not be analysed");
    }
    Ok(())
}
