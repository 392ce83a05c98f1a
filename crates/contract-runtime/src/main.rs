//! `contract-runtime`: reads one JSON invocation per line on stdin and
//! writes one JSON response per line on stdout, against an in-memory
//! ledger that lives as long as the process. With `--metrics` or
//! `LC_DUMP_METRICS=true` the Prometheus text dump goes to stderr on exit.

use std::sync::Arc;

use anyhow::{Context, Result};
use contract_runtime::{serve_lines, ContractRuntime, RuntimeConfig};
use lc_01_world_state::{InMemoryLedger, Ledger};
use ledger_telemetry::{encode_metrics, init_telemetry, TelemetryConfig};
use shared_bus::InMemoryEventBus;
use tokio::io::{AsyncWriteExt, BufReader};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = RuntimeConfig::from_env().context("loading runtime configuration")?;
    let telemetry = TelemetryConfig::for_contract(config.contract.name());
    let _guard = init_telemetry(telemetry).context("initializing telemetry")?;

    let bus = Arc::new(InMemoryEventBus::with_capacity(config.event_channel_capacity));
    let runtime = ContractRuntime::new(&config, InMemoryLedger::new(), bus)
        .context("building contract runtime")?;

    info!(
        contract = %config.contract,
        version = %config.contract_version,
        operations = runtime.registry().len(),
        "Contract runtime ready"
    );

    let answered = serve_lines(&runtime, BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
        .context("serving stdin")?;

    info!(
        height = runtime.ledger().height(),
        answered,
        "Input closed, shutting down"
    );

    if config.dump_metrics || std::env::args().any(|arg| arg == "--metrics") {
        let text = encode_metrics().context("encoding metrics")?;
        let mut stderr = tokio::io::stderr();
        stderr.write_all(text.as_bytes()).await.context("writing metrics")?;
        stderr.flush().await.context("flushing stderr")?;
    }
    Ok(())
}
