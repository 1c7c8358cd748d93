//! Export a device's event timeline as JSON lines.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use mdt_client::{Client, ClientConfig};
use mdt_core::{MachineId, TimeWindow, timestamp};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::Config;
use crate::cli::TimelineArgs;

pub fn run<W: Write>(writer: &mut W, args: &TimelineArgs, config: &Config) -> Result<()> {
    let from = timestamp::parse(&args.from)
        .with_context(|| format!("invalid --from timestamp: {}", args.from))?;
    let to = timestamp::parse(&args.to)
        .with_context(|| format!("invalid --to timestamp: {}", args.to))?;
    let window = TimeWindow::new(from, to);
    let machine = MachineId::new(args.machine.as_str())?;

    let cookie = config
        .cookie
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| anyhow::anyhow!("missing cookie (pass --cookie or set MDT_COOKIE)"))?;
    let xsrf = config
        .xsrf_token
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            anyhow::anyhow!("missing anti-forgery token (pass --xsrf or set MDT_XSRF_TOKEN)")
        })?;

    let mut client_config = ClientConfig {
        retries: config.retries,
        backoff: Duration::from_secs(config.retry_backoff_secs),
        timeout: Duration::from_secs(config.request_timeout_secs),
        ..ClientConfig::default()
    };
    if let Some(base) = config.base_url.as_deref() {
        client_config.base_url =
            Some(Url::parse(base).with_context(|| format!("invalid base URL: {base}"))?);
    }

    let client =
        Client::with_config(cookie, xsrf, client_config).context("failed to create client")?;
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    runtime.block_on(export(writer, &client, window, &machine))
}

/// Drains the timeline stream into the writer, one JSON object per
/// line. Ctrl-C stops the walk at the next page boundary.
async fn export<W: Write>(
    writer: &mut W,
    client: &Client,
    window: TimeWindow,
    machine: &MachineId,
) -> Result<()> {
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let mut exported: u64 = 0;
    let mut stream = client.timeline(cancel.clone(), window, machine);
    while let Some(event) = stream.next().await {
        let event = event.context("timeline fetch failed")?;
        serde_json::to_writer(&mut *writer, &event)?;
        writeln!(writer)?;
        exported += 1;
    }

    if cancel.is_cancelled() {
        bail!("export interrupted");
    }
    tracing::info!(exported, machine = %machine, "timeline export complete");
    Ok(())
}
