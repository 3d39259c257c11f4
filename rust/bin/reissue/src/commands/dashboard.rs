//! Dashboard commands: status, history, pickup acknowledgement, watch.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use reissue_client::HistoryRequest;
use reissue_dashboard::{Dashboard, DashboardConfig};
use tracing::{debug, info};

use crate::render;

/// Read the archived list the host would normally supply: a JSON array of
/// history records.
pub fn load_archived(path: Option<&Path>) -> Result<Arc<Vec<HistoryRequest>>> {
    let Some(path) = path else {
        return Ok(Arc::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let records: Vec<HistoryRequest> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of requests", path.display()))?;
    Ok(Arc::new(records))
}

/// Open a dashboard for one student and wait for the initial fetches.
pub async fn open(
    server: &str,
    register_number: &str,
    archived: Arc<Vec<HistoryRequest>>,
) -> Result<Dashboard> {
    let api = super::client(server)?;
    let dashboard = Dashboard::new(api, DashboardConfig::default());
    dashboard.open(Some(register_number), archived).await;
    Ok(dashboard)
}

pub async fn status(
    server: &str,
    register_number: &str,
    archived: Arc<Vec<HistoryRequest>>,
    as_json: bool,
) -> Result<()> {
    let dashboard = open(server, register_number, archived).await?;
    render::view(&dashboard.view(), as_json)
}

pub async fn history(
    server: &str,
    register_number: &str,
    archived: Arc<Vec<HistoryRequest>>,
    as_json: bool,
) -> Result<()> {
    let dashboard = open(server, register_number, archived).await?;
    let view = dashboard.view();
    render::history(&view.history, as_json)?;
    if view.history.error.is_some() {
        anyhow::bail!("could not load history for {}", register_number);
    }
    Ok(())
}

/// Acknowledge pickup and archive the accepted card.
pub async fn ack(server: &str, register_number: &str, as_json: bool) -> Result<()> {
    let dashboard = open(server, register_number, Arc::default()).await?;
    if !dashboard.view().pickup.visible {
        anyhow::bail!("Nothing is ready for pickup for {}.", register_number);
    }

    dashboard.acknowledge_pickup().await;

    let view = dashboard.view();
    if as_json {
        render::json(&view.pickup)?;
    } else if let Some(notice) = &view.pickup.notice {
        render::notice(notice);
    }
    match &view.pickup.notice {
        Some(n) if n.success => Ok(()),
        _ => anyhow::bail!("transfer to history failed"),
    }
}

/// Re-fetch status every `interval` and print the view whenever it changes.
/// Stops on Ctrl-C.
pub async fn watch(
    server: &str,
    register_number: &str,
    interval: Duration,
    as_json: bool,
) -> Result<()> {
    let dashboard = open(server, register_number, Arc::default()).await?;
    let mut last = dashboard.view();
    render::view(&last, as_json)?;
    info!("watching {} every {:?}", register_number, interval);

    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                debug!("watch interrupted");
                break;
            }
            _ = ticker.tick() => {
                dashboard.refresh_status().await;
                let view = dashboard.view();
                if view != last {
                    println!();
                    render::view(&view, as_json)?;
                    last = view;
                }
            }
        }
    }

    dashboard.close().await;
    Ok(())
}
