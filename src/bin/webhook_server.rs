//! iiko webhook server.
//!
//! Receives iiko webhook notifications over HTTP and logs them. Settings are
//! read from `iiko.toml` (or `--config`) and `IIKO__*` environment variables;
//! a `.env` file is loaded first when present.

use anyhow::{Context, Result};
use clap::Parser;
use iiko_client::api::rest::{AppState, create_router};
use iiko_client::application::error::HandlerResult;
use iiko_client::application::webhooks::{HandlerRegistry, WebhookIngress};
use iiko_client::config::Settings;
use iiko_client::domain::events::{StopListUpdateInfo, WebhookEvent, WebhookEventType};
use iiko_client::infrastructure::iiko::api::deliveries::DeliveryOrderInfo;
use iiko_client::telemetry;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "iiko-webhook-server", version, about = "Receives iiko webhook notifications")]
struct Args {
    /// Settings file. Defaults to `iiko.toml` when present.
    #[arg(short, long, env = "IIKO_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overriding the settings.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref()).context("loading settings")?;
    if let Some(bind) = args.bind {
        settings.webhook.bind = bind;
    }

    telemetry::init(&settings.log).context("initializing logging")?;
    info!(?settings, "starting iiko webhook server");

    if settings.webhook.secret.is_empty() {
        warn!("no webhook secret configured; every request is accepted");
    }

    let registry = HandlerRegistry::with_secret(settings.webhook.secret.clone());
    register_handlers(&registry);

    let state = AppState::new(WebhookIngress::new(Arc::new(registry)))
        .with_secret_header(settings.webhook.secret_header_name()?)
        .with_webhook_path(settings.webhook.route()?);
    let app = create_router(Arc::new(state));

    let addr = settings.webhook.bind_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(addr = %listener.local_addr()?, path = %settings.webhook.path, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

fn register_handlers(registry: &HandlerRegistry) {
    registry.register_fn(WebhookEventType::StopListUpdate, "log-stop-list", log_stop_list);
    registry.register_fn(WebhookEventType::DeliveryOrderUpdate, "log-order-update", log_order_update);
    registry.register_fn(WebhookEventType::DeliveryOrderError, "log-order-error", log_order_error);
}

fn log_stop_list(event: &WebhookEvent) -> HandlerResult {
    let info: StopListUpdateInfo = event.decode_info()?;
    let full: Vec<_> = info.full_reloads().collect();
    info!(
        organization_id = %event.organization_id(),
        terminal_groups = info.terminal_groups_stop_lists_updates.len(),
        full_reloads = ?full,
        "stop list updated"
    );
    Ok(())
}

fn log_order_update(event: &WebhookEvent) -> HandlerResult {
    let order = DeliveryOrderInfo::from_event(event)?;
    info!(
        order_id = %order.id,
        external_number = order.external_number.as_deref().unwrap_or_default(),
        creation_status = %order.creation_status,
        status = ?order.status(),
        "delivery order updated"
    );
    Ok(())
}

fn log_order_error(event: &WebhookEvent) -> HandlerResult {
    let order = DeliveryOrderInfo::from_event(event)?;
    let code = order.error_info.as_ref().map(|e| e.code.as_str()).unwrap_or_default();
    error!(
        order_id = %order.id,
        correlation_id = %event.correlation_id(),
        code,
        "delivery order failed"
    );
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => error!("failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}
