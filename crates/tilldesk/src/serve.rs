// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tilldesk serve` command implementation.
//!
//! Starts the portal HTTP server with the configured session backend, plus
//! two background loops: the cron-driven stock check (when enabled) and an
//! hourly sweep of stale browser sessions. Ctrl-C cancels everything.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use tilldesk_config::TilldeskConfig;
use tilldesk_core::{SessionBackend, TilldeskError};
use tilldesk_gateway::{start_server, GatewayState, HealthState, ServerConfig};
use tilldesk_reorder::{run_scheduler, AlertStore, InventoryReader, NotificationStore, OrderStore};
use tilldesk_session::MemorySessionBackend;
use tilldesk_storage::{Database, SqliteSessionBackend};

use crate::db::open_database;

/// How often stale sessions are swept.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

/// Runs the `tilldesk serve` command.
pub async fn run_serve(config: TilldeskConfig) -> Result<(), TilldeskError> {
    info!("starting tilldesk serve");

    let db = open_database(&config.storage.database_path).await?;
    let cancel = CancellationToken::new();

    let backend = build_session_backend(&config, &db, &cancel);

    let state = GatewayState {
        backend,
        db: db.clone(),
        cookie_name: config.session.cookie_name.clone(),
        health: HealthState {
            start_time: std::time::Instant::now(),
        },
    };

    let scheduler_handle = if config.reorder.enabled {
        let cron = config.reorder.cron.clone();
        let inventory: Arc<dyn InventoryReader> = Arc::new(db.clone());
        let alerts: Arc<dyn AlertStore> = Arc::new(db.clone());
        let orders: Arc<dyn OrderStore> = Arc::new(db.clone());
        let notifications: Arc<dyn NotificationStore> = Arc::new(db.clone());
        let cancel = cancel.clone();
        Some(tokio::spawn(async move {
            if let Err(e) =
                run_scheduler(&cron, inventory, alerts, orders, notifications, cancel).await
            {
                error!(error = %e, "stock check scheduler exited with error");
            }
        }))
    } else {
        info!("automated reorder disabled by config");
        None
    };

    // Ctrl-C triggers a graceful shutdown of server and background loops.
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received");
                cancel.cancel();
            }
        });
    }

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let result = start_server(&server_config, state, cancel.clone()).await;

    cancel.cancel();
    if let Some(handle) = scheduler_handle {
        if handle.await.is_err() {
            warn!("stock check scheduler task panicked");
        }
    }
    db.close().await?;

    result
}

/// Build the configured session backend and spawn its stale-session sweep.
fn build_session_backend(
    config: &TilldeskConfig,
    db: &Database,
    cancel: &CancellationToken,
) -> Arc<dyn SessionBackend> {
    let max_idle_secs = config.session.max_idle_secs;
    match config.session.backend.as_str() {
        "memory" => {
            let backend = Arc::new(MemorySessionBackend::new(Duration::from_secs(
                max_idle_secs,
            )));
            spawn_sweep(cancel.clone(), {
                let backend = backend.clone();
                move || {
                    let backend = backend.clone();
                    async move { Ok::<usize, TilldeskError>(backend.purge_stale()) }
                }
            });
            backend
        }
        _ => {
            let backend = SqliteSessionBackend::new(db.clone());
            spawn_sweep(cancel.clone(), {
                let backend = backend.clone();
                move || {
                    let backend = backend.clone();
                    async move { backend.purge_stale(max_idle_secs as i64).await }
                }
            });
            Arc::new(backend)
        }
    }
}

/// Periodically run `purge` until cancelled.
fn spawn_sweep<F, Fut>(cancel: CancellationToken, purge: F)
where
    F: Fn() -> Fut + Send + 'static,
    Fut: std::future::Future<Output = Result<usize, TilldeskError>> + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        interval.tick().await; // first tick fires immediately; skip it
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {}
            }
            match purge().await {
                Ok(0) => {}
                Ok(dropped) => info!(dropped, "stale sessions purged"),
                Err(e) => warn!(error = %e, "stale session sweep failed"),
            }
        }
    });
}
