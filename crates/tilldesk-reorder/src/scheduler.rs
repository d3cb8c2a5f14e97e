// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cron-driven stock check loop.
//!
//! Sleeps until the next cron occurrence, runs one scan, repeats. A failed
//! run is logged and the loop keeps its schedule; cancellation stops the
//! loop at the next wakeup boundary.

use std::sync::Arc;

use chrono::Utc;
use croner::Cron;
use tokio_util::sync::CancellationToken;

use tilldesk_core::TilldeskError;

use crate::job::run_stock_check;
use crate::traits::{AlertStore, InventoryReader, NotificationStore, OrderStore};

/// Run the stock check on `cron_expr` until `cancel` fires.
pub async fn run_scheduler(
    cron_expr: &str,
    inventory: Arc<dyn InventoryReader>,
    alerts: Arc<dyn AlertStore>,
    orders: Arc<dyn OrderStore>,
    notifications: Arc<dyn NotificationStore>,
    cancel: CancellationToken,
) -> Result<(), TilldeskError> {
    let cron: Cron = cron_expr.parse().map_err(|e| {
        TilldeskError::Config(format!("invalid cron expression `{cron_expr}`: {e}"))
    })?;

    tracing::info!(cron = cron_expr, "stock check scheduler started");

    loop {
        let now = Utc::now();
        let next = cron.find_next_occurrence(&now, false).map_err(|e| {
            TilldeskError::Internal(format!("no next occurrence for `{cron_expr}`: {e}"))
        })?;
        let wait = (next - now).to_std().unwrap_or_default();

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("stock check scheduler stopped");
                return Ok(());
            }
            _ = tokio::time::sleep(wait) => {}
        }

        match run_stock_check(
            inventory.as_ref(),
            alerts.as_ref(),
            orders.as_ref(),
            notifications.as_ref(),
        )
        .await
        {
            Ok(report) => tracing::info!(
                scanned = report.scanned,
                orders_created = report.orders_created,
                skipped = report.skipped_existing,
                failed = report.failed,
                "scheduled stock check completed"
            ),
            Err(e) => tracing::error!(error = %e, "scheduled stock check failed"),
        }
    }
}
