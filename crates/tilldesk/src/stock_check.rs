// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tilldesk stock-check` command implementation.
//!
//! One-shot scan for cron installations that run the binary directly
//! instead of the in-process scheduler. Prints the summary line to stdout
//! and exits zero even when rows failed; only a database that cannot be
//! opened fails the command.

use tilldesk_config::TilldeskConfig;
use tilldesk_core::TilldeskError;
use tilldesk_reorder::{run_stock_check, StockCheckReport};

use crate::db::open_database;

/// Runs the `tilldesk stock-check` command.
pub async fn run_stock_check_once(
    config: &TilldeskConfig,
) -> Result<StockCheckReport, TilldeskError> {
    let db = open_database(&config.storage.database_path).await?;
    let report = run_stock_check(&db, &db, &db, &db).await?;
    db.close().await?;

    tracing::info!(
        scanned = report.scanned,
        orders_created = report.orders_created,
        skipped = report.skipped_existing,
        failed = report.failed,
        "stock check finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilldesk_storage::queries::inventory;

    fn config_for(dir: &tempfile::TempDir) -> TilldeskConfig {
        let mut config = TilldeskConfig::default();
        config.storage.database_path = dir
            .path()
            .join("till.db")
            .to_string_lossy()
            .into_owned();
        config
    }

    #[tokio::test]
    async fn one_shot_run_reports_created_orders() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&dir);

        // Seed one low row through a separate handle.
        let db = open_database(&config.storage.database_path).await.unwrap();
        inventory::create_item(&db, "Till rolls", 5, 20, 2).await.unwrap();
        db.close().await.unwrap();

        let report = run_stock_check_once(&config).await.unwrap();
        assert_eq!(report.orders_created, 1);
        assert_eq!(
            report.summary(),
            "Automated stock check completed. Created 1 new orders."
        );

        // Re-running is quiet thanks to the unresolved alert.
        let report = run_stock_check_once(&config).await.unwrap();
        assert_eq!(report.orders_created, 0);
    }

    #[tokio::test]
    async fn empty_inventory_still_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let report = run_stock_check_once(&config_for(&dir)).await.unwrap();
        assert_eq!(report.scanned, 0);
        assert_eq!(
            report.summary(),
            "Automated stock check completed. Created 0 new orders."
        );
    }
}
