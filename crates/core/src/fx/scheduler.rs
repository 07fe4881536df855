//! Background scheduler for the periodic rate refresh.
//!
//! Owned by process-level lifecycle code: started at init, aborted at
//! shutdown via the returned handle. The first tick fires immediately, so
//! startup doubles as the initial refresh.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::interval;

use super::rate_updater::RateUpdater;
use crate::constants::RATE_REFRESH_INTERVAL;

/// Starts the background rate-refresh scheduler (6-hour interval).
pub fn start_rate_update_scheduler(updater: Arc<RateUpdater>) -> JoinHandle<()> {
    tokio::spawn(async move {
        log::info!("Exchange rate scheduler started (6-hour interval)");

        let mut refresh_interval = interval(RATE_REFRESH_INTERVAL);

        loop {
            refresh_interval.tick().await;
            let summary = updater.refresh().await;
            log::debug!(
                "Scheduled rate refresh finished: {} updated, {} alerts",
                summary.updated,
                summary.alerts
            );
        }
    })
}
