//! Periodic listing expiry

use catalog::CatalogService;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Expires overdue listings every `interval` until cancelled
pub struct ExpirySweeper {
    service: Arc<CatalogService>,
    interval: Duration,
}

impl ExpirySweeper {
    pub fn new(service: Arc<CatalogService>, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// Runs one sweep immediately, then one per tick. Returns the total
    /// number of listings expired.
    pub async fn run(self, token: CancellationToken) -> usize {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut total = 0;

        info!(interval_secs = self.interval.as_secs(), "Expiry sweeper started");
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => total += self.sweep_once(),
            }
        }
        info!(total_expired = total, "Expiry sweeper stopped");
        total
    }

    fn sweep_once(&self) -> usize {
        let now = self.service.now();
        match self.service.expire_listings(now) {
            Ok(expired) => {
                debug!(count = expired.len(), "Expiry sweep finished");
                expired.len()
            }
            Err(e) => {
                error!(error = %e, "Expiry sweep failed");
                0
            }
        }
    }
}
