//! Marketplace metrics
//!
//! Counter handles are resolved when [`MarketplaceMetrics::new`] runs, so
//! install the exporter with [`init_metrics`] first. Without an exporter
//! every handle is a no-op.

use metrics::{counter, histogram, Counter, Histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus exporter on `0.0.0.0:port` (`/metrics`)
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    PrometheusBuilder::new().with_http_listener(addr).install()?;

    tracing::info!(%addr, "Metrics server listening");
    Ok(())
}

/// Marketplace counters
///
/// * `marketplace_listings_total`
/// * `marketplace_bids_total`
/// * `marketplace_settlements_total`
/// * `marketplace_settlement_rejections_total{reason}`
/// * `marketplace_listings_expired_total`
/// * `marketplace_reports_total{target}`
/// * `marketplace_assistant_fallbacks_total{operation}`
/// * `marketplace_expiry_sweep_duration_seconds` (histogram)
#[derive(Clone)]
pub struct MarketplaceMetrics {
    listings_total: Counter,
    bids_total: Counter,
    settlements_total: Counter,
    listings_expired_total: Counter,
    sweep_duration: Histogram,
}

impl MarketplaceMetrics {
    pub fn new() -> Self {
        Self {
            listings_total: counter!("marketplace_listings_total"),
            bids_total: counter!("marketplace_bids_total"),
            settlements_total: counter!("marketplace_settlements_total"),
            listings_expired_total: counter!("marketplace_listings_expired_total"),
            sweep_duration: histogram!("marketplace_expiry_sweep_duration_seconds"),
        }
    }

    pub fn listing_created(&self) {
        self.listings_total.increment(1);
    }

    pub fn bid_submitted(&self) {
        self.bids_total.increment(1);
    }

    pub fn settlement_completed(&self) {
        self.settlements_total.increment(1);
    }

    /// `reason` is an error kind such as `reserve_not_met`
    pub fn settlement_rejected(&self, reason: &'static str) {
        counter!("marketplace_settlement_rejections_total", "reason" => reason).increment(1);
    }

    pub fn listings_expired(&self, count: usize) {
        self.listings_expired_total.increment(count as u64);
    }

    /// `target` is `product` or `user`
    pub fn report_filed(&self, target: &'static str) {
        counter!("marketplace_reports_total", "target" => target).increment(1);
    }

    pub fn assistant_fallback(&self, operation: &'static str) {
        counter!("marketplace_assistant_fallbacks_total", "operation" => operation).increment(1);
    }
}

impl Default for MarketplaceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Records the expiry sweep duration when dropped
///
/// ```ignore
/// let metrics = MarketplaceMetrics::new();
/// {
///     let _timer = SweepTimer::new(&metrics);
///     // ... sweep ...
/// }
/// ```
pub struct SweepTimer<'a> {
    metrics: &'a MarketplaceMetrics,
    start: Instant,
}

impl<'a> SweepTimer<'a> {
    pub fn new(metrics: &'a MarketplaceMetrics) -> Self {
        Self {
            metrics,
            start: Instant::now(),
        }
    }
}

impl Drop for SweepTimer<'_> {
    fn drop(&mut self) {
        self.metrics
            .sweep_duration
            .record(self.start.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_without_recorder_are_noops() {
        let metrics = MarketplaceMetrics::new();
        metrics.listing_created();
        metrics.bid_submitted();
        metrics.settlement_completed();
        metrics.settlement_rejected("reserve_not_met");
        metrics.listings_expired(3);
        metrics.report_filed("product");
        metrics.assistant_fallback("search_catalog");
        let _timer = SweepTimer::new(&metrics);
    }
}
