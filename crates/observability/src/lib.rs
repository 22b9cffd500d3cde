//! Observability for ClosetSwap
//!
//! - Structured logging via `tracing`
//! - Marketplace counters via `metrics`, optionally exported to Prometheus
//!
//! # Quick Start
//!
//! ```ignore
//! use observability::{init_logging, LogFormat, MarketplaceMetrics};
//!
//! init_logging("closetswap", LogFormat::Pretty)?;
//! observability::init_metrics(9090)?;
//! let metrics = MarketplaceMetrics::new();
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::{init_metrics, MarketplaceMetrics, SweepTimer};
