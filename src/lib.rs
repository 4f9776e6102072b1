//! Aggregation and anomaly engine for retail sales transactions.
//!
//! Raw tabular rows are sanitized into [`SalesRecord`]s once, then filtered,
//! grouped and summarized on demand.

pub mod cli;
pub mod logging;
pub mod services;
pub mod sources;
pub mod types;

pub use services::{
    apply_filters, assess_quality, compute_kpis, detect_anomaly, filter_options,
    scan_adjacent_periods, Aggregator, Dashboard, Sanitizer,
};
pub use sources::SourceRegistry;
pub use types::{SalesError, SalesRecord};
