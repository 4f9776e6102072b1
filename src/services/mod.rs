//! Services for sanitizing, filtering and aggregating sales records

pub mod aggregator;
pub mod anomaly;
pub mod dashboard;
pub mod filter;
pub mod kpi;
pub mod period;
pub mod quality;
pub mod sanitizer;

pub use aggregator::Aggregator;
pub use anomaly::{detect_anomaly, scan_adjacent_periods};
pub use dashboard::{Dashboard, DashboardView};
pub use filter::{apply_filters, filter_options};
pub use kpi::compute_kpis;
pub use quality::assess_quality;
pub use sanitizer::{Sanitized, Sanitizer};
