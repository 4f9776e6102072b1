//! KPI computation over a record subset

use crate::types::{KpiSummary, SalesRecord};
use std::collections::HashSet;

/// Compute scalar summary metrics.
///
/// Customers are counted by distinct `customer_id`; records without an id
/// share a single "unknown" identity. An empty subset yields an average of 0.
pub fn compute_kpis(records: &[SalesRecord]) -> KpiSummary {
    if records.is_empty() {
        return KpiSummary::default();
    }

    let mut customers: HashSet<&str> = HashSet::new();
    let mut summary = KpiSummary::default();

    for record in records {
        summary.revenue += record.total_value;
        summary.units = summary.units.saturating_add(record.quantity);
        summary.transaction_count = summary.transaction_count.saturating_add(1);
        customers.insert(record.customer_id.as_str());
    }

    summary.unique_customers = customers.len() as u64;
    summary.avg_transaction = summary.revenue / summary.transaction_count as f64;
    summary
}
