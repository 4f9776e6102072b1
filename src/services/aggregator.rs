//! Group-by aggregator for sales views

use crate::types::{AggregateBucket, Dimension, SalesRecord};
use std::collections::HashMap;

/// Label used for records with an empty grouping key
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Maximum number of buckets returned for state and city views
pub const TOP_LOCATIONS: usize = 10;

/// Aggregator for grouped revenue/units/transaction counts
pub struct Aggregator;

impl Aggregator {
    /// Group `records` by `dimension`.
    ///
    /// Ordering:
    /// - `YearMonth`: ascending by key (chronological for `YYYY-MM`)
    /// - `Product`, `State`, `City`: descending by revenue, ties in
    ///   encounter order; state and city truncated to [`TOP_LOCATIONS`]
    ///
    /// Empty state/city/month keys are grouped under [`UNKNOWN_LABEL`];
    /// records with an empty product are left out of product grouping.
    pub fn group_by(records: &[SalesRecord], dimension: Dimension) -> Vec<AggregateBucket> {
        if records.is_empty() {
            return Vec::new();
        }

        let mut buckets: Vec<AggregateBucket> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for record in records {
            let key = match Self::key_of(record, dimension) {
                Some(key) => key,
                None => continue,
            };

            let slot = *index.entry(key).or_insert_with(|| {
                buckets.push(AggregateBucket::new(key));
                buckets.len() - 1
            });

            let bucket = &mut buckets[slot];
            bucket.revenue += record.total_value;
            bucket.units = bucket.units.saturating_add(record.quantity);
            bucket.transactions = bucket.transactions.saturating_add(1);
        }

        match dimension {
            Dimension::YearMonth => buckets.sort_by(|a, b| a.key.cmp(&b.key)),
            Dimension::Product => Self::sort_by_revenue(&mut buckets),
            Dimension::State | Dimension::City => {
                Self::sort_by_revenue(&mut buckets);
                buckets.truncate(TOP_LOCATIONS);
            }
        }
        buckets
    }

    /// Monthly buckets, ascending by period
    pub fn monthly(records: &[SalesRecord]) -> Vec<AggregateBucket> {
        Self::group_by(records, Dimension::YearMonth)
    }

    /// Product buckets, highest revenue first
    pub fn by_product(records: &[SalesRecord]) -> Vec<AggregateBucket> {
        Self::group_by(records, Dimension::Product)
    }

    /// Top states by revenue
    pub fn by_state(records: &[SalesRecord]) -> Vec<AggregateBucket> {
        Self::group_by(records, Dimension::State)
    }

    /// Top cities by revenue
    pub fn by_city(records: &[SalesRecord]) -> Vec<AggregateBucket> {
        Self::group_by(records, Dimension::City)
    }

    /// Summed revenue of every record in `period`, in record order
    pub fn period_revenue(records: &[SalesRecord], period: &str) -> f64 {
        records
            .iter()
            .filter(|r| r.year_month == period)
            .fold(0.0, |acc, r| acc + r.total_value)
    }

    fn key_of(record: &SalesRecord, dimension: Dimension) -> Option<&str> {
        let raw = match dimension {
            Dimension::YearMonth => record.year_month.as_str(),
            Dimension::State => record.state.as_str(),
            Dimension::City => record.city.as_str(),
            Dimension::Product => {
                return (!record.product.is_empty()).then_some(record.product.as_str());
            }
        };
        Some(if raw.is_empty() { UNKNOWN_LABEL } else { raw })
    }

    // sort_by is stable: equal revenue keeps encounter order
    fn sort_by_revenue(buckets: &mut [AggregateBucket]) {
        buckets.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    }
}
