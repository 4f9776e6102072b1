//! Duplicate-period anomaly detection
//!
//! Flags two periods whose aggregate revenue is identical, the signature of
//! one month's data having been loaded twice. Always run over the full
//! post-exclusion dataset, never a filtered view.

use crate::services::aggregator::Aggregator;
use crate::services::period::is_period_key;
use crate::types::{AnomalyReport, SalesRecord};
use std::collections::BTreeMap;

/// Absolute revenue difference (currency units) under which two periods are
/// considered equal
pub const ANOMALY_TOLERANCE: f64 = 1.0;

/// Compare aggregate revenue of `period_a` and `period_b`.
///
/// Detected iff `|a - b| < ANOMALY_TOLERANCE` and `a > 0`, so two periods
/// absent from the data never match.
pub fn detect_anomaly(records: &[SalesRecord], period_a: &str, period_b: &str) -> AnomalyReport {
    let revenue_a = Aggregator::period_revenue(records, period_a);
    let revenue_b = Aggregator::period_revenue(records, period_b);
    compare(period_a, revenue_a, period_b, revenue_b)
}

/// Compare every pair of neighbouring periods present in the data and
/// return the detected ones, oldest pair first.
pub fn scan_adjacent_periods(records: &[SalesRecord]) -> Vec<AnomalyReport> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for record in records.iter().filter(|r| is_period_key(&r.year_month)) {
        *totals.entry(record.year_month.as_str()).or_insert(0.0) += record.total_value;
    }

    let periods: Vec<(&str, f64)> = totals.into_iter().collect();
    let reports: Vec<AnomalyReport> = periods
        .windows(2)
        .map(|pair| compare(pair[0].0, pair[0].1, pair[1].0, pair[1].1))
        .filter(|report| report.detected)
        .collect();

    for report in &reports {
        tracing::debug!(
            period_a = %report.period_a,
            period_b = %report.period_b,
            value = report.value,
            "duplicate period revenue detected"
        );
    }
    reports
}

fn compare(period_a: &str, revenue_a: f64, period_b: &str, revenue_b: f64) -> AnomalyReport {
    let detected = (revenue_a - revenue_b).abs() < ANOMALY_TOLERANCE && revenue_a > 0.0;
    AnomalyReport {
        detected,
        period_a: period_a.to_string(),
        period_b: period_b.to_string(),
        value: revenue_a,
        revenue_a,
        revenue_b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(month: &str, value: f64) -> SalesRecord {
        SalesRecord {
            customer_id: "c1".into(),
            quantity: 1,
            total_value: value,
            year_month: month.into(),
            ..Default::default()
        }
    }

    // ========== detect_anomaly ==========

    #[test]
    fn test_identical_periods_detected() {
        let records = vec![
            make_record("2025-08", 100.0),
            make_record("2025-08", 50.5),
            make_record("2025-09", 150.5),
        ];
        let report = detect_anomaly(&records, "2025-08", "2025-09");

        assert!(report.detected);
        assert_eq!(report.period_a, "2025-08");
        assert_eq!(report.period_b, "2025-09");
        assert!((report.value - 150.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_within_tolerance_detected() {
        let records = vec![make_record("2025-08", 100.0), make_record("2025-09", 100.99)];
        assert!(detect_anomaly(&records, "2025-08", "2025-09").detected);
    }

    #[test]
    fn test_tolerance_boundary_not_detected() {
        let records = vec![make_record("2025-08", 100.0), make_record("2025-09", 101.0)];
        assert!(!detect_anomaly(&records, "2025-08", "2025-09").detected);
    }

    #[test]
    fn test_absent_periods_not_detected() {
        let records = vec![make_record("2025-07", 100.0)];
        let report = detect_anomaly(&records, "2025-08", "2025-09");

        assert!(!report.detected);
        assert_eq!(report.value, 0.0);
    }

    #[test]
    fn test_zero_revenue_match_not_detected() {
        let records = vec![make_record("2025-08", 0.0), make_record("2025-09", 0.0)];
        assert!(!detect_anomaly(&records, "2025-08", "2025-09").detected);
    }

    #[test]
    fn test_similar_but_distinct_periods() {
        let records = vec![make_record("2025-08", 1000.0), make_record("2025-09", 1050.0)];
        let report = detect_anomaly(&records, "2025-08", "2025-09");

        assert!(!report.detected);
        assert!((report.revenue_b - 1050.0).abs() < f64::EPSILON);
    }

    // ========== scan_adjacent_periods ==========

    #[test]
    fn test_scan_finds_duplicate_neighbours() {
        let records = vec![
            make_record("2025-07", 10.0),
            make_record("2025-08", 75.0),
            make_record("2025-09", 75.0),
            make_record("2025-10", 80.0),
        ];
        let reports = scan_adjacent_periods(&records);

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].period_a, "2025-08");
        assert_eq!(reports[0].period_b, "2025-09");
    }

    #[test]
    fn test_scan_ignores_non_adjacent_and_malformed() {
        let records = vec![
            make_record("2025-07", 75.0),
            make_record("2025-08", 10.0),
            make_record("2025-09", 75.0),
            make_record("", 75.0),
        ];
        assert!(scan_adjacent_periods(&records).is_empty());
    }

    #[test]
    fn test_scan_empty() {
        assert!(scan_adjacent_periods(&[]).is_empty());
    }
}
