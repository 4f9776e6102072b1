//! Data quality assessment over the post-exclusion dataset

use crate::services::period::is_period_key;
use crate::types::{PeriodShare, QualityReport, SalesRecord};
use std::collections::{BTreeMap, HashSet};

/// State codes used for APO/FPO/DPO military mail
pub const MILITARY_STATE_CODES: [&str; 3] = ["AA", "AE", "AP"];

/// Summarize data quality. `raw_rows` is the row count before the
/// zero-quantity exclusion; `records` is the retained set.
pub fn assess_quality(raw_rows: usize, records: &[SalesRecord]) -> QualityReport {
    let retained = records.len();
    let excluded = raw_rows.saturating_sub(retained);

    let missing_location = records.iter().filter(|r| !r.has_full_location()).count();
    let military_mail = records
        .iter()
        .filter(|r| MILITARY_STATE_CODES.contains(&r.state.as_str()))
        .count();
    let malformed_periods = records
        .iter()
        .filter(|r| !is_period_key(&r.year_month))
        .count();

    QualityReport {
        raw_rows: raw_rows as u64,
        retained: retained as u64,
        excluded_zero_qty: excluded as u64,
        excluded_pct: pct(excluded, raw_rows),
        missing_location: missing_location as u64,
        missing_location_pct: pct(missing_location, retained),
        military_mail: military_mail as u64,
        malformed_periods: malformed_periods as u64,
        single_day_periods: single_day_periods(records),
    }
}

/// Periods whose records all share one distinct `date` value, e.g. a
/// partial extract that only covers a single day of the month.
pub fn single_day_periods(records: &[SalesRecord]) -> Vec<PeriodShare> {
    let mut periods: BTreeMap<&str, (usize, HashSet<&str>)> = BTreeMap::new();
    for record in records.iter().filter(|r| is_period_key(&r.year_month)) {
        let (count, dates) = periods.entry(record.year_month.as_str()).or_default();
        *count += 1;
        dates.insert(record.date.as_str());
    }

    periods
        .into_iter()
        .filter(|(_, (_, dates))| dates.len() == 1)
        .map(|(period, (count, _))| PeriodShare {
            period: period.to_string(),
            records: count as u64,
            pct: pct(count, records.len()),
        })
        .collect()
}

/// Percentage of `part` in `whole`, 0 when `whole` is 0
pub fn pct(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(month: &str, date: &str, state: &str, city: &str, zip: &str) -> SalesRecord {
        SalesRecord {
            customer_id: "c1".into(),
            city: city.into(),
            state: state.into(),
            zip: zip.into(),
            product: "Widget".into(),
            quantity: 1,
            total_value: 1.0,
            date: date.into(),
            year_month: month.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_assess_empty() {
        let report = assess_quality(0, &[]);
        assert_eq!(report, QualityReport::default());
    }

    #[test]
    fn test_assess_counts() {
        let records = vec![
            make_record("2025-06", "2025-06-30", "NM", "Taos", "87571"),
            make_record("2025-06", "2025-06-30", "AE", "", ""),
            make_record("2025-07", "2025-07-01", "NM", "Taos", ""),
            make_record("2025-07", "2025-07-02", "AP", "FPO", "96601"),
            make_record("July", "2025-07-03", "NM", "Taos", "87571"),
        ];

        let report = assess_quality(8, &records);

        assert_eq!(report.raw_rows, 8);
        assert_eq!(report.retained, 5);
        assert_eq!(report.excluded_zero_qty, 3);
        assert!((report.excluded_pct - 37.5).abs() < 1e-9);
        assert_eq!(report.missing_location, 2);
        assert!((report.missing_location_pct - 40.0).abs() < 1e-9);
        assert_eq!(report.military_mail, 2);
        assert_eq!(report.malformed_periods, 1);

        assert_eq!(report.single_day_periods.len(), 1);
        assert_eq!(report.single_day_periods[0].period, "2025-06");
        assert_eq!(report.single_day_periods[0].records, 2);
        assert!((report.single_day_periods[0].pct - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_pct_zero_denominator() {
        assert_eq!(pct(3, 0), 0.0);
        assert!((pct(1, 4) - 25.0).abs() < f64::EPSILON);
    }
}
