//! Dashboard controller
//!
//! Owns a sanitized dataset snapshot and the current filter selection. Every
//! call to [`Dashboard::view`] re-derives all aggregates from scratch. Only
//! the neighbour-period scan runs once, since it always covers the full
//! dataset, which never changes after construction.

use serde::Serialize;

use crate::services::aggregator::Aggregator;
use crate::services::anomaly::{detect_anomaly, scan_adjacent_periods};
use crate::services::filter::{apply_filters, filter_options};
use crate::services::kpi::compute_kpis;
use crate::services::quality::assess_quality;
use crate::services::sanitizer::Sanitizer;
use crate::types::{
    AggregateBucket, AnomalyReport, FilterCriteria, FilterOptions, KpiSummary, QualityReport,
    RawRow, Result, SalesRecord, ALL,
};

/// Everything a front end needs to render one state of the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub criteria: FilterCriteria,
    pub options: FilterOptions,
    pub kpis: KpiSummary,
    pub monthly: Vec<AggregateBucket>,
    pub products: Vec<AggregateBucket>,
    pub states: Vec<AggregateBucket>,
    pub cities: Vec<AggregateBucket>,
    pub anomaly: Option<AnomalyReport>,
    pub show_anomaly_marker: bool,
    /// Records in the filtered view
    pub showing: usize,
    /// Records after the zero-quantity exclusion
    pub total: usize,
}

/// Explicit replacement for render-driven recomputation
pub struct Dashboard {
    records: Vec<SalesRecord>,
    raw_count: usize,
    excluded_zero_qty: usize,
    criteria: FilterCriteria,
    anomaly_pair: Option<(String, String)>,
    /// Most recent duplicated neighbour pair, found once at load
    scanned_anomaly: Option<AnomalyReport>,
}

impl Dashboard {
    /// Sanitize `rows` once and start with an unrestricted selection.
    pub fn new(rows: &[RawRow]) -> Self {
        let sanitized = Sanitizer::sanitize(rows);
        tracing::debug!(
            raw = sanitized.raw_count,
            retained = sanitized.records.len(),
            "dashboard dataset loaded"
        );
        let scanned_anomaly = scan_adjacent_periods(&sanitized.records).pop();
        if let Some(report) = &scanned_anomaly {
            tracing::warn!(
                period_a = %report.period_a,
                period_b = %report.period_b,
                value = report.value,
                "duplicate period revenue detected"
            );
        }

        Self {
            records: sanitized.records,
            raw_count: sanitized.raw_count,
            excluded_zero_qty: sanitized.excluded_zero_qty,
            criteria: FilterCriteria::all(),
            anomaly_pair: None,
            scanned_anomaly,
        }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn excluded_zero_qty(&self) -> usize {
        self.excluded_zero_qty
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Replace the whole selection; rejected if it violates the
    /// state/city dependency.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> Result<()> {
        criteria.validate()?;
        self.criteria = criteria;
        Ok(())
    }

    pub fn select_month(&mut self, month: &str) {
        self.criteria.select_month(month);
    }

    /// Changing state always resets the city to "all".
    pub fn select_state(&mut self, state: &str) {
        self.criteria.select_state(state);
    }

    pub fn select_city(&mut self, city: &str) {
        self.criteria.select_city(city);
    }

    pub fn select_product(&mut self, product: &str) {
        self.criteria.select_product(product);
    }

    /// Compare a fixed pair of periods instead of scanning neighbours.
    pub fn set_anomaly_pair(&mut self, period_a: &str, period_b: &str) {
        self.anomaly_pair = Some((period_a.to_string(), period_b.to_string()));
    }

    /// Anomaly over the full dataset: the configured pair, or else the most
    /// recent duplicated neighbour pair, if any.
    pub fn anomaly(&self) -> Option<AnomalyReport> {
        match &self.anomaly_pair {
            Some((a, b)) => Some(detect_anomaly(&self.records, a, b)),
            None => self.scanned_anomaly.clone(),
        }
    }

    pub fn quality(&self) -> QualityReport {
        assess_quality(self.raw_count, &self.records)
    }

    /// Re-derive the full view for the current selection.
    pub fn view(&self) -> Result<DashboardView> {
        let subset = apply_filters(&self.records, &self.criteria)?;
        let state = self.criteria.state.as_deref().unwrap_or(ALL);

        let monthly = Aggregator::monthly(&subset);
        let anomaly = self.anomaly();
        let show_anomaly_marker = anomaly
            .as_ref()
            .is_some_and(|a| a.visible_in(&monthly, &self.criteria));

        Ok(DashboardView {
            criteria: self.criteria.clone(),
            options: filter_options(&self.records, state),
            kpis: compute_kpis(&subset),
            products: Aggregator::by_product(&subset),
            states: Aggregator::by_state(&subset),
            cities: Aggregator::by_city(&subset),
            monthly,
            anomaly,
            show_anomaly_marker,
            showing: subset.len(),
            total: self.records.len(),
        })
    }
}
