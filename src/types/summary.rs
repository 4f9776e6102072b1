//! Filter selections and derived view types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Result, SalesError};

/// Sentinel meaning "no restriction" for a filter dimension
pub const ALL: &str = "all";

/// Current selection across the four filter dimensions. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub month: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub product: Option<String>,
}

impl FilterCriteria {
    /// Criteria that match every record
    pub fn all() -> Self {
        Self::default()
    }

    /// Build from raw selections, mapping the `"all"` sentinel to `None`
    pub fn from_selection(month: &str, state: &str, city: &str, product: &str) -> Self {
        Self {
            month: selection(month),
            state: selection(state),
            city: selection(city),
            product: selection(product),
        }
    }

    pub fn select_month(&mut self, month: &str) {
        self.month = selection(month);
    }

    /// Change the state; the city selection is always reset to "all".
    pub fn select_state(&mut self, state: &str) {
        self.state = selection(state);
        self.city = None;
    }

    pub fn select_city(&mut self, city: &str) {
        self.city = selection(city);
    }

    pub fn select_product(&mut self, product: &str) {
        self.product = selection(product);
    }

    /// A city is only meaningful within a chosen state.
    pub fn validate(&self) -> Result<()> {
        match (&self.state, &self.city) {
            (None, Some(city)) => Err(SalesError::FilterState(format!(
                "city '{}' selected while state is '{}'",
                city, ALL
            ))),
            _ => Ok(()),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        *self == Self::default()
    }
}

fn selection(value: &str) -> Option<String> {
    if value == ALL {
        None
    } else {
        Some(value.to_string())
    }
}

/// Choices available to each filter dimension, each prefixed with `"all"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub months: Vec<String>,
    pub states: Vec<String>,
    pub cities: Vec<String>,
    pub products: Vec<String>,
}

/// Grouping dimension for the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    YearMonth,
    Product,
    State,
    City,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::YearMonth => "year_month",
            Dimension::Product => "product",
            Dimension::State => "state",
            Dimension::City => "city",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "year_month" | "month" => Ok(Dimension::YearMonth),
            "product" => Ok(Dimension::Product),
            "state" => Ok(Dimension::State),
            "city" => Ok(Dimension::City),
            other => Err(format!(
                "unknown dimension '{}' (expected month, product, state or city)",
                other
            )),
        }
    }
}

/// One grouped summary row keyed by a single dimension value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AggregateBucket {
    pub key: String,
    pub revenue: f64,
    pub units: i64,
    pub transactions: u64,
}

impl AggregateBucket {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }
}

/// Scalar summary metrics over a record subset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct KpiSummary {
    pub revenue: f64,
    pub units: i64,
    pub unique_customers: u64,
    pub transaction_count: u64,
    pub avg_transaction: f64,
}

impl KpiSummary {
    /// Units per transaction; an empty subset divides by one.
    pub fn units_per_transaction(&self) -> f64 {
        self.units as f64 / self.transaction_count.max(1) as f64
    }

    /// Transactions per distinct customer; no customers divides by one.
    pub fn transactions_per_customer(&self) -> f64 {
        self.transaction_count as f64 / self.unique_customers.max(1) as f64
    }
}

/// Result of comparing aggregate revenue across two periods
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnomalyReport {
    pub detected: bool,
    pub period_a: String,
    pub period_b: String,
    /// Revenue of `period_a`, the duplicated figure when detected
    pub value: f64,
    pub revenue_a: f64,
    pub revenue_b: f64,
}

impl AnomalyReport {
    /// Whether the marker belongs on a monthly view: the anomaly is detected,
    /// no single month is selected, and either period is on screen.
    pub fn visible_in(&self, monthly: &[AggregateBucket], criteria: &FilterCriteria) -> bool {
        self.detected
            && criteria.month.is_none()
            && monthly
                .iter()
                .any(|b| b.key == self.period_a || b.key == self.period_b)
    }
}

/// Record count and share for a single period
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodShare {
    pub period: String,
    pub records: u64,
    pub pct: f64,
}

/// Data quality summary over the post-exclusion dataset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct QualityReport {
    pub raw_rows: u64,
    pub retained: u64,
    pub excluded_zero_qty: u64,
    pub excluded_pct: f64,
    pub missing_location: u64,
    pub missing_location_pct: f64,
    /// Records addressed to APO/DPO state codes
    pub military_mail: u64,
    pub malformed_periods: u64,
    pub single_day_periods: Vec<PeriodShare>,
}
