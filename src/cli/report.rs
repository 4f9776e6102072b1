//! Plain-text rendering of engine results

use std::fmt::Write;

use crate::services::period::month_label;
use crate::types::{
    AggregateBucket, AnomalyReport, Dimension, FilterOptions, KpiSummary, QualityReport,
};

/// Width of the revenue bar column
const BAR_WIDTH: usize = 20;

/// Format number with thousand separators (e.g., 1234567 -> "1,234,567")
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);

    // Digits are ASCII, so byte indexing is safe
    for (i, ch) in s.bytes().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch as char);
    }

    result
}

/// Compact currency: "$1.23M", "$151.5K", "$87"
pub fn format_currency(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("${:.2}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.1}K", value / 1_000.0)
    } else {
        format!("${:.0}", value)
    }
}

/// Horizontal bar proportional to `value / max`
pub fn format_bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || width == 0 {
        return "░".repeat(width);
    }
    let filled = ((value / max) * width as f64).round().max(0.0) as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn units(n: i64) -> String {
    format_number(n.max(0) as u64)
}

pub fn render_kpis(kpis: &KpiSummary, showing: usize, total: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Total Revenue     {:>12}   {} transactions",
        format_currency(kpis.revenue),
        format_number(kpis.transaction_count)
    );
    let _ = writeln!(
        out,
        "Units Sold        {:>12}   avg {:.1} per txn",
        units(kpis.units),
        kpis.units_per_transaction()
    );
    let _ = writeln!(
        out,
        "Unique Customers  {:>12}   {:.1} txns/customer",
        format_number(kpis.unique_customers),
        kpis.transactions_per_customer()
    );
    let _ = writeln!(
        out,
        "Avg Transaction   {:>12}",
        format_currency(kpis.avg_transaction)
    );
    let _ = writeln!(
        out,
        "Showing           {:>12}   of {} records",
        format_number(showing as u64),
        format_number(total as u64)
    );
    out
}

pub fn render_buckets(dimension: Dimension, buckets: &[AggregateBucket]) -> String {
    if buckets.is_empty() {
        return format!("No records for {} view\n", dimension);
    }

    let max = buckets.iter().map(|b| b.revenue).fold(0.0, f64::max);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<24} {:>12} {:>10} {:>8}  Share",
        dimension, "Revenue", "Units", "Txns"
    );
    for bucket in buckets {
        let label = match dimension {
            Dimension::YearMonth => month_label(&bucket.key),
            _ => bucket.key.clone(),
        };
        let _ = writeln!(
            out,
            "{:<24} {:>12} {:>10} {:>8}  {}",
            label,
            format!("{:.2}", bucket.revenue),
            units(bucket.units),
            format_number(bucket.transactions),
            format_bar(bucket.revenue, max, BAR_WIDTH)
        );
    }
    out
}

pub fn render_options(options: &FilterOptions) -> String {
    let months: Vec<String> = options.months.iter().map(|m| month_label(m)).collect();
    format!(
        "months:   {}\nstates:   {}\ncities:   {}\nproducts: {}\n",
        months.join(", "),
        options.states.join(", "),
        options.cities.join(", "),
        options.products.join(", ")
    )
}

pub fn render_anomaly(report: &AnomalyReport) -> String {
    if report.detected {
        format!(
            "Data anomaly: {} and {} show identical revenue ({} each). \
             This appears to be duplicate data.\n",
            month_label(&report.period_a),
            month_label(&report.period_b),
            format_currency(report.value)
        )
    } else {
        format!(
            "No anomaly: {} {:.2} vs {} {:.2}\n",
            report.period_a, report.revenue_a, report.period_b, report.revenue_b
        )
    }
}

pub fn render_quality(report: &QualityReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Zero Qty Excluded     {:>10}  ({:.1}%)",
        format_number(report.excluded_zero_qty),
        report.excluded_pct
    );
    let _ = writeln!(
        out,
        "Missing Location      {:>10}  ({:.1}%)",
        format_number(report.missing_location),
        report.missing_location_pct
    );
    let _ = writeln!(
        out,
        "APO/DPO Records       {:>10}",
        format_number(report.military_mail)
    );
    let _ = writeln!(
        out,
        "Malformed Periods     {:>10}",
        format_number(report.malformed_periods)
    );
    for share in &report.single_day_periods {
        let _ = writeln!(
            out,
            "{:<21} {:>10}  ({:.1}%)",
            format!("{} (Single Day)", month_label(&share.period)),
            format_number(share.records),
            share.pct
        );
    }
    out
}
