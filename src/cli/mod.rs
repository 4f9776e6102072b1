pub mod report;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::services::anomaly::{detect_anomaly, scan_adjacent_periods};
use crate::services::period::is_period_key;
use crate::services::Dashboard;
use crate::services::{apply_filters, Aggregator};
use crate::sources::{expand_inputs, SourceRegistry};
use crate::types::{Dimension, FilterCriteria, SalesError, ALL};

/// Sales transaction views, KPIs and duplicate-period checks
#[derive(Parser)]
#[command(name = "salescope")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Input CSV/JSON file or glob pattern
    #[arg(
        short,
        long,
        global = true,
        env = "SALESCOPE_DATA",
        default_value = "cleaned_data.csv"
    )]
    input: String,

    #[command(subcommand)]
    command: Commands,
}

/// Filter selection shared by view commands
#[derive(Args, Debug, Clone, Default, PartialEq)]
struct FilterArgs {
    /// Period in YYYY-MM form
    #[arg(long)]
    month: Option<String>,

    #[arg(long)]
    state: Option<String>,

    /// Requires --state
    #[arg(long)]
    city: Option<String>,

    #[arg(long)]
    product: Option<String>,
}

impl FilterArgs {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria::from_selection(
            self.month.as_deref().unwrap_or(ALL),
            self.state.as_deref().unwrap_or(ALL),
            self.city.as_deref().unwrap_or(ALL),
            self.product.as_deref().unwrap_or(ALL),
        )
    }
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Show KPIs for the filtered view
    Summary {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show grouped aggregates for the filtered view
    Group {
        /// month, product, state or city
        #[arg(long, default_value = "month")]
        by: Dimension,

        #[command(flatten)]
        filters: FilterArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List filter options (cities scoped by --state)
    Options {
        #[arg(long, default_value = ALL)]
        state: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check two periods for identical revenue (scans neighbours if omitted)
    Anomaly {
        #[arg(long, requires = "period_b")]
        period_a: Option<String>,

        #[arg(long, requires = "period_a")]
        period_b: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the data quality summary
    Quality {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let paths = expand_inputs(&self.input)?;
        let rows = SourceRegistry::new().load_all(&paths)?;
        tracing::info!(files = paths.len(), rows = rows.len(), "input loaded");

        let mut dashboard = Dashboard::new(&rows);

        match self.command {
            Commands::Summary { filters, json } => {
                dashboard.set_criteria(filters.criteria())?;
                let view = dashboard.view()?;
                if json {
                    print_json(&view)?;
                } else {
                    print!("{}", report::render_kpis(&view.kpis, view.showing, view.total));
                    if let Some(anomaly) = view.anomaly.as_ref().filter(|a| a.detected) {
                        print!("\n{}", report::render_anomaly(anomaly));
                    }
                }
            }
            Commands::Group { by, filters, json } => {
                let subset = apply_filters(dashboard.records(), &filters.criteria())?;
                let buckets = Aggregator::group_by(&subset, by);
                if json {
                    print_json(&buckets)?;
                } else {
                    print!("{}", report::render_buckets(by, &buckets));
                }
            }
            Commands::Options { state, json } => {
                dashboard.select_state(&state);
                let options = dashboard.view()?.options;
                if json {
                    print_json(&options)?;
                } else {
                    print!("{}", report::render_options(&options));
                }
            }
            Commands::Anomaly {
                period_a,
                period_b,
                json,
            } => {
                let reports = match (period_a, period_b) {
                    (Some(a), Some(b)) => {
                        validate_period(&a)?;
                        validate_period(&b)?;
                        vec![detect_anomaly(dashboard.records(), &a, &b)]
                    }
                    _ => scan_adjacent_periods(dashboard.records()),
                };
                if json {
                    print_json(&reports)?;
                } else if reports.is_empty() {
                    println!("No duplicate-period revenue found");
                } else {
                    for r in &reports {
                        print!("{}", report::render_anomaly(r));
                    }
                }
            }
            Commands::Quality { json } => {
                let quality = dashboard.quality();
                if json {
                    print_json(&quality)?;
                } else {
                    print!("{}", report::render_quality(&quality));
                }
            }
        }
        Ok(())
    }
}

fn validate_period(key: &str) -> crate::types::Result<()> {
    if is_period_key(key) {
        Ok(())
    } else {
        Err(SalesError::Config(format!(
            "period '{}' is not in YYYY-MM form",
            key
        )))
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
