//! Filter engine: criteria matching and dependent option lists

use crate::types::{FilterCriteria, FilterOptions, Result, SalesRecord, ALL};
use std::collections::BTreeSet;

/// Records matching every non-"all" criterion by exact string equality.
///
/// Fails with `FilterState` when a city is selected while state is "all".
pub fn apply_filters(records: &[SalesRecord], criteria: &FilterCriteria) -> Result<Vec<SalesRecord>> {
    criteria.validate()?;

    let subset: Vec<SalesRecord> = records
        .iter()
        .filter(|r| matches(r, criteria))
        .cloned()
        .collect();

    tracing::debug!(
        total = records.len(),
        matched = subset.len(),
        "applied filters"
    );
    Ok(subset)
}

/// Single-record predicate behind [`apply_filters`]
pub fn matches(record: &SalesRecord, criteria: &FilterCriteria) -> bool {
    fn hit(selected: &Option<String>, value: &str) -> bool {
        match selected {
            Some(s) => s == value,
            None => true,
        }
    }

    hit(&criteria.month, &record.year_month)
        && hit(&criteria.state, &record.state)
        && hit(&criteria.city, &record.city)
        && hit(&criteria.product, &record.product)
}

/// Option lists for each dimension, deduplicated, ascending, prefixed with
/// `"all"`. Cities are scoped to `current_state` unless it is "all"; states
/// are never scoped to a city.
pub fn filter_options(records: &[SalesRecord], current_state: &str) -> FilterOptions {
    let months = distinct(records.iter().map(|r| r.year_month.as_str()));
    let states = distinct(records.iter().map(|r| r.state.as_str()));
    let products = distinct(records.iter().map(|r| r.product.as_str()));

    let cities = if current_state == ALL {
        distinct(records.iter().map(|r| r.city.as_str()))
    } else {
        distinct(
            records
                .iter()
                .filter(|r| r.state == current_state)
                .map(|r| r.city.as_str()),
        )
    };

    FilterOptions {
        months,
        states,
        cities,
        products,
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let set: BTreeSet<&str> = values.filter(|v| !v.is_empty()).collect();
    std::iter::once(ALL.to_string())
        .chain(set.into_iter().map(String::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SalesError;

    fn make_record(month: &str, state: &str, city: &str, product: &str) -> SalesRecord {
        SalesRecord {
            customer_id: "c".into(),
            city: city.into(),
            state: state.into(),
            product: product.into(),
            quantity: 1,
            total_value: 10.0,
            year_month: month.into(),
            ..Default::default()
        }
    }

    fn dataset() -> Vec<SalesRecord> {
        vec![
            make_record("2025-07", "New Mexico", "Santa Fe", "Widget"),
            make_record("2025-08", "New Mexico", "Taos", "Gadget"),
            make_record("2025-08", "Texas", "Austin", "Widget"),
            make_record("2025-09", "Texas", "El Paso", ""),
            make_record("2025-09", "", "", "Widget"),
        ]
    }

    // ========== apply_filters ==========

    #[test]
    fn test_all_criteria_returns_everything() {
        let records = dataset();
        let subset = apply_filters(&records, &FilterCriteria::all()).unwrap();
        assert_eq!(subset, records);
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let criteria = FilterCriteria::from_selection("2025-08", "all", "all", "Widget");
        let subset = apply_filters(&dataset(), &criteria).unwrap();

        assert_eq!(subset.len(), 1);
        assert_eq!(subset[0].city, "Austin");
    }

    #[test]
    fn test_state_and_city() {
        let mut criteria = FilterCriteria::all();
        criteria.select_state("New Mexico");
        criteria.select_city("Taos");
        let subset = apply_filters(&dataset(), &criteria).unwrap();

        assert_eq!(subset.len(), 1);
        assert_eq!(subset[0].product, "Gadget");
    }

    #[test]
    fn test_exact_match_only() {
        let criteria = FilterCriteria::from_selection("all", "new mexico", "all", "all");
        assert!(apply_filters(&dataset(), &criteria).unwrap().is_empty());
    }

    #[test]
    fn test_city_without_state_is_rejected() {
        let criteria = FilterCriteria::from_selection("all", "all", "Taos", "all");
        let err = apply_filters(&dataset(), &criteria).unwrap_err();
        assert!(matches!(err, SalesError::FilterState(_)));
    }

    // ========== filter_options ==========

    #[test]
    fn test_options_sorted_and_prefixed() {
        let options = filter_options(&dataset(), ALL);

        assert_eq!(options.months, vec!["all", "2025-07", "2025-08", "2025-09"]);
        assert_eq!(options.states, vec!["all", "New Mexico", "Texas"]);
        assert_eq!(options.products, vec!["all", "Gadget", "Widget"]);
        assert_eq!(
            options.cities,
            vec!["all", "Austin", "El Paso", "Santa Fe", "Taos"]
        );
    }

    #[test]
    fn test_cities_scoped_to_state() {
        let options = filter_options(&dataset(), "New Mexico");
        assert_eq!(options.cities, vec!["all", "Santa Fe", "Taos"]);
        // states are never scoped
        assert_eq!(options.states, vec!["all", "New Mexico", "Texas"]);
    }

    #[test]
    fn test_options_for_unknown_state() {
        let options = filter_options(&dataset(), "Utah");
        assert_eq!(options.cities, vec!["all"]);
    }

    #[test]
    fn test_options_empty_dataset() {
        let options = filter_options(&[], ALL);
        assert_eq!(options.months, vec!["all"]);
        assert_eq!(options.cities, vec!["all"]);
    }
}
