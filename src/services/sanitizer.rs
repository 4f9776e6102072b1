//! Record sanitization boundary
//!
//! Turns loosely typed parsed rows into strictly typed [`SalesRecord`]s.
//! A malformed cell never aborts the batch; it falls back to its type's
//! zero/empty default. Only a structurally wrong input (not a sequence of
//! row-like objects) is an error.

use crate::types::{CellValue, RawRow, Result, SalesError, SalesRecord};

/// Sanitized dataset with the zero-quantity exclusion already applied
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sanitized {
    /// Records with `quantity > 0`, in input order
    pub records: Vec<SalesRecord>,
    /// Number of rows removed by the zero-quantity exclusion
    pub excluded_zero_qty: usize,
    /// Number of rows received before exclusion
    pub raw_count: usize,
}

/// Sanitizer for raw parsed rows
pub struct Sanitizer;

impl Sanitizer {
    /// Sanitize and apply the zero-quantity exclusion.
    pub fn sanitize(rows: &[RawRow]) -> Sanitized {
        let records = Self::sanitize_rows(rows);
        let (records, excluded_zero_qty) = Self::exclude_zero_quantity(records);
        Sanitized {
            records,
            excluded_zero_qty,
            raw_count: rows.len(),
        }
    }

    /// Sanitize a JSON document that must be an array of objects.
    pub fn sanitize_json(value: &serde_json::Value) -> Result<Sanitized> {
        let rows = Self::rows_from_json(value)?;
        Ok(Self::sanitize(&rows))
    }

    /// Convert a JSON array of objects into raw rows. Anything else is a
    /// caller contract violation.
    pub fn rows_from_json(value: &serde_json::Value) -> Result<Vec<RawRow>> {
        let items = value.as_array().ok_or_else(|| {
            SalesError::InvalidInput(format!("expected an array of rows, got {}", kind(value)))
        })?;

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let object = item.as_object().ok_or_else(|| {
                    SalesError::InvalidInput(format!(
                        "row {} is {}, expected an object",
                        i,
                        kind(item)
                    ))
                })?;
                Ok(object
                    .iter()
                    .map(|(k, v)| (k.clone(), CellValue::from_json(v)))
                    .collect())
            })
            .collect()
    }

    /// Sanitize every row; output has the same length and order as input.
    pub fn sanitize_rows(rows: &[RawRow]) -> Vec<SalesRecord> {
        let mut coerced = 0usize;
        let records: Vec<SalesRecord> = rows
            .iter()
            .map(|row| {
                let (record, fallbacks) = Self::sanitize_row(row);
                if fallbacks > 0 {
                    coerced += 1;
                }
                record
            })
            .collect();

        if coerced > 0 {
            tracing::debug!(
                rows = rows.len(),
                coerced,
                "sanitized rows with defaulted numeric fields"
            );
        }
        records
    }

    /// Sanitize one row. Returns the record and how many present numeric
    /// cells failed to coerce.
    pub fn sanitize_row(row: &RawRow) -> (SalesRecord, usize) {
        let mut fallbacks = 0usize;

        let mut integer = |field: &str| match row.get(field) {
            None | Some(CellValue::Null) => 0,
            Some(cell) => cell.to_integer().unwrap_or_else(|| {
                fallbacks += 1;
                0
            }),
        };
        let quantity = integer("quantity");

        let mut decimal = |field: &str| match row.get(field) {
            None | Some(CellValue::Null) => 0.0,
            Some(cell) => cell.to_decimal().unwrap_or_else(|| {
                fallbacks += 1;
                0.0
            }),
        };
        let price = decimal("price");
        let total_value = decimal("total_value");

        let text = |field: &str| row.get(field).map(CellValue::as_text).unwrap_or_default();

        let record = SalesRecord {
            customer_id: text("customer_id"),
            city: text("city"),
            state: text("state"),
            zip: text("zip"),
            product: text("product"),
            quantity,
            price,
            total_value,
            date: text("date"),
            year_month: text("year_month"),
        };
        (record, fallbacks)
    }

    /// Remove records with `quantity <= 0`, returning the kept records and
    /// the excluded count.
    pub fn exclude_zero_quantity(records: Vec<SalesRecord>) -> (Vec<SalesRecord>, usize) {
        let before = records.len();
        let kept: Vec<SalesRecord> = records.into_iter().filter(|r| r.quantity > 0).collect();
        let excluded = before - kept.len();
        if excluded > 0 {
            tracing::debug!(excluded, kept = kept.len(), "excluded zero-quantity records");
        }
        (kept, excluded)
    }
}

fn kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
