//! JSON row source

use crate::services::sanitizer::Sanitizer;
use crate::types::{RawRow, Result, SalesError};
use std::fs;
use std::path::Path;

use super::RowSource;

/// Loads rows from a JSON document holding an array of objects
pub struct JsonSource;

impl JsonSource {
    pub fn new() -> Self {
        Self
    }

    /// Parse a JSON buffer in place (SIMD parser mutates its input)
    pub fn read_rows(bytes: &mut [u8]) -> Result<Vec<RawRow>> {
        let value: serde_json::Value =
            simd_json::from_slice(bytes).map_err(|e| SalesError::Parse(e.to_string()))?;
        Sanitizer::rows_from_json(&value)
    }
}

impl Default for JsonSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RowSource for JsonSource {
    fn name(&self) -> &str {
        "json"
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }

    fn load(&self, path: &Path) -> Result<Vec<RawRow>> {
        let mut bytes = fs::read(path)?;
        Self::read_rows(&mut bytes)
    }
}
