//! Row sources: load raw tabular rows from files

mod csv_source;
mod json_source;

pub use csv_source::CsvSource;
pub use json_source::JsonSource;

use crate::types::{RawRow, Result, SalesError};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Trait for loading raw rows from one file format
pub trait RowSource: Send + Sync {
    /// Source name (e.g., "csv")
    fn name(&self) -> &str;

    /// Lowercase file extensions handled by this source
    fn extensions(&self) -> &[&str];

    /// Load every row of a single file
    fn load(&self, path: &Path) -> Result<Vec<RawRow>>;

    fn handles(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .is_some_and(|e| self.extensions().contains(&e.as_str()))
    }
}

/// Registry of available row sources
pub struct SourceRegistry {
    sources: Vec<Box<dyn RowSource>>,
}

impl SourceRegistry {
    /// Create a new registry with the CSV and JSON sources
    pub fn new() -> Self {
        Self {
            sources: vec![Box::new(CsvSource::new()), Box::new(JsonSource::new())],
        }
    }

    pub fn sources(&self) -> &[Box<dyn RowSource>] {
        &self.sources
    }

    /// Find the source for a file by extension
    pub fn for_path(&self, path: &Path) -> Option<&dyn RowSource> {
        self.sources
            .iter()
            .find(|s| s.handles(path))
            .map(|s| s.as_ref())
    }

    /// Load a single file with the matching source
    pub fn load(&self, path: &Path) -> Result<Vec<RawRow>> {
        let source = self.for_path(path).ok_or_else(|| {
            SalesError::Config(format!("unsupported input file type: {}", path.display()))
        })?;
        let rows = source.load(path)?;
        tracing::debug!(source = source.name(), path = %path.display(), rows = rows.len(), "loaded rows");
        Ok(rows)
    }

    /// Load files in parallel; rows are concatenated in path order.
    pub fn load_all(&self, paths: &[PathBuf]) -> Result<Vec<RawRow>> {
        let per_file: Vec<Vec<RawRow>> = paths
            .par_iter()
            .map(|p| self.load(p))
            .collect::<Result<_>>()?;
        Ok(per_file.into_iter().flatten().collect())
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve an input argument: an existing path is used as-is, anything else
/// is treated as a glob pattern. Matches are sorted for stable row order.
pub fn expand_inputs(input: &str) -> Result<Vec<PathBuf>> {
    let direct = PathBuf::from(input);
    if direct.is_file() {
        return Ok(vec![direct]);
    }

    let mut paths: Vec<PathBuf> = glob::glob(input)
        .map_err(|e| SalesError::Config(format!("invalid input pattern '{}': {}", input, e)))?
        .filter_map(|e| e.ok())
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(SalesError::Config(format!(
            "no input files match '{}'",
            input
        )));
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_registry_default_sources() {
        let registry = SourceRegistry::new();
        assert_eq!(registry.sources().len(), 2);
        assert_eq!(registry.for_path(Path::new("sales.csv")).unwrap().name(), "csv");
        assert_eq!(registry.for_path(Path::new("SALES.JSON")).unwrap().name(), "json");
        assert!(registry.for_path(Path::new("sales.xlsx")).is_none());
        assert!(registry.for_path(Path::new("sales")).is_none());
    }

    #[test]
    fn test_load_unsupported_type() {
        let err = SourceRegistry::new().load(Path::new("sales.xlsx")).unwrap_err();
        assert!(matches!(err, SalesError::Config(_)));
    }

    #[test]
    fn test_load_all_keeps_path_order() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.json");
        fs::write(&a, "city,quantity\nTaos,1\nAustin,2\n").unwrap();
        fs::write(&b, r#"[{"city": "El Paso", "quantity": 3}]"#).unwrap();

        let rows = SourceRegistry::new().load_all(&[a, b]).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].get("city"), Some(&CellValue::Text("Taos".into())));
        assert_eq!(rows[2].get("quantity"), Some(&CellValue::Int(3)));
    }

    #[test]
    fn test_load_all_propagates_errors() {
        let dir = TempDir::new().unwrap();
        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{not json").unwrap();

        let result = SourceRegistry::new().load_all(&[bad]);
        assert!(matches!(result, Err(SalesError::Parse(_))));
    }

    #[test]
    fn test_expand_inputs_direct_and_glob() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("2025-08.csv"), "quantity\n1\n").unwrap();
        fs::write(dir.path().join("2025-07.csv"), "quantity\n1\n").unwrap();

        let direct = dir.path().join("2025-08.csv");
        assert_eq!(expand_inputs(direct.to_str().unwrap()).unwrap(), vec![direct.clone()]);

        let pattern = dir.path().join("*.csv");
        let paths = expand_inputs(pattern.to_str().unwrap()).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("2025-07.csv"));
    }

    #[test]
    fn test_expand_inputs_no_match() {
        let dir = TempDir::new().unwrap();
        let pattern = dir.path().join("*.csv");
        let err = expand_inputs(pattern.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, SalesError::Config(_)));
    }
}
