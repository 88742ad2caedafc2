use crate::error::DataError;
use core_types::{Bar, Exchange, Timestamp};

/// External collaborator boundary: ingestion of bars from wherever they
/// actually live. The core engine only ever talks to this trait.
pub trait BarSource {
    /// Returns the symbol's bars in `[start, end]`, sorted ascending,
    /// strictly within range. Implementations reject malformed rows rather
    /// than propagate them (spec.md §7 error kind 2).
    fn load_bars(
        &self,
        symbol: &str,
        exchange: Exchange,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<Bar>, DataError>;
}

/// A `BarSource` that reads one CSV file per symbol from a root directory,
/// following the Chinese-header column mapping of spec.md §6. Grounded in
/// `original_source/DataManager/sources/local_csv.py`.
pub struct CsvBarSource {
    root_path: std::path::PathBuf,
}

impl CsvBarSource {
    pub fn new(root_path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
        }
    }

    fn file_path(&self, symbol: &str) -> std::path::PathBuf {
        let code = symbol.split('.').next().unwrap_or(symbol);
        self.root_path.join(format!("{code}.csv"))
    }
}

impl BarSource for CsvBarSource {
    fn load_bars(
        &self,
        symbol: &str,
        exchange: Exchange,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<Bar>, DataError> {
        let path = self.file_path(symbol);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&path)
            .map_err(|e| DataError::Source(symbol.to_string(), e.to_string()))?;

        let headers = reader
            .headers()
            .map_err(|e| DataError::Source(symbol.to_string(), e.to_string()))?
            .clone();

        let mut bars = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| DataError::Source(symbol.to_string(), e.to_string()))?;
            match crate::csv_row::parse_row(symbol, exchange, &headers, &record) {
                Ok(Some(bar)) => {
                    if bar.timestamp >= start && bar.timestamp <= end {
                        bars.push(bar);
                    }
                }
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(symbol, error = %e, "dropping malformed bar row");
                }
            }
        }

        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }
}
