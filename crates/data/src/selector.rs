use crate::error::DataError;
use crate::symbol::normalize_symbol;
use core_types::Timestamp;

/// External collaborator boundary: which symbols are in play on a given
/// date. A full stock universe screener (factor ranking, liquidity
/// filters, ...) lives behind this trait; the core engine only ever calls
/// `select`.
pub trait StockSelector {
    fn select(&self, as_of: Timestamp) -> Result<Vec<String>, DataError>;
}

/// A `StockSelector` backed by a fixed, pre-configured symbol list.
/// Normalizes every entry so callers can hand in either bare 6-digit codes
/// or already-qualified `CCCCCC.XX` symbols.
pub struct StaticStockSelector {
    symbols: Vec<String>,
}

impl StaticStockSelector {
    pub fn new(raw_symbols: impl IntoIterator<Item = impl AsRef<str>>) -> Result<Self, DataError> {
        let symbols = raw_symbols
            .into_iter()
            .map(|s| normalize_symbol(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { symbols })
    }
}

impl StockSelector for StaticStockSelector {
    fn select(&self, _as_of: Timestamp) -> Result<Vec<String>, DataError> {
        if self.symbols.is_empty() {
            return Err(DataError::EmptyUniverse);
        }
        Ok(self.symbols.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn normalizes_and_returns_configured_symbols() {
        let sel = StaticStockSelector::new(["600519", "000001.sz"]).unwrap();
        let picked = sel.select(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()).unwrap();
        assert_eq!(picked, vec!["600519.SH".to_string(), "000001.SZ".to_string()]);
    }

    #[test]
    fn empty_universe_is_an_error() {
        let sel = StaticStockSelector::new(Vec::<String>::new()).unwrap();
        assert!(matches!(
            sel.select(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()),
            Err(DataError::EmptyUniverse)
        ));
    }
}
