use core_types::{Position, Timestamp};
use rust_decimal::Decimal;

/// A read-only view of the Portfolio's state, handed to a Strategy or a
/// Sizer for the duration of one tick. Strategies never hold a mutable
/// handle to the Portfolio — this breaks the Portfolio <-> Strategy cycle
/// (see `spec.md` §9).
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSnapshot {
    pub timestamp: Timestamp,
    pub cash: Decimal,
    pub total_equity: Decimal,
    pub positions: Vec<Position>,
}

impl PortfolioSnapshot {
    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.symbol == symbol)
    }

    pub fn held_count(&self) -> usize {
        self.positions.len()
    }
}
