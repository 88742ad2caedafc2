use crate::{cap_to_usable_cash, Sizer};
use core_types::Signal;
use data::DataHandler;
use events::PortfolioSnapshot;
use rust_decimal::Decimal;

/// Divides total equity evenly across `max_positions` concurrent slots.
/// Grounded in `Portfolio/sizers.py::EqualWeightSizer`.
pub struct EqualWeightSizer {
    pub max_positions: u32,
    pub cash_reserve_ratio: Decimal,
}

impl Sizer for EqualWeightSizer {
    fn target_value(&self, portfolio: &PortfolioSnapshot, _signal: &Signal, _data: &DataHandler) -> Decimal {
        if self.max_positions == 0 {
            tracing::warn!("max_positions configured as 0, sizer will never trade");
            return Decimal::ZERO;
        }
        let target = portfolio.total_equity / Decimal::from(self.max_positions);
        cap_to_usable_cash(target, portfolio.cash, self.cash_reserve_ratio)
    }
}
