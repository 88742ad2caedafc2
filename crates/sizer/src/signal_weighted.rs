use crate::{cap_to_usable_cash, Sizer};
use core_types::Signal;
use data::DataHandler;
use events::PortfolioSnapshot;
use rust_decimal::Decimal;

/// Scales a base ratio by the signal's advisory strength. Grounded in
/// `Portfolio/sizers.py::SignalWeightedSizer`.
pub struct SignalWeightedSizer {
    pub base_ratio: Decimal,
    pub cash_reserve_ratio: Decimal,
}

impl Sizer for SignalWeightedSizer {
    fn target_value(&self, portfolio: &PortfolioSnapshot, signal: &Signal, _data: &DataHandler) -> Decimal {
        let target = portfolio.total_equity * self.base_ratio * signal.strength;
        cap_to_usable_cash(target, portfolio.cash, self.cash_reserve_ratio)
    }
}
