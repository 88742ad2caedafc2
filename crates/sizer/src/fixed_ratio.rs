use crate::{cap_to_usable_cash, Sizer};
use core_types::Signal;
use data::DataHandler;
use events::PortfolioSnapshot;
use rust_decimal::Decimal;

/// Allocates a fixed fraction of total equity per signal. Grounded in
/// `Portfolio/sizers.py::FixedRatioSizer`.
pub struct FixedRatioSizer {
    pub ratio: Decimal,
    pub cash_reserve_ratio: Decimal,
}

impl Sizer for FixedRatioSizer {
    fn target_value(&self, portfolio: &PortfolioSnapshot, _signal: &Signal, _data: &DataHandler) -> Decimal {
        let target = portfolio.total_equity * self.ratio;
        cap_to_usable_cash(target, portfolio.cash, self.cash_reserve_ratio)
    }
}
