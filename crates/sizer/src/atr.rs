use crate::{cap_to_usable_cash, Sizer};
use core_types::Signal;
use data::DataHandler;
use events::PortfolioSnapshot;
use rust_decimal::Decimal;

/// Scales the target value inversely with a symbol's recent volatility:
/// choppier names get smaller positions. Grounded in
/// `Portfolio/sizers.py::ATRSizer`.
pub struct AtrSizer {
    pub atr_period: usize,
    pub base_risk_amount: Decimal,
    pub risk_per_unit: Decimal,
    pub cash_reserve_ratio: Decimal,
}

impl Sizer for AtrSizer {
    fn target_value(&self, portfolio: &PortfolioSnapshot, signal: &Signal, data: &DataHandler) -> Decimal {
        let bars = data.latest_bars(&signal.symbol, self.atr_period);
        if bars.len() < self.atr_period {
            tracing::warn!(symbol = %signal.symbol, "insufficient history to compute ATR, skipping");
            return Decimal::ZERO;
        }

        let mut true_ranges = Vec::with_capacity(bars.len() - 1);
        for i in 1..bars.len() {
            let prev_close = bars[i - 1].close;
            let high_low = bars[i].high - bars[i].low;
            let high_prev = (bars[i].high - prev_close).abs();
            let low_prev = (bars[i].low - prev_close).abs();
            true_ranges.push(high_low.max(high_prev).max(low_prev));
        }
        let atr = true_ranges.iter().sum::<Decimal>() / Decimal::from(true_ranges.len());

        let Some(latest) = data.latest_bar(&signal.symbol) else {
            return Decimal::ZERO;
        };
        if latest.close.is_zero() {
            return Decimal::ZERO;
        }
        let volatility_ratio = atr / latest.close;
        if volatility_ratio.is_zero() {
            return Decimal::ZERO;
        }

        let target = self.base_risk_amount / volatility_ratio * self.risk_per_unit;
        cap_to_usable_cash(target, portfolio.cash, self.cash_reserve_ratio)
    }
}
