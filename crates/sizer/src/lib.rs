//! Position sizing (component C4): a pure function from a portfolio
//! snapshot and a signal to a target monetary value. A sizer never touches
//! cash or positions directly — the Portfolio is the only writer.

pub mod atr;
pub mod equal_weight;
pub mod factory;
pub mod fixed_ratio;
pub mod signal_weighted;

pub use atr::AtrSizer;
pub use equal_weight::EqualWeightSizer;
pub use factory::{create_sizer, SizerConfig};
pub use fixed_ratio::FixedRatioSizer;
pub use signal_weighted::SignalWeightedSizer;

use core_types::Signal;
use data::DataHandler;
use events::PortfolioSnapshot;
use rust_decimal::Decimal;

/// Common sizing contract. `target_value` returning `<= 0` means "do not
/// trade"; implementations clamp negative results to zero rather than
/// propagating an error.
pub trait Sizer: Send + Sync {
    fn target_value(&self, portfolio: &PortfolioSnapshot, signal: &Signal, data: &DataHandler) -> Decimal;
}

/// Caps a raw target at the cash actually usable after reserving
/// `cash_reserve_ratio` of current cash, per every variant in spec.md §4.3.
pub(crate) fn cap_to_usable_cash(target: Decimal, cash: Decimal, cash_reserve_ratio: Decimal) -> Decimal {
    let max_usable = cash * (Decimal::ONE - cash_reserve_ratio);
    let capped = target.min(max_usable);
    capped.max(Decimal::ZERO)
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use core_types::{Bar, Exchange, Interval};
    use data::{BarSource, DataError, DataHandler};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    struct ConstantBars {
        bars: Vec<Bar>,
    }

    impl BarSource for ConstantBars {
        fn load_bars(
            &self,
            _symbol: &str,
            _exchange: Exchange,
            _start: core_types::Timestamp,
            _end: core_types::Timestamp,
        ) -> Result<Vec<Bar>, DataError> {
            Ok(self.bars.clone())
        }
    }

    /// A single-symbol `DataHandler` parked at the last bar of `closes`, for
    /// sizers that need to look up a price or a short history.
    pub(crate) fn handler_at(symbol: &str, closes: &[Decimal]) -> DataHandler {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                Bar::new(
                    symbol.to_string(),
                    Exchange::SZ,
                    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64),
                    Interval::Daily,
                    close,
                    close + dec!(0.5),
                    close - dec!(0.5),
                    close,
                    dec!(1000),
                    dec!(10000),
                    close,
                    close + dec!(1),
                    close - dec!(1),
                    Default::default(),
                )
                .unwrap()
            })
            .collect::<Vec<_>>();
        let source = ConstantBars { bars };
        let mut handler = DataHandler::new(
            &source,
            &[symbol.to_string()],
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        )
        .unwrap();
        while handler.next_tick().is_some() {}
        handler
    }
}
