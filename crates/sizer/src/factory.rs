use crate::{AtrSizer, EqualWeightSizer, FixedRatioSizer, Sizer, SignalWeightedSizer};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Declarative description of a configured sizer, as read from
/// `[portfolio.sizer]` in the settings file. Mirrors the
/// `create_sizer(sizer_type, **kwargs)` factory in `Portfolio/sizers.py`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SizerConfig {
    EqualWeight {
        max_positions: u32,
        #[serde(default = "default_reserve")]
        cash_reserve_ratio: Decimal,
    },
    FixedRatio {
        ratio: Decimal,
        #[serde(default = "default_reserve")]
        cash_reserve_ratio: Decimal,
    },
    SignalWeighted {
        base_ratio: Decimal,
        #[serde(default = "default_reserve")]
        cash_reserve_ratio: Decimal,
    },
    Atr {
        atr_period: usize,
        base_risk_amount: Decimal,
        risk_per_unit: Decimal,
        #[serde(default = "default_reserve")]
        cash_reserve_ratio: Decimal,
    },
}

fn default_reserve() -> Decimal {
    Decimal::new(10, 2) // 0.10
}

pub fn create_sizer(config: &SizerConfig) -> Box<dyn Sizer> {
    match config.clone() {
        SizerConfig::EqualWeight { max_positions, cash_reserve_ratio } => {
            Box::new(EqualWeightSizer { max_positions, cash_reserve_ratio })
        }
        SizerConfig::FixedRatio { ratio, cash_reserve_ratio } => {
            Box::new(FixedRatioSizer { ratio, cash_reserve_ratio })
        }
        SizerConfig::SignalWeighted { base_ratio, cash_reserve_ratio } => {
            Box::new(SignalWeightedSizer { base_ratio, cash_reserve_ratio })
        }
        SizerConfig::Atr { atr_period, base_risk_amount, risk_per_unit, cash_reserve_ratio } => {
            Box::new(AtrSizer { atr_period, base_risk_amount, risk_per_unit, cash_reserve_ratio })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_equal_weight_from_config() {
        let cfg = SizerConfig::EqualWeight {
            max_positions: 5,
            cash_reserve_ratio: Decimal::new(10, 2),
        };
        let _sizer = create_sizer(&cfg);
    }
}
