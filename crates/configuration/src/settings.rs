use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use sizer::SizerConfig;
use strategy::StrategyConfig;

/// The root configuration structure, mirroring the `[backtest]`, `[data]`,
/// `[portfolio.sizer]`, `[strategy.parameters]`, and `[execution]` groups
/// of the recognized configuration surface.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub backtest: BacktestSettings,
    pub data: DataSettings,
    pub portfolio: PortfolioSettings,
    pub strategy: StrategySettings,
    #[serde(default)]
    pub execution: ExecutionSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BacktestSettings {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    pub csv_root_path: String,
    pub output_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioSettings {
    pub sizer: SizerConfig,
}

/// `max_positions` is the engine-level risk cap on concurrent symbols; the
/// rest of the table is the chosen strategy's own parameters, flattened in.
#[derive(Debug, Clone, Deserialize)]
pub struct StrategySettings {
    pub max_positions: u32,
    #[serde(flatten)]
    pub parameters: StrategyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionSettings {
    #[serde(default = "default_commission_rate")]
    pub commission_rate: Decimal,
    #[serde(default = "default_min_commission")]
    pub min_commission: Decimal,
    #[serde(default = "default_slippage_rate")]
    pub slippage_rate: Decimal,
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            commission_rate: default_commission_rate(),
            min_commission: default_min_commission(),
            slippage_rate: default_slippage_rate(),
        }
    }
}

fn default_commission_rate() -> Decimal {
    Decimal::new(3, 4) // 0.0003
}

fn default_min_commission() -> Decimal {
    Decimal::new(5, 0)
}

fn default_slippage_rate() -> Decimal {
    Decimal::new(1, 3) // 0.001
}
