use crate::{MaCrossover, Strategy, StrategyError};
use serde::Deserialize;

/// Declarative strategy configuration, as read from `[strategy.parameters]`.
/// Mirrors `strategies/src/factory.rs::create_strategy`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyConfig {
    MaCrossover { fast_period: usize, slow_period: usize },
}

pub fn create_strategy(config: &StrategyConfig, symbol: String) -> Result<Box<dyn Strategy>, StrategyError> {
    match config.clone() {
        StrategyConfig::MaCrossover { fast_period, slow_period } => {
            Ok(Box::new(MaCrossover::new(symbol, fast_period, slow_period)?))
        }
    }
}
