use thiserror::Error;

#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("invalid strategy parameters: {0}")]
    InvalidParameters(String),

    #[error("indicator computation failed: {0}")]
    Indicator(String),
}
