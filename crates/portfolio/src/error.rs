use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("max_positions must be greater than zero")]
    InvalidMaxPositions,

    #[error("cash_reserve_ratio must be within [0, 1]")]
    InvalidCashReserveRatio,

    #[error("initial_capital must be non-negative")]
    InvalidInitialCapital,
}
