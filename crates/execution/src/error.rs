use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("commission_rate and slippage_rate must be non-negative")]
    InvalidCostConfig,
}
