use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("equity curve is empty, cannot compute a performance report")]
    EmptyEquityCurve,
}
