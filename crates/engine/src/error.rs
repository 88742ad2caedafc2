use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("engine was constructed with no strategies bound to any symbol")]
    NoStrategies,
}
