//! Typed access to the recognized configuration surface (spec.md §6):
//! backtest window and capital, data paths, the sizer and strategy
//! selections, and execution cost parameters.

pub mod error;
pub mod settings;

pub use error::ConfigError;
pub use settings::{
    BacktestSettings, DataSettings, ExecutionSettings, PortfolioSettings, Settings,
    StrategySettings,
};

/// Loads and validates settings from a TOML file. Validation failures are
/// configuration errors (spec.md §7 kind 1): they must surface before the
/// Data Handler or Portfolio are ever constructed.
pub fn load_settings(path: &str) -> Result<Settings, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Err(ConfigError::FileNotFound(path.to_string()));
    }

    let builder = config::Config::builder()
        .add_source(config::File::from(std::path::Path::new(path)))
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    validate(&settings)?;
    Ok(settings)
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.backtest.end_date <= settings.backtest.start_date {
        return Err(ConfigError::validation(format!(
            "end_date {} must be after start_date {}",
            settings.backtest.end_date, settings.backtest.start_date
        )));
    }
    if settings.backtest.initial_capital.is_sign_negative() {
        return Err(ConfigError::validation("initial_capital must be non-negative"));
    }
    if settings.data.csv_root_path.trim().is_empty() {
        return Err(ConfigError::validation("data.csv_root_path must not be empty"));
    }
    if settings.strategy.max_positions == 0 {
        return Err(ConfigError::validation("strategy.max_positions must be greater than zero"));
    }
    Ok(())
}
