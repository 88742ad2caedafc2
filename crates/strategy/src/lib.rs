//! Component C3: the Strategy contract. A strategy reads bars and an
//! optional read-only Portfolio snapshot, and emits `Signal`s — it never
//! touches cash or positions directly.

pub mod error;
pub mod factory;
pub mod ma_crossover;

pub use error::StrategyError;
pub use factory::{create_strategy, StrategyConfig};
pub use ma_crossover::MaCrossover;

use core_types::{Bar, Signal};
use data::DataHandler;
use events::PortfolioSnapshot;

/// Per-strategy bookkeeping the template method in [`Strategy::on_market`]
/// maintains automatically. Concrete strategies embed this rather than
/// tracking "have I seen a bar yet" themselves.
#[derive(Debug, Default)]
pub struct StrategyState {
    pub current_time: Option<core_types::Timestamp>,
    pub initialized: bool,
}

/// A strategy is polymorphic over `{on_market, optional selection}`
/// (spec.md §4.2). `on_market` is the template method: it updates
/// `StrategyState` and contains any error from `handle_market` so a single
/// failing strategy never aborts the run.
pub trait Strategy {
    fn state_mut(&mut self) -> &mut StrategyState;

    /// The overridable half of the template method. Implementations
    /// compute signals from the bar, the read-only Data Handler (for
    /// lookback), and the read-only Portfolio snapshot.
    fn handle_market(
        &mut self,
        bar: &Bar,
        data: &DataHandler,
        portfolio: &PortfolioSnapshot,
    ) -> Result<Vec<Signal>, StrategyError>;

    fn on_market(&mut self, bar: &Bar, data: &DataHandler, portfolio: &PortfolioSnapshot) -> Vec<Signal> {
        {
            let state = self.state_mut();
            state.current_time = Some(bar.timestamp);
            state.initialized = true;
        }
        match self.handle_market(bar, data, portfolio) {
            Ok(signals) => signals,
            Err(err) => {
                tracing::error!(symbol = %bar.symbol, error = %err, "strategy handler failed; swallowing and continuing");
                Vec::new()
            }
        }
    }
}
