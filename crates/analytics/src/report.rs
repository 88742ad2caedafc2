use crate::trade::ClosedTrade;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// The final, report-ready summary the root binary prints and serializes.
/// Ratio metrics (return, drawdown, volatility, sharpe, calmar) are carried
/// as `f64` since they are statistical estimates, not currency amounts;
/// every money figure stays `Decimal`. Mirrors the shape of
/// `analytics/src/report.rs::PerformanceReport`.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport {
    pub total_return: f64,
    pub annualized_return: f64,
    pub max_drawdown: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub calmar_ratio: f64,

    pub trading_days: usize,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
    pub profit_loss_ratio: f64,
    pub avg_trade_pnl: Decimal,
    pub avg_winning_trade: Decimal,
    pub avg_losing_trade: Decimal,
    pub largest_win: Decimal,
    pub largest_loss: Decimal,
    pub total_commission: Decimal,
}

/// Aggregates the stats in §4.6's "Aggregated trade stats" table from a
/// set of already FIFO-matched closed trades.
pub fn aggregate_trade_stats(trades: &[ClosedTrade], total_commission: Decimal) -> TradeStats {
    let total_trades = trades.len();
    let winners: Vec<&ClosedTrade> = trades.iter().filter(|t| t.net_pnl > Decimal::ZERO).collect();
    let losers: Vec<&ClosedTrade> = trades.iter().filter(|t| t.net_pnl < Decimal::ZERO).collect();

    let win_rate = if total_trades > 0 {
        winners.len() as f64 / total_trades as f64
    } else {
        0.0
    };

    let avg = |ts: &[&ClosedTrade]| -> Decimal {
        if ts.is_empty() {
            Decimal::ZERO
        } else {
            ts.iter().map(|t| t.net_pnl).sum::<Decimal>() / Decimal::from(ts.len())
        }
    };

    let avg_winning_trade = avg(&winners);
    let avg_losing_trade = avg(&losers).abs();

    let profit_loss_ratio = if !losers.is_empty() {
        (avg_winning_trade / avg_losing_trade).to_f64().unwrap_or(0.0)
    } else if !winners.is_empty() {
        f64::INFINITY
    } else {
        0.0
    };

    let avg_trade_pnl = if total_trades > 0 {
        trades.iter().map(|t| t.net_pnl).sum::<Decimal>() / Decimal::from(total_trades)
    } else {
        Decimal::ZERO
    };

    let largest_win = winners.iter().map(|t| t.net_pnl).max().unwrap_or(Decimal::ZERO);
    let largest_loss = losers.iter().map(|t| t.net_pnl).min().unwrap_or(Decimal::ZERO).abs();

    TradeStats {
        total_trades,
        winning_trades: winners.len(),
        losing_trades: losers.len(),
        win_rate,
        profit_loss_ratio,
        avg_trade_pnl,
        avg_winning_trade,
        avg_losing_trade,
        largest_win,
        largest_loss,
        total_commission,
    }
}

pub struct TradeStats {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
    pub profit_loss_ratio: f64,
    pub avg_trade_pnl: Decimal,
    pub avg_winning_trade: Decimal,
    pub avg_losing_trade: Decimal,
    pub largest_win: Decimal,
    pub largest_loss: Decimal,
    pub total_commission: Decimal,
}
