use crate::error::AnalyticsError;
use crate::report::{aggregate_trade_stats, PerformanceReport};
use crate::trade::match_fifo_trades;
use core_types::{EquityPoint, FillRecord};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashSet;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;
const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

/// Component C8: consumes the equity curve and fill history and produces a
/// `PerformanceReport`, following the precise formulas of spec.md §4.6.
/// Grounded in `analytics/src/engine.rs`'s calculate/profitability/
/// drawdown/ratios split, re-derived to match this system's exact metric
/// definitions.
pub struct AnalyticsEngine {
    risk_free_rate: f64,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self { risk_free_rate: DEFAULT_RISK_FREE_RATE }
    }
}

impl AnalyticsEngine {
    pub fn with_risk_free_rate(risk_free_rate: f64) -> Self {
        Self { risk_free_rate }
    }

    pub fn calculate(
        &self,
        equity_curve: &[EquityPoint],
        fill_history: &[FillRecord],
    ) -> Result<PerformanceReport, AnalyticsError> {
        if equity_curve.is_empty() {
            return Err(AnalyticsError::EmptyEquityCurve);
        }

        let start_equity = equity_curve.first().unwrap().total_equity;
        let end_equity = equity_curve.last().unwrap().total_equity;

        let total_return = to_f64(end_equity / start_equity - Decimal::ONE);

        let trading_days = equity_curve.iter().map(|p| p.timestamp).collect::<HashSet<_>>().len();
        let annualized_return = if trading_days <= 1 {
            0.0
        } else {
            let ratio = to_f64(end_equity / start_equity);
            ratio.powf(TRADING_DAYS_PER_YEAR / trading_days as f64) - 1.0
        };

        let max_drawdown = compute_max_drawdown(equity_curve);

        let daily_equity = resample_daily(equity_curve);
        let daily_returns = pct_changes(&daily_equity);
        let volatility = std_dev(&daily_returns) * TRADING_DAYS_PER_YEAR.sqrt();
        let sharpe_ratio = {
            let std = std_dev(&daily_returns);
            if std == 0.0 {
                0.0
            } else {
                (mean(&daily_returns) - self.risk_free_rate / TRADING_DAYS_PER_YEAR) / std * TRADING_DAYS_PER_YEAR.sqrt()
            }
        };
        let calmar_ratio = if max_drawdown == 0.0 { 0.0 } else { annualized_return / max_drawdown.abs() };

        let trades = match_fifo_trades(fill_history);
        let total_commission = fill_history.iter().map(|f| f.commission).sum::<Decimal>();
        let stats = aggregate_trade_stats(&trades, total_commission);

        Ok(PerformanceReport {
            total_return,
            annualized_return,
            max_drawdown,
            volatility,
            sharpe_ratio,
            calmar_ratio,
            trading_days,
            total_trades: stats.total_trades,
            winning_trades: stats.winning_trades,
            losing_trades: stats.losing_trades,
            win_rate: stats.win_rate,
            profit_loss_ratio: stats.profit_loss_ratio,
            avg_trade_pnl: stats.avg_trade_pnl,
            avg_winning_trade: stats.avg_winning_trade,
            avg_losing_trade: stats.avg_losing_trade,
            largest_win: stats.largest_win,
            largest_loss: stats.largest_loss,
            total_commission: stats.total_commission,
        })
    }
}

fn to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// `min over t of (equity[t]/cummax(equity)[t] - 1)`, computed on the raw
/// (non-resampled) equity curve.
fn compute_max_drawdown(equity_curve: &[EquityPoint]) -> f64 {
    let mut running_max = equity_curve[0].total_equity;
    let mut worst = 0.0f64;
    for point in equity_curve {
        if point.total_equity > running_max {
            running_max = point.total_equity;
        }
        let drawdown = to_f64(point.total_equity / running_max - Decimal::ONE);
        if drawdown < worst {
            worst = drawdown;
        }
    }
    worst
}

/// Collapses the equity curve to its last value per calendar date, per
/// spec.md §4.6's "Daily returns are computed by resampling ... first".
fn resample_daily(equity_curve: &[EquityPoint]) -> Vec<EquityPoint> {
    let mut out: Vec<EquityPoint> = Vec::new();
    for point in equity_curve {
        match out.last_mut() {
            Some(last) if last.timestamp == point.timestamp => *last = point.clone(),
            _ => out.push(point.clone()),
        }
    }
    out
}

fn pct_changes(series: &[EquityPoint]) -> Vec<f64> {
    series
        .windows(2)
        .map(|w| to_f64(w[1].total_equity / w[0].total_equity - Decimal::ONE))
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
