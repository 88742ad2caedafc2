/// Bookkeeping counters exposed for reporting and tests; never read by the
/// accounting logic itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct Counters {
    pub market_updates: u64,
    pub signals_processed: u64,
    pub signals_dropped: u64,
    pub fills_processed: u64,
    pub total_trades: u64,
}
