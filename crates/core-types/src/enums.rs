use serde::{Deserialize, Serialize};

/// The two trade directions the core engine understands.
///
/// The original system this was distilled from carries two separate
/// `Direction` enums (one with `BUY`/`SELL` aliases). The core is long-only:
/// `Long` opens/adds a position, `Short` closes it. No alias type is
/// introduced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    Market,
    Limit,
}

/// Supported bar intervals. The core only exercises daily bars, but the
/// field is carried through so a richer data source can attach its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interval {
    Daily,
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Interval::Daily => write!(f, "1d"),
        }
    }
}

/// The three exchanges a canonical A-share symbol can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exchange {
    SH,
    SZ,
    BJ,
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Exchange::SH => write!(f, "SH"),
            Exchange::SZ => write!(f, "SZ"),
            Exchange::BJ => write!(f, "BJ"),
        }
    }
}
