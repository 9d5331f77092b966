use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Net position in one symbol.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Signed quantity (+long, -short, 0 flat), in qty ints.
    pub qty_int: i64,
    /// Weighted average entry price, in price ints (0 when flat).
    pub avg_price_int: i64,
}

/// The ledger's complete monetary state.
///
/// `unrealized_pnl_int` and `equity_int` are derived: they are recomputed
/// from cash, positions and marks after every mutating event and never
/// written independently. `fees_paid_int` and `realized_pnl_int` are
/// running accumulators.
///
/// Serializes to the deterministic snapshot returned by `get_state()`
/// (BTreeMap keeps positions and marks sorted by symbol).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    pub base_ccy: String,
    pub money_scale: i64,
    pub price_scale: i64,
    pub qty_scale: i64,
    pub cash_int: i64,
    pub positions: BTreeMap<String, Position>,
    pub last_price_by_symbol: BTreeMap<String, i64>,
    pub realized_pnl_int: i64,
    pub unrealized_pnl_int: i64,
    pub fees_paid_int: i64,
    pub equity_int: i64,
}

impl LedgerState {
    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }

    /// Signed quantity for a symbol (0 if never traded).
    pub fn qty_int(&self, symbol: &str) -> i64 {
        self.positions.get(symbol).map(|p| p.qty_int).unwrap_or(0)
    }

    pub fn is_flat(&self) -> bool {
        self.positions.values().all(|p| p.qty_int == 0)
    }
}
