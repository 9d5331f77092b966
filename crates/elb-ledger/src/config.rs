use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::fixedpoint::Scales;

fn default_base_ccy() -> String {
    "USD".to_string()
}

/// Parameters a fresh [`LedgerState`](crate::LedgerState) is built from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    #[serde(default = "default_base_ccy")]
    pub base_ccy: String,
    pub money_scale: i64,
    pub price_scale: i64,
    pub qty_scale: i64,
    /// Opening cash balance, in cash ints (`money_scale`).
    #[serde(default)]
    pub initial_cash_int: i64,
}

impl LedgerConfig {
    pub fn scales(&self) -> Result<Scales, LedgerError> {
        Scales::new(self.money_scale, self.price_scale, self.qty_scale)
    }
}

/// Four decimal places for money and price, whole-unit quantities, no cash.
impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            base_ccy: default_base_ccy(),
            money_scale: 10_000,
            price_scale: 10_000,
            qty_scale: 1,
            initial_cash_int: 0,
        }
    }
}
