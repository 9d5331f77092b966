use elb_events::IdentifiedEvent;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What applying one event did.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyOutcome {
    /// `false` for recorded-only kinds that do not touch ledger state.
    pub applied: bool,
}

impl ApplyOutcome {
    pub const APPLIED: ApplyOutcome = ApplyOutcome { applied: true };
    pub const RECORDED: ApplyOutcome = ApplyOutcome { applied: false };
}

/// The accounting engine the bridge drives.
///
/// Implementors own their state exclusively; `&mut self` on `apply` is the
/// single-writer guarantee. A run uses one fresh instance.
///
/// `get_state` must be deterministic: equal event sequences produce equal
/// values. The bridge reads `cash_int`, `equity_int`, `realized_pnl_int`,
/// `unrealized_pnl_int`, `fees_paid_int` and `positions` from it for equity
/// snapshots (absent keys become `null`).
pub trait LedgerEngineLike {
    fn apply(&mut self, event: &IdentifiedEvent) -> anyhow::Result<ApplyOutcome>;

    fn get_state(&self) -> anyhow::Result<Value>;
}
