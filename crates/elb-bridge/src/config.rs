use elb_events::TypeRank;
use serde::{Deserialize, Serialize};

/// Bridge knobs. Hashed into the config fingerprint, so every field here
/// changes the run's output address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    #[serde(default)]
    pub emit_equity_curve: bool,
    /// Snapshot every N applied events; `None` or `<= 0` means every one.
    #[serde(default)]
    pub equity_snapshot_every_n_events: Option<i64>,
    /// Replaces the default table wholesale when given.
    #[serde(default)]
    pub type_rank: TypeRank,
}

impl BridgeConfig {
    /// Effective snapshot interval (always >= 1).
    pub fn snapshot_interval(&self) -> u64 {
        match self.equity_snapshot_every_n_events {
            Some(n) if n > 0 => n as u64,
            _ => 1,
        }
    }
}
