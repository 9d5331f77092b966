//! elb-ledger
//!
//! Fixed-point accounting ledger driven by canonical events.
//!
//! - Single writer: one [`LedgerEngine`] owns one [`LedgerState`] per run
//! - Integer arithmetic only; every monetary division truncates toward zero
//! - Closed dispatch over [`EventKind`](elb_events::EventKind): `Price`, `Fill`
//!   and `Fee` mutate state, every other kind is recorded as not applied
//! - [`LedgerEngineLike`] is the port the bridge drives; [`LedgerEngine`] is
//!   the reference implementation
//!
//! Pure deterministic logic (no IO, no time, no randomness).

mod config;
mod engine;
mod error;
mod fields;
mod fixedpoint;
mod port;
mod state;

pub use config::LedgerConfig;
pub use engine::LedgerEngine;
pub use error::LedgerError;
pub use fixedpoint::Scales;
pub use port::{ApplyOutcome, LedgerEngineLike};
pub use state::{LedgerState, Position};
