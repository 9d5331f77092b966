//! Reference ledger engine.
//!
//! # Rules
//!
//! - `Price {symbol, price_int}`: record the mark.
//! - `Fee {fee_int}`: `cash -= fee`, `fees_paid += fee`.
//! - `Fill {side, symbol, qty_int, price_int}` with
//!   `notional = to_money(price × qty)`:
//!   - BUY: `cash -= notional`; `qty' = qty0 + qty`;
//!     `avg' = trunc0((avg0 × qty0 + price × qty) / qty')` (0 when flat)
//!   - SELL: `cash += notional`; when long, realize
//!     `to_money((price − avg0) × min(qty0, qty))`; `qty' = qty0 − qty`;
//!     `avg'` keeps `avg0` while the position keeps its sign, resets to 0 when
//!     flat, resets to `price` when the sign flips
//!   - fees only ever arrive as `Fee` events; other Fill payload keys are ignored
//! - every other kind: recorded, state untouched.
//!
//! After each mutating event `unrealized_pnl_int` and `equity_int` are
//! recomputed over all positions, marking each at its last price or, with no
//! price seen yet, at its average price.
//!
//! Short cost basis is not modelled beyond the sign-flip reset above; a BUY
//! against a short uses the same weighted-average formula and realizes nothing.
//!
//! An event either applies completely or leaves the state untouched: the
//! engine mutates a working copy and swaps it in only on success.

use elb_events::{EventKind, IdentifiedEvent};
use serde_json::Value;

use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::fields::{req_int, req_side, req_symbol};
use crate::fixedpoint::{div_trunc, mul_diff, mul_wide, narrow, Scales};
use crate::port::{ApplyOutcome, LedgerEngineLike};
use crate::state::{LedgerState, Position};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FillSide {
    Buy,
    Sell,
}

impl FillSide {
    fn parse(s: &str) -> Result<Self, LedgerError> {
        match s {
            "BUY" => Ok(FillSide::Buy),
            "SELL" => Ok(FillSide::Sell),
            other => Err(LedgerError::UnsupportedFillSide {
                side: other.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug)]
pub struct LedgerEngine {
    scales: Scales,
    state: LedgerState,
}

impl LedgerEngine {
    /// Build a fresh engine. Fails with `DivisionByZero` on a non-positive scale.
    pub fn new(cfg: &LedgerConfig) -> Result<Self, LedgerError> {
        let scales = cfg.scales()?;
        let state = LedgerState {
            base_ccy: cfg.base_ccy.clone(),
            money_scale: scales.money(),
            price_scale: scales.price(),
            qty_scale: scales.qty(),
            cash_int: cfg.initial_cash_int,
            positions: Default::default(),
            last_price_by_symbol: Default::default(),
            realized_pnl_int: 0,
            unrealized_pnl_int: 0,
            fees_paid_int: 0,
            equity_int: cfg.initial_cash_int,
        };
        Ok(Self { scales, state })
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Apply one event. Returns whether the ledger state was mutated.
    pub fn apply_event(&mut self, ev: &IdentifiedEvent) -> Result<bool, LedgerError> {
        let mut next = match &ev.kind {
            EventKind::Price => self.with_price(ev)?,
            EventKind::Fee => self.with_fee(ev)?,
            EventKind::Fill => self.with_fill(ev)?,
            EventKind::OrderIntent
            | EventKind::Order
            | EventKind::Cancel
            | EventKind::Reject
            | EventKind::Adjustment
            | EventKind::SnapshotMarker
            | EventKind::Other(_) => return Ok(false),
        };
        self.recompute(&mut next)?;
        self.state = next;
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Per-kind transitions (all operate on a working copy)
    // -----------------------------------------------------------------------

    fn with_price(&self, ev: &IdentifiedEvent) -> Result<LedgerState, LedgerError> {
        let symbol = req_symbol(&ev.payload, ev.event_type())?;
        let price = req_int(&ev.payload, ev.event_type(), "price_int")?;

        let mut next = self.state.clone();
        next.last_price_by_symbol.insert(symbol, price);
        Ok(next)
    }

    fn with_fee(&self, ev: &IdentifiedEvent) -> Result<LedgerState, LedgerError> {
        let fee = req_int(&ev.payload, ev.event_type(), "fee_int")?;

        let mut next = self.state.clone();
        charge_fee(&mut next, fee)?;
        Ok(next)
    }

    fn with_fill(&self, ev: &IdentifiedEvent) -> Result<LedgerState, LedgerError> {
        let payload = &ev.payload;
        let side = FillSide::parse(&req_side(payload, ev.event_type())?)?;
        let symbol = req_symbol(payload, ev.event_type())?;
        let qty = req_int(payload, ev.event_type(), "qty_int")?;
        let price = req_int(payload, ev.event_type(), "price_int")?;
        if qty < 0 {
            return Err(LedgerError::InvalidField {
                field: "qty_int",
                reason: format!("must be >= 0, got {qty}"),
            });
        }

        let notional = self.scales.to_money(mul_wide(price, qty))?;
        let old = self.state.positions.get(&symbol).cloned().unwrap_or_default();

        let mut next = self.state.clone();
        let position = match side {
            FillSide::Buy => {
                next.cash_int = next
                    .cash_int
                    .checked_sub(notional)
                    .ok_or(LedgerError::Overflow { op: "cash debit" })?;
                buy_position(&old, qty, price)?
            }
            FillSide::Sell => {
                next.cash_int = next
                    .cash_int
                    .checked_add(notional)
                    .ok_or(LedgerError::Overflow { op: "cash credit" })?;
                let closed = if old.qty_int > 0 { old.qty_int.min(qty) } else { 0 };
                let realized = self
                    .scales
                    .to_money(mul_diff(price, old.avg_price_int, closed))?;
                next.realized_pnl_int = next
                    .realized_pnl_int
                    .checked_add(realized)
                    .ok_or(LedgerError::Overflow { op: "realized pnl" })?;
                sell_position(&old, qty, price)?
            }
        };
        next.positions.insert(symbol, position);
        Ok(next)
    }

    // -----------------------------------------------------------------------
    // Derived fields
    // -----------------------------------------------------------------------

    fn recompute(&self, st: &mut LedgerState) -> Result<(), LedgerError> {
        let mut unrealized: i64 = 0;
        let mut market_value: i64 = 0;

        // deterministic iteration (BTreeMap)
        for (sym, pos) in &st.positions {
            let mark = st
                .last_price_by_symbol
                .get(sym)
                .copied()
                .unwrap_or(pos.avg_price_int);
            let pnl = self
                .scales
                .to_money(mul_diff(mark, pos.avg_price_int, pos.qty_int))?;
            let value = self.scales.to_money(mul_wide(mark, pos.qty_int))?;
            unrealized = unrealized
                .checked_add(pnl)
                .ok_or(LedgerError::Overflow { op: "unrealized pnl" })?;
            market_value = market_value
                .checked_add(value)
                .ok_or(LedgerError::Overflow { op: "market value" })?;
        }

        st.unrealized_pnl_int = unrealized;
        st.equity_int = st
            .cash_int
            .checked_add(market_value)
            .ok_or(LedgerError::Overflow { op: "equity" })?;
        Ok(())
    }
}

fn charge_fee(st: &mut LedgerState, fee: i64) -> Result<(), LedgerError> {
    st.cash_int = st
        .cash_int
        .checked_sub(fee)
        .ok_or(LedgerError::Overflow { op: "fee debit" })?;
    st.fees_paid_int = st
        .fees_paid_int
        .checked_add(fee)
        .ok_or(LedgerError::Overflow { op: "fees paid" })?;
    Ok(())
}

fn buy_position(old: &Position, qty: i64, price: i64) -> Result<Position, LedgerError> {
    let new_qty = old
        .qty_int
        .checked_add(qty)
        .ok_or(LedgerError::Overflow { op: "position qty" })?;
    if new_qty == 0 {
        return Ok(Position::default());
    }
    let cost = mul_wide(old.avg_price_int, old.qty_int) + mul_wide(price, qty);
    let avg = narrow(div_trunc(cost, new_qty as i128)?, "average price")?;
    Ok(Position {
        qty_int: new_qty,
        avg_price_int: avg,
    })
}

fn sell_position(old: &Position, qty: i64, price: i64) -> Result<Position, LedgerError> {
    let new_qty = old
        .qty_int
        .checked_sub(qty)
        .ok_or(LedgerError::Overflow { op: "position qty" })?;
    let avg = if new_qty == 0 {
        0
    } else if old.qty_int != 0 && old.qty_int.signum() == new_qty.signum() {
        old.avg_price_int
    } else {
        price
    };
    Ok(Position {
        qty_int: new_qty,
        avg_price_int: avg,
    })
}

impl LedgerEngineLike for LedgerEngine {
    fn apply(&mut self, event: &IdentifiedEvent) -> anyhow::Result<ApplyOutcome> {
        Ok(if self.apply_event(event)? {
            ApplyOutcome::APPLIED
        } else {
            ApplyOutcome::RECORDED
        })
    }

    fn get_state(&self) -> anyhow::Result<Value> {
        Ok(serde_json::to_value(&self.state)?)
    }
}
