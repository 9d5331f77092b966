//! Fixed-point scale conversions.
//!
//! Three independent integer scales:
//!
//! - `money_scale`: 1 unit of base currency = `money_scale` cash ints
//! - `price_scale`: 1 currency unit of price = `price_scale` price ints
//! - `qty_scale`: 1 unit of quantity = `qty_scale` qty ints
//!
//! A product `price_int × qty_int` carries `price_scale × qty_scale`; it is
//! brought to cash units by
//!
//! ```text
//! to_money(x) = trunc0(x × money_scale / (price_scale × qty_scale))
//! ```
//!
//! All intermediates are `i128`. Rust integer division truncates toward zero,
//! which is the rounding rule for every monetary conversion here.

use crate::error::LedgerError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Scales {
    money: i64,
    price: i64,
    qty: i64,
}

impl Scales {
    /// All three scales must be strictly positive.
    pub fn new(money: i64, price: i64, qty: i64) -> Result<Self, LedgerError> {
        for (scale, value) in [("money_scale", money), ("price_scale", price), ("qty_scale", qty)] {
            if value <= 0 {
                return Err(LedgerError::DivisionByZero { scale, value });
            }
        }
        Ok(Self { money, price, qty })
    }

    pub fn money(&self) -> i64 {
        self.money
    }

    pub fn price(&self) -> i64 {
        self.price
    }

    pub fn qty(&self) -> i64 {
        self.qty
    }

    /// Convert a `price_int × qty_int` product to cash ints.
    pub fn to_money(&self, x: i128) -> Result<i64, LedgerError> {
        let num = x
            .checked_mul(self.money as i128)
            .ok_or(LedgerError::Overflow { op: "money scaling" })?;
        let den = (self.price as i128) * (self.qty as i128);
        narrow(div_trunc(num, den)?, "money scaling")
    }
}

/// `price_int × qty_int` widened to `i128` (cannot overflow).
pub(crate) fn mul_wide(a: i64, b: i64) -> i128 {
    (a as i128) * (b as i128)
}

/// `(a − b) × q` in `i128`, so the price difference cannot overflow.
pub(crate) fn mul_diff(a: i64, b: i64, q: i64) -> i128 {
    ((a as i128) - (b as i128)) * (q as i128)
}

/// Division truncating toward zero.
pub(crate) fn div_trunc(num: i128, den: i128) -> Result<i128, LedgerError> {
    if den == 0 {
        return Err(LedgerError::DivisionByZero {
            scale: "divisor",
            value: 0,
        });
    }
    num.checked_div(den)
        .ok_or(LedgerError::Overflow { op: "division" })
}

pub(crate) fn narrow(x: i128, op: &'static str) -> Result<i64, LedgerError> {
    i64::try_from(x).map_err(|_| LedgerError::Overflow { op })
}
