use std::fmt;

/// Everything the ledger engine can refuse.
///
/// The engine state is **not** mutated when an event fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A `Fill` whose `side` is not `BUY` or `SELL`.
    UnsupportedFillSide { side: String },
    /// A non-positive scale (would divide by zero or flip signs).
    DivisionByZero { scale: &'static str, value: i64 },
    /// A required payload field is absent.
    MissingField {
        event_type: String,
        field: &'static str,
    },
    /// A payload field is present but malformed (non-integer, negative qty, ...).
    InvalidField { field: &'static str, reason: String },
    /// Intermediate or final value does not fit the integer range.
    Overflow { op: &'static str },
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFillSide { side } => {
                write!(f, "unsupported fill side {side:?} (expected BUY or SELL)")
            }
            Self::DivisionByZero { scale, value } => {
                write!(f, "{scale} must be > 0, got {value}")
            }
            Self::MissingField { event_type, field } => {
                write!(f, "{event_type} payload is missing field '{field}'")
            }
            Self::InvalidField { field, reason } => {
                write!(f, "payload field '{field}' is invalid: {reason}")
            }
            Self::Overflow { op } => write!(f, "integer overflow in {op}"),
        }
    }
}

impl std::error::Error for LedgerError {}
