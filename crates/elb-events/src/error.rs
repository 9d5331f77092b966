use std::fmt;

use elb_canon::CanonError;

/// Errors raised while turning raw events into the canonical event log.
///
/// `index` is the position of the offending event in the caller's input array
/// when known (single-event normalization leaves it `None`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    /// Missing `event_type`, missing logical time, or a field of the wrong shape.
    Schema {
        index: Option<usize>,
        reason: String,
    },
    /// A float was found; `path` is a JSON-path locator inside the raw event.
    FloatForbidden { index: Option<usize>, path: String },
    /// A caller-supplied `seq` disagrees with the derived one.
    SeqMismatch {
        index: usize,
        supplied: u64,
        derived: u64,
    },
    /// Canonical encoding failed for a reason other than a float.
    Canon(String),
}

impl EventError {
    pub(crate) fn schema(reason: impl Into<String>) -> Self {
        EventError::Schema {
            index: None,
            reason: reason.into(),
        }
    }

    /// Attach the input index to an error raised for a single event.
    pub fn at_index(self, i: usize) -> Self {
        match self {
            EventError::Schema { reason, .. } => EventError::Schema {
                index: Some(i),
                reason,
            },
            EventError::FloatForbidden { path, .. } => EventError::FloatForbidden {
                index: Some(i),
                path,
            },
            other => other,
        }
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, EventError::Schema { .. })
    }

    pub fn is_float_forbidden(&self) -> bool {
        matches!(self, EventError::FloatForbidden { .. })
    }
}

impl From<CanonError> for EventError {
    fn from(e: CanonError) -> Self {
        match e {
            CanonError::FloatForbidden { path } => EventError::FloatForbidden { index: None, path },
            CanonError::Serialize(msg) => EventError::Canon(msg),
        }
    }
}

fn fmt_index(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" (input index {i})"),
        None => String::new(),
    }
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventError::Schema { index, reason } => {
                write!(f, "event schema error{}: {reason}", fmt_index(index))
            }
            EventError::FloatForbidden { index, path } => write!(
                f,
                "float values are forbidden in events{}: found at {path}",
                fmt_index(index)
            ),
            EventError::SeqMismatch {
                index,
                supplied,
                derived,
            } => write!(
                f,
                "seq mismatch at input index {index}: caller supplied {supplied}, bridge derived {derived}"
            ),
            EventError::Canon(msg) => write!(f, "event canonicalization failed: {msg}"),
        }
    }
}

impl std::error::Error for EventError {}
