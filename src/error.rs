//! Validation failure type
//!
//! A guarded method that rejects its arguments returns a
//! [`ValidationFailure`] describing the first check that failed: which
//! method, which argument position (or the call-level check), the offending
//! value(s), and why the check rejected them.
//!
//! # Example
//!
//! ```rust
//! use argguard::{FailureReason, FailureSite, Slot, ValidationFailure, Value};
//!
//! struct Calculator;
//!
//! let err = ValidationFailure::new(
//!     Slot::<Calculator>::of("add").id(),
//!     FailureSite::Parameter(0),
//!     vec![Value::from(0)],
//!     FailureReason::Rejected { predicate: "value > 0".into() },
//! );
//!
//! assert_eq!(err.position(), Some(0));
//! assert!(err.to_string().contains("argument 0"));
//! assert!(err.to_string().contains("value > 0"));
//! ```

use std::borrow::Cow;
use std::fmt;

use crate::slot::SlotId;
use crate::value::{PrimitiveType, Value};

/// Which check produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FailureSite {
    /// The call-level predicate over the argument list.
    CallArgs,
    /// The call-level predicate over the receiver and argument list.
    CallContext,
    /// The validator registered at this argument position.
    Parameter(usize),
}

impl FailureSite {
    /// Returns true for either call-level check.
    pub fn is_call_level(&self) -> bool {
        matches!(self, FailureSite::CallArgs | FailureSite::CallContext)
    }
}

impl fmt::Display for FailureSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureSite::CallArgs => write!(f, "call-level argument check"),
            FailureSite::CallContext => write!(f, "call-level context check"),
            FailureSite::Parameter(position) => write!(f, "argument {}", position),
        }
    }
}

/// Why a check rejected the call.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FailureReason {
    /// The predicate returned `false`.
    Rejected {
        /// Description of the predicate.
        predicate: Cow<'static, str>,
    },
    /// The predicate returned a value other than a boolean.
    NotBoolean {
        /// Description of the predicate.
        predicate: Cow<'static, str>,
        /// What it returned instead.
        returned: Value,
    },
    /// The predicate returned an error or panicked.
    Errored {
        /// Description of the predicate.
        predicate: Cow<'static, str>,
        /// The error message.
        message: String,
    },
    /// The argument's runtime type did not match the declared type.
    TypeMismatch {
        /// The declared type.
        expected: PrimitiveType,
        /// The argument's actual type.
        found: PrimitiveType,
    },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Rejected { predicate } => {
                write!(f, "rejected by validator '{}'", predicate)
            }
            FailureReason::NotBoolean {
                predicate,
                returned,
            } => write!(
                f,
                "validator '{}' returned non-boolean {}",
                predicate, returned
            ),
            FailureReason::Errored { predicate, message } => {
                write!(f, "validator '{}' failed: {}", predicate, message)
            }
            FailureReason::TypeMismatch { expected, found } => {
                write!(f, "expected type '{}', found '{}'", expected, found)
            }
        }
    }
}

/// Error returned when a guarded method's arguments fail validation.
///
/// The method body never runs when this is returned.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ValidationFailure {
    slot: SlotId,
    site: FailureSite,
    values: Vec<Value>,
    reason: FailureReason,
}

impl ValidationFailure {
    /// Create a validation failure.
    pub fn new(slot: SlotId, site: FailureSite, values: Vec<Value>, reason: FailureReason) -> Self {
        ValidationFailure {
            slot,
            site,
            values,
            reason,
        }
    }

    /// The method whose call was rejected.
    pub fn slot(&self) -> SlotId {
        self.slot
    }

    /// The check that failed.
    pub fn site(&self) -> FailureSite {
        self.site
    }

    /// The argument position, or `None` for a call-level failure.
    pub fn position(&self) -> Option<usize> {
        match self.site {
            FailureSite::Parameter(position) => Some(position),
            FailureSite::CallArgs | FailureSite::CallContext => None,
        }
    }

    /// The offending values: the single argument for a parameter failure,
    /// the whole argument list for a call-level failure.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Why the check rejected the call.
    pub fn reason(&self) -> &FailureReason {
        &self.reason
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "validation failed for {} at {}: {}",
            self.slot, self.site, self.reason
        )?;

        match self.values.as_slice() {
            [value] if !self.site.is_call_level() => write!(f, " (value: {})", value),
            values => {
                write!(f, " (arguments: [")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "])")
            }
        }
    }
}

impl std::error::Error for ValidationFailure {}
