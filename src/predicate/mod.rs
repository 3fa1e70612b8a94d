//! Predicates over guarded-method arguments
//!
//! A parameter predicate receives one argument [`Value`] together with the
//! receiver the guarded method was called on, and returns a [`Verdict`].
//! Any `Fn(&Value, &R) -> O` closure is a predicate as long as `O`
//! implements [`IntoVerdict`], so plain `bool` closures work out of the box.
//!
//! Only an exact `true` passes. A predicate that returns a non-boolean
//! [`Value`], returns `Err(..)`, or panics is a failed check.
//!
//! A caught panic is still printed by the process panic hook. Return
//! `Err(..)` instead of panicking to keep rejections silent.
//!
//! # Example
//!
//! ```rust
//! use argguard::predicate::*;
//! use argguard::Value;
//!
//! struct Account {
//!     limit: f64,
//! }
//!
//! let within_limit = |v: &Value, acct: &Account| v.as_f64().is_some_and(|n| n <= acct.limit);
//! let acct = Account { limit: 100.0 };
//!
//! assert_eq!(within_limit.check(&Value::from(50), &acct), Verdict::Pass);
//! assert_eq!(within_limit.check(&Value::from(150), &acct), Verdict::Fail);
//!
//! // Stock predicates ignore the receiver and compose like any other
//! let in_range = gt(0.0).and(le(10.0));
//! assert!(ParamPredicate::<Account>::check(&in_range, &Value::from(5), &acct).is_pass());
//! ```

mod collection;
mod combinators;
mod number;
mod string;

pub mod prelude;

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::value::Value;

pub use combinators::{rule, And, Labeled, Not, Or, PredicateExt, Rule};

pub use number::{between, ge, gt, le, lt, non_negative, positive, Between, Ge, Gt, Le, Lt};

pub use string::{eq_str, len_max, len_min, not_empty, EqStr, LenMax, LenMin, NotEmpty};

pub use collection::{any_value, has_min_len, sum_at_least, AnyValue, HasMinLen, SumAtLeast};

/// Outcome of evaluating a predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// The predicate returned exactly `true`.
    Pass,
    /// The predicate returned `false`.
    Fail,
    /// The predicate returned something other than a boolean.
    NotBoolean(Value),
    /// The predicate returned an error or panicked.
    Errored(String),
}

impl Verdict {
    /// Returns true only for [`Verdict::Pass`].
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

/// Conversion of a predicate's return value into a [`Verdict`].
pub trait IntoVerdict {
    /// Convert into a verdict.
    fn into_verdict(self) -> Verdict;
}

impl IntoVerdict for Verdict {
    fn into_verdict(self) -> Verdict {
        self
    }
}

impl From<bool> for Verdict {
    fn from(b: bool) -> Self {
        if b {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}

impl IntoVerdict for bool {
    #[inline]
    fn into_verdict(self) -> Verdict {
        self.into()
    }
}

impl IntoVerdict for Value {
    fn into_verdict(self) -> Verdict {
        match self {
            Value::Bool(b) => b.into_verdict(),
            other => Verdict::NotBoolean(other),
        }
    }
}

impl<O: IntoVerdict, E: fmt::Display> IntoVerdict for Result<O, E> {
    fn into_verdict(self) -> Verdict {
        match self {
            Ok(out) => out.into_verdict(),
            Err(e) => Verdict::Errored(e.to_string()),
        }
    }
}

/// A validation rule for a single argument of a method on `R`.
///
/// The receiver is always passed; predicates that only look at the value
/// ignore it.
pub trait ParamPredicate<R: ?Sized>: Send + Sync {
    /// Evaluate the rule against an argument and the call's receiver.
    fn check(&self, value: &Value, receiver: &R) -> Verdict;

    /// Human-readable description used in failure messages.
    fn describe(&self) -> Cow<'static, str> {
        Cow::Borrowed(std::any::type_name::<Self>())
    }
}

impl<R: ?Sized, F, O> ParamPredicate<R> for F
where
    F: Fn(&Value, &R) -> O + Send + Sync,
    O: IntoVerdict,
{
    #[inline]
    fn check(&self, value: &Value, receiver: &R) -> Verdict {
        self(value, receiver).into_verdict()
    }
}

/// Run a predicate, turning a panic inside it into [`Verdict::Errored`].
///
/// The panic hook is left alone, so the default hook still reports the
/// panic on stderr before it is caught here.
pub(crate) fn evaluate<F>(f: F) -> Verdict
where
    F: FnOnce() -> Verdict,
{
    catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| Verdict::Errored(panic_message(&*payload)))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panicked: {}", msg)
    } else {
        "panicked".to_string()
    }
}
