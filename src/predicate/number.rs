//! Number predicates
//!
//! These only pass for [`Value::Number`]; any other value is a failure.

use std::borrow::Cow;

use super::combinators::{composable, PredicateExt};
use super::{ParamPredicate, Verdict};
use crate::value::Value;

macro_rules! comparison {
    ($(#[$doc:meta])* $name:ident, $ctor:ident, $op:tt) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug)]
        pub struct $name(pub f64);

        impl<R: ?Sized> ParamPredicate<R> for $name {
            #[inline]
            fn check(&self, value: &Value, _: &R) -> Verdict {
                value.as_f64().is_some_and(|n| n $op self.0).into()
            }

            fn describe(&self) -> Cow<'static, str> {
                format!("value {} {}", stringify!($op), Value::Number(self.0)).into()
            }
        }

        #[doc = concat!("Create a [`", stringify!($name), "`] predicate.")]
        pub fn $ctor(threshold: f64) -> $name {
            $name(threshold)
        }
    };
}

comparison!(
    /// Predicate for a number greater than the threshold.
    Gt, gt, >
);
comparison!(
    /// Predicate for a number greater than or equal to the threshold.
    Ge, ge, >=
);
comparison!(
    /// Predicate for a number less than the threshold.
    Lt, lt, <
);
comparison!(
    /// Predicate for a number less than or equal to the threshold.
    Le, le, <=
);

/// Predicate for a number in an inclusive range.
#[derive(Clone, Copy, Debug)]
pub struct Between {
    min: f64,
    max: f64,
}

impl<R: ?Sized> ParamPredicate<R> for Between {
    #[inline]
    fn check(&self, value: &Value, _: &R) -> Verdict {
        value
            .as_f64()
            .is_some_and(|n| n >= self.min && n <= self.max)
            .into()
    }

    fn describe(&self) -> Cow<'static, str> {
        format!(
            "value between {} and {}",
            Value::Number(self.min),
            Value::Number(self.max)
        )
        .into()
    }
}

/// Create a predicate that checks if a number is between min and max (inclusive).
///
/// # Example
///
/// ```rust
/// use argguard::predicate::*;
/// use argguard::Value;
///
/// let p = between(0.0, 100.0);
/// assert!(ParamPredicate::<()>::check(&p, &Value::from(0), &()).is_pass());
/// assert!(ParamPredicate::<()>::check(&p, &Value::from(100), &()).is_pass());
/// assert!(!ParamPredicate::<()>::check(&p, &Value::from(101), &()).is_pass());
/// ```
pub fn between(min: f64, max: f64) -> Between {
    Between { min, max }
}

/// Create a predicate that checks if a number is positive (> 0).
pub fn positive() -> Gt {
    Gt(0.0)
}

/// Create a predicate that checks if a number is non-negative (>= 0).
pub fn non_negative() -> Ge {
    Ge(0.0)
}

composable!(Gt, Ge, Lt, Le, Between);
