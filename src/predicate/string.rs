//! String predicates
//!
//! These only pass for [`Value::String`]. Lengths are counted in chars.

use std::borrow::Cow;

use super::combinators::{composable, PredicateExt};
use super::{ParamPredicate, Verdict};
use crate::value::Value;

/// Predicate that checks a string equals an expected string exactly.
#[derive(Clone, Debug)]
pub struct EqStr(pub String);

impl<R: ?Sized> ParamPredicate<R> for EqStr {
    #[inline]
    fn check(&self, value: &Value, _: &R) -> Verdict {
        (value.as_str() == Some(self.0.as_str())).into()
    }

    fn describe(&self) -> Cow<'static, str> {
        format!("value == {:?}", self.0).into()
    }
}

/// Create a predicate that checks a string equals `expected` (case-sensitive).
///
/// # Example
///
/// ```rust
/// use argguard::predicate::*;
/// use argguard::Value;
///
/// let says_hi = eq_str("Hi");
/// assert!(ParamPredicate::<()>::check(&says_hi, &Value::from("Hi"), &()).is_pass());
/// assert!(!ParamPredicate::<()>::check(&says_hi, &Value::from("hi"), &()).is_pass());
/// ```
pub fn eq_str(expected: impl Into<String>) -> EqStr {
    EqStr(expected.into())
}

/// Predicate that checks if a string is not empty.
#[derive(Clone, Copy, Default, Debug)]
pub struct NotEmpty;

impl<R: ?Sized> ParamPredicate<R> for NotEmpty {
    #[inline]
    fn check(&self, value: &Value, _: &R) -> Verdict {
        value.as_str().is_some_and(|s| !s.is_empty()).into()
    }

    fn describe(&self) -> Cow<'static, str> {
        Cow::Borrowed("non-empty string")
    }
}

/// Create a predicate that checks if a string is not empty.
pub fn not_empty() -> NotEmpty {
    NotEmpty
}

/// Predicate that checks string length is at least a minimum.
#[derive(Clone, Copy, Debug)]
pub struct LenMin(pub usize);

impl<R: ?Sized> ParamPredicate<R> for LenMin {
    #[inline]
    fn check(&self, value: &Value, _: &R) -> Verdict {
        value
            .as_str()
            .is_some_and(|s| s.chars().count() >= self.0)
            .into()
    }

    fn describe(&self) -> Cow<'static, str> {
        format!("string length >= {}", self.0).into()
    }
}

/// Create a predicate that checks if string length is at least `min`.
pub fn len_min(min: usize) -> LenMin {
    LenMin(min)
}

/// Predicate that checks string length is at most a maximum.
#[derive(Clone, Copy, Debug)]
pub struct LenMax(pub usize);

impl<R: ?Sized> ParamPredicate<R> for LenMax {
    #[inline]
    fn check(&self, value: &Value, _: &R) -> Verdict {
        value
            .as_str()
            .is_some_and(|s| s.chars().count() <= self.0)
            .into()
    }

    fn describe(&self) -> Cow<'static, str> {
        format!("string length <= {}", self.0).into()
    }
}

/// Create a predicate that checks if string length is at most `max`.
pub fn len_max(max: usize) -> LenMax {
    LenMax(max)
}

composable!(EqStr, NotEmpty, LenMin, LenMax);
