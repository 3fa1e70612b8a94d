//! Array predicates, plus the accept-anything predicate

use std::borrow::Cow;

use super::combinators::{composable, PredicateExt};
use super::{ParamPredicate, Verdict};
use crate::value::Value;

/// Predicate that checks an array has at least a minimum number of elements.
#[derive(Clone, Copy, Debug)]
pub struct HasMinLen(pub usize);

impl<R: ?Sized> ParamPredicate<R> for HasMinLen {
    #[inline]
    fn check(&self, value: &Value, _: &R) -> Verdict {
        value
            .as_array()
            .is_some_and(|items| items.len() >= self.0)
            .into()
    }

    fn describe(&self) -> Cow<'static, str> {
        format!("array length >= {}", self.0).into()
    }
}

/// Create a predicate that checks an array has at least `min` elements.
///
/// # Example
///
/// ```rust
/// use argguard::predicate::*;
/// use argguard::Value;
///
/// let p = has_min_len(3);
/// assert!(ParamPredicate::<()>::check(&p, &Value::from(vec![3, 4, 5]), &()).is_pass());
/// assert!(!ParamPredicate::<()>::check(&p, &Value::from(vec![4, 5]), &()).is_pass());
/// ```
pub fn has_min_len(min: usize) -> HasMinLen {
    HasMinLen(min)
}

/// Predicate that checks the numbers in an array sum to at least a threshold.
///
/// Fails for an empty array or if any element is not a number.
#[derive(Clone, Copy, Debug)]
pub struct SumAtLeast(pub f64);

impl<R: ?Sized> ParamPredicate<R> for SumAtLeast {
    fn check(&self, value: &Value, _: &R) -> Verdict {
        let Some(items) = value.as_array().filter(|items| !items.is_empty()) else {
            return Verdict::Fail;
        };
        items
            .iter()
            .map(Value::as_f64)
            .sum::<Option<f64>>()
            .is_some_and(|total| total >= self.0)
            .into()
    }

    fn describe(&self) -> Cow<'static, str> {
        format!("array sum >= {}", Value::Number(self.0)).into()
    }
}

/// Create a predicate that checks an array of numbers sums to at least `min`.
pub fn sum_at_least(min: f64) -> SumAtLeast {
    SumAtLeast(min)
}

/// Predicate that accepts every value.
///
/// Useful for registering a type-only check on a position.
#[derive(Clone, Copy, Default, Debug)]
pub struct AnyValue;

impl<R: ?Sized> ParamPredicate<R> for AnyValue {
    #[inline]
    fn check(&self, _: &Value, _: &R) -> Verdict {
        Verdict::Pass
    }

    fn describe(&self) -> Cow<'static, str> {
        Cow::Borrowed("any value")
    }
}

/// Create a predicate that accepts every value.
pub fn any_value() -> AnyValue {
    AnyValue
}

composable!(HasMinLen, SumAtLeast, AnyValue);
