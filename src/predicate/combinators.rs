//! Logical combinators for parameter predicates
//!
//! Combinators work for any receiver type: `And<P1, P2>` is a
//! `ParamPredicate<R>` whenever both halves are.

use std::borrow::Cow;

use super::{ParamPredicate, Verdict};
use crate::value::Value;

/// Method chaining for combining predicates.
///
/// Implemented for the stock predicates, the combinators themselves and
/// closures wrapped with [`rule`].
///
/// # Example
///
/// ```rust
/// use argguard::predicate::*;
/// use argguard::Value;
///
/// let p = gt(0.0).and(lt(100.0)).not();
/// assert!(ParamPredicate::<()>::check(&p, &Value::from(-5), &()).is_pass());
/// assert!(!ParamPredicate::<()>::check(&p, &Value::from(50), &()).is_pass());
/// ```
pub trait PredicateExt: Sized {
    /// Both predicates must pass. The right side is skipped if the left fails.
    fn and<P>(self, other: P) -> And<Self, P> {
        And(self, other)
    }

    /// Either predicate must pass. The right side is skipped if the left passes.
    fn or<P>(self, other: P) -> Or<Self, P> {
        Or(self, other)
    }

    /// Invert a boolean verdict.
    ///
    /// Non-boolean and errored verdicts stay failures.
    fn not(self) -> Not<Self> {
        Not(self)
    }

    /// Replace the description shown in failure messages.
    ///
    /// # Example
    ///
    /// ```rust
    /// use argguard::predicate::*;
    ///
    /// let p = gt(0.0).labeled("must be positive");
    /// assert_eq!(ParamPredicate::<()>::describe(&p), "must be positive");
    /// ```
    fn labeled(self, label: impl Into<Cow<'static, str>>) -> Labeled<Self> {
        Labeled {
            inner: self,
            label: label.into(),
        }
    }
}

/// AND combinator - both predicates must pass.
#[derive(Clone, Copy, Debug)]
pub struct And<P1, P2>(pub P1, pub P2);

impl<R: ?Sized, P1: ParamPredicate<R>, P2: ParamPredicate<R>> ParamPredicate<R> for And<P1, P2> {
    fn check(&self, value: &Value, receiver: &R) -> Verdict {
        match self.0.check(value, receiver) {
            Verdict::Pass => self.1.check(value, receiver),
            other => other,
        }
    }

    fn describe(&self) -> Cow<'static, str> {
        format!("({} && {})", self.0.describe(), self.1.describe()).into()
    }
}

/// OR combinator - either predicate must pass.
#[derive(Clone, Copy, Debug)]
pub struct Or<P1, P2>(pub P1, pub P2);

impl<R: ?Sized, P1: ParamPredicate<R>, P2: ParamPredicate<R>> ParamPredicate<R> for Or<P1, P2> {
    fn check(&self, value: &Value, receiver: &R) -> Verdict {
        match self.0.check(value, receiver) {
            Verdict::Pass => Verdict::Pass,
            errored @ Verdict::Errored(_) => errored,
            Verdict::Fail | Verdict::NotBoolean(_) => self.1.check(value, receiver),
        }
    }

    fn describe(&self) -> Cow<'static, str> {
        format!("({} || {})", self.0.describe(), self.1.describe()).into()
    }
}

/// NOT combinator - inverts a boolean verdict.
#[derive(Clone, Copy, Debug)]
pub struct Not<P>(pub P);

impl<R: ?Sized, P: ParamPredicate<R>> ParamPredicate<R> for Not<P> {
    fn check(&self, value: &Value, receiver: &R) -> Verdict {
        match self.0.check(value, receiver) {
            Verdict::Pass => Verdict::Fail,
            Verdict::Fail => Verdict::Pass,
            other => other,
        }
    }

    fn describe(&self) -> Cow<'static, str> {
        format!("!{}", self.0.describe()).into()
    }
}

/// A predicate with a custom description.
#[derive(Clone, Debug)]
pub struct Labeled<P> {
    inner: P,
    label: Cow<'static, str>,
}

impl<R: ?Sized, P: ParamPredicate<R>> ParamPredicate<R> for Labeled<P> {
    #[inline]
    fn check(&self, value: &Value, receiver: &R) -> Verdict {
        self.inner.check(value, receiver)
    }

    fn describe(&self) -> Cow<'static, str> {
        self.label.clone()
    }
}

/// A closure lifted into a composable predicate.
#[derive(Clone, Copy, Debug)]
pub struct Rule<F>(pub F);

impl<R: ?Sized, F> ParamPredicate<R> for Rule<F>
where
    F: ParamPredicate<R>,
{
    #[inline]
    fn check(&self, value: &Value, receiver: &R) -> Verdict {
        self.0.check(value, receiver)
    }

    fn describe(&self) -> Cow<'static, str> {
        self.0.describe()
    }
}

/// Lift a closure so it can be chained with [`PredicateExt`].
///
/// # Example
///
/// ```rust
/// use argguard::predicate::*;
/// use argguard::Value;
///
/// struct Account {
///     balance: f64,
/// }
///
/// let affordable = rule(|v: &Value, a: &Account| v.as_f64().is_some_and(|n| n <= a.balance))
///     .and(positive());
///
/// let acct = Account { balance: 20.0 };
/// assert!(affordable.check(&Value::from(10), &acct).is_pass());
/// assert!(!affordable.check(&Value::from(30), &acct).is_pass());
/// assert!(!affordable.check(&Value::from(-1), &acct).is_pass());
/// ```
pub fn rule<F>(f: F) -> Rule<F> {
    Rule(f)
}

macro_rules! composable {
    ($($ty:ident $(<$($g:ident),+>)?),* $(,)?) => {
        $(impl$(<$($g),+>)? PredicateExt for $ty$(<$($g),+>)? {})*
    };
}

composable!(And<P1, P2>, Or<P1, P2>, Not<P>, Labeled<P>, Rule<F>);

pub(super) use composable;
