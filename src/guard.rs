//! Invocation guard
//!
//! [`guard`] wraps a method so that every call is validated before the
//! method body runs:
//!
//! 1. the call-level argument check, if any,
//! 2. the call-level receiver-aware check, if any,
//! 3. every registered parameter validator in ascending position order,
//!    each followed by its primitive-type check when one is declared.
//!
//! The first failing check ends the call with a [`ValidationFailure`] and
//! the method body never runs. When every check passes the method receives
//! the receiver and the original arguments, untouched, and its result is
//! returned as is.
//!
//! # Example
//!
//! ```rust
//! use argguard::{guard, Registry, Slot, Value};
//!
//! struct Test;
//!
//! let slot = Slot::<Test>::of("test_two_numbers");
//! let mut registry = Registry::new();
//! registry
//!     .method(slot)
//!     .is(0, |v: &Value, _: &Test| v.as_f64().is_some_and(|n| n > 0.0))
//!     .is(1, |v: &Value, _: &Test| v.as_f64().is_some_and(|n| n >= 5.0));
//!
//! let add = guard(&registry, slot, None, |_: &Test, args: &[Value]| {
//!     args[0].as_f64().unwrap_or_default() + args[1].as_f64().unwrap_or_default()
//! });
//!
//! assert_eq!(add.call(&Test, &[5.into(), 5.into()]), Ok(10.0));
//!
//! let err = add.call(&Test, &[0.into(), 10.into()]).unwrap_err();
//! assert_eq!(err.position(), Some(0));
//! assert_eq!(err.values(), &[Value::from(0)]);
//! ```

use std::borrow::Cow;
use std::fmt;
use std::ops::ControlFlow;

use crate::call::CallValidator;
use crate::error::{FailureReason, FailureSite, ValidationFailure};
use crate::predicate::{evaluate, Verdict};
use crate::registry::{ParameterRecord, Registry};
use crate::slot::{Slot, SlotId};
use crate::value::{arg_at, Value};

/// The complete set of checks for one method.
///
/// Holds a snapshot of the slot's parameter records taken when it was
/// built, plus the optional call-level validator. Carries no per-call state.
pub struct MethodValidator<R: ?Sized> {
    slot: SlotId,
    call: Option<CallValidator<R>>,
    params: Vec<ParameterRecord<R>>,
}

impl<R: ?Sized + 'static> MethodValidator<R> {
    /// Snapshot the registry's records for `slot`.
    pub fn new(registry: &Registry, slot: Slot<R>, call: Option<CallValidator<R>>) -> Self {
        MethodValidator {
            slot: slot.id(),
            call,
            params: registry.parameter_validators(slot),
        }
    }
}

impl<R: ?Sized> MethodValidator<R> {
    /// The method these checks belong to.
    pub fn slot(&self) -> SlotId {
        self.slot
    }

    /// The parameter records, in ascending position order.
    pub fn parameters(&self) -> &[ParameterRecord<R>] {
        &self.params
    }

    /// The call-level validator, if any.
    pub fn call_validator(&self) -> Option<&CallValidator<R>> {
        self.call.as_ref()
    }

    /// Run every check in order, stopping at the first failure.
    pub fn check(&self, receiver: &R, args: &[Value]) -> Result<(), ValidationFailure> {
        let mut first = None;
        let _ = self.visit(receiver, args, |failure| {
            first = Some(failure);
            ControlFlow::Break(())
        });
        let result = first.map_or(Ok(()), Err);

        #[cfg(feature = "tracing")]
        match &result {
            Ok(()) => tracing::trace!(slot = %self.slot, "arguments accepted"),
            Err(failure) => {
                tracing::debug!(slot = %self.slot, site = %failure.site(), "arguments rejected")
            }
        }

        result
    }

    /// Run every check and report all failures, in evaluation order.
    ///
    /// For diagnostics only; guarded calls always stop at the first failure.
    pub fn check_all(&self, receiver: &R, args: &[Value]) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();
        let _ = self.visit(receiver, args, |failure| {
            failures.push(failure);
            ControlFlow::Continue(())
        });
        failures
    }

    fn visit<V>(&self, receiver: &R, args: &[Value], mut on_failure: V) -> ControlFlow<()>
    where
        V: FnMut(ValidationFailure) -> ControlFlow<()>,
    {
        if let Some(call) = &self.call {
            if let Some((check, name)) = call.args_check() {
                if let Some(reason) = rejection(evaluate(|| check(args)), || name.clone()) {
                    on_failure(self.failure(FailureSite::CallArgs, args.to_vec(), reason))?;
                }
            }
            if let Some((check, name)) = call.context_check() {
                let verdict = evaluate(|| check(receiver, args));
                if let Some(reason) = rejection(verdict, || name.clone()) {
                    on_failure(self.failure(FailureSite::CallContext, args.to_vec(), reason))?;
                }
            }
        }

        for record in &self.params {
            let site = FailureSite::Parameter(record.position());
            let arg = arg_at(args, record.position());

            let verdict = evaluate(|| record.check(arg, receiver));
            if let Some(reason) = rejection(verdict, || record.description()) {
                on_failure(self.failure(site, vec![arg.clone()], reason))?;
            }

            if let Some(expected) = record.expected_type() {
                if !expected.matches(arg) {
                    let reason = FailureReason::TypeMismatch {
                        expected,
                        found: arg.primitive_type(),
                    };
                    on_failure(self.failure(site, vec![arg.clone()], reason))?;
                }
            }
        }

        ControlFlow::Continue(())
    }

    fn failure(
        &self,
        site: FailureSite,
        values: Vec<Value>,
        reason: FailureReason,
    ) -> ValidationFailure {
        ValidationFailure::new(self.slot, site, values, reason)
    }
}

fn rejection<D>(verdict: Verdict, describe: D) -> Option<FailureReason>
where
    D: FnOnce() -> Cow<'static, str>,
{
    match verdict {
        Verdict::Pass => None,
        Verdict::Fail => Some(FailureReason::Rejected {
            predicate: describe(),
        }),
        Verdict::NotBoolean(returned) => Some(FailureReason::NotBoolean {
            predicate: describe(),
            returned,
        }),
        Verdict::Errored(message) => Some(FailureReason::Errored {
            predicate: describe(),
            message,
        }),
    }
}

impl<R: ?Sized> Clone for MethodValidator<R> {
    fn clone(&self) -> Self {
        MethodValidator {
            slot: self.slot,
            call: self.call.clone(),
            params: self.params.clone(),
        }
    }
}

impl<R: ?Sized> fmt::Debug for MethodValidator<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodValidator")
            .field("slot", &self.slot)
            .field("call", &self.call)
            .field("params", &self.params)
            .finish()
    }
}

/// A method wrapped with its validation checks.
///
/// Created by [`guard`] and [`guard_mut`].
pub struct Guarded<R: ?Sized, F> {
    validator: MethodValidator<R>,
    method: F,
}

/// Wrap a method taking `&R` with the checks registered for `slot`.
///
/// The registry is read once, here. Validators registered afterwards do not
/// affect the returned method.
pub fn guard<R, F, T>(
    registry: &Registry,
    slot: Slot<R>,
    call: Option<CallValidator<R>>,
    method: F,
) -> Guarded<R, F>
where
    R: ?Sized + 'static,
    F: Fn(&R, &[Value]) -> T,
{
    Guarded {
        validator: MethodValidator::new(registry, slot, call),
        method,
    }
}

/// Wrap a method taking `&mut R` with the checks registered for `slot`.
///
/// Predicates still see the receiver by shared reference.
pub fn guard_mut<R, F, T>(
    registry: &Registry,
    slot: Slot<R>,
    call: Option<CallValidator<R>>,
    method: F,
) -> Guarded<R, F>
where
    R: ?Sized + 'static,
    F: Fn(&mut R, &[Value]) -> T,
{
    Guarded {
        validator: MethodValidator::new(registry, slot, call),
        method,
    }
}

impl<R: ?Sized, F> Guarded<R, F> {
    /// The checks run before each call.
    pub fn validator(&self) -> &MethodValidator<R> {
        &self.validator
    }
}

impl<R: ?Sized, F, T> Guarded<R, F>
where
    F: Fn(&R, &[Value]) -> T,
{
    /// Validate, then invoke the method.
    pub fn call(&self, receiver: &R, args: &[Value]) -> Result<T, ValidationFailure> {
        self.validator.check(receiver, args)?;
        Ok((self.method)(receiver, args))
    }
}

impl<R: ?Sized, F, U, E> Guarded<R, F>
where
    F: Fn(&R, &[Value]) -> Result<U, E>,
    E: From<ValidationFailure>,
{
    /// Validate, then invoke a fallible method, flattening the two errors.
    pub fn try_call(&self, receiver: &R, args: &[Value]) -> Result<U, E> {
        self.validator.check(receiver, args)?;
        (self.method)(receiver, args)
    }
}

impl<R: ?Sized, F, T> Guarded<R, F>
where
    F: Fn(&mut R, &[Value]) -> T,
{
    /// Validate, then invoke a method that mutates its receiver.
    pub fn call_mut(&self, receiver: &mut R, args: &[Value]) -> Result<T, ValidationFailure> {
        self.validator.check(receiver, args)?;
        Ok((self.method)(receiver, args))
    }
}

impl<R: ?Sized, F> fmt::Debug for Guarded<R, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guarded")
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::{gt, PredicateExt};
    use crate::value::PrimitiveType;
    use std::cell::Cell;

    struct Test {
        field_a: f64,
        calls: Cell<u32>,
    }

    impl Test {
        fn new() -> Self {
            Test {
                field_a: 5.0,
                calls: Cell::new(0),
            }
        }
    }

    fn num(v: &Value) -> f64 {
        v.as_f64().unwrap_or(f64::NAN)
    }

    fn sum(_: &Test, args: &[Value]) -> f64 {
        args.iter().map(num).sum()
    }

    fn counted_sum(t: &Test, args: &[Value]) -> f64 {
        t.calls.set(t.calls.get() + 1);
        sum(t, args)
    }

    #[test]
    fn test_no_checks_passes_through() {
        let registry = Registry::new();
        let g = guard(&registry, Slot::<Test>::of("sum"), None, sum);
        assert_eq!(g.call(&Test::new(), &[1.into(), 2.into()]), Ok(3.0));
        assert!(g.validator().parameters().is_empty());
    }

    #[test]
    fn test_first_parameter_failure_reported() {
        let slot = Slot::<Test>::of("two");
        let mut registry = Registry::new();
        registry
            .method(slot)
            .param(0, gt(0.0))
            .is(1, |v: &Value, _: &Test| num(v) >= 5.0);

        let test = Test::new();
        let g = guard(&registry, slot, None, counted_sum);

        let err = g.call(&test, &[0.into(), 0.into()]).unwrap_err();
        assert_eq!(err.site(), FailureSite::Parameter(0));
        assert_eq!(
            err.reason(),
            &FailureReason::Rejected {
                predicate: "value > 0".into()
            }
        );

        let err = g.call(&test, &[5.into(), 4.into()]).unwrap_err();
        assert_eq!(err.position(), Some(1));
        assert_eq!(err.values(), &[Value::from(4)]);
        assert_eq!(test.calls.get(), 0);
    }

    #[test]
    fn test_type_check_runs_after_predicate() {
        let slot = Slot::<Test>::of("one");
        let mut registry = Registry::new();
        registry.is_typed(slot, 0, |_: &Value, _: &Test| true, PrimitiveType::Number);

        let g = guard(&registry, slot, None, sum);
        let err = g.call(&Test::new(), &["4".into()]).unwrap_err();
        assert_eq!(
            err.reason(),
            &FailureReason::TypeMismatch {
                expected: PrimitiveType::Number,
                found: PrimitiveType::String,
            }
        );
        assert_eq!(g.call(&Test::new(), &[4.into()]), Ok(4.0));
    }

    #[test]
    fn test_missing_argument_is_undefined() {
        let slot = Slot::<Test>::of("optional");
        let mut registry = Registry::new();
        registry.is(slot, 1, |v: &Value, _: &Test| v.is_undefined() || num(v) > 0.0);

        let g = guard(&registry, slot, None, |_: &Test, args: &[Value]| args.len());
        assert_eq!(g.call(&Test::new(), &[1.into()]), Ok(1));
        assert_eq!(g.call(&Test::new(), &[1.into(), 2.into()]), Ok(2));
        assert!(g.call(&Test::new(), &[1.into(), (-2).into()]).is_err());
    }

    #[test]
    fn test_missing_typed_argument_fails_type_check() {
        let slot = Slot::<Test>::of("typed");
        let mut registry = Registry::new();
        registry.is_typed(slot, 0, |_: &Value, _: &Test| true, PrimitiveType::Number);

        let g = guard(&registry, slot, None, sum);
        let err = g.call(&Test::new(), &[]).unwrap_err();
        assert_eq!(err.values(), &[Value::Undefined]);
        assert!(matches!(
            err.reason(),
            FailureReason::TypeMismatch {
                found: PrimitiveType::Undefined,
                ..
            }
        ));
    }

    #[test]
    fn test_call_level_checks_run_first() {
        let slot = Slot::<Test>::of("ordered");
        let mut registry = Registry::new();
        registry.is(slot, 0, |v: &Value, _: &Test| num(v) > 0.0);

        let call = CallValidator::new()
            .args(|args: &[Value]| num(&args[1]) > num(&args[0]))
            .describe_args("second > first");
        let g = guard(&registry, slot, Some(call), sum);

        let err = g.call(&Test::new(), &[(-1).into(), (-5).into()]).unwrap_err();
        assert_eq!(err.site(), FailureSite::CallArgs);
        assert_eq!(err.values(), &[Value::from(-1), Value::from(-5)]);
        assert!(err.to_string().contains("second > first"));
    }

    #[test]
    fn test_args_check_precedes_context_check() {
        let slot = Slot::<Test>::of("both");
        let call = CallValidator::new()
            .args(|_: &[Value]| false)
            .context(|_: &Test, _: &[Value]| false);
        let g = guard(&Registry::new(), slot, Some(call), sum);

        let err = g.call(&Test::new(), &[]).unwrap_err();
        assert_eq!(err.site(), FailureSite::CallArgs);

        let all = g.validator().check_all(&Test::new(), &[]);
        let sites: Vec<FailureSite> = all.iter().map(ValidationFailure::site).collect();
        assert_eq!(sites, vec![FailureSite::CallArgs, FailureSite::CallContext]);
    }

    #[test]
    fn test_context_check_fails_after_args_check_passes() {
        let call = CallValidator::new()
            .args(|args: &[Value]| args.len() == 2)
            .context(|t: &Test, args: &[Value]| args.iter().map(num).sum::<f64>() > t.field_a)
            .describe_context("sum > field_a");
        let test = Test::new();
        let g = guard(
            &Registry::new(),
            Slot::<Test>::of("both_configured"),
            Some(call),
            counted_sum,
        );

        let err = g.call(&test, &[2.into(), 1.into()]).unwrap_err();
        assert_eq!(err.site(), FailureSite::CallContext);
        assert_eq!(err.values(), &[Value::from(2), Value::from(1)]);
        assert_eq!(
            err.reason(),
            &FailureReason::Rejected {
                predicate: "sum > field_a".into()
            }
        );
        assert_eq!(test.calls.get(), 0);

        assert_eq!(g.call(&test, &[4.into(), 4.into()]), Ok(8.0));
        assert_eq!(test.calls.get(), 1);
    }

    #[test]
    fn test_err_returning_predicate_becomes_failure() {
        let slot = Slot::<Test>::of("fallible");
        let mut registry = Registry::new();
        registry.is(slot, 0, |v: &Value, _: &Test| -> Result<bool, String> {
            let items = v.as_array().ok_or_else(|| format!("expected array, got {}", v))?;
            Ok(items.len() >= 2)
        });

        let test = Test::new();
        let g = guard(&registry, slot, None, counted_sum);

        let err = g.call(&test, &[7.into()]).unwrap_err();
        assert_eq!(err.site(), FailureSite::Parameter(0));
        match err.reason() {
            FailureReason::Errored { message, .. } => {
                assert_eq!(message, "expected array, got 7")
            }
            other => panic!("Expected Errored, got {:?}", other),
        }

        let err = g.call(&test, &[vec![1].into()]).unwrap_err();
        assert!(matches!(err.reason(), FailureReason::Rejected { .. }));
        assert_eq!(test.calls.get(), 0);

        assert!(g.call(&test, &[vec![1, 2].into()]).is_ok());
        assert_eq!(test.calls.get(), 1);
    }

    #[test]
    fn test_context_check_reads_receiver() {
        let call = CallValidator::new()
            .context(|t: &Test, args: &[Value]| args.iter().map(num).sum::<f64>() > t.field_a);
        let g = guard(
            &Registry::new(),
            Slot::<Test>::of("ctx"),
            Some(call),
            sum,
        );

        assert_eq!(g.call(&Test::new(), &[4.into(), 4.into()]), Ok(8.0));
        let err = g.call(&Test::new(), &[2.into(), 1.into()]).unwrap_err();
        assert_eq!(err.site(), FailureSite::CallContext);
    }

    #[test]
    fn test_panicking_predicate_becomes_failure() {
        let slot = Slot::<Test>::of("panics");
        let mut registry = Registry::new();
        registry.is(slot, 0, |v: &Value, _: &Test| -> bool {
            v.as_array().map(|a| a.len() > 1).expect("array argument")
        });

        let g = guard(&registry, slot, None, sum);
        let err = g.call(&Test::new(), &[1.into()]).unwrap_err();
        match err.reason() {
            FailureReason::Errored { message, .. } => assert!(message.contains("array argument")),
            other => panic!("Expected Errored, got {:?}", other),
        }
    }

    #[test]
    fn test_non_boolean_result_fails() {
        let slot = Slot::<Test>::of("truthy");
        let mut registry = Registry::new();
        registry.is(slot, 0, |v: &Value, _: &Test| v.clone());

        let g = guard(&registry, slot, None, sum);
        let err = g.call(&Test::new(), &[1.into()]).unwrap_err();
        assert!(matches!(err.reason(), FailureReason::NotBoolean { .. }));
        assert!(g.call(&Test::new(), &[true.into()]).is_ok());
    }

    #[test]
    fn test_check_all_collects_every_failure() {
        let slot = Slot::<Test>::of("many");
        let mut registry = Registry::new();
        registry
            .method(slot)
            .param_typed(0, gt(0.0), PrimitiveType::Number)
            .param(2, gt(0.0).labeled("third positive"));

        let v = MethodValidator::new(&registry, slot, None);
        let failures = v.check_all(&Test::new(), &["x".into(), 9.into(), 0.into()]);
        let sites: Vec<FailureSite> = failures.iter().map(ValidationFailure::site).collect();
        assert_eq!(
            sites,
            vec![
                FailureSite::Parameter(0),
                FailureSite::Parameter(0),
                FailureSite::Parameter(2)
            ]
        );
        assert_eq!(
            v.check(&Test::new(), &["x".into(), 9.into(), 0.into()]),
            Err(failures[0].clone())
        );
    }

    #[test]
    fn test_guard_mut_mutates_only_after_validation() {
        struct Counter {
            total: f64,
        }

        let slot = Slot::<Counter>::of("add");
        let mut registry = Registry::new();
        registry.is(slot, 0, |v: &Value, c: &Counter| num(v) + c.total <= 10.0);

        let add = guard_mut(&registry, slot, None, |c: &mut Counter, args: &[Value]| {
            c.total += num(&args[0]);
            c.total
        });

        let mut counter = Counter { total: 0.0 };
        assert_eq!(add.call_mut(&mut counter, &[6.into()]), Ok(6.0));
        assert!(add.call_mut(&mut counter, &[6.into()]).is_err());
        assert_eq!(counter.total, 6.0);
    }

    #[test]
    fn test_try_call_flattens_errors() {
        #[derive(Debug, PartialEq)]
        enum AppError {
            Invalid(FailureSite),
            Empty,
        }

        impl From<ValidationFailure> for AppError {
            fn from(failure: ValidationFailure) -> Self {
                AppError::Invalid(failure.site())
            }
        }

        let slot = Slot::<Test>::of("first");
        let mut registry = Registry::new();
        registry.is(slot, 0, |v: &Value, _: &Test| !v.is_undefined());

        let first = guard(&registry, slot, None, |_: &Test, args: &[Value]| {
            args[0]
                .as_array()
                .and_then(|items| items.first().cloned())
                .ok_or(AppError::Empty)
        });

        let test = Test::new();
        assert_eq!(
            first.try_call(&test, &[vec![7].into()]),
            Ok(Value::from(7))
        );
        assert_eq!(
            first.try_call(&test, &[Value::Array(vec![])]),
            Err(AppError::Empty)
        );
        assert_eq!(
            first.try_call(&test, &[]),
            Err(AppError::Invalid(FailureSite::Parameter(0)))
        );
    }

    #[test]
    fn test_snapshot_ignores_later_registrations() {
        let slot = Slot::<Test>::of("late");
        let mut registry = Registry::new();
        let g = guard(&registry, slot, None, sum);
        registry.is(slot, 0, |_: &Value, _: &Test| false);

        assert!(g.call(&Test::new(), &[1.into()]).is_ok());
        assert!(guard(&registry, slot, None, sum)
            .call(&Test::new(), &[1.into()])
            .is_err());
    }

    #[cfg(feature = "tracing")]
    mod tracing_tests {
        use super::*;
        use tracing_test::traced_test;

        #[test]
        #[traced_test]
        fn test_rejection_is_logged() {
            let slot = Slot::<Test>::of("logged");
            let mut registry = Registry::new();
            registry.is(slot, 0, |_: &Value, _: &Test| false);

            let g = guard(&registry, slot, None, sum);
            assert!(g.call(&Test::new(), &[1.into()]).is_err());
            assert!(logs_contain("arguments rejected"));
        }
    }
}
