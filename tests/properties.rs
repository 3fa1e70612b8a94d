//! Property-based tests for guarded calls

use argguard::testing::CallCounter;
use argguard::{guard, CallValidator, FailureSite, PrimitiveType, Registry, Slot, Value};
use proptest::prelude::*;

struct Receiver {
    body: CallCounter,
}

impl Receiver {
    fn new() -> Self {
        Receiver {
            body: CallCounter::new(),
        }
    }
}

fn positive(v: &Value, _: &Receiver) -> bool {
    v.as_f64().is_some_and(|n| n > 0.0)
}

fn slot() -> Slot<Receiver> {
    Slot::of("method")
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i32>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::from),
        Just(Value::Null),
        Just(Value::Undefined),
    ]
}

proptest! {
    #[test]
    fn prop_accepted_call_passes_through(
        args in prop::collection::vec(1..1000i32, 1..6)
    ) {
        let mut registry = Registry::new();
        for position in 0..args.len() {
            registry.is(slot(), position, positive);
        }

        let method = guard(&registry, slot(), None, |r: &Receiver, args: &[Value]| {
            r.body.hit();
            args.to_vec()
        });

        let values: Vec<Value> = args.iter().copied().map(Value::from).collect();
        let receiver = Receiver::new();

        prop_assert_eq!(method.call(&receiver, &values), Ok(values.clone()));
        prop_assert_eq!(receiver.body.count(), 1);
    }

    #[test]
    fn prop_single_violation_skips_body(
        args in prop::collection::vec(1..1000i32, 1..6),
        bad in any::<prop::sample::Index>(),
        bad_value in -1000..=0i32
    ) {
        let mut registry = Registry::new();
        for position in 0..args.len() {
            registry.is(slot(), position, positive);
        }

        let method = guard(&registry, slot(), None, |r: &Receiver, _: &[Value]| r.body.hit());

        let bad = bad.index(args.len());
        let mut values: Vec<Value> = args.iter().copied().map(Value::from).collect();
        values[bad] = Value::from(bad_value);
        let receiver = Receiver::new();

        let failure = method.call(&receiver, &values).unwrap_err();
        prop_assert_eq!(failure.site(), FailureSite::Parameter(bad));
        prop_assert_eq!(failure.values(), &[Value::from(bad_value)]);
        prop_assert!(receiver.body.untouched());
    }

    #[test]
    fn prop_unregistered_position_is_unconstrained(
        first in 1..1000i32,
        second in scalar(),
        third in 1..1000i32
    ) {
        let mut registry = Registry::new();
        registry.method(slot()).is(0, positive).is(2, positive);

        let method = guard(&registry, slot(), None, |_: &Receiver, args: &[Value]| args.len());

        let receiver = Receiver::new();
        let args = [first.into(), second, third.into()];
        prop_assert_eq!(method.call(&receiver, &args), Ok(3));
    }

    #[test]
    fn prop_later_registration_replaces_earlier(value in -1000..1000i32) {
        let mut registry = Registry::new();
        registry.is(slot(), 0, |_: &Value, _: &Receiver| false);
        registry.is(slot(), 0, |v: &Value, _: &Receiver| v.as_f64().is_some_and(|n| n >= 0.0));

        prop_assert_eq!(registry.parameter_validators(slot()).len(), 1);

        let method = guard(&registry, slot(), None, |_: &Receiver, _: &[Value]| ());
        let result = method.call(&Receiver::new(), &[value.into()]);
        prop_assert_eq!(result.is_ok(), value >= 0);
    }

    #[test]
    fn prop_type_check_rejects_what_predicate_accepts(text in "[0-9]{1,6}") {
        let mut registry = Registry::new();
        registry.is_typed(slot(), 0, |_: &Value, _: &Receiver| true, PrimitiveType::Number);

        let method = guard(&registry, slot(), None, |_: &Receiver, _: &[Value]| ());
        let receiver = Receiver::new();

        prop_assert!(method.call(&receiver, &[text.as_str().into()]).is_err());
        let number: f64 = text.parse().unwrap();
        prop_assert!(method.call(&receiver, &[number.into()]).is_ok());
    }

    #[test]
    fn prop_call_level_failure_reported_first(
        args in prop::collection::vec(-1000..=0i32, 1..6)
    ) {
        let mut registry = Registry::new();
        for position in 0..args.len() {
            registry.is(slot(), position, positive);
        }

        let method = guard(
            &registry,
            slot(),
            Some(CallValidator::new().args(|_: &[Value]| false)),
            |r: &Receiver, _: &[Value]| r.body.hit(),
        );

        let values: Vec<Value> = args.iter().copied().map(Value::from).collect();
        let receiver = Receiver::new();

        let failure = method.call(&receiver, &values).unwrap_err();
        prop_assert_eq!(failure.site(), FailureSite::CallArgs);
        prop_assert_eq!(failure.values(), values.as_slice());

        let all = method.validator().check_all(&receiver, &values);
        prop_assert_eq!(all.len(), args.len() + 1);
        prop_assert!(receiver.body.untouched());
    }
}
