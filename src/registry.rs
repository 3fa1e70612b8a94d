//! Parameter validator registry
//!
//! The registry is a side table from a method [`Slot`] to the validators
//! declared on that method's parameters. Each argument position holds at
//! most one [`ParameterRecord`]; registering again at the same position
//! replaces the earlier record. Positions without a record are unchecked.
//!
//! Registration takes `&mut self` and happens during setup. Once built, the
//! registry is only read, so it can be shared across threads freely, either
//! behind an `Arc` or installed once as the process-wide registry.
//!
//! # Example
//!
//! ```rust
//! use argguard::{PrimitiveType, Registry, Slot, Value};
//!
//! struct Test;
//!
//! let three = Slot::<Test>::of("test_three_numbers");
//!
//! let mut registry = Registry::new();
//! registry
//!     .method(three)
//!     .is(0, |v: &Value, _: &Test| v.as_f64().is_some_and(|n| n > 0.0))
//!     .ensure_typed(2, |v: &Value, _: &Test| v.as_f64().is_some_and(|n| n >= 5.0), PrimitiveType::Number);
//!
//! let records = registry.parameter_validators(three);
//! let positions: Vec<usize> = records.iter().map(|r| r.position()).collect();
//! assert_eq!(positions, vec![0, 2]);
//! assert_eq!(records[1].expected_type(), Some(PrimitiveType::Number));
//! ```

use std::any::Any;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::predicate::{IntoVerdict, ParamPredicate, Verdict};
use crate::slot::{Slot, SlotId};
use crate::value::{PrimitiveType, Value};

/// The validator declared for one argument position of one method.
pub struct ParameterRecord<R: ?Sized> {
    position: usize,
    predicate: Arc<dyn ParamPredicate<R>>,
    expected_type: Option<PrimitiveType>,
}

impl<R: ?Sized> ParameterRecord<R> {
    /// Zero-based argument position this record validates.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The primitive type the argument must have, if any.
    pub fn expected_type(&self) -> Option<PrimitiveType> {
        self.expected_type
    }

    /// Description of the predicate.
    pub fn description(&self) -> Cow<'static, str> {
        self.predicate.describe()
    }

    /// Evaluate the predicate alone, without the type check.
    pub fn check(&self, value: &Value, receiver: &R) -> Verdict {
        self.predicate.check(value, receiver)
    }
}

impl<R: ?Sized> Clone for ParameterRecord<R> {
    fn clone(&self) -> Self {
        ParameterRecord {
            position: self.position,
            predicate: Arc::clone(&self.predicate),
            expected_type: self.expected_type,
        }
    }
}

impl<R: ?Sized> fmt::Debug for ParameterRecord<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterRecord")
            .field("position", &self.position)
            .field("predicate", &self.predicate.describe())
            .field("expected_type", &self.expected_type)
            .finish()
    }
}

struct SlotRecords<R: ?Sized> {
    params: BTreeMap<usize, ParameterRecord<R>>,
}

/// Side table of per-parameter validators, keyed by method slot.
///
/// A single registry holds slots for any number of owner types.
#[derive(Default)]
pub struct Registry {
    slots: HashMap<SlotId, Box<dyn Any + Send + Sync>>,
}

static GLOBAL: OnceLock<Registry> = OnceLock::new();

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `predicate` (and optionally a primitive type) for argument
    /// `position` of the method identified by `slot`.
    ///
    /// Replaces any record already registered at that position. The position
    /// is not checked against the method's arity.
    pub fn register_parameter_validator<R, P>(
        &mut self,
        slot: Slot<R>,
        position: usize,
        predicate: P,
        expected_type: Option<PrimitiveType>,
    ) where
        R: ?Sized + 'static,
        P: ParamPredicate<R> + 'static,
    {
        let record = ParameterRecord {
            position,
            predicate: Arc::new(predicate),
            expected_type,
        };

        let entry = self.slots.entry(slot.id()).or_insert_with(|| {
            Box::new(SlotRecords::<R> {
                params: BTreeMap::new(),
            })
        });

        if let Some(records) = entry.downcast_mut::<SlotRecords<R>>() {
            let _replaced = records.params.insert(position, record);

            #[cfg(feature = "tracing")]
            if _replaced.is_some() {
                tracing::trace!(slot = %slot, position, "parameter validator replaced");
            }
        }
    }

    /// All records registered for `slot`, in ascending position order.
    ///
    /// Returns an empty vector for a slot with no registrations.
    pub fn parameter_validators<R: ?Sized + 'static>(&self, slot: Slot<R>) -> Vec<ParameterRecord<R>> {
        self.slots
            .get(&slot.id())
            .and_then(|entry| entry.downcast_ref::<SlotRecords<R>>())
            .map(|records| records.params.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Declare a predicate for an argument position.
    ///
    /// Same as [`Registry::register_parameter_validator`] without a type check.
    pub fn is<R, F, O>(&mut self, slot: Slot<R>, position: usize, predicate: F)
    where
        R: ?Sized + 'static,
        F: Fn(&Value, &R) -> O + Send + Sync + 'static,
        O: IntoVerdict,
    {
        self.register_parameter_validator(slot, position, predicate, None);
    }

    /// Alias for [`Registry::is`].
    pub fn ensure<R, F, O>(&mut self, slot: Slot<R>, position: usize, predicate: F)
    where
        R: ?Sized + 'static,
        F: Fn(&Value, &R) -> O + Send + Sync + 'static,
        O: IntoVerdict,
    {
        self.is(slot, position, predicate);
    }

    /// Declare a predicate and a required primitive type for an argument position.
    pub fn is_typed<R, F, O>(
        &mut self,
        slot: Slot<R>,
        position: usize,
        predicate: F,
        expected_type: PrimitiveType,
    ) where
        R: ?Sized + 'static,
        F: Fn(&Value, &R) -> O + Send + Sync + 'static,
        O: IntoVerdict,
    {
        self.register_parameter_validator(slot, position, predicate, Some(expected_type));
    }

    /// Alias for [`Registry::is_typed`].
    pub fn ensure_typed<R, F, O>(
        &mut self,
        slot: Slot<R>,
        position: usize,
        predicate: F,
        expected_type: PrimitiveType,
    ) where
        R: ?Sized + 'static,
        F: Fn(&Value, &R) -> O + Send + Sync + 'static,
        O: IntoVerdict,
    {
        self.is_typed(slot, position, predicate, expected_type);
    }

    /// Fluent declarations for one method.
    pub fn method<R: ?Sized + 'static>(&mut self, slot: Slot<R>) -> MethodDecl<'_, R> {
        MethodDecl {
            registry: self,
            slot,
        }
    }

    /// Returns true if any parameter of `slot` has a validator.
    pub fn contains<R: ?Sized + 'static>(&self, slot: Slot<R>) -> bool {
        self.slots.contains_key(&slot.id())
    }

    /// Number of methods with at least one registered validator.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Publish this registry as the process-wide registry.
    ///
    /// Only the first install succeeds; later calls get their registry back.
    pub fn install(self) -> Result<&'static Registry, Registry> {
        let mut pending = Some(self);
        let installed = GLOBAL.get_or_init(|| pending.take().unwrap_or_default());
        match pending {
            None => Ok(installed),
            Some(rejected) => Err(rejected),
        }
    }

    /// The process-wide registry, if one has been installed.
    pub fn global() -> Option<&'static Registry> {
        GLOBAL.get()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("slots", &self.slots.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for declaring several parameter validators on one method.
///
/// Created by [`Registry::method`].
pub struct MethodDecl<'a, R: ?Sized + 'static> {
    registry: &'a mut Registry,
    slot: Slot<R>,
}

impl<R: ?Sized + 'static> MethodDecl<'_, R> {
    /// Declare a predicate for `position`.
    pub fn is<F, O>(self, position: usize, predicate: F) -> Self
    where
        F: Fn(&Value, &R) -> O + Send + Sync + 'static,
        O: IntoVerdict,
    {
        self.param(position, predicate)
    }

    /// Alias for [`MethodDecl::is`].
    pub fn ensure<F, O>(self, position: usize, predicate: F) -> Self
    where
        F: Fn(&Value, &R) -> O + Send + Sync + 'static,
        O: IntoVerdict,
    {
        self.is(position, predicate)
    }

    /// Declare a predicate and required primitive type for `position`.
    pub fn is_typed<F, O>(self, position: usize, predicate: F, expected_type: PrimitiveType) -> Self
    where
        F: Fn(&Value, &R) -> O + Send + Sync + 'static,
        O: IntoVerdict,
    {
        self.param_typed(position, predicate, expected_type)
    }

    /// Alias for [`MethodDecl::is_typed`].
    pub fn ensure_typed<F, O>(
        self,
        position: usize,
        predicate: F,
        expected_type: PrimitiveType,
    ) -> Self
    where
        F: Fn(&Value, &R) -> O + Send + Sync + 'static,
        O: IntoVerdict,
    {
        self.is_typed(position, predicate, expected_type)
    }

    /// Declare any [`ParamPredicate`] (stock predicates, combinators) for `position`.
    pub fn param<P: ParamPredicate<R> + 'static>(self, position: usize, predicate: P) -> Self {
        self.registry
            .register_parameter_validator(self.slot, position, predicate, None);
        self
    }

    /// Declare any [`ParamPredicate`] with a required primitive type for `position`.
    pub fn param_typed<P: ParamPredicate<R> + 'static>(
        self,
        position: usize,
        predicate: P,
        expected_type: PrimitiveType,
    ) -> Self {
        self.registry
            .register_parameter_validator(self.slot, position, predicate, Some(expected_type));
        self
    }
}

impl<R: ?Sized + 'static> fmt::Debug for MethodDecl<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDecl").field("slot", &self.slot).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::{ge, gt};

    struct Test;
    struct Other;

    fn positive(v: &Value, _: &Test) -> bool {
        v.as_f64().is_some_and(|n| n > 0.0)
    }

    #[test]
    fn test_unknown_slot_is_empty() {
        let registry = Registry::new();
        assert!(registry
            .parameter_validators(Slot::<Test>::of("missing"))
            .is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_records_come_back_in_position_order() {
        let slot = Slot::<Test>::of("three");
        let mut registry = Registry::new();
        registry.is(slot, 2, positive);
        registry.is(slot, 0, positive);
        registry.is(slot, 1, positive);

        let positions: Vec<usize> = registry
            .parameter_validators(slot)
            .iter()
            .map(ParameterRecord::position)
            .collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_second_registration_overwrites() {
        let slot = Slot::<Test>::of("one");
        let mut registry = Registry::new();
        registry.is_typed(slot, 0, |_: &Value, _: &Test| false, PrimitiveType::String);
        registry.ensure(slot, 0, |_: &Value, _: &Test| true);

        let records = registry.parameter_validators(slot);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].check(&Value::from(1), &Test), Verdict::Pass);
        assert_eq!(records[0].expected_type(), None);
    }

    #[test]
    fn test_slots_are_independent_per_owner_and_method() {
        let mut registry = Registry::new();
        registry.is(Slot::<Test>::of("run"), 0, positive);
        registry.is(Slot::<Other>::of("run"), 3, |_: &Value, _: &Other| true);

        assert_eq!(registry.parameter_validators(Slot::<Test>::of("run")).len(), 1);
        assert_eq!(
            registry.parameter_validators(Slot::<Other>::of("run"))[0].position(),
            3
        );
        assert!(registry
            .parameter_validators(Slot::<Test>::of("walk"))
            .is_empty());
        assert!(registry.contains(Slot::<Other>::of("run")));
        assert!(!registry.contains(Slot::<Other>::of("walk")));
    }

    #[test]
    fn test_method_builder_accepts_stock_predicates() {
        let slot = Slot::<Test>::of("two");
        let mut registry = Registry::new();
        registry
            .method(slot)
            .param(0, gt(0.0))
            .param_typed(1, ge(5.0), PrimitiveType::Number);

        let records = registry.parameter_validators(slot);
        assert_eq!(records[0].description(), "value > 0");
        assert_eq!(records[1].description(), "value >= 5");
        assert_eq!(records[1].expected_type(), Some(PrimitiveType::Number));
    }

    #[test]
    fn test_alias_registers_identically() {
        let slot = Slot::<Test>::of("hi");
        let mut a = Registry::new();
        let mut b = Registry::new();
        a.method(slot)
            .is(0, |v: &Value, _: &Test| v.as_str() == Some("Hi"));
        b.method(slot)
            .ensure(0, |v: &Value, _: &Test| v.as_str() == Some("Hi"));

        for registry in [&a, &b] {
            let records = registry.parameter_validators(slot);
            assert_eq!(records.len(), 1);
            assert!(records[0].check(&Value::from("Hi"), &Test).is_pass());
            assert!(!records[0].check(&Value::from("hi"), &Test).is_pass());
        }
    }

    #[test]
    fn test_debug_lists_slots() {
        let mut registry = Registry::new();
        registry.is(Slot::<Test>::of("run"), 0, positive);
        assert!(format!("{:?}", registry).contains("Test::run"));
    }
}
