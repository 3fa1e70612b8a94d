//! # Argguard
//!
//! Runtime argument validation at method entry.
//!
//! A method declares, per argument position, a predicate the argument must
//! satisfy (optionally with a required primitive type), plus an optional
//! whole-call predicate over all arguments and the receiver. The method is
//! then wrapped by a guard that runs every check before the body and either
//! calls the original method with the original arguments or returns a
//! [`ValidationFailure`] for the first check that failed.
//!
//! ## Quick Example
//!
//! ```rust
//! use argguard::{guard, CallValidator, FailureSite, Registry, Slot, Value};
//!
//! struct Test {
//!     field_a: f64,
//! }
//!
//! fn num(v: &Value) -> f64 {
//!     v.as_f64().unwrap_or(f64::NAN)
//! }
//!
//! // Declare parameter validators once, during setup
//! let slot = Slot::<Test>::of("test_context_aware_all_arg_check");
//! let mut registry = Registry::new();
//! registry.is(slot, 0, |v: &Value, _: &Test| num(v) > 0.0);
//!
//! // Guard the method, with a receiver-aware whole-call check
//! let checked = guard(
//!     &registry,
//!     slot,
//!     Some(CallValidator::new().context(|t: &Test, args: &[Value]| {
//!         args.iter().map(num).sum::<f64>() > t.field_a
//!     })),
//!     |_: &Test, args: &[Value]| num(&args[0]) + num(&args[1]),
//! );
//!
//! let test = Test { field_a: 5.0 };
//! assert_eq!(checked.call(&test, &[4.into(), 4.into()]), Ok(8.0));
//!
//! let err = checked.call(&test, &[2.into(), 1.into()]).unwrap_err();
//! assert_eq!(err.site(), FailureSite::CallContext);
//! ```
//!
//! ## Features
//!
//! - `tracing`: emit `tracing` events when calls are rejected or accepted
//! - `serde`: `Serialize` for failures and values
//! - `proptest`: `Arbitrary` for [`Value`] and [`PrimitiveType`]

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod call;
pub mod error;
pub mod guard;
pub mod predicate;
pub mod registry;
pub mod slot;
pub mod testing;
pub mod value;

// Re-exports
pub use call::CallValidator;
pub use error::{FailureReason, FailureSite, ValidationFailure};
pub use guard::{guard, guard_mut, Guarded, MethodValidator};
pub use predicate::{IntoVerdict, ParamPredicate, Verdict};
pub use registry::{MethodDecl, ParameterRecord, Registry};
pub use slot::{Slot, SlotId};
pub use value::{PrimitiveType, UnknownPrimitiveType, Value};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::call::CallValidator;
    pub use crate::error::{FailureReason, FailureSite, ValidationFailure};
    pub use crate::guard::{guard, guard_mut, Guarded, MethodValidator};
    pub use crate::predicate::{IntoVerdict, ParamPredicate, PredicateExt, Verdict};
    pub use crate::registry::Registry;
    pub use crate::slot::Slot;
    pub use crate::value::{PrimitiveType, Value};
}
