//! Testing utilities for guarded methods
//!
//! Assertion macros for the result of a guarded call, and a counter for
//! observing whether a method body actually ran.
//!
//! # Examples
//!
//! ```rust
//! use argguard::testing::CallCounter;
//! use argguard::{assert_accepted, assert_rejected, guard, FailureSite, Registry, Slot, Value};
//!
//! struct Test {
//!     body: CallCounter,
//! }
//!
//! let slot = Slot::<Test>::of("test_one_number");
//! let mut registry = Registry::new();
//! registry.is(slot, 0, |v: &Value, _: &Test| v.as_f64().is_some_and(|n| n > 0.0));
//!
//! let one = guard(&registry, slot, None, |t: &Test, args: &[Value]| {
//!     t.body.hit();
//!     args[0].clone()
//! });
//!
//! let test = Test { body: CallCounter::new() };
//! assert_accepted!(one.call(&test, &[5.into()]));
//! assert_rejected!(one.call(&test, &[(-5).into()]), FailureSite::Parameter(0));
//! assert_eq!(test.body.count(), 1);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts how many times a method body ran.
///
/// Usable through a shared reference, so it can live inside a receiver.
#[derive(Debug, Default)]
pub struct CallCounter {
    count: AtomicUsize,
}

impl CallCounter {
    /// Create a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one call.
    pub fn hit(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    /// Number of recorded calls.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Returns true if no call was recorded.
    pub fn untouched(&self) -> bool {
        self.count() == 0
    }
}

/// Assert that a guarded call was accepted, evaluating to the method's result.
///
/// This macro will panic if the call returned a `ValidationFailure`.
///
/// # Example
///
/// ```rust
/// use argguard::{assert_accepted, ValidationFailure};
///
/// let result: Result<i32, ValidationFailure> = Ok(10);
/// assert_eq!(assert_accepted!(result), 10);
/// ```
#[macro_export]
macro_rules! assert_accepted {
    ($result:expr) => {
        match $result {
            ::std::result::Result::Ok(value) => value,
            ::std::result::Result::Err(e) => {
                panic!("Expected call to be accepted, got rejection: {}", e);
            }
        }
    };
}

/// Assert that a guarded call was rejected, evaluating to the failure.
///
/// An optional second argument is a pattern the failure's
/// [`FailureSite`](crate::FailureSite) must match.
///
/// # Example
///
/// ```rust
/// use argguard::{assert_rejected, FailureReason, FailureSite, Slot, ValidationFailure};
///
/// struct Test;
///
/// let result: Result<i32, ValidationFailure> = Err(ValidationFailure::new(
///     Slot::<Test>::of("test").id(),
///     FailureSite::CallArgs,
///     vec![],
///     FailureReason::Rejected { predicate: "argFn".into() },
/// ));
///
/// let failure = assert_rejected!(result, FailureSite::CallArgs | FailureSite::CallContext);
/// assert!(failure.site().is_call_level());
/// ```
#[macro_export]
macro_rules! assert_rejected {
    ($result:expr) => {
        match $result {
            ::std::result::Result::Err(failure) => failure,
            ::std::result::Result::Ok(value) => {
                panic!("Expected call to be rejected, got accepted: {:?}", value);
            }
        }
    };
    ($result:expr, $site:pat) => {
        match $result {
            ::std::result::Result::Err(failure) => {
                match failure.site() {
                    $site => {}
                    other => panic!(
                        "Expected rejection at {}, got rejection at {}",
                        stringify!($site),
                        other
                    ),
                }
                failure
            }
            ::std::result::Result::Ok(value) => {
                panic!("Expected call to be rejected, got accepted: {:?}", value);
            }
        }
    };
}
