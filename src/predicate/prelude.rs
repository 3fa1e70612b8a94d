//! Predicate prelude for convenient imports
//!
//! # Example
//!
//! ```rust
//! use argguard::predicate::prelude::*;
//! use argguard::Value;
//!
//! let valid_amount = gt(0.0).and(le(1_000.0));
//! assert!(ParamPredicate::<()>::check(&valid_amount, &Value::from(25), &()).is_pass());
//! ```

// Core traits
pub use super::{IntoVerdict, ParamPredicate, Verdict};

// Logical combinators
pub use super::combinators::{rule, And, Not, Or, PredicateExt};

// Number predicates
pub use super::number::{between, ge, gt, le, lt, non_negative, positive};

// String predicates
pub use super::string::{eq_str, len_max, len_min, not_empty};

// Array predicates
pub use super::collection::{any_value, has_min_len, sum_at_least};
