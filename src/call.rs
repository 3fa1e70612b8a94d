//! Call-level validators
//!
//! A [`CallValidator`] checks the whole argument list at once, optionally
//! together with the receiver. It runs before any per-parameter validator.
//!
//! # Example
//!
//! ```rust
//! use argguard::{CallValidator, Value};
//!
//! struct Test {
//!     field_a: f64,
//! }
//!
//! let sum = |args: &[Value]| args.iter().filter_map(Value::as_f64).sum::<f64>();
//!
//! let validator = CallValidator::<Test>::new()
//!     .args(|args: &[Value]| args.len() == 2)
//!     .context(move |test: &Test, args: &[Value]| sum(args) > test.field_a);
//!
//! assert!(validator.has_args_check());
//! assert!(validator.has_context_check());
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::predicate::{IntoVerdict, Verdict};
use crate::value::Value;

type ArgsFn = dyn Fn(&[Value]) -> Verdict + Send + Sync;
type ContextFn<R> = dyn Fn(&R, &[Value]) -> Verdict + Send + Sync;

/// Whole-call predicates for one method.
///
/// Either check may be absent. When both are present the argument check runs
/// first and both must pass.
pub struct CallValidator<R: ?Sized> {
    args: Option<(Arc<ArgsFn>, Cow<'static, str>)>,
    context: Option<(Arc<ContextFn<R>>, Cow<'static, str>)>,
}

impl<R: ?Sized> CallValidator<R> {
    /// A validator with no checks.
    pub fn new() -> Self {
        CallValidator {
            args: None,
            context: None,
        }
    }

    /// Returns true if an argument-list check is set.
    pub fn has_args_check(&self) -> bool {
        self.args.is_some()
    }

    /// Returns true if a receiver-aware check is set.
    pub fn has_context_check(&self) -> bool {
        self.context.is_some()
    }

    pub(crate) fn args_check(&self) -> Option<(&ArgsFn, &Cow<'static, str>)> {
        self.args.as_ref().map(|(check, name)| (&**check, name))
    }

    pub(crate) fn context_check(&self) -> Option<(&ContextFn<R>, &Cow<'static, str>)> {
        self.context.as_ref().map(|(check, name)| (&**check, name))
    }
}

impl<R: ?Sized + 'static> CallValidator<R> {
    /// Set the predicate over the raw argument list.
    pub fn args<F, O>(mut self, check: F) -> Self
    where
        F: Fn(&[Value]) -> O + Send + Sync + 'static,
        O: IntoVerdict,
    {
        let name = Cow::Borrowed(std::any::type_name::<F>());
        let erased: Arc<ArgsFn> = Arc::new(move |args: &[Value]| check(args).into_verdict());
        self.args = Some((erased, name));
        self
    }

    /// Set the predicate over the receiver and the raw argument list.
    pub fn context<F, O>(mut self, check: F) -> Self
    where
        F: Fn(&R, &[Value]) -> O + Send + Sync + 'static,
        O: IntoVerdict,
    {
        let name = Cow::Borrowed(std::any::type_name::<F>());
        let erased: Arc<ContextFn<R>> =
            Arc::new(move |receiver: &R, args: &[Value]| check(receiver, args).into_verdict());
        self.context = Some((erased, name));
        self
    }

    /// Replace the description of the argument-list check.
    ///
    /// Has no effect if no argument-list check is set.
    pub fn describe_args(mut self, description: impl Into<Cow<'static, str>>) -> Self {
        if let Some((_, name)) = self.args.as_mut() {
            *name = description.into();
        }
        self
    }

    /// Replace the description of the receiver-aware check.
    ///
    /// Has no effect if no receiver-aware check is set.
    pub fn describe_context(mut self, description: impl Into<Cow<'static, str>>) -> Self {
        if let Some((_, name)) = self.context.as_mut() {
            *name = description.into();
        }
        self
    }
}

impl<R: ?Sized> Default for CallValidator<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ?Sized> Clone for CallValidator<R> {
    fn clone(&self) -> Self {
        CallValidator {
            args: self.args.clone(),
            context: self.context.clone(),
        }
    }
}

impl<R: ?Sized> fmt::Debug for CallValidator<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallValidator")
            .field("args", &self.args.as_ref().map(|(_, name)| name))
            .field("context", &self.context.as_ref().map(|(_, name)| name))
            .finish()
    }
}
