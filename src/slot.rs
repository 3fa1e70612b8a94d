//! Method slots
//!
//! A slot names one method on one owner type. It is the key under which
//! parameter validators are registered and the label a failure reports.
//!
//! # Example
//!
//! ```rust
//! use argguard::Slot;
//!
//! struct Calculator;
//!
//! let add = Slot::<Calculator>::of("add");
//! assert_eq!(add.method(), "add");
//! assert!(add.id().to_string().ends_with("Calculator::add"));
//! ```

use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;

/// Typed identity of a method `method` on owner type `R`.
pub struct Slot<R: ?Sized> {
    id: SlotId,
    _owner: PhantomData<fn(&R)>,
}

impl<R: ?Sized + 'static> Slot<R> {
    /// Slot for the method named `method` on `R`.
    pub fn of(method: &'static str) -> Self {
        Slot {
            id: SlotId {
                owner: TypeId::of::<R>(),
                owner_name: std::any::type_name::<R>(),
                method,
            },
            _owner: PhantomData,
        }
    }
}

impl<R: ?Sized> Slot<R> {
    /// The method name.
    pub fn method(&self) -> &'static str {
        self.id.method
    }

    /// The type-erased key.
    pub fn id(&self) -> SlotId {
        self.id
    }
}

impl<R: ?Sized> Clone for Slot<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: ?Sized> Copy for Slot<R> {}

impl<R: ?Sized> PartialEq for Slot<R> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<R: ?Sized> Eq for Slot<R> {}

impl<R: ?Sized> fmt::Debug for Slot<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Slot").field(&self.id).finish()
    }
}

impl<R: ?Sized> fmt::Display for Slot<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.id, f)
    }
}

/// Type-erased slot key: owner type identity plus method name.
///
/// Equality and hashing use the owner's `TypeId` and the method name only.
#[derive(Clone, Copy)]
pub struct SlotId {
    owner: TypeId,
    owner_name: &'static str,
    method: &'static str,
}

impl SlotId {
    /// Full type name of the owner.
    pub fn owner_name(&self) -> &'static str {
        self.owner_name
    }

    /// The method name.
    pub fn method(&self) -> &'static str {
        self.method
    }
}

impl PartialEq for SlotId {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.method == other.method
    }
}

impl Eq for SlotId {}

impl std::hash::Hash for SlotId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.owner.hash(state);
        self.method.hash(state);
    }
}

impl fmt::Debug for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.owner_name, self.method)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.owner_name, self.method)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SlotId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("SlotId", 2)?;
        state.serialize_field("owner", self.owner_name)?;
        state.serialize_field("method", self.method)?;
        state.end()
    }
}
