//! Dynamic argument values
//!
//! Guarded methods receive their arguments as an ordered slice of [`Value`]s.
//! Keeping arguments dynamic lets a single guard handle any arity, lets a
//! predicate see an *absent* argument ([`Value::Undefined`]) when the caller
//! passed fewer arguments than a validator's position, and lets the guard
//! check the runtime [`PrimitiveType`] of an argument.
//!
//! # Example
//!
//! ```rust
//! use argguard::{PrimitiveType, Value};
//!
//! let args: Vec<Value> = vec![5.into(), "Hi".into(), vec![1, 2, 3].into()];
//!
//! assert_eq!(args[0].primitive_type(), PrimitiveType::Number);
//! assert_eq!(args[1].primitive_type(), PrimitiveType::String);
//! assert_eq!(args[2].primitive_type(), PrimitiveType::Object);
//! assert_eq!(argguard::value::arg_at(&args, 7), &Value::Undefined);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A dynamically typed argument passed to a guarded method.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The absent value. Also produced for positions past the end of the call.
    #[default]
    Undefined,
    /// An explicit null.
    Null,
    /// A boolean.
    Bool(bool),
    /// A double-precision number.
    Number(f64),
    /// An arbitrary-size integer, distinct from [`Value::Number`].
    BigInt(i128),
    /// A string.
    String(String),
    /// A unique token with a description.
    Symbol(String),
    /// An ordered list of values.
    Array(Vec<Value>),
    /// A keyed record of values.
    Object(BTreeMap<String, Value>),
}

/// Shared absent value returned by [`arg_at`] for missing positions.
static UNDEFINED: Value = Value::Undefined;

/// Get the argument at `position`, or [`Value::Undefined`] if the call
/// supplied fewer arguments.
///
/// # Example
///
/// ```rust
/// use argguard::value::{arg_at, Value};
///
/// let args = [Value::from(1)];
/// assert_eq!(arg_at(&args, 0), &Value::Number(1.0));
/// assert_eq!(arg_at(&args, 1), &Value::Undefined);
/// ```
pub fn arg_at(args: &[Value], position: usize) -> &Value {
    args.get(position).unwrap_or(&UNDEFINED)
}

impl Value {
    /// Runtime primitive category of this value.
    ///
    /// `Null`, `Array` and `Object` all report [`PrimitiveType::Object`].
    pub fn primitive_type(&self) -> PrimitiveType {
        match self {
            Value::Undefined => PrimitiveType::Undefined,
            Value::Bool(_) => PrimitiveType::Boolean,
            Value::Number(_) => PrimitiveType::Number,
            Value::BigInt(_) => PrimitiveType::BigInt,
            Value::String(_) => PrimitiveType::String,
            Value::Symbol(_) => PrimitiveType::Symbol,
            Value::Null | Value::Array(_) | Value::Object(_) => PrimitiveType::Object,
        }
    }

    /// Returns true if this is [`Value::Undefined`].
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// The number, if this is a [`Value::Number`].
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The integer, if this is a [`Value::BigInt`].
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Value::BigInt(n) => Some(*n),
            _ => None,
        }
    }

    /// The string slice, if this is a [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The boolean, if this is a [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The elements, if this is a [`Value::Array`].
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a field of a [`Value::Object`].
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(fields) => fields.get(key),
            _ => None,
        }
    }

    /// Length of a string (in chars) or array; `None` for other values.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::String(s) => Some(s.chars().count()),
            Value::Array(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Create a symbol with the given description.
    pub fn symbol(description: impl Into<String>) -> Self {
        Value::Symbol(description.into())
    }

    /// Create an object from key/value pairs.
    pub fn object<K, V, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        write!(f, "NaN")
    } else if n.is_infinite() {
        write!(f, "{}Infinity", if n < 0.0 { "-" } else { "" })
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        write!(f, "{}", n as i128)
    } else {
        write!(f, "{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => fmt_number(*n, f),
            Value::BigInt(n) => write!(f, "{}n", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Symbol(desc) => write!(f, "Symbol({})", desc),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Object(fields) => {
                write!(f, "{{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

macro_rules! from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

from_number!(f64, f32, i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl From<i128> for Value {
    fn from(n: i128) -> Self {
        Value::BigInt(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Undefined, Into::into)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Value::Object(fields)
    }
}

/// The closed set of runtime type categories an argument can be checked against.
///
/// Parses from and displays as its lowercase name (`"number"`, `"string"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum PrimitiveType {
    /// Strings.
    String,
    /// Double-precision numbers.
    Number,
    /// Arbitrary-size integers.
    BigInt,
    /// Booleans.
    Boolean,
    /// Symbols.
    Symbol,
    /// The absent value.
    Undefined,
    /// Null, arrays and objects.
    Object,
}

impl PrimitiveType {
    /// Every primitive type, in declaration order.
    pub const ALL: [PrimitiveType; 7] = [
        PrimitiveType::String,
        PrimitiveType::Number,
        PrimitiveType::BigInt,
        PrimitiveType::Boolean,
        PrimitiveType::Symbol,
        PrimitiveType::Undefined,
        PrimitiveType::Object,
    ];

    /// Lowercase name of this type.
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Number => "number",
            PrimitiveType::BigInt => "bigint",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Symbol => "symbol",
            PrimitiveType::Undefined => "undefined",
            PrimitiveType::Object => "object",
        }
    }

    /// Returns true if `value` belongs to exactly this category.
    pub fn matches(self, value: &Value) -> bool {
        value.primitive_type() == self
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PrimitiveType {
    type Err = UnknownPrimitiveType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrimitiveType::ALL
            .into_iter()
            .find(|ty| ty.name() == s)
            .ok_or_else(|| UnknownPrimitiveType(s.to_string()))
    }
}

/// Error returned when parsing a name that is not a [`PrimitiveType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPrimitiveType(pub String);

impl fmt::Display for UnknownPrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown primitive type '{}'", self.0)
    }
}

impl std::error::Error for UnknownPrimitiveType {}

#[cfg(feature = "serde")]
impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::{SerializeMap, SerializeSeq};

        match self {
            Value::Undefined | Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::BigInt(n) => serializer.collect_str(n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Symbol(_) => serializer.collect_str(self),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
impl Arbitrary for PrimitiveType {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        proptest::sample::select(PrimitiveType::ALL.to_vec()).boxed()
    }
}

#[cfg(feature = "proptest")]
impl Arbitrary for Value {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        let leaf = prop_oneof![
            Just(Value::Undefined),
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<f64>().prop_map(Value::Number),
            any::<i64>().prop_map(|n| Value::BigInt(n as i128)),
            "[a-zA-Z0-9 ]{0,12}".prop_map(Value::String),
            "[a-z]{1,6}".prop_map(Value::Symbol),
        ];
        leaf.prop_recursive(3, 24, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,4}", inner, 0..4).prop_map(Value::Object),
            ]
        })
        .boxed()
    }
}
