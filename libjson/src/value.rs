//! JSON value representation.

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::decimal::BigDecimal;

/// A parsed JSON value.
///
/// Numbers without a fraction or exponent become `Integer`, or `BigInteger`
/// when they do not fit in an `i64`. Numbers with a fraction or exponent
/// become `Float`, or `BigDecimal` when the `f64` conversion overflows.
#[derive(Clone, PartialEq)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Integer(i64),
    /// Integer outside the `i64` range.
    BigInteger(BigInt),
    /// 64-bit floating-point number.
    Float(f64),
    /// Decimal outside the `f64` range.
    BigDecimal(BigDecimal),
    /// UTF-8 string. A `\u` escape naming an unpaired surrogate cannot be
    /// represented and is stored as U+FFFD.
    String(String),
    /// Array of values.
    Array(Vec<Value>),
    /// Object (key-value map). Later duplicate keys replace earlier ones.
    Object(HashMap<String, Value>),
}

impl Value {
    /// Returns `true` if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the boolean value if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Integer`, or a `BigInteger` that
    /// happens to fit.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::BigInteger(n) => n.to_i64(),
            _ => None,
        }
    }

    /// Returns a reference to the integer if this is a `BigInteger`.
    pub fn as_big_integer(&self) -> Option<&BigInt> {
        match self {
            Value::BigInteger(n) => Some(n),
            _ => None,
        }
    }

    /// Returns any number as an `f64`. Big numbers lose precision and may
    /// become infinite.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::BigInteger(n) => n.to_f64(),
            Value::Float(f) => Some(*f),
            Value::BigDecimal(d) => Some(d.to_f64()),
            _ => None,
        }
    }

    /// Returns a reference to the decimal if this is a `BigDecimal`.
    pub fn as_big_decimal(&self) -> Option<&BigDecimal> {
        match self {
            Value::BigDecimal(d) => Some(d),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns a reference to the array if this is an `Array`.
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Returns a reference to the object if this is an `Object`.
    pub fn as_object(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Look up a key if this is an `Object`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|obj| obj.get(key))
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::BigInteger(_) => "big integer",
            Value::Float(_) => "float",
            Value::BigDecimal(_) => "big decimal",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

/// Compact tree rendering. Big integers carry an `n` suffix and big decimals
/// an `m` suffix; object keys are sorted.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::BigInteger(n) => write!(f, "{}n", n),
            Value::Float(n) => write!(f, "{:?}", n),
            Value::BigDecimal(d) => write!(f, "{}m", d),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Array(arr) => f.debug_list().entries(arr).finish(),
            Value::Object(obj) => f
                .debug_map()
                .entries(obj.iter().collect::<BTreeMap<_, _>>())
                .finish(),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        match n.to_i64() {
            Some(small) => Value::Integer(small),
            None => Value::BigInteger(n),
        }
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<BigDecimal> for Value {
    fn from(d: BigDecimal) -> Self {
        Value::BigDecimal(d)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(arr: Vec<Value>) -> Self {
        Value::Array(arr)
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(obj: HashMap<String, Value>) -> Self {
        Value::Object(obj)
    }
}
