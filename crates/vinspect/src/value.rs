//! Value representation
//!
//! A `Value` is either a primitive stored inline or a handle to an object
//! living in a [`Realm`](crate::realm::Realm) heap.

use std::fmt;
use std::sync::Arc;

/// Handle to an object stored in a realm heap.
///
/// Ids are only meaningful for the realm that minted them. Ids are 32-bit,
/// so a realm holds at most `u32::MAX + 1` objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u32);

impl ObjectId {
    /// Index of the object inside the realm heap
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Id for a heap index, `None` past the 32-bit id space
    #[inline]
    pub(crate) fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(ObjectId)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A dynamically typed value.
///
/// `Undefined` and `Null` are the two absent sentinels; everything else is
/// present.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// No value ("not yet assigned")
    #[default]
    Undefined,
    /// Explicit absence of a value
    Null,
    /// Primitive boolean
    Bool(bool),
    /// Primitive number (IEEE 754 double)
    Number(f64),
    /// Primitive string
    String(Arc<str>),
    /// Reference to a heap object
    Object(ObjectId),
}

impl Value {
    /// Create a primitive string value
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::String(s.into())
    }

    /// Check if this is one of the absent sentinels
    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Get the object handle if this is an object reference
    #[inline]
    pub fn as_object(&self) -> Option<ObjectId> {
        match self {
            Value::Object(id) => Some(*id),
            _ => None,
        }
    }

    /// Get as f64 if this is a primitive number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Short description of the value's shape, used in error messages
    pub fn describe(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => format!("boolean {}", b),
            Value::Number(n) => format!("number {}", n),
            Value::String(s) => format!("string {:?}", s),
            Value::Object(id) => format!("object {}", id),
        }
    }
}

// Identity semantics: numbers compare by bit pattern so that NaN equals itself,
// strings by content, objects by handle.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into())
    }
}

impl From<ObjectId> for Value {
    fn from(id: ObjectId) -> Self {
        Value::Object(id)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
