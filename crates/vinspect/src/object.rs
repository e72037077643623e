//! Object model and constructor metadata

use crate::value::{ObjectId, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Name of the own property a prototype uses to point back at its constructor
pub const CONSTRUCTOR_KEY: &str = "constructor";

/// Built-in constructors every realm provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intrinsic {
    /// `Object`, the universal object type
    Object,
    /// `Function`
    Function,
    /// `Boolean`
    Boolean,
    /// `Number`
    Number,
    /// `String`
    String,
    /// `Array`
    Array,
    /// `Date`
    Date,
    /// `RegExp`
    RegExp,
    /// `Error`
    Error,
}

impl Intrinsic {
    /// All intrinsics, in bootstrap order
    pub const ALL: [Intrinsic; 9] = [
        Intrinsic::Object,
        Intrinsic::Function,
        Intrinsic::Boolean,
        Intrinsic::Number,
        Intrinsic::String,
        Intrinsic::Array,
        Intrinsic::Date,
        Intrinsic::RegExp,
        Intrinsic::Error,
    ];

    /// Constructor name
    pub fn name(self) -> &'static str {
        match self {
            Intrinsic::Object => "Object",
            Intrinsic::Function => "Function",
            Intrinsic::Boolean => "Boolean",
            Intrinsic::Number => "Number",
            Intrinsic::String => "String",
            Intrinsic::Array => "Array",
            Intrinsic::Date => "Date",
            Intrinsic::RegExp => "RegExp",
            Intrinsic::Error => "Error",
        }
    }
}

impl fmt::Display for Intrinsic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Function metadata
///
/// A function is constructor-like only while it carries a `prototype`.
#[derive(Debug, Clone)]
pub struct Function {
    /// Function name
    pub name: String,
    /// The `.prototype` object instances are created from
    pub prototype: Option<ObjectId>,
    /// Declared parent marker (single parent, read from the constructor)
    pub declared_parent: Option<ObjectId>,
    /// Set for the realm's built-in constructors
    pub intrinsic: Option<Intrinsic>,
}

impl Function {
    /// Create a function without a prototype
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prototype: None,
            declared_parent: None,
            intrinsic: None,
        }
    }

    /// Whether the function can appear on the right-hand side of a type check
    pub fn is_constructor(&self) -> bool {
        self.prototype.is_some()
    }
}

/// Internal shape of a heap object
#[derive(Debug, Clone)]
pub enum ObjectKind {
    /// Plain or custom-constructed object
    Ordinary,
    /// Array with its elements
    Array(Vec<Value>),
    /// Callable
    Function(Function),
    /// Date holding a time value in milliseconds
    Date(f64),
    /// Regular expression literal
    RegExp {
        /// Pattern source
        source: String,
        /// Flags such as `gi`
        flags: String,
    },
    /// Error object
    Error {
        /// Error message
        message: String,
    },
    /// Boxed boolean
    Boolean(bool),
    /// Boxed number
    Number(f64),
    /// Boxed string
    String(Arc<str>),
    /// Variadic arguments pseudo-array
    Arguments(Vec<Value>),
    /// Object provided by the embedding host
    Host {
        /// Host-defined tag, e.g. the element name
        tag: String,
    },
}

impl ObjectKind {
    /// Short kind name for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Ordinary => "object",
            ObjectKind::Array(_) => "array",
            ObjectKind::Function(_) => "function",
            ObjectKind::Date(_) => "date",
            ObjectKind::RegExp { .. } => "regexp",
            ObjectKind::Error { .. } => "error",
            ObjectKind::Boolean(_) => "boxed boolean",
            ObjectKind::Number(_) => "boxed number",
            ObjectKind::String(_) => "boxed string",
            ObjectKind::Arguments(_) => "arguments",
            ObjectKind::Host { .. } => "host object",
        }
    }
}

/// Heap object
#[derive(Debug, Clone)]
pub struct Object {
    /// Actual prototype link (None for the root of a chain)
    pub proto: Option<ObjectId>,
    /// Internal shape
    pub kind: ObjectKind,
    /// Own properties in insertion order
    pub properties: IndexMap<String, Value>,
}

impl Object {
    /// Create an object with no own properties
    pub fn new(proto: Option<ObjectId>, kind: ObjectKind) -> Self {
        Self {
            proto,
            kind,
            properties: IndexMap::new(),
        }
    }

    /// Get an own property
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Set an own property, keeping the original insertion slot on overwrite
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.properties.insert(key.into(), value);
    }

    /// Get function metadata if this object is callable
    pub fn as_function(&self) -> Option<&Function> {
        match &self.kind {
            ObjectKind::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Get mutable function metadata if this object is callable
    pub fn as_function_mut(&mut self) -> Option<&mut Function> {
        match &mut self.kind {
            ObjectKind::Function(f) => Some(f),
            _ => None,
        }
    }

    /// The object's own `constructor` reference, if it points at an object
    pub fn own_constructor(&self) -> Option<ObjectId> {
        self.get(CONSTRUCTOR_KEY).and_then(Value::as_object)
    }
}
