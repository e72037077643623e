//! Type classification
//!
//! Maps a raw value to its [`ValueCategory`] and effective constructor.
//! Nothing is cached: the same value is reclassified on every query.

use crate::object::{Intrinsic, ObjectKind};
use crate::realm::Realm;
use crate::value::{ObjectId, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Run-time shape of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueCategory {
    /// `undefined` or `null`
    Absent,
    /// Primitive boolean
    Boolean,
    /// Primitive number
    Number,
    /// Primitive string
    String,
    /// Array
    Array,
    /// Object whose prototype is `Object.prototype` (or none)
    PlainObject,
    /// Callable
    Function,
    /// Date
    Date,
    /// Regular expression
    #[serde(rename = "regexp")]
    RegExp,
    /// Error
    Error,
    /// Boxed boolean, number, or string
    BoxedPrimitive,
    /// Host-provided object, including the arguments pseudo-array
    HostObject,
    /// Object created from a user-defined constructor
    CustomObject,
}

impl ValueCategory {
    /// Category name as used in diagnostics
    pub fn name(self) -> &'static str {
        match self {
            ValueCategory::Absent => "absent",
            ValueCategory::Boolean => "boolean",
            ValueCategory::Number => "number",
            ValueCategory::String => "string",
            ValueCategory::Array => "array",
            ValueCategory::PlainObject => "plain-object",
            ValueCategory::Function => "function",
            ValueCategory::Date => "date",
            ValueCategory::RegExp => "regexp",
            ValueCategory::Error => "error",
            ValueCategory::BoxedPrimitive => "boxed-primitive",
            ValueCategory::HostObject => "host-object",
            ValueCategory::CustomObject => "custom-object",
        }
    }
}

impl fmt::Display for ValueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of classifying a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Value category
    pub category: ValueCategory,
    /// Effective constructor (None for absent values and orphan objects)
    pub constructor: Option<ObjectId>,
}

impl Classification {
    fn new(category: ValueCategory, constructor: Option<ObjectId>) -> Self {
        Self {
            category,
            constructor,
        }
    }
}

/// Classify a value.
///
/// Primitives and their boxed forms report the same built-in constructor.
/// Composite built-ins report the constructor matching their kind. Every
/// other object reports the first `constructor` found on its actual
/// prototype chain; declared-parent markers never affect the result.
pub fn classify(realm: &Realm, raw: &Value) -> Classification {
    let intrinsics = realm.intrinsics();
    let builtin = |category, intrinsic| {
        Classification::new(category, Some(intrinsics.constructor(intrinsic)))
    };

    let id = match raw {
        Value::Undefined | Value::Null => return Classification::new(ValueCategory::Absent, None),
        Value::Bool(_) => return builtin(ValueCategory::Boolean, Intrinsic::Boolean),
        Value::Number(_) => return builtin(ValueCategory::Number, Intrinsic::Number),
        Value::String(_) => return builtin(ValueCategory::String, Intrinsic::String),
        Value::Object(id) => *id,
    };

    let Some(object) = realm.object(id) else {
        // Foreign handle: present, but nothing to resolve
        return Classification::new(ValueCategory::CustomObject, None);
    };

    match &object.kind {
        ObjectKind::Array(_) => builtin(ValueCategory::Array, Intrinsic::Array),
        ObjectKind::Function(_) => builtin(ValueCategory::Function, Intrinsic::Function),
        ObjectKind::Date(_) => builtin(ValueCategory::Date, Intrinsic::Date),
        ObjectKind::RegExp { .. } => builtin(ValueCategory::RegExp, Intrinsic::RegExp),
        ObjectKind::Error { .. } => builtin(ValueCategory::Error, Intrinsic::Error),
        ObjectKind::Boolean(_) => builtin(ValueCategory::BoxedPrimitive, Intrinsic::Boolean),
        ObjectKind::Number(_) => builtin(ValueCategory::BoxedPrimitive, Intrinsic::Number),
        ObjectKind::String(_) => builtin(ValueCategory::BoxedPrimitive, Intrinsic::String),
        ObjectKind::Arguments(_) | ObjectKind::Host { .. } => {
            Classification::new(ValueCategory::HostObject, chain_constructor(realm, id))
        }
        ObjectKind::Ordinary => {
            let object_proto = intrinsics.prototype(Intrinsic::Object);
            let category = match object.proto {
                None => ValueCategory::PlainObject,
                Some(p) if p == object_proto => ValueCategory::PlainObject,
                Some(_) => ValueCategory::CustomObject,
            };
            Classification::new(category, chain_constructor(realm, id))
        }
    }
}

/// Effective constructor of a value
pub fn effective_constructor(realm: &Realm, raw: &Value) -> Option<ObjectId> {
    classify(realm, raw).constructor
}

/// Nearest function referenced by a `constructor` property along the
/// object's actual prototype chain
fn chain_constructor(realm: &Realm, id: ObjectId) -> Option<ObjectId> {
    realm.prototype_chain(id).find_map(|proto| {
        realm
            .object(proto)
            .and_then(|o| o.own_constructor())
            .filter(|&ctor| realm.function(ctor).is_some())
    })
}

/// Numeric payload of a primitive or boxed number
pub fn numeric_value(realm: &Realm, raw: &Value) -> Option<f64> {
    raw.as_number().or_else(|| {
        match realm.object(raw.as_object()?).map(|o| &o.kind) {
            Some(ObjectKind::Number(n)) => Some(*n),
            _ => None,
        }
    })
}
