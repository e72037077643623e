//! Error types for inspection and realm construction

use crate::value::ObjectId;
use thiserror::Error;

/// Result type for inspection queries
pub type InspectResult<T> = Result<T, InspectError>;

/// Result type for realm construction
pub type RealmResult<T> = Result<T, RealmError>;

/// Errors raised by instance checks
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InspectError {
    /// The type argument of an instance check is not constructor-like
    #[error("Invalid type argument: expected a constructor, got {found}")]
    InvalidTypeArgument {
        /// Description of the rejected argument
        found: String,
    },
}

/// Errors raised while building a realm
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RealmError {
    /// Object id not minted by this realm
    #[error("Unknown object: {0}")]
    UnknownObject(ObjectId),

    /// A function was required
    #[error("Object {0} is not a function")]
    NotAFunction(ObjectId),

    /// A constructor (function with a prototype) was required
    #[error("Object {0} is not a constructor")]
    NotAConstructor(ObjectId),

    /// Built-in constructors keep their prototype for the realm's lifetime
    #[error("Prototype of built-in constructor {0} is read-only")]
    ReadOnlyPrototype(ObjectId),

    /// Assigning the prototype would make the chain loop back on itself
    #[error("Cyclic prototype chain through object {0}")]
    CyclicPrototype(ObjectId),
}
