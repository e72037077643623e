//! Vinspect - runtime value inspection
//!
//! Answers a fixed set of structural questions about values living in a
//! dynamic object model:
//! - is the value present?
//! - what is its effective constructor?
//! - is it an instance of a constructor, following the actual prototype chain
//!   and, as a fallback, declared-parent markers on constructors?
//!
//! The same questions lift over collections with `each` (all elements) and
//! `any` (some element).
//!
//! # Example
//!
//! ```ignore
//! use vinspect::{Realm, Value};
//!
//! let mut realm = Realm::new();
//! let number = realm.intrinsics().number();
//! let list = Value::Object(realm.create_array([1, 2, 3]));
//!
//! assert!(realm.inspect(&list).each().instance_of(number)?);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod classify;
pub mod config;
pub mod defaults;
pub mod error;
pub mod inspect;
pub mod object;
pub mod quantify;
pub mod realm;
pub mod resolve;
pub mod value;

pub use classify::{classify, effective_constructor, Classification, ValueCategory};
pub use config::InspectOptions;
pub use error::{InspectError, InspectResult, RealmError, RealmResult};
pub use inspect::{inspect, Inspected};
pub use object::{Function, Intrinsic, Object, ObjectKind};
pub use quantify::{Quantification, Quantifier};
pub use realm::{Intrinsics, PrototypeChain, Realm};
pub use resolve::{Constructor, InstanceResolver};
pub use value::{ObjectId, Value};
