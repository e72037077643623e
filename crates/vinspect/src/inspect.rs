//! Wrapped values
//!
//! [`Inspected`] is the per-query handle over a raw value. It borrows the
//! value and its realm, stores nothing derived, and is dropped after use.

use crate::classify::{classify, Classification, ValueCategory};
use crate::error::InspectResult;
use crate::quantify::{Quantification, Quantifier};
use crate::realm::Realm;
use crate::resolve::InstanceResolver;
use crate::value::{ObjectId, Value};

/// Handle exposing presence and instance checks for one value
#[derive(Debug, Clone, Copy)]
pub struct Inspected<'r> {
    realm: &'r Realm,
    raw: &'r Value,
}

impl<'r> Inspected<'r> {
    /// Wrap a value
    pub fn new(realm: &'r Realm, raw: &'r Value) -> Self {
        Self { realm, raw }
    }

    /// The wrapped value
    pub fn raw(&self) -> &'r Value {
        self.raw
    }

    /// The realm the value lives in
    pub fn realm(&self) -> &'r Realm {
        self.realm
    }

    /// Category and effective constructor, computed fresh
    pub fn classify(&self) -> Classification {
        classify(self.realm, self.raw)
    }

    /// Value category
    pub fn category(&self) -> ValueCategory {
        self.classify().category
    }

    /// True unless the value is `undefined` or `null`
    pub fn is_set(&self) -> bool {
        !self.raw.is_absent()
    }

    /// Negation of [`is_set`](Self::is_set)
    pub fn is_not_set(&self) -> bool {
        !self.is_set()
    }

    /// Effective constructor, `None` for absent values
    pub fn get_constructor(&self) -> Option<ObjectId> {
        self.classify().constructor
    }

    /// Alias of [`get_constructor`](Self::get_constructor)
    #[inline]
    pub fn get_class(&self) -> Option<ObjectId> {
        self.get_constructor()
    }

    /// Check membership in the constructor `ty`
    ///
    /// Fails with [`InvalidTypeArgument`](crate::InspectError::InvalidTypeArgument)
    /// when `ty` is not constructor-like, even if the value is absent.
    pub fn instance_of(&self, ty: impl Into<Value>) -> InspectResult<bool> {
        InstanceResolver::new(self.realm).is_instance(self.raw, &ty.into())
    }

    /// Alias of [`instance_of`](Self::instance_of)
    #[inline]
    pub fn type_of(&self, ty: impl Into<Value>) -> InspectResult<bool> {
        self.instance_of(ty)
    }

    /// Strict negation of [`instance_of`](Self::instance_of)
    pub fn not_instance_of(&self, ty: impl Into<Value>) -> InspectResult<bool> {
        InstanceResolver::new(self.realm).is_not_instance(self.raw, &ty.into())
    }

    /// Alias of [`not_instance_of`](Self::not_instance_of)
    #[inline]
    pub fn not_type_of(&self, ty: impl Into<Value>) -> InspectResult<bool> {
        self.not_instance_of(ty)
    }

    /// Universal view over the value's elements
    pub fn each(&self) -> Quantifier<'r> {
        Quantifier::new(*self, Quantification::All)
    }

    /// Existential view over the value's elements
    pub fn any(&self) -> Quantifier<'r> {
        Quantifier::new(*self, Quantification::Any)
    }
}

/// Wrap a value for inspection
pub fn inspect<'r>(realm: &'r Realm, value: &'r Value) -> Inspected<'r> {
    Inspected::new(realm, value)
}
