//! Quantifier views
//!
//! A [`Quantifier`] re-exposes the predicate surface of [`Inspected`] over the
//! elements of a collection: arrays and arguments objects in index order,
//! every other object in own-property insertion order. Primitives and absent
//! values have no elements. String primitives are not split into characters,
//! so `inspect("abc").each()` holds vacuously and `any()` never does.
//!
//! The existential mode is defined through the universal one
//! (`any(P) == !all(!P)`), so `each().p()` and `any().not_p()` can never
//! disagree.

use crate::error::InspectResult;
use crate::inspect::Inspected;
use crate::object::ObjectKind;
use crate::resolve::InstanceResolver;
use crate::value::Value;
use std::convert::Infallible;

/// Quantification mode of a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantification {
    /// Every element satisfies the predicate (true when empty)
    All,
    /// Some element satisfies the predicate (false when empty)
    Any,
}

/// Collection-level view over a wrapped value
#[derive(Debug, Clone, Copy)]
pub struct Quantifier<'r> {
    target: Inspected<'r>,
    mode: Quantification,
}

impl<'r> Quantifier<'r> {
    /// Create a view over `target`'s elements
    pub fn new(target: Inspected<'r>, mode: Quantification) -> Self {
        Self { target, mode }
    }

    /// Quantification mode
    pub fn mode(&self) -> Quantification {
        self.mode
    }

    /// Elements of the wrapped collection, each wrapped for inspection
    pub fn elements(&self) -> impl Iterator<Item = Inspected<'r>> + 'r {
        let realm = self.target.realm();
        let object = self.target.raw().as_object().and_then(|id| realm.object(id));

        let values: Box<dyn Iterator<Item = &'r Value> + 'r> = match object {
            Some(o) => match &o.kind {
                ObjectKind::Array(items) | ObjectKind::Arguments(items) => Box::new(items.iter()),
                _ => Box::new(o.properties.values()),
            },
            None => Box::new(std::iter::empty()),
        };

        values.map(move |v| Inspected::new(realm, v))
    }

    fn all<E>(
        &self,
        mut pred: impl FnMut(&Inspected<'r>) -> Result<bool, E>,
    ) -> Result<bool, E> {
        for element in self.elements() {
            if !pred(&element)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn reduce<E>(
        &self,
        mut pred: impl FnMut(&Inspected<'r>) -> Result<bool, E>,
    ) -> Result<bool, E> {
        match self.mode {
            Quantification::All => self.all(pred),
            Quantification::Any => self.all(|e| pred(e).map(|b| !b)).map(|b| !b),
        }
    }

    fn reduce_infallible(&self, mut pred: impl FnMut(&Inspected<'r>) -> bool) -> bool {
        match self.reduce::<Infallible>(|e| Ok(pred(e))) {
            Ok(b) => b,
            Err(never) => match never {},
        }
    }

    /// Presence over the elements
    pub fn is_set(&self) -> bool {
        self.reduce_infallible(Inspected::is_set)
    }

    /// Absence over the elements
    pub fn is_not_set(&self) -> bool {
        self.reduce_infallible(Inspected::is_not_set)
    }

    /// Instance check over the elements
    ///
    /// The type argument is validated once, before any element is visited;
    /// an invalid argument fails the whole check, even on an empty collection.
    pub fn instance_of(&self, ty: impl Into<Value>) -> InspectResult<bool> {
        let resolver = InstanceResolver::new(self.target.realm());
        let ctor = resolver.constructor_arg(&ty.into())?;
        self.reduce(|e| Ok(resolver.is_instance_of_constructor(e.raw(), ctor)))
    }

    /// Alias of [`instance_of`](Self::instance_of)
    #[inline]
    pub fn type_of(&self, ty: impl Into<Value>) -> InspectResult<bool> {
        self.instance_of(ty)
    }

    /// Negated instance check over the elements
    pub fn not_instance_of(&self, ty: impl Into<Value>) -> InspectResult<bool> {
        let resolver = InstanceResolver::new(self.target.realm());
        let ctor = resolver.constructor_arg(&ty.into())?;
        self.reduce(|e| Ok(!resolver.is_instance_of_constructor(e.raw(), ctor)))
    }

    /// Alias of [`not_instance_of`](Self::not_instance_of)
    #[inline]
    pub fn not_type_of(&self, ty: impl Into<Value>) -> InspectResult<bool> {
        self.not_instance_of(ty)
    }
}
