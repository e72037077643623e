//! Instance resolution
//!
//! Decides whether a value is an instance of a constructor. Membership is
//! settled, in order, by the absent check, the universal `Object` rule, the
//! invalid-number and arguments exclusions, the effective constructor, the
//! actual prototype chain, and finally the declared-parent fallback.
//!
//! Prototype evidence always wins: the declared-parent walk starts from the
//! value's effective constructor, which is itself derived from the actual
//! chain. A constructor whose marker names `A` but whose prototype was
//! borrowed from `B` is never consulted, because its instances report `B`.

use crate::classify::{classify, numeric_value};
use crate::error::{InspectError, InspectResult};
use crate::object::{Intrinsic, ObjectKind};
use crate::realm::Realm;
use crate::value::{ObjectId, Value};
use rustc_hash::FxHashSet;
use tracing::{debug, trace, warn};

/// A type argument that passed validation
///
/// Only [`InstanceResolver::constructor_arg`] mints these, so holding one
/// means the id names a function with a `.prototype` in the resolver's realm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Constructor(ObjectId);

impl Constructor {
    /// Id of the constructor function
    #[inline]
    pub fn id(self) -> ObjectId {
        self.0
    }
}

impl From<Constructor> for Value {
    fn from(ctor: Constructor) -> Self {
        Value::Object(ctor.0)
    }
}

/// Context for instance checks against a realm
#[derive(Debug, Clone, Copy)]
pub struct InstanceResolver<'r> {
    realm: &'r Realm,
}

impl<'r> InstanceResolver<'r> {
    /// Create a resolver for a realm
    pub fn new(realm: &'r Realm) -> Self {
        Self { realm }
    }

    /// Validate a type argument, returning the constructor it names
    ///
    /// Only functions carrying a `.prototype` are constructor-like. Every
    /// other value is rejected with [`InspectError::InvalidTypeArgument`].
    pub fn constructor_arg(&self, ty: &Value) -> InspectResult<Constructor> {
        let ctor = ty
            .as_object()
            .filter(|&id| self.realm.function(id).is_some_and(|f| f.is_constructor()))
            .map(Constructor);

        ctor.ok_or_else(|| {
            let found = match ty.as_object().and_then(|id| self.realm.object(id)) {
                Some(object) => object.kind.name().to_string(),
                None => ty.describe(),
            };
            debug!(%found, "rejected type argument");
            InspectError::InvalidTypeArgument { found }
        })
    }

    /// Check if `raw` is an instance of the constructor `ty`
    pub fn is_instance(&self, raw: &Value, ty: &Value) -> InspectResult<bool> {
        let ctor = self.constructor_arg(ty)?;
        Ok(self.is_instance_of_constructor(raw, ctor))
    }

    /// Strict negation of [`is_instance`](Self::is_instance)
    pub fn is_not_instance(&self, raw: &Value, ty: &Value) -> InspectResult<bool> {
        self.is_instance(raw, ty).map(|is| !is)
    }

    /// Instance check against an already validated constructor
    pub fn is_instance_of_constructor(&self, raw: &Value, ctor: Constructor) -> bool {
        let ctor = ctor.id();
        if raw.is_absent() {
            trace!(%ctor, "absent value");
            return false;
        }

        let intrinsic = self.realm.intrinsic_of(ctor);
        match intrinsic {
            Some(Intrinsic::Object) => {
                trace!("every present value is an object");
                return true;
            }
            Some(Intrinsic::Number) => {
                // NaN and the infinities are not valid numbers
                if numeric_value(self.realm, raw).is_some_and(|n| !n.is_finite()) {
                    trace!("non-finite number excluded");
                    return false;
                }
            }
            Some(Intrinsic::Array) => {
                if self.is_arguments(raw) {
                    trace!("arguments object is not an array");
                    return false;
                }
            }
            _ => {}
        }

        let classification = classify(self.realm, raw);
        if classification.constructor == Some(ctor) {
            trace!(%ctor, "effective constructor matches");
            return true;
        }

        if let Value::Object(id) = raw {
            if self.chain_contains_prototype_of(*id, ctor) {
                trace!(%ctor, "prototype found on chain");
                return true;
            }
        }

        if self.realm.options().declared_parent_fallback {
            if let Some(start) = classification.constructor {
                if self.declared_parent_reaches(start, ctor) {
                    trace!(%start, %ctor, "declared parent matches");
                    return true;
                }
            }
        }

        trace!(%ctor, category = %classification.category, "no match");
        false
    }

    fn is_arguments(&self, raw: &Value) -> bool {
        raw.as_object()
            .and_then(|id| self.realm.object(id))
            .is_some_and(|o| matches!(o.kind, ObjectKind::Arguments(_)))
    }

    fn chain_contains_prototype_of(&self, id: ObjectId, ctor: ObjectId) -> bool {
        match self.realm.constructor_prototype(ctor) {
            Ok(proto) => self.realm.prototype_chain(id).any(|p| p == proto),
            Err(_) => false,
        }
    }

    /// Follow declared-parent markers upward from `start` looking for `target`
    fn declared_parent_reaches(&self, start: ObjectId, target: ObjectId) -> bool {
        let max_depth = self.realm.options().max_declared_parent_depth;
        let mut visited = FxHashSet::default();
        visited.insert(start);

        let mut current = start;
        for _ in 0..max_depth {
            let Some(parent) = self.realm.function(current).and_then(|f| f.declared_parent) else {
                return false;
            };
            if parent == target {
                return true;
            }
            if !visited.insert(parent) {
                warn!(%start, %parent, "declared parent cycle");
                return false;
            }
            current = parent;
        }

        if self.realm.function(current).is_some_and(|f| f.declared_parent.is_some()) {
            warn!(%start, max_depth, "declared parent walk hit depth limit");
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InspectOptions;

    fn obj(id: ObjectId) -> Value {
        Value::Object(id)
    }

    #[test]
    fn test_constructor_arg_accepts_functions_with_prototype() {
        let mut realm = Realm::new();
        let a = realm.define_function("A");
        let resolver = InstanceResolver::new(&realm);

        let ctor = resolver.constructor_arg(&obj(a)).unwrap();
        assert_eq!(ctor.id(), a);
        assert_eq!(Value::from(ctor), obj(a));
    }

    #[test]
    fn test_plain_object_is_not_a_constructor() {
        let mut realm = Realm::new();
        let plain = realm.create_plain_object([("a", 1)]);
        let resolver = InstanceResolver::new(&realm);
        let rejected = InspectError::InvalidTypeArgument {
            found: "object".to_string(),
        };

        // no Constructor can be obtained for it, so no bool answer either
        assert_eq!(resolver.constructor_arg(&obj(plain)).unwrap_err(), rejected);
        assert_eq!(resolver.is_instance(&Value::from(1), &obj(plain)).unwrap_err(), rejected);
        assert_eq!(resolver.is_not_instance(&Value::from(1), &obj(plain)).unwrap_err(), rejected);
    }

    #[test]
    fn test_validated_constructor_is_reusable() {
        let mut realm = Realm::new();
        let a = realm.define_function("A");
        let instance = obj(realm.construct(a).unwrap());
        let resolver = InstanceResolver::new(&realm);
        let ctor = resolver.constructor_arg(&obj(a)).unwrap();

        assert!(resolver.is_instance_of_constructor(&instance, ctor));
        assert!(!resolver.is_instance_of_constructor(&Value::from(2), ctor));
        assert!(!resolver.is_instance_of_constructor(&Value::Null, ctor));
    }

    #[test]
    fn test_constructor_arg_rejects_callables_without_prototype() {
        let mut realm = Realm::new();
        let f = realm.define_callable("f");
        let resolver = InstanceResolver::new(&realm);

        assert_eq!(
            resolver.constructor_arg(&obj(f)),
            Err(InspectError::InvalidTypeArgument {
                found: "function".to_string()
            })
        );
    }

    #[test]
    fn test_validation_precedes_absent_check() {
        let realm = Realm::new();
        let resolver = InstanceResolver::new(&realm);

        assert!(resolver.is_instance(&Value::Null, &Value::from(2)).is_err());
        assert_eq!(
            resolver.is_instance(&Value::Null, &obj(realm.intrinsics().object())),
            Ok(false)
        );
    }

    #[test]
    fn test_negative_infinity_is_not_a_number() {
        let mut realm = Realm::new();
        let number = obj(realm.intrinsics().number());
        let boxed = realm.box_primitive(&Value::from(f64::NEG_INFINITY)).unwrap();
        let resolver = InstanceResolver::new(&realm);

        assert_eq!(resolver.is_instance(&Value::from(f64::NEG_INFINITY), &number), Ok(false));
        assert_eq!(resolver.is_instance(&obj(boxed), &number), Ok(false));
        assert_eq!(resolver.is_instance(&Value::from(-0.0), &number), Ok(true));
    }

    #[test]
    fn test_multi_level_declared_parents() {
        let mut realm = Realm::new();
        let a = realm.define_function("A");
        let b = realm.define_function("B");
        let c = realm.define_function("C");
        realm.set_declared_parent(b, Some(a)).unwrap();
        realm.set_declared_parent(c, Some(b)).unwrap();
        let instance = realm.construct(c).unwrap();
        let resolver = InstanceResolver::new(&realm);

        assert_eq!(resolver.is_instance(&obj(instance), &obj(b)), Ok(true));
        assert_eq!(resolver.is_instance(&obj(instance), &obj(a)), Ok(true));
    }

    #[test]
    fn test_declared_parent_cycle_terminates() {
        let mut realm = Realm::new();
        let a = realm.define_function("A");
        let b = realm.define_function("B");
        let unrelated = realm.define_function("Unrelated");
        realm.set_declared_parent(a, Some(b)).unwrap();
        realm.set_declared_parent(b, Some(a)).unwrap();
        let instance = realm.construct(a).unwrap();
        let resolver = InstanceResolver::new(&realm);

        assert_eq!(resolver.is_instance(&obj(instance), &obj(b)), Ok(true));
        assert_eq!(resolver.is_instance(&obj(instance), &obj(unrelated)), Ok(false));
    }

    #[test]
    fn test_depth_limit() {
        let mut realm = Realm::with_options(InspectOptions::new().with_max_declared_parent_depth(1));
        let a = realm.define_function("A");
        let b = realm.define_function("B");
        let c = realm.define_function("C");
        realm.set_declared_parent(b, Some(a)).unwrap();
        realm.set_declared_parent(c, Some(b)).unwrap();
        let instance = realm.construct(c).unwrap();
        let resolver = InstanceResolver::new(&realm);

        assert_eq!(resolver.is_instance(&obj(instance), &obj(b)), Ok(true));
        assert_eq!(resolver.is_instance(&obj(instance), &obj(a)), Ok(false));
    }

    #[test]
    fn test_fallback_can_be_disabled() {
        let mut realm = Realm::with_options(InspectOptions::new().with_declared_parent_fallback(false));
        let a = realm.define_function("A");
        let d = realm.define_function("D");
        realm.set_declared_parent(d, Some(a)).unwrap();
        let instance = realm.construct(d).unwrap();
        let resolver = InstanceResolver::new(&realm);

        assert_eq!(resolver.is_instance(&obj(instance), &obj(a)), Ok(false));
        assert_eq!(resolver.is_instance(&obj(instance), &obj(d)), Ok(true));
    }

    #[test]
    fn test_primitives_have_no_chain() {
        let mut realm = Realm::new();
        let number = realm.intrinsics().number();
        let number_proto = realm.constructor_prototype(number).unwrap();
        let fake = realm.define_function("Fake");
        realm.set_prototype_property(fake, number_proto).unwrap();
        let resolver = InstanceResolver::new(&realm);

        assert_eq!(resolver.is_instance(&Value::from(2), &obj(fake)), Ok(false));
    }

    #[test]
    fn test_is_not_instance_shares_errors() {
        let realm = Realm::new();
        let resolver = InstanceResolver::new(&realm);

        assert!(resolver.is_not_instance(&Value::from(1), &Value::from("2")).is_err());
        assert_eq!(
            resolver.is_not_instance(&Value::from("2"), &obj(realm.intrinsics().string())),
            Ok(false)
        );
    }
}
