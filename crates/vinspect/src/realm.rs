//! Realm: object heap and constructor registry
//!
//! A realm owns every object reachable from a [`Value`], the built-in
//! constructors, and the prototype links between them. Inspection borrows a
//! realm immutably; only the builder methods take `&mut self`.

use crate::config::InspectOptions;
use crate::error::{RealmError, RealmResult};
use crate::inspect::Inspected;
use crate::object::{Function, Intrinsic, Object, ObjectKind, CONSTRUCTOR_KEY};
use crate::value::{ObjectId, Value};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::debug;

/// Handles to the realm's built-in constructors and their prototypes
#[derive(Debug, Clone)]
pub struct Intrinsics {
    constructors: [ObjectId; 9],
    prototypes: [ObjectId; 9],
}

impl Intrinsics {
    fn slot(intrinsic: Intrinsic) -> usize {
        intrinsic as usize
    }

    /// Constructor of a built-in
    pub fn constructor(&self, intrinsic: Intrinsic) -> ObjectId {
        self.constructors[Self::slot(intrinsic)]
    }

    /// Prototype of a built-in
    pub fn prototype(&self, intrinsic: Intrinsic) -> ObjectId {
        self.prototypes[Self::slot(intrinsic)]
    }

    /// `Object`
    pub fn object(&self) -> ObjectId {
        self.constructor(Intrinsic::Object)
    }

    /// `Function`
    pub fn function(&self) -> ObjectId {
        self.constructor(Intrinsic::Function)
    }

    /// `Boolean`
    pub fn boolean(&self) -> ObjectId {
        self.constructor(Intrinsic::Boolean)
    }

    /// `Number`
    pub fn number(&self) -> ObjectId {
        self.constructor(Intrinsic::Number)
    }

    /// `String`
    pub fn string(&self) -> ObjectId {
        self.constructor(Intrinsic::String)
    }

    /// `Array`
    pub fn array(&self) -> ObjectId {
        self.constructor(Intrinsic::Array)
    }

    /// `Date`
    pub fn date(&self) -> ObjectId {
        self.constructor(Intrinsic::Date)
    }

    /// `RegExp`
    pub fn regexp(&self) -> ObjectId {
        self.constructor(Intrinsic::RegExp)
    }

    /// `Error`
    pub fn error(&self) -> ObjectId {
        self.constructor(Intrinsic::Error)
    }

    /// All built-in constructors in bootstrap order
    pub fn all(&self) -> impl Iterator<Item = (Intrinsic, ObjectId)> + '_ {
        Intrinsic::ALL.iter().map(move |&i| (i, self.constructor(i)))
    }
}

/// Object heap plus constructor registry
#[derive(Debug)]
pub struct Realm {
    /// Objects indexed by id
    heap: Vec<Object>,
    /// Constructor name to id mapping
    name_to_id: FxHashMap<String, ObjectId>,
    intrinsics: Intrinsics,
    options: InspectOptions,
}

impl Realm {
    /// Create a realm with the built-in constructors and default options
    pub fn new() -> Self {
        Self::with_options(InspectOptions::default())
    }

    /// Create a realm with custom resolver options
    pub fn with_options(options: InspectOptions) -> Self {
        let placeholder = [ObjectId(0); 9];
        let mut realm = Self {
            heap: Vec::new(),
            name_to_id: FxHashMap::default(),
            intrinsics: Intrinsics {
                constructors: placeholder,
                prototypes: placeholder,
            },
            options,
        };
        realm.bootstrap();
        realm
    }

    fn bootstrap(&mut self) {
        let object_proto = self.alloc(Object::new(None, ObjectKind::Ordinary));
        let function_proto = self.alloc(Object::new(Some(object_proto), ObjectKind::Ordinary));

        for intrinsic in Intrinsic::ALL {
            let proto = match intrinsic {
                Intrinsic::Object => object_proto,
                Intrinsic::Function => function_proto,
                _ => self.alloc(Object::new(Some(object_proto), ObjectKind::Ordinary)),
            };
            let ctor = self.alloc_constructor(
                function_proto,
                Function {
                    name: intrinsic.name().to_string(),
                    prototype: Some(proto),
                    declared_parent: None,
                    intrinsic: Some(intrinsic),
                },
                proto,
            );
            let slot = Intrinsics::slot(intrinsic);
            self.intrinsics.constructors[slot] = ctor;
            self.intrinsics.prototypes[slot] = proto;
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Resolver options
    pub fn options(&self) -> &InspectOptions {
        &self.options
    }

    /// Built-in constructors
    pub fn intrinsics(&self) -> &Intrinsics {
        &self.intrinsics
    }

    /// Get object by id
    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.heap.get(id.index())
    }

    fn object_mut(&mut self, id: ObjectId) -> RealmResult<&mut Object> {
        self.heap
            .get_mut(id.index())
            .ok_or(RealmError::UnknownObject(id))
    }

    /// Get function metadata by id
    pub fn function(&self, id: ObjectId) -> Option<&Function> {
        self.object(id).and_then(Object::as_function)
    }

    /// The built-in an id stands for, if any
    pub fn intrinsic_of(&self, id: ObjectId) -> Option<Intrinsic> {
        self.function(id).and_then(|f| f.intrinsic)
    }

    /// Look up a constructor by name (the most recent definition wins)
    pub fn constructor_by_name(&self, name: &str) -> Option<ObjectId> {
        self.name_to_id.get(name).copied()
    }

    /// Name of a function
    pub fn constructor_name(&self, id: ObjectId) -> Option<&str> {
        self.function(id).map(|f| f.name.as_str())
    }

    /// Number of objects in the heap
    pub fn object_count(&self) -> usize {
        self.heap.len()
    }

    /// Walk the actual prototype chain of an object, starting at its
    /// immediate prototype
    pub fn prototype_chain(&self, id: ObjectId) -> PrototypeChain<'_> {
        PrototypeChain {
            realm: self,
            next: self.object(id).and_then(|o| o.proto),
            remaining: self.heap.len(),
        }
    }

    /// Wrap a value for inspection
    pub fn inspect<'r>(&'r self, value: &'r Value) -> Inspected<'r> {
        Inspected::new(self, value)
    }

    // ========================================================================
    // Constructors
    // ========================================================================

    /// # Panics
    ///
    /// Panics once the heap outgrows the 32-bit id space, the same way
    /// `Vec::push` panics on capacity overflow.
    fn alloc(&mut self, object: Object) -> ObjectId {
        let Some(id) = ObjectId::from_index(self.heap.len()) else {
            panic!("realm heap exhausted: object ids are 32-bit");
        };
        self.heap.push(object);
        id
    }

    /// Allocate a function that owns `proto` and point `proto.constructor` back at it
    fn alloc_constructor(
        &mut self,
        function_proto: ObjectId,
        function: Function,
        proto: ObjectId,
    ) -> ObjectId {
        let name = function.name.clone();
        let ctor = self.alloc(Object::new(Some(function_proto), ObjectKind::Function(function)));
        self.heap[proto.index()].set(CONSTRUCTOR_KEY, Value::Object(ctor));
        self.name_to_id.insert(name, ctor);
        ctor
    }

    fn function_proto(&self) -> ObjectId {
        self.intrinsics.prototype(Intrinsic::Function)
    }

    fn object_proto(&self) -> ObjectId {
        self.intrinsics.prototype(Intrinsic::Object)
    }

    /// Define a constructor function with a fresh prototype object
    pub fn define_function(&mut self, name: impl Into<String>) -> ObjectId {
        let object_proto = self.object_proto();
        let proto = self.alloc(Object::new(Some(object_proto), ObjectKind::Ordinary));
        let mut function = Function::new(name);
        function.prototype = Some(proto);
        let ctor = self.alloc_constructor(self.function_proto(), function, proto);
        debug!(name = %self.constructor_name(ctor).unwrap_or_default(), id = %ctor, "defined constructor");
        ctor
    }

    /// Define a callable without a prototype; it cannot anchor a type check
    pub fn define_callable(&mut self, name: impl Into<String>) -> ObjectId {
        let function_proto = self.function_proto();
        self.alloc(Object::new(
            Some(function_proto),
            ObjectKind::Function(Function::new(name)),
        ))
    }

    /// Define a host constructor whose prototype inherits from `parent`'s
    /// prototype (or from `Object.prototype` when there is no parent)
    pub fn define_host_constructor(
        &mut self,
        name: impl Into<String>,
        parent: Option<ObjectId>,
    ) -> RealmResult<ObjectId> {
        let parent_proto = match parent {
            Some(p) => self.constructor_prototype(p)?,
            None => self.object_proto(),
        };
        let proto = self.alloc(Object::new(Some(parent_proto), ObjectKind::Ordinary));
        let mut function = Function::new(name);
        function.prototype = Some(proto);
        Ok(self.alloc_constructor(self.function_proto(), function, proto))
    }

    /// The `.prototype` of a constructor
    pub fn constructor_prototype(&self, ctor: ObjectId) -> RealmResult<ObjectId> {
        let object = self.object(ctor).ok_or(RealmError::UnknownObject(ctor))?;
        let function = object.as_function().ok_or(RealmError::NotAFunction(ctor))?;
        function.prototype.ok_or(RealmError::NotAConstructor(ctor))
    }

    /// Instantiate a constructor (`new ctor()`)
    ///
    /// Built-in constructors produce their native object kind; every other
    /// constructor produces an ordinary object linked to its current prototype.
    pub fn construct(&mut self, ctor: ObjectId) -> RealmResult<ObjectId> {
        let proto = self.constructor_prototype(ctor)?;
        let kind = match self.intrinsic_of(ctor) {
            None | Some(Intrinsic::Object) => ObjectKind::Ordinary,
            Some(Intrinsic::Function) => ObjectKind::Function(Function::new("anonymous")),
            Some(Intrinsic::Boolean) => ObjectKind::Boolean(false),
            Some(Intrinsic::Number) => ObjectKind::Number(0.0),
            Some(Intrinsic::String) => ObjectKind::String(Arc::from("")),
            Some(Intrinsic::Array) => ObjectKind::Array(Vec::new()),
            Some(Intrinsic::Date) => ObjectKind::Date(0.0),
            Some(Intrinsic::RegExp) => ObjectKind::RegExp {
                source: "(?:)".to_string(),
                flags: String::new(),
            },
            Some(Intrinsic::Error) => ObjectKind::Error {
                message: String::new(),
            },
        };
        Ok(self.alloc(Object::new(Some(proto), kind)))
    }

    /// Create a plain object from key/value pairs, keeping their order
    pub fn create_plain_object<K, V, I>(&mut self, entries: I) -> ObjectId
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut object = Object::new(Some(self.object_proto()), ObjectKind::Ordinary);
        for (key, value) in entries {
            object.set(key, value.into());
        }
        self.alloc(object)
    }

    /// Create an object with an explicit prototype (`Object.create(proto)`)
    pub fn create_object_with_proto(&mut self, proto: Option<ObjectId>) -> RealmResult<ObjectId> {
        if let Some(p) = proto {
            self.object(p).ok_or(RealmError::UnknownObject(p))?;
        }
        Ok(self.alloc(Object::new(proto, ObjectKind::Ordinary)))
    }

    /// Create an array
    pub fn create_array<V, I>(&mut self, items: I) -> ObjectId
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        let proto = self.intrinsics.prototype(Intrinsic::Array);
        let items = items.into_iter().map(Into::into).collect();
        self.alloc(Object::new(Some(proto), ObjectKind::Array(items)))
    }

    /// Create a variadic arguments pseudo-array
    pub fn create_arguments<V, I>(&mut self, items: I) -> ObjectId
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        let proto = self.object_proto();
        let items = items.into_iter().map(Into::into).collect();
        self.alloc(Object::new(Some(proto), ObjectKind::Arguments(items)))
    }

    /// Create a date from milliseconds since the epoch
    pub fn create_date(&mut self, millis: f64) -> ObjectId {
        let proto = self.intrinsics.prototype(Intrinsic::Date);
        self.alloc(Object::new(Some(proto), ObjectKind::Date(millis)))
    }

    /// Create a regular expression
    pub fn create_regexp(&mut self, source: impl Into<String>, flags: impl Into<String>) -> ObjectId {
        let proto = self.intrinsics.prototype(Intrinsic::RegExp);
        self.alloc(Object::new(
            Some(proto),
            ObjectKind::RegExp {
                source: source.into(),
                flags: flags.into(),
            },
        ))
    }

    /// Create an error object
    pub fn create_error(&mut self, message: impl Into<String>) -> ObjectId {
        let proto = self.intrinsics.prototype(Intrinsic::Error);
        self.alloc(Object::new(
            Some(proto),
            ObjectKind::Error {
                message: message.into(),
            },
        ))
    }

    /// Create a host object from a host constructor
    pub fn create_host_object(&mut self, ctor: ObjectId, tag: impl Into<String>) -> RealmResult<ObjectId> {
        let proto = self.constructor_prototype(ctor)?;
        Ok(self.alloc(Object::new(Some(proto), ObjectKind::Host { tag: tag.into() })))
    }

    /// Box a primitive boolean, number, or string
    ///
    /// Returns `None` for absent values and objects.
    pub fn box_primitive(&mut self, value: &Value) -> Option<ObjectId> {
        let (intrinsic, kind) = match value {
            Value::Bool(b) => (Intrinsic::Boolean, ObjectKind::Boolean(*b)),
            Value::Number(n) => (Intrinsic::Number, ObjectKind::Number(*n)),
            Value::String(s) => (Intrinsic::String, ObjectKind::String(Arc::clone(s))),
            _ => return None,
        };
        let proto = self.intrinsics.prototype(intrinsic);
        Some(self.alloc(Object::new(Some(proto), kind)))
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Replace a constructor's `.prototype` (`Ctor.prototype = proto`)
    ///
    /// The new prototype's `constructor` property is left untouched, so
    /// instances created afterwards report whichever constructor owns it.
    pub fn set_prototype_property(&mut self, ctor: ObjectId, proto: ObjectId) -> RealmResult<()> {
        self.object(proto).ok_or(RealmError::UnknownObject(proto))?;
        let function = self
            .object_mut(ctor)?
            .as_function_mut()
            .ok_or(RealmError::NotAFunction(ctor))?;
        if function.intrinsic.is_some() {
            return Err(RealmError::ReadOnlyPrototype(ctor));
        }
        function.prototype = Some(proto);
        Ok(())
    }

    /// Attach (or clear) a declared-parent marker on a constructor
    pub fn set_declared_parent(&mut self, ctor: ObjectId, parent: Option<ObjectId>) -> RealmResult<()> {
        if let Some(p) = parent {
            self.function(p).ok_or(RealmError::NotAFunction(p))?;
        }
        let function = self
            .object_mut(ctor)?
            .as_function_mut()
            .ok_or(RealmError::NotAFunction(ctor))?;
        function.declared_parent = parent;
        Ok(())
    }

    /// Set an own property
    pub fn set_property(
        &mut self,
        id: ObjectId,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> RealmResult<()> {
        self.object_mut(id)?.set(key, value.into());
        Ok(())
    }

    /// Change an object's actual prototype (`Object.setPrototypeOf`)
    pub fn set_proto(&mut self, id: ObjectId, proto: Option<ObjectId>) -> RealmResult<()> {
        self.object(id).ok_or(RealmError::UnknownObject(id))?;
        if let Some(p) = proto {
            self.object(p).ok_or(RealmError::UnknownObject(p))?;
            if p == id || self.prototype_chain(p).any(|ancestor| ancestor == id) {
                return Err(RealmError::CyclicPrototype(id));
            }
        }
        self.object_mut(id)?.proto = proto;
        Ok(())
    }
}

impl Default for Realm {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over an object's actual prototype chain
pub struct PrototypeChain<'r> {
    realm: &'r Realm,
    next: Option<ObjectId>,
    remaining: usize,
}

impl Iterator for PrototypeChain<'_> {
    type Item = ObjectId;

    fn next(&mut self) -> Option<ObjectId> {
        let current = self.next?;
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.next = self.realm.object(current).and_then(|o| o.proto);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intrinsics_are_registered() {
        let realm = Realm::new();
        for (intrinsic, ctor) in realm.intrinsics().all() {
            assert_eq!(realm.constructor_by_name(intrinsic.name()), Some(ctor));
            assert_eq!(realm.intrinsic_of(ctor), Some(intrinsic));
        }
    }

    #[test]
    fn test_named_intrinsic_accessors() {
        let realm = Realm::new();
        let intrinsics = realm.intrinsics();
        let named = [
            (intrinsics.object(), Intrinsic::Object),
            (intrinsics.function(), Intrinsic::Function),
            (intrinsics.boolean(), Intrinsic::Boolean),
            (intrinsics.number(), Intrinsic::Number),
            (intrinsics.string(), Intrinsic::String),
            (intrinsics.array(), Intrinsic::Array),
            (intrinsics.date(), Intrinsic::Date),
            (intrinsics.regexp(), Intrinsic::RegExp),
            (intrinsics.error(), Intrinsic::Error),
        ];

        for (ctor, intrinsic) in named {
            assert_eq!(ctor, intrinsics.constructor(intrinsic));
            assert_eq!(realm.constructor_name(ctor), Some(intrinsic.name()));
        }
    }

    #[test]
    fn test_object_count_tracks_allocations() {
        let mut realm = Realm::new();
        // Object and Function share the two root prototypes
        assert_eq!(realm.object_count(), 2 * Intrinsic::ALL.len());

        let before = realm.object_count();
        let a = realm.define_function("A");
        realm.construct(a).unwrap();
        assert_eq!(realm.object_count(), before + 3);
    }

    #[test]
    fn test_intrinsic_prototype_points_back() {
        let realm = Realm::new();
        let number = realm.intrinsics().number();
        let proto = realm.constructor_prototype(number).unwrap();
        assert_eq!(realm.object(proto).unwrap().own_constructor(), Some(number));
    }

    #[test]
    fn test_define_function() {
        let mut realm = Realm::new();
        let a = realm.define_function("A");

        assert_eq!(realm.constructor_by_name("A"), Some(a));
        assert_eq!(realm.constructor_name(a), Some("A"));

        let proto = realm.constructor_prototype(a).unwrap();
        assert_eq!(realm.object(proto).unwrap().own_constructor(), Some(a));
    }

    #[test]
    fn test_construct_links_prototype() {
        let mut realm = Realm::new();
        let a = realm.define_function("A");
        let obj = realm.construct(a).unwrap();

        let chain: Vec<ObjectId> = realm.prototype_chain(obj).collect();
        let object_proto = realm.intrinsics().prototype(Intrinsic::Object);
        assert_eq!(chain, vec![realm.constructor_prototype(a).unwrap(), object_proto]);
    }

    #[test]
    fn test_construct_builtin_produces_native_kind() {
        let mut realm = Realm::new();
        let array = realm.intrinsics().array();
        let obj = realm.construct(array).unwrap();
        assert!(matches!(realm.object(obj).unwrap().kind, ObjectKind::Array(_)));
    }

    #[test]
    fn test_construct_non_constructor() {
        let mut realm = Realm::new();
        let f = realm.define_callable("f");
        assert_eq!(realm.construct(f), Err(RealmError::NotAConstructor(f)));

        let plain = realm.create_plain_object([("a", 1)]);
        assert_eq!(realm.construct(plain), Err(RealmError::NotAFunction(plain)));
    }

    #[test]
    fn test_set_prototype_property() {
        let mut realm = Realm::new();
        let a = realm.define_function("A");
        let c = realm.define_function("C");
        let a_proto = realm.constructor_prototype(a).unwrap();

        realm.set_prototype_property(c, a_proto).unwrap();
        assert_eq!(realm.constructor_prototype(c), Ok(a_proto));
    }

    #[test]
    fn test_builtin_prototype_is_read_only() {
        let mut realm = Realm::new();
        let a = realm.define_function("A");
        let a_proto = realm.constructor_prototype(a).unwrap();
        let number = realm.intrinsics().number();

        assert_eq!(
            realm.set_prototype_property(number, a_proto),
            Err(RealmError::ReadOnlyPrototype(number))
        );
    }

    #[test]
    fn test_set_declared_parent_requires_functions() {
        let mut realm = Realm::new();
        let a = realm.define_function("A");
        let plain = realm.create_plain_object(Vec::<(String, Value)>::new());

        assert_eq!(realm.set_declared_parent(a, Some(plain)), Err(RealmError::NotAFunction(plain)));
        assert_eq!(realm.set_declared_parent(plain, Some(a)), Err(RealmError::NotAFunction(plain)));
    }

    #[test]
    fn test_set_proto_rejects_cycles() {
        let mut realm = Realm::new();
        let a = realm.create_object_with_proto(None).unwrap();
        let b = realm.create_object_with_proto(Some(a)).unwrap();

        assert_eq!(realm.set_proto(a, Some(b)), Err(RealmError::CyclicPrototype(a)));
        assert_eq!(realm.set_proto(a, Some(a)), Err(RealmError::CyclicPrototype(a)));
        assert!(realm.set_proto(b, None).is_ok());
    }

    #[test]
    fn test_host_constructor_hierarchy() {
        let mut realm = Realm::new();
        let element = realm.define_host_constructor("HTMLElement", None).unwrap();
        let anchor = realm.define_host_constructor("HTMLAnchorElement", Some(element)).unwrap();
        let a = realm.create_host_object(anchor, "a").unwrap();

        let chain: Vec<ObjectId> = realm.prototype_chain(a).collect();
        assert_eq!(chain[0], realm.constructor_prototype(anchor).unwrap());
        assert_eq!(chain[1], realm.constructor_prototype(element).unwrap());
    }

    #[test]
    fn test_box_primitive() {
        let mut realm = Realm::new();
        let boxed = realm.box_primitive(&Value::from(2)).unwrap();
        assert!(matches!(realm.object(boxed).unwrap().kind, ObjectKind::Number(n) if n == 2.0));
        assert!(realm.box_primitive(&Value::Null).is_none());
    }

    #[test]
    fn test_unknown_object() {
        let mut realm = Realm::new();
        let bogus = ObjectId(u32::MAX);
        assert_eq!(realm.set_property(bogus, "a", 1), Err(RealmError::UnknownObject(bogus)));
        assert!(realm.object(bogus).is_none());
    }
}
