// kiz-core - The kiz heap object model
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! The kiz heap object model.
//!
//! Every runtime value is an [`Object`]: a cheap-clone handle to a
//! reference-counted cell holding a tagged payload plus an
//! insertion-ordered attribute map. Reference counting is delegated to
//! `Rc`, so storing a value in a container holds a reference and dropping
//! the last handle destroys the value; cycles through attributes are not
//! reclaimed. Prototype inheritance is a single `__parent__` edge in the
//! attribute map, resolved by [`get_attr`].

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use kiz_parser::Span;
use num_bigint::BigInt;

use crate::attrs::AttrMap;
use crate::code::CodeObject;
use crate::error::{Error, Result};
use crate::host::Host;
use crate::magic;
use crate::num::{Decimal, Rational};
use crate::protos::prototypes;

/// The signature native functions are called with: the host VM, the
/// optional receiver, and the argument list.
pub type NativeFn = dyn Fn(&mut dyn Host, Option<Object>, &[Object]) -> Result<Object>;

/// Payload of a user-defined function.
#[derive(Clone)]
pub struct FnDef {
    pub name: String,
    pub code: Rc<CodeObject>,
    pub argc: usize,
}

/// Payload of a module. Native standard modules carry no code.
#[derive(Clone)]
pub struct Module {
    pub name: String,
    pub path: String,
    pub code: Option<Rc<CodeObject>>,
}

/// Dictionary storage: insertion-ordered entries keyed by the BigInt
/// fingerprint the key's `__hash__` produced. Two keys collide exactly
/// when their fingerprints are equal; `__eq__` is never consulted.
#[derive(Clone, Default)]
pub struct Dict {
    entries: Vec<(BigInt, (Object, Object))>,
}

impl Dict {
    pub fn new() -> Self {
        Dict::default()
    }

    /// Look up an entry by fingerprint.
    pub fn get(&self, fingerprint: &BigInt) -> Option<(Object, Object)> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == fingerprint)
            .map(|(_, pair)| pair.clone())
    }

    /// Insert an entry, replacing a colliding fingerprint in place.
    pub fn insert(&mut self, fingerprint: BigInt, key: Object, value: Object) {
        for (existing, pair) in &mut self.entries {
            if *existing == fingerprint {
                *pair = (key, value);
                return;
            }
        }
        self.entries.push((fingerprint, (key, value)));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the entries in insertion order.
    pub fn to_vec(&self) -> Vec<(BigInt, (Object, Object))> {
        self.entries.clone()
    }
}

/// The tagged payload of an object.
#[derive(Clone)]
pub enum Payload {
    /// A plain object: prototypes and `object ... end` instances.
    Plain,
    Nil,
    Bool(bool),
    Int(BigInt),
    Decimal(Decimal),
    Rational(Rational),
    Str(String),
    List(Vec<Object>),
    Dict(Dict),
    Function(FnDef),
    Native { name: String, func: Rc<NativeFn> },
    Module(Module),
    Code(Rc<CodeObject>),
    Error { positions: Vec<(String, Span)> },
}

/// An object cell: payload plus attributes.
pub struct ObjectData {
    pub payload: Payload,
    pub attrs: AttrMap,
}

/// A handle to a kiz runtime value.
#[derive(Clone)]
pub struct Object {
    inner: Rc<RefCell<ObjectData>>,
}

impl Object {
    fn from_payload(payload: Payload) -> Self {
        Object {
            inner: Rc::new(RefCell::new(ObjectData {
                payload,
                attrs: AttrMap::new(),
            })),
        }
    }

    /// A plain object with no `__parent__` edge. Used for the prototype
    /// singletons themselves.
    pub fn bare() -> Self {
        Object::from_payload(Payload::Plain)
    }

    /// A plain object whose `__parent__` is the object prototype
    /// (`CREATE_OBJECT`, the `create` builtin).
    pub fn plain() -> Self {
        let obj = Object::bare();
        obj.set_attr(magic::PARENT, prototypes().object);
        obj
    }

    pub fn nil() -> Self {
        let obj = Object::from_payload(Payload::Nil);
        obj.set_attr(magic::PARENT, prototypes().nil);
        obj
    }

    pub fn boolean(value: bool) -> Self {
        let obj = Object::from_payload(Payload::Bool(value));
        obj.set_attr(magic::PARENT, prototypes().boolean);
        obj
    }

    pub fn int(value: BigInt) -> Self {
        let obj = Object::from_payload(Payload::Int(value));
        obj.set_attr(magic::PARENT, prototypes().int);
        obj
    }

    pub fn int_from(value: i64) -> Self {
        Object::int(BigInt::from(value))
    }

    pub fn decimal(value: Decimal) -> Self {
        let obj = Object::from_payload(Payload::Decimal(value));
        obj.set_attr(magic::PARENT, prototypes().decimal);
        obj
    }

    pub fn rational(value: Rational) -> Self {
        let obj = Object::from_payload(Payload::Rational(value));
        obj.set_attr(magic::PARENT, prototypes().rational);
        obj
    }

    pub fn string(value: impl Into<String>) -> Self {
        let obj = Object::from_payload(Payload::Str(value.into()));
        obj.set_attr(magic::PARENT, prototypes().string);
        obj
    }

    /// A list. Installs the iteration cursor at zero.
    pub fn list(elements: Vec<Object>) -> Self {
        let obj = Object::from_payload(Payload::List(elements));
        obj.set_attr(magic::PARENT, prototypes().list);
        obj.set_attr(magic::CURRENT_INDEX, Object::int_from(0));
        obj
    }

    pub fn dict(entries: Dict) -> Self {
        let obj = Object::from_payload(Payload::Dict(entries));
        obj.set_attr(magic::PARENT, prototypes().dict);
        obj
    }

    pub fn function(name: impl Into<String>, code: Rc<CodeObject>, argc: usize) -> Self {
        let obj = Object::from_payload(Payload::Function(FnDef {
            name: name.into(),
            code,
            argc,
        }));
        obj.set_attr(magic::PARENT, prototypes().function);
        obj
    }

    pub fn native<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut dyn Host, Option<Object>, &[Object]) -> Result<Object> + 'static,
    {
        let obj = Object::from_payload(Payload::Native {
            name: name.into(),
            func: Rc::new(func),
        });
        obj.set_attr(magic::PARENT, prototypes().native);
        obj
    }

    pub fn module(
        name: impl Into<String>,
        path: impl Into<String>,
        code: Option<Rc<CodeObject>>,
    ) -> Self {
        let obj = Object::from_payload(Payload::Module(Module {
            name: name.into(),
            path: path.into(),
            code,
        }));
        obj.set_attr(magic::PARENT, prototypes().module);
        obj
    }

    /// A code object value. Carries no `__parent__` edge; code objects
    /// are not user-reachable.
    pub fn code(code: Rc<CodeObject>) -> Self {
        Object::from_payload(Payload::Code(code))
    }

    /// A bare error object with no name or message yet.
    pub fn error() -> Self {
        let obj = Object::from_payload(Payload::Error {
            positions: Vec::new(),
        });
        obj.set_attr(magic::PARENT, prototypes().error);
        obj
    }

    /// An error object carrying `__name__` and `__msg__`.
    pub fn error_with(name: &str, message: &str) -> Self {
        let obj = Object::error();
        obj.set_attr(magic::ERR_NAME, Object::string(name));
        obj.set_attr(magic::ERR_MSG, Object::string(message));
        obj
    }

    // ------------------------------------------------------------------
    // Identity and payload access
    // ------------------------------------------------------------------

    /// Pointer identity (`OP_IS`).
    pub fn is(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// The current reference count of this value.
    pub fn refc(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    /// Borrow the cell.
    pub fn data(&self) -> Ref<'_, ObjectData> {
        self.inner.borrow()
    }

    /// Mutably borrow the cell.
    pub fn data_mut(&self) -> RefMut<'_, ObjectData> {
        self.inner.borrow_mut()
    }

    /// The variant name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match &self.data().payload {
            Payload::Plain => "Object",
            Payload::Nil => "Nil",
            Payload::Bool(_) => "Bool",
            Payload::Int(_) => "Int",
            Payload::Decimal(_) => "Decimal",
            Payload::Rational(_) => "Rational",
            Payload::Str(_) => "Str",
            Payload::List(_) => "List",
            Payload::Dict(_) => "Dict",
            Payload::Function(_) => "Function",
            Payload::Native { .. } => "NativeFunction",
            Payload::Module(_) => "Module",
            Payload::Code(_) => "CodeObject",
            Payload::Error { .. } => "Error",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self.data().payload, Payload::Nil)
    }

    pub fn bool_value(&self) -> Option<bool> {
        match &self.data().payload {
            Payload::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn int_value(&self) -> Option<BigInt> {
        match &self.data().payload {
            Payload::Int(value) => Some(value.clone()),
            _ => None,
        }
    }

    pub fn decimal_value(&self) -> Option<Decimal> {
        match &self.data().payload {
            Payload::Decimal(value) => Some(value.clone()),
            _ => None,
        }
    }

    pub fn rational_value(&self) -> Option<Rational> {
        match &self.data().payload {
            Payload::Rational(value) => Some(value.clone()),
            _ => None,
        }
    }

    pub fn str_value(&self) -> Option<String> {
        match &self.data().payload {
            Payload::Str(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// Snapshot of a list's elements.
    pub fn list_items(&self) -> Option<Vec<Object>> {
        match &self.data().payload {
            Payload::List(items) => Some(items.clone()),
            _ => None,
        }
    }

    pub fn function_def(&self) -> Option<FnDef> {
        match &self.data().payload {
            Payload::Function(def) => Some(def.clone()),
            _ => None,
        }
    }

    pub fn native_fn(&self) -> Option<(String, Rc<NativeFn>)> {
        match &self.data().payload {
            Payload::Native { name, func } => Some((name.clone(), func.clone())),
            _ => None,
        }
    }

    pub fn module_def(&self) -> Option<Module> {
        match &self.data().payload {
            Payload::Module(def) => Some(def.clone()),
            _ => None,
        }
    }

    pub fn code_object(&self) -> Option<Rc<CodeObject>> {
        match &self.data().payload {
            Payload::Code(code) => Some(code.clone()),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.data().payload, Payload::Error { .. })
    }

    pub fn error_positions(&self) -> Option<Vec<(String, Span)>> {
        match &self.data().payload {
            Payload::Error { positions } => Some(positions.clone()),
            _ => None,
        }
    }

    /// Attach a captured traceback to an error object.
    pub fn set_error_positions(&self, new_positions: Vec<(String, Span)>) {
        if let Payload::Error { positions } = &mut self.data_mut().payload {
            *positions = new_positions;
        }
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Look up an attribute on this object only (no prototype walk).
    pub fn get_attr_local(&self, name: &str) -> Option<Object> {
        self.data().attrs.get(name)
    }

    /// Bind an attribute, shadowing any inherited one.
    pub fn set_attr(&self, name: impl Into<String>, value: Object) {
        self.data_mut().attrs.insert(name, value);
    }

    /// Remove an attribute bound on this object.
    pub fn remove_attr(&self, name: &str) -> Option<Object> {
        self.data_mut().attrs.remove(name)
    }

    /// Snapshot of the attributes in insertion order.
    pub fn attrs_snapshot(&self) -> Vec<(String, Object)> {
        self.data().attrs.to_vec()
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    fn ptr_string(&self) -> String {
        format!("{:#x}", Rc::as_ptr(&self.inner) as usize)
    }

    /// The plain rendering used by `print`.
    pub fn display_string(&self) -> String {
        self.render(false)
    }

    /// The rendering used by the REPL and error messages: like
    /// [`Object::display_string`], but strings are quoted.
    pub fn debug_string(&self) -> String {
        self.render(true)
    }

    fn render(&self, debug: bool) -> String {
        match &self.data().payload {
            Payload::Plain => format!("<Object at {}>", self.ptr_string()),
            Payload::Nil => "Nil".to_string(),
            Payload::Bool(true) => "True".to_string(),
            Payload::Bool(false) => "False".to_string(),
            Payload::Int(value) => value.to_string(),
            Payload::Decimal(value) => value.to_string(),
            Payload::Rational(value) => value.to_string(),
            Payload::Str(value) => {
                if debug {
                    format!("\"{}\"", value)
                } else {
                    value.clone()
                }
            }
            Payload::List(items) => {
                let rendered: Vec<String> = items.iter().map(|item| item.render(debug)).collect();
                format!("[{}]", rendered.join(", "))
            }
            Payload::Dict(entries) => {
                let rendered: Vec<String> = entries
                    .to_vec()
                    .into_iter()
                    .map(|(_, (key, value))| {
                        format!("{}: {}", key.render(debug), value.render(debug))
                    })
                    .collect();
                format!("{{{}}}", rendered.join(", "))
            }
            Payload::Function(def) => format!(
                "<Function: name='{}', argc={} at {}>",
                def.name,
                def.argc,
                self.ptr_string()
            ),
            Payload::Native { name, .. } => {
                if name.is_empty() {
                    format!("<NativeFunction at {}>", self.ptr_string())
                } else {
                    format!("<NativeFunction: name='{}' at {}>", name, self.ptr_string())
                }
            }
            Payload::Module(def) => {
                format!("<Module: name='{}' at {}>", def.name, self.ptr_string())
            }
            Payload::Code(_) => format!("<CodeObject at {}>", self.ptr_string()),
            Payload::Error { .. } => {
                let name = self
                    .get_attr_local(magic::ERR_NAME)
                    .map(|name| name.display_string())
                    .unwrap_or_default();
                if name.is_empty() {
                    format!("<Error at {}>", self.ptr_string())
                } else {
                    format!("<Error: {} at {}>", name, self.ptr_string())
                }
            }
        }
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.debug_string())
    }
}

/// Resolve an attribute with the `__parent__` chain walk: the object's
/// own attributes first, then its prototype chain, first hit wins.
pub fn get_attr(obj: &Object, name: &str) -> Result<Object> {
    if let Some(value) = obj.get_attr_local(name) {
        return Ok(value);
    }
    if let Some(parent) = obj.get_attr_local(magic::PARENT) {
        return get_attr(&parent, name);
    }
    Err(Error::name_error(format!(
        "Undefined attribute '{}' of {}",
        name,
        obj.debug_string()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_carry_their_prototype() {
        let protos = prototypes();
        assert!(Object::int_from(1)
            .get_attr_local(magic::PARENT)
            .unwrap()
            .is(&protos.int));
        assert!(Object::string("s")
            .get_attr_local(magic::PARENT)
            .unwrap()
            .is(&protos.string));
        assert!(Object::list(vec![])
            .get_attr_local(magic::PARENT)
            .unwrap()
            .is(&protos.list));
    }

    #[test]
    fn list_installs_cursor() {
        let list = Object::list(vec![Object::int_from(1)]);
        let cursor = list.get_attr_local(magic::CURRENT_INDEX).unwrap();
        assert_eq!(cursor.int_value().unwrap(), 0.into());
    }

    #[test]
    fn attribute_walk_reaches_grandparent() {
        let grandparent = Object::plain();
        grandparent.set_attr("x", Object::int_from(7));
        let parent = Object::plain();
        parent.set_attr(magic::PARENT, grandparent);
        let child = Object::plain();
        child.set_attr(magic::PARENT, parent);

        let value = get_attr(&child, "x").unwrap();
        assert_eq!(value.int_value().unwrap(), 7.into());
    }

    #[test]
    fn own_attribute_shadows_inherited() {
        let parent = Object::plain();
        parent.set_attr("x", Object::int_from(1));
        let child = Object::plain();
        child.set_attr(magic::PARENT, parent);
        child.set_attr("x", Object::int_from(2));
        assert_eq!(get_attr(&child, "x").unwrap().int_value().unwrap(), 2.into());
    }

    #[test]
    fn missing_attribute_is_a_name_error() {
        let obj = Object::plain();
        match get_attr(&obj, "missing") {
            Err(Error::Raised { name, .. }) => assert_eq!(name, "NameError"),
            other => panic!("expected NameError, got {:?}", other.map(|o| o.debug_string())),
        }
    }

    #[test]
    fn identity_is_pointer_identity() {
        let a = Object::int_from(1);
        let b = Object::int_from(1);
        assert!(a.is(&a.clone()));
        assert!(!a.is(&b));
    }

    #[test]
    fn refc_tracks_handles() {
        let a = Object::int_from(1);
        let before = a.refc();
        let extra = a.clone();
        assert_eq!(a.refc(), before + 1);
        drop(extra);
        assert_eq!(a.refc(), before);
    }

    #[test]
    fn rendering() {
        assert_eq!(Object::nil().display_string(), "Nil");
        assert_eq!(Object::boolean(true).display_string(), "True");
        assert_eq!(Object::string("hi").display_string(), "hi");
        assert_eq!(Object::string("hi").debug_string(), "\"hi\"");
        let list = Object::list(vec![Object::int_from(1), Object::string("a")]);
        assert_eq!(list.display_string(), "[1, a]");
        assert_eq!(list.debug_string(), "[1, \"a\"]");
    }

    #[test]
    fn dict_insert_replaces_colliding_fingerprint() {
        let mut dict = Dict::new();
        dict.insert(BigInt::from(1), Object::string("a"), Object::int_from(1));
        dict.insert(BigInt::from(1), Object::string("b"), Object::int_from(2));
        assert_eq!(dict.len(), 1);
        let (key, value) = dict.get(&BigInt::from(1)).unwrap();
        assert_eq!(key.str_value().unwrap(), "b");
        assert_eq!(value.int_value().unwrap(), 2.into());
    }
}
