// kiz-core - Built-in library
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Built-in functions and the magic methods of the prototype singletons.
//!
//! `register_builtins` fills the VM's builtins table and installs each
//! variant's magic methods on its prototype. Registration is idempotent;
//! re-registering replaces the bindings in place.

mod boolean;
mod decimal;
mod dict;
mod error;
mod functions;
mod int;
mod list;
pub mod math;
mod nil;
mod object;
mod rational;
mod string;

use num_bigint::BigInt;

use crate::attrs::AttrMap;
use crate::error::{Error, Result};
use crate::host::Host;
use crate::magic;
use crate::object::{Object, get_attr};
use crate::protos::prototypes;

/// Fill the builtins table and install the prototype magic methods.
pub fn register_builtins(builtins: &mut AttrMap) {
    let protos = prototypes();

    // Free functions
    builtins.insert("print", Object::native("print", functions::print));
    builtins.insert("input", Object::native("input", functions::input));
    builtins.insert("ischild", Object::native("ischild", functions::ischild));
    builtins.insert("create", Object::native("create", functions::create));
    builtins.insert("now", Object::native("now", functions::now));
    builtins.insert("get_refc", Object::native("get_refc", functions::get_refc));
    builtins.insert("breakpoint", Object::native("breakpoint", functions::breakpoint));
    builtins.insert("setattr", Object::native("setattr", functions::setattr));
    builtins.insert("getattr", Object::native("getattr", functions::getattr));
    builtins.insert("hasattr", Object::native("hasattr", functions::hasattr));
    builtins.insert("delattr", Object::native("delattr", functions::delattr));
    builtins.insert("range", Object::native("range", functions::range));
    builtins.insert("help", Object::native("help", functions::help));
    builtins.insert("cmd", Object::native("cmd", functions::cmd));
    builtins.insert("type_of", Object::native("type_of", functions::type_of));

    // Root object prototype
    protos.object.set_attr(magic::EQ, Object::native("__eq__", object::object_eq));
    protos.object.set_attr(magic::STR, Object::native("__str__", object::object_str));
    protos
        .object
        .set_attr(magic::GET_ITEM, Object::native("__getitem__", object::object_getitem));
    protos
        .object
        .set_attr(magic::SET_ITEM, Object::native("__setitem__", object::object_setitem));

    // Nil
    protos.nil.set_attr(magic::EQ, Object::native("__eq__", nil::nil_eq));
    protos.nil.set_attr(magic::HASH, Object::native("__hash__", nil::nil_hash));

    // Bool
    protos.boolean.set_attr(magic::EQ, Object::native("__eq__", boolean::bool_eq));
    protos
        .boolean
        .set_attr(magic::CALL, Object::native("__call__", boolean::bool_call));
    protos
        .boolean
        .set_attr(magic::HASH, Object::native("__hash__", boolean::bool_hash));

    // Int
    protos.int.set_attr(magic::ADD, Object::native("__add__", int::int_add));
    protos.int.set_attr(magic::SUB, Object::native("__sub__", int::int_sub));
    protos.int.set_attr(magic::MUL, Object::native("__mul__", int::int_mul));
    protos.int.set_attr(magic::DIV, Object::native("__div__", int::int_div));
    protos.int.set_attr(magic::MOD, Object::native("__mod__", int::int_mod));
    protos.int.set_attr(magic::POW, Object::native("__pow__", int::int_pow));
    protos.int.set_attr(magic::NEG, Object::native("__neg__", int::int_neg));
    protos.int.set_attr(magic::EQ, Object::native("__eq__", int::int_eq));
    protos.int.set_attr(magic::LT, Object::native("__lt__", int::int_lt));
    protos.int.set_attr(magic::GT, Object::native("__gt__", int::int_gt));
    protos.int.set_attr(magic::BOOL, Object::native("__bool__", int::int_bool));
    protos.int.set_attr(magic::CALL, Object::native("__call__", int::int_call));
    protos.int.set_attr(magic::HASH, Object::native("__hash__", int::int_hash));

    // Decimal
    protos.decimal.set_attr(magic::ADD, Object::native("__add__", decimal::decimal_add));
    protos.decimal.set_attr(magic::SUB, Object::native("__sub__", decimal::decimal_sub));
    protos.decimal.set_attr(magic::MUL, Object::native("__mul__", decimal::decimal_mul));
    protos.decimal.set_attr(magic::DIV, Object::native("__div__", decimal::decimal_div));
    protos.decimal.set_attr(magic::POW, Object::native("__pow__", decimal::decimal_pow));
    protos.decimal.set_attr(magic::NEG, Object::native("__neg__", decimal::decimal_neg));
    protos.decimal.set_attr(magic::EQ, Object::native("__eq__", decimal::decimal_eq));
    protos.decimal.set_attr(magic::LT, Object::native("__lt__", decimal::decimal_lt));
    protos.decimal.set_attr(magic::GT, Object::native("__gt__", decimal::decimal_gt));
    protos
        .decimal
        .set_attr(magic::BOOL, Object::native("__bool__", decimal::decimal_bool));
    protos
        .decimal
        .set_attr(magic::CALL, Object::native("__call__", decimal::decimal_call));
    protos
        .decimal
        .set_attr("safe_div", Object::native("safe_div", decimal::decimal_safe_div));

    // Rational
    protos
        .rational
        .set_attr(magic::ADD, Object::native("__add__", rational::rational_add));
    protos
        .rational
        .set_attr(magic::SUB, Object::native("__sub__", rational::rational_sub));
    protos
        .rational
        .set_attr(magic::MUL, Object::native("__mul__", rational::rational_mul));
    protos
        .rational
        .set_attr(magic::DIV, Object::native("__div__", rational::rational_div));
    protos
        .rational
        .set_attr(magic::EQ, Object::native("__eq__", rational::rational_eq));
    protos
        .rational
        .set_attr(magic::LT, Object::native("__lt__", rational::rational_lt));
    protos
        .rational
        .set_attr(magic::GT, Object::native("__gt__", rational::rational_gt));

    // Str
    protos.string.set_attr(magic::ADD, Object::native("__add__", string::str_add));
    protos.string.set_attr(magic::MUL, Object::native("__mul__", string::str_mul));
    protos.string.set_attr(magic::EQ, Object::native("__eq__", string::str_eq));
    protos
        .string
        .set_attr(magic::BOOL, Object::native("__bool__", string::str_bool));
    protos
        .string
        .set_attr(magic::CALL, Object::native("__call__", string::str_call));
    protos
        .string
        .set_attr(magic::HASH, Object::native("__hash__", string::str_hash));
    protos
        .string
        .set_attr("contains", Object::native("contains", string::str_contains));

    // List
    protos.list.set_attr(magic::ADD, Object::native("__add__", list::list_add));
    protos.list.set_attr(magic::MUL, Object::native("__mul__", list::list_mul));
    protos.list.set_attr(magic::EQ, Object::native("__eq__", list::list_eq));
    protos.list.set_attr(magic::BOOL, Object::native("__bool__", list::list_bool));
    protos.list.set_attr(magic::CALL, Object::native("__call__", list::list_call));
    protos.list.set_attr(magic::NEXT, Object::native("__next__", list::list_next));
    protos
        .list
        .set_attr(magic::GET_ITEM, Object::native("__getitem__", list::list_getitem));
    protos
        .list
        .set_attr(magic::SET_ITEM, Object::native("__setitem__", list::list_setitem));
    protos.list.set_attr("append", Object::native("append", list::list_append));
    protos
        .list
        .set_attr("contains", Object::native("contains", list::list_contains));
    protos.list.set_attr("foreach", Object::native("foreach", list::list_foreach));
    protos.list.set_attr("reverse", Object::native("reverse", list::list_reverse));
    protos.list.set_attr("extend", Object::native("extend", list::list_extend));
    protos.list.set_attr("pop", Object::native("pop", list::list_pop));
    protos.list.set_attr("insert", Object::native("insert", list::list_insert));
    protos.list.set_attr("find", Object::native("find", list::list_find));
    protos.list.set_attr("map", Object::native("map", list::list_map));
    protos.list.set_attr("count", Object::native("count", list::list_count));
    protos.list.set_attr("filter", Object::native("filter", list::list_filter));

    // Dict
    protos.dict.set_attr(magic::ADD, Object::native("__add__", dict::dict_add));
    protos
        .dict
        .set_attr(magic::CONTAINS, Object::native("__contains__", dict::dict_contains));
    protos
        .dict
        .set_attr(magic::GET_ITEM, Object::native("__getitem__", dict::dict_getitem));
    protos
        .dict
        .set_attr(magic::SET_ITEM, Object::native("__setitem__", dict::dict_setitem));

    // Error
    protos
        .error
        .set_attr(magic::CALL, Object::native("__call__", error::error_call));

    // Prototype bindings
    builtins.insert("Object", protos.object.clone());
    builtins.insert("Int", protos.int.clone());
    builtins.insert("Bool", protos.boolean.clone());
    builtins.insert("Decimal", protos.decimal.clone());
    builtins.insert("List", protos.list.clone());
    builtins.insert("Dict", protos.dict.clone());
    builtins.insert("Str", protos.string.clone());
    builtins.insert("Func", protos.function.clone());
    builtins.insert("NFunc", protos.native.clone());
    builtins.insert("Error", protos.error.clone());
    builtins.insert("Module", protos.module.clone());
    builtins.insert("__Nil", protos.nil.clone());
    builtins.insert("__Rational", protos.rational.clone());
}

/// True when `proto` is reachable from `obj` along the `__parent__`
/// chain (the object itself included).
pub fn is_child_of(obj: &Object, proto: &Object) -> bool {
    let mut current = obj.clone();
    loop {
        if current.is(proto) {
            return true;
        }
        match current.get_attr_local(magic::PARENT) {
            Some(parent) => current = parent,
            None => return false,
        }
    }
}

/// Reduce a dict key to its BigInt fingerprint by calling `__hash__`.
pub fn hash_key(host: &mut dyn Host, key: &Object) -> Result<BigInt> {
    let hash_method = get_attr(key, magic::HASH)?;
    let result = host.call(&hash_method, Vec::new(), Some(key.clone()))?;
    result.int_value().ok_or_else(|| {
        Error::type_error(format!(
            "__hash__ must return an Int, got {}",
            result.type_name()
        ))
    })
}

// ----------------------------------------------------------------------
// Argument helpers
// ----------------------------------------------------------------------

pub(crate) fn one_arg<'a>(name: &str, args: &'a [Object]) -> Result<&'a Object> {
    if args.len() != 1 {
        return Err(Error::arity(name, 1, args.len()));
    }
    Ok(&args[0])
}

pub(crate) fn two_args<'a>(name: &str, args: &'a [Object]) -> Result<(&'a Object, &'a Object)> {
    if args.len() != 2 {
        return Err(Error::arity(name, 2, args.len()));
    }
    Ok((&args[0], &args[1]))
}

pub(crate) fn receiver(name: &str, self_obj: &Option<Object>) -> Result<Object> {
    self_obj
        .clone()
        .ok_or_else(|| Error::type_error(format!("{} must be called as a method", name)))
}
