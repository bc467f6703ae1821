// kiz-core - Str magic methods
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Magic methods of the Str prototype.

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::error::{Error, Result};
use crate::host::Host;
use crate::object::Object;

use super::{one_arg, receiver};

fn self_str(name: &str, self_obj: &Option<Object>) -> Result<String> {
    receiver(name, self_obj)?
        .str_value()
        .ok_or_else(|| Error::type_error(format!("{} must be called on a Str", name)))
}

fn str_operand(name: &str, arg: &Object) -> Result<String> {
    arg.str_value().ok_or_else(|| {
        Error::type_error(format!("{} needs a Str, got {}", name, arg.type_name()))
    })
}

pub fn str_add(_host: &mut dyn Host, self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    let left = self_str("Str.__add__", &self_obj)?;
    let right = str_operand("Str.__add__", one_arg("Str.__add__", args)?)?;
    Ok(Object::string(left + &right))
}

pub fn str_mul(_host: &mut dyn Host, self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    let text = self_str("Str.__mul__", &self_obj)?;
    let arg = one_arg("Str.__mul__", args)?;
    let Some(times) = arg.int_value() else {
        return Err(Error::type_error(format!(
            "Str.__mul__ needs an Int, got {}",
            arg.type_name()
        )));
    };
    let times = times
        .to_usize()
        .ok_or_else(|| Error::type_error("Str.__mul__ needs a non-negative Int"))?;
    Ok(Object::string(text.repeat(times)))
}

pub fn str_eq(_host: &mut dyn Host, self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    let left = self_str("Str.__eq__", &self_obj)?;
    let right = str_operand("Str.__eq__", one_arg("Str.__eq__", args)?)?;
    Ok(Object::boolean(left == right))
}

pub fn str_bool(_host: &mut dyn Host, self_obj: Option<Object>, _args: &[Object]) -> Result<Object> {
    let text = self_str("Str.__bool__", &self_obj)?;
    Ok(Object::boolean(!text.is_empty()))
}

/// `Str(x)` constructor: the display rendering of the argument, or an
/// empty string with no arguments.
pub fn str_call(_host: &mut dyn Host, _self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    match args {
        [] => Ok(Object::string("")),
        [arg] => Ok(Object::string(arg.display_string())),
        _ => Err(Error::arity("Str", 1, args.len())),
    }
}

pub fn str_contains(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    let text = self_str("Str.contains", &self_obj)?;
    let needle = str_operand("Str.contains", one_arg("Str.contains", args)?)?;
    Ok(Object::boolean(text.contains(&needle)))
}

/// FNV-1a over the UTF-8 bytes, widened to a BigInt fingerprint.
pub fn str_hash(_host: &mut dyn Host, self_obj: Option<Object>, _args: &[Object]) -> Result<Object> {
    let text = self_str("Str.__hash__", &self_obj)?;
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in text.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    Ok(Object::int(BigInt::from(hash)))
}
