// kiz-core - Bool magic methods
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Magic methods of the Bool prototype.

use crate::error::{Error, Result};
use crate::host::Host;
use crate::object::Object;

use super::{one_arg, receiver};

fn self_bool(name: &str, self_obj: &Option<Object>) -> Result<bool> {
    receiver(name, self_obj)?
        .bool_value()
        .ok_or_else(|| Error::type_error(format!("{} must be called on a Bool", name)))
}

pub fn bool_eq(_host: &mut dyn Host, self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    let left = self_bool("Bool.__eq__", &self_obj)?;
    let right = one_arg("Bool.__eq__", args)?;
    let Some(other) = right.bool_value() else {
        return Err(Error::type_error(format!(
            "Bool.__eq__ needs a Bool, got {}",
            right.type_name()
        )));
    };
    Ok(Object::boolean(left == other))
}

/// `Bool(x)` constructor: the truthiness of the argument.
pub fn bool_call(host: &mut dyn Host, _self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    let arg = one_arg("Bool", args)?;
    Ok(Object::boolean(host.is_true(arg)?))
}

pub fn bool_hash(_host: &mut dyn Host, self_obj: Option<Object>, _args: &[Object]) -> Result<Object> {
    let value = self_bool("Bool.__hash__", &self_obj)?;
    Ok(Object::int_from(if value { 1 } else { 0 }))
}
