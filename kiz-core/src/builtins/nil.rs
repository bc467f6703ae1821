// kiz-core - Nil magic methods
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Magic methods of the Nil prototype. Nil is equal only to itself.

use crate::error::Result;
use crate::host::Host;
use crate::object::Object;

use super::one_arg;

pub fn nil_eq(_host: &mut dyn Host, _self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    let other = one_arg("Nil.__eq__", args)?;
    Ok(Object::boolean(other.is_nil()))
}

pub fn nil_hash(_host: &mut dyn Host, _self_obj: Option<Object>, _args: &[Object]) -> Result<Object> {
    Ok(Object::int_from(0))
}
