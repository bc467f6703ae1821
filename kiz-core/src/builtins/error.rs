// kiz-core - Error prototype methods
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! The Error prototype's constructor: `Error(name, msg)` builds a fresh
//! error object carrying `__name__` and `__msg__`.

use crate::error::Result;
use crate::host::Host;
use crate::magic;
use crate::object::Object;

use super::two_args;

pub fn error_call(_host: &mut dyn Host, _self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    let (name, message) = two_args("Error", args)?;
    let error = Object::error();
    error.set_attr(magic::ERR_NAME, name.clone());
    error.set_attr(magic::ERR_MSG, message.clone());
    Ok(error)
}
