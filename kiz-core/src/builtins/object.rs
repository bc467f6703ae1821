// kiz-core - Root object magic methods
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Magic methods of the root object prototype, inherited by every value
//! that does not shadow them: identity equality, string rendering, and
//! string-keyed item access over the attribute map.

use crate::error::{Error, Result};
use crate::host::Host;
use crate::object::{Object, get_attr};

use super::{one_arg, receiver, two_args};

/// Default `__eq__`: pointer identity.
pub fn object_eq(_host: &mut dyn Host, self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    let receiver = receiver("Object.__eq__", &self_obj)?;
    let other = one_arg("Object.__eq__", args)?;
    Ok(Object::boolean(receiver.is(other)))
}

/// Default `__str__`: the display rendering.
pub fn object_str(_host: &mut dyn Host, self_obj: Option<Object>, _args: &[Object]) -> Result<Object> {
    let receiver = receiver("Object.__str__", &self_obj)?;
    Ok(Object::string(receiver.display_string()))
}

/// Default `__getitem__`: `obj["name"]` is attribute lookup.
pub fn object_getitem(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    let receiver = receiver("Object.__getitem__", &self_obj)?;
    let key = one_arg("Object.__getitem__", args)?;
    let Some(name) = key.str_value() else {
        return Err(Error::type_error(format!(
            "Object.__getitem__ needs a Str key, got {}",
            key.type_name()
        )));
    };
    get_attr(&receiver, &name)
}

/// Default `__setitem__`: `obj["name"] = v` is attribute assignment.
pub fn object_setitem(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    let receiver = receiver("Object.__setitem__", &self_obj)?;
    let (key, value) = two_args("Object.__setitem__", args)?;
    let Some(name) = key.str_value() else {
        return Err(Error::type_error(format!(
            "Object.__setitem__ needs a Str key, got {}",
            key.type_name()
        )));
    };
    receiver.set_attr(name, value.clone());
    Ok(receiver)
}
