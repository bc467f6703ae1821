// kiz-core - Dict magic methods
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Magic methods of the Dict prototype.
//!
//! Keys are reduced to BigInt fingerprints by calling their `__hash__`;
//! lookup and collision are decided by fingerprint equality alone.

use crate::error::{Error, Result};
use crate::host::Host;
use crate::object::{Dict, Object, Payload};

use super::{hash_key, one_arg, receiver, two_args};

fn self_dict(name: &str, self_obj: &Option<Object>) -> Result<Object> {
    let receiver = receiver(name, self_obj)?;
    if matches!(receiver.data().payload, Payload::Dict(_)) {
        Ok(receiver)
    } else {
        Err(Error::type_error(format!(
            "{} must be called on a Dict",
            name
        )))
    }
}

fn dict_entries(dict: &Object) -> Dict {
    match &dict.data().payload {
        Payload::Dict(entries) => entries.clone(),
        _ => Dict::new(),
    }
}

/// Merge: a new dict holding self's entries then the other's.
pub fn dict_add(_host: &mut dyn Host, self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    let dict = self_dict("Dict.__add__", &self_obj)?;
    let other = one_arg("Dict.__add__", args)?;
    let Payload::Dict(other_entries) = &other.data().payload else {
        return Err(Error::type_error(format!(
            "Dict.__add__ needs a Dict, got {}",
            other.type_name()
        )));
    };
    let mut merged = dict_entries(&dict);
    for (fingerprint, (key, value)) in other_entries.to_vec() {
        merged.insert(fingerprint, key, value);
    }
    Ok(Object::dict(merged))
}

pub fn dict_contains(
    host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    let dict = self_dict("Dict.__contains__", &self_obj)?;
    let key = one_arg("Dict.__contains__", args)?;
    let fingerprint = hash_key(host, key)?;
    Ok(Object::boolean(dict_entries(&dict).get(&fingerprint).is_some()))
}

pub fn dict_getitem(
    host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    let dict = self_dict("Dict.__getitem__", &self_obj)?;
    let key = one_arg("Dict.__getitem__", args)?;
    let fingerprint = hash_key(host, key)?;
    match dict_entries(&dict).get(&fingerprint) {
        Some((_, value)) => Ok(value),
        None => Err(Error::key_error(format!(
            "Undefined key {} in Dictionary object {}",
            key.debug_string(),
            dict.display_string()
        ))),
    }
}

pub fn dict_setitem(
    host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    let dict = self_dict("Dict.__setitem__", &self_obj)?;
    let (key, value) = two_args("Dict.__setitem__", args)?;
    let fingerprint = hash_key(host, key)?;
    if let Payload::Dict(entries) = &mut dict.data_mut().payload {
        entries.insert(fingerprint, key.clone(), value.clone());
    }
    Ok(Object::nil())
}
