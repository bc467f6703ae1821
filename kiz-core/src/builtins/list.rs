// kiz-core - List magic methods
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Magic methods of the List prototype, including the iteration
//! protocol: `__next__` returns the element at the embedded cursor and
//! advances it; at exhaustion the cursor resets to zero and `False` is
//! returned as the sentinel.

use num_traits::ToPrimitive;

use crate::error::{Error, Result};
use crate::host::Host;
use crate::magic;
use crate::object::{Object, Payload, get_attr};

use super::{one_arg, receiver, two_args};

fn self_list(name: &str, self_obj: &Option<Object>) -> Result<Object> {
    let receiver = receiver(name, self_obj)?;
    if matches!(receiver.data().payload, Payload::List(_)) {
        Ok(receiver)
    } else {
        Err(Error::type_error(format!(
            "{} must be called on a List",
            name
        )))
    }
}

fn list_operand(name: &str, arg: &Object) -> Result<Vec<Object>> {
    arg.list_items().ok_or_else(|| {
        Error::type_error(format!("{} needs a List, got {}", name, arg.type_name()))
    })
}

fn index_operand(name: &str, arg: &Object) -> Result<usize> {
    let value = arg.int_value().ok_or_else(|| {
        Error::type_error(format!("{} needs an Int index, got {}", name, arg.type_name()))
    })?;
    value
        .to_usize()
        .ok_or_else(|| Error::overflow_error(format!("{}: index does not fit", name)))
}

/// `List()` constructor: a fresh empty list.
pub fn list_call(_host: &mut dyn Host, _self_obj: Option<Object>, _args: &[Object]) -> Result<Object> {
    Ok(Object::list(Vec::new()))
}

pub fn list_bool(_host: &mut dyn Host, self_obj: Option<Object>, _args: &[Object]) -> Result<Object> {
    let list = self_list("List.__bool__", &self_obj)?;
    Ok(Object::boolean(!list.list_items().unwrap_or_default().is_empty()))
}

/// Concatenation: a new list holding self's elements then the other's.
pub fn list_add(_host: &mut dyn Host, self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    let list = self_list("List.__add__", &self_obj)?;
    let mut items = list.list_items().unwrap_or_default();
    items.extend(list_operand("List.__add__", one_arg("List.__add__", args)?)?);
    Ok(Object::list(items))
}

/// Repetition: self's elements repeated n times, as a new list.
pub fn list_mul(_host: &mut dyn Host, self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    let list = self_list("List.__mul__", &self_obj)?;
    let arg = one_arg("List.__mul__", args)?;
    let times = arg
        .int_value()
        .and_then(|n| n.to_usize())
        .ok_or_else(|| Error::type_error("List.__mul__ needs a non-negative Int"))?;
    let items = list.list_items().unwrap_or_default();
    let mut result = Vec::with_capacity(items.len() * times);
    for _ in 0..times {
        result.extend(items.iter().cloned());
    }
    Ok(Object::list(result))
}

/// Element-wise equality through each element's `__eq__`.
pub fn list_eq(host: &mut dyn Host, self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    let list = self_list("List.__eq__", &self_obj)?;
    let left = list.list_items().unwrap_or_default();
    let right = list_operand("List.__eq__", one_arg("List.__eq__", args)?)?;
    if left.len() != right.len() {
        return Ok(Object::boolean(false));
    }
    for (a, b) in left.iter().zip(right.iter()) {
        let eq_method = get_attr(a, magic::EQ)?;
        let result = host.call(&eq_method, vec![b.clone()], Some(a.clone()))?;
        if !host.is_true(&result)? {
            return Ok(Object::boolean(false));
        }
    }
    Ok(Object::boolean(true))
}

/// Advance the embedded cursor and return the element under it, or the
/// `False` sentinel (resetting the cursor) at exhaustion.
pub fn list_next(_host: &mut dyn Host, self_obj: Option<Object>, _args: &[Object]) -> Result<Object> {
    let list = self_list("List.__next__", &self_obj)?;
    let cursor = get_attr(&list, magic::CURRENT_INDEX)?;
    let index = cursor
        .int_value()
        .and_then(|n| n.to_usize())
        .ok_or_else(|| Error::overflow_error("List.__next__: cursor does not fit"))?;

    let items = list.list_items().unwrap_or_default();
    if index < items.len() {
        list.set_attr(magic::CURRENT_INDEX, Object::int_from(index as i64 + 1));
        Ok(items[index].clone())
    } else {
        list.set_attr(magic::CURRENT_INDEX, Object::int_from(0));
        Ok(Object::boolean(false))
    }
}

pub fn list_getitem(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    let list = self_list("List.__getitem__", &self_obj)?;
    let index = index_operand("List.__getitem__", one_arg("List.__getitem__", args)?)?;
    let items = list.list_items().unwrap_or_default();
    items.get(index).cloned().ok_or_else(|| {
        Error::key_error(format!(
            "list index {} out of range (len {})",
            index,
            items.len()
        ))
    })
}

pub fn list_setitem(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    let list = self_list("List.__setitem__", &self_obj)?;
    let (index_arg, value) = two_args("List.__setitem__", args)?;
    let index = index_operand("List.__setitem__", index_arg)?;
    let len = list.list_items().map(|items| items.len()).unwrap_or(0);
    if index >= len {
        return Err(Error::key_error(format!(
            "list index {} out of range (len {})",
            index, len
        )));
    }
    if let Payload::List(items) = &mut list.data_mut().payload {
        items[index] = value.clone();
    }
    Ok(Object::nil())
}

/// Append in place; returns the list itself for chaining.
pub fn list_append(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    let list = self_list("List.append", &self_obj)?;
    let element = one_arg("List.append", args)?.clone();
    if let Payload::List(items) = &mut list.data_mut().payload {
        items.push(element);
    }
    Ok(list)
}

/// Membership through each element's `__eq__`.
pub fn list_contains(
    host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    let list = self_list("List.contains", &self_obj)?;
    let target = one_arg("List.contains", args)?;
    for element in list.list_items().unwrap_or_default() {
        let eq_method = get_attr(&element, magic::EQ)?;
        let result = host.call(&eq_method, vec![target.clone()], Some(element.clone()))?;
        if host.is_true(&result)? {
            return Ok(Object::boolean(true));
        }
    }
    Ok(Object::boolean(false))
}

/// Call a function once per element.
pub fn list_foreach(
    host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    let list = self_list("List.foreach", &self_obj)?;
    let func = one_arg("List.foreach", args)?;
    for element in list.list_items().unwrap_or_default() {
        host.call(func, vec![element], None)?;
    }
    Ok(Object::nil())
}

pub fn list_reverse(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    _args: &[Object],
) -> Result<Object> {
    let list = self_list("List.reverse", &self_obj)?;
    if let Payload::List(items) = &mut list.data_mut().payload {
        items.reverse();
    }
    Ok(Object::nil())
}

pub fn list_extend(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    let list = self_list("List.extend", &self_obj)?;
    let other = list_operand("List.extend", one_arg("List.extend", args)?)?;
    if let Payload::List(items) = &mut list.data_mut().payload {
        items.extend(other);
    }
    Ok(Object::nil())
}

pub fn list_pop(_host: &mut dyn Host, self_obj: Option<Object>, _args: &[Object]) -> Result<Object> {
    let list = self_list("List.pop", &self_obj)?;
    if let Payload::List(items) = &mut list.data_mut().payload {
        items.pop();
    }
    Ok(Object::nil())
}

/// `xs.insert(value, index)`: insert before `index` (clamped to the
/// length).
pub fn list_insert(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    let list = self_list("List.insert", &self_obj)?;
    let (value, index_arg) = two_args("List.insert", args)?;
    let index = index_operand("List.insert", index_arg)?;
    if let Payload::List(items) = &mut list.data_mut().payload {
        let index = index.min(items.len());
        items.insert(index, value.clone());
    }
    Ok(Object::nil())
}

// Reserved surface: declared on the prototype, semantics unspecified.

pub fn list_find(_host: &mut dyn Host, _self_obj: Option<Object>, _args: &[Object]) -> Result<Object> {
    Ok(Object::nil())
}

pub fn list_map(_host: &mut dyn Host, _self_obj: Option<Object>, _args: &[Object]) -> Result<Object> {
    Ok(Object::nil())
}

pub fn list_count(
    _host: &mut dyn Host,
    _self_obj: Option<Object>,
    _args: &[Object],
) -> Result<Object> {
    Ok(Object::nil())
}

pub fn list_filter(
    _host: &mut dyn Host,
    _self_obj: Option<Object>,
    _args: &[Object],
) -> Result<Object> {
    Ok(Object::nil())
}
