// kiz-core - Rational magic methods
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Magic methods of the Rational prototype. Int operands promote to
//! rationals; results stay exact.

use crate::error::{Error, Result};
use crate::host::Host;
use crate::num::Rational;
use crate::object::Object;

use super::{one_arg, receiver};

fn self_rational(name: &str, self_obj: &Option<Object>) -> Result<Rational> {
    receiver(name, self_obj)?
        .rational_value()
        .ok_or_else(|| Error::type_error(format!("{} must be called on a Rational", name)))
}

fn rational_operand(name: &str, arg: &Object) -> Result<Rational> {
    if let Some(value) = arg.rational_value() {
        Ok(value)
    } else if let Some(value) = arg.int_value() {
        Ok(Rational::from_int(&value))
    } else {
        Err(Error::type_error(format!(
            "{} needs an Int or Rational, got {}",
            name,
            arg.type_name()
        )))
    }
}

fn rational_binary(
    name: &str,
    self_obj: &Option<Object>,
    args: &[Object],
    op: impl FnOnce(Rational, Rational) -> Rational,
) -> Result<Object> {
    let left = self_rational(name, self_obj)?;
    let right = rational_operand(name, one_arg(name, args)?)?;
    Ok(Object::rational(op(left, right)))
}

pub fn rational_add(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    rational_binary("Rational.__add__", &self_obj, args, |a, b| a + b)
}

pub fn rational_sub(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    rational_binary("Rational.__sub__", &self_obj, args, |a, b| a - b)
}

pub fn rational_mul(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    rational_binary("Rational.__mul__", &self_obj, args, |a, b| a * b)
}

pub fn rational_div(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    let left = self_rational("Rational.__div__", &self_obj)?;
    let right = rational_operand("Rational.__div__", one_arg("Rational.__div__", args)?)?;
    left.div(&right)
        .map(Object::rational)
        .ok_or_else(|| Error::zero_division("division by zero"))
}

pub fn rational_eq(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    rational_compare("Rational.__eq__", &self_obj, args, |ordering| ordering.is_eq())
}

pub fn rational_lt(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    rational_compare("Rational.__lt__", &self_obj, args, |ordering| ordering.is_lt())
}

pub fn rational_gt(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    rational_compare("Rational.__gt__", &self_obj, args, |ordering| ordering.is_gt())
}

fn rational_compare(
    name: &str,
    self_obj: &Option<Object>,
    args: &[Object],
    check: impl FnOnce(std::cmp::Ordering) -> bool,
) -> Result<Object> {
    let left = self_rational(name, self_obj)?;
    let right = rational_operand(name, one_arg(name, args)?)?;
    Ok(Object::boolean(check(left.cmp(&right))))
}
