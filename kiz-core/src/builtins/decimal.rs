// kiz-core - Decimal magic methods
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Magic methods of the Decimal prototype. Int operands promote to
//! Decimal; results stay Decimal.

use num_bigint::BigInt;
use num_traits::Signed;

use crate::error::{Error, Result};
use crate::host::Host;
use crate::num::Decimal;
use crate::object::Object;

use super::{one_arg, receiver};

/// Fractional digits kept by `/`.
const DIV_DIGITS: u32 = 10;

fn self_decimal(name: &str, self_obj: &Option<Object>) -> Result<Decimal> {
    receiver(name, self_obj)?
        .decimal_value()
        .ok_or_else(|| Error::type_error(format!("{} must be called on a Decimal", name)))
}

fn decimal_operand(name: &str, arg: &Object) -> Result<Decimal> {
    if let Some(value) = arg.decimal_value() {
        Ok(value)
    } else if let Some(value) = arg.int_value() {
        Ok(Decimal::from_int(&value))
    } else {
        Err(Error::type_error(format!(
            "{} needs an Int or Decimal, got {}",
            name,
            arg.type_name()
        )))
    }
}

fn decimal_binary(
    name: &str,
    self_obj: &Option<Object>,
    args: &[Object],
    op: impl FnOnce(Decimal, Decimal) -> Decimal,
) -> Result<Object> {
    let left = self_decimal(name, self_obj)?;
    let right = decimal_operand(name, one_arg(name, args)?)?;
    Ok(Object::decimal(op(left, right)))
}

pub fn decimal_add(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    decimal_binary("Decimal.__add__", &self_obj, args, |a, b| a + b)
}

pub fn decimal_sub(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    decimal_binary("Decimal.__sub__", &self_obj, args, |a, b| a - b)
}

pub fn decimal_mul(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    decimal_binary("Decimal.__mul__", &self_obj, args, |a, b| a * b)
}

pub fn decimal_div(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    let left = self_decimal("Decimal.__div__", &self_obj)?;
    let right = decimal_operand("Decimal.__div__", one_arg("Decimal.__div__", args)?)?;
    left.div(&right, DIV_DIGITS)
        .map(Object::decimal)
        .ok_or_else(|| Error::zero_division("division by zero"))
}

/// `d.safe_div(other)`: like `__div__`, but a zero divisor yields Nil
/// instead of raising.
pub fn decimal_safe_div(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    let left = self_decimal("Decimal.safe_div", &self_obj)?;
    let right = decimal_operand("Decimal.safe_div", one_arg("Decimal.safe_div", args)?)?;
    Ok(left
        .div(&right, DIV_DIGITS)
        .map(Object::decimal)
        .unwrap_or_else(Object::nil))
}

pub fn decimal_pow(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    let base = self_decimal("Decimal.__pow__", &self_obj)?;
    let right = one_arg("Decimal.__pow__", args)?;
    let Some(exponent) = right.int_value() else {
        return Err(Error::type_error(format!(
            "Decimal.__pow__ needs an Int exponent, got {}",
            right.type_name()
        )));
    };
    if exponent.is_negative() {
        return Err(Error::type_error(
            "Decimal.__pow__ does not support negative exponents",
        ));
    }
    base.pow(&exponent)
        .map(Object::decimal)
        .ok_or_else(|| Error::overflow_error("exponent too large"))
}

pub fn decimal_neg(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    if !args.is_empty() {
        return Err(Error::arity("Decimal.__neg__", 0, args.len()));
    }
    let value = self_decimal("Decimal.__neg__", &self_obj)?;
    Ok(Object::decimal(-value))
}

pub fn decimal_eq(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    decimal_compare("Decimal.__eq__", &self_obj, args, |ordering| ordering.is_eq())
}

pub fn decimal_lt(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    decimal_compare("Decimal.__lt__", &self_obj, args, |ordering| ordering.is_lt())
}

pub fn decimal_gt(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    decimal_compare("Decimal.__gt__", &self_obj, args, |ordering| ordering.is_gt())
}

fn decimal_compare(
    name: &str,
    self_obj: &Option<Object>,
    args: &[Object],
    check: impl FnOnce(std::cmp::Ordering) -> bool,
) -> Result<Object> {
    let left = self_decimal(name, self_obj)?;
    let right = decimal_operand(name, one_arg(name, args)?)?;
    Ok(Object::boolean(check(left.cmp(&right))))
}

pub fn decimal_bool(
    _host: &mut dyn Host,
    self_obj: Option<Object>,
    _args: &[Object],
) -> Result<Object> {
    let value = self_decimal("Decimal.__bool__", &self_obj)?;
    Ok(Object::boolean(!value.is_zero()))
}

/// `Decimal(x)` constructor: strings, ints, decimals, and falsy values.
pub fn decimal_call(
    host: &mut dyn Host,
    _self_obj: Option<Object>,
    args: &[Object],
) -> Result<Object> {
    let arg = one_arg("Decimal", args)?;
    if let Some(text) = arg.str_value() {
        return Decimal::parse(&text)
            .map(Object::decimal)
            .ok_or_else(|| Error::type_error(format!("cannot parse '{}' as a Decimal", text)));
    }
    if let Some(value) = arg.int_value() {
        return Ok(Object::decimal(Decimal::from_int(&value)));
    }
    if let Some(value) = arg.decimal_value() {
        return Ok(Object::decimal(value));
    }
    if !host.is_true(arg)? {
        return Ok(Object::decimal(Decimal::from_int(&BigInt::from(0))));
    }
    Err(Error::type_error(format!(
        "cannot construct a Decimal from {}",
        arg.type_name()
    )))
}
