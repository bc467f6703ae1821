// kiz-core - Int magic methods
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Magic methods of the Int prototype.
//!
//! Mixed Int/Decimal operands promote to Decimal. Division always
//! produces a Decimal with ten fractional digits; a negative exponent
//! turns exponentiation into Decimal as well.

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::error::{Error, Result};
use crate::host::Host;
use crate::num::Decimal;
use crate::object::Object;

use super::{one_arg, receiver};

/// Fractional digits kept by `/` on integers.
const DIV_DIGITS: u32 = 10;

fn self_int(name: &str, self_obj: &Option<Object>) -> Result<BigInt> {
    receiver(name, self_obj)?
        .int_value()
        .ok_or_else(|| Error::type_error(format!("{} must be called on an Int", name)))
}

fn int_or_decimal_error(name: &str, got: &Object) -> Error {
    Error::type_error(format!(
        "{} needs an Int or Decimal, got {}",
        name,
        got.type_name()
    ))
}

/// Shared shape of the promoting binary operations.
fn int_binary(
    name: &str,
    self_obj: &Option<Object>,
    args: &[Object],
    int_op: impl FnOnce(&BigInt, &BigInt) -> Object,
    dec_op: impl FnOnce(Decimal, Decimal) -> Object,
) -> Result<Object> {
    let left = self_int(name, self_obj)?;
    let right = one_arg(name, args)?;
    if let Some(other) = right.int_value() {
        Ok(int_op(&left, &other))
    } else if let Some(other) = right.decimal_value() {
        Ok(dec_op(Decimal::from_int(&left), other))
    } else {
        Err(int_or_decimal_error(name, right))
    }
}

pub fn int_add(_host: &mut dyn Host, self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    int_binary(
        "Int.__add__",
        &self_obj,
        args,
        |a, b| Object::int(a + b),
        |a, b| Object::decimal(a + b),
    )
}

pub fn int_sub(_host: &mut dyn Host, self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    int_binary(
        "Int.__sub__",
        &self_obj,
        args,
        |a, b| Object::int(a - b),
        |a, b| Object::decimal(a - b),
    )
}

pub fn int_mul(_host: &mut dyn Host, self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    int_binary(
        "Int.__mul__",
        &self_obj,
        args,
        |a, b| Object::int(a * b),
        |a, b| Object::decimal(a * b),
    )
}

pub fn int_div(_host: &mut dyn Host, self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    let left = self_int("Int.__div__", &self_obj)?;
    let right = one_arg("Int.__div__", args)?;
    let divisor = if let Some(other) = right.int_value() {
        Decimal::from_int(&other)
    } else if let Some(other) = right.decimal_value() {
        other
    } else {
        return Err(int_or_decimal_error("Int.__div__", right));
    };
    Decimal::from_int(&left)
        .div(&divisor, DIV_DIGITS)
        .map(Object::decimal)
        .ok_or_else(|| Error::zero_division("division by zero"))
}

pub fn int_mod(_host: &mut dyn Host, self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    let left = self_int("Int.__mod__", &self_obj)?;
    let right = one_arg("Int.__mod__", args)?;
    let Some(divisor) = right.int_value() else {
        return Err(Error::type_error(format!(
            "Int.__mod__ needs an Int, got {}",
            right.type_name()
        )));
    };
    if divisor.is_zero() {
        return Err(Error::zero_division("modulo by zero"));
    }
    // Remainder sign follows the divisor.
    let mut remainder = &left % &divisor;
    if !remainder.is_zero() && (left.is_negative() != divisor.is_negative()) {
        remainder += &divisor;
    }
    Ok(Object::int(remainder))
}

pub fn int_pow(_host: &mut dyn Host, self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    let base = self_int("Int.__pow__", &self_obj)?;
    let right = one_arg("Int.__pow__", args)?;
    let Some(exponent) = right.int_value() else {
        return Err(Error::type_error(format!(
            "Int.__pow__ needs an Int exponent, got {}",
            right.type_name()
        )));
    };
    if exponent.is_negative() {
        // base^-n is Decimal: 1 / base^n.
        let positive = exponent.abs();
        let powered = Decimal::from_int(&base)
            .pow(&positive)
            .ok_or_else(|| Error::overflow_error("exponent too large"))?;
        return Decimal::from_int(&BigInt::from(1))
            .div(&powered, DIV_DIGITS)
            .map(Object::decimal)
            .ok_or_else(|| Error::zero_division("zero cannot be raised to a negative power"));
    }
    let exponent = exponent
        .to_u32()
        .ok_or_else(|| Error::overflow_error("exponent too large"))?;
    Ok(Object::int(base.pow(exponent)))
}

pub fn int_neg(_host: &mut dyn Host, self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    if !args.is_empty() {
        return Err(Error::arity("Int.__neg__", 0, args.len()));
    }
    let value = self_int("Int.__neg__", &self_obj)?;
    Ok(Object::int(-value))
}

pub fn int_eq(_host: &mut dyn Host, self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    int_compare("Int.__eq__", &self_obj, args, |ordering| ordering.is_eq())
}

pub fn int_lt(_host: &mut dyn Host, self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    int_compare("Int.__lt__", &self_obj, args, |ordering| ordering.is_lt())
}

pub fn int_gt(_host: &mut dyn Host, self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    int_compare("Int.__gt__", &self_obj, args, |ordering| ordering.is_gt())
}

fn int_compare(
    name: &str,
    self_obj: &Option<Object>,
    args: &[Object],
    check: impl FnOnce(std::cmp::Ordering) -> bool,
) -> Result<Object> {
    let left = self_int(name, self_obj)?;
    let right = one_arg(name, args)?;
    let ordering = if let Some(other) = right.int_value() {
        left.cmp(&other)
    } else if let Some(other) = right.decimal_value() {
        Decimal::from_int(&left).cmp(&other)
    } else {
        return Err(int_or_decimal_error(name, right));
    };
    Ok(Object::boolean(check(ordering)))
}

pub fn int_bool(_host: &mut dyn Host, self_obj: Option<Object>, _args: &[Object]) -> Result<Object> {
    let value = self_int("Int.__bool__", &self_obj)?;
    Ok(Object::boolean(!value.is_zero()))
}

/// `Int(x)` constructor: parses strings, copies ints, maps everything
/// else to zero.
pub fn int_call(_host: &mut dyn Host, _self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    let arg = one_arg("Int", args)?;
    if let Some(text) = arg.str_value() {
        let value: BigInt = text
            .trim()
            .parse()
            .map_err(|_| Error::type_error(format!("cannot parse '{}' as an Int", text)))?;
        return Ok(Object::int(value));
    }
    if let Some(value) = arg.int_value() {
        return Ok(Object::int(value));
    }
    Ok(Object::int_from(0))
}

pub fn int_hash(_host: &mut dyn Host, self_obj: Option<Object>, _args: &[Object]) -> Result<Object> {
    let value = self_int("Int.__hash__", &self_obj)?;
    Ok(Object::int(value))
}
