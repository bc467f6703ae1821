// kiz-core - The math standard module
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! The `math` standard module: an initializer the VM registers in its
//! std-modules table; `import math` calls it and binds the returned
//! native module.

use num_traits::Signed;

use crate::error::{Error, Result};
use crate::host::Host;
use crate::num::Decimal;
use crate::object::Object;

use super::one_arg;

/// Build the `math` module object.
pub fn init(_host: &mut dyn Host, _self_obj: Option<Object>, _args: &[Object]) -> Result<Object> {
    let module = Object::module("math", "math", None);
    module.set_attr("one", Object::int_from(1));
    module.set_attr(
        "pi",
        Object::decimal(Decimal::parse("3.14159265358979323846").expect("pi literal parses")),
    );
    module.set_attr(
        "e",
        Object::decimal(Decimal::parse("2.71828182845904523536").expect("e literal parses")),
    );
    module.set_attr("abs", Object::native("abs", math_abs));
    module.set_attr("max", Object::native("max", math_max));
    module.set_attr("min", Object::native("min", math_min));
    Ok(module)
}

fn math_abs(_host: &mut dyn Host, _self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    let arg = one_arg("math.abs", args)?;
    if let Some(value) = arg.int_value() {
        return Ok(Object::int(value.abs()));
    }
    if let Some(value) = arg.decimal_value() {
        return Ok(Object::decimal(if value.is_negative() { -value } else { value }));
    }
    Err(Error::type_error(format!(
        "math.abs needs an Int or Decimal, got {}",
        arg.type_name()
    )))
}

fn math_extreme(
    name: &str,
    args: &[Object],
    keep_left: impl Fn(std::cmp::Ordering) -> bool,
) -> Result<Object> {
    if args.is_empty() {
        return Err(Error::type_error(format!("{} needs at least one argument", name)));
    }
    let mut best = args[0].clone();
    for candidate in &args[1..] {
        let ordering = compare_numbers(name, &best, candidate)?;
        if !keep_left(ordering) {
            best = candidate.clone();
        }
    }
    Ok(best)
}

fn compare_numbers(name: &str, a: &Object, b: &Object) -> Result<std::cmp::Ordering> {
    let to_decimal = |obj: &Object| -> Result<Decimal> {
        if let Some(value) = obj.int_value() {
            Ok(Decimal::from_int(&value))
        } else if let Some(value) = obj.decimal_value() {
            Ok(value)
        } else {
            Err(Error::type_error(format!(
                "{} needs Int or Decimal arguments, got {}",
                name,
                obj.type_name()
            )))
        }
    };
    Ok(to_decimal(a)?.cmp(&to_decimal(b)?))
}

fn math_max(_host: &mut dyn Host, _self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    math_extreme("math.max", args, |ordering| ordering.is_ge())
}

fn math_min(_host: &mut dyn Host, _self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    math_extreme("math.min", args, |ordering| ordering.is_le())
}
