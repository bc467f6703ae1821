// kiz-core - Built-in free functions
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! The free functions bound in the builtins table.

use std::io::{self, BufRead, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use num_bigint::BigInt;

use crate::error::{Error, Result};
use crate::host::Host;
use crate::magic;
use crate::object::{Object, get_attr};

use super::{is_child_of, one_arg, two_args};

/// `print(...)`: the display rendering of each argument, space
/// separated, one line.
pub fn print(host: &mut dyn Host, _self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    let rendered: Vec<String> = args.iter().map(Object::display_string).collect();
    host.print_line(&rendered.join(" "));
    Ok(Object::nil())
}

/// `input(prompt)`: write the prompt, read one line from stdin.
pub fn input(_host: &mut dyn Host, _self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    let prompt = one_arg("input", args)?;
    print!("{}", prompt.display_string());
    let _ = io::stdout().flush();
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| Error::type_error(format!("input: {}", e)))?;
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(Object::string(line))
}

/// `ischild(obj, proto)`: prototype-chain membership test.
pub fn ischild(_host: &mut dyn Host, _self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    let (obj, proto) = two_args("ischild", args)?;
    Ok(Object::boolean(is_child_of(obj, proto)))
}

/// `create()` makes a fresh object; `create(parent)` makes one whose
/// `__parent__` is the argument.
pub fn create(_host: &mut dyn Host, _self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    match args {
        [] => Ok(Object::plain()),
        [parent] => {
            let obj = Object::plain();
            obj.set_attr(magic::PARENT, parent.clone());
            Ok(obj)
        }
        _ => Err(Error::arity("create", 1, args.len())),
    }
}

/// `now()`: nanoseconds since the Unix epoch as an Int.
pub fn now(_host: &mut dyn Host, _self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    if !args.is_empty() {
        return Err(Error::arity("now", 0, args.len()));
    }
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Error::type_error(format!("now: {}", e)))?;
    Ok(Object::int(BigInt::from(elapsed.as_nanos())))
}

/// `get_refc(obj)`: the current reference count of the argument.
pub fn get_refc(_host: &mut dyn Host, _self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    let obj = one_arg("get_refc", args)?;
    Ok(Object::int_from(obj.refc() as i64))
}

/// `breakpoint()`: dump the call stack and ask whether to continue.
pub fn breakpoint(host: &mut dyn Host, _self_obj: Option<Object>, _args: &[Object]) -> Result<Object> {
    host.debug_break()?;
    Ok(Object::nil())
}

/// `setattr(obj, name, value)`.
pub fn setattr(_host: &mut dyn Host, _self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    if args.len() != 3 {
        return Err(Error::arity("setattr", 3, args.len()));
    }
    let name = attr_name("setattr", &args[1])?;
    args[0].set_attr(name, args[2].clone());
    Ok(Object::nil())
}

/// `getattr(obj, name)`: attribute lookup with the prototype walk.
pub fn getattr(_host: &mut dyn Host, _self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    let (obj, name) = two_args("getattr", args)?;
    get_attr(obj, &attr_name("getattr", name)?)
}

/// `hasattr(obj, name)`: whether the lookup would succeed.
pub fn hasattr(_host: &mut dyn Host, _self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    let (obj, name) = two_args("hasattr", args)?;
    Ok(Object::boolean(
        get_attr(obj, &attr_name("hasattr", name)?).is_ok(),
    ))
}

/// `delattr(obj, name)`: remove an attribute bound on the object itself.
pub fn delattr(_host: &mut dyn Host, _self_obj: Option<Object>, args: &[Object]) -> Result<Object> {
    let (obj, name) = two_args("delattr", args)?;
    obj.remove_attr(&attr_name("delattr", name)?);
    Ok(Object::nil())
}

fn attr_name(fn_name: &str, arg: &Object) -> Result<String> {
    arg.str_value().ok_or_else(|| {
        Error::type_error(format!(
            "{} needs a Str attribute name, got {}",
            fn_name,
            arg.type_name()
        ))
    })
}

// Reserved surface: bound in builtins, semantics unspecified.

pub fn range(_host: &mut dyn Host, _self_obj: Option<Object>, _args: &[Object]) -> Result<Object> {
    Ok(Object::nil())
}

pub fn help(_host: &mut dyn Host, _self_obj: Option<Object>, _args: &[Object]) -> Result<Object> {
    Ok(Object::nil())
}

pub fn cmd(_host: &mut dyn Host, _self_obj: Option<Object>, _args: &[Object]) -> Result<Object> {
    Ok(Object::nil())
}

pub fn type_of(_host: &mut dyn Host, _self_obj: Option<Object>, _args: &[Object]) -> Result<Object> {
    Ok(Object::nil())
}
