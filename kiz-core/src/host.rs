// kiz-core - The contract the VM exposes to native functions
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! The contract the VM exposes to native functions.
//!
//! Built-in methods receive a `&mut dyn Host` so they can call back into
//! the interpreter (magic-method dispatch, truthiness, program output)
//! without this crate depending on the VM.

use crate::error::Result;
use crate::magic;
use crate::object::{Object, get_attr};

/// Services the VM provides to native code.
pub trait Host {
    /// Call a callable to completion and return its result. `args` are
    /// the positional arguments; `self_obj` is prepended for user
    /// functions and passed separately to natives.
    fn call(&mut self, func: &Object, args: Vec<Object>, self_obj: Option<Object>)
    -> Result<Object>;

    /// Truthiness: a Bool is its value, Nil is false, everything else
    /// dispatches to `__bool__` and recurses on the result.
    fn is_true(&mut self, obj: &Object) -> Result<bool> {
        if let Some(value) = obj.bool_value() {
            return Ok(value);
        }
        if obj.is_nil() {
            return Ok(false);
        }
        let bool_method = get_attr(obj, magic::BOOL)?;
        let result = self.call(&bool_method, Vec::new(), Some(obj.clone()))?;
        self.is_true(&result)
    }

    /// Write one line of program output (the `print` builtin). The VM
    /// can redirect this into a capture buffer for tests.
    fn print_line(&mut self, text: &str) {
        println!("{}", text);
    }

    /// Interactive frame dump for the `breakpoint` builtin. Returns
    /// `Error::Stop` when the user aborts.
    fn debug_break(&mut self) -> Result<()> {
        Ok(())
    }
}
