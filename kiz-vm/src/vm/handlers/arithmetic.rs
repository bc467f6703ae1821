// kiz-vm - Arithmetic, comparison and logic handlers
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Arithmetic, comparison and logic opcode handlers.
//!
//! Binary operators pop the right then the left operand and dispatch to
//! the left operand's magic method; the dispatcher itself is
//! type-agnostic. `>=`/`<=` are composed from `__eq__` plus
//! `__gt__`/`__lt__`, `!=` negates `__eq__`, and `and`/`or` return the
//! deciding operand object rather than a coerced Bool.

use kiz_core::{Host, Object, Result, get_attr, magic};

use crate::vm::Vm;

impl Vm {
    /// Pop two operands and invoke `left.<method>(right)`.
    pub(crate) fn binary_magic(&mut self, method: &str) -> Result<()> {
        let (a, b) = self.fetch_two(method)?;
        let func = get_attr(&a, method)?;
        let result = self.call_values(&func, vec![b], Some(a))?;
        self.push(result);
        Ok(())
    }

    pub(crate) fn exec_neg(&mut self) -> Result<()> {
        let a = self.pop_stack("OP_NEG")?;
        let func = get_attr(&a, magic::NEG)?;
        let result = self.call_values(&func, Vec::new(), Some(a))?;
        self.push(result);
        Ok(())
    }

    pub(crate) fn exec_ne(&mut self) -> Result<()> {
        let (a, b) = self.fetch_two("OP_NE")?;
        let eq = get_attr(&a, magic::EQ)?;
        let result = self.call_values(&eq, vec![b], Some(a))?;
        let equal = self.is_true(&result)?;
        self.push(Object::boolean(!equal));
        Ok(())
    }

    pub(crate) fn exec_ge(&mut self) -> Result<()> {
        self.compare_with_eq("OP_GE", magic::GT)
    }

    pub(crate) fn exec_le(&mut self) -> Result<()> {
        self.compare_with_eq("OP_LE", magic::LT)
    }

    /// `a >= b` is `a.__gt__(b) or a.__eq__(b)` (and `<=` likewise with
    /// `__lt__`).
    fn compare_with_eq(&mut self, op_name: &str, strict_method: &str) -> Result<()> {
        let (a, b) = self.fetch_two(op_name)?;

        let eq = get_attr(&a, magic::EQ)?;
        let eq_result = self.call_values(&eq, vec![b.clone()], Some(a.clone()))?;
        if self.is_true(&eq_result)? {
            self.push(Object::boolean(true));
            return Ok(());
        }

        let strict = get_attr(&a, strict_method)?;
        let strict_result = self.call_values(&strict, vec![b], Some(a))?;
        let holds = self.is_true(&strict_result)?;
        self.push(Object::boolean(holds));
        Ok(())
    }

    pub(crate) fn exec_and(&mut self) -> Result<()> {
        let (a, b) = self.fetch_two("OP_AND")?;
        if self.is_true(&a)? {
            self.push(b);
        } else {
            self.push(a);
        }
        Ok(())
    }

    pub(crate) fn exec_or(&mut self) -> Result<()> {
        let (a, b) = self.fetch_two("OP_OR")?;
        if self.is_true(&a)? {
            self.push(a);
        } else {
            self.push(b);
        }
        Ok(())
    }

    pub(crate) fn exec_not(&mut self) -> Result<()> {
        let a = self.pop_stack("OP_NOT")?;
        let truthy = self.is_true(&a)?;
        self.push(Object::boolean(!truthy));
        Ok(())
    }

    /// Pointer identity, no dispatch.
    pub(crate) fn exec_is(&mut self) -> Result<()> {
        let (a, b) = self.fetch_two("OP_IS")?;
        self.push(Object::boolean(a.is(&b)));
        Ok(())
    }
}
