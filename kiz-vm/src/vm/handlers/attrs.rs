// kiz-vm - Attribute and item access handlers
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Attribute access (`GET_ATTR`/`SET_ATTR`) and item access, which is
//! sugar for the `__getitem__`/`__setitem__` protocol.

use kiz_core::{Object, Result, get_attr, magic};

use crate::vm::Vm;

impl Vm {
    pub(crate) fn exec_get_attr(&mut self, name_idx: usize) -> Result<()> {
        let obj = self.pop_stack("GET_ATTR")?;
        let name = self.name_at(name_idx)?;
        let value = get_attr(&obj, &name)?;
        self.push(value);
        Ok(())
    }

    /// Writes unconditionally, shadowing any inherited attribute.
    pub(crate) fn exec_set_attr(&mut self, name_idx: usize) -> Result<()> {
        let value = self.pop_stack("SET_ATTR")?;
        let obj = self.pop_stack("SET_ATTR")?;
        let name = self.name_at(name_idx)?;
        obj.set_attr(name, value);
        Ok(())
    }

    /// `obj[args]`: invoke `obj.__getitem__(args)` and push the result.
    pub(crate) fn exec_get_item(&mut self) -> Result<()> {
        let obj = self.pop_stack("GET_ITEM")?;
        let args = self.pop_stack("GET_ITEM")?;
        let func = get_attr(&obj, magic::GET_ITEM)?;
        let result = self.call_function(&func, args, Some(obj))?;
        self.push(result);
        Ok(())
    }

    /// `obj[key] = value`: invoke `obj.__setitem__([key, value])`,
    /// discarding the result.
    pub(crate) fn exec_set_item(&mut self) -> Result<()> {
        let value = self.pop_stack("SET_ITEM")?;
        let key = self.pop_stack("SET_ITEM")?;
        let obj = self.pop_stack("SET_ITEM")?;
        let func = get_attr(&obj, magic::SET_ITEM)?;
        self.call_function(&func, Object::list(vec![key, value]), Some(obj))?;
        Ok(())
    }
}
