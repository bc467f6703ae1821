// kiz-vm - Container construction handlers
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! List and dict construction, fresh-object creation, and the stack
//! hygiene opcode.

use kiz_core::builtins::hash_key;
use kiz_core::{Dict, Object, Result};

use crate::vm::Vm;

impl Vm {
    /// Pop `count` elements (stack top is the last) and push a list in
    /// source order.
    pub(crate) fn exec_make_list(&mut self, count: usize) -> Result<()> {
        let mut elements = Vec::with_capacity(count);
        for _ in 0..count {
            elements.push(self.pop_stack("MAKE_LIST")?);
        }
        elements.reverse();
        self.push(Object::list(elements));
        Ok(())
    }

    /// Pop `count` key/value pairs (pushed in source order, so popped in
    /// reverse, value first) and build a dict keyed by each key's
    /// `__hash__` fingerprint.
    pub(crate) fn exec_make_dict(&mut self, count: usize) -> Result<()> {
        let mut pairs = Vec::with_capacity(count);
        for _ in 0..count {
            let value = self.pop_stack("MAKE_DICT")?;
            let key = self.pop_stack("MAKE_DICT")?;
            pairs.push((key, value));
        }
        pairs.reverse();

        let mut entries = Dict::new();
        for (key, value) in pairs {
            let fingerprint = hash_key(self, &key)?;
            entries.insert(fingerprint, key, value);
        }
        self.push(Object::dict(entries));
        Ok(())
    }

    /// A fresh object parented to the object prototype, for the
    /// `object ... end` statement form.
    pub(crate) fn exec_create_object(&mut self) -> Result<()> {
        self.push(Object::plain());
        Ok(())
    }

    pub(crate) fn exec_pop_top(&mut self) -> Result<()> {
        self.pop_stack("POP_TOP")?;
        Ok(())
    }
}
