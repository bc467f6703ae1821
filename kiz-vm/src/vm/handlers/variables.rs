// kiz-vm - Variable resolution handlers
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Variable resolution.
//!
//! `LOAD_VAR` scans the call stack's frame locals from top to bottom
//! (resolution is dynamic, not lexical), then the builtins table, then
//! the owner module's exports. Stores target the current frame
//! (`SET_LOCAL`), the bottom frame (`SET_GLOBAL`), or the nearest
//! enclosing frame that already binds the name (`SET_NONLOCAL`).

use log::trace;

use kiz_core::{Error, Result, magic};

use crate::vm::Vm;

impl Vm {
    pub(crate) fn exec_load_var(&mut self, name_idx: usize) -> Result<()> {
        let name = self.name_at(name_idx)?;

        let from_frames = self
            .call_stack
            .iter()
            .rev()
            .find_map(|frame| frame.locals.get(&name));
        if let Some(value) = from_frames {
            trace!("load {} from frame locals", name);
            self.push(value);
            return Ok(());
        }

        // Bindings the owner function captured when it was created; the
        // defining frame may be long gone.
        let owner = self.current_frame()?.owner.clone();
        let from_closure = owner
            .get_attr_local(magic::CLOSURE)
            .and_then(|env| env.get_attr_local(&name));
        if let Some(value) = from_closure {
            trace!("load {} from captured bindings", name);
            self.push(value);
            return Ok(());
        }

        if let Some(value) = self.builtins.get(&name) {
            trace!("load {} from builtins", name);
            self.push(value);
            return Ok(());
        }

        // Functions exported from a module resolve that module's
        // bindings through their __owner_module__ edge.
        let from_module = owner
            .get_attr_local(magic::OWNER_MODULE)
            .and_then(|module| module.get_attr_local(&name));
        if let Some(value) = from_module {
            trace!("load {} from owner module", name);
            self.push(value);
            return Ok(());
        }

        Err(Error::name_error(format!("Undefined variable '{}'", name)))
    }

    pub(crate) fn exec_load_const(&mut self, const_idx: usize) -> Result<()> {
        let value = self
            .current_frame()?
            .code
            .constant(const_idx)
            .ok_or_else(|| {
                Error::type_error(format!("constant index {} out of range", const_idx))
            })?;

        // Loading a function constant creates the closure: a fresh
        // function object capturing the defining frame's bindings (and,
        // transitively, what the defining function itself captured), so
        // the function stays usable after this frame is popped.
        if let Some(def) = value.function_def() {
            let func = kiz_core::Object::function(def.name, def.code, def.argc);
            let env = kiz_core::Object::bare();
            let frame = self.current_frame()?;
            if let Some(outer) = frame.owner.get_attr_local(magic::CLOSURE) {
                for (name, captured) in outer.attrs_snapshot() {
                    env.set_attr(name, captured);
                }
            }
            for (name, local) in frame.locals.to_vec() {
                env.set_attr(name, local);
            }
            func.set_attr(magic::CLOSURE, env);
            self.push(func);
            return Ok(());
        }

        self.push(value);
        Ok(())
    }

    pub(crate) fn exec_set_local(&mut self, name_idx: usize) -> Result<()> {
        let name = self.name_at(name_idx)?;
        let value = self.pop_stack("SET_LOCAL")?;
        self.current_frame_mut()?.locals.insert(name, value);
        Ok(())
    }

    pub(crate) fn exec_set_global(&mut self, name_idx: usize) -> Result<()> {
        let name = self.name_at(name_idx)?;
        let value = self.pop_stack("SET_GLOBAL")?;
        let Some(global_frame) = self.call_stack.first_mut() else {
            return Err(Error::type_error("SET_GLOBAL with no active call frame"));
        };
        global_frame.locals.insert(name, value);
        Ok(())
    }

    /// Rebind in the nearest enclosing frame that already binds the
    /// name; a miss everywhere is a NameError.
    pub(crate) fn exec_set_nonlocal(&mut self, name_idx: usize) -> Result<()> {
        let name = self.name_at(name_idx)?;
        let value = self.pop_stack("SET_NONLOCAL")?;
        if self.call_stack.len() < 2 {
            return Err(Error::name_error(format!("Undefined variable '{}'", name)));
        }
        let top = self.call_stack.len() - 1;
        for frame in self.call_stack[..top].iter_mut().rev() {
            if frame.locals.contains(&name) {
                frame.locals.insert(name, value);
                return Ok(());
            }
        }
        Err(Error::name_error(format!("Undefined variable '{}'", name)))
    }
}
