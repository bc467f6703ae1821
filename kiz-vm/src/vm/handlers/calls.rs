// kiz-vm - Call protocol
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! The call protocol: native functions run to completion and push their
//! result; user functions get a fresh frame with positional arguments
//! bound by the first name-table slots; anything else is tried through
//! its `__call__` attribute with the original object as the receiver.

use log::debug;

use kiz_core::{Error, Object, Result, get_attr, magic};

use crate::vm::frame::CallFrame;
use crate::vm::Vm;

impl Vm {
    /// `CALL n`: pop the callee, pop the argument list, invoke.
    pub(crate) fn exec_call(&mut self, _argc: usize) -> Result<()> {
        let func = self.pop_stack("CALL")?;
        let args = self.pop_stack("CALL")?;
        self.handle_call(&func, args, None)
    }

    /// `CALL_METHOD name n`: pop the receiver, pop the argument list,
    /// resolve the method on the receiver and invoke with it as self.
    pub(crate) fn exec_call_method(&mut self, name_idx: usize, _argc: usize) -> Result<()> {
        let receiver = self.pop_stack("CALL_METHOD")?;
        let args = self.pop_stack("CALL_METHOD")?;
        let name = self.name_at(name_idx)?;
        let func = get_attr(&receiver, &name)?;
        debug!("method call {} on {}", name, receiver.type_name());
        self.handle_call(&func, args, Some(receiver))
    }

    /// `RET`: pop the frame; the caller resumes at its stored return pc
    /// with the return value pushed (Nil if the stack was empty). The
    /// last frame discards the value and terminates execution; its frame
    /// is kept so the REPL can keep using it.
    pub(crate) fn exec_ret(&mut self) -> Result<()> {
        if self.call_stack.len() < 2 {
            self.op_stack.pop();
            self.running = false;
            return Ok(());
        }
        let Some(finished) = self.call_stack.pop() else {
            return Err(Error::type_error("RET with an empty call stack"));
        };
        let return_val = self.op_stack.pop().unwrap_or_else(Object::nil);
        let Some(caller) = self.call_stack.last_mut() else {
            return Err(Error::type_error("RET with no caller frame"));
        };
        caller.pc = finished.return_to_pc;
        self.push(return_val);
        Ok(())
    }

    /// Invoke a callable with an argument-list object. Native functions
    /// run immediately and push their result; user functions push a
    /// frame for the dispatch loop to drive.
    pub(crate) fn handle_call(
        &mut self,
        func: &Object,
        args_list: Object,
        self_obj: Option<Object>,
    ) -> Result<()> {
        let Some(args) = args_list.list_items() else {
            return Err(Error::type_error("call arguments must be a List"));
        };

        if let Some((name, native)) = func.native_fn() {
            debug!("native call {}", name);
            let result = (*native)(self, self_obj, &args)?;
            self.push(result);
            return Ok(());
        }

        if let Some(def) = func.function_def() {
            let mut args = args;
            // The receiver is prepended only when the explicit argument
            // count is one short of the arity; method-style code may
            // pass the receiver explicitly instead.
            if let Some(self_obj) = self_obj
                && args.len() + 1 == def.argc
            {
                args.insert(0, self_obj);
            }
            if args.len() != def.argc {
                return Err(Error::type_error(format!(
                    "{}() takes {} argument{}, got {}",
                    def.name,
                    def.argc,
                    if def.argc == 1 { "" } else { "s" },
                    args.len()
                )));
            }

            let return_to = self.call_stack.last().map(|f| f.pc + 1).unwrap_or(0);
            let mut frame = CallFrame::new(def.name.clone(), func.clone(), def.code.clone(), return_to);
            for (index, arg) in args.iter().enumerate() {
                let Some(param) = frame.code.name(index) else {
                    return Err(Error::type_error(format!(
                        "{}(): parameter name index {} out of range",
                        def.name, index
                    )));
                };
                let param = param.to_string();
                frame.locals.insert(param, arg.clone());
            }
            debug!("pushing frame for {}", def.name);
            self.call_stack.push(frame);
            return Ok(());
        }

        // Not directly callable: try the object's __call__ with the
        // object itself as the receiver.
        match get_attr(func, magic::CALL) {
            Ok(callable) => self.handle_call(&callable, args_list, Some(func.clone())),
            Err(_) => Err(Error::type_error("try to call an uncallable object")),
        }
    }

    /// Call a callable to completion and return its result (the contract
    /// native functions see through `Host::call`).
    pub(crate) fn call_function(
        &mut self,
        func: &Object,
        args_list: Object,
        self_obj: Option<Object>,
    ) -> Result<Object> {
        let floor = self.call_stack.len();
        self.handle_call(func, args_list, self_obj)?;
        if self.call_stack.len() > floor {
            self.run_call(floor)?;
        }
        self.pop_stack("call")
    }

    /// `call_function` over a plain argument vector.
    pub(crate) fn call_values(
        &mut self,
        func: &Object,
        args: Vec<Object>,
        self_obj: Option<Object>,
    ) -> Result<Object> {
        self.call_function(func, Object::list(args), self_obj)
    }
}
