// kiz-vm - The kiz virtual machine
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! The stack-based kiz virtual machine.
//!
//! The VM owns one operand stack and one call stack. The dispatch loop
//! fetches the top frame's current instruction, executes its handler,
//! and advances the pc unless the instruction managed the pc itself
//! (jumps, `TRY_END`, `RET`). A raised host error is converted into a
//! full error object at the instruction boundary and handed to the
//! unwinder; dispatch resumes at the selected catch target, or the run
//! terminates with a captured traceback.

pub mod frame;
pub mod handlers;

use std::io::{self, BufRead, Write};
use std::rc::Rc;

use log::debug;

use kiz_core::builtins::{self, register_builtins};
use kiz_core::{AttrMap, Error, Host, Object, Op, Result};

use crate::report::Uncaught;
use crate::sources::SourceCache;

pub use frame::{CallFrame, TryBlock};

/// The kiz virtual machine.
pub struct Vm {
    /// Operand stack: evaluation scratch.
    pub(crate) op_stack: Vec<Object>,

    /// Call stack; index 0 is the main module's frame.
    pub(crate) call_stack: Vec<CallFrame>,

    /// Module cache: path → module object.
    pub(crate) loaded_modules: AttrMap,

    /// Built-in bindings, populated once at construction.
    pub(crate) builtins: AttrMap,

    /// Standard-module initializers: name → native function.
    pub(crate) std_modules: AttrMap,

    /// The latest thrown error, valid between THROW and handler
    /// completion.
    pub(crate) curr_error: Option<Object>,

    /// Cleared by STOP or a terminal error.
    pub(crate) running: bool,

    /// Captured traceback of an uncaught error, pending delivery.
    uncaught: Option<Uncaught>,

    /// Source text of every executed file, for tracebacks.
    sources: SourceCache,

    /// When set, `print` output is collected here instead of stdout.
    captured_output: Option<Vec<String>>,
}

impl Vm {
    /// Create a VM with builtins and standard modules registered.
    pub fn new() -> Self {
        let mut builtins_map = AttrMap::new();
        register_builtins(&mut builtins_map);

        let mut std_modules = AttrMap::new();
        std_modules.insert("math", Object::native("math", builtins::math::init));

        Vm {
            op_stack: Vec::new(),
            call_stack: Vec::new(),
            loaded_modules: AttrMap::new(),
            builtins: builtins_map,
            std_modules,
            curr_error: None,
            running: false,
            uncaught: None,
            sources: SourceCache::new(),
            captured_output: None,
        }
    }

    // ------------------------------------------------------------------
    // Sources and output
    // ------------------------------------------------------------------

    /// The source cache, for traceback rendering.
    pub fn sources(&self) -> &SourceCache {
        &self.sources
    }

    /// Register a file's source text.
    pub fn add_source(&mut self, path: impl Into<String>, text: impl Into<String>) {
        self.sources.insert(path, text);
    }

    /// Append REPL input to its virtual file; returns the start line.
    pub fn append_source(&mut self, path: &str, chunk: &str) -> usize {
        self.sources.append(path, chunk)
    }

    /// Collect `print` output instead of writing it to stdout.
    pub fn capture_output(&mut self) {
        self.captured_output = Some(Vec::new());
    }

    /// Take the collected output lines.
    pub fn take_output(&mut self) -> Vec<String> {
        self.captured_output
            .replace(Vec::new())
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Entry points
    // ------------------------------------------------------------------

    /// Install a module as frame 0 and execute it to completion.
    pub fn set_main_module(&mut self, module: Object) -> std::result::Result<(), Uncaught> {
        self.install_main_frame(module)?;
        self.finish_run()
    }

    /// Install a module as frame 0 without running it (the REPL drives
    /// execution snippet by snippet).
    pub fn install_main_frame(&mut self, module: Object) -> std::result::Result<(), Uncaught> {
        let Some(def) = module.module_def() else {
            return Err(Uncaught::internal("main module must be a Module object"));
        };
        let Some(code) = def.code else {
            return Err(Uncaught::internal("main module has no code object"));
        };
        let return_to = code.code.len();
        self.call_stack
            .push(CallFrame::new(def.path, module, code, return_to));
        self.running = true;
        debug!("main module installed, {} instructions", return_to);
        Ok(())
    }

    /// Execute one REPL input in the persistent module frame, returning
    /// the value a trailing expression statement left on the stack.
    pub fn run_snippet(
        &mut self,
        code: Rc<kiz_core::CodeObject>,
    ) -> std::result::Result<Option<Object>, Uncaught> {
        if self.call_stack.is_empty() {
            return Err(Uncaught::internal("no main frame installed"));
        }
        // Reset to the module frame: frames or values left behind by an
        // earlier error must not leak into this input.
        self.call_stack.truncate(1);
        self.op_stack.clear();
        let frame = &mut self.call_stack[0];
        frame.code = code;
        frame.pc = 0;
        frame.try_blocks.clear();
        self.running = true;

        self.finish_run().map(|()| self.op_stack.pop())
    }

    fn finish_run(&mut self) -> std::result::Result<(), Uncaught> {
        match self.run_main() {
            Ok(()) => Ok(()),
            Err(Error::Terminated) => Err(self
                .uncaught
                .take()
                .unwrap_or_else(|| Uncaught::internal("terminated with no captured error"))),
            Err(Error::Stop) => Ok(()),
            Err(other) => Err(Uncaught::internal(format!(
                "unexpected signal escaped the dispatch loop: {}",
                other
            ))),
        }
    }

    /// The value on top of the operand stack, if any.
    pub fn stack_top(&self) -> Option<Object> {
        self.op_stack.last().cloned()
    }

    /// Current operand stack depth.
    pub fn stack_depth(&self) -> usize {
        self.op_stack.len()
    }

    /// Current call stack depth.
    pub fn frame_depth(&self) -> usize {
        self.call_stack.len()
    }

    // ------------------------------------------------------------------
    // Dispatch loops
    // ------------------------------------------------------------------

    /// The main loop: drive the top frame until the main
    /// module completes, a STOP lands, or an error goes uncaught.
    fn run_main(&mut self) -> Result<()> {
        while self.running && !self.call_stack.is_empty() {
            let idx = self.call_stack.len() - 1;
            let frame = &self.call_stack[idx];
            if frame.pc >= frame.code.code.len() {
                // A finished frame pops; the finished main module ends
                // the run but keeps its frame (the REPL reuses it).
                if self.call_stack.len() > 1 {
                    self.call_stack.pop();
                    continue;
                }
                break;
            }
            let inst = frame.code.code[frame.pc];

            match self.execute(inst) {
                Ok(()) => {
                    if advances_pc(inst.op) {
                        self.call_stack[idx].pc += 1;
                    }
                }
                Err(Error::Raised { name, message }) => {
                    // On success the unwinder signals Caught: the catch
                    // target's pc is set and dispatch simply continues.
                    match self.instruction_throw(&name, &message) {
                        Ok(()) | Err(Error::Caught) => {}
                        Err(other) => return Err(other),
                    }
                }
                Err(Error::Caught) => {}
                Err(Error::Stop) => self.running = false,
                Err(Error::Terminated) => return Err(Error::Terminated),
            }
        }
        Ok(())
    }

    /// Nested loop used by `call_function`: drive frames above `floor`
    /// to completion. The boundary frame's `RET` pops it and leaves the
    /// return value on the operand stack without touching the caller
    /// frame (the caller's pc is mid-instruction in native code).
    pub(crate) fn run_call(&mut self, floor: usize) -> Result<()> {
        while self.running && self.call_stack.len() > floor {
            let idx = self.call_stack.len() - 1;
            let frame = &self.call_stack[idx];
            if frame.pc >= frame.code.code.len() {
                self.call_stack.pop();
                continue;
            }
            let inst = frame.code.code[frame.pc];

            if matches!(inst.op, Op::Ret) && idx == floor {
                self.call_stack.pop();
                return Ok(());
            }

            match self.execute(inst) {
                Ok(()) => {
                    if advances_pc(inst.op) {
                        self.call_stack[idx].pc += 1;
                    }
                }
                Err(Error::Raised { name, message }) => {
                    match self.instruction_throw(&name, &message) {
                        Ok(()) | Err(Error::Caught) => {}
                        Err(other) => return Err(other),
                    }
                    if self.call_stack.len() <= floor {
                        // The handler sits below this call; abandon it.
                        return Err(Error::Caught);
                    }
                }
                Err(Error::Caught) => {
                    if self.call_stack.len() <= floor {
                        return Err(Error::Caught);
                    }
                }
                Err(other) => return Err(other),
            }
        }
        if !self.running {
            return Err(Error::Stop);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Instruction dispatch
    // ------------------------------------------------------------------

    fn execute(&mut self, inst: kiz_core::Instruction) -> Result<()> {
        match inst.op {
            Op::Add => self.binary_magic(kiz_core::magic::ADD),
            Op::Sub => self.binary_magic(kiz_core::magic::SUB),
            Op::Mul => self.binary_magic(kiz_core::magic::MUL),
            Op::Div => self.binary_magic(kiz_core::magic::DIV),
            Op::Mod => self.binary_magic(kiz_core::magic::MOD),
            Op::Pow => self.binary_magic(kiz_core::magic::POW),
            Op::Neg => self.exec_neg(),
            Op::Eq => self.binary_magic(kiz_core::magic::EQ),
            Op::Ne => self.exec_ne(),
            Op::Lt => self.binary_magic(kiz_core::magic::LT),
            Op::Le => self.exec_le(),
            Op::Gt => self.binary_magic(kiz_core::magic::GT),
            Op::Ge => self.exec_ge(),
            Op::And => self.exec_and(),
            Op::Or => self.exec_or(),
            Op::Not => self.exec_not(),
            Op::Is => self.exec_is(),
            Op::MakeList(count) => self.exec_make_list(count),
            Op::MakeDict(count) => self.exec_make_dict(count),
            Op::Call(argc) => self.exec_call(argc),
            Op::CallMethod { name, argc } => self.exec_call_method(name, argc),
            Op::Ret => self.exec_ret(),
            Op::GetAttr(name) => self.exec_get_attr(name),
            Op::SetAttr(name) => self.exec_set_attr(name),
            Op::GetItem => self.exec_get_item(),
            Op::SetItem => self.exec_set_item(),
            Op::LoadVar(name) => self.exec_load_var(name),
            Op::LoadConst(index) => self.exec_load_const(index),
            Op::SetLocal(name) => self.exec_set_local(name),
            Op::SetNonlocal(name) => self.exec_set_nonlocal(name),
            Op::SetGlobal(name) => self.exec_set_global(name),
            Op::Jump(target) => self.exec_jump(target),
            Op::JumpIfFalse(target) => self.exec_jump_if_false(target),
            Op::TryStart(catch_start) => self.exec_try_start(catch_start),
            Op::TryEnd(end_pc) => self.exec_try_end(end_pc),
            Op::Throw => self.exec_throw(),
            Op::LoadError => self.exec_load_error(),
            Op::IsInstance => self.exec_is_instance(),
            Op::Import(name) => self.exec_import(name),
            Op::CreateObject => self.exec_create_object(),
            Op::PopTop => self.exec_pop_top(),
            Op::Stop => {
                debug!("STOP: clearing running flag");
                self.running = false;
                Ok(())
            }
        }
    }

    // ------------------------------------------------------------------
    // Frame and stack plumbing
    // ------------------------------------------------------------------

    pub(crate) fn current_frame(&self) -> Result<&CallFrame> {
        self.call_stack
            .last()
            .ok_or_else(|| Error::type_error("no active call frame"))
    }

    pub(crate) fn current_frame_mut(&mut self) -> Result<&mut CallFrame> {
        self.call_stack
            .last_mut()
            .ok_or_else(|| Error::type_error("no active call frame"))
    }

    /// The name at `index` of the current frame's name table.
    pub(crate) fn name_at(&self, index: usize) -> Result<String> {
        let frame = self.current_frame()?;
        frame
            .code
            .name(index)
            .map(str::to_string)
            .ok_or_else(|| Error::type_error(format!("name index {} out of range", index)))
    }

    pub(crate) fn push(&mut self, value: Object) {
        self.op_stack.push(value);
    }

    pub(crate) fn pop_stack(&mut self, op_name: &str) -> Result<Object> {
        self.op_stack
            .pop()
            .ok_or_else(|| Error::type_error(format!("{}: operand stack is empty", op_name)))
    }

    /// Pop the right then left operand (`b` was pushed last).
    pub(crate) fn fetch_two(&mut self, op_name: &str) -> Result<(Object, Object)> {
        let b = self.pop_stack(op_name)?;
        let a = self.pop_stack(op_name)?;
        Ok((a, b))
    }
}

/// Whether the dispatcher advances the pc after this instruction.
/// Jumps, `TRY_END` and `RET` manage the pc themselves.
fn advances_pc(op: Op) -> bool {
    !matches!(
        op,
        Op::Jump(_) | Op::JumpIfFalse(_) | Op::TryEnd(_) | Op::Ret
    )
}

impl Default for Vm {
    fn default() -> Self {
        Vm::new()
    }
}

impl Host for Vm {
    fn call(
        &mut self,
        func: &Object,
        args: Vec<Object>,
        self_obj: Option<Object>,
    ) -> Result<Object> {
        self.call_values(func, args, self_obj)
    }

    fn print_line(&mut self, text: &str) {
        match &mut self.captured_output {
            Some(lines) => lines.push(text.to_string()),
            None => println!("{}", text),
        }
    }

    /// Dump every frame and ask whether to continue; anything but `Y`
    /// stops the VM.
    fn debug_break(&mut self) -> Result<()> {
        for (index, frame) in self.call_stack.iter().enumerate() {
            println!("Frame [{}] {}", index, frame.name);
            println!("=================================");
            println!("Owner: {}", frame.owner.display_string());
            println!("Pc: {}", frame.pc);
            let locals: Vec<String> = frame
                .locals
                .iter()
                .map(|(name, value)| format!("{} = {}", name, value.display_string()))
                .collect();
            println!("Locals: {}", locals.join(", "));
            println!("Names: {}", frame.code.names.join(", "));
            let consts: Vec<String> = frame
                .code
                .consts
                .iter()
                .map(Object::debug_string)
                .collect();
            println!("Consts: {}", consts.join(", "));
            println!();
        }
        print!("continue to run? (Y/[N])");
        let _ = io::stdout().flush();
        let mut answer = String::new();
        let _ = io::stdin().lock().read_line(&mut answer);
        if answer.trim() == "Y" {
            Ok(())
        } else {
            Err(Error::Stop)
        }
    }
}
