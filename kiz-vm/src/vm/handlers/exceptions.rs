// kiz-vm - Exception machinery
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! The exception machinery.
//!
//! Two layers: a raised host error becomes a full error object (with a
//! traceback captured by walking the call stack) at the instruction
//! boundary; the outer unwinder then walks frames from the top looking
//! for an armed try-block whose body is still executing, drops the
//! frames above it and resumes at the catch target. With no handler the
//! run terminates, keeping the traceback for rendering.

use log::debug;

use kiz_core::builtins::is_child_of;
use kiz_core::{Error, Object, Result};
use kiz_parser::Span;

use crate::report::Uncaught;
use crate::vm::frame::TryBlock;
use crate::vm::Vm;

impl Vm {
    /// `TRY_START catch_pc`: arm a try-block on the current frame.
    pub(crate) fn exec_try_start(&mut self, catch_start: usize) -> Result<()> {
        self.current_frame_mut()?
            .try_blocks
            .push(TryBlock { catch_start });
        Ok(())
    }

    /// `TRY_END end_pc`: normal exit from a try body. Disarm the block
    /// and jump past the catch handlers.
    pub(crate) fn exec_try_end(&mut self, end_pc: usize) -> Result<()> {
        let frame = self.current_frame_mut()?;
        frame.try_blocks.pop();
        frame.pc = end_pc;
        Ok(())
    }

    /// `THROW`: take the error object off the stack, attach the captured
    /// traceback, and unwind.
    pub(crate) fn exec_throw(&mut self) -> Result<()> {
        let error = self.pop_stack("THROW")?;
        if !error.is_error() {
            return Err(Error::type_error(format!(
                "throw needs an Error object, got {}",
                error.type_name()
            )));
        }
        error.set_error_positions(self.gen_pos_info());
        self.curr_error = Some(error);
        self.unwind()
    }

    /// `LOAD_ERROR`: push the current error for the catch sequence.
    pub(crate) fn exec_load_error(&mut self) -> Result<()> {
        let error = self
            .curr_error
            .clone()
            .ok_or_else(|| Error::type_error("LOAD_ERROR with no active error"))?;
        self.push(error);
        Ok(())
    }

    /// `IS_INSTANCE`: whether the popped prototype is reachable on the
    /// popped object's `__parent__` chain.
    pub(crate) fn exec_is_instance(&mut self) -> Result<()> {
        let (obj, proto) = self.fetch_two("IS_INSTANCE")?;
        self.push(Object::boolean(is_child_of(&obj, &proto)));
        Ok(())
    }

    /// Convert a raised host error into a full error object with a
    /// captured traceback and hand it to the unwinder.
    pub(crate) fn instruction_throw(&mut self, name: &str, message: &str) -> Result<()> {
        debug!("raising {}: {}", name, message);
        let error = Object::error_with(name, message);
        error.set_error_positions(self.gen_pos_info());
        self.curr_error = Some(error);
        self.unwind()
    }

    /// Walk frames from the top toward the bottom. A frame whose topmost
    /// try-block is still in its body (pc before the catch target) is
    /// selected: frames above it are dropped and it resumes at the catch
    /// target. A frame already inside a catch handler is skipped, so a
    /// throw from a handler propagates outward. With no handler the run
    /// terminates.
    pub(crate) fn unwind(&mut self) -> Result<()> {
        let mut target = None;
        for (index, frame) in self.call_stack.iter().enumerate().rev() {
            if let Some(try_block) = frame.try_blocks.last() {
                if frame.pc < try_block.catch_start {
                    target = Some((index, try_block.catch_start));
                    break;
                }
            }
        }

        match target {
            Some((index, catch_start)) => {
                debug!("unwinding to frame {} catch at pc {}", index, catch_start);
                self.call_stack.truncate(index + 1);
                self.call_stack[index].pc = catch_start;
                Err(Error::Caught)
            }
            None => {
                let error = self.curr_error.clone().unwrap_or_else(Object::error);
                self.uncaught = Some(Uncaught::from_error(&error));
                self.running = false;
                Err(Error::Terminated)
            }
        }
    }

    /// Capture the traceback for the current instruction: one
    /// `(path, span)` pair per frame, bottom to top. Module frames set
    /// the path for the frames above them; frames below the top report
    /// the instruction before their pc (their pc was already advanced
    /// past the call).
    pub(crate) fn gen_pos_info(&self) -> Vec<(String, Span)> {
        let mut positions = Vec::with_capacity(self.call_stack.len());
        let mut path = String::new();
        let last = self.call_stack.len().saturating_sub(1);
        for (index, frame) in self.call_stack.iter().enumerate() {
            if let Some(def) = frame.owner.module_def() {
                path = def.path;
            }
            let pc = if index == last {
                frame.pc
            } else {
                frame.pc.saturating_sub(1)
            };
            let span = frame
                .code
                .code
                .get(pc)
                .map(|inst| inst.span)
                .unwrap_or_default();
            positions.push((path.clone(), span));
        }
        positions
    }
}
