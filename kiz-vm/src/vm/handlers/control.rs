// kiz-vm - Control-flow handlers
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Jumps. Targets are absolute instruction indices; both handlers
//! manage the pc themselves, so the dispatcher does not advance it.

use kiz_core::{Host, Result};

use crate::vm::Vm;

impl Vm {
    pub(crate) fn exec_jump(&mut self, target: usize) -> Result<()> {
        self.current_frame_mut()?.pc = target;
        Ok(())
    }

    /// Pop the condition; jump when falsy, step forward when truthy.
    pub(crate) fn exec_jump_if_false(&mut self, target: usize) -> Result<()> {
        let condition = self.pop_stack("JUMP_IF_FALSE")?;
        let truthy = self.is_true(&condition)?;
        let frame = self.current_frame_mut()?;
        if truthy {
            frame.pc += 1;
        } else {
            frame.pc = target;
        }
        Ok(())
    }
}
