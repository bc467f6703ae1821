// kiz-vm - Call frames
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Call frames for the VM.

use std::rc::Rc;

use kiz_core::{AttrMap, CodeObject, Object};

/// A try-block marker pushed by `TRY_START`.
#[derive(Debug, Clone, Copy)]
pub struct TryBlock {
    /// Absolute pc of the first catch-sequence instruction.
    pub catch_start: usize,
}

/// Execution record for one invocation of a code object.
pub struct CallFrame {
    /// Frame name (function name or module path), for diagnostics.
    pub name: String,

    /// The Function or Module whose code is running.
    pub owner: Object,

    /// Local bindings, insertion ordered (module export copy walks
    /// them).
    pub locals: AttrMap,

    /// Program counter: index into `code.code`.
    pub pc: usize,

    /// Where the caller resumes when this frame returns.
    pub return_to_pc: usize,

    /// The code object being executed.
    pub code: Rc<CodeObject>,

    /// Active try-block markers, innermost last.
    pub try_blocks: Vec<TryBlock>,
}

impl CallFrame {
    /// Create a frame starting at pc 0.
    pub fn new(
        name: impl Into<String>,
        owner: Object,
        code: Rc<CodeObject>,
        return_to_pc: usize,
    ) -> Self {
        CallFrame {
            name: name.into(),
            owner,
            locals: AttrMap::new(),
            pc: 0,
            return_to_pc,
            code,
            try_blocks: Vec::new(),
        }
    }
}
