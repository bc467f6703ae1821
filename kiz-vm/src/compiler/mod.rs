// kiz-vm - Bytecode compiler
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Lowering from the kiz AST to code objects.
//!
//! `compile_module` compiles a program for module execution (expression
//! statements discard their value); `compile_repl` keeps the value of a
//! trailing expression statement on the stack so the REPL can print it.

pub mod codegen;

use std::fmt;

use kiz_core::CodeObject;
use kiz_parser::{Block, ParseError, Parser, Span};

use codegen::CodeGen;

/// Compile error with position information.
#[derive(Debug, Clone)]
pub struct CompileError {
    pub message: String,
    pub span: Span,
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Syntax error at {}:{}: {}",
            self.span.line_start, self.span.col_start, self.message
        )
    }
}

impl std::error::Error for CompileError {}

impl From<ParseError> for CompileError {
    fn from(e: ParseError) -> Self {
        CompileError {
            message: e.message,
            span: e.span,
        }
    }
}

/// Compile a parsed program for module execution.
pub fn compile_module(block: &Block) -> Result<CodeObject, CompileError> {
    CodeGen::new(false).compile_program(block)
}

/// Compile a parsed program for the REPL: the value of a trailing
/// expression statement stays on the operand stack.
pub fn compile_repl(block: &Block) -> Result<CodeObject, CompileError> {
    CodeGen::new(true).compile_program(block)
}

/// Parse and compile source text for module execution.
pub fn compile_source(source: &str) -> Result<CodeObject, CompileError> {
    compile_source_at(source, 1, false)
}

/// Parse and compile source text starting at `start_line`, optionally in
/// REPL mode.
pub fn compile_source_at(
    source: &str,
    start_line: usize,
    repl: bool,
) -> Result<CodeObject, CompileError> {
    let block = Parser::parse_source_at(source, start_line)?;
    if repl {
        compile_repl(&block)
    } else {
        compile_module(&block)
    }
}
