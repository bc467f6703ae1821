// kiz - Interactive REPL
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! The interactive loop.
//!
//! All inputs share one persistent module-level frame, so bindings
//! survive between lines. Input is accumulated while block keywords
//! outnumber their `end`s, appended to a virtual source file (so
//! tracebacks can slice earlier inputs), compiled in REPL mode, and
//! executed; the value of a trailing expression statement is printed
//! unless it is Nil.

use std::rc::Rc;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use kiz_core::{CodeObject, Object};
use kiz_parser::{Lexer, TokenKind};
use kiz_vm::{Vm, compile_source_at, render_traceback};

const REPL_PATH: &str = "<shell#>";

/// Run the interactive loop until EOF or interrupt.
pub fn run() {
    println!("This is the kiz REPL {}\n", env!("CARGO_PKG_VERSION"));

    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Failed to start the line editor: {}", e);
            return;
        }
    };

    let mut vm = Vm::new();
    let module = Object::module(
        REPL_PATH,
        REPL_PATH,
        Some(Rc::new(CodeObject::new())),
    );
    if let Err(e) = vm.install_main_frame(module) {
        eprintln!("Failed to initialise the REPL: {} : {}", e.name, e.message);
        return;
    }

    loop {
        let input = match read_input(&mut editor) {
            Some(input) => input,
            None => break,
        };
        if input.trim().is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(input.as_str());

        let start_line = vm.append_source(REPL_PATH, &input);
        let code = match compile_source_at(&input, start_line, true) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        match vm.run_snippet(Rc::new(code)) {
            Ok(Some(value)) if !value.is_nil() => println!("{}", value.debug_string()),
            Ok(_) => {}
            Err(uncaught) => eprint!("{}", render_traceback(vm.sources(), &uncaught)),
        }
    }
}

/// Read one logical input, continuing across lines while block openers
/// outnumber `end`s.
fn read_input(editor: &mut DefaultEditor) -> Option<String> {
    let mut buffer = String::new();
    loop {
        let prompt = if buffer.is_empty() { ">>> " } else { "... " };
        match editor.readline(prompt) {
            Ok(line) => {
                if !buffer.is_empty() {
                    buffer.push('\n');
                }
                buffer.push_str(&line);
                if !needs_more(&buffer) {
                    return Some(buffer);
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Abandon a half-typed block, keep the session.
                if buffer.is_empty() {
                    return None;
                }
                buffer.clear();
            }
            Err(ReadlineError::Eof) => return None,
            Err(e) => {
                eprintln!("Read error: {}", e);
                return None;
            }
        }
    }
}

/// True while the buffer has more block openers than `end`s. Unlexable
/// input is submitted as-is so the parser can report it.
fn needs_more(buffer: &str) -> bool {
    let Ok(tokens) = Lexer::new(buffer).tokenize() else {
        return false;
    };
    let mut open: isize = 0;
    for token in &tokens {
        match token.kind {
            TokenKind::Fn
            | TokenKind::If
            | TokenKind::While
            | TokenKind::For
            | TokenKind::Try
            | TokenKind::Object => open += 1,
            TokenKind::End => open -= 1,
            _ => {}
        }
    }
    open > 0
}
