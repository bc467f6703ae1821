// kiz-vm - Common test utilities
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Shared helpers for kiz-vm integration tests.
//!
//! - [`run_program`] - compile and run source as a main module, returning
//!   the captured `print` output
//! - [`run_uncaught`] - run source expected to die with an uncaught error
//! - [`eval_expr`] - run source in REPL mode and render the value of its
//!   trailing expression

use std::rc::Rc;

use kiz_core::{CodeObject, Object};
use kiz_vm::{Uncaught, Vm, compile_source, compile_source_at};

#[allow(dead_code)]
pub const TEST_PATH: &str = "<test>";

/// Compile and run a program, returning the lines `print` produced.
/// An uncaught error is rendered as `Name : message`.
#[allow(dead_code)]
pub fn run_program(source: &str) -> Result<Vec<String>, String> {
    let mut vm = Vm::new();
    vm.capture_output();
    vm.add_source(TEST_PATH, source);
    let code = compile_source(source).map_err(|e| e.to_string())?;
    let module = Object::module(TEST_PATH, TEST_PATH, Some(Rc::new(code)));
    match vm.set_main_module(module) {
        Ok(()) => Ok(vm.take_output()),
        Err(uncaught) => Err(format!("{} : {}", uncaught.name, uncaught.message)),
    }
}

/// Run a program expected to terminate with an uncaught error; returns
/// the captured traceback data.
#[allow(dead_code)]
pub fn run_uncaught(source: &str) -> Uncaught {
    let mut vm = Vm::new();
    vm.capture_output();
    vm.add_source(TEST_PATH, source);
    let code = compile_source(source).expect("compile error");
    let module = Object::module(TEST_PATH, TEST_PATH, Some(Rc::new(code)));
    match vm.set_main_module(module) {
        Ok(()) => panic!("expected an uncaught error, program completed"),
        Err(uncaught) => uncaught,
    }
}

/// Run source in REPL mode and return the debug rendering of the value
/// its trailing expression left on the stack (`"Nil"` when none).
#[allow(dead_code)]
pub fn eval_expr(source: &str) -> Result<String, String> {
    let mut vm = Vm::new();
    vm.capture_output();
    let module = Object::module(TEST_PATH, TEST_PATH, Some(Rc::new(CodeObject::new())));
    vm.install_main_frame(module)
        .map_err(|e| format!("{} : {}", e.name, e.message))?;
    vm.add_source(TEST_PATH, source);
    let code = compile_source_at(source, 1, true).map_err(|e| e.to_string())?;
    match vm.run_snippet(Rc::new(code)) {
        Ok(Some(value)) => Ok(value.debug_string()),
        Ok(None) => Ok("Nil".to_string()),
        Err(uncaught) => Err(format!("{} : {}", uncaught.name, uncaught.message)),
    }
}

/// Assert that a program prints exactly the given lines.
#[macro_export]
macro_rules! assert_prints {
    ($source:expr, $expected:expr) => {
        let output = $crate::common::run_program($source);
        assert!(
            output.is_ok(),
            "program failed: {:?}\nsource:\n{}",
            output.err(),
            $source
        );
        let expected: Vec<String> = $expected.iter().map(|s| s.to_string()).collect();
        assert_eq!(output.unwrap(), expected, "output mismatch for:\n{}", $source);
    };
}

/// Assert that a program dies with an error whose `Name : message`
/// rendering contains the given fragment.
#[macro_export]
macro_rules! assert_errors {
    ($source:expr, $fragment:expr) => {
        match $crate::common::run_program($source) {
            Ok(output) => panic!(
                "expected error containing '{}', program printed {:?}",
                $fragment, output
            ),
            Err(message) => assert!(
                message.contains($fragment),
                "error '{}' does not contain '{}'",
                message,
                $fragment
            ),
        }
    };
}
