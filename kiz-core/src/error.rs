// kiz-core - Error types for the kiz runtime
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Error types for kiz execution.
//!
//! A native function (or an opcode handler) fails by raising a named
//! error, which the VM converts into a full error object with a captured
//! traceback at the instruction boundary. The remaining variants are
//! control-flow signals rather than real errors: they tell native code
//! unwinding through it that the VM has already routed (or failed to
//! route) an exception, or that execution should stop.
//!
//! # Examples
//!
//! ```
//! use kiz_core::Error;
//!
//! let err = Error::name_error("Undefined variable 'x'");
//! assert_eq!(err.to_string(), "NameError : Undefined variable 'x'");
//! ```

use std::fmt;

/// Result type for kiz runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors and control signals produced during execution.
#[derive(Debug, Clone)]
pub enum Error {
    /// A named runtime error, pending conversion to an error object.
    Raised { name: String, message: String },
    /// An exception was thrown and an enclosing frame's catch handler has
    /// already been selected; abandon in-flight native work and resume
    /// dispatch (control flow, not a real error).
    Caught,
    /// An exception was thrown and no handler exists; the traceback has
    /// been captured and execution is over.
    Terminated,
    /// The STOP instruction (or an aborted breakpoint) cleared the
    /// running flag.
    Stop,
}

impl Error {
    /// Raise a named error.
    pub fn raised(name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Raised {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Unresolved variable or attribute.
    pub fn name_error(message: impl Into<String>) -> Self {
        Error::raised("NameError", message)
    }

    /// Wrong operand variant, uncallable value, arity mismatch.
    pub fn type_error(message: impl Into<String>) -> Self {
        Error::raised("TypeError", message)
    }

    /// Dictionary lookup miss.
    pub fn key_error(message: impl Into<String>) -> Self {
        Error::raised("KeyError", message)
    }

    /// Module name not resolvable.
    pub fn path_error(message: impl Into<String>) -> Self {
        Error::raised("PathError", message)
    }

    /// Parser or compiler invariant, surfaced during import.
    pub fn syntax_error(message: impl Into<String>) -> Self {
        Error::raised("SyntaxError", message)
    }

    /// BigInt narrowing failure.
    pub fn overflow_error(message: impl Into<String>) -> Self {
        Error::raised("OverflowError", message)
    }

    /// Division or modulo by zero.
    pub fn zero_division(message: impl Into<String>) -> Self {
        Error::raised("ZeroDivisionError", message)
    }

    /// Arity mismatch for a named callable.
    pub fn arity(name: &str, expected: usize, got: usize) -> Self {
        Error::type_error(format!(
            "{} takes {} argument{}, got {}",
            name,
            expected,
            if expected == 1 { "" } else { "s" },
            got
        ))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Raised { name, message } => write!(f, "{} : {}", name, message),
            Error::Caught => write!(f, "exception routed to a catch handler"),
            Error::Terminated => write!(f, "execution terminated by an uncaught error"),
            Error::Stop => write!(f, "stop signal"),
        }
    }
}

impl std::error::Error for Error {}
