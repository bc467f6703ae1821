// kiz-core - Runtime object model for the kiz programming language
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! # kiz-core
//!
//! The kiz heap object model and built-in library: tagged runtime values
//! with insertion-ordered attribute maps and prototype inheritance via
//! `__parent__`, the arbitrary-precision numeric tower, the contract the
//! VM exposes to native functions, and the code-object representation
//! shared between the compiler and the VM.

pub mod attrs;
pub mod builtins;
pub mod code;
pub mod error;
pub mod host;
pub mod magic;
pub mod num;
pub mod object;
pub mod protos;

pub use attrs::AttrMap;
pub use code::{CodeObject, Instruction, Op};
pub use error::{Error, Result};
pub use host::Host;
pub use num::{Decimal, Rational};
pub use num_bigint::BigInt;
pub use object::{Dict, FnDef, Module, NativeFn, Object, Payload, get_attr};
pub use protos::{Prototypes, prototypes};
