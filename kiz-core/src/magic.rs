// kiz-core - Magic attribute names
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Names of the attributes the VM dispatches on implicitly.

pub const PARENT: &str = "__parent__";

pub const ADD: &str = "__add__";
pub const SUB: &str = "__sub__";
pub const MUL: &str = "__mul__";
pub const DIV: &str = "__div__";
pub const MOD: &str = "__mod__";
pub const POW: &str = "__pow__";
pub const NEG: &str = "__neg__";

pub const EQ: &str = "__eq__";
pub const LT: &str = "__lt__";
pub const GT: &str = "__gt__";

pub const CALL: &str = "__call__";
pub const BOOL: &str = "__bool__";
pub const STR: &str = "__str__";
pub const GET_ITEM: &str = "__getitem__";
pub const SET_ITEM: &str = "__setitem__";
pub const CONTAINS: &str = "__contains__";
pub const NEXT: &str = "__next__";
pub const HASH: &str = "__hash__";

pub const OWNER_MODULE: &str = "__owner_module__";
pub const CURRENT_INDEX: &str = "__current_index__";
/// Bindings a function captured from its defining frame.
pub const CLOSURE: &str = "__closure__";

/// Error object attributes.
pub const ERR_NAME: &str = "__name__";
pub const ERR_MSG: &str = "__msg__";

/// Module locals carrying this prefix are not exported.
pub const PRIVATE_PREFIX: &str = "__private__";
/// A string local of this name overrides a module's exported bind name.
pub const MODULE_NAME: &str = "__name__";
